pub mod checksum;
pub mod pad;
pub mod transpose;

pub use checksum::*;
pub use pad::*;
pub use transpose::*;
