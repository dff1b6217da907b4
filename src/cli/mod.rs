pub mod decode;
pub mod encode;
mod files;
pub mod info;

pub use decode::*;
pub use encode::*;
pub use info::*;
