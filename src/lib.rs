//! Columnar - transposition block cipher with sentinel padding
//!
//! Data is cut into square `dim`×`dim` blocks. Each block is written out
//! column by column instead of row by row. Because the matrix is square the
//! same permutation also reverses itself, so encoding and decoding share one
//! routine.
//!
//! ## Block Pipeline
//!
//! ```text
//! Encode:  Input → Fill block → [Pad final block] → Transpose → Output
//! Decode:  Input → Fill block → Transpose → [Unpad final block] → Output
//! ```
//!
//! - **Fill**: Read into a reusable `dim*dim` buffer
//! - **Pad**: Sentinel byte (`X`) then filler (`Y`) up to the block end; the
//!   final block is always padded, even when the data ends on a block boundary
//! - **Transpose**: `out[i*dim + j] = in[j*dim + i]`
//! - **Unpad**: Backward scan of the final block for the sentinel
//!
//! The framed format (default) wraps the block stream in a JSON header
//! (dimension, transform, padding bytes, length) and a SHA3-256 trailer over
//! the plaintext. The raw format is the bare block stream.
//!
//! This is a classical cipher: it moves bytes around and offers no
//! confidentiality against any real analysis.
//!
//! ## Example
//!
//! ```no_run
//! use columnar::cli::{decode_file, encode_file};
//! use columnar::codec::CodecOptions;
//! use std::path::Path;
//!
//! let options = CodecOptions::new(8);
//! encode_file(Path::new("input.txt"), Path::new("input.clm"), &options).unwrap();
//! decode_file(Path::new("input.clm"), Path::new("output.txt"), &options).unwrap();
//! ```
//!
//! In memory:
//!
//! ```
//! use columnar::codec::{decode_bytes, encode_bytes, CodecOptions};
//! use columnar::header::Format;
//!
//! let options = CodecOptions { format: Format::Raw, ..CodecOptions::new(2) };
//! let encoded = encode_bytes(b"AB", &options).unwrap();
//! assert_eq!(encoded, b"AXBY");
//! assert_eq!(decode_bytes(&encoded, &options).unwrap(), b"AB");
//! ```

pub mod block;
pub mod cli;
pub mod codec;
pub mod driver;
pub mod error;
pub mod frame;
pub mod header;
pub mod pipeline;

pub use block::BlockGeometry;
pub use codec::{decode_bytes, encode_bytes, CodecOptions};
pub use driver::{BlockDriver, Mode};
pub use error::{ColumnarError, Result};
pub use header::{Format, FrameHeader};
