use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColumnarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open input file '{}': {source}", path.display())]
    OpenInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot create output file '{}': {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid dimension: {0}. Must be between 1 and {max}", max = crate::block::MAX_DIM)]
    InvalidDimension(usize),

    #[error("Invalid padding bytes: sentinel and filler must differ (both are 0x{0:02x})")]
    InvalidPadBytes(u8),

    #[error("Malformed padding: {0}")]
    MalformedPadding(String),

    #[error("Truncated input: {length} bytes is not a positive multiple of the {block_size}-byte block size")]
    TruncatedInput { length: u64, block_size: usize },

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Header mismatch: {0}")]
    HeaderMismatch(String),

    #[error("Data integrity error: {0}")]
    IntegrityError(String),
}

pub type Result<T> = std::result::Result<T, ColumnarError>;
