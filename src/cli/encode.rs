use crate::cli::files::process_file;
use crate::codec::{encode_stream, CodecOptions, StreamSummary};
use crate::error::Result;
use std::path::Path;

/// Encode `input_path` into `output_path` (created or truncated)
pub fn encode_file(
    input_path: &Path,
    output_path: &Path,
    options: &CodecOptions,
) -> Result<StreamSummary> {
    process_file(input_path, output_path, |reader, input_len, writer| {
        encode_stream(reader, input_len, writer, options)
    })
}
