use crate::cli::files::process_file;
use crate::codec::{decode_stream, CodecOptions, StreamSummary};
use crate::error::Result;
use std::path::Path;

/// Decode `input_path` into `output_path` (created or truncated).
/// On failure no output file is left behind.
pub fn decode_file(
    input_path: &Path,
    output_path: &Path,
    options: &CodecOptions,
) -> Result<StreamSummary> {
    process_file(input_path, output_path, |reader, input_len, writer| {
        decode_stream(reader, input_len, writer, options)
    })
}
