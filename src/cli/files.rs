use crate::codec::StreamSummary;
use crate::error::{ColumnarError, Result};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Run `process` from `input_path` into a freshly truncated `output_path`.
///
/// Both files are closed on every exit path. When `process` fails the
/// partial output is removed, so a failed run leaves nothing behind.
pub(crate) fn process_file<F>(
    input_path: &Path,
    output_path: &Path,
    process: F,
) -> Result<StreamSummary>
where
    F: FnOnce(&mut BufReader<File>, u64, &mut BufWriter<File>) -> Result<StreamSummary>,
{
    ensure_distinct(input_path, output_path)?;

    let input = File::open(input_path).map_err(|source| ColumnarError::OpenInput {
        path: input_path.to_path_buf(),
        source,
    })?;
    let input_len = input.metadata()?.len();
    debug!("{}: {} bytes", input_path.display(), input_len);
    let mut reader = BufReader::new(input);

    let output = File::create(output_path).map_err(|source| ColumnarError::CreateOutput {
        path: output_path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(output);

    let result = process(&mut reader, input_len, &mut writer).and_then(|summary| {
        writer.flush()?;
        Ok(summary)
    });

    if result.is_err() {
        drop(writer);
        if let Err(e) = fs::remove_file(output_path) {
            warn!(
                "could not remove partial output {}: {}",
                output_path.display(),
                e
            );
        }
    }
    result
}

/// Refuse to truncate the input by writing over it
fn ensure_distinct(input_path: &Path, output_path: &Path) -> Result<()> {
    if !output_path.exists() {
        return Ok(());
    }
    let same = match (input_path.canonicalize(), output_path.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        return Err(ColumnarError::InvalidArgument(format!(
            "input and output are the same file: {}",
            input_path.display()
        )));
    }
    Ok(())
}
