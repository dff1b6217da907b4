use crate::error::{ColumnarError, Result};
use crate::frame::{read_frame_header, read_frame_trailer};
use crate::header::FrameHeader;
use crate::pipeline::DIGEST_SIZE;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Summary of a framed file
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub header: FrameHeader,
    pub block_size: usize,
    /// Blocks actually present in the file
    pub blocks: u64,
    /// Bytes of the block section
    pub payload_bytes: u64,
    /// Padding bytes in the final block
    pub padding_bytes: u64,
    /// Header + length prefix + magic + digest trailer
    pub frame_overhead: u64,
    /// SHA3-256 of the plaintext, hex encoded
    pub digest: String,
    /// Block section matches the length announced by the header
    pub complete: bool,
}

/// Read the frame of `path` without decoding any blocks
pub fn read_info(path: &Path) -> Result<FileInfo> {
    let file = File::open(path).map_err(|source| ColumnarError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let (header, prefix) = read_frame_header(&mut reader)?;
    let frame_overhead = prefix + DIGEST_SIZE as u64;
    let payload_bytes = file_size.checked_sub(frame_overhead).ok_or_else(|| {
        ColumnarError::InvalidFormat("file too short to hold frame digest trailer".into())
    })?;

    reader.seek(SeekFrom::End(-(DIGEST_SIZE as i64)))?;
    let digest = read_frame_trailer(&mut reader)?;

    let geometry = header.geometry()?;
    let block_size = geometry.block_size();
    let blocks = payload_bytes / block_size as u64;
    let complete = payload_bytes == header.payload_len()?;

    Ok(FileInfo {
        path: path.to_path_buf(),
        file_size,
        block_size,
        blocks,
        payload_bytes,
        padding_bytes: payload_bytes.saturating_sub(header.plaintext_len),
        frame_overhead,
        digest: hex::encode(digest),
        complete,
        header,
    })
}

/// Display information about a framed file
pub fn show_info(path: &Path) -> Result<String> {
    let info = read_info(path)?;
    let header = &info.header;

    let mut output = String::new();
    output.push_str("Columnar File Information\n");
    output.push_str("=========================\n\n");

    output.push_str(&format!("File: {}\n", info.path.display()));
    output.push_str(&format!("Actual size: {}\n", format_size(info.file_size)));
    output.push_str(&format!("Version: {}\n", header.version));
    output.push('\n');

    output.push_str("Block Geometry:\n");
    output.push_str(&format!("  Dimension: {}\n", header.dim));
    output.push_str(&format!(
        "  Block size: {} bytes ({}x{})\n",
        info.block_size, header.dim, header.dim
    ));
    output.push_str(&format!("  Blocks: {}\n", info.blocks));
    output.push_str(&format!("  Transform: {}\n", header.transform));
    output.push('\n');

    output.push_str("Padding:\n");
    output.push_str(&format!("  Sentinel: {}\n", describe_byte(header.sentinel)));
    output.push_str(&format!("  Filler: {}\n", describe_byte(header.filler)));
    output.push_str(&format!("  Padding bytes: {}\n", info.padding_bytes));
    output.push('\n');

    output.push_str("Contents:\n");
    output.push_str(&format!(
        "  Plaintext: {}\n",
        format_size(header.plaintext_len)
    ));
    output.push_str(&format!("  Block section: {}\n", format_size(info.payload_bytes)));
    output.push_str(&format!(
        "  Frame overhead: {}\n",
        format_size(info.frame_overhead)
    ));
    output.push_str(&format!("  SHA3-256: {}\n", info.digest));

    if !info.complete {
        output.push_str(&format!(
            "\nWarning: block section holds {} bytes but the header announces {}. The file is damaged or truncated.\n",
            info.payload_bytes,
            header.payload_len()?
        ));
    }

    Ok(output)
}

/// Machine-readable variant of `show_info`
pub fn show_info_json(path: &Path) -> Result<String> {
    let info = read_info(path)?;
    Ok(serde_json::to_string_pretty(&info)?)
}

fn describe_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}' (0x{:02x})", byte as char, byte)
    } else {
        format!("0x{:02x}", byte)
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
