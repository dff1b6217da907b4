use crate::error::{ColumnarError, Result};
use crate::header::FrameHeader;
use crate::pipeline::DIGEST_SIZE;
use std::io::{ErrorKind, Read, Write};

/// Magic bytes for the framed format
pub const FRAME_MAGIC: &[u8; 4] = b"CLM\x01";

/// Upper bound on the JSON header length
const MAX_HEADER_LEN: usize = 64 * 1024;

/// Write magic, header length and JSON header.
/// Returns the number of bytes written.
pub fn write_frame_header<W: Write>(writer: &mut W, header: &FrameHeader) -> Result<u64> {
    writer.write_all(FRAME_MAGIC)?;

    let header_bytes = header.to_bytes()?;
    let header_len = header_bytes.len() as u32;
    writer.write_all(&header_len.to_le_bytes())?;
    writer.write_all(&header_bytes)?;

    Ok(frame_prefix_len(header_bytes.len()))
}

/// Read and validate magic, header length and JSON header.
/// Returns the header and the number of bytes consumed.
pub fn read_frame_header<R: Read>(reader: &mut R) -> Result<(FrameHeader, u64)> {
    let mut magic = [0u8; 4];
    read_section(reader, &mut magic, "magic")?;
    if &magic != FRAME_MAGIC {
        return Err(ColumnarError::InvalidFormat(
            "Invalid frame magic bytes (raw stream?)".into(),
        ));
    }

    let mut header_len_bytes = [0u8; 4];
    read_section(reader, &mut header_len_bytes, "header length")?;
    let header_len = u32::from_le_bytes(header_len_bytes) as usize;
    if header_len > MAX_HEADER_LEN {
        return Err(ColumnarError::InvalidFormat(format!(
            "header length {} exceeds {} bytes",
            header_len, MAX_HEADER_LEN
        )));
    }

    let mut header_bytes = vec![0u8; header_len];
    read_section(reader, &mut header_bytes, "header")?;
    let header = FrameHeader::from_bytes(&header_bytes)?;

    Ok((header, frame_prefix_len(header_len)))
}

/// Read the digest trailer that follows the block section
pub fn read_frame_trailer<R: Read>(reader: &mut R) -> Result<[u8; DIGEST_SIZE]> {
    let mut digest = [0u8; DIGEST_SIZE];
    read_section(reader, &mut digest, "digest trailer")?;
    Ok(digest)
}

/// Bytes taken by magic + length + header
pub fn frame_prefix_len(header_len: usize) -> u64 {
    (FRAME_MAGIC.len() + 4 + header_len) as u64
}

fn read_section<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            ColumnarError::InvalidFormat(format!("file too short to hold frame {}", what))
        } else {
            ColumnarError::Io(e)
        }
    })
}
