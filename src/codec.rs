use crate::block::{BlockGeometry, DEFAULT_DIM};
use crate::driver::{BlockDriver, DriveSummary, Mode};
use crate::error::{ColumnarError, Result};
use crate::frame::{read_frame_header, read_frame_trailer, write_frame_header};
use crate::header::{Format, FrameHeader};
use crate::pipeline::{DigestReader, DigestWriter, PadBytes, Transform, DIGEST_SIZE};
use log::debug;
use std::io::{Read, Write};

/// Options shared by encode and decode
#[derive(Debug, Clone, Copy)]
pub struct CodecOptions {
    /// Block side; block size is dim * dim
    pub dim: usize,
    pub transform: Transform,
    pub format: Format,
    /// Padding bytes for encoding and raw decoding (framed decoding reads them from the header)
    pub pad: PadBytes,
}

impl CodecOptions {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Default::default()
        }
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            transform: Transform::default(),
            format: Format::default(),
            pad: PadBytes::default(),
        }
    }
}

/// Result of one encode or decode run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    /// Bytes consumed from the input, frame included
    pub bytes_in: u64,
    /// Bytes written to the output, frame included
    pub bytes_out: u64,
    /// Blocks encoded or decoded
    pub blocks: u64,
    /// Plaintext digest (framed format only)
    pub digest: Option<[u8; DIGEST_SIZE]>,
}

impl StreamSummary {
    fn raw(drive: DriveSummary) -> Self {
        Self {
            bytes_in: drive.bytes_in,
            bytes_out: drive.bytes_out,
            blocks: drive.blocks,
            digest: None,
        }
    }

    pub fn digest_hex(&self) -> Option<String> {
        self.digest.map(hex::encode)
    }
}

/// Encode `input_len` bytes read from `input` into `output`
pub fn encode_stream<R: Read, W: Write>(
    input: R,
    input_len: u64,
    output: &mut W,
    options: &CodecOptions,
) -> Result<StreamSummary> {
    let geometry = BlockGeometry::new(options.dim)?;
    let mut driver = BlockDriver::new(Mode::Encode, geometry, options.transform, options.pad);

    match options.format {
        Format::Raw => Ok(StreamSummary::raw(driver.run(input, input_len, output)?)),
        Format::Framed => {
            let header = FrameHeader::new(geometry, options.transform, options.pad, input_len);
            let prefix = write_frame_header(output, &header)?;
            debug!("wrote {}-byte frame header", prefix);

            let mut reader = DigestReader::new(input);
            let drive = driver.run(&mut reader, input_len, output)?;
            let digest = reader.finalize();
            output.write_all(&digest)?;

            Ok(StreamSummary {
                bytes_in: drive.bytes_in,
                bytes_out: prefix + drive.bytes_out + DIGEST_SIZE as u64,
                blocks: drive.blocks,
                digest: Some(digest),
            })
        }
    }
}

/// Decode `input_len` bytes read from `input` into `output`
pub fn decode_stream<R: Read, W: Write>(
    mut input: R,
    input_len: u64,
    output: &mut W,
    options: &CodecOptions,
) -> Result<StreamSummary> {
    let geometry = BlockGeometry::new(options.dim)?;

    match options.format {
        Format::Raw => {
            let mut driver =
                BlockDriver::new(Mode::Decode, geometry, options.transform, options.pad);
            Ok(StreamSummary::raw(driver.run(input, input_len, output)?))
        }
        Format::Framed => {
            let (header, prefix) = read_frame_header(&mut input)?;
            header.check_matches(geometry, options.transform)?;
            debug!("read frame header: {:?}", header);

            let payload_len = input_len
                .checked_sub(prefix + DIGEST_SIZE as u64)
                .ok_or_else(|| {
                    ColumnarError::InvalidFormat(
                        "file too short to hold frame digest trailer".into(),
                    )
                })?;
            let announced = header.payload_len()?;
            if payload_len != announced && geometry.is_aligned(payload_len) {
                return Err(ColumnarError::IntegrityError(format!(
                    "block section holds {} bytes, header announces {}",
                    payload_len, announced
                )));
            }

            let mut driver =
                BlockDriver::new(Mode::Decode, geometry, header.transform, header.pad_bytes()?);
            let mut writer = DigestWriter::new(&mut *output);
            let drive = driver.run(&mut input, payload_len, &mut writer)?;
            let actual = writer.finalize();
            let expected = read_frame_trailer(&mut input)?;

            if drive.bytes_out != header.plaintext_len {
                return Err(ColumnarError::IntegrityError(format!(
                    "decoded {} bytes, header announces {}",
                    drive.bytes_out, header.plaintext_len
                )));
            }
            if actual != expected {
                return Err(ColumnarError::IntegrityError(format!(
                    "plaintext digest mismatch (expected {}, got {})",
                    hex::encode(expected),
                    hex::encode(actual)
                )));
            }

            Ok(StreamSummary {
                bytes_in: prefix + drive.bytes_in + DIGEST_SIZE as u64,
                bytes_out: drive.bytes_out,
                blocks: drive.blocks,
                digest: Some(actual),
            })
        }
    }
}

/// Encode an in-memory buffer
pub fn encode_bytes(data: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let geometry = BlockGeometry::new(options.dim)?;
    let capacity = geometry.encoded_len(data.len() as u64)? as usize;
    let mut out = Vec::with_capacity(capacity);
    encode_stream(data, data.len() as u64, &mut out, options)?;
    Ok(out)
}

/// Decode an in-memory buffer
pub fn decode_bytes(data: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    decode_stream(data, data.len() as u64, &mut out, options)?;
    Ok(out)
}
