//! Streaming block driver.
//!
//! The driver owns two block buffers for the whole run. Input is read into
//! the read buffer until a block is full (or the input ends), the block is
//! permuted into the write buffer, and the write buffer is emitted.
//!
//! ```text
//!            block full                      input exhausted
//! Filling ──────────────► FlushFull ──┐     (encode only)
//!    ▲                                │  Filling ──────────► FlushFinal ──► Done
//!    └────────────────────────────────┘
//! ```
//!
//! In decode mode the last full block is unpadded inside `FlushFull` and the
//! driver moves straight to `Done`.

use crate::block::BlockGeometry;
use crate::error::{ColumnarError, Result};
use crate::pipeline::{pad_block, unpad_block, PadBytes, Transform};
use log::{debug, trace};
use std::io::{self, Read, Write};

/// Direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

impl std::str::FromStr for Mode {
    type Err = ColumnarError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "encode" | "e" => Ok(Self::Encode),
            "decode" | "d" => Ok(Self::Decode),
            _ => Err(ColumnarError::InvalidArgument(format!("mode: {}", s))),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Encode => write!(f, "encode"),
            Mode::Decode => write!(f, "decode"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    Filling,
    FlushFull,
    FlushFinal,
    Done,
}

/// Byte and block counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveSummary {
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub blocks: u64,
}

pub struct BlockDriver {
    mode: Mode,
    geometry: BlockGeometry,
    transform: Transform,
    pad: PadBytes,
    read_buf: Vec<u8>,
    write_buf: Vec<u8>,
    filled: usize,
    remaining: u64,
    state: DriverState,
}

impl BlockDriver {
    /// Allocate both block buffers for `geometry`
    pub fn new(
        mode: Mode,
        geometry: BlockGeometry,
        transform: Transform,
        pad: PadBytes,
    ) -> Self {
        let block_size = geometry.block_size();
        Self {
            mode,
            geometry,
            transform,
            pad,
            read_buf: vec![0u8; block_size],
            write_buf: vec![0u8; block_size],
            filled: 0,
            remaining: 0,
            state: DriverState::Filling,
        }
    }

    /// Stream exactly `input_len` bytes from `input` through the codec into `output`.
    ///
    /// Decode input must be a positive multiple of the block size; anything
    /// else fails with `TruncatedInput` before a single byte is written.
    pub fn run<R: Read, W: Write>(
        &mut self,
        input: R,
        input_len: u64,
        output: &mut W,
    ) -> Result<DriveSummary> {
        let block_size = self.geometry.block_size();
        if self.mode == Mode::Decode && !self.geometry.is_aligned(input_len) {
            return Err(ColumnarError::TruncatedInput {
                length: input_len,
                block_size,
            });
        }

        debug!(
            "{} {} bytes with dim {} ({}-byte blocks, {})",
            self.mode,
            input_len,
            self.geometry.dim(),
            block_size,
            self.transform
        );

        let mut input = input.take(input_len);
        let mut summary = DriveSummary::default();
        self.filled = 0;
        self.remaining = input_len;
        self.state = DriverState::Filling;

        while self.state != DriverState::Done {
            self.state = match self.state {
                DriverState::Filling => self.fill(&mut input, &mut summary)?,
                DriverState::FlushFull => self.flush_full(output, &mut summary)?,
                DriverState::FlushFinal => self.flush_final(output, &mut summary)?,
                DriverState::Done => DriverState::Done,
            };
        }

        debug!(
            "{} finished: {} bytes in, {} bytes out, {} blocks",
            self.mode, summary.bytes_in, summary.bytes_out, summary.blocks
        );
        Ok(summary)
    }

    fn fill<R: Read>(
        &mut self,
        input: &mut R,
        summary: &mut DriveSummary,
    ) -> Result<DriverState> {
        if self.remaining == 0 {
            return match self.mode {
                Mode::Encode => Ok(DriverState::FlushFinal),
                // Unreachable for aligned input: the final block ends the run in FlushFull
                Mode::Decode => Err(ColumnarError::TruncatedInput {
                    length: summary.bytes_in,
                    block_size: self.geometry.block_size(),
                }),
            };
        }

        let space = self.read_buf.len() - self.filled;
        let want = space.min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let n = match input.read(&mut self.read_buf[self.filled..self.filled + want]) {
            Ok(0) => {
                return Err(ColumnarError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("input ended {} bytes early", self.remaining),
                )))
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(DriverState::Filling),
            Err(e) => return Err(e.into()),
        };

        self.filled += n;
        self.remaining -= n as u64;
        summary.bytes_in += n as u64;

        if self.filled == self.read_buf.len() {
            Ok(DriverState::FlushFull)
        } else {
            Ok(DriverState::Filling)
        }
    }

    fn flush_full<W: Write>(
        &mut self,
        output: &mut W,
        summary: &mut DriveSummary,
    ) -> Result<DriverState> {
        self.permute();
        self.filled = 0;

        if self.mode == Mode::Decode && self.remaining == 0 {
            let trailing = unpad_block(&self.write_buf, self.pad)?;
            let keep = self.write_buf.len() - trailing;
            trace!("final block: keeping {} bytes, dropping {} padding", keep, trailing);
            self.emit(output, keep, summary)?;
            return Ok(DriverState::Done);
        }

        let block_size = self.write_buf.len();
        self.emit(output, block_size, summary)?;
        Ok(DriverState::Filling)
    }

    fn flush_final<W: Write>(
        &mut self,
        output: &mut W,
        summary: &mut DriveSummary,
    ) -> Result<DriverState> {
        let padded = pad_block(&mut self.read_buf, self.filled, self.pad);
        trace!("final block: {} data bytes, {} padding", self.filled, padded);
        self.permute();
        self.filled = 0;

        let block_size = self.write_buf.len();
        self.emit(output, block_size, summary)?;
        Ok(DriverState::Done)
    }

    fn permute(&mut self) {
        self.transform
            .apply(&mut self.write_buf, &self.read_buf, self.geometry.dim());
    }

    fn emit<W: Write>(
        &self,
        output: &mut W,
        len: usize,
        summary: &mut DriveSummary,
    ) -> Result<()> {
        output.write_all(&self.write_buf[..len])?;
        summary.bytes_out += len as u64;
        summary.blocks += 1;
        trace!("block {}: wrote {} bytes", summary.blocks, len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(mode: Mode, dim: usize, transform: Transform, data: &[u8]) -> Result<Vec<u8>> {
        let geometry = BlockGeometry::new(dim)?;
        let mut driver = BlockDriver::new(mode, geometry, transform, PadBytes::default());
        let mut out = Vec::new();
        driver.run(data, data.len() as u64, &mut out)?;
        Ok(out)
    }

    fn encode(dim: usize, data: &[u8]) -> Vec<u8> {
        run(Mode::Encode, dim, Transform::Transpose, data).unwrap()
    }

    fn decode(dim: usize, data: &[u8]) -> Vec<u8> {
        run(Mode::Decode, dim, Transform::Transpose, data).unwrap()
    }

    #[test]
    fn test_encode_empty_input() {
        let encoded = encode(2, b"");
        assert_eq!(encoded, b"XYYY");
        assert!(decode(2, &encoded).is_empty());
    }

    #[test]
    fn test_encode_short_block() {
        let encoded = encode(2, b"AB");
        assert_eq!(encoded, b"AXBY");
        assert_eq!(decode(2, &encoded), b"AB");
    }

    #[test]
    fn test_exact_block_gets_synthetic_padding() {
        let encoded = encode(3, b"ABCDEFGHI");
        assert_eq!(encoded.len(), 18);
        assert_eq!(&encoded[..9], b"ADGBEHCFI");
        assert_eq!(&encoded[9..], b"XYYYYYYYY");
        assert_eq!(decode(3, &encoded), b"ABCDEFGHI");
    }

    #[test]
    fn test_multi_block_roundtrip() {
        let data: Vec<u8> = (0..1000).map(|i| (i * 7 % 256) as u8).collect();
        for dim in [1, 2, 3, 5, 8, 16, 40] {
            let encoded = encode(dim, &data);
            assert_eq!(encoded.len() % (dim * dim), 0);
            assert_eq!(decode(dim, &encoded), data, "dim {}", dim);
        }
    }

    #[test]
    fn test_sentinel_in_data_roundtrips() {
        let cases: [&[u8]; 6] = [b"ABX", b"X", b"XXXX", b"XYXY", b"ABCY", b"YYYYYYY"];
        for data in cases {
            let encoded = encode(2, data);
            assert_eq!(decode(2, &encoded), data);
        }
    }

    #[test]
    fn test_identity_transform_only_pads() {
        let encoded = run(Mode::Encode, 2, Transform::Identity, b"ABCDE").unwrap();
        assert_eq!(encoded, b"ABCDEXYY");
        let decoded = run(Mode::Decode, 2, Transform::Identity, &encoded).unwrap();
        assert_eq!(decoded, b"ABCDE");
    }

    #[test]
    fn test_decode_truncated_input() {
        let err = run(Mode::Decode, 2, Transform::Transpose, b"AXB").unwrap_err();
        assert!(matches!(
            err,
            ColumnarError::TruncatedInput {
                length: 3,
                block_size: 4
            }
        ));
    }

    #[test]
    fn test_decode_empty_input() {
        let err = run(Mode::Decode, 2, Transform::Transpose, b"").unwrap_err();
        assert!(matches!(err, ColumnarError::TruncatedInput { length: 0, .. }));
    }

    #[test]
    fn test_decode_without_sentinel() {
        let err = run(Mode::Decode, 2, Transform::Transpose, b"ABCD").unwrap_err();
        assert!(matches!(err, ColumnarError::MalformedPadding(_)));
    }

    #[test]
    fn test_short_reader_is_an_error() {
        let geometry = BlockGeometry::new(2).unwrap();
        let mut driver =
            BlockDriver::new(Mode::Encode, geometry, Transform::Transpose, PadBytes::default());
        let mut out = Vec::new();
        let err = driver.run(&b"AB"[..], 6, &mut out).unwrap_err();
        match err {
            ColumnarError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error type: {other:?}"),
        }
    }

    #[test]
    fn test_summary_counts() {
        let geometry = BlockGeometry::new(2).unwrap();
        let mut driver =
            BlockDriver::new(Mode::Encode, geometry, Transform::Transpose, PadBytes::default());
        let mut out = Vec::new();
        let summary = driver.run(&b"ABCDEF"[..], 6, &mut out).unwrap();
        assert_eq!(
            summary,
            DriveSummary {
                bytes_in: 6,
                bytes_out: 8,
                blocks: 2
            }
        );
    }

    #[test]
    fn test_driver_is_reusable() {
        let geometry = BlockGeometry::new(3).unwrap();
        let mut driver =
            BlockDriver::new(Mode::Encode, geometry, Transform::Transpose, PadBytes::default());
        let mut first = Vec::new();
        let mut second = Vec::new();
        driver.run(&b"hello"[..], 5, &mut first).unwrap();
        driver.run(&b"hello"[..], 5, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("encode".parse::<Mode>().unwrap(), Mode::Encode);
        assert_eq!("D".parse::<Mode>().unwrap(), Mode::Decode);
        assert!("sideways".parse::<Mode>().is_err());
    }
}
