use crate::block::BlockGeometry;
use crate::error::{ColumnarError, Result};
use crate::pipeline::{PadBytes, Transform};
use serde::{Deserialize, Serialize};

/// Current frame header version
pub const FRAME_VERSION: u32 = 1;

/// Output container options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Magic, JSON header, blocks, plaintext digest
    #[default]
    Framed,
    /// Bare block stream, compatible with headerless encoders
    Raw,
}

impl std::str::FromStr for Format {
    type Err = ColumnarError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "framed" => Ok(Self::Framed),
            "raw" => Ok(Self::Raw),
            _ => Err(ColumnarError::InvalidArgument(format!("format: {}", s))),
        }
    }
}

/// Frame header - plaintext JSON describing how the block stream was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    /// Format version
    pub version: u32,
    /// Block side; block size is dim * dim
    pub dim: usize,
    /// Permutation applied to each block
    pub transform: Transform,
    /// Byte marking the start of padding
    pub sentinel: u8,
    /// Byte filling the rest of the final block
    pub filler: u8,
    /// Length of the original data in bytes
    pub plaintext_len: u64,
}

impl FrameHeader {
    pub fn new(
        geometry: BlockGeometry,
        transform: Transform,
        pad: PadBytes,
        plaintext_len: u64,
    ) -> Self {
        Self {
            version: FRAME_VERSION,
            dim: geometry.dim(),
            transform,
            sentinel: pad.sentinel(),
            filler: pad.filler(),
            plaintext_len,
        }
    }

    /// Serialize header to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize and validate header from JSON bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header: Self = serde_json::from_slice(data)?;
        if header.version != FRAME_VERSION {
            return Err(ColumnarError::InvalidFormat(format!(
                "unsupported frame version {}",
                header.version
            )));
        }
        header.pad_bytes()?;
        header.payload_len()?;
        Ok(header)
    }

    pub fn geometry(&self) -> Result<BlockGeometry> {
        BlockGeometry::new(self.dim)
    }

    pub fn pad_bytes(&self) -> Result<PadBytes> {
        PadBytes::new(self.sentinel, self.filler)
    }

    /// Size of the block section this header promises
    pub fn payload_len(&self) -> Result<u64> {
        self.geometry()?.encoded_len(self.plaintext_len)
    }

    /// Check the header against the geometry and transform requested for decoding
    pub fn check_matches(&self, geometry: BlockGeometry, transform: Transform) -> Result<()> {
        if self.dim != geometry.dim() {
            return Err(ColumnarError::HeaderMismatch(format!(
                "file was encoded with dim {}, decode requested dim {}",
                self.dim,
                geometry.dim()
            )));
        }
        if self.transform != transform {
            return Err(ColumnarError::HeaderMismatch(format!(
                "file was encoded with {} transform, decode requested {}",
                self.transform, transform
            )));
        }
        Ok(())
    }
}
