use crate::error::{ColumnarError, Result};

/// Largest accepted block side (16 MiB blocks)
pub const MAX_DIM: usize = 4096;

/// Default block side used when no dimension is given
pub const DEFAULT_DIM: usize = 8;

/// Validated square block geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGeometry {
    dim: usize,
    block_size: usize,
}

impl BlockGeometry {
    /// Validate `dim` and derive the block size (`dim * dim`)
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 || dim > MAX_DIM {
            return Err(ColumnarError::InvalidDimension(dim));
        }
        let block_size = dim
            .checked_mul(dim)
            .ok_or(ColumnarError::InvalidDimension(dim))?;
        Ok(Self { dim, block_size })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks an encoder emits for `data_len` plaintext bytes.
    /// The final block always carries padding, so this is never zero.
    pub fn encoded_block_count(&self, data_len: u64) -> Result<u64> {
        (data_len / self.block_size as u64)
            .checked_add(1)
            .ok_or_else(|| Self::overflow(data_len))
    }

    /// Encoded size of `data_len` plaintext bytes, excluding any frame
    pub fn encoded_len(&self, data_len: u64) -> Result<u64> {
        self.encoded_block_count(data_len)?
            .checked_mul(self.block_size as u64)
            .ok_or_else(|| Self::overflow(data_len))
    }

    fn overflow(data_len: u64) -> ColumnarError {
        ColumnarError::InvalidFormat(format!(
            "encoded length of {} plaintext bytes overflows",
            data_len
        ))
    }

    /// True when `len` can be a complete encoded block stream
    pub fn is_aligned(&self, len: u64) -> bool {
        len > 0 && len % self.block_size as u64 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_block_size() {
        let geometry = BlockGeometry::new(3).unwrap();
        assert_eq!(geometry.dim(), 3);
        assert_eq!(geometry.block_size(), 9);

        let single = BlockGeometry::new(1).unwrap();
        assert_eq!(single.block_size(), 1);
    }

    #[test]
    fn test_invalid_dimension() {
        assert!(matches!(
            BlockGeometry::new(0),
            Err(ColumnarError::InvalidDimension(0))
        ));
        assert!(BlockGeometry::new(MAX_DIM).is_ok());
        assert!(BlockGeometry::new(MAX_DIM + 1).is_err());
    }

    #[test]
    fn test_encoded_len_always_pads() {
        let geometry = BlockGeometry::new(2).unwrap();
        assert_eq!(geometry.encoded_len(0).unwrap(), 4);
        assert_eq!(geometry.encoded_len(3).unwrap(), 4);
        // Exact multiple still gains a synthetic padded block
        assert_eq!(geometry.encoded_len(4).unwrap(), 8);
        assert_eq!(geometry.encoded_len(5).unwrap(), 8);
        assert_eq!(geometry.encoded_block_count(8).unwrap(), 3);
    }

    #[test]
    fn test_encoded_len_overflow() {
        let single = BlockGeometry::new(1).unwrap();
        assert!(matches!(
            single.encoded_block_count(u64::MAX),
            Err(ColumnarError::InvalidFormat(_))
        ));

        let wide = BlockGeometry::new(4).unwrap();
        assert!(matches!(
            wide.encoded_len(u64::MAX - 1),
            Err(ColumnarError::InvalidFormat(_))
        ));
        assert_eq!(wide.encoded_block_count(u64::MAX - 1).unwrap(), u64::MAX / 16 + 1);
    }

    #[test]
    fn test_alignment() {
        let geometry = BlockGeometry::new(3).unwrap();
        assert!(!geometry.is_aligned(0));
        assert!(geometry.is_aligned(9));
        assert!(geometry.is_aligned(27));
        assert!(!geometry.is_aligned(10));
    }
}
