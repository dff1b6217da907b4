use serde::{Deserialize, Serialize};

/// Permutation applied to every full block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Columnar transposition of the dim×dim matrix
    #[default]
    Transpose,
    /// Copy the block unchanged (padding-only passthrough)
    Identity,
}

impl Transform {
    /// Apply the permutation from `input` into `out`.
    /// Both transforms are involutions, so encode and decode share this call.
    pub fn apply(self, out: &mut [u8], input: &[u8], dim: usize) {
        match self {
            Transform::Transpose => transpose_block(out, input, dim),
            Transform::Identity => out.copy_from_slice(input),
        }
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transform::Transpose => write!(f, "transpose"),
            Transform::Identity => write!(f, "identity"),
        }
    }
}

/// Write the column-major reading of a row-major `dim`×`dim` block:
/// `out[i*dim + j] = input[j*dim + i]`
pub fn transpose_block(out: &mut [u8], input: &[u8], dim: usize) {
    let block_size = dim * dim;
    assert!(dim > 0, "Block dimension must be positive");
    assert_eq!(
        input.len(),
        block_size,
        "Input block must hold exactly {} bytes",
        block_size
    );
    assert_eq!(
        out.len(),
        block_size,
        "Output block must hold exactly {} bytes",
        block_size
    );

    for (i, row) in out.chunks_exact_mut(dim).enumerate() {
        for (j, byte) in row.iter_mut().enumerate() {
            *byte = input[j * dim + i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_2x2() {
        let input = *b"ABXY";
        let mut out = [0u8; 4];
        transpose_block(&mut out, &input, 2);
        assert_eq!(&out, b"AXBY");
    }

    #[test]
    fn test_transpose_3x3() {
        let input = *b"ABCDEFGHI";
        let mut out = [0u8; 9];
        transpose_block(&mut out, &input, 3);
        assert_eq!(&out, b"ADGBEHCFI");
    }

    #[test]
    fn test_transpose_is_involution() {
        let dim = 7;
        let input: Vec<u8> = (0..dim * dim).map(|i| (i * 31 % 256) as u8).collect();
        let mut once = vec![0u8; dim * dim];
        let mut twice = vec![0u8; dim * dim];
        transpose_block(&mut once, &input, dim);
        assert_ne!(once, input);
        transpose_block(&mut twice, &once, dim);
        assert_eq!(twice, input);
    }

    #[test]
    fn test_transpose_single_byte() {
        let mut out = [0u8; 1];
        transpose_block(&mut out, &[42], 1);
        assert_eq!(out, [42]);
    }

    #[test]
    fn test_identity_copies() {
        let input = *b"ABCD";
        let mut out = [0u8; 4];
        Transform::Identity.apply(&mut out, &input, 2);
        assert_eq!(out, input);
    }

    #[test]
    #[should_panic]
    fn test_transpose_wrong_length_panics() {
        let mut out = [0u8; 4];
        transpose_block(&mut out, b"ABC", 2);
    }
}
