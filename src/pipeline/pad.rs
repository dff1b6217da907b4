use crate::error::{ColumnarError, Result};
use serde::{Deserialize, Serialize};

/// Default byte marking the start of padding
pub const DEFAULT_SENTINEL: u8 = b'X';

/// Default byte filling the slots after the sentinel
pub const DEFAULT_FILLER: u8 = b'Y';

/// Sentinel/filler pair used to mark the end of data in the final block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadBytes {
    sentinel: u8,
    filler: u8,
}

impl PadBytes {
    /// Sentinel and filler must differ, otherwise unpadding is ambiguous
    pub fn new(sentinel: u8, filler: u8) -> Result<Self> {
        if sentinel == filler {
            return Err(ColumnarError::InvalidPadBytes(sentinel));
        }
        Ok(Self { sentinel, filler })
    }

    pub fn sentinel(&self) -> u8 {
        self.sentinel
    }

    pub fn filler(&self) -> u8 {
        self.filler
    }
}

impl Default for PadBytes {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL,
            filler: DEFAULT_FILLER,
        }
    }
}

/// Pad a partially filled block whose data occupies `[0, first_empty)`.
/// Writes the sentinel at `first_empty` and the filler after it.
/// Returns the number of padding bytes written.
pub fn pad_block(block: &mut [u8], first_empty: usize, pad: PadBytes) -> usize {
    assert!(
        first_empty < block.len(),
        "Cannot pad a full block (first empty index {} of {})",
        first_empty,
        block.len()
    );

    block[first_empty] = pad.sentinel;
    block[first_empty + 1..].fill(pad.filler);
    block.len() - first_empty
}

/// Find the padding at the end of a decoded final block.
/// Returns the number of trailing bytes (filler plus sentinel) to discard.
///
/// The scan never leaves the block: only filler may follow the sentinel,
/// so anything else, or a missing sentinel, is reported as malformed.
pub fn unpad_block(block: &[u8], pad: PadBytes) -> Result<usize> {
    for (index, &byte) in block.iter().enumerate().rev() {
        if byte == pad.sentinel {
            return Ok(block.len() - index);
        }
        if byte != pad.filler {
            return Err(ColumnarError::MalformedPadding(format!(
                "unexpected byte 0x{:02x} at offset {} before sentinel 0x{:02x}",
                byte, index, pad.sentinel
            )));
        }
    }

    Err(ColumnarError::MalformedPadding(format!(
        "sentinel 0x{:02x} not found in final {}-byte block",
        pad.sentinel,
        block.len()
    )))
}
