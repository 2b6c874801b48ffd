//! Run opcodes.
//!
//! # Wire Format
//!
//! ```text
//! Short form (top bits != 11):
//!   7 6 5 4 3 2 1 0
//!  +---+-----------+
//!  |mod|   count   |     count 0..=63
//!  +---+-----------+
//!
//! Extended form (top bits == 11):
//!   7 6 5 4 3 2 1 0    7 6 5 4 3 2 1 0
//!  +---+---+-------+  +---------------+
//!  |1 1|mod| count |  |  count (low)  |   count 0..=4095
//!  +---+---+-------+  +---------------+
//! ```
//!
//! Mode bits: `00` YCrCb, `01` transparent, `10` RGB. In the extended form
//! the mode sits in bits 5..4 and `11` there is the reserved mode.

use crate::error::TruncatedExt;
use crate::{ColorMode, XmgError, EXTENDED_FLAG, MAX_EXTENDED_COUNT, MAX_SHORT_COUNT};
use xmg_io::ByteCursor;

/// One opcode: a color mode and how many tiles use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub mode: ColorMode,
    pub count: u16,
    /// First opcode byte as read, kept for error reporting.
    pub opcode: u8,
}

impl Run {
    /// Read one opcode (one or two bytes).
    ///
    /// A reserved mode is returned as a normal [`Run`]; rejecting it is the
    /// decoder's decision.
    ///
    /// # Errors
    ///
    /// [`XmgError::Truncated`] if the stream ends inside the opcode.
    pub fn read(stream: &mut ByteCursor) -> Result<Self, XmgError> {
        let op = stream.read_u8().truncated("run opcode", stream)?;
        if op & EXTENDED_FLAG != EXTENDED_FLAG {
            return Ok(Self::short(op));
        }
        let ext = stream.read_u8().truncated("extended run count", stream)?;
        Ok(Self::extended(op, ext))
    }

    /// Decode a single-byte opcode.
    ///
    /// ```
    /// use xmg_codec::{ColorMode, Run};
    ///
    /// let run = Run::short(0x05);
    /// assert_eq!((run.mode, run.count), (ColorMode::YCrCb, 5));
    /// ```
    pub const fn short(op: u8) -> Self {
        Self {
            mode: ColorMode::from_selector(op),
            count: (op & 0x3F) as u16,
            opcode: op,
        }
    }

    /// Decode a two-byte opcode.
    ///
    /// ```
    /// use xmg_codec::{ColorMode, Run};
    ///
    /// let run = Run::extended(0xC3, 0x10);
    /// assert_eq!(run.count, 0x310);
    /// assert_eq!(run.mode, ColorMode::YCrCb);
    /// ```
    pub const fn extended(op: u8, ext: u8) -> Self {
        Self {
            mode: ColorMode::from_selector(op << 2),
            count: ((op & 0x0F) as u16) << 8 | ext as u16,
            opcode: op,
        }
    }

    /// Opcode bytes that encode `mode` and `count` in the shortest form.
    ///
    /// Counts above [`MAX_EXTENDED_COUNT`] are clamped. The reserved mode can
    /// only be expressed in the extended form.
    pub fn encode(mode: ColorMode, count: u16) -> Vec<u8> {
        if count <= MAX_SHORT_COUNT && mode != ColorMode::Reserved {
            vec![mode.selector() | count as u8]
        } else {
            Self::encode_extended(mode, count).to_vec()
        }
    }

    /// Two-byte form regardless of count.
    pub fn encode_extended(mode: ColorMode, count: u16) -> [u8; 2] {
        let count = count.min(MAX_EXTENDED_COUNT);
        [
            EXTENDED_FLAG | mode.selector() >> 2 | (count >> 8) as u8,
            count as u8,
        ]
    }

    /// Payload bytes the whole run occupies after its opcode.
    pub fn payload_len(&self) -> Option<usize> {
        self.mode
            .payload_len()
            .map(|per_tile| per_tile * self.count as usize)
    }
}
