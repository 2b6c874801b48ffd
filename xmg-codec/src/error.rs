//! Error types for XMG decoding.

use std::io;
use thiserror::Error;
use xmg_io::ByteCursor;

/// Errors that end an XMG decode.
///
/// Every variant is fatal: no pixel buffer is returned alongside it. Advisory
/// header conditions are reported as [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum XmgError {
    /// The stream ended inside the header, an opcode or a tile payload.
    #[error("Truncated stream: {what} at offset {offset}")]
    Truncated {
        what: &'static str,
        offset: usize,
        #[source]
        source: io::Error,
    },

    /// A run selected the reserved fourth color mode.
    #[error("Unsupported color mode in opcode {opcode:#04x} at offset {offset}")]
    UnsupportedColorMode { opcode: u8, offset: usize },

    /// The header describes an image larger than the configured [`Limits`](crate::Limits).
    #[error("Image {width}x{height} exceeds limits: {reason}")]
    LimitExceeded {
        width: u32,
        height: u32,
        reason: String,
    },
}

impl XmgError {
    /// Returns true if the stream simply ran out of bytes.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Byte offset at which the failure was detected, if it relates to a position.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Truncated { offset, .. } | Self::UnsupportedColorMode { offset, .. } => {
                Some(*offset)
            }
            Self::LimitExceeded { .. } => None,
        }
    }
}

/// Attaches what was being read, and where, to a cursor read failure.
pub(crate) trait TruncatedExt<T> {
    fn truncated(self, what: &'static str, stream: &ByteCursor) -> Result<T, XmgError>;
}

impl<T> TruncatedExt<T> for io::Result<T> {
    fn truncated(self, what: &'static str, stream: &ByteCursor) -> Result<T, XmgError> {
        // Failed cursor reads consume nothing, so the position is the value's start.
        self.map_err(|source| XmgError::Truncated {
            what,
            offset: stream.position(),
            source,
        })
    }
}
