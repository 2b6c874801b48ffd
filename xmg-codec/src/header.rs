//! XMG file header.
//!
//! # Wire Format
//!
//! ```text
//! +-------------------+
//! | version           |  4 bytes (u32 LE), 3 in every known file
//! +-------------------+
//! | transparent color |  4 bytes (packed A|B|G|R)
//! +-------------------+
//! | width             |  4 bytes
//! +-------------------+
//! | height            |  4 bytes
//! +-------------------+
//! | declared stride   |  4 bytes, bytes per row of a 24-bit image (3 * width)
//! +-------------------+
//! | reserved 1        |  4 bytes
//! +-------------------+
//! | reserved 2        |  4 bytes
//! +-------------------+
//! | opcode stream...  |
//! ```
//!
//! The declared stride describes a 3-byte-per-pixel layout that the decoder
//! never uses: decoded surfaces hold one packed RGBA pixel per column, so the
//! effective stride is always the width.

use crate::error::TruncatedExt;
use crate::{XmgError, XMG_VERSION};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use xmg_io::{ByteCursor, ByteWriter};
use xmg_pixelbuffer::Color;

/// Parsed XMG header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmgHeader {
    pub version: u32,
    /// Key color in packed `A|B|G|R` form.
    pub transparent_color: u32,
    pub width: u32,
    pub height: u32,
    /// Row stride as stored in the file; informational only.
    pub declared_stride: u32,
    pub reserved1: u32,
    pub reserved2: u32,
}

/// Non-fatal header observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The version field is not [`XMG_VERSION`].
    UnknownVersion { version: u32 },
    /// The declared stride is not `3 * width`.
    StrideMismatch { declared: u32, expected: u64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownVersion { version } => {
                write!(f, "unknown file version {} (expected {})", version, XMG_VERSION)
            }
            Diagnostic::StrideMismatch { declared, expected } => write!(
                f,
                "declared scan length {} does not match the width bytes {}",
                declared, expected
            ),
        }
    }
}

impl XmgHeader {
    /// Header for a version 3 image with a consistent declared stride.
    ///
    /// ```
    /// use xmg_codec::XmgHeader;
    ///
    /// let header = XmgHeader::new(64, 32, 0x00FF_00FF);
    /// assert_eq!(header.declared_stride, 192);
    /// assert!(header.diagnostics().is_empty());
    /// ```
    pub fn new(width: u32, height: u32, transparent_color: u32) -> Self {
        Self {
            version: XMG_VERSION,
            transparent_color,
            width,
            height,
            declared_stride: width.wrapping_mul(3),
            reserved1: 0,
            reserved2: 0,
        }
    }

    /// Read the seven header fields from the start of a stream.
    ///
    /// Never rejects a header on content; see [`diagnostics()`](Self::diagnostics).
    ///
    /// # Errors
    ///
    /// [`XmgError::Truncated`] if the stream is shorter than the header.
    pub fn read(stream: &mut ByteCursor) -> Result<Self, XmgError> {
        let version = stream.read_u32_le().truncated("header version", stream)?;
        let transparent_color = stream
            .read_u32_le()
            .truncated("header transparent color", stream)?;
        let width = stream.read_u32_le().truncated("header width", stream)?;
        let height = stream.read_u32_le().truncated("header height", stream)?;
        let declared_stride = stream.read_u32_le().truncated("header stride", stream)?;
        let reserved1 = stream.read_u32_le().truncated("header reserved1", stream)?;
        let reserved2 = stream.read_u32_le().truncated("header reserved2", stream)?;

        debug!(
            "XMG header: version={}, transparent_color={:#010x}, size={}x{}",
            version, transparent_color, width, height
        );
        debug!(
            "XMG header: reserved1={:#010x} ({}), reserved2={:#010x} ({})",
            reserved1, reserved1, reserved2, reserved2
        );

        Ok(Self {
            version,
            transparent_color,
            width,
            height,
            declared_stride,
            reserved1,
            reserved2,
        })
    }

    /// Write the header in wire format.
    pub fn write(&self, out: &mut ByteWriter) {
        out.write_u32_le(self.version);
        out.write_u32_le(self.transparent_color);
        out.write_u32_le(self.width);
        out.write_u32_le(self.height);
        out.write_u32_le(self.declared_stride);
        out.write_u32_le(self.reserved1);
        out.write_u32_le(self.reserved2);
    }

    /// Row stride of the decoded surface in pixels; always the width.
    pub fn effective_stride(&self) -> u32 {
        self.width
    }

    /// Stride a 24-bit image of this width is expected to declare.
    pub fn expected_stride(&self) -> u64 {
        3 * self.width as u64
    }

    /// The key color as a [`Color`].
    pub fn key_color(&self) -> Color {
        Color::from_packed(self.transparent_color)
    }

    /// Total pixels in the decoded surface.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Advisory observations about this header, in field order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        if self.version != XMG_VERSION {
            found.push(Diagnostic::UnknownVersion {
                version: self.version,
            });
        }
        if self.declared_stride as u64 != self.expected_stride() {
            found.push(Diagnostic::StrideMismatch {
                declared: self.declared_stride,
                expected: self.expected_stride(),
            });
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HEADER_LEN;

    fn header_bytes(fields: [u32; 7]) -> Vec<u8> {
        fields.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    #[test]
    fn test_read_header() {
        let bytes = header_bytes([3, 0x00FF_00FF, 640, 480, 1920, 0xAA, 0xBB]);
        let mut stream = ByteCursor::new(bytes);
        let header = XmgHeader::read(&mut stream).unwrap();

        assert_eq!(header.version, 3);
        assert_eq!(header.transparent_color, 0x00FF_00FF);
        assert_eq!(header.width, 640);
        assert_eq!(header.height, 480);
        assert_eq!(header.declared_stride, 1920);
        assert_eq!(header.reserved1, 0xAA);
        assert_eq!(header.reserved2, 0xBB);
        assert_eq!(stream.position(), HEADER_LEN);
        assert!(header.diagnostics().is_empty());
    }

    #[test]
    fn test_effective_stride_ignores_declared() {
        for declared in [0, 7, 1920, u32::MAX] {
            let mut header = XmgHeader::new(640, 2, 0);
            header.declared_stride = declared;
            assert_eq!(header.effective_stride(), 640);
        }
    }

    #[test]
    fn test_unknown_version_is_advisory() {
        let bytes = header_bytes([4, 0, 2, 2, 6, 0, 0]);
        let header = XmgHeader::read(&mut ByteCursor::new(bytes)).unwrap();
        assert_eq!(
            header.diagnostics(),
            vec![Diagnostic::UnknownVersion { version: 4 }]
        );
    }

    #[test]
    fn test_stride_mismatch_is_advisory() {
        let bytes = header_bytes([3, 0, 10, 2, 40, 0, 0]);
        let header = XmgHeader::read(&mut ByteCursor::new(bytes)).unwrap();
        let diagnostics = header.diagnostics();
        assert_eq!(
            diagnostics,
            vec![Diagnostic::StrideMismatch {
                declared: 40,
                expected: 30
            }]
        );
        assert_eq!(
            diagnostics[0].to_string(),
            "declared scan length 40 does not match the width bytes 30"
        );
    }

    #[test]
    fn test_truncated_header() {
        let bytes = header_bytes([3, 0, 2, 2, 6, 0, 0]);
        let mut stream = ByteCursor::new(bytes[..HEADER_LEN - 1].to_vec());
        let err = XmgHeader::read(&mut stream).unwrap_err();
        assert!(err.is_truncation());
        assert_eq!(err.offset(), Some(24));
    }

    #[test]
    fn test_write_matches_wire_layout() {
        let header = XmgHeader::new(2, 4, 0x1122_3344);
        let mut out = ByteWriter::new();
        header.write(&mut out);
        assert_eq!(out.as_slice(), header_bytes([3, 0x1122_3344, 2, 4, 6, 0, 0]));
    }

    #[test]
    fn test_key_color() {
        let header = XmgHeader::new(1, 1, 0x00FF_00FF);
        assert_eq!(header.key_color().rgb24(), 0xFF_00FF);
        assert_eq!(header.key_color().a(), 0);
        assert_eq!(header.pixel_count(), 1);
    }
}
