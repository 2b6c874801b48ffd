//! RGB tile decoder - four raw 24-bit colors.
//!
//! # Wire Format
//!
//! ```text
//! +---------+----+---------+----+---------+----+---------+----+
//! | lo (u16)| hi | lo (u16)| hi | lo (u16)| hi | lo (u16)| hi |   12 bytes
//! +---------+----+---------+----+---------+----+---------+----+
//!   top-left    top-right    bottom-left  bottom-right
//! ```
//!
//! Each color is `lo | hi << 16`, i.e. the bytes `R, G, B`.
//!
//! # Key Color
//!
//! A color equal to the low 24 bits of the header's transparent color is
//! stored with alpha 0, so a renderer treats it as a hole. Every other color
//! gets alpha 255.

use crate::error::TruncatedExt;
use crate::{Block, ColorMode, TileDecoder, XmgError, XmgHeader};
use xmg_io::{ByteCursor, ByteWriter};
use xmg_pixelbuffer::Color;

/// Payload bytes per RGB tile.
pub const PAYLOAD_LEN: usize = 12;

/// Decoder for [`ColorMode::Rgb`] tiles.
pub struct RgbDecoder;

impl RgbDecoder {
    fn read_color(stream: &mut ByteCursor, key: u32) -> Result<Color, XmgError> {
        let low = stream.read_u16_le().truncated("RGB tile color", stream)?;
        let high = stream.read_u8().truncated("RGB tile color", stream)?;
        let rgb = low as u32 | (high as u32) << 16;

        let color = Color::from_packed(rgb);
        Ok(if rgb == key { color } else { color.opaque() })
    }

    /// Append one tile in wire order; colors are taken from their low 24 bits.
    pub fn write_tile(out: &mut ByteWriter, colors: &[u32; 4]) {
        for &color in colors {
            out.write_u16_le(color as u16);
            out.write_u8((color >> 16) as u8);
        }
    }
}

impl TileDecoder for RgbDecoder {
    fn color_mode(&self) -> ColorMode {
        ColorMode::Rgb
    }

    fn payload_len(&self) -> usize {
        PAYLOAD_LEN
    }

    fn decode_block(
        &self,
        stream: &mut ByteCursor,
        header: &XmgHeader,
    ) -> Result<Block, XmgError> {
        let key = header.key_color().rgb24();
        Ok([
            Self::read_color(stream, key)?,
            Self::read_color(stream, key)?,
            Self::read_color(stream, key)?,
            Self::read_color(stream, key)?,
        ])
    }
}
