//! YCrCb tile decoder - chroma-subsampled luma blocks.
//!
//! # Wire Format
//!
//! ```text
//! +----+----+----+----+----+----+
//! | y0 | y1 | y2 | y3 | cr | cb |   6 bytes
//! +----+----+----+----+----+----+
//! ```
//!
//! `y0..y3` are the luma samples of the top-left, top-right, bottom-left and
//! bottom-right pixels. The single chroma pair is shared by all four, which is
//! 4:2:0 subsampling over the block.
//!
//! Conversion uses 10-bit fixed-point coefficients with arithmetic shifts,
//! so results are bit-exact with existing assets:
//!
//! ```text
//! r = y + (1357 * (cr - 128) >> 10)
//! g = y - ( 691 * (cr - 128) >> 10) - (333 * (cb - 128) >> 10)
//! b = y + (1715 * (cb - 128) >> 10)
//! ```
//!
//! Every pixel of a YCrCb block is fully opaque.

use crate::error::TruncatedExt;
use crate::{Block, ColorMode, TileDecoder, XmgError, XmgHeader};
use xmg_io::{ByteCursor, ByteWriter};
use xmg_pixelbuffer::Color;

/// Payload bytes per YCrCb tile.
pub const PAYLOAD_LEN: usize = 6;

/// Convert one YCbCr sample to 8-bit RGB.
///
/// ```
/// use xmg_codec::ycbcr_to_rgb;
///
/// // Neutral chroma leaves luma untouched.
/// assert_eq!(ycbcr_to_rgb(90, 128, 128), [90, 90, 90]);
/// ```
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let y = y as i32;
    let u = cb as i32 - 128;
    let v = cr as i32 - 128;

    let r = y + ((1357 * v) >> 10);
    let g = y - ((691 * v) >> 10) - ((333 * u) >> 10);
    let b = y + ((1715 * u) >> 10);

    [clamp_channel(r), clamp_channel(g), clamp_channel(b)]
}

fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Raw contents of one YCrCb tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YCrCbTile {
    /// Top-left, top-right, bottom-left, bottom-right luma.
    pub luma: [u8; 4],
    pub cr: u8,
    pub cb: u8,
}

impl YCrCbTile {
    /// Tile with the same luma everywhere.
    pub const fn flat(y: u8, cr: u8, cb: u8) -> Self {
        Self {
            luma: [y; 4],
            cr,
            cb,
        }
    }

    /// Append the tile payload in wire order.
    pub fn write(&self, out: &mut ByteWriter) {
        out.write_bytes(&self.luma);
        out.write_u8(self.cr);
        out.write_u8(self.cb);
    }

    /// Convert to four opaque pixels.
    pub fn to_block(&self) -> Block {
        self.luma.map(|y| {
            let [r, g, b] = ycbcr_to_rgb(y, self.cb, self.cr);
            Color::from_rgba(r, g, b, u8::MAX)
        })
    }
}

/// Decoder for [`ColorMode::YCrCb`] tiles.
pub struct YCrCbDecoder;

impl TileDecoder for YCrCbDecoder {
    fn color_mode(&self) -> ColorMode {
        ColorMode::YCrCb
    }

    fn payload_len(&self) -> usize {
        PAYLOAD_LEN
    }

    fn decode_block(
        &self,
        stream: &mut ByteCursor,
        _header: &XmgHeader,
    ) -> Result<Block, XmgError> {
        let [y0, y1, y2, y3, cr, cb] = stream
            .read_array::<PAYLOAD_LEN>()
            .truncated("YCrCb tile", stream)?;

        Ok(YCrCbTile {
            luma: [y0, y1, y2, y3],
            cr,
            cb,
        }
        .to_block())
    }
}
