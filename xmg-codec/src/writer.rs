//! XMG stream writer.
//!
//! Produces byte streams the decoder accepts: a header followed by runs. The
//! decoder only wraps to the next row pair between runs, so tile slices are
//! split at every row end as well as at [`MAX_EXTENDED_COUNT`]. Each run uses
//! the single-byte opcode when its count fits.

use crate::opcode::Run;
use crate::{ColorMode, RgbDecoder, XmgHeader, YCrCbTile, MAX_EXTENDED_COUNT};
use bytes::Bytes;
use xmg_io::ByteWriter;

/// Builds an XMG byte stream.
///
/// ```
/// use xmg_codec::{decode, XmgHeader, XmgWriter, YCrCbTile};
///
/// let mut writer = XmgWriter::new(&XmgHeader::new(4, 2, 0));
/// writer
///     .ycrcb_tiles(&[YCrCbTile::flat(10, 128, 128)])
///     .rgb_tiles(&[[0xFF0000; 4]]);
///
/// let image = decode(writer.finish()).unwrap();
/// assert_eq!(image.pixels.data()[2].r(), 0x00);
/// assert_eq!(image.pixels.data()[2].b(), 0xFF);
/// ```
#[derive(Debug)]
pub struct XmgWriter {
    out: ByteWriter,
    /// Tiles in one row pair; zero for a zero-width image.
    row_tiles: usize,
    /// Tile column the next run starts at.
    column: usize,
}

impl XmgWriter {
    /// Start a stream with `header`.
    pub fn new(header: &XmgHeader) -> Self {
        let mut out = ByteWriter::with_capacity(crate::HEADER_LEN + 64);
        header.write(&mut out);
        Self {
            out,
            row_tiles: header.width.div_ceil(2) as usize,
            column: 0,
        }
    }

    /// Append an opcode in its shortest form. Counts are clamped to
    /// [`MAX_EXTENDED_COUNT`].
    ///
    /// The payload is up to the caller. A count that runs past the row end
    /// behaves as in the decoder: the extra tiles are clipped and the next
    /// run starts on the following row pair.
    pub fn run_header(&mut self, mode: ColorMode, count: u16) -> &mut Self {
        self.out.write_bytes(&Run::encode(mode, count));
        self.advance(count);
        self
    }

    /// Append a two-byte opcode even when a short one would do.
    pub fn extended_run_header(&mut self, mode: ColorMode, count: u16) -> &mut Self {
        self.out.write_bytes(&Run::encode_extended(mode, count));
        self.advance(count);
        self
    }

    pub fn ycrcb_tiles(&mut self, tiles: &[YCrCbTile]) -> &mut Self {
        let mut rest = tiles;
        while !rest.is_empty() {
            let (run, tail) = rest.split_at(self.next_run_len(rest.len()));
            self.run_header(ColorMode::YCrCb, run.len() as u16);
            for tile in run {
                tile.write(&mut self.out);
            }
            rest = tail;
        }
        self
    }

    /// Append `count` key-color tiles.
    pub fn transparent_tiles(&mut self, count: usize) -> &mut Self {
        let mut left = count;
        while left > 0 {
            let run = self.next_run_len(left);
            self.run_header(ColorMode::Transparent, run as u16);
            left -= run;
        }
        self
    }

    /// Append RGB tiles; each color is taken from its low 24 bits.
    pub fn rgb_tiles(&mut self, tiles: &[[u32; 4]]) -> &mut Self {
        let mut rest = tiles;
        while !rest.is_empty() {
            let (run, tail) = rest.split_at(self.next_run_len(rest.len()));
            self.run_header(ColorMode::Rgb, run.len() as u16);
            for tile in run {
                RgbDecoder::write_tile(&mut self.out, tile);
            }
            rest = tail;
        }
        self
    }

    /// Append bytes verbatim. The writer's column is not moved.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.out.write_bytes(bytes);
        self
    }

    /// Bytes written so far, header included.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn finish(self) -> Bytes {
        self.out.into_bytes()
    }

    /// Longest run of at most `left` tiles that stays within the current row
    /// pair. Never zero while `left` is not.
    fn next_run_len(&self, left: usize) -> usize {
        let room = if self.row_tiles == 0 {
            usize::MAX
        } else {
            self.row_tiles - self.column
        };
        left.min(room).min(MAX_EXTENDED_COUNT as usize)
    }

    fn advance(&mut self, count: u16) {
        if self.row_tiles == 0 {
            return;
        }
        self.column += usize::from(count.min(MAX_EXTENDED_COUNT));
        if self.column >= self.row_tiles {
            self.column = 0;
        }
    }
}
