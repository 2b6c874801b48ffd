//! 2×2 block placement.
//!
//! Tiles are laid down left to right. Each tile covers columns `x, x + 1` of
//! rows `y, y + 1`; after a tile the cursor moves two columns right. Once the
//! column reaches the image width the decoder wraps the cursor: column back
//! to zero, row down by two.
//!
//! Stored images were produced by an encoder that walked a raw pixel pointer:
//! two pixels forward per tile, plus one full stride on each wrap. A full row
//! of tiles has already walked one stride, so the wrap step lands exactly on
//! the row two below. Plain `y * stride + x` indexing therefore reproduces the
//! addressing of those files while keeping every write bounds-checked.

use crate::Block;
use xmg_pixelbuffer::MutablePixelBuffer;

/// Offsets of the four block pixels, in [`Block`] order.
const BLOCK_OFFSETS: [(u32, u32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Write position of the next 2×2 block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCursor {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    clipped: u64,
}

impl BlockCursor {
    /// Cursor at the top-left block of a `width × height` image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            clipped: 0,
        }
    }

    /// Top-left pixel of the current block.
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// True once the column has run past the last block of the row pair.
    pub fn at_row_end(&self) -> bool {
        self.x >= self.width
    }

    /// Move to the start of the next row pair.
    ///
    /// Returns `false` when that row pair does not fit in the image, meaning
    /// the image is complete.
    ///
    /// ```
    /// use xmg_codec::BlockCursor;
    ///
    /// let mut cursor = BlockCursor::new(4, 4);
    /// assert!(cursor.wrap());
    /// assert_eq!(cursor.position(), (0, 2));
    /// assert!(!cursor.wrap());
    /// ```
    pub fn wrap(&mut self) -> bool {
        self.x = 0;
        self.y = self.y.saturating_add(2);
        self.y.saturating_add(1) < self.height
    }

    /// Move one block to the right.
    pub fn advance(&mut self) {
        self.x = self.x.saturating_add(2);
    }

    /// Write `block` at the current position.
    ///
    /// Pixels outside the buffer are dropped and counted; the number of
    /// pixels actually written is returned.
    pub fn write_block<B: MutablePixelBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        block: &Block,
    ) -> usize {
        let mut written = 0;
        for (&(dx, dy), &color) in BLOCK_OFFSETS.iter().zip(block.iter()) {
            let placed = match (self.x.checked_add(dx), self.y.checked_add(dy)) {
                (Some(x), Some(y)) => buffer.set_pixel(x, y, color),
                _ => false,
            };
            if placed {
                written += 1;
            } else {
                self.clipped += 1;
            }
        }
        written
    }

    /// Pixels dropped so far because they fell outside the image.
    pub fn clipped(&self) -> u64 {
        self.clipped
    }
}
