//! Pixel buffer traits.
//!
//! - [`PixelBuffer`]: read-only access to pixel data
//! - [`MutablePixelBuffer`]: bounds-checked writes and compositing
//!
//! # Addressing
//!
//! Pixels are addressed by `(x, y)` with `0 <= x < width` and `0 <= y < height`.
//! Implementations compute the storage index as `y * stride + x` where the
//! stride is measured in **pixels**. Writes that fall outside the buffer are
//! never performed: single-pixel writes report that they were clipped, and
//! rectangle operations either clip or fail depending on the method.

use crate::Color;
use anyhow::Result;
use xmg_common::{Point, Rect};

/// Read-only pixel buffer access.
///
/// # Example
///
/// ```
/// use xmg_pixelbuffer::{Color, ManagedPixelBuffer, PixelBuffer};
///
/// let buffer = ManagedPixelBuffer::new(4, 2);
/// assert_eq!(buffer.dimensions(), (4, 2));
/// assert_eq!(buffer.pixel(3, 1), Some(Color::TRANSPARENT));
/// assert_eq!(buffer.pixel(4, 0), None);
/// ```
pub trait PixelBuffer {
    /// Returns the dimensions of the pixel buffer as (width, height).
    fn dimensions(&self) -> (u32, u32);

    /// Returns the pixel at `(x, y)`, or `None` outside the buffer.
    fn pixel(&self, x: u32, y: u32) -> Option<Color>;

    /// The full buffer area anchored at the origin.
    fn bounds(&self) -> Rect {
        let (width, height) = self.dimensions();
        Rect::new(0, 0, width, height)
    }
}

/// Mutable pixel buffer with rendering operations.
pub trait MutablePixelBuffer: PixelBuffer {
    /// Writes one pixel.
    ///
    /// Returns `false` when `(x, y)` lies outside the buffer, in which case
    /// nothing is written.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> bool;

    /// Fills a rectangle with a solid color.
    ///
    /// # Errors
    ///
    /// Fails if the rectangle is not fully inside the buffer.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    /// Composites `src` over this buffer with its top-left corner at `origin`.
    ///
    /// The source is clipped against this buffer. Pixels are blended with
    /// [`Color::blend_over`]. Returns the destination region that was touched,
    /// or `None` if the source lies entirely outside.
    fn composite(&mut self, src: &dyn PixelBuffer, origin: Point) -> Option<Rect> {
        let (src_width, src_height) = src.dimensions();
        let placed = Rect::at(origin, src_width, src_height);
        let visible = placed.intersect(&self.bounds())?;

        for dy in 0..visible.height {
            let dst_y = (visible.y as u32) + dy;
            let src_y = (i64::from(visible.y) - i64::from(origin.y)) as u32 + dy;
            for dx in 0..visible.width {
                let dst_x = (visible.x as u32) + dx;
                let src_x = (i64::from(visible.x) - i64::from(origin.x)) as u32 + dx;
                let (Some(s), Some(d)) = (src.pixel(src_x, src_y), self.pixel(dst_x, dst_y))
                else {
                    continue;
                };
                self.set_pixel(dst_x, dst_y, s.blend_over(d));
            }
        }

        Some(visible)
    }
}
