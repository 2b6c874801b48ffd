//! Owned RGBA surface.
//!
//! [`ManagedPixelBuffer`] owns its pixels in a `Vec<Color>` and implements the
//! [`PixelBuffer`] and [`MutablePixelBuffer`] traits. It is the surface a
//! decode allocates, fills and hands back by value.
//!
//! # Example
//!
//! ```
//! use xmg_pixelbuffer::{Color, ManagedPixelBuffer, MutablePixelBuffer, PixelBuffer};
//! use xmg_common::Rect;
//!
//! let mut buffer = ManagedPixelBuffer::new(100, 100);
//! let red = Color::from_rgba(255, 0, 0, 255);
//! buffer.fill_rect(Rect::new(10, 10, 50, 50), red).unwrap();
//!
//! assert_eq!(buffer.pixel(10, 10), Some(red));
//! assert_eq!(buffer.pixel(9, 10), Some(Color::TRANSPARENT));
//! ```

use crate::{Color, MutablePixelBuffer, PixelBuffer};
use anyhow::{anyhow, Result};
use xmg_common::Rect;

/// A pixel buffer that manages its own memory.
///
/// # Memory Layout
///
/// Row-major with a stride equal to the width, no padding:
///
/// ```text
/// Total size = W * H pixels
/// Pixel at (x, y) is at index y * W + x
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedPixelBuffer {
    /// Buffer width in pixels
    width: u32,

    /// Buffer height in pixels
    height: u32,

    /// Pixel data (row-major, no padding)
    data: Vec<Color>,

    /// Stride in **pixels** (always equals width for this implementation)
    stride: usize,
}

impl ManagedPixelBuffer {
    /// Creates a buffer with every pixel set to [`Color::TRANSPARENT`].
    ///
    /// ```
    /// use xmg_pixelbuffer::{ManagedPixelBuffer, PixelBuffer};
    ///
    /// let buffer = ManagedPixelBuffer::new(800, 600);
    /// assert_eq!(buffer.dimensions(), (800, 600));
    /// assert_eq!(buffer.stride(), 800);
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Creates a buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let stride = width as usize;
        let data = vec![color; stride * height as usize];

        Self {
            width,
            height,
            data,
            stride,
        }
    }

    /// Returns the stride in pixels.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Row-major pixel data.
    pub fn data(&self) -> &[Color] {
        &self.data
    }

    /// Returns the buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Storage index for `(x, y)`, or `None` if outside the buffer.
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.stride + x as usize)
    }

    /// Returns one row of pixels.
    pub fn row(&self, y: u32) -> Option<&[Color]> {
        let start = self.index_of(0, y)?;
        Some(&self.data[start..start + self.width as usize])
    }

    /// Copies the pixels out as tightly packed `R, G, B, A` bytes.
    ///
    /// ```
    /// use xmg_pixelbuffer::{Color, ManagedPixelBuffer};
    ///
    /// let buffer = ManagedPixelBuffer::filled(2, 1, Color::from_rgba(1, 2, 3, 4));
    /// assert_eq!(buffer.to_rgba8(), vec![1, 2, 3, 4, 1, 2, 3, 4]);
    /// ```
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    /// Validates that a rectangle is within buffer bounds.
    fn validate_rect(&self, rect: Rect) -> Result<()> {
        if rect.x < 0
            || rect.y < 0
            || rect.x as u64 + rect.width as u64 > self.width as u64
            || rect.y as u64 + rect.height as u64 > self.height as u64
        {
            return Err(anyhow!(
                "Rectangle out of bounds: {:?} (buffer size: {}x{})",
                rect,
                self.width,
                self.height
            ));
        }
        Ok(())
    }
}

impl PixelBuffer for ManagedPixelBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index_of(x, y).map(|i| self.data[i])
    }
}

impl MutablePixelBuffer for ManagedPixelBuffer {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.data[i] = color;
                true
            }
            None => false,
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.validate_rect(rect)?;

        for y in 0..rect.height as usize {
            let start = (rect.y as usize + y) * self.stride + rect.x as usize;
            self.data[start..start + rect.width as usize].fill(color);
        }

        Ok(())
    }
}
