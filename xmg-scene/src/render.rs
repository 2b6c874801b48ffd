//! Render target collaborator.

use anyhow::Result;
use tracing::{debug, trace};
use xmg_common::Point;
use xmg_pixelbuffer::{ManagedPixelBuffer, MutablePixelBuffer};

/// Anything that can draw a decoded surface at a screen position.
pub trait RenderTarget {
    /// Draw `surface` with its top-left corner at `origin`.
    ///
    /// # Errors
    ///
    /// Implementation specific; the software canvas never fails.
    fn draw_surface(&mut self, surface: &ManagedPixelBuffer, origin: Point) -> Result<()>;
}

/// Software canvas: source-over compositing with clipping, so key-colored
/// (alpha 0) pixels leave the canvas untouched.
impl RenderTarget for ManagedPixelBuffer {
    fn draw_surface(&mut self, surface: &ManagedPixelBuffer, origin: Point) -> Result<()> {
        match self.composite(surface, origin) {
            Some(region) => trace!("Drew surface at {:?}, visible {:?}", origin, region),
            None => debug!(
                "Surface {}x{} at {:?} lies outside the {}x{} canvas",
                surface.width(),
                surface.height(),
                origin,
                self.width(),
                self.height()
            ),
        }
        Ok(())
    }
}
