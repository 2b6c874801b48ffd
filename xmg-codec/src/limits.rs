//! Resource limits checked before a surface is allocated.
//!
//! The header alone decides how much memory a decode allocates, so a corrupt
//! or hostile file could ask for a multi-gigabyte surface. [`Limits`] caps the
//! dimensions up front; `None` means no limit for that field.

use crate::{XmgError, XmgHeader};
use serde::{Deserialize, Serialize};

/// Default cap on either dimension.
pub const DEFAULT_MAX_DIMENSION: u32 = 16_384;

/// Default cap on total pixels (64 Mpx, 256 MiB of RGBA).
pub const DEFAULT_MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Caps on decoded image size.
///
/// # Example
///
/// ```
/// use xmg_codec::{Limits, XmgHeader};
///
/// let limits = Limits::none().with_max_width(1024);
/// assert!(limits.check(&XmgHeader::new(1024, 8, 0)).is_ok());
/// assert!(limits.check(&XmgHeader::new(1026, 8, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default)]
    pub max_width: Option<u32>,
    #[serde(default)]
    pub max_height: Option<u32>,
    #[serde(default)]
    pub max_pixels: Option<u64>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_width: Some(DEFAULT_MAX_DIMENSION),
            max_height: Some(DEFAULT_MAX_DIMENSION),
            max_pixels: Some(DEFAULT_MAX_PIXELS),
        }
    }
}

impl Limits {
    /// No limits at all.
    pub fn none() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_pixels: None,
        }
    }

    #[must_use]
    pub fn with_max_width(mut self, max: u32) -> Self {
        self.max_width = Some(max);
        self
    }

    #[must_use]
    pub fn with_max_height(mut self, max: u32) -> Self {
        self.max_height = Some(max);
        self
    }

    #[must_use]
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Check a header against these limits.
    ///
    /// # Errors
    ///
    /// [`XmgError::LimitExceeded`] naming the first limit that fails. A surface
    /// that cannot be addressed on this platform always fails.
    pub fn check(&self, header: &XmgHeader) -> Result<(), XmgError> {
        self.check_dimensions(header.width, header.height)
    }

    /// Check a surface size against these limits.
    ///
    /// # Errors
    ///
    /// As [`Limits::check`].
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), XmgError> {
        let exceeded = |reason: String| XmgError::LimitExceeded {
            width,
            height,
            reason,
        };

        if let Some(max) = self.max_width {
            if width > max {
                return Err(exceeded(format!("width above {}", max)));
            }
        }
        if let Some(max) = self.max_height {
            if height > max {
                return Err(exceeded(format!("height above {}", max)));
            }
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max) = self.max_pixels {
            if pixels > max {
                return Err(exceeded(format!("{} pixels above {}", pixels, max)));
            }
        }
        if usize::try_from(pixels).is_err() {
            return Err(exceeded(format!("{} pixels not addressable", pixels)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert!(limits.check(&XmgHeader::new(640, 480, 0)).is_ok());
        assert!(limits.check(&XmgHeader::new(16_385, 1, 0)).is_err());
        assert!(limits.check(&XmgHeader::new(1, 16_385, 0)).is_err());
        // Both sides in range but too many pixels overall.
        assert!(limits.check(&XmgHeader::new(16_384, 16_384, 0)).is_err());
    }

    #[test]
    fn test_check_dimensions() {
        let limits = Limits::none().with_max_pixels(100);
        assert!(limits.check_dimensions(10, 10).is_ok());
        let err = limits.check_dimensions(10, 11).unwrap_err();
        assert_eq!(err.to_string(), "Image 10x11 exceeds limits: 110 pixels above 100");
    }

    #[test]
    fn test_none_allows_large_headers() {
        assert!(Limits::none().check(&XmgHeader::new(100_000, 2, 0)).is_ok());
    }

    #[test]
    fn test_reason_names_failing_limit() {
        let err = Limits::none()
            .with_max_height(10)
            .check(&XmgHeader::new(4, 12, 0))
            .unwrap_err();
        assert_eq!(err.to_string(), "Image 4x12 exceeds limits: height above 10");

        let err = Limits::none()
            .with_max_pixels(15)
            .check(&XmgHeader::new(4, 4, 0))
            .unwrap_err();
        assert!(err.to_string().contains("16 pixels above 15"));
    }
}
