//! Packed 32-bit RGBA color.
//!
//! XMG surfaces store every pixel as a single `u32` laid out as
//! `A << 24 | B << 16 | G << 8 | R`. Read as little-endian bytes this is
//! `R, G, B, A`, which is the byte order handed to renderers and PNG writers.
//!
//! The transparent key color stored in an XMG header uses the same packing, so
//! header values and decoded pixels can be compared directly.
//!
//! # Example
//!
//! ```
//! use xmg_pixelbuffer::Color;
//!
//! let c = Color::from_rgba(0x11, 0x22, 0x33, 0xFF);
//! assert_eq!(c.packed(), 0xFF33_2211);
//! assert_eq!(c.to_rgba8(), [0x11, 0x22, 0x33, 0xFF]);
//! assert_eq!(c.rgb24(), 0x33_2211);
//! ```

/// A pixel value in packed `A|B|G|R` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Color(u32);

impl Color {
    /// All channels zero.
    pub const TRANSPARENT: Color = Color(0);

    /// Mask selecting the alpha byte of a packed color.
    pub const ALPHA_MASK: u32 = 0xFF00_0000;

    /// Mask selecting the 24 color bits of a packed color.
    pub const RGB_MASK: u32 = 0x00FF_FFFF;

    /// Wraps an already packed value.
    pub const fn from_packed(value: u32) -> Self {
        Self(value)
    }

    /// Builds a color from individual channels.
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32)
    }

    /// Builds a color from `[r, g, b, a]` bytes.
    pub const fn from_rgba8(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// The raw packed value.
    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        self.0 as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The low 24 color bits, alpha discarded.
    pub const fn rgb24(self) -> u32 {
        self.0 & Self::RGB_MASK
    }

    /// Same color with the alpha byte replaced.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self(self.rgb24() | (alpha as u32) << 24)
    }

    /// Same color with alpha forced to 255.
    pub const fn opaque(self) -> Self {
        self.with_alpha(u8::MAX)
    }

    pub const fn is_opaque(self) -> bool {
        self.a() == u8::MAX
    }

    /// Returns the `[r, g, b, a]` byte representation.
    pub const fn to_rgba8(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Composites `self` over `dst` (straight, non-premultiplied alpha).
    ///
    /// A fully transparent source leaves `dst` unchanged and a fully opaque
    /// source replaces it, so key-colored pixels never disturb what is below.
    pub fn blend_over(self, dst: Color) -> Color {
        let alpha = self.a() as u32;
        match alpha {
            0 => dst,
            255 => self,
            _ => {
                let inv = 255 - alpha;
                let mix = |s: u8, d: u8| ((s as u32 * alpha + d as u32 * inv + 127) / 255) as u8;
                let out_alpha = alpha + (dst.a() as u32 * inv + 127) / 255;
                Color::from_rgba(
                    mix(self.r(), dst.r()),
                    mix(self.g(), dst.g()),
                    mix(self.b(), dst.b()),
                    out_alpha.min(255) as u8,
                )
            }
        }
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self::from_packed(value)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.packed()
    }
}
