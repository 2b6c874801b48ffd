//! Decoding for XMG still images.
//!
//! An XMG file is a 28-byte little-endian header followed by a stream of
//! run opcodes. Each run names a color mode and a repeat count, and every
//! repetition produces one 2×2 pixel block ("tile"). Blocks are laid down left
//! to right across a pair of rows, then the cursor drops two rows and starts
//! again at column zero.
//!
//! # Key Concepts
//!
//! - **Synchronous decoding**: [`XmgDecoder::decode`] runs to completion in one
//!   call and returns an owned [`ManagedPixelBuffer`]
//! - **Block-based**: tile decoders produce one [`Block`] at a time; the
//!   [`BlockCursor`] places it and clips anything outside the image
//! - **Fail-fast policy**: a reserved color mode or a stream that ends inside a
//!   run is a hard error, never a partial image
//! - **Advisory header checks**: an unknown version or a surprising stride are
//!   reported as [`Diagnostic`]s and decoding carries on
//!
//! # Example
//!
//! ```
//! use xmg_codec::{XmgDecoder, XmgHeader, XmgWriter};
//! use xmg_pixelbuffer::{Color, PixelBuffer};
//!
//! let header = XmgHeader::new(2, 2, 0x0000_0000);
//! let mut writer = XmgWriter::new(&header);
//! writer.transparent_tiles(1);
//!
//! let image = XmgDecoder::new().decode(writer.finish()).unwrap();
//! assert_eq!(image.pixels.dimensions(), (2, 2));
//! assert!(image.pixels.data().iter().all(|c| *c == Color::TRANSPARENT));
//! ```
//!
//! # Color Modes
//!
//! - [`ColorMode::YCrCb`]: four luma samples sharing one chroma pair (6 bytes)
//! - [`ColorMode::Transparent`]: the header's key color, no payload
//! - [`ColorMode::Rgb`]: four 24-bit colors (12 bytes), key-color aware
//! - [`ColorMode::Reserved`]: never valid, decoding aborts

use xmg_io::ByteCursor;
use xmg_pixelbuffer::Color;

pub use xmg_pixelbuffer::ManagedPixelBuffer;

pub mod block;
pub use block::BlockCursor;

pub mod decoder;
pub use decoder::{decode, Completion, DecodedImage, XmgDecoder};

pub mod error;
pub use error::XmgError;

pub mod header;
pub use header::{Diagnostic, XmgHeader};

pub mod limits;
pub use limits::Limits;

pub mod opcode;
pub use opcode::Run;

// Tile decoders
pub mod ycrcb;
pub use ycrcb::{ycbcr_to_rgb, YCrCbDecoder, YCrCbTile};

pub mod trans;
pub use trans::TransparentDecoder;

pub mod rgb;
pub use rgb::RgbDecoder;

pub mod writer;
pub use writer::XmgWriter;

/// The only format version observed in shipped files.
pub const XMG_VERSION: u32 = 3;

/// Size of the fixed header in bytes (seven little-endian `u32` fields).
pub const HEADER_LEN: usize = 28;

/// Largest count a single-byte opcode can carry.
pub const MAX_SHORT_COUNT: u16 = 0x3F;

/// Largest count a two-byte opcode can carry.
pub const MAX_EXTENDED_COUNT: u16 = 0x0FFF;

/// Top-bit pattern marking a two-byte opcode.
pub const EXTENDED_FLAG: u8 = 0xC0;

/// One decoded 2×2 block: top-left, top-right, bottom-left, bottom-right.
pub type Block = [Color; 4];

/// How the tiles of a run are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Chroma-subsampled luma block.
    YCrCb,
    /// Key-color fill.
    Transparent,
    /// Four raw 24-bit colors.
    Rgb,
    /// Fourth selector value; no decoder exists for it.
    Reserved,
}

impl ColorMode {
    /// Maps the two selector bits (already positioned at bits 7..6) to a mode.
    ///
    /// ```
    /// use xmg_codec::ColorMode;
    ///
    /// assert_eq!(ColorMode::from_selector(0x00), ColorMode::YCrCb);
    /// assert_eq!(ColorMode::from_selector(0x7F), ColorMode::Transparent);
    /// assert_eq!(ColorMode::from_selector(0x80), ColorMode::Rgb);
    /// assert_eq!(ColorMode::from_selector(0xC0), ColorMode::Reserved);
    /// ```
    pub const fn from_selector(bits: u8) -> Self {
        match bits & 0xC0 {
            0x00 => ColorMode::YCrCb,
            0x40 => ColorMode::Transparent,
            0x80 => ColorMode::Rgb,
            _ => ColorMode::Reserved,
        }
    }

    /// Selector bits for this mode, positioned at bits 7..6.
    pub const fn selector(self) -> u8 {
        match self {
            ColorMode::YCrCb => 0x00,
            ColorMode::Transparent => 0x40,
            ColorMode::Rgb => 0x80,
            ColorMode::Reserved => 0xC0,
        }
    }

    /// Payload bytes consumed per tile, or `None` for [`ColorMode::Reserved`].
    pub const fn payload_len(self) -> Option<usize> {
        match self {
            ColorMode::YCrCb => Some(ycrcb::PAYLOAD_LEN),
            ColorMode::Transparent => Some(0),
            ColorMode::Rgb => Some(rgb::PAYLOAD_LEN),
            ColorMode::Reserved => None,
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColorMode::YCrCb => "YCrCb",
            ColorMode::Transparent => "transparent",
            ColorMode::Rgb => "RGB",
            ColorMode::Reserved => "reserved",
        };
        f.write_str(name)
    }
}

/// Core trait for the per-mode tile decoders.
///
/// # Contract
///
/// Implementors must:
/// - Consume exactly [`payload_len()`](Self::payload_len) bytes per block
/// - Fail with [`XmgError::Truncated`] if the stream ends inside a block
/// - Not touch the pixel buffer; placement is the [`BlockCursor`]'s job
///
/// # Example
///
/// ```
/// use xmg_codec::{Block, ColorMode, TileDecoder, XmgError, XmgHeader};
/// use xmg_io::ByteCursor;
/// use xmg_pixelbuffer::Color;
///
/// struct BlackDecoder;
///
/// impl TileDecoder for BlackDecoder {
///     fn color_mode(&self) -> ColorMode {
///         ColorMode::YCrCb
///     }
///
///     fn payload_len(&self) -> usize {
///         0
///     }
///
///     fn decode_block(&self, _: &mut ByteCursor, _: &XmgHeader) -> Result<Block, XmgError> {
///         Ok([Color::from_rgba(0, 0, 0, 255); 4])
///     }
/// }
///
/// assert_eq!(BlackDecoder.payload_len(), 0);
/// ```
pub trait TileDecoder {
    /// The color mode this decoder handles.
    fn color_mode(&self) -> ColorMode;

    /// Bytes consumed from the stream per block.
    fn payload_len(&self) -> usize;

    /// Decode a single block.
    ///
    /// # Errors
    ///
    /// Returns [`XmgError::Truncated`] if fewer than
    /// [`payload_len()`](Self::payload_len) bytes remain.
    fn decode_block(&self, stream: &mut ByteCursor, header: &XmgHeader)
        -> Result<Block, XmgError>;
}
