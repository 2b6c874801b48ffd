//! Scene elements backed by XMG images.
//!
//! This crate connects the codec to its two collaborators:
//!
//! - an [`Archive`] that hands out the raw bytes of a named resource
//! - a [`RenderTarget`] that accepts a decoded surface and a screen origin
//!
//! [`XmgElement`] loads one image from an archive and draws it at a fixed
//! position. [`Scene`] does the same for a list of elements described by a
//! [`Config`].
//!
//! # Example
//!
//! ```
//! use xmg_codec::{XmgDecoder, XmgHeader, XmgWriter, YCrCbTile};
//! use xmg_common::Point;
//! use xmg_pixelbuffer::{ManagedPixelBuffer, PixelBuffer};
//! use xmg_scene::{MemoryArchive, XmgElement};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0));
//! writer.ycrcb_tiles(&[YCrCbTile::flat(255, 128, 128)]);
//! let archive = MemoryArchive::new().with_member("dot.xmg", writer.finish());
//!
//! let element = XmgElement::load(&archive, "dot.xmg", Point::new(3, 1), &XmgDecoder::new())
//!     .await
//!     .unwrap();
//!
//! let mut canvas = ManagedPixelBuffer::new(8, 8);
//! element.render(&mut canvas).unwrap();
//! assert_eq!(canvas.pixel(4, 2).unwrap().r(), 255);
//! # });
//! ```

pub mod archive;
pub use archive::{Archive, ArchiveError, DirectoryArchive, MemoryArchive};

pub mod config;
pub use config::{CanvasConfig, Config, ConfigBuilder, ConfigError, ElementConfig};

pub mod element;
pub use element::{Scene, XmgElement};

pub mod errors;
pub use errors::SceneError;

pub mod render;
pub use render::RenderTarget;
