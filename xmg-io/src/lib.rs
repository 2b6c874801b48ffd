//! Byte-level I/O for XMG streams.
//!
//! # Modules
//!
//! - [`cursor`] - [`ByteCursor`], a forward-only little-endian reader
//! - [`writer`] - [`ByteWriter`], its little-endian counterpart for building streams
//!
//! # Examples
//!
//! ```
//! use xmg_io::{ByteCursor, ByteWriter};
//!
//! let mut out = ByteWriter::new();
//! out.write_u32_le(3);
//! out.write_u8(0x41);
//!
//! let mut input = ByteCursor::new(out.into_bytes());
//! assert_eq!(input.read_u32_le().unwrap(), 3);
//! assert_eq!(input.read_u8().unwrap(), 0x41);
//! assert!(input.is_eof());
//! ```

pub mod cursor;
pub mod writer;

pub use cursor::ByteCursor;
pub use writer::ByteWriter;
