//! Forward-only reader over an in-memory byte source.

use bytes::{Buf, Bytes};
use std::io::{self, Read};

/// Sequential little-endian reader.
///
/// The cursor only moves forward. Every read either consumes exactly the
/// requested number of bytes or fails with [`io::ErrorKind::UnexpectedEof`]
/// without consuming anything, so a failed read leaves [`position()`](Self::position)
/// pointing at the start of the value that could not be read.
///
/// # Examples
///
/// ```
/// use xmg_io::ByteCursor;
///
/// let mut cursor = ByteCursor::new(vec![0x34, 0x12, 0xFF]);
/// assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
/// assert_eq!(cursor.position(), 2);
/// assert_eq!(cursor.read_u8().unwrap(), 0xFF);
/// assert!(cursor.is_eof());
/// assert!(cursor.read_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor {
    data: Bytes,
    consumed: usize,
}

impl ByteCursor {
    /// Wrap an in-memory byte source.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            consumed: 0,
        }
    }

    /// Drain a reader into memory and wrap the result.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from the reader.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::new(data))
    }

    /// Fail with `UnexpectedEof` unless at least `n` bytes remain.
    fn ensure_bytes(&self, n: usize) -> io::Result<()> {
        if self.data.remaining() < n {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "expected {} bytes at offset {}, got {}",
                    n,
                    self.consumed,
                    self.data.remaining()
                ),
            ));
        }
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> io::Result<u8> {
        self.ensure_bytes(1)?;
        self.consumed += 1;
        Ok(self.data.get_u8())
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> io::Result<u16> {
        self.ensure_bytes(2)?;
        self.consumed += 2;
        Ok(self.data.get_u16_le())
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> io::Result<u32> {
        self.ensure_bytes(4)?;
        self.consumed += 4;
        Ok(self.data.get_u32_le())
    }

    /// Read exactly `buf.len()` bytes.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.ensure_bytes(buf.len())?;
        self.consumed += buf.len();
        self.data.copy_to_slice(buf);
        Ok(())
    }

    /// Read a fixed-size array.
    ///
    /// ```
    /// use xmg_io::ByteCursor;
    ///
    /// let mut cursor = ByteCursor::new(&b"abcdef"[..]);
    /// let head: [u8; 4] = cursor.read_array().unwrap();
    /// assert_eq!(&head, b"abcd");
    /// ```
    pub fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_bytes(&mut buf)?;
        Ok(buf)
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> io::Result<()> {
        self.ensure_bytes(n)?;
        self.consumed += n;
        self.data.advance(n);
        Ok(())
    }

    /// True once every byte has been consumed.
    pub fn is_eof(&self) -> bool {
        !self.data.has_remaining()
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.remaining()
    }

    /// Number of bytes consumed since the cursor was created.
    pub fn position(&self) -> usize {
        self.consumed
    }
}
