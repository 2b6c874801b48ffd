//! Little-endian byte writer used to assemble XMG streams.

use bytes::{BufMut, Bytes, BytesMut};

/// Growable little-endian output buffer.
///
/// # Examples
///
/// ```
/// use xmg_io::ByteWriter;
///
/// let mut out = ByteWriter::new();
/// out.write_u16_le(0x1234);
/// out.write_bytes(b"xy");
/// assert_eq!(out.as_slice(), &[0x34, 0x12, b'x', b'y']);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buffer: BytesMut,
}

impl ByteWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    pub fn write_u16_le(&mut self, value: u16) {
        self.buffer.put_u16_le(value);
    }

    pub fn write_u32_le(&mut self, value: u32) {
        self.buffer.put_u32_le(value);
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Freeze the written bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }
}
