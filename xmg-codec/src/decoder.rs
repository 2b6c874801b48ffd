//! The XMG decode loop.
//!
//! A decode moves through `Init -> Heading -> Running -> Done | Faulted`:
//!
//! - **Heading**: the header has been read, limits checked and a zeroed
//!   surface allocated; the block cursor sits at `(0, 0)`.
//! - **Running**: each step first wraps the block cursor if the row pair is
//!   full (finishing when no row pair is left), then finishes if the stream
//!   is exhausted, and otherwise reads one run and decodes its tiles.
//! - **Done**: the surface is returned, possibly short if the stream ended
//!   before the last row pair.
//! - **Faulted**: a reserved color mode or a truncated run; nothing is
//!   returned but the error.

use crate::block::BlockCursor;
use crate::{
    ColorMode, Diagnostic, Limits, RgbDecoder, Run, TileDecoder, TransparentDecoder, XmgError,
    XmgHeader, YCrCbDecoder, HEADER_LEN,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use xmg_io::ByteCursor;
use xmg_pixelbuffer::ManagedPixelBuffer;

/// Why a successful decode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// Every row pair of the image was reached.
    ImageFilled,
    /// The stream ended first; rows after that point keep their initial value.
    StreamExhausted,
}

/// Lifecycle of one decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Init,
    Heading,
    Running,
    Done(Completion),
    Faulted,
}

/// A finished decode.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub header: XmgHeader,
    /// The decoded surface, `header.width × header.height`.
    pub pixels: ManagedPixelBuffer,
    /// Advisory header observations.
    pub diagnostics: Vec<Diagnostic>,
    pub completion: Completion,
    /// Bytes read from the stream, header included.
    pub bytes_consumed: usize,
    /// Block pixels dropped because they fell outside the surface.
    pub clipped_pixels: u64,
}

impl DecodedImage {
    /// Take ownership of the surface.
    pub fn into_pixels(self) -> ManagedPixelBuffer {
        self.pixels
    }
}

/// XMG decoder.
///
/// Holds configuration only; every decode owns its own cursor and surface, so
/// one decoder can be shared across threads.
///
/// # Example
///
/// ```
/// use xmg_codec::{Completion, XmgDecoder, XmgHeader, XmgWriter, YCrCbTile};
/// use xmg_pixelbuffer::{Color, PixelBuffer};
///
/// let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0));
/// writer.ycrcb_tiles(&[YCrCbTile::flat(200, 128, 128)]);
///
/// let image = XmgDecoder::new().decode(writer.finish()).unwrap();
/// assert_eq!(image.completion, Completion::ImageFilled);
/// assert_eq!(image.pixels.pixel(1, 1), Some(Color::from_rgba(200, 200, 200, 255)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmgDecoder {
    limits: Limits,
}

impl XmgDecoder {
    /// Decoder with [`Limits::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Decode a complete XMG byte source.
    ///
    /// # Errors
    ///
    /// See [`XmgError`]; no partial surface is returned on error.
    pub fn decode(&self, data: impl Into<Bytes>) -> Result<DecodedImage, XmgError> {
        let mut stream = ByteCursor::new(data);
        self.decode_stream(&mut stream)
    }

    /// Decode from a cursor positioned at the start of the header.
    pub fn decode_stream(&self, stream: &mut ByteCursor) -> Result<DecodedImage, XmgError> {
        let start = stream.position();
        let header = XmgHeader::read(stream)?;

        let diagnostics = header.diagnostics();
        for diagnostic in &diagnostics {
            warn!("XMG: {}", diagnostic);
        }

        self.limits.check(&header)?;

        let mut job = DecodeJob::new(header, stream);
        let completion = job.run()?;

        if job.cursor.clipped() > 0 {
            warn!(
                "XMG: {} block pixels fell outside the {}x{} surface and were dropped",
                job.cursor.clipped(),
                header.width,
                header.height
            );
        }

        let clipped_pixels = job.cursor.clipped();
        let pixels = job.pixels;
        Ok(DecodedImage {
            header,
            pixels,
            diagnostics,
            completion,
            bytes_consumed: stream.position() - start,
            clipped_pixels,
        })
    }

    /// Read only the header.
    ///
    /// # Errors
    ///
    /// [`XmgError::Truncated`] if `data` is shorter than the header.
    pub fn probe(data: &[u8]) -> Result<XmgHeader, XmgError> {
        let head = &data[..data.len().min(HEADER_LEN)];
        XmgHeader::read(&mut ByteCursor::new(Bytes::copy_from_slice(head)))
    }
}

/// Decode with default limits.
pub fn decode(data: impl Into<Bytes>) -> Result<DecodedImage, XmgError> {
    XmgDecoder::new().decode(data)
}

/// State of a single decode in progress.
struct DecodeJob<'a> {
    header: XmgHeader,
    stream: &'a mut ByteCursor,
    cursor: BlockCursor,
    pixels: ManagedPixelBuffer,
    state: DecodeState,
    runs: usize,
}

impl<'a> DecodeJob<'a> {
    fn new(header: XmgHeader, stream: &'a mut ByteCursor) -> Self {
        let mut job = Self {
            header,
            stream,
            cursor: BlockCursor::new(header.width, header.height),
            pixels: ManagedPixelBuffer::new(header.width, header.height),
            state: DecodeState::Init,
            runs: 0,
        };
        job.transition(DecodeState::Heading);
        job
    }

    fn transition(&mut self, next: DecodeState) {
        debug!("XMG decode: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn run(&mut self) -> Result<Completion, XmgError> {
        self.transition(DecodeState::Running);
        loop {
            match self.step() {
                Ok(None) => continue,
                Ok(Some(completion)) => {
                    self.transition(DecodeState::Done(completion));
                    debug!(
                        "XMG decode finished after {} runs at stream offset {}",
                        self.runs,
                        self.stream.position()
                    );
                    return Ok(completion);
                }
                Err(e) => {
                    self.transition(DecodeState::Faulted);
                    return Err(e);
                }
            }
        }
    }

    /// One iteration of the main loop; `Some` once the decode is complete.
    fn step(&mut self) -> Result<Option<Completion>, XmgError> {
        if self.cursor.at_row_end() && !self.cursor.wrap() {
            return Ok(Some(Completion::ImageFilled));
        }

        if self.stream.is_eof() {
            return Ok(Some(Completion::StreamExhausted));
        }

        let offset = self.stream.position();
        let run = Run::read(self.stream)?;
        self.runs += 1;
        trace!(
            "XMG run at offset {}: {} x{} at block {:?}",
            offset,
            run.mode,
            run.count,
            self.cursor.position()
        );

        match run.mode {
            ColorMode::YCrCb => self.decode_tiles(&YCrCbDecoder, run.count)?,
            ColorMode::Transparent => self.decode_tiles(&TransparentDecoder, run.count)?,
            ColorMode::Rgb => self.decode_tiles(&RgbDecoder, run.count)?,
            ColorMode::Reserved => {
                return Err(XmgError::UnsupportedColorMode {
                    opcode: run.opcode,
                    offset,
                })
            }
        }

        Ok(None)
    }

    fn decode_tiles<D: TileDecoder>(&mut self, decoder: &D, count: u16) -> Result<(), XmgError> {
        for _ in 0..count {
            let block = decoder.decode_block(self.stream, &self.header)?;
            self.cursor.write_block(&mut self.pixels, &block);
            self.cursor.advance();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{XmgWriter, YCrCbTile};
    use xmg_pixelbuffer::{Color, PixelBuffer};

    #[test]
    fn test_minimal_transparent_image() {
        let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0x0000_0000));
        writer.transparent_tiles(1);

        let image = decode(writer.finish()).unwrap();
        assert_eq!(image.pixels.dimensions(), (2, 2));
        assert!(image
            .pixels
            .data()
            .iter()
            .all(|c| c.packed() == 0x0000_0000));
        assert!(image.diagnostics.is_empty());
    }

    #[test]
    fn test_job_states() {
        let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0));
        writer.transparent_tiles(1);
        let mut stream = ByteCursor::new(writer.finish());
        let header = XmgHeader::read(&mut stream).unwrap();

        let mut job = DecodeJob::new(header, &mut stream);
        assert_eq!(job.state, DecodeState::Heading);
        assert_eq!(job.cursor.position(), (0, 0));

        let completion = job.run().unwrap();
        assert_eq!(completion, Completion::ImageFilled);
        assert_eq!(job.state, DecodeState::Done(Completion::ImageFilled));
        assert_eq!(job.runs, 1);
    }

    #[test]
    fn test_reserved_mode_faults() {
        let mut writer = XmgWriter::new(&XmgHeader::new(4, 2, 0));
        writer.transparent_tiles(1);
        writer.raw(&[0xF0, 0x00]);
        let mut stream = ByteCursor::new(writer.finish());
        let header = XmgHeader::read(&mut stream).unwrap();

        let mut job = DecodeJob::new(header, &mut stream);
        let err = job.run().unwrap_err();
        assert_eq!(job.state, DecodeState::Faulted);
        match err {
            XmgError::UnsupportedColorMode { opcode, offset } => {
                assert_eq!(opcode, 0xF0);
                assert_eq!(offset, HEADER_LEN + 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stream_exhausted_early() {
        let mut writer = XmgWriter::new(&XmgHeader::new(2, 4, 0));
        writer.ycrcb_tiles(&[YCrCbTile::flat(50, 128, 128)]);

        let image = decode(writer.finish()).unwrap();
        assert_eq!(image.completion, Completion::StreamExhausted);
        assert_eq!(image.pixels.pixel(0, 1), Some(Color::from_rgba(50, 50, 50, 255)));
        // Second row pair untouched.
        assert_eq!(image.pixels.pixel(0, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_trailing_bytes_after_last_row_are_ignored() {
        let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0));
        writer.transparent_tiles(1);
        writer.raw(&[0xF0, 0x00, 0xFF]);
        let data = writer.finish();
        let total = data.len();

        let image = decode(data).unwrap();
        assert_eq!(image.completion, Completion::ImageFilled);
        assert_eq!(image.bytes_consumed, total - 3);
    }

    #[test]
    fn test_limits_checked_before_allocation() {
        let writer = XmgWriter::new(&XmgHeader::new(64, 64, 0));
        let decoder = XmgDecoder::with_limits(Limits::none().with_max_pixels(100));
        let err = decoder.decode(writer.finish()).unwrap_err();
        assert!(matches!(err, XmgError::LimitExceeded { .. }));
    }

    #[test]
    fn test_probe_reads_header_only() {
        let mut writer = XmgWriter::new(&XmgHeader::new(6, 4, 0x00AB_CDEF));
        writer.transparent_tiles(3);
        let header = XmgDecoder::probe(&writer.finish()).unwrap();
        assert_eq!((header.width, header.height), (6, 4));
        assert_eq!(header.transparent_color, 0x00AB_CDEF);

        assert!(XmgDecoder::probe(&[3, 0, 0, 0]).unwrap_err().is_truncation());
    }
}
