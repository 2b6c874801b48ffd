//! Transparent tile decoder - key-color fill.
//!
//! Transparent tiles carry no payload. All four pixels receive the header's
//! transparent color exactly as stored, alpha byte included, which makes this
//! the cheapest way to encode empty areas of a sprite.

use crate::{Block, ColorMode, TileDecoder, XmgError, XmgHeader};
use xmg_io::ByteCursor;

/// Decoder for [`ColorMode::Transparent`] tiles.
pub struct TransparentDecoder;

impl TileDecoder for TransparentDecoder {
    fn color_mode(&self) -> ColorMode {
        ColorMode::Transparent
    }

    fn payload_len(&self) -> usize {
        0
    }

    fn decode_block(
        &self,
        _stream: &mut ByteCursor,
        header: &XmgHeader,
    ) -> Result<Block, XmgError> {
        Ok([header.key_color(); 4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmg_pixelbuffer::Color;

    #[test]
    fn test_fills_with_key_color_verbatim() {
        let header = XmgHeader::new(2, 2, 0x7F00_FF00);
        let mut stream = ByteCursor::new(vec![0xAB]);
        let block = TransparentDecoder
            .decode_block(&mut stream, &header)
            .unwrap();

        assert_eq!(block, [Color::from_packed(0x7F00_FF00); 4]);
        // Nothing consumed.
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_works_on_empty_stream() {
        let header = XmgHeader::new(2, 2, 0);
        let mut stream = ByteCursor::new(Vec::new());
        let block = TransparentDecoder
            .decode_block(&mut stream, &header)
            .unwrap();
        assert_eq!(block, [Color::TRANSPARENT; 4]);
    }
}
