//! End-to-end decoding behaviour.
//!
//! Every stream here is built with `XmgWriter` (or raw bytes where the writer
//! would refuse to produce them) and decoded through the public API.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xmg_codec::{
    decode, ColorMode, Completion, Diagnostic, Limits, XmgDecoder, XmgError, XmgHeader, XmgWriter,
    YCrCbTile, HEADER_LEN,
};
use xmg_pixelbuffer::{Color, PixelBuffer};

fn packed(image: &xmg_codec::DecodedImage) -> Vec<u32> {
    image.pixels.data().iter().map(|c| c.packed()).collect()
}

#[test]
fn test_two_by_two_transparent() {
    let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0x0000_0000));
    writer.transparent_tiles(1);

    let image = decode(writer.finish()).unwrap();
    assert_eq!(packed(&image), vec![0, 0, 0, 0]);
    assert_eq!(image.completion, Completion::ImageFilled);
    assert_eq!(image.clipped_pixels, 0);
}

#[test]
fn test_transparent_tile_writes_key_verbatim() {
    let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0x80FF_00FF));
    writer.transparent_tiles(1);

    let image = decode(writer.finish()).unwrap();
    assert_eq!(packed(&image), vec![0x80FF_00FF; 4]);
}

#[test]
fn test_stride_is_width_regardless_of_declared() {
    let mut tiles = Vec::new();
    for i in 0..4u8 {
        tiles.push(YCrCbTile {
            luma: [i * 10, i * 10 + 1, i * 10 + 2, i * 10 + 3],
            cr: 128,
            cb: 128,
        });
    }

    let decode_with_stride = |stride: u32| {
        let mut header = XmgHeader::new(4, 4, 0);
        header.declared_stride = stride;
        let mut writer = XmgWriter::new(&header);
        writer.ycrcb_tiles(&tiles);
        decode(writer.finish()).unwrap()
    };

    let consistent = decode_with_stride(12);
    let odd = decode_with_stride(999);

    assert!(consistent.diagnostics.is_empty());
    assert_eq!(
        odd.diagnostics,
        vec![Diagnostic::StrideMismatch {
            declared: 999,
            expected: 12
        }]
    );
    assert_eq!(packed(&consistent), packed(&odd));

    // Row 2 starts with the third tile.
    assert_eq!(odd.pixels.pixel(0, 2), Some(Color::from_rgba(20, 20, 20, 255)));
    assert_eq!(odd.pixels.pixel(3, 3), Some(Color::from_rgba(33, 33, 33, 255)));
}

#[test]
fn test_unknown_version_still_decodes() {
    let mut header = XmgHeader::new(4, 2, 0);
    header.version = 7;
    let mut writer = XmgWriter::new(&header);
    writer.ycrcb_tiles(&[YCrCbTile::flat(60, 128, 128), YCrCbTile::flat(70, 128, 128)]);

    let image = decode(writer.finish()).unwrap();
    assert_eq!(image.pixels.dimensions(), (4, 2));
    assert_eq!(
        image.diagnostics,
        vec![Diagnostic::UnknownVersion { version: 7 }]
    );
    assert_eq!(image.pixels.pixel(3, 1), Some(Color::from_rgba(70, 70, 70, 255)));
}

#[test]
fn test_short_opcode_example() {
    // 0x05: five YCrCb tiles.
    let mut writer = XmgWriter::new(&XmgHeader::new(10, 2, 0));
    writer.raw(&[0x05]);
    for y in 0..5u8 {
        writer.raw(&[y, y, y, y, 128, 128]);
    }

    let image = decode(writer.finish()).unwrap();
    assert_eq!(image.completion, Completion::ImageFilled);
    assert_eq!(image.bytes_consumed, HEADER_LEN + 1 + 30);
    assert_eq!(image.pixels.pixel(8, 0), Some(Color::from_rgba(4, 4, 4, 255)));
}

#[test]
fn test_extended_opcode_example() {
    // 0xC3 0x10: 784 YCrCb tiles.
    let mut writer = XmgWriter::new(&XmgHeader::new(784 * 2, 2, 0));
    writer.raw(&[0xC3, 0x10]);
    for _ in 0..784 {
        writer.raw(&[90, 90, 90, 90, 128, 128]);
    }

    let image = decode(writer.finish()).unwrap();
    assert_eq!(image.bytes_consumed, HEADER_LEN + 2 + 784 * 6);
    assert!(image
        .pixels
        .data()
        .iter()
        .all(|c| *c == Color::from_rgba(90, 90, 90, 255)));
}

#[test]
fn test_transparent_run_consumes_only_opcode() {
    let mut writer = XmgWriter::new(&XmgHeader::new(200, 2, 0));
    writer.transparent_tiles(3).extended_run_header(ColorMode::Transparent, 97);

    let image = decode(writer.finish()).unwrap();
    assert_eq!(image.bytes_consumed, HEADER_LEN + 1 + 2);
    assert_eq!(image.completion, Completion::ImageFilled);
}

#[test]
fn test_rgb_key_color() {
    let key = 0x00FF_00FF;
    let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, key));
    writer.rgb_tiles(&[[key, 0x0000_0000, 0x0012_3456, key]]);

    let image = decode(writer.finish()).unwrap();
    assert_eq!(
        packed(&image),
        vec![0x00FF_00FF, 0xFF00_0000, 0xFF12_3456, 0x00FF_00FF]
    );
    assert_eq!(image.bytes_consumed, HEADER_LEN + 1 + 12);
}

#[test]
fn test_reserved_mode_is_fatal() {
    for opcode in [[0xF0, 0x00], [0xF3, 0x10], [0xFF, 0xFF]] {
        let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0));
        writer.raw(&opcode);
        let err = decode(writer.finish()).unwrap_err();
        assert!(
            matches!(err, XmgError::UnsupportedColorMode { opcode: op, offset } if op == opcode[0] && offset == HEADER_LEN),
            "unexpected error: {err}"
        );
    }
}

#[test]
fn test_reserved_mode_after_valid_tiles_returns_no_image() {
    let mut writer = XmgWriter::new(&XmgHeader::new(4, 4, 0));
    writer
        .ycrcb_tiles(&[YCrCbTile::flat(1, 128, 128); 2])
        .extended_run_header(ColorMode::Reserved, 3);

    assert!(decode(writer.finish()).is_err());
}

#[test]
fn test_truncated_payload_is_fatal() {
    let mut writer = XmgWriter::new(&XmgHeader::new(4, 2, 0));
    writer.ycrcb_tiles(&[YCrCbTile::flat(1, 128, 128); 2]);
    let bytes = writer.finish();
    let cut = bytes.slice(..bytes.len() - 1);

    let err = decode(cut).unwrap_err();
    assert!(err.is_truncation());
}

#[test]
fn test_truncated_header_is_fatal() {
    let err = decode(vec![3u8, 0, 0, 0, 0, 0]).unwrap_err();
    assert!(err.is_truncation());
    assert_eq!(decode(Vec::<u8>::new()).unwrap_err().offset(), Some(0));
}

#[test]
fn test_header_only_stream_is_blank() {
    let writer = XmgWriter::new(&XmgHeader::new(4, 4, 0xFFFF_FFFF));
    let image = decode(writer.finish()).unwrap();
    assert_eq!(image.completion, Completion::StreamExhausted);
    assert!(image.pixels.data().iter().all(|c| *c == Color::TRANSPARENT));
}

#[test]
fn test_run_past_row_end_is_clipped() {
    // Three tiles in a 4-wide row: the third lands entirely off the surface
    // and the next run starts on the following row pair.
    let mut writer = XmgWriter::new(&XmgHeader::new(4, 4, 0));
    writer.run_header(ColorMode::YCrCb, 3);
    for _ in 0..3 {
        writer.raw(&[10, 10, 10, 10, 128, 128]);
    }
    writer.ycrcb_tiles(&[YCrCbTile::flat(99, 128, 128)]);

    let image = decode(writer.finish()).unwrap();
    assert_eq!(image.clipped_pixels, 4);
    assert_eq!(image.pixels.pixel(0, 2), Some(Color::from_rgba(99, 99, 99, 255)));
    assert_eq!(image.pixels.pixel(2, 2), Some(Color::TRANSPARENT));
    assert_eq!(image.completion, Completion::StreamExhausted);
}

#[test]
fn test_writer_output_fills_every_row_pair() {
    let mut writer = XmgWriter::new(&XmgHeader::new(8, 8, 0));
    writer.ycrcb_tiles(&[YCrCbTile::flat(40, 128, 128); 16]);

    let image = decode(writer.finish()).unwrap();
    assert_eq!(image.completion, Completion::ImageFilled);
    assert_eq!(image.clipped_pixels, 0);
    assert_eq!(image.pixels.pixel(0, 2), Some(Color::from_rgba(40, 40, 40, 255)));
    assert_eq!(image.pixels.pixel(7, 7), Some(Color::from_rgba(40, 40, 40, 255)));
    assert_eq!(image.bytes_consumed, HEADER_LEN + 4 * (1 + 4 * 6));
}

#[test]
fn test_odd_dimensions() {
    // 3x3: the right column of the second tile and the whole last row fall
    // outside any complete block pair.
    let mut writer = XmgWriter::new(&XmgHeader::new(3, 3, 0));
    writer.ycrcb_tiles(&[YCrCbTile::flat(40, 128, 128); 4]);

    let image = decode(writer.finish()).unwrap();
    assert_eq!(image.completion, Completion::ImageFilled);
    assert_eq!(image.clipped_pixels, 2);
    assert_eq!(image.pixels.pixel(2, 1), Some(Color::from_rgba(40, 40, 40, 255)));
    assert_eq!(image.pixels.pixel(0, 2), Some(Color::TRANSPARENT));
    // Only the first two tiles were consumed.
    assert_eq!(image.bytes_consumed, HEADER_LEN + 1 + 12);
}

#[test]
fn test_zero_count_runs_decode_nothing() {
    let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0));
    writer
        .run_header(ColorMode::YCrCb, 0)
        .run_header(ColorMode::Rgb, 0)
        .extended_run_header(ColorMode::Transparent, 0)
        .ycrcb_tiles(&[YCrCbTile::flat(5, 128, 128)]);

    let image = decode(writer.finish()).unwrap();
    assert_eq!(image.pixels.pixel(0, 0), Some(Color::from_rgba(5, 5, 5, 255)));
    assert_eq!(image.completion, Completion::ImageFilled);
}

#[test]
fn test_decode_is_idempotent() {
    let mut writer = XmgWriter::new(&XmgHeader::new(6, 4, 0x0000_FF00));
    writer
        .ycrcb_tiles(&[
            YCrCbTile {
                luma: [0, 64, 128, 255],
                cr: 30,
                cb: 220,
            },
            YCrCbTile::flat(17, 200, 40),
        ])
        .transparent_tiles(2)
        .rgb_tiles(&[[0x00FF00, 0x123456, 0xABCDEF, 0x000001]]);
    let bytes = writer.finish();

    let first = decode(bytes.clone()).unwrap();
    let second = decode(bytes).unwrap();
    assert_eq!(packed(&first), packed(&second));
    assert_eq!(first.bytes_consumed, second.bytes_consumed);
}

#[test]
fn test_decoder_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<XmgDecoder>();

    let decoder = std::sync::Arc::new(XmgDecoder::new());
    let mut writer = XmgWriter::new(&XmgHeader::new(2, 2, 0));
    writer.ycrcb_tiles(&[YCrCbTile::flat(77, 128, 128)]);
    let bytes = writer.finish();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let decoder = decoder.clone();
            let bytes = bytes.clone();
            std::thread::spawn(move || decoder.decode(bytes).map(|image| image.into_pixels()))
        })
        .collect();

    for handle in handles {
        let pixels = handle.join().unwrap().unwrap();
        assert_eq!(pixels.pixel(1, 1), Some(Color::from_rgba(77, 77, 77, 255)));
    }
}

#[test]
fn test_limits_reject_before_decoding() {
    let mut writer = XmgWriter::new(&XmgHeader::new(40_000, 2, 0));
    writer.transparent_tiles(1);
    let bytes = writer.finish();

    let err = XmgDecoder::new().decode(bytes.clone()).unwrap_err();
    assert!(matches!(err, XmgError::LimitExceeded { width: 40_000, .. }));

    let image = XmgDecoder::with_limits(Limits::none()).decode(bytes).unwrap();
    assert_eq!(image.pixels.width(), 40_000);
}

proptest! {
    #[test]
    fn ycrcb_runs_consume_six_bytes_per_tile(count in 1usize..=300) {
        let mut writer = XmgWriter::new(&XmgHeader::new(count as u32 * 2, 2, 0));
        writer.ycrcb_tiles(&vec![YCrCbTile::flat(1, 2, 3); count]);
        let opcode_len = if count <= 63 { 1 } else { 2 };

        let image = decode(writer.finish()).unwrap();
        prop_assert_eq!(image.bytes_consumed, HEADER_LEN + opcode_len + 6 * count);
        prop_assert_eq!(image.completion, Completion::ImageFilled);
    }

    #[test]
    fn rgb_runs_consume_twelve_bytes_per_tile(count in 1usize..=300, color in 0u32..0x0100_0000) {
        let mut writer = XmgWriter::new(&XmgHeader::new(count as u32 * 2, 2, 0x00FF_FFFF));
        writer.rgb_tiles(&vec![[color; 4]; count]);
        let opcode_len = if count <= 63 { 1 } else { 2 };

        let image = decode(writer.finish()).unwrap();
        prop_assert_eq!(image.bytes_consumed, HEADER_LEN + opcode_len + 12 * count);

        let expected_alpha = if color == 0x00FF_FFFF { 0 } else { 255 };
        for pixel in image.pixels.data() {
            prop_assert_eq!(pixel.rgb24(), color);
            prop_assert_eq!(pixel.a(), expected_alpha);
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(
        width in 0u32..32,
        height in 0u32..32,
        body in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut writer = XmgWriter::new(&XmgHeader::new(width, height, 0));
        writer.raw(&body);
        match decode(writer.finish()) {
            Ok(image) => {
                prop_assert_eq!(image.pixels.dimensions(), (width, height));
                prop_assert!(image.bytes_consumed <= HEADER_LEN + body.len());
            }
            Err(err) => {
                let expected =
                    err.is_truncation() || matches!(err, XmgError::UnsupportedColorMode { .. });
                prop_assert!(expected, "unexpected error: {}", err);
            }
        }
    }
}
