//! End-to-end checks against an independent baseline JPEG decoder.

use jpeg_decoder::{Decoder, PixelFormat};
use smol_jpeg::{ColorFormat, Encoder, Quality};

/// Encode `data` (MCU-ordered raw stream) through the drive loop.
fn encode(
    width: u16,
    height: u16,
    color: ColorFormat,
    quality: Quality,
    data: &[u8],
) -> Vec<u8> {
    let mut enc = Encoder::new(width, height, color, quality).unwrap();
    let mut out = Vec::new();
    let mut pull = |pos: u32, buf: &mut [u8]| -> Result<usize, &'static str> {
        let pos = pos as usize;
        let n = buf.len().min(data.len().saturating_sub(pos));
        buf[..n].copy_from_slice(&data[pos..pos + n]);
        Ok(n)
    };
    let mut push = |piece: &[u8]| -> Result<(), &'static str> {
        out.extend_from_slice(piece);
        Ok(())
    };
    let total = enc.encode_image(&mut pull, &mut push).unwrap();
    assert_eq!(total, out.len());
    out
}

fn decode(bytes: &[u8]) -> (jpeg_decoder::ImageInfo, Vec<u8>) {
    let mut dec = Decoder::new(bytes);
    let pixels = dec.decode().expect("decoder rejected the stream");
    (dec.info().unwrap(), pixels)
}

#[test]
fn flat_grayscale_is_lossless() {
    let jpeg = encode(8, 8, ColorFormat::Grayscale, Quality::Normal, &[128; 64]);
    let (info, pixels) = decode(&jpeg);
    assert_eq!(info.pixel_format, PixelFormat::L8);
    assert_eq!((info.width, info.height), (8, 8));
    assert!(pixels.iter().all(|&p| p == 128));
}

#[test]
fn flat_grayscale_level_survives() {
    let jpeg = encode(8, 8, ColorFormat::Grayscale, Quality::Normal, &[200; 64]);
    let (_, pixels) = decode(&jpeg);
    for &p in &pixels {
        assert!(p.abs_diff(200) <= 2, "pixel {p} too far from 200");
    }
}

#[test]
fn flat_color_decodes_to_gray_rgb() {
    // Y = Cb = Cr = 128 is mid gray in every RGB conversion
    let jpeg = encode(16, 16, ColorFormat::Yuv422, Quality::Normal, &[128; 512]);
    let (info, pixels) = decode(&jpeg);
    assert_eq!(info.pixel_format, PixelFormat::RGB24);
    assert_eq!((info.width, info.height), (16, 16));
    for &p in &pixels {
        assert!(p.abs_diff(128) <= 2, "channel {p} too far from 128");
    }
}

#[test]
fn dc_prediction_chains_across_mcus() {
    // two flat MCUs at different levels; the second DC is coded as a
    // difference and must still reconstruct correctly
    let mut data = vec![100u8; 64];
    data.extend_from_slice(&[150; 64]);
    let jpeg = encode(16, 8, ColorFormat::Grayscale, Quality::Highest, &data);
    let (info, pixels) = decode(&jpeg);
    assert_eq!((info.width, info.height), (16, 8));
    for row in 0..8 {
        for col in 0..16 {
            let p = pixels[row * 16 + col];
            let want = if col < 8 { 100 } else { 150 };
            assert!(p.abs_diff(want) <= 2, "({row},{col}) = {p}, want ~{want}");
        }
    }
}

#[test]
fn reported_dimensions_are_unpadded() {
    let data = vec![128u8; 4 * 512];
    let jpeg = encode(24, 18, ColorFormat::Yuv422, Quality::Low, &data);
    let (info, pixels) = decode(&jpeg);
    assert_eq!((info.width, info.height), (24, 18));
    assert_eq!(pixels.len(), 24 * 18 * 3);
}

#[test]
fn short_source_is_completed_by_replication() {
    // 8x12 image: the second MCU row only has 4 real pixel rows
    let mut data = Vec::new();
    for row in 0..12u8 {
        data.extend_from_slice(&[row * 20; 8]);
    }
    let jpeg = encode(8, 12, ColorFormat::Grayscale, Quality::Highest, &data);
    let (info, pixels) = decode(&jpeg);
    assert_eq!((info.width, info.height), (8, 12));
    for row in 0..12 {
        for col in 0..8 {
            let p = pixels[row * 8 + col];
            let want = row as u8 * 20;
            assert!(p.abs_diff(want) <= 3, "({row},{col}) = {p}, want ~{want}");
        }
    }
    // replication is deterministic
    assert_eq!(
        jpeg,
        encode(8, 12, ColorFormat::Grayscale, Quality::Highest, &data)
    );
}

#[test]
fn scan_data_has_no_bare_ff() {
    // noisy input to exercise byte stuffing
    let data: Vec<u8> = (0..4 * 512u32)
        .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
        .collect();
    let jpeg = encode(32, 32, ColorFormat::Yuv422, Quality::Highest, &data);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);

    // walk to the start of entropy-coded data
    let mut pos = 2;
    loop {
        assert_eq!(jpeg[pos], 0xFF);
        let marker = jpeg[pos + 1];
        let len = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
        pos += 2 + len;
        if marker == 0xDA {
            break;
        }
    }
    while pos < jpeg.len() - 2 {
        if jpeg[pos] == 0xFF {
            assert_eq!(jpeg[pos + 1], 0x00, "unstuffed 0xFF at offset {pos}");
            pos += 1;
        }
        pos += 1;
    }

    // and the decoder agrees the scan is well formed
    decode(&jpeg);
}

#[test]
fn comment_segment_is_carried() {
    let mut enc = Encoder::new(8, 8, ColorFormat::Grayscale, Quality::Normal).unwrap();
    enc.set_comment(b"cam0 frame").unwrap();
    let n = enc.write_header().unwrap();
    let header = enc.staged().to_vec();
    assert_eq!(n, header.len());
    let com = header
        .windows(2)
        .position(|w| w == [0xFF, 0xFE])
        .expect("COM segment missing");
    assert_eq!(&header[com + 4..com + 4 + 10], b"cam0 frame");

    // manual drive: header + MCU + footer round-trips
    let mut out = header;
    enc.encode_mcu(&[70; 64]).unwrap();
    out.extend_from_slice(enc.staged());
    enc.write_footer().unwrap();
    out.extend_from_slice(enc.staged());
    let (_, pixels) = decode(&out);
    assert!(pixels.iter().all(|&p| p.abs_diff(70) <= 2));
}

#[test]
fn session_is_reusable() {
    let data = [90u8; 64];
    let mut enc = Encoder::new(8, 8, ColorFormat::Grayscale, Quality::Normal).unwrap();
    let mut runs: Vec<Vec<u8>> = Vec::new();
    for _ in 0..2 {
        let mut out = Vec::new();
        let mut pull = |pos: u32, buf: &mut [u8]| -> Result<usize, &'static str> {
            let pos = pos as usize;
            buf.copy_from_slice(&data[pos..pos + buf.len()]);
            Ok(buf.len())
        };
        let mut push = |piece: &[u8]| -> Result<(), &'static str> {
            out.extend_from_slice(piece);
            Ok(())
        };
        enc.encode_image(&mut pull, &mut push).unwrap();
        runs.push(out);
    }
    assert_eq!(runs[0], runs[1]);
    let (_, pixels) = decode(&runs[1]);
    assert!(pixels.iter().all(|&p| p.abs_diff(90) <= 2));
}

#[test]
fn every_quality_preset_produces_a_valid_stream() {
    let data: Vec<u8> = (0..64u32).map(|i| (i * 4) as u8).collect();
    let mut sizes = Vec::new();
    for q in [
        Quality::Lowest,
        Quality::Lower,
        Quality::Low,
        Quality::Normal,
        Quality::Higher,
        Quality::Highest,
    ] {
        let jpeg = encode(8, 8, ColorFormat::Grayscale, q, &data);
        let (info, _) = decode(&jpeg);
        assert_eq!((info.width, info.height), (8, 8));
        sizes.push(jpeg.len());
    }
    // finer quantization never shrinks the stream for this gradient
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]), "sizes: {sizes:?}");
}
