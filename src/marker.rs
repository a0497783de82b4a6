//! JFIF marker segment emission.
//!
//! Writes the header sequence SOI, APP0, optional COM, DQT, SOF0, DHT,
//! SOS into the staging buffer, and the footer (bit flush + EOI). All
//! quantization tables share one DQT segment and all Huffman tables one
//! DHT segment, which is what pins the header sizes at 324 bytes
//! (grayscale) and 607 bytes (color), 627 with a full 16-byte comment.

use crate::bitio::{BitPacker, Stage};
use crate::config::{ColorFormat, Quality};
use crate::error::Result;
use crate::tables::{
    CHROMA_AC_BITS, CHROMA_AC_VALS, CHROMA_DC_BITS, CHROMA_DC_VALS, CHROMA_QUANT, LUMA_AC_BITS,
    LUMA_AC_VALS, LUMA_DC_BITS, LUMA_DC_VALS, LUMA_QUANT, ZZ,
};

// JPEG marker bytes

pub(crate) const M_SOF0: u8 = 0xC0;
pub(crate) const M_DHT: u8 = 0xC4;
pub(crate) const M_SOI: u8 = 0xD8;
pub(crate) const M_EOI: u8 = 0xD9;
pub(crate) const M_SOS: u8 = 0xDA;
pub(crate) const M_DQT: u8 = 0xDB;
pub(crate) const M_APP0: u8 = 0xE0;
pub(crate) const M_COM: u8 = 0xFE;

fn put_marker(out: &mut Stage, marker: u8) -> Result<()> {
    out.put(0xFF)?;
    out.put(marker)
}

fn put_app0(out: &mut Stage) -> Result<()> {
    put_marker(out, M_APP0)?;
    out.put_u16(16)?; // segment length
    out.put_slice(b"JFIF\0")?;
    out.put_slice(&[0x01, 0x01])?; // version 1.1
    out.put(0x00)?; // density units: aspect ratio
    out.put_u16(1)?; // X density
    out.put_u16(1)?; // Y density
    out.put_slice(&[0x00, 0x00]) // no thumbnail
}

fn put_com(out: &mut Stage, comment: &[u8]) -> Result<()> {
    put_marker(out, M_COM)?;
    out.put_u16(2 + comment.len() as u16)?;
    out.put_slice(comment)
}

/// One DQT segment carrying all tables for the session, values in
/// zig-zag order, 8-bit precision.
fn put_dqt(out: &mut Stage, color: ColorFormat, quality: Quality) -> Result<()> {
    let qi = quality.index();
    let ntabs = match color {
        ColorFormat::Grayscale => 1u16,
        ColorFormat::Yuv422 => 2,
    };
    put_marker(out, M_DQT)?;
    out.put_u16(2 + 65 * ntabs)?;
    for id in 0..ntabs {
        let qt = if id == 0 { &LUMA_QUANT[qi] } else { &CHROMA_QUANT[qi] };
        out.put(id as u8)?; // 8-bit precision, table id
        for k in 0..64 {
            out.put(qt[ZZ[k]] as u8)?;
        }
    }
    Ok(())
}

fn put_sof0(out: &mut Stage, width: u16, height: u16, color: ColorFormat) -> Result<()> {
    put_marker(out, M_SOF0)?;
    out.put_u16(8 + 3 * color.components() as u16)?;
    out.put(8)?; // sample precision
    out.put_u16(height)?;
    out.put_u16(width)?;
    out.put(color.components() as u8)?;
    match color {
        ColorFormat::Grayscale => {
            out.put_slice(&[1, 0x11, 0])?; // Y: no subsampling, quant table 0
        }
        ColorFormat::Yuv422 => {
            out.put_slice(&[1, 0x22, 0])?; // Y: 2x2 sampling, quant table 0
            out.put_slice(&[2, 0x11, 1])?; // Cb
            out.put_slice(&[3, 0x11, 1])?; // Cr
        }
    }
    Ok(())
}

/// One DHT segment carrying all tables for the session.
fn put_dht(out: &mut Stage, color: ColorFormat) -> Result<()> {
    // (class<<4 | id, bits, vals)
    let all: [(u8, &[u8; 16], &[u8]); 4] = [
        (0x00, &LUMA_DC_BITS, &LUMA_DC_VALS),
        (0x10, &LUMA_AC_BITS, &LUMA_AC_VALS),
        (0x01, &CHROMA_DC_BITS, &CHROMA_DC_VALS),
        (0x11, &CHROMA_AC_BITS, &CHROMA_AC_VALS),
    ];
    let tables = match color {
        ColorFormat::Grayscale => &all[..2],
        ColorFormat::Yuv422 => &all[..],
    };

    let mut length = 2u16;
    for (_, bits, vals) in tables {
        length += 1 + 16 + vals.len() as u16;
        debug_assert_eq!(bits.iter().map(|&b| b as usize).sum::<usize>(), vals.len());
    }

    put_marker(out, M_DHT)?;
    out.put_u16(length)?;
    for (tc_th, bits, vals) in tables {
        out.put(*tc_th)?;
        out.put_slice(*bits)?;
        out.put_slice(vals)?;
    }
    Ok(())
}

fn put_sos(out: &mut Stage, color: ColorFormat) -> Result<()> {
    put_marker(out, M_SOS)?;
    out.put_u16(6 + 2 * color.components() as u16)?;
    out.put(color.components() as u8)?;
    match color {
        ColorFormat::Grayscale => {
            out.put_slice(&[1, 0x00])?; // Y: DC/AC tables 0
        }
        ColorFormat::Yuv422 => {
            out.put_slice(&[1, 0x00])?;
            out.put_slice(&[2, 0x11])?; // Cb: DC/AC tables 1
            out.put_slice(&[3, 0x11])?; // Cr
        }
    }
    out.put_slice(&[0, 63, 0]) // Ss, Se, Ah/Al (full baseline scan)
}

/// Emit the complete header marker sequence for one image.
pub(crate) fn write_header(
    out: &mut Stage,
    width: u16,
    height: u16,
    color: ColorFormat,
    quality: Quality,
    comment: &[u8],
) -> Result<()> {
    put_marker(out, M_SOI)?;
    put_app0(out)?;
    if !comment.is_empty() {
        put_com(out, comment)?;
    }
    put_dqt(out, color, quality)?;
    put_sof0(out, width, height, color)?;
    put_dht(out, color)?;
    put_sos(out, color)
}

/// Flush pending entropy bits (1-padded) and emit EOI.
pub(crate) fn write_footer(out: &mut Stage, bits: &mut BitPacker) -> Result<()> {
    bits.flush(out)?;
    put_marker(out, M_EOI)
}
