//! DC/AC Huffman entropy coding of quantized blocks.
//!
//! The DC coefficient is coded as the difference from the running
//! per-component predictor; the 63 AC coefficients as (zero-run,
//! category) symbols with ZRL for runs of 16 and EOB for a trailing
//! run of zeros.

use crate::bitio::{BitPacker, Stage};
use crate::error::{EncodeError, Result};
use crate::tables::HuffTable;

const SYM_EOB: u8 = 0x00;
const SYM_ZRL: u8 = 0xF0;

/// Magnitude category and extra bits of a coefficient.
/// Negative values use the one's-complement convention of T.81 Table F.1.
#[inline]
pub(crate) fn encode_value(value: i16) -> (u16, u8) {
    if value == 0 {
        return (0, 0);
    }
    let size = (16 - value.unsigned_abs().leading_zeros()) as u8;
    let bits = if value > 0 { value as u16 } else { (value - 1) as u16 };
    (bits & ((1u16 << size) - 1), size)
}

#[inline]
fn put_symbol(table: &HuffTable, sym: u8, bits: &mut BitPacker, out: &mut Stage) -> Result<()> {
    let len = table.size[sym as usize];
    if len == 0 {
        // cannot happen with the fixed Annex K tables and valid coefficients
        return Err(EncodeError::State("symbol missing from Huffman table"));
    }
    bits.put_bits(out, table.code[sym as usize], len)
}

/// Entropy-code one quantized block (zig-zag order), updating the
/// component's DC predictor.
pub(crate) fn encode_block(
    zz: &[i16; 64],
    dc_pred: &mut i16,
    dc_table: &HuffTable,
    ac_table: &HuffTable,
    bits: &mut BitPacker,
    out: &mut Stage,
) -> Result<()> {
    // DC: differential against the predictor, then category + extra bits
    let diff = zz[0] - *dc_pred;
    *dc_pred = zz[0];
    let (dc_bits, dc_size) = encode_value(diff);
    put_symbol(dc_table, dc_size, bits, out)?;
    if dc_size > 0 {
        bits.put_bits(out, dc_bits, dc_size)?;
    }

    // AC: run-length of zeros + category, ZRL for runs of 16, EOB at end
    let mut k = 1;
    while k < 64 {
        let mut run = 0;
        while k + run < 64 && zz[k + run] == 0 {
            run += 1;
        }
        if k + run >= 64 {
            put_symbol(ac_table, SYM_EOB, bits, out)?;
            break;
        }
        while run >= 16 {
            put_symbol(ac_table, SYM_ZRL, bits, out)?;
            run -= 16;
            k += 16;
        }
        k += run;
        let (ac_bits, ac_size) = encode_value(zz[k]);
        debug_assert!(ac_size <= 10, "AC coefficient out of baseline range");
        put_symbol(ac_table, ((run as u8) << 4) | ac_size, bits, out)?;
        bits.put_bits(out, ac_bits, ac_size)?;
        k += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{LUMA_AC_HUFF, LUMA_DC_HUFF};

    #[test]
    fn value_categories() {
        assert_eq!(encode_value(0), (0, 0));
        assert_eq!(encode_value(1), (1, 1));
        assert_eq!(encode_value(-1), (0, 1));
        assert_eq!(encode_value(3), (0b11, 2));
        assert_eq!(encode_value(-3), (0b00, 2));
        assert_eq!(encode_value(-4), (0b011, 3));
        assert_eq!(encode_value(7), (0b111, 3));
        assert_eq!(encode_value(1023), (0x3FF, 10));
        assert_eq!(encode_value(-1023), (0, 10));
    }

    fn extend(bits: u16, size: u8) -> i16 {
        // decoder-side sign extension, for round-trip checks
        if size == 0 {
            return 0;
        }
        if (bits as i32) < (1 << (size - 1)) {
            (bits as i32 - (1 << size) + 1) as i16
        } else {
            bits as i16
        }
    }

    #[test]
    fn value_roundtrip() {
        for v in -1024i16..=1024 {
            let (bits, size) = encode_value(v);
            assert_eq!(extend(bits, size), v, "round-trip failed for {v}");
        }
    }

    #[test]
    fn flat_block_is_dc_plus_eob() {
        // DC diff 0 (2-bit code) + EOB (4 bits) = 6 pending bits, no bytes
        let zz = [0i16; 64];
        let mut pred = 0i16;
        let mut bits = BitPacker::new();
        let mut out = Stage::new();
        encode_block(&zz, &mut pred, &LUMA_DC_HUFF, &LUMA_AC_HUFF, &mut bits, &mut out).unwrap();
        assert_eq!(out.len(), 0);
        assert_eq!(bits.pending(), 6);
    }

    #[test]
    fn dc_predictor_updates_to_raw_dc() {
        let mut zz = [0i16; 64];
        zz[0] = 37;
        let mut pred = 12i16;
        let mut bits = BitPacker::new();
        let mut out = Stage::new();
        encode_block(&zz, &mut pred, &LUMA_DC_HUFF, &LUMA_AC_HUFF, &mut bits, &mut out).unwrap();
        assert_eq!(pred, 37);
    }

    #[test]
    fn long_zero_run_uses_zrl() {
        // one nonzero coefficient after 20 zeros: ZRL + (run 4, size 1)
        let mut zz = [0i16; 64];
        zz[0] = 5;
        zz[21] = 1;
        let mut pred = 5i16; // DC diff 0
        let mut bits = BitPacker::new();
        let mut out = Stage::new();
        encode_block(&zz, &mut pred, &LUMA_DC_HUFF, &LUMA_AC_HUFF, &mut bits, &mut out).unwrap();
        // DC cat0 (2) + ZRL (11) + rs 0x41 + 1 extra + EOB (4)
        let rs_len = LUMA_AC_HUFF.size[0x41] as usize;
        let total = 2 + 11 + rs_len + 1 + 4;
        assert_eq!(out.len() * 8 + bits.pending() as usize, total);
    }

    #[test]
    fn block_ending_in_nonzero_has_no_eob() {
        let mut zz = [0i16; 64];
        zz[63] = -1;
        let mut pred = 0i16;
        let mut bits = BitPacker::new();
        let mut out = Stage::new();
        encode_block(&zz, &mut pred, &LUMA_DC_HUFF, &LUMA_AC_HUFF, &mut bits, &mut out).unwrap();
        // DC cat0 (2) + 3x ZRL (11 each) + rs 0xE1 + 1 extra bit, no EOB.
        // The third ZRL starts byte-aligned, so its first 8 bits flush as
        // a literal 0xFF and pick up one stuffed 0x00 byte.
        let rs_len = LUMA_AC_HUFF.size[0xE1] as usize;
        let code_bits = 2 + 3 * 11 + rs_len + 1;
        assert_eq!(out.len() * 8 + bits.pending() as usize, code_bits + 8);
        let ff = out.as_slice().iter().position(|&b| b == 0xFF).unwrap();
        assert_eq!(out.as_slice()[ff + 1], 0x00);
    }
}
