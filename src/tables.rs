//! Quantization and Huffman constants.
//!
//! All tables are fixed: the ITU-T T.81 Annex K quantization tables
//! scaled for each quality preset with the IJG rule, and the Annex K
//! Huffman tables with their canonical codes. Everything is derived at
//! compile time; table selection at run time is a plain index.

// zig-zag scan order: entry k is the natural (row-major) index of the
// k-th coefficient in zig-zag sequence

#[rustfmt::skip]
pub(crate) const ZZ: [usize; 64] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

// base quantization tables (Annex K, natural order)

#[rustfmt::skip]
const BASE_LUMA: [u8; 64] = [
    16,  11,  10,  16,  24,  40,  51,  61,
    12,  12,  14,  19,  26,  58,  60,  55,
    14,  13,  16,  24,  40,  57,  69,  56,
    14,  17,  22,  29,  51,  87,  80,  62,
    18,  22,  37,  56,  68, 109, 103,  77,
    24,  35,  55,  64,  81, 104, 113,  92,
    49,  64,  78,  87, 103, 121, 120, 101,
    72,  92,  95,  98, 112, 100, 103,  99,
];

#[rustfmt::skip]
const BASE_CHROMA: [u8; 64] = [
    17,  18,  24,  47,  99,  99,  99,  99,
    18,  21,  26,  66,  99,  99,  99,  99,
    24,  26,  56,  99,  99,  99,  99,  99,
    47,  66,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
];

// quality presets as IJG percentages; 0 is clamped to 1 by the scaler
const QUALITY_PERCENT: [u16; 6] = [0, 10, 50, 90, 95, 100];

/// Scale a base table with the IJG quality rule, clamping to 1..=255
/// (8-bit DQT precision).
const fn scale_quant(base: &[u8; 64], percent: u16) -> [u16; 64] {
    let q = if percent < 1 {
        1
    } else if percent > 100 {
        100
    } else {
        percent as u32
    };
    let scale = if q < 50 { 5000 / q } else { 200 - 2 * q };

    let mut out = [0u16; 64];
    let mut i = 0;
    while i < 64 {
        let mut v = (base[i] as u32 * scale + 50) / 100;
        if v < 1 {
            v = 1;
        }
        if v > 255 {
            v = 255;
        }
        out[i] = v as u16;
        i += 1;
    }
    out
}

const fn scale_presets(base: &[u8; 64]) -> [[u16; 64]; 6] {
    let mut out = [[0u16; 64]; 6];
    let mut p = 0;
    while p < 6 {
        out[p] = scale_quant(base, QUALITY_PERCENT[p]);
        p += 1;
    }
    out
}

/// Quantization tables in natural order, indexed by quality preset.
pub(crate) static LUMA_QUANT: [[u16; 64]; 6] = scale_presets(&BASE_LUMA);
pub(crate) static CHROMA_QUANT: [[u16; 64]; 6] = scale_presets(&BASE_CHROMA);

// Huffman table specs (Annex K): code-length counts + symbol values

pub(crate) const LUMA_DC_BITS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
pub(crate) const LUMA_DC_VALS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

pub(crate) const CHROMA_DC_BITS: [u8; 16] = [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];
pub(crate) const CHROMA_DC_VALS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

pub(crate) const LUMA_AC_BITS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 0x7D];
#[rustfmt::skip]
pub(crate) const LUMA_AC_VALS: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08, 0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2A, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7,
    0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5,
    0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
    0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8,
    0xF9, 0xFA,
];

pub(crate) const CHROMA_AC_BITS: [u8; 16] = [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 0x77];
#[rustfmt::skip]
pub(crate) const CHROMA_AC_VALS: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91, 0xA1, 0xB1, 0xC1, 0x09, 0x23, 0x33, 0x52, 0xF0,
    0x15, 0x62, 0x72, 0xD1, 0x0A, 0x16, 0x24, 0x34, 0xE1, 0x25, 0xF1, 0x17, 0x18, 0x19, 0x1A, 0x26,
    0x27, 0x28, 0x29, 0x2A, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5,
    0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3,
    0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA,
    0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8,
    0xF9, 0xFA,
];

/// Huffman encode table: symbol → (canonical code, code length).
/// Length 0 marks a symbol absent from the table.
pub(crate) struct HuffTable {
    pub code: [u16; 256],
    pub size: [u8; 256],
}

impl HuffTable {
    /// Assign canonical codes per ITU-T T.81 Annex C.
    const fn build(bits: &[u8; 16], vals: &[u8]) -> Self {
        let mut code = [0u16; 256];
        let mut size = [0u8; 256];
        let mut c: u32 = 0;
        let mut si = 0;
        let mut len = 1;
        while len <= 16 {
            let mut n = bits[len - 1];
            while n > 0 {
                let sym = vals[si] as usize;
                code[sym] = c as u16;
                size[sym] = len as u8;
                si += 1;
                c += 1;
                n -= 1;
            }
            c <<= 1;
            len += 1;
        }
        Self { code, size }
    }
}

pub(crate) static LUMA_DC_HUFF: HuffTable = HuffTable::build(&LUMA_DC_BITS, &LUMA_DC_VALS);
pub(crate) static LUMA_AC_HUFF: HuffTable = HuffTable::build(&LUMA_AC_BITS, &LUMA_AC_VALS);
pub(crate) static CHROMA_DC_HUFF: HuffTable = HuffTable::build(&CHROMA_DC_BITS, &CHROMA_DC_VALS);
pub(crate) static CHROMA_AC_HUFF: HuffTable = HuffTable::build(&CHROMA_AC_BITS, &CHROMA_AC_VALS);
