//! Forward DCT and quantization.
//!
//! Integer forward transform (IJG "islow", CONST_BITS = 13), two-pass
//! row/column butterfly. Output coefficients are scaled by 8; the
//! quantizer folds that factor into its divisor and rounds half away
//! from zero, writing the block directly in zig-zag order.

use crate::tables::ZZ;

// fixed-point constants (CONST_BITS = 13, PASS1_BITS = 2)

const CB: i32 = 13;
const P1: i32 = 2;
const F0298: i32 = 2446;
const F0390: i32 = 3196;
const F0541: i32 = 4433;
const F0765: i32 = 6270;
const F0899: i32 = 7373;
const F1175: i32 = 9633;
const F1501: i32 = 12299;
const F1847: i32 = 15137;
const F1961: i32 = 16069;
const F2053: i32 = 16819;
const F2562: i32 = 20995;
const F3072: i32 = 25172;

#[inline]
fn descale(x: i32, n: i32) -> i32 {
    (x + (1 << (n - 1))) >> n
}

/// In-place forward DCT of one level-shifted 8x8 block (row-major).
/// Input samples must be in [-128, 127]; output is the 2-D DCT scaled
/// by a factor of 8.
pub(crate) fn fdct(d: &mut [i32; 64]) {
    // pass 1: process rows, results scaled up by sqrt(8) and 2^P1
    for row in 0..8 {
        let b = row * 8;
        let tmp0 = d[b] + d[b + 7];
        let tmp7 = d[b] - d[b + 7];
        let tmp1 = d[b + 1] + d[b + 6];
        let tmp6 = d[b + 1] - d[b + 6];
        let tmp2 = d[b + 2] + d[b + 5];
        let tmp5 = d[b + 2] - d[b + 5];
        let tmp3 = d[b + 3] + d[b + 4];
        let tmp4 = d[b + 3] - d[b + 4];

        let tmp10 = tmp0 + tmp3;
        let tmp13 = tmp0 - tmp3;
        let tmp11 = tmp1 + tmp2;
        let tmp12 = tmp1 - tmp2;

        d[b] = (tmp10 + tmp11) << P1;
        d[b + 4] = (tmp10 - tmp11) << P1;

        let z1 = (tmp12 + tmp13).wrapping_mul(F0541);
        d[b + 2] = descale(z1 + tmp13.wrapping_mul(F0765), CB - P1);
        d[b + 6] = descale(z1 - tmp12.wrapping_mul(F1847), CB - P1);

        let z1 = tmp4 + tmp7;
        let z2 = tmp5 + tmp6;
        let z3 = tmp4 + tmp6;
        let z4 = tmp5 + tmp7;
        let z5 = (z3 + z4).wrapping_mul(F1175);

        let t4 = tmp4.wrapping_mul(F0298);
        let t5 = tmp5.wrapping_mul(F2053);
        let t6 = tmp6.wrapping_mul(F3072);
        let t7 = tmp7.wrapping_mul(F1501);
        let z1 = z1.wrapping_mul(-F0899);
        let z2 = z2.wrapping_mul(-F2562);
        let z3 = z3.wrapping_mul(-F1961) + z5;
        let z4 = z4.wrapping_mul(-F0390) + z5;

        d[b + 7] = descale(t4 + z1 + z3, CB - P1);
        d[b + 5] = descale(t5 + z2 + z4, CB - P1);
        d[b + 3] = descale(t6 + z2 + z3, CB - P1);
        d[b + 1] = descale(t7 + z1 + z4, CB - P1);
    }

    // pass 2: process columns, remove the pass-1 scaling
    for col in 0..8 {
        let tmp0 = d[col] + d[col + 56];
        let tmp7 = d[col] - d[col + 56];
        let tmp1 = d[col + 8] + d[col + 48];
        let tmp6 = d[col + 8] - d[col + 48];
        let tmp2 = d[col + 16] + d[col + 40];
        let tmp5 = d[col + 16] - d[col + 40];
        let tmp3 = d[col + 24] + d[col + 32];
        let tmp4 = d[col + 24] - d[col + 32];

        let tmp10 = tmp0 + tmp3;
        let tmp13 = tmp0 - tmp3;
        let tmp11 = tmp1 + tmp2;
        let tmp12 = tmp1 - tmp2;

        d[col] = descale(tmp10 + tmp11, P1);
        d[col + 32] = descale(tmp10 - tmp11, P1);

        let z1 = (tmp12 + tmp13).wrapping_mul(F0541);
        d[col + 16] = descale(z1 + tmp13.wrapping_mul(F0765), CB + P1);
        d[col + 48] = descale(z1 - tmp12.wrapping_mul(F1847), CB + P1);

        let z1 = tmp4 + tmp7;
        let z2 = tmp5 + tmp6;
        let z3 = tmp4 + tmp6;
        let z4 = tmp5 + tmp7;
        let z5 = (z3 + z4).wrapping_mul(F1175);

        let t4 = tmp4.wrapping_mul(F0298);
        let t5 = tmp5.wrapping_mul(F2053);
        let t6 = tmp6.wrapping_mul(F3072);
        let t7 = tmp7.wrapping_mul(F1501);
        let z1 = z1.wrapping_mul(-F0899);
        let z2 = z2.wrapping_mul(-F2562);
        let z3 = z3.wrapping_mul(-F1961) + z5;
        let z4 = z4.wrapping_mul(-F0390) + z5;

        d[col + 56] = descale(t4 + z1 + z3, CB + P1);
        d[col + 40] = descale(t5 + z2 + z4, CB + P1);
        d[col + 24] = descale(t6 + z2 + z3, CB + P1);
        d[col + 8] = descale(t7 + z1 + z4, CB + P1);
    }
}

/// Round-half-away-from-zero division.
#[inline]
fn div_round(n: i32, d: i32) -> i32 {
    if n >= 0 { (n + d / 2) / d } else { -((-n + d / 2) / d) }
}

/// Quantize a transformed block and reorder it into zig-zag sequence.
/// The quantization table is in natural order; the x8 DCT scaling is
/// folded into the divisor.
pub(crate) fn quantize(coef: &[i32; 64], qt: &[u16; 64], zz: &mut [i16; 64]) {
    for k in 0..64 {
        let n = ZZ[k];
        zz[k] = div_round(coef[n], (qt[n] as i32) << 3) as i16;
    }
}
