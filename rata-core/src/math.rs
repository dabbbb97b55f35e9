//! Integer building blocks: floor division, mod-7 residues, and normalized
//! reciprocal division.
//!
//! All division here follows the floor convention: the remainder is always
//! non-negative and strictly smaller than the divisor, for any sign of the
//! dividend. The signed paths run on the unsigned bit pattern behind a
//! one's-complement mask, so every function costs a single machine divide
//! and no data-dependent branches.
//!
//! The [`GmDivisor`] family implements the Granlund-Möller scheme: dividing
//! a wide dividend by a pre-normalized 32-bit divisor using only 32x32
//! multiplies. This is the fallback for targets whose 64-by-32 division is
//! slow or missing; [`i64_div_gm`] is bit-identical to [`i64_div_floor`]
//! for matching divisor parameters, and the test suite holds the two
//! against each other.

/// Pre-normalized divisor for Granlund-Möller division.
///
/// `d` is the divisor scaled so its top bit is set, `v` the approximate
/// fix-point inverse `(2^64 - 1) / d - 2^32`, and `s` the normalization
/// shift that was applied. The constants below cover every cycle length
/// the calendar code divides by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GmDivisor {
    /// Normalized divisor, `2^31 <= d < 2^32`.
    pub d: u32,
    /// Approximate fix-point inverse of `d`.
    pub v: u32,
    /// Normalization shift, `0 <= s < 32`.
    pub s: u32,
}

impl GmDivisor {
    /// Days in a 400-year Gregorian cycle: `146097 << 14`.
    pub const QUADCENTURY_DAYS: Self = Self { d: 0x8eac_4000, v: 0xcb58_35e6, s: 14 };
    /// Days in a 4-year leap cycle: `1461 << 21`.
    pub const LEAP_CYCLE_DAYS: Self = Self { d: 0xb6a0_0000, v: 0x66db_072f, s: 21 };
    /// ISO weeks in a 400-year cycle: `20871 << 17`.
    pub const QUADCENTURY_WEEKS: Self = Self { d: 0xa30e_0000, v: 0x91ed_2f29, s: 17 };
    /// Seconds in a day: `86400 << 15`.
    pub const DAY_SECONDS: Self = Self { d: 0xa8c0_0000, v: 0x845c_8a0c, s: 15 };
    /// Seconds in a 1024-week GPS era: `(604800 * 1024) << 2`.
    pub const GPS_ERA_SECONDS: Self = Self { d: 0x93a8_0000, v: 0xbbd7_7933, s: 2 };

    /// The plain (unscaled) divisor value.
    #[inline]
    pub const fn divisor(self) -> u32 {
        self.d >> self.s
    }
}

/// Floor-divides a signed 32-bit value by an unsigned divisor.
///
/// Returns `(q, r)` with `q = floor(n / d)` and `r = n - q * d`, so
/// `0 <= r < d` holds for negative dividends as well.
#[inline]
pub const fn i32_div_floor(n: i32, d: u32) -> (i32, u32) {
    let m = ((n < 0) as u32).wrapping_neg();
    let q = m ^ ((m ^ n as u32) / d);
    (q as i32, (n as u32).wrapping_sub(q.wrapping_mul(d)))
}

/// Floor-divides the wrap-safe difference `a - b` by `d`.
///
/// The subtraction is evaluated on the unsigned bit pattern, so the pair
/// may straddle the full `i32` range without overflowing.
#[inline]
pub const fn i32_sub_div(a: i32, b: i32, d: u32) -> (i32, u32) {
    let m = ((a < b) as u32).wrapping_neg();
    let n = (a as u32).wrapping_sub(b as u32);
    let q = m ^ ((m ^ n) / d);
    (q as i32, n.wrapping_sub(q.wrapping_mul(d)))
}

/// Floor-divides a signed 64-bit value by an unsigned 32-bit divisor.
#[inline]
pub const fn i64_div_floor(n: i64, d: u32) -> (i64, u32) {
    let m = ((n < 0) as u64).wrapping_neg();
    let q = m ^ ((m ^ n as u64) / d as u64);
    (q as i64, (n as u64).wrapping_sub(q.wrapping_mul(d as u64)) as u32)
}

// Residues modulo 7 use the identity 2^15 == 1 (mod 7): folding a value
// into its 15-bit digit sum preserves the residue, and the 7 << 17 bias
// keeps the reduced sum non-negative for any 32-bit input.

/// Mathematical (floor) residue of `x` modulo 7, in `0..=6`.
#[inline]
pub const fn i32_mod7(x: i32) -> u32 {
    let xred = (7u32 << 17)
        .wrapping_add((x & 0x7fff) as u32)
        .wrapping_add((x >> 15) as u32);
    xred % 7
}

/// Residue of `a + b` modulo 7, free of intermediate overflow.
#[inline]
pub const fn i32_add_mod7(a: i32, b: i32) -> u32 {
    let xred = (7u32 << 17)
        .wrapping_add((a & 0x7fff) as u32)
        .wrapping_add((a >> 15) as u32)
        .wrapping_add((b & 0x7fff) as u32)
        .wrapping_add((b >> 15) as u32);
    xred % 7
}

/// Residue of `a - b` modulo 7, free of intermediate overflow.
#[inline]
pub const fn i32_sub_mod7(a: i32, b: i32) -> u32 {
    let xred = (7u32 << 17)
        .wrapping_add((a & 0x7fff) as u32)
        .wrapping_add((a >> 15) as u32)
        .wrapping_sub((b & 0x7fff) as u32)
        .wrapping_sub((b >> 15) as u32);
    xred % 7
}

/// Single Granlund-Möller division step.
///
/// Divides the double-width dividend `u1:u0` by the normalized divisor,
/// requiring `u1 < dv.d`. Returns quotient and remainder of the step.
/// The first correction is taken about half the time, the second rarely.
#[inline]
pub const fn u32_div_gm(u1: u32, u0: u32, dv: GmDivisor) -> (u32, u32) {
    let accu = (u1 as u64) * (dv.v as u64) + u0 as u64;
    let q0 = accu as u32;
    let mut q1 = ((accu >> 32) as u32).wrapping_add(u1).wrapping_add(1);
    let mut r = u0.wrapping_sub(q1.wrapping_mul(dv.d));
    if r > q0 {
        q1 = q1.wrapping_sub(1);
        r = r.wrapping_add(dv.d);
    }
    if r >= dv.d {
        q1 += 1;
        r -= dv.d;
    }
    (q1, r)
}

/// Chained Granlund-Möller division of an `i64` by a `u32`, floor rules.
///
/// The dividend is split into three limbs under the normalization shift,
/// negative inputs run through a one's-complement mask, and two core steps
/// produce the 64-bit quotient. Results match [`i64_div_floor`] bit for
/// bit when `dv` encodes the same divisor.
pub const fn i64_div_gm(u: i64, dv: GmDivisor) -> (i64, u32) {
    let m = ((u < 0) as u32).wrapping_neg();
    let s = dv.s;
    let ut = u as u64;

    let utl = m ^ (ut << s) as u32;
    let utm = m ^ (ut >> (32 - s)) as u32;
    let uth = if s > 0 {
        (m >> (32 - s)) ^ (ut >> (64 - s)) as u32
    } else {
        0
    };

    let (qh, rh) = u32_div_gm(uth, utm, dv);
    let (ql, rl) = u32_div_gm(rh, utl, dv);

    let q = (((m ^ qh) as u64) << 32) | (m ^ ql) as u64;
    let r = ((m ^ rl).wrapping_add(m & dv.d)) >> s;
    (q as i64, r)
}
