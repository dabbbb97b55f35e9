//! The proleptic Julian civil calendar.
//!
//! Same machinery as [`gregorian`](crate::gregorian), with a simpler leap
//! rule: every fourth year, no century exceptions. The day-number split is
//! a single phase over the 1461-day cycle, and the scale sits two days off
//! the Gregorian one: 0001-01-01 Julian is RDN -1.

use rata_core::constants::DAYS_PER_LEAP_CYCLE;
use rata_core::math::{self, GmDivisor};
use rata_core::{CalError, CalResult};

use crate::civil::{self, CivilDate, SHIFTED_MONTH_DAYS};

/// Leap days contained in `ey` elapsed Julian years: a floor division by
/// four, which the arithmetic shift performs directly.
#[inline]
pub fn leap_days_in_years_jd(ey: i32) -> i32 {
    ey >> 2
}

// Year split over rdn * 4 + 7, wide-register path.
fn year_split_wide(rdn: i32) -> (i32, u32) {
    let m = ((rdn < -1) as u64).wrapping_neg();
    let n = ((rdn as i64 as u64) << 2).wrapping_add(7);
    let q = m ^ ((m ^ n) / DAYS_PER_LEAP_CYCLE as u64);
    (
        q as u32 as i32,
        (n as u32).wrapping_sub((q as u32).wrapping_mul(DAYS_PER_LEAP_CYCLE)),
    )
}

// Same split with a Granlund-Moeller step, normalization shift 21.
fn year_split_soft(rdn: i32) -> (i32, u32) {
    let m = ((rdn < -1) as u32).wrapping_neg();
    let d = ((rdn as i64 as u64) << (21 + 2)).wrapping_add(7 << 21);
    let (q, r) = math::u32_div_gm(
        ((d >> 32) as u32) ^ m,
        (d as u32) ^ m,
        GmDivisor::LEAP_CYCLE_DAYS,
    );
    ((q ^ m) as i32, ((r >> 21) ^ m).wrapping_add(DAYS_PER_LEAP_CYCLE & m))
}

/// Splits an RDN into elapsed Julian years, elapsed days in the year and
/// the leap year flag.
pub fn days_to_years_jd(rdn: i32) -> (i32, u32, bool) {
    let (qy, sday) = if cfg!(feature = "soft-div") {
        year_split_soft(rdn)
    } else {
        year_split_wide(rdn)
    };

    let leap = (qy & 3) == 3;
    (qy, (sday | 3) >> 2, leap)
}

/// Expands an RDN to a full Julian civil date.
///
/// Fails with [`CalError::OutOfRange`] when the year does not fit `i16`.
pub fn rdn_to_date_jd(rdn: i32) -> CalResult<CivilDate> {
    let (ey, yd, leap) = days_to_years_jd(rdn);
    let year = ey + 1;
    if year < i16::MIN as i32 || year > i16::MAX as i32 {
        return Err(CalError::OutOfRange("calendar year does not fit i16"));
    }
    let (m, d) = civil::days_to_month(yd, leap);
    Ok(CivilDate {
        year: year as i16,
        month: (m + 1) as u8,
        day: (d + 1) as u8,
        yday: (yd + 1) as u16,
        wday: (math::i32_sub_mod7(rdn, 1) + 1) as u8,
        leap,
    })
}

/// RDN of a Julian calendar date. Month and day may be off-scale.
pub fn date_to_rdn_jd(y: i16, m: i16, d: i16) -> i32 {
    let (carry, dm) = civil::months_to_days(m);
    let ey = y as i32 - 1 + carry;
    ey * 365 + leap_days_in_years_jd(ey) + dm as i32 + d as i32 - 308
}

/// RDN of January 1 of the given Julian year.
pub fn year_start_jd(y: i16) -> i32 {
    let ey = y as i32 - 1;
    ey * 365 + leap_days_in_years_jd(ey) + 1
}

/// Recovers a full Julian year from a two-digit year, date and weekday.
///
/// The Julian inversion differs from the Gregorian one in three points: no
/// centennial special cases, a weekday step of 6 per century (so the
/// modular inverse is 1 and a plain residue suffices), and a 700-year
/// repeat period for the periodic extension.
pub fn rellez_jd(y: u16, m: u16, d: u16, w: u16, ybase: i16) -> CalResult<i16> {
    let mut y = y % 100;
    let w = w % 7;
    let mut d = d.wrapping_sub(1);
    if !(1..=12).contains(&m) || d > 32 {
        return Err(CalError::InvalidInput("date tuple out of range"));
    }

    let mut m = m + 9;
    if m >= 12 {
        m -= 12;
    } else {
        y = y.wrapping_sub(1);
        if y > 100 {
            y = y.wrapping_add(100);
        }
    }

    if d >= SHIFTED_MONTH_DAYS[usize::from(((y + 1) & 3) == 0)][m as usize] as u16 {
        return Err(CalError::InvalidInput("day of month out of range"));
    }

    // Zeller's congruence; day zero of the shifted Julian scale
    // (0000-03-01) was a Monday.
    d += y + (y >> 2);
    d += (m * 83 + 16) >> 5;
    let mut c = (d + 7 + civil::MONDAY as u16 - w) % 7;

    if m > 9 {
        y += 1;
        if y >= 100 {
            y -= 100;
            c = (c + 1) & 3;
        }
    }
    let y = y + c * 100;

    let (_, r) = math::i32_sub_div(y as i32, ybase as i32, 700);
    if r as i32 > i16::MAX as i32 - ybase as i32 {
        return Err(CalError::OutOfRange("recovered year past i16::MAX"));
    }
    Ok((ybase as i32 + r as i32) as i16)
}
