//! The ISO 8601 week calendar.
//!
//! ISO years consist of 52 or 53 whole weeks and start on the Monday
//! closest to January 1 of the Gregorian year. Instead of searching for
//! that Monday, the conversions interpolate: elapsed ISO years map to
//! elapsed weeks through a fixed-point linear form per century, with a
//! century-dependent offset. The week cycle and the 400-year calendar
//! cycle are aligned (day 1 of a quadricentury is always a Monday), which
//! keeps the century handling exact.
//!
//! The century offsets come from a closed-form remap of the century index
//! rather than a lookup table; any value from the admissible corridor
//! works, and the closed form picks one.

use rata_core::constants::WEEKS_PER_QUADCENTURY;
use rata_core::math::{self, GmDivisor};
use rata_core::{CalError, CalResult};

use crate::civil::WeekDate;

// Century offset for the years-to-weeks interpolation
// `w = (y * 53431 + b[c]) / 1024`.
#[inline]
fn ccofs_y2w(cc: u32) -> u32 {
    let cc = 1u32.wrapping_sub(cc) & 3;
    let cc = (cc << 1) - (cc >> 1);
    157 + cc * 146
}

// Century offset for the weeks-to-years interpolation
// `y = (w * 157 + b[c]) / 8192`.
#[inline]
fn ccofs_w2y(cc: u32) -> u32 {
    let cc = (2u32.wrapping_add(cc)) & 3;
    let cc = (cc << 1) - (cc >> 1);
    18 + cc * 22
}

fn weeks_in_years_wide(years: i32) -> i64 {
    let (qc, rc) = math::i32_div_floor(years, 100);
    // A century holds 5218 weeks, minus one week every 400 years for the
    // defective second century of the cycle.
    (qc as i64) * 5218 - ((qc + 2) >> 2) as i64 + ((rc * 53_431 + ccofs_y2w(qc as u32)) >> 10) as i64
}

/// Elapsed weeks corresponding to `years` elapsed ISO years.
///
/// Fails with [`CalError::OutOfRange`] when the week count leaves `i32`.
pub fn weeks_in_years(years: i32) -> CalResult<i32> {
    let w = weeks_in_years_wide(years);
    if w > i32::MAX as i64 || w < i32::MIN as i64 {
        return Err(CalError::OutOfRange("week count does not fit i32"));
    }
    Ok(w as i32)
}

/// RDN of the first day of the given ISO year.
///
/// A 16-bit year cannot overflow the 32-bit day scale, so this cannot
/// fail.
pub fn year_start_wd(y: i16) -> i32 {
    weeks_in_years_wide(y as i32 - 1) as i32 * 7 + 1
}

// Era-week split, wide-register path: (weeks * 4 + 2) by 20871 under floor
// rules.
fn century_split_wide(weeks: i32) -> (u32, u32) {
    let m = ((weeks < 0) as u64).wrapping_neg();
    let n = ((weeks as i64 as u64) << 2) | 2;
    let q = (m ^ ((m ^ n) / WEEKS_PER_QUADCENTURY as u64)) as u32;
    (q, (n as u32).wrapping_sub(q.wrapping_mul(WEEKS_PER_QUADCENTURY)))
}

// Same split with a Granlund-Moeller step, normalization shift 17.
fn century_split_soft(weeks: i32) -> (u32, u32) {
    let m = ((weeks < 0) as u32).wrapping_neg();
    let d = ((weeks as i64 as u64) << (17 + 2)).wrapping_add(2 << 17);
    let (q, r) = math::u32_div_gm(
        ((d >> 32) as u32) ^ m,
        (d as u32) ^ m,
        GmDivisor::QUADCENTURY_WEEKS,
    );
    (q ^ m, ((r >> 17) ^ m).wrapping_add(WEEKS_PER_QUADCENTURY & m))
}

/// Splits elapsed era weeks into elapsed ISO years and the elapsed weeks
/// of the remaining partial year.
pub fn split_era_weeks(weeks: i32) -> (i32, u32) {
    let (q, sw) = if cfg!(feature = "soft-div") {
        century_split_soft(weeks)
    } else {
        century_split_wide(weeks)
    };

    let cc = q as i32;

    // Scale the in-century weeks up by 157 and peel the years off; sw is
    // non-negative here.
    let sw = (sw >> 2) * 157 + ccofs_w2y(q);
    let cy = sw >> 13;
    let sw = sw & 8_191;

    (100 * cc + cy as i32, (sw as u16 / 157) as u32)
}

/// RDN of a day in the ISO week calendar.
pub fn week_date_to_rdn(y: i16, w: i16, d: i16) -> i32 {
    (weeks_in_years_wide(y as i32 - 1) as i32 + w as i32 - 1) * 7 + d as i32
}

/// Expands an RDN into the ISO week calendar.
///
/// Fails with [`CalError::OutOfRange`] when the ISO year does not fit
/// `i16`.
pub fn rdn_to_week_date(rdn: i32) -> CalResult<WeekDate> {
    let (w, d) = math::i32_sub_div(rdn, 1, 7);
    let (ey, week) = split_era_weeks(w);
    if ey >= i16::MAX as i32 || ey < i16::MIN as i32 - 1 {
        return Err(CalError::OutOfRange("ISO year does not fit i16"));
    }
    Ok(WeekDate {
        iso_year: (ey + 1) as i16,
        week: (week + 1) as u8,
        wday: (d + 1) as u8,
    })
}

/// Weeks in the given ISO year, 52 or 53.
pub fn weeks_in_iso_year(y: i16) -> u8 {
    (weeks_in_years_wide(y as i32) - weeks_in_years_wide(y as i32 - 1)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civil::{wd_near, MONDAY};
    use crate::gregorian::year_start_gd;

    #[test]
    fn year_start_matches_the_nearest_monday() {
        for y in i16::MIN..=i16::MAX {
            assert_eq!(
                year_start_wd(y),
                wd_near(year_start_gd(y), MONDAY).unwrap(),
                "y={y}"
            );
        }
    }

    #[test]
    fn division_paths_are_bit_identical() {
        let probes = [i32::MIN, i32::MIN + 1, -20_871, -1, 0, 1, 20_871, i32::MAX - 1, i32::MAX];
        for w in probes {
            assert_eq!(century_split_wide(w), century_split_soft(w), "w={w}");
        }
        let mut x = 0x1357_9bdfu32;
        for _ in 0..4000 {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            let w = x as i32;
            assert_eq!(century_split_wide(w), century_split_soft(w), "w={w}");
        }
    }

    // Trial-and-error reference: find the ISO year whose start brackets
    // the day, then divide the distance by 7.
    fn ref_week_date(rdn: i32) -> WeekDate {
        let start = |y: i32| wd_near(year_start_gd(y as i16), MONDAY).unwrap();
        let mut y0 = (rdn as f64 / 365.2425) as i32;
        while rdn >= start(y0 + 1) {
            y0 += 1;
        }
        while rdn < start(y0) {
            y0 -= 1;
        }
        let off = rdn - start(y0);
        WeekDate {
            iso_year: y0 as i16,
            week: (off / 7 + 1) as u8,
            wday: (off % 7 + 1) as u8,
        }
    }

    #[test]
    fn split_matches_the_trial_reference() {
        // Dense sweep around interesting boundaries, sparse sweep across
        // the representable years.
        for rdn in year_start_wd(1995)..year_start_wd(2005) {
            assert_eq!(rdn_to_week_date(rdn).unwrap(), ref_week_date(rdn), "rdn={rdn}");
        }
        for rdn in (year_start_wd(-9999)..year_start_wd(9999)).step_by(599) {
            assert_eq!(rdn_to_week_date(rdn).unwrap(), ref_week_date(rdn), "rdn={rdn}");
        }
    }

    #[test]
    fn known_week_dates() {
        // 2001-01-01 was a Monday and starts ISO week 2001-W01.
        let wd = rdn_to_week_date(5 * 146_097 + 1).unwrap();
        assert_eq!((wd.iso_year, wd.week, wd.wday), (2001, 1, 1));
        // 1995-01-01 was a Sunday and therefore ISO 1994-W52-7.
        let wd = rdn_to_week_date(year_start_gd(1995)).unwrap();
        assert_eq!((wd.iso_year, wd.week, wd.wday), (1994, 52, 7));
    }

    #[test]
    fn week_date_round_trip() {
        for y in (-9999i16..=9999).step_by(13) {
            for (w, d) in [(1, 1), (1, 7), (26, 3), (52, 7)] {
                let rdn = week_date_to_rdn(y, w, d);
                let wd = rdn_to_week_date(rdn).unwrap();
                assert_eq!((wd.iso_year, wd.week as i16, wd.wday as i16), (y, w, d), "y={y}");
            }
        }
    }

    #[test]
    fn iso_years_hold_52_or_53_weeks() {
        let mut long_years = 0;
        for y in 1990i16..=2030 {
            let n = weeks_in_iso_year(y);
            assert!(n == 52 || n == 53, "y={y} n={n}");
            long_years += (n == 53) as u32;
        }
        // 1992, 1998, 2004, 2009, 2015, 2020 and 2026 are 53-week years.
        assert_eq!(long_years, 7);
        assert_eq!(weeks_in_iso_year(2020), 53);
        assert_eq!(weeks_in_iso_year(2021), 52);
    }

    #[test]
    fn week_count_overflow_reports() {
        assert!(weeks_in_years(i32::MAX).is_err());
        assert!(weeks_in_years(20_000).is_ok());
    }
}
