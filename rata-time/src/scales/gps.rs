//! The GPS raw time scale.
//!
//! GPS receivers deliver a truncated stamp: a 10-bit week number and the
//! seconds in that week. An era of 1024 weeks spans less than 20 years, so
//! every stamp is ambiguous and must be unfolded against a base time the
//! caller trusts (a build date, a last-known-good time, or the system
//! clock).
//!
//! GPS time runs ahead of UTC by the accumulated leap seconds; the `ls`
//! parameter of the mappings is that offset, so `GPS = UTC + ls`. The
//! library keeps no leap second table, the current offset is supplied by
//! the caller.
//!
//! Some receivers also emit civil dates with a two-digit year that sticks
//! to the wrong century after an era rollover. [`full_year`] repairs those
//! with the inverse Zeller recovery when a weekday is available, and
//! [`date_unfold`] folds the repaired date into the era of a base day.

use rata_core::constants::{SECONDS_PER_DAY, SECONDS_PER_WEEK};
use rata_core::math::{self, GmDivisor};
use rata_core::{CalError, CalResult};

use crate::constants::{
    DAYS_PER_GPS_ERA, PHI_GPS_DAYS, RDN_GPS, SECONDS_PER_GPS_ERA, SYS_PHI_GPS,
};
use crate::gregorian::{self, date_to_rdn_gd};
use crate::scales::now_unix;

/// A raw GPS time stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsRawTime {
    /// Week number in the GPS era, 0..=1023.
    pub week: u16,
    /// Seconds in the week, 0..=604799.
    pub tow: u32,
}

fn era_rem_wide(tt: i64) -> u32 {
    math::i64_div_floor(tt, SECONDS_PER_GPS_ERA).1
}

fn era_rem_soft(tt: i64) -> u32 {
    math::i64_div_gm(tt, GmDivisor::GPS_ERA_SECONDS).1
}

/// Maps an absolute UNIX time stamp to a raw GPS stamp.
///
/// The stamp is reduced into a single era first; a GPS era fits 30 bits,
/// so the phase shift and the leap second correction stay in 32-bit range
/// afterwards.
pub fn map_time(tt: i64, ls: i16) -> GpsRawTime {
    let reduced = if cfg!(feature = "soft-div") {
        era_rem_soft(tt)
    } else {
        era_rem_wide(tt)
    };
    let secs = reduced as i32 - SYS_PHI_GPS + ls as i32;
    let (q, r) = math::i32_div_floor(secs, SECONDS_PER_WEEK);
    GpsRawTime {
        week: (q & 1023) as u16,
        tow: r,
    }
}

/// Unfolds a raw GPS stamp into a day number and the time in the day.
///
/// Day-based variant: the time of week is factored into days up front, so
/// the era alignment runs on day counts alone. The base day is clamped to
/// the GPS epoch; days before it never come out.
pub fn map_raw_days(week: u16, tow: u32, ls: i16, base_rdn: i32) -> CalResult<(i32, u32)> {
    // Split the time in week into days and time of day, applying the leap
    // second correction on the fly.
    let (dcarry, tday) = math::i32_sub_div(tow as i32, ls as i32, SECONDS_PER_DAY);

    // Accumulated days, including the phase between GPS weeks and the RDN
    // scale.
    let days = (week & 1023) as i32 * 7 + dcarry + PHI_GPS_DAYS;

    let base = base_rdn.max(RDN_GPS);
    let (_, offs) = math::i32_sub_div(days + 1, base, DAYS_PER_GPS_ERA);
    if offs > (i32::MAX as u32).wrapping_sub(base as u32) {
        return Err(CalError::OutOfRange("unfolded day past the day range"));
    }
    Ok((base.wrapping_add(offs as i32), tday))
}

/// Unfolds a raw GPS stamp into a UNIX time stamp.
///
/// Seconds-based variant: aligns the GPS cycle to the UNIX epoch and adds
/// the cycle difference to the base time. With no base given, a window
/// centered on the current system time is used. The base is clamped so
/// the result never precedes the GPS epoch.
pub fn map_raw_time(week: u16, tow: u32, ls: i16, base: Option<i64>) -> i64 {
    const FCYCLE: i64 = SECONDS_PER_GPS_ERA as i64;

    let secs = (week & 1023) as i32 * SECONDS_PER_WEEK as i32 + tow as i32 - ls as i32 + SYS_PHI_GPS;

    let mut tbase = base.unwrap_or_else(|| now_unix() - (FCYCLE >> 1));
    if tbase < SYS_PHI_GPS as i64 {
        tbase = SYS_PHI_GPS as i64;
    }

    let r = secs as i64 - tbase;
    let rem = if cfg!(feature = "soft-div") {
        era_rem_soft(r)
    } else {
        era_rem_wide(r)
    };
    tbase + rem as i64
}

/// Folds a day number into the 1024-week era starting at the base day.
pub fn remap_rdn(rdn: i32, base_rdn: i32) -> CalResult<i32> {
    let (_, offs) = math::i32_sub_div(rdn, base_rdn, DAYS_PER_GPS_ERA);
    if offs > (i32::MAX as u32).wrapping_sub(base_rdn as u32) {
        return Err(CalError::OutOfRange("remapped day past the day range"));
    }
    Ok(base_rdn.wrapping_add(offs as i32))
}

/// Establishes a full year from a possibly truncated receiver year.
///
/// Years at or past 1980 are taken literally. Otherwise the two-digit
/// year, date and weekday are run through the inverse Zeller recovery
/// against a 1980 base; when no weekday is known (or the tuple is
/// impossible) the year maps into the fixed window 1980..=2079.
pub fn full_year(y: i16, m: u8, d: u8, wd: Option<u8>) -> i16 {
    if y >= 1980 {
        return y;
    }
    let yy = math::i32_div_floor(y as i32, 100).1 as u16;
    if let Some(w) = wd {
        if let Ok(z) = gregorian::rellez_gd(yy, m as u16, d as u16, w as u16, 1980) {
            return z;
        }
    }
    if yy >= 80 {
        (yy + 1900) as i16
    } else {
        (yy + 2000) as i16
    }
}

/// Unfolds a receiver civil date of unknown era into the era of the base
/// day.
///
/// The year is repaired with [`full_year`] first, the date evaluated to a
/// day number, and the result folded forward from the base with
/// [`remap_rdn`]; receivers with a plain 1024-week rollover come out on
/// the correct day this way.
pub fn date_unfold(y: i16, m: u8, d: u8, wd: Option<u8>, base_rdn: i32) -> CalResult<i32> {
    remap_rdn(
        date_to_rdn_gd(full_year(y, m, d, wd), m as i16, d as i16),
        base_rdn,
    )
}
