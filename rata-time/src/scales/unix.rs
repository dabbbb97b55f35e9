//! Splitting UNIX seconds into days and seconds in the day.

use rata_core::constants::SECONDS_PER_DAY;
use rata_core::math::{self, GmDivisor};

use crate::constants::RDN_UNIX;

fn days_split_wide(tt: i64) -> (i64, u32) {
    math::i64_div_floor(tt, SECONDS_PER_DAY)
}

fn days_split_soft(tt: i64) -> (i64, u32) {
    math::i64_div_gm(tt, GmDivisor::DAY_SECONDS)
}

/// Splits seconds into whole days and seconds since midnight.
///
/// A plain floor division by 86400; no epoch or era is assumed, so feeding
/// it a wallclock `time_t` yields days and seconds in the UNIX epoch.
pub fn time_to_days(tt: i64) -> (i64, u32) {
    if cfg!(feature = "soft-div") {
        days_split_soft(tt)
    } else {
        days_split_wide(tt)
    }
}

/// Splits an absolute UNIX time stamp into the RDN of its Gregorian civil
/// date and the seconds since midnight.
pub fn time_to_rdn(tt: i64) -> (i64, u32) {
    let (days, secs) = time_to_days(tt);
    (days + RDN_UNIX as i64, secs)
}
