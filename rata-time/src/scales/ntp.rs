//! The NTP second scale.
//!
//! NTP counts seconds since 1900-01-01 in 32 bits, which rolls over every
//! 136 years. Folding a `time_t` onto that scale is a wrapping subtraction
//! of the scale phase; unfolding needs a pivot to pick the era, and the
//! result lands within 2^31 seconds of it.

use crate::constants::SYS_PHI_NTP;
use crate::scales::now_unix;

/// Maps an absolute UNIX time stamp onto the NTP second scale.
#[inline]
pub fn time_to_ntp(tt: i64) -> u32 {
    (tt as u32).wrapping_sub(SYS_PHI_NTP)
}

/// Expands NTP-scale seconds of unknown era into a UNIX time stamp.
///
/// The result lies in `[pivot - 2^31, pivot + 2^31)`; when no pivot is
/// given the current system time is substituted. Stamps before the UNIX
/// epoch are never produced.
pub fn ntp_to_time(secs: u32, pivot: Option<i64>) -> i64 {
    let tbase = (pivot.unwrap_or_else(now_unix) - (1 << 31)).max(0);
    // Periodic expansion mod 2^32: align the NTP scale to the UNIX scale,
    // take the cycle difference to the base, and add it back.
    let diff = secs
        .wrapping_add(SYS_PHI_NTP)
        .wrapping_sub(tbase as u32);
    tbase + diff as i64
}
