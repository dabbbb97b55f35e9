//! Mappings between second-valued time scales and the day-number scale.
//!
//! | Module | Scale |
//! |--------|-------|
//! | [`unix`] | UNIX seconds since 1970-01-01 |
//! | [`ntp`] | NTP 32-bit seconds since 1900-01-01, era-folded |
//! | [`gps`] | GPS truncated week number plus seconds in week |

pub mod gps;
pub mod ntp;
pub mod unix;

pub(crate) fn now_unix() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
