//! Civil calendar and time-scale conversions on a linear day count.
//!
//! Everything in this crate is anchored on the Rata Die Number (RDN): day
//! 1 is 0001-01-01 of the proleptic Gregorian calendar. Conversions are
//! pure integer arithmetic, run in constant time, never allocate, and are
//! built to behave identically on 32-bit targets without wide hardware
//! division (see the `soft-div` feature).
//!
//! # Supported abstractions
//!
//! | Module | Abstraction |
//! |--------|-------------|
//! | [`gregorian`] | Proleptic Gregorian calendar, RDN anchored |
//! | [`julian`] | Proleptic Julian calendar (0001-01-01 Julian is RDN -1) |
//! | [`isoweek`] | ISO 8601 week calendar |
//! | [`scales::unix`] | UNIX seconds to days / RDN splitting |
//! | [`scales::ntp`] | NTP 32-bit seconds, era-folded |
//! | [`scales::gps`] | GPS truncated week + time-of-week stamps |
//! | [`tz`] | POSIX `TZ` strings, parsing and UTC/local conversion |
//!
//! # Features
//!
//! - `serde`: serialization derives on the public value types.
//! - `soft-div`: route the wide divisions through the Granlund-Moeller
//!   reciprocal path instead of native 64-bit division. Both paths are
//!   always compiled and produce bit-identical results; the feature only
//!   selects which one the conversions use.
//!
//! # Usage
//!
//! ```
//! use rata_time::gregorian::{date_to_rdn_gd, rdn_to_date_gd};
//! use rata_time::scales::unix::time_to_rdn;
//!
//! // 2024-03-01, via the calendar and via a UNIX stamp.
//! let rdn = date_to_rdn_gd(2024, 3, 1);
//! let (day, secs) = time_to_rdn(1_709_251_200);
//! assert_eq!(day, rdn as i64);
//! assert_eq!(secs, 0);
//!
//! let date = rdn_to_date_gd(rdn).unwrap();
//! assert_eq!((date.month, date.day, date.leap), (3, 1, true));
//! ```

pub mod civil;
pub mod constants;
pub mod gregorian;
pub mod isoweek;
pub mod julian;
pub mod scales;
pub mod tz;

pub use civil::{CivilDate, CivilTime, WeekDate};
pub use rata_core::{CalError, CalResult};
pub use scales::gps::GpsRawTime;
pub use tz::{ConvCtx, ConvInfo, Hint, PosixRule, PosixZone};
