//! POSIX time zone strings: parsing and conversion.
//!
//! Supports the single-zone POSIX `TZ` format with the GNU `<...>` quoted
//! name extension, e.g. `"CET-1CEST,M3.5.0,M10.5.0/3"`. This is not a zone
//! database: one string describes one standard zone, optionally with a
//! daylight zone and one pair of annual transition rules. The intended use
//! is embedded and otherwise restricted systems that get their zone as a
//! single configuration string and need wallclock conversions on top of
//! it.
//!
//! # Conversion model
//!
//! A parsed [`PosixZone`] is immutable. Conversions go through a
//! [`ConvCtx`], which caches the two transition instants of one calendar
//! year (with a day of slack at both ends); repeated queries in the same
//! year skip the calendar work entirely. The context borrows the zone, so
//! a zone can serve any number of contexts, one per thread.
//!
//! Converting UTC to local time always succeeds. The reverse direction is
//! ambiguous around the transitions: the spring gap names instants that no
//! wallclock shows, and the autumn overlap names instants that occur
//! twice. [`ConvCtx::local_to_utc`] resolves both only through an explicit
//! [`Hint`]; the repeated hour is tagged on the results as hour A (before
//! the backstep) or hour B (after it).
//!
//! # Usage
//!
//! ```
//! use rata_time::tz::{ConvCtx, PosixZone};
//!
//! let (zone, rest) = PosixZone::parse("CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
//! assert!(rest.is_empty());
//!
//! let mut ctx = ConvCtx::new(&zone);
//! // 2024-07-01 00:00:00 UTC is 02:00 CEST.
//! let info = ctx.utc_to_local(1_719_792_000).unwrap();
//! assert!(info.is_dst);
//! assert_eq!(info.offset_seconds, 7200);
//! ```

mod convert;
mod parse;

use core::fmt;

/// A zone abbreviation, stored inline and silently truncated to 11 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneName {
    buf: [u8; 12],
}

impl ZoneName {
    /// Builds a name from a string, keeping at most 11 bytes.
    pub fn new(name: &str) -> Self {
        let mut out = Self::default();
        for (slot, b) in out.buf.iter_mut().zip(name.bytes()) {
            *slot = b;
        }
        out.buf[11] = 0;
        out
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        let end = self.buf.iter().position(|&b| b == 0).unwrap_or(self.buf.len());
        match core::str::from_utf8(&self.buf[..end]) {
            Ok(s) => s,
            // A quoted name may get cut mid character by the inline limit;
            // keep the readable prefix.
            Err(e) => core::str::from_utf8(&self.buf[..e.valid_up_to()]).unwrap_or(""),
        }
    }

    /// True for the all-zero (absent) name.
    pub fn is_empty(&self) -> bool {
        self.buf[0] == 0
    }

    pub(crate) fn push(&mut self, b: u8) {
        if let Some(pos) = self.buf[..11].iter().position(|&c| c == 0) {
            self.buf[pos] = b;
        }
    }
}

impl fmt::Debug for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZoneName({:?})", self.as_str())
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annual transition rule.
///
/// For the `Mm.w.d` form, `mdmw` is the week of the month (5 meaning the
/// last occurrence) and `wday` the day of week with Monday as 1. For the
/// day-of-year forms, `wday` is zero and `mdmw` is the day of the month,
/// possibly extended past its length. A zero `month` marks the absent
/// rule of an all-year zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PosixRule {
    /// Calendar month of the transition, 1..=12, or 0 for no rule.
    pub month: u8,
    /// Week of month (1..=5) or day of month, depending on the rule form.
    pub mdmw: u16,
    /// Day of week, 1..=7 with Monday as 1, or 0 for day-of-year rules.
    pub wday: u8,
    /// Transition time in minutes since midnight, local wallclock.
    pub ttloc: i16,
}

/// A time zone as described by one POSIX `TZ` string.
///
/// Offsets follow the POSIX sign convention: minutes west of Greenwich,
/// so zones east of it carry negative values. Central European Time is
/// `std_offs == -60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PosixZone {
    /// Name of the standard zone.
    pub std_name: ZoneName,
    /// Name of the daylight zone, empty when the zone has none.
    pub dst_name: ZoneName,
    /// Offset of standard time, minutes, negated east of Greenwich.
    pub std_offs: i16,
    /// Offset of daylight time, minutes.
    pub dst_offs: i16,
    /// Transition into standard time (the end of DST).
    pub std_rule: PosixRule,
    /// Transition into daylight time.
    pub dst_rule: PosixRule,
}

impl PosixZone {
    /// Parses a POSIX `TZ` string.
    ///
    /// Returns the zone and the unconsumed input tail. Optional trailing
    /// components make a short parse legal, so an empty tail has to be
    /// checked by the caller when full consumption matters.
    pub fn parse(input: &str) -> rata_core::CalResult<(Self, &str)> {
        parse::parse(input)
    }

    /// True when the zone never switches, standard time all year.
    pub fn is_all_year_std(&self) -> bool {
        self.dst_rule.month == 0
    }

    /// True when the zone is pinned to its daylight offset all year.
    pub fn is_all_year_dst(&self) -> bool {
        self.dst_rule.month != 0 && self.std_rule.month == 0
    }
}

/// Disambiguation hint for local-to-UTC conversion.
///
/// In the transition discontinuities a local time stamp maps to zero or
/// two UTC instants; the hint picks one. `Std`/`Dst` select by zone,
/// `HourA`/`HourB` select the first or second pass of the repeated hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hint {
    /// Resolve to standard time.
    Std,
    /// Resolve to daylight time.
    Dst,
    /// Resolve to the zone before the transition.
    HourA,
    /// Resolve to the zone after the transition.
    HourB,
}

/// Result of a conversion query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvInfo {
    /// The queried instant is in daylight time.
    pub is_dst: bool,
    /// The instant falls into the repeated hour before the backstep.
    pub is_hour_a: bool,
    /// The instant falls into the repeated hour after the backstep.
    pub is_hour_b: bool,
    /// Seconds to add to the queried time stamp to reach the other scale.
    pub offset_seconds: i32,
}

/// Conversion context: a zone reference plus the cached transition frame
/// of one calendar year.
///
/// Cheap to create; the first query in a year computes the frame, later
/// queries within the frame (plus a day of slack on both ends) reuse it.
/// Share a zone between threads freely, but give each thread its own
/// context.
#[derive(Debug, Clone)]
pub struct ConvCtx<'z> {
    zone: &'z PosixZone,
    // Frame validity interval, UNIX seconds; empty when lo >= hi.
    lo_bound: i64,
    hi_bound: i64,
    // Transition instants of the cached year, UNIX seconds.
    tt_dst: i64,
    tt_std: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_names_truncate_inline() {
        let name = ZoneName::new("CET");
        assert_eq!(name.as_str(), "CET");
        assert!(!name.is_empty());
        assert!(ZoneName::default().is_empty());

        let long = ZoneName::new("TWELVECHARSX");
        assert_eq!(long.as_str(), "TWELVECHARS");
        assert_eq!(format!("{long}"), "TWELVECHARS");
    }

    #[test]
    fn zone_mode_predicates() {
        let (std_only, _) = PosixZone::parse("EST5").unwrap();
        assert!(std_only.is_all_year_std());
        assert!(!std_only.is_all_year_dst());

        let (rules, _) = PosixZone::parse("CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
        assert!(!rules.is_all_year_std());
        assert!(!rules.is_all_year_dst());

        let (perma_dst, _) = PosixZone::parse("EST5EDT4,0/0,J365/25").unwrap();
        assert!(perma_dst.is_all_year_dst());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn zone_serde_round_trip() {
        let (zone, _) = PosixZone::parse("IST-1GMT0,M10.5.0,M3.5.0/1").unwrap();
        let json = serde_json::to_string(&zone).unwrap();
        let back: PosixZone = serde_json::from_str(&json).unwrap();
        assert_eq!(zone, back);
    }
}
