//! Evaluation of POSIX zone rules and the UTC / local conversions.
//!
//! All queries run through [`ConvCtx`]: it evaluates both transition rules
//! for the year containing the query, converts them to UTC instants and
//! caches the result. The DST membership test has to respect the
//! hemisphere: when the DST transition of the year precedes the standard
//! one, DST is the inner interval, otherwise it wraps around the turn of
//! the year. Ireland's negative DST inverts the offsets on top of that,
//! which is why the overlap bookkeeping works off the offset order and not
//! off the season.

use core::mem;
use core::ops::Range;

use rata_core::{math, CalError, CalResult};

use crate::civil;
use crate::constants::{MEAN_SECONDS_PER_YEAR, RDN_UNIX};
use crate::gregorian::{date_to_rdn_gd, year_start_gd};

use super::{ConvCtx, ConvInfo, Hint, PosixRule, PosixZone};

const EPOCH_YEAR: i64 = 1970;
const DAY_SECS: i64 = 86_400;

fn dm2s(days: i32, mins: i32) -> i64 {
    60 * (days as i64 * 1440 + mins as i64)
}

// Evaluate a transition rule to the day it fires on in the given year.
fn eval_rule(rule: &PosixRule, year: i16) -> CalResult<i32> {
    if rule.wday != 0 {
        if rule.mdmw == 5 {
            // Last matching weekday: step back from the end of the month.
            let rdn = date_to_rdn_gd(year, rule.month as i16 + 1, 0);
            civil::wd_le(rdn, rule.wday as i32)
        } else {
            // The n-th matching weekday on or after the first of the month.
            let rdn = civil::wd_ge(date_to_rdn_gd(year, rule.month as i16, 1), rule.wday as i32)?;
            Ok(rdn + (rule.mdmw as i32 - 1) * 7)
        }
    } else {
        Ok(date_to_rdn_gd(year, rule.month as i16, rule.mdmw as i16))
    }
}

impl<'z> ConvCtx<'z> {
    /// Creates an empty context for the zone; the first query fills it.
    pub fn new(zone: &'z PosixZone) -> Self {
        Self {
            zone,
            lo_bound: 0,
            hi_bound: 0,
            tt_dst: 0,
            tt_std: 0,
        }
    }

    /// The zone this context converts for.
    pub fn zone(&self) -> &'z PosixZone {
        self.zone
    }

    // Establish the transition frame for the year containing `ts`. The
    // frame is kept with a day of slack on both ends, so scattered queries
    // within one year never recompute.
    fn update(&mut self, ts: i64) -> CalResult<()> {
        if self.lo_bound < self.hi_bound
            && ts >= self.lo_bound - DAY_SECS
            && ts < self.hi_bound + DAY_SECS
        {
            return Ok(());
        }

        let mut year = ts / MEAN_SECONDS_PER_YEAR;
        year += EPOCH_YEAR - i64::from(ts < year * MEAN_SECONDS_PER_YEAR);
        let year = i16::try_from(year)
            .ok()
            .filter(|y| *y < i16::MAX)
            .ok_or(CalError::OutOfRange("time stamp outside the calendar range"))?;

        let zone = self.zone;
        let ystart = year_start_gd(year) - RDN_UNIX;
        let ysnext = year_start_gd(year + 1) - RDN_UNIX;
        let day_dst = eval_rule(&zone.dst_rule, year)? - RDN_UNIX;
        let day_std = eval_rule(&zone.std_rule, year)? - RDN_UNIX;

        self.lo_bound = dm2s(ystart, zone.std_offs.min(zone.dst_offs) as i32);
        self.hi_bound = dm2s(ysnext, zone.std_offs.max(zone.dst_offs) as i32);
        self.tt_dst = dm2s(day_dst, zone.dst_rule.ttloc as i32 + zone.std_offs as i32);
        self.tt_std = dm2s(day_std, zone.std_rule.ttloc as i32 + zone.dst_offs as i32);
        Ok(())
    }

    /// Conversion info for a UTC instant: zone, offset to local time, and
    /// the repeated-hour markers around the backstep transition.
    pub fn utc_to_local(&mut self, ts: i64) -> CalResult<ConvInfo> {
        let zone = self.zone;
        let mut info = ConvInfo::default();

        if zone.dst_rule.month == 0 {
            info.offset_seconds = -(zone.std_offs as i32) * 60;
            return Ok(info);
        }
        if zone.std_rule.month == 0 {
            info.is_dst = true;
            info.offset_seconds = -(zone.dst_offs as i32) * 60;
            return Ok(info);
        }
        self.update(ts)?;

        // Don't forget that the seasons flip across the equator.
        info.is_dst = if self.tt_dst < self.tt_std {
            ts >= self.tt_dst && ts < self.tt_std
        } else {
            ts >= self.tt_dst || ts < self.tt_std
        };
        let offs = if info.is_dst { zone.dst_offs } else { zone.std_offs };
        info.offset_seconds = -(offs as i32) * 60;

        // The repeated hour sits at whichever transition steps the clock
        // back; with a negative DST that is the DST onset.
        let (crit, diff) = if zone.std_offs >= zone.dst_offs {
            (self.tt_std, (zone.std_offs - zone.dst_offs) as i64 * 60)
        } else {
            (self.tt_dst, (zone.dst_offs - zone.std_offs) as i64 * 60)
        };
        info.is_hour_a = crit - diff <= ts && ts < crit;
        info.is_hour_b = crit <= ts && ts < crit + diff;
        Ok(info)
    }

    /// Conversion info for a local wallclock instant.
    ///
    /// Around the transitions a local stamp maps to zero or two UTC
    /// instants. Such stamps resolve only through the hint;
    /// without one the query fails with [`CalError::Ambiguous`]. The
    /// hour A/B markers are set only where the wallclock actually steps
    /// back, matching how the flags are commonly consumed.
    pub fn local_to_utc(&mut self, ts: i64, hint: Option<Hint>) -> CalResult<ConvInfo> {
        let zone = self.zone;
        let mut info = ConvInfo::default();

        if zone.dst_rule.month == 0 {
            info.offset_seconds = zone.std_offs as i32 * 60;
            return Ok(info);
        }
        if zone.std_rule.month == 0 {
            info.is_dst = true;
            info.offset_seconds = zone.dst_offs as i32 * 60;
            return Ok(info);
        }
        self.update(ts + zone.std_offs as i64 * 60)?;

        let (dst_lo, dst_hi, std_lo, std_hi) = self.local_windows();

        if ts >= dst_lo && ts < dst_hi {
            // Inside the DST-onset discontinuity.
            match hint {
                Some(Hint::Std) | Some(Hint::HourA) => {
                    info.is_dst = false;
                    info.is_hour_a = zone.dst_offs > zone.std_offs;
                }
                Some(Hint::Dst) | Some(Hint::HourB) => {
                    info.is_dst = true;
                    info.is_hour_b = zone.dst_offs > zone.std_offs;
                }
                None => return Err(CalError::Ambiguous),
            }
        } else if ts >= std_lo && ts < std_hi {
            // Inside the DST-end discontinuity.
            match hint {
                Some(Hint::Std) | Some(Hint::HourB) => {
                    info.is_dst = false;
                    info.is_hour_b = zone.dst_offs < zone.std_offs;
                }
                Some(Hint::Dst) | Some(Hint::HourA) => {
                    info.is_dst = true;
                    info.is_hour_a = zone.dst_offs < zone.std_offs;
                }
                None => return Err(CalError::Ambiguous),
            }
        } else if self.tt_dst < self.tt_std {
            info.is_dst = ts >= dst_hi && ts < std_lo;
        } else {
            info.is_dst = ts >= dst_hi || ts < std_lo;
        }
        let offs = if info.is_dst { zone.dst_offs } else { zone.std_offs };
        info.offset_seconds = offs as i32 * 60;
        Ok(info)
    }

    /// Conversion info for a local wallclock instant, disambiguated by a
    /// pivot instead of a hint.
    ///
    /// In the critical windows the candidate UTC instant closest to the
    /// pivot without exceeding it wins; when both candidates lie past the
    /// pivot, the earlier one does. This suits producers and consumers of
    /// time stamps that stay roughly in sync, with update delays below
    /// half an hour. The hour A/B markers are never set.
    pub fn local_to_utc_pivot(&mut self, ts: i64, pivot: i64) -> CalResult<ConvInfo> {
        let zone = self.zone;
        if zone.dst_rule.month == 0 || zone.std_rule.month == 0 {
            return self.local_to_utc(ts, None);
        }
        self.update(ts + zone.std_offs as i64 * 60)?;

        let (dst_lo, dst_hi, std_lo, std_hi) = self.local_windows();
        let mut info = ConvInfo::default();

        if (ts >= dst_lo && ts < dst_hi) || (ts >= std_lo && ts < std_hi) {
            let cand_std = ts + zone.std_offs as i64 * 60;
            let cand_dst = ts + zone.dst_offs as i64 * 60;
            info.is_dst = match (cand_std <= pivot, cand_dst <= pivot) {
                (true, true) => cand_dst > cand_std,
                (true, false) => false,
                (false, true) => true,
                (false, false) => cand_dst < cand_std,
            };
        } else if self.tt_dst < self.tt_std {
            info.is_dst = ts >= dst_hi && ts < std_lo;
        } else {
            info.is_dst = ts >= dst_hi || ts < std_lo;
        }
        let offs = if info.is_dst { zone.dst_offs } else { zone.std_offs };
        info.offset_seconds = offs as i32 * 60;
        Ok(info)
    }

    // Both transition instants mapped into local time on both sides of
    // each transition, ordered. One of the pairs is inherently reversed;
    // which one depends on the offset order.
    fn local_windows(&self) -> (i64, i64, i64, i64) {
        let so = self.zone.std_offs as i64 * 60;
        let dofs = self.zone.dst_offs as i64 * 60;
        let mut dst_lo = self.tt_dst - so;
        let mut dst_hi = self.tt_dst - dofs;
        let mut std_lo = self.tt_std - dofs;
        let mut std_hi = self.tt_std - so;
        if dst_lo > dst_hi {
            mem::swap(&mut dst_lo, &mut dst_hi);
        } else {
            mem::swap(&mut std_lo, &mut std_hi);
        }
        (dst_lo, dst_hi, std_lo, std_hi)
    }

    /// An aligned period of the given length in local time containing the
    /// pivot instant.
    ///
    /// Periods run from 1 second up to a week and are aligned on local
    /// wallclock, shifted by the phase `phi` (zero for most uses; needed
    /// for cycles that do not divide a day evenly). When the raw interval
    /// would span a zone transition, the boundary on the far side of the
    /// pivot snaps to the transition so the whole range shares one zone.
    pub fn aligned_local_range(
        &mut self,
        ts: i64,
        period: i32,
        phi: i32,
    ) -> CalResult<(Range<i64>, ConvInfo)> {
        if period <= 0 || period > 7 * 86_400 {
            return Err(CalError::InvalidInput("period outside one second to one week"));
        }
        let info = self.utc_to_local(ts)?;

        // Cycle position in local time, applied back to the UTC scale.
        let (_, csoff) = math::i64_div_floor(ts + info.offset_seconds as i64 + phi as i64, period as u32);
        let mut lo = ts - csoff as i64;
        let mut hi = lo + period as i64;

        let zone = self.zone;
        if zone.dst_rule.month != 0 && zone.std_rule.month != 0 {
            if lo < self.tt_dst && ts > self.tt_dst {
                lo = self.tt_dst;
            }
            if lo < self.tt_std && ts > self.tt_std {
                lo = self.tt_std;
            }
            if hi > self.tt_dst && ts < self.tt_dst {
                hi = self.tt_dst;
            }
            if hi > self.tt_std && ts < self.tt_std {
                hi = self.tt_std;
            }
        }
        Ok((lo..hi, info))
    }
}
