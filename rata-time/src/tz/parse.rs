//! Parser for POSIX `TZ` strings.
//!
//! Grammar, with the GNU quoted-name extension:
//!
//! ```text
//! TZ     := name off [ name [off] [ "," rule "," rule ] ]
//! name   := [A-Z]{3,} | "<" [^<>]* ">"
//! off    := [+-]? h{1,3} ( ":" m{1,2} ( ":" s{1,2} )? )?
//! rule   := "M" month "." week "." wday | "J" yday | yday  [ "/" off ]
//! ```
//!
//! Offsets are stored in minutes; the seconds field is read but must be
//! zero. A leading `-` means east of Greenwich. Rule transition times may
//! span a whole week in either direction, which covers arrangements like
//! Greenland switching on the Danish schedule.

use rata_core::{CalError, CalResult};

use crate::civil;

use super::{PosixRule, PosixZone, ZoneName};

// The POSIX (U.S.) default rules: DST from the second Sunday in March to
// the first Sunday in November, switching at 02:00 local.
const DEFAULT_DST_RULE: PosixRule = PosixRule { month: 3, mdmw: 2, wday: 7, ttloc: 120 };
const DEFAULT_STD_RULE: PosixRule = PosixRule { month: 11, mdmw: 1, wday: 7, ttloc: 120 };

// The marker encoding of a zone that is in DST all year round.
const ALL_YEAR_DST_RULE: PosixRule = PosixRule { month: 1, mdmw: 1, wday: 0, ttloc: 0 };

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { bytes: input.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // Unsigned number of up to three digits: accumulation stops once the
    // value reaches 100, so runs of digits are split rather than rejected.
    fn number(&mut self) -> Option<i32> {
        let mut val = 0;
        let mut any = false;
        while val < 100 {
            match self.peek() {
                Some(c @ b'0'..=b'9') => {
                    val = val * 10 + (c - b'0') as i32;
                    self.pos += 1;
                    any = true;
                }
                _ => break,
            }
        }
        any.then_some(val)
    }

    // Optional sign; true means negative.
    fn opt_sign(&mut self) -> bool {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        }
    }

    // A time value in h[:m[:s]] form, as signed minutes. Zone offsets stay
    // within a day, rule transition times within a week; seconds must
    // evaluate to zero either way.
    fn time(&mut self, rule_time: bool) -> Option<i16> {
        let neg = self.opt_sign();
        let mut hms = [0i32; 3];
        let mut idx = 0;
        loop {
            hms[idx] = self.number()?;
            idx += 1;
            if idx >= 3 || !self.eat(b':') {
                break;
            }
        }
        if hms[0] >= if rule_time { 168 } else { 24 } || hms[1] >= 60 || hms[2] != 0 {
            return None;
        }
        let mins = (60 * hms[0] + hms[1]) as i16;
        Some(if neg { -mins } else { mins })
    }

    // A zone name, either three or more uppercase ASCII letters or any
    // text in angle brackets. Stored by value, silently truncated; the
    // cursor is restored on failure.
    fn name(&mut self) -> Option<ZoneName> {
        let save = self.pos;
        let mut out = ZoneName::default();
        let mut stored = 0;
        match self.peek() {
            Some(b'<') => {
                self.pos += 1;
                loop {
                    match self.peek() {
                        None | Some(b'<') => {
                            self.pos = save;
                            return None;
                        }
                        Some(b'>') => {
                            self.pos += 1;
                            return Some(out);
                        }
                        Some(c) => {
                            out.push(c);
                            self.pos += 1;
                        }
                    }
                }
            }
            Some(c) if c.is_ascii_uppercase() => {
                while let Some(c) = self.peek() {
                    if !c.is_ascii_uppercase() {
                        break;
                    }
                    out.push(c);
                    stored += 1;
                    self.pos += 1;
                }
                if stored >= 3 {
                    Some(out)
                } else {
                    self.pos = save;
                    None
                }
            }
            _ => None,
        }
    }

    // A single transition rule in any of the three POSIX forms.
    fn rule(&mut self) -> Option<PosixRule> {
        let mut rule = PosixRule::default();
        match self.peek()? {
            b'M' => {
                self.pos += 1;
                let month = self.number()?;
                if !self.eat(b'.') {
                    return None;
                }
                let week = self.number()?;
                if !self.eat(b'.') {
                    return None;
                }
                let wday = self.number()?;
                if !(1..=12).contains(&month) || !(1..=5).contains(&week) || wday > 7 {
                    return None;
                }
                rule.month = month as u8;
                rule.mdmw = week as u16;
                // Day 0 is Sunday on the wire; renumber to Monday-based.
                rule.wday = ((wday + 6) % 7 + 1) as u8;
            }
            b'J' => {
                self.pos += 1;
                let n = self.number()?;
                if !(1..=365).contains(&n) {
                    return None;
                }
                // One-based day of year that never counts Feb 29.
                let (m, d) = civil::days_to_month(n as u32 - 1, false);
                rule.month = (m + 1) as u8;
                rule.mdmw = (d + 1) as u16;
            }
            b'0'..=b'9' => {
                // Zero-based day of year including Feb 29, encoded as an
                // extended day of January.
                let n = self.number()?;
                if n > 365 {
                    return None;
                }
                rule.month = 1;
                rule.mdmw = (n + 1) as u16;
            }
            _ => return None,
        }
        rule.ttloc = if self.eat(b'/') { self.time(true)? } else { 120 };
        Some(rule)
    }
}

pub(super) fn parse(input: &str) -> CalResult<(PosixZone, &str)> {
    let mut sc = Scanner::new(input);
    let mut zone = PosixZone::default();

    zone.std_name = sc
        .name()
        .ok_or(CalError::InvalidInput("zone name expected"))?;
    zone.std_offs = sc
        .time(false)
        .ok_or(CalError::InvalidInput("zone offset expected"))?;

    if let Some(dst_name) = sc.name() {
        zone.dst_name = dst_name;
        // Preset the U.S. default rules; an explicit rule pair overwrites
        // them below.
        zone.dst_rule = DEFAULT_DST_RULE;
        zone.std_rule = DEFAULT_STD_RULE;

        // The DST offset is optional: without one, DST runs an hour ahead
        // of standard time.
        let save = sc.pos;
        match sc.time(false) {
            Some(offs) => zone.dst_offs = offs,
            None => {
                sc.pos = save;
                zone.dst_offs = zone.std_offs - 60;
            }
        }

        // Transition rules come in pairs or not at all.
        if sc.eat(b',') {
            zone.dst_rule = sc
                .rule()
                .ok_or(CalError::InvalidInput("transition rule expected"))?;
            if !sc.eat(b',') {
                return Err(CalError::InvalidInput("second transition rule expected"));
            }
            zone.std_rule = sc
                .rule()
                .ok_or(CalError::InvalidInput("transition rule expected"))?;
        }

        // All-year DST is marked by clearing the standard rule, mirroring
        // the encoding of all-year standard zones.
        if zone.dst_rule == ALL_YEAR_DST_RULE {
            zone.std_rule = PosixRule::default();
        }
    }

    Ok((zone, &input[sc.pos..]))
}
