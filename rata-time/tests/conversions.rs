//! Cross-module round-trip and consistency sweeps.

use rata_time::civil::{self, MONDAY};
use rata_time::constants::{RDN_UNIX, SECONDS_PER_GPS_ERA};
use rata_time::gregorian::{date_to_rdn_gd, rdn_to_date_gd, year_start_gd};
use rata_time::isoweek::{rdn_to_week_date, week_date_to_rdn, year_start_wd};
use rata_time::julian::{date_to_rdn_jd, rdn_to_date_jd};
use rata_time::scales::gps;
use rata_time::scales::ntp::{ntp_to_time, time_to_ntp};
use rata_time::scales::unix::time_to_rdn;
use rata_time::tz::{ConvCtx, PosixZone};
use rata_time::GpsRawTime;

struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

#[test]
fn gregorian_round_trip_over_the_full_year_range() {
    // Every day of every 97th year plus the extreme years, both
    // directions.
    let mut years: Vec<i16> = (-9999i16..=9999).step_by(97).collect();
    years.extend([-9999, -1, 0, 1, 1582, 1600, 1900, 2000, 9999]);
    for y in years {
        let start = year_start_gd(y);
        let next = year_start_gd(y + 1);
        for rdn in start..next {
            let date = rdn_to_date_gd(rdn).unwrap();
            assert_eq!(date.year, y);
            assert_eq!(date.yday as i32, rdn - start + 1);
            assert_eq!(
                date_to_rdn_gd(date.year, date.month as i16, date.day as i16),
                rdn,
                "rdn={rdn}"
            );
            assert!(date.day <= civil::month_length(date.month, date.leap));
        }
    }
}

#[test]
fn julian_round_trip_and_reform_alignment() {
    for y in (-9000i16..=9000).step_by(101) {
        let start = rata_time::julian::year_start_jd(y);
        let date = rdn_to_date_jd(start).unwrap();
        assert_eq!((date.year, date.month, date.day), (y, 1, 1));
        assert_eq!(date_to_rdn_jd(y, 1, 1), start);
    }
    // The calendars drift apart by three days every four centuries.
    assert_eq!(date_to_rdn_gd(1582, 10, 15), date_to_rdn_jd(1582, 10, 5));
    assert_eq!(date_to_rdn_gd(2100, 3, 14), date_to_rdn_jd(2100, 3, 1));
}

#[test]
fn iso_week_calendar_is_aligned_with_the_gregorian_one() {
    for y in (-9999i16..=9999).step_by(7) {
        assert_eq!(
            year_start_wd(y),
            civil::wd_near(year_start_gd(y), MONDAY).unwrap(),
            "y={y}"
        );
    }
    // Every day keeps its weekday across the calendars.
    let mut rng = XorShift(0x00c0_ffee_d00d_f00d);
    for _ in 0..2000 {
        let rdn = (rng.next() % 7_000_000) as i32 - 3_500_000;
        let wd = rdn_to_week_date(rdn).unwrap();
        let gd = rdn_to_date_gd(rdn).unwrap();
        assert_eq!(wd.wday, gd.wday, "rdn={rdn}");
        assert_eq!(
            week_date_to_rdn(wd.iso_year, wd.week as i16, wd.wday as i16),
            rdn,
            "rdn={rdn}"
        );
    }
}

#[test]
fn unix_stamps_land_on_their_civil_dates() {
    // Second boundaries around the epoch and a couple of known dates.
    assert_eq!(time_to_rdn(0).0, RDN_UNIX as i64);
    assert_eq!(time_to_rdn(-1).0, RDN_UNIX as i64 - 1);

    let mut rng = XorShift(0xfeed_face_cafe_beef);
    for _ in 0..2000 {
        let tt = (rng.next() as i64) >> 20;
        let (day, secs) = time_to_rdn(tt);
        assert!(secs < 86_400);
        assert_eq!(day * 86_400 + secs as i64, tt + RDN_UNIX as i64 * 86_400);
    }
}

#[test]
fn ntp_round_trip_within_an_era() {
    let mut rng = XorShift(0x1234_5678_9abc_def1);
    for _ in 0..2000 {
        let tt = (rng.next() % (1 << 33)) as i64;
        let secs = time_to_ntp(tt);
        assert_eq!(ntp_to_time(secs, Some(tt)), tt, "tt={tt}");
    }
}

#[test]
fn gps_raw_round_trip_through_the_unix_scale() {
    let base = (gps::date_unfold(1980, 1, 6, None, RDN_UNIX).unwrap() - RDN_UNIX) as i64 * 86_400;
    let mut rng = XorShift(0x0bad_cafe_dead_2bad);
    for _ in 0..2000 {
        let week = (rng.next() % 1024) as u16;
        let tow = (rng.next() % 604_800) as u32;
        let tt = gps::map_raw_time(week, tow, 0, Some(base + (rng.next() % SECONDS_PER_GPS_ERA as u64) as i64));
        let raw = gps::map_time(tt, 0);
        assert_eq!(raw, GpsRawTime { week, tow }, "week={week} tow={tow}");
    }
}

#[test]
fn gps_day_and_second_unfoldings_agree() {
    let base_rdn = date_to_rdn_gd(2019, 4, 7);
    let base_tt = (base_rdn - RDN_UNIX) as i64 * 86_400;
    let mut rng = XorShift(0x5ee5_1e55_c0de_d00d);
    for _ in 0..500 {
        let week = (rng.next() % 1024) as u16;
        let tow = (rng.next() % 604_800) as u32;
        let (day, tday) = gps::map_raw_days(week, tow, 0, base_rdn).unwrap();
        let tt = gps::map_raw_time(week, tow, 0, Some(base_tt));
        assert_eq!(
            (day - RDN_UNIX) as i64 * 86_400 + tday as i64,
            tt,
            "week={week} tow={tow}"
        );
    }
}

#[test]
fn every_corpus_zone_serves_conversions() {
    // One string per rule shape from the parse corpus; every parsed zone
    // must answer queries over a whole year without errors.
    let specs = [
        "AEST-10AEDT,M10.1.0,M4.1.0/3",
        "CET-1CEST,M3.5.0,M10.5.0/3",
        "CST5CDT,M3.2.0/0,M11.1.0/1",
        "EET-2EEST,M3.5.4/24,M10.5.5/1",
        "EST5",
        "EST5EDT4,0/0,J365/25",
        "GMT0BST,M3.5.0/1,M10.5.0",
        "IST-1GMT0,M10.5.0,M3.5.0/1",
        "NZST-12NZDT,M9.5.0,M4.1.0/3",
        "PST8PDT,J60,300",
        "<GMT+14>-14",
    ];
    for spec in specs {
        let (zone, rest) = PosixZone::parse(spec).unwrap();
        assert!(rest.is_empty(), "{spec}");
        let mut ctx = ConvCtx::new(&zone);
        let year_start = (year_start_gd(2025) - RDN_UNIX) as i64 * 86_400;
        for day in (0..365).step_by(5) {
            let ts = year_start + day * 86_400 + 43_200;
            let info = ctx.utc_to_local(ts).unwrap();
            // The offset must invert, up to transition ambiguity.
            let local = ts + info.offset_seconds as i64;
            let hint = if info.is_dst {
                rata_time::Hint::Dst
            } else {
                rata_time::Hint::Std
            };
            let back = ctx.local_to_utc(local, Some(hint)).unwrap();
            assert_eq!(local + back.offset_seconds as i64, ts, "{spec} day={day}");
        }
    }
}

#[test]
fn rellez_and_gps_year_recovery_work_together() {
    // A receiver date from week-rollover territory: 2-digit year 80 with
    // a known weekday recovers the century, and the date unfolds onto the
    // same day the raw stamp maps to.
    for (y, m, d) in [(1982i16, 7, 21), (2003, 1, 1), (2038, 5, 9), (2100, 2, 28)] {
        let rdn = date_to_rdn_gd(y, m, d);
        let date = rdn_to_date_gd(rdn).unwrap();
        let yy = (y % 100) as i16;
        let full = gps::full_year(yy, m as u8, d as u8, Some(date.wday));
        if (1980..2380).contains(&(y as i32)) {
            assert_eq!(full, y, "y={y}");
        }
    }
}
