//! Calendar instants and how they map onto simulation time.
//!
//! Instants are UTC wall-clock times without a zone, written
//! `YYYY-MM-DD HH:MM:SS[.ffffff]`. Simulation time is the signed number of
//! days since the epoch's reference instant.

use crate::error::ViewerError;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Parse `YYYY-MM-DD HH:MM:SS` with optional fractional seconds.
pub fn parse_instant(input: &str) -> Result<PrimitiveDateTime, ViewerError> {
    let trimmed = input.trim();
    PrimitiveDateTime::parse(
        trimmed,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        )
    })
    .map_err(|_| ViewerError::InvalidTimeFormat {
        input: input.to_string(),
    })
}

/// Whole seconds unless there are microseconds to show.
pub fn format_instant(instant: PrimitiveDateTime) -> String {
    let formatted = if instant.microsecond() == 0 {
        instant.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
    } else {
        instant.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]"
        ))
    };
    formatted.unwrap_or_else(|_| instant.to_string())
}

/// The Julian day number of an instant, fraction included.
pub fn julian_day(instant: PrimitiveDateTime) -> f64 {
    let (hour, minute, second, nano) = instant.time().as_hms_nano();
    let seconds = hour as f64 * 3600.0 + minute as f64 * 60.0 + second as f64 + nano as f64 * 1e-9;
    // Julian days start at noon
    instant.date().to_julian_day() as f64 - 0.5 + seconds / SECONDS_PER_DAY
}

/// `instant` plus a signed, possibly fractional, number of hours.
/// Rounded to whole microseconds.
pub fn add_hours(instant: PrimitiveDateTime, hours: f64) -> Result<PrimitiveDateTime, ViewerError> {
    let micros = hours * 3_600_000_000.0;
    if !micros.is_finite() || micros.abs() > i64::MAX as f64 {
        return Err(ViewerError::InvalidSetting {
            setting: "time jump",
            reason: format!("{} hours is not a usable offset", hours),
        });
    }
    instant
        .checked_add(Duration::microseconds(micros.round() as i64))
        .ok_or_else(|| ViewerError::InvalidSetting {
            setting: "time jump",
            reason: format!("{} hours from {} leaves the calendar", hours, instant),
        })
}

/// Jump a displayed instant by some hours, string in and string out.
pub fn jump(displayed: &str, hours: f64) -> Result<String, ViewerError> {
    let instant = parse_instant(displayed)?;
    Ok(format_instant(add_hours(instant, hours)?))
}

/// The current UTC time, truncated to whole seconds.
pub fn now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    let now = now - Duration::nanoseconds(now.nanosecond() as i64);
    PrimitiveDateTime::new(now.date(), now.time())
}

/// Pins simulation time 0 to a calendar instant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Epoch {
    reference: PrimitiveDateTime,
}

impl Epoch {
    pub fn new(reference: PrimitiveDateTime) -> Self {
        Self { reference }
    }

    /// A badly written epoch is a broken system, not a user typo.
    pub fn parse(reference: &str) -> Result<Self, ViewerError> {
        parse_instant(reference)
            .map(Self::new)
            .map_err(|_| ViewerError::ConfigurationFault(format!("bad epoch {:?}", reference)))
    }

    pub fn reference(&self) -> PrimitiveDateTime {
        self.reference
    }

    /// Days since the reference instant. Negative before it.
    pub fn simulation_time(&self, instant: PrimitiveDateTime) -> f64 {
        (instant - self.reference).as_seconds_f64() / SECONDS_PER_DAY
    }

    /// The inverse of `simulation_time`, to the microsecond.
    pub fn instant_at(&self, simulation_time: f64) -> Option<PrimitiveDateTime> {
        let micros = simulation_time * SECONDS_PER_DAY * 1e6;
        if !micros.is_finite() || micros.abs() > i64::MAX as f64 {
            return None;
        }
        self.reference
            .checked_add(Duration::microseconds(micros.round() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> Epoch {
        Epoch::parse(loader::DEFAULT_EPOCH).unwrap()
    }

    #[test]
    fn parses_with_and_without_fractions() {
        let whole = parse_instant("2024-07-18 22:30:30").unwrap();
        assert_eq!(whole.second(), 30);
        assert_eq!(whole.nanosecond(), 0);
        let fractional = parse_instant("2024-07-18 22:30:30.55").unwrap();
        assert_eq!(fractional.millisecond(), 550);
        let micros = parse_instant(" 2024-07-18 22:30:30.000001 ").unwrap();
        assert_eq!(micros.microsecond(), 1);
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in &[
            "not-a-date",
            "",
            "2024-07-18",
            "2024-07-18T12:00:00",
            "2024-13-01 00:00:00",
            "2024-02-30 00:00:00",
            "2024-07-18 24:00:00",
            "18/07/2024 12:00:00",
        ] {
            match parse_instant(bad) {
                Err(ViewerError::InvalidTimeFormat { input }) => assert_eq!(&input, bad),
                other => panic!("{:?} parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn formats_like_it_parses() {
        let instant = parse_instant("2024-07-19 00:00:00").unwrap();
        assert_eq!(format_instant(instant), "2024-07-19 00:00:00");
        let instant = parse_instant("2024-07-19 00:00:00.5").unwrap();
        assert_eq!(format_instant(instant), "2024-07-19 00:00:00.500000");
    }

    #[test]
    fn jumps_across_days() {
        assert_eq!(jump("2024-07-18 12:00:00", 12.0).unwrap(), "2024-07-19 00:00:00");
        assert_eq!(jump("2024-07-18 00:00:00", -12.0).unwrap(), "2024-07-17 12:00:00");
    }

    #[test]
    fn jumps_across_months_years_and_leap_days() {
        assert_eq!(jump("2024-12-31 18:00:00", 12.0).unwrap(), "2025-01-01 06:00:00");
        assert_eq!(jump("2024-02-28 12:00:00", 24.0).unwrap(), "2024-02-29 12:00:00");
        assert_eq!(jump("2023-02-28 12:00:00", 24.0).unwrap(), "2023-03-01 12:00:00");
        assert_eq!(jump("2024-07-18 12:00:00", 1.5).unwrap(), "2024-07-18 13:30:00");
        assert_eq!(jump("2024-07-18 12:00:00", -0.25).unwrap(), "2024-07-18 11:45:00");
    }

    #[test]
    fn jump_rejects_silly_offsets() {
        let instant = parse_instant("2024-07-18 12:00:00").unwrap();
        assert!(add_hours(instant, f64::NAN).is_err());
        assert!(add_hours(instant, 1e300).is_err());
        assert!(jump("yesterday", 12.0).is_err());
    }

    #[test]
    fn reference_instant_is_time_zero() {
        let epoch = epoch();
        assert_eq!(epoch.simulation_time(epoch.reference()), 0.0);
        assert!((julian_day(epoch.reference()) - 2460510.229769).abs() < 1e-8);
    }

    #[test]
    fn simulation_time_is_signed_days() {
        let epoch = epoch();
        let later = add_hours(epoch.reference(), 36.0).unwrap();
        assert_eq!(epoch.simulation_time(later), 1.5);
        let earlier = add_hours(epoch.reference(), -48.0).unwrap();
        assert_eq!(epoch.simulation_time(earlier), -2.0);
    }

    #[test]
    fn simulation_time_matches_julian_day_difference() {
        let epoch = epoch();
        let instant = parse_instant("2026-10-19 08:15:00").unwrap();
        let by_jd = julian_day(instant) - julian_day(epoch.reference());
        assert!((epoch.simulation_time(instant) - by_jd).abs() < 1e-8);
    }

    #[test]
    fn instant_at_inverts_simulation_time() {
        let epoch = epoch();
        let instant = parse_instant("2019-03-02 04:05:06.789").unwrap();
        let t = epoch.simulation_time(instant);
        assert!(t < 0.0);
        assert_eq!(epoch.instant_at(t), Some(instant));
        assert_eq!(epoch.instant_at(f64::NAN), None);
    }

    #[test]
    fn bad_epoch_is_a_configuration_fault() {
        assert!(matches!(
            Epoch::parse("soon"),
            Err(ViewerError::ConfigurationFault(_))
        ));
    }
}
