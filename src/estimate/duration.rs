//! Human-readable runtime and time-to-full values.

use std::fmt;

/// A remaining-runtime or time-to-full estimate.
///
/// Never negative. The sentinel variants stand in for values that have no
/// finite duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationEstimate {
    /// Nothing is drawing from the battery.
    Infinite,
    FullyCharged,
    /// No source is available to charge from.
    NoCharging,
    UnderSixMinutes,
    Minutes(u64),
    Hours(f64),
    DaysHours { days: u64, hours: u64 },
}

impl DurationEstimate {
    /// Formats a duration given in hours.
    ///
    /// Under an hour rounds to minutes, under a day keeps one decimal of
    /// hours, anything longer splits into days and rounded hours. The hour
    /// remainder never carries into the day count, so it can read `24h`.
    pub fn from_hours(hours: f64) -> Self {
        if hours == f64::INFINITY {
            return Self::Infinite;
        }
        let hours = if hours.is_nan() { 0.0 } else { hours.max(0.0) };

        if hours < 1.0 {
            Self::Minutes((hours * 60.0).round() as u64)
        } else if hours < 24.0 {
            Self::Hours(hours)
        } else {
            let days = (hours / 24.0).floor() as u64;
            let rest = (hours % 24.0).round() as u64;
            Self::DaysHours { days, hours: rest }
        }
    }

    /// Whether this is one of the non-numeric sentinels.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Infinite | Self::FullyCharged | Self::NoCharging)
    }
}

impl fmt::Display for DurationEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infinite => f.write_str("∞"),
            Self::FullyCharged => f.write_str("Fully Charged"),
            Self::NoCharging => f.write_str("No Charging"),
            Self::UnderSixMinutes => f.write_str("< 6 min"),
            Self::Minutes(m) => write!(f, "{m} min"),
            // Ties round up, so 2.25 reads 2.3.
            Self::Hours(h) => write!(f, "{:.1} hrs", (h * 10.0).round() / 10.0),
            Self::DaysHours { days: 0, hours } => write!(f, "{hours} hrs"),
            Self::DaysHours { days, hours } => write!(f, "{days}d {hours}h"),
        }
    }
}
