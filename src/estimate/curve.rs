//! Resting-voltage curves: the interpolation breakpoints and the per-system
//! reference tables shown next to the live readings.

use std::fmt;

use tracing::warn;

/// Resting-voltage to state-of-charge breakpoints on the 24V reference scale.
///
/// Ordered by ascending voltage. Readings for 12V and 48V systems are scaled
/// onto this curve before lookup. The bottom breakpoint opens the first
/// segment only; at or below it the bank reads [`EMPTY_PCT`].
pub const RESTING_CURVE_24V: [(f64, f64); 10] = [
    (22.8, 10.0),
    (23.2, 20.0),
    (23.6, 30.0),
    (24.0, 40.0),
    (24.4, 50.0),
    (24.8, 60.0),
    (25.2, 70.0),
    (25.8, 80.0),
    (26.4, 90.0),
    (27.2, 100.0),
];

/// Percentage reported at or below the bottom of the curve.
pub const EMPTY_PCT: f64 = 0.0;

/// Interpolates a 24V-scale resting voltage into a percentage in `[0, 100]`.
///
/// Saturates at the curve ends. NaN maps to 0.
///
/// The first segment runs from 10% just above 22.8V to 20% at 23.2V, so
/// there is a step from 0 to 10 at the bottom breakpoint.
///
/// # Examples
///
/// ```
/// use backup_estimator::estimate::curve::interpolate_percentage;
///
/// assert_eq!(interpolate_percentage(25.8), 80.0);
/// assert_eq!(interpolate_percentage(30.0), 100.0);
/// assert_eq!(interpolate_percentage(12.0), 0.0);
/// assert!((interpolate_percentage(23.0) - 15.0).abs() < 1e-9);
/// ```
pub fn interpolate_percentage(volts_24: f64) -> f64 {
    let (bottom_v, _) = RESTING_CURVE_24V[0];
    let (top_v, top_pct) = RESTING_CURVE_24V[RESTING_CURVE_24V.len() - 1];

    if volts_24 >= top_v {
        return top_pct;
    }
    if volts_24.is_nan() || volts_24 <= bottom_v {
        return EMPTY_PCT;
    }

    for segment in RESTING_CURVE_24V.windows(2) {
        let (lo_v, lo_pct) = segment[0];
        let (hi_v, hi_pct) = segment[1];
        if volts_24 < hi_v {
            return lo_pct + (volts_24 - lo_v) / (hi_v - lo_v) * (hi_pct - lo_pct);
        }
    }

    top_pct
}

/// Nominal battery-bank voltages that carry their own reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NominalVoltage {
    V12,
    V24,
    V48,
}

impl NominalVoltage {
    /// Matches a derived system voltage to a supported nominal voltage.
    pub fn from_volts(system_voltage: f64) -> Option<Self> {
        if system_voltage == 12.0 {
            Some(Self::V12)
        } else if system_voltage == 24.0 {
            Some(Self::V24)
        } else if system_voltage == 48.0 {
            Some(Self::V48)
        } else {
            None
        }
    }

    pub fn volts(self) -> f64 {
        match self {
            Self::V12 => 12.0,
            Self::V24 => 24.0,
            Self::V48 => 48.0,
        }
    }
}

/// Qualitative label attached to a reference-table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceStatus {
    Full,
    VeryGood,
    Good,
    Fair,
    Low,
    Critical,
}

impl ReferenceStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Low => "Low",
            Self::Critical => "Critical",
        }
    }
}

/// One row of a resting/charging voltage reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRow {
    /// Resting (no charge current) terminal voltage.
    pub resting_volts: f64,
    /// Terminal voltage observed at the same charge level while charging.
    pub charging_volts: f64,
    pub percentage: u8,
    pub status: ReferenceStatus,
    /// Row covers this voltage and anything above it.
    pub open_ended: bool,
}

impl fmt::Display for ReferenceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plus = if self.open_ended { "+" } else { "" };
        write!(
            f,
            "{:>3}%  resting {:.1}V{plus}  charging {:.1}V{plus}  {}",
            self.percentage,
            self.resting_volts,
            self.charging_volts,
            self.status.label()
        )
    }
}

const fn row(
    resting_volts: f64,
    charging_volts: f64,
    percentage: u8,
    status: ReferenceStatus,
) -> ReferenceRow {
    ReferenceRow {
        resting_volts,
        charging_volts,
        percentage,
        status,
        open_ended: percentage == 100,
    }
}

use ReferenceStatus::{Critical, Fair, Full, Good, Low, VeryGood};

pub const REFERENCE_12V: [ReferenceRow; 8] = [
    row(13.6, 14.8, 100, Full),
    row(13.2, 14.5, 90, VeryGood),
    row(12.9, 14.2, 80, Good),
    row(12.6, 13.9, 70, Good),
    row(12.4, 13.7, 60, Fair),
    row(12.2, 13.5, 50, Fair),
    row(12.0, 13.3, 40, Low),
    row(11.8, 13.1, 30, Low),
];

pub const REFERENCE_24V: [ReferenceRow; 9] = [
    row(27.2, 29.7, 100, Full),
    row(26.4, 29.0, 90, VeryGood),
    row(25.8, 28.4, 80, Good),
    row(25.2, 27.8, 70, Good),
    row(24.8, 27.4, 60, Fair),
    row(24.4, 27.0, 50, Fair),
    row(24.0, 26.6, 40, Low),
    row(23.6, 26.2, 30, Low),
    row(23.2, 25.8, 20, Critical),
];

pub const REFERENCE_48V: [ReferenceRow; 7] = [
    row(54.4, 59.4, 100, Full),
    row(52.8, 58.0, 90, VeryGood),
    row(51.6, 56.8, 80, Good),
    row(50.4, 55.6, 70, Good),
    row(49.6, 54.8, 60, Fair),
    row(48.8, 54.0, 50, Fair),
    row(48.0, 53.2, 40, Low),
];

/// Result of looking up the reference table for a system voltage.
#[derive(Debug, Clone, Copy)]
pub struct CurveSelection {
    /// Table actually used.
    pub nominal: NominalVoltage,
    pub rows: &'static [ReferenceRow],
    /// `true` when the system voltage had no table of its own.
    pub fallback: bool,
}

/// Selects the reference table for `system_voltage`.
///
/// Voltages other than 12, 24 and 48 get the 24V table, flagged through
/// `fallback` and a warning event.
pub fn reference_table(system_voltage: f64) -> CurveSelection {
    match NominalVoltage::from_volts(system_voltage) {
        Some(nominal) => CurveSelection {
            nominal,
            rows: rows_for(nominal),
            fallback: false,
        },
        None => {
            warn!(
                system_voltage,
                "no reference curve for this system voltage, using the 24V curve"
            );
            CurveSelection {
                nominal: NominalVoltage::V24,
                rows: &REFERENCE_24V,
                fallback: true,
            }
        }
    }
}

fn rows_for(nominal: NominalVoltage) -> &'static [ReferenceRow] {
    match nominal {
        NominalVoltage::V12 => &REFERENCE_12V,
        NominalVoltage::V24 => &REFERENCE_24V,
        NominalVoltage::V48 => &REFERENCE_48V,
    }
}
