//! State-of-charge estimation from a terminal voltage reading.

use super::curve::interpolate_percentage;

/// Nominal voltage the resting curve is written for.
pub const REFERENCE_SYSTEM_VOLTAGE: f64 = 24.0;

/// Phase of the charge profile implied by an elevated terminal voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargePhase {
    Bulk,
    Absorption,
    Float,
}

impl ChargePhase {
    /// Phases in threshold order, highest first.
    const BANDS: [(f64, ChargePhase); 3] = [
        (28.5, ChargePhase::Bulk),
        (27.5, ChargePhase::Absorption),
        (26.8, ChargePhase::Float),
    ];

    /// Detects the charge phase from the terminal voltage as read.
    ///
    /// The thresholds are absolute and are not scaled with the system
    /// voltage, so a 12V bank never reaches them. Returns `None` when not
    /// charging or below the float threshold.
    pub fn detect(voltage: f64, charging: bool) -> Option<Self> {
        if !charging {
            return None;
        }
        Self::BANDS
            .iter()
            .find(|(threshold, _)| voltage > *threshold)
            .map(|&(_, phase)| phase)
    }

    /// Voltage the charge current adds on top of the resting voltage.
    pub fn surcharge_volts(self) -> f64 {
        match self {
            Self::Bulk => 2.6,
            Self::Absorption => 1.5,
            Self::Float => 0.6,
        }
    }
}

/// Ratio between a system voltage and the 24V reference.
///
/// Non-positive or non-finite system voltages use a ratio of 1.
pub fn voltage_scale(system_voltage: f64) -> f64 {
    if system_voltage.is_finite() && system_voltage > 0.0 {
        system_voltage / REFERENCE_SYSTEM_VOLTAGE
    } else {
        1.0
    }
}

/// Normalizes a reading to the 24V scale.
pub fn to_reference_scale(voltage: f64, system_voltage: f64) -> f64 {
    voltage / voltage_scale(system_voltage)
}

/// Approximates the resting voltage on the 24V scale.
///
/// The charge-phase surcharge comes off the raw reading, then the result is
/// scaled onto the reference curve.
pub fn resting_voltage(voltage: f64, charging: bool, system_voltage: f64) -> f64 {
    let raw = match ChargePhase::detect(voltage, charging) {
        Some(phase) => voltage - phase.surcharge_volts(),
        None => voltage,
    };
    to_reference_scale(raw, system_voltage)
}

/// Estimates the state of charge in `[0, 100]`.
///
/// Total over its inputs: out-of-curve and negative voltages saturate.
///
/// # Examples
///
/// ```
/// use backup_estimator::estimate::percentage::battery_percentage;
///
/// assert_eq!(battery_percentage(25.8, false, 24.0), 80.0);
/// assert_eq!(battery_percentage(12.9, false, 12.0), 80.0);
/// ```
pub fn battery_percentage(voltage: f64, charging: bool, system_voltage: f64) -> f64 {
    interpolate_percentage(resting_voltage(voltage, charging, system_voltage))
}
