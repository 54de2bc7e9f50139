//! Battery status tiers and the charge-cycle status shown beside the ETA.

use std::fmt;

use super::percentage::{ChargePhase, battery_percentage};
use super::sources::PowerSourceAvailability;

/// Named battery condition, charge phases first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryStatusTier {
    BulkCharging,
    Absorption,
    FloatCharging,
    Good,
    Fair,
    Low,
    Critical,
}

/// Foreground/background color pair used when rendering a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: &'static str,
    pub background: &'static str,
}

const fn palette(foreground: &'static str, background: &'static str) -> Palette {
    Palette {
        foreground,
        background,
    }
}

impl BatteryStatusTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::BulkCharging => "Bulk Charging",
            Self::Absorption => "Absorption",
            Self::FloatCharging => "Float Charging",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Low => "Low",
            Self::Critical => "Critical",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::BulkCharging => palette("blue-600", "blue-100"),
            Self::Absorption => palette("blue-500", "blue-50"),
            Self::FloatCharging | Self::Good => palette("green-600", "green-100"),
            Self::Fair => palette("yellow-600", "yellow-100"),
            Self::Low => palette("orange-600", "orange-100"),
            Self::Critical => palette("red-600", "red-100"),
        }
    }

    /// Whether the tier describes an active charge phase.
    pub fn is_charging(self) -> bool {
        matches!(
            self,
            Self::BulkCharging | Self::Absorption | Self::FloatCharging
        )
    }
}

impl From<ChargePhase> for BatteryStatusTier {
    fn from(phase: ChargePhase) -> Self {
        match phase {
            ChargePhase::Bulk => Self::BulkCharging,
            ChargePhase::Absorption => Self::Absorption,
            ChargePhase::Float => Self::FloatCharging,
        }
    }
}

impl fmt::Display for BatteryStatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentage together with its tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryStatus {
    pub percentage: f64,
    pub tier: BatteryStatusTier,
}

/// Classifies a reading. First match wins: charge phase, then
/// percentage bands at 80, 50 and 30.
pub fn classify_battery(voltage: f64, charging: bool, system_voltage: f64) -> BatteryStatus {
    let percentage = battery_percentage(voltage, charging, system_voltage);
    let tier = match ChargePhase::detect(voltage, charging) {
        Some(phase) => phase.into(),
        None if percentage >= 80.0 => BatteryStatusTier::Good,
        None if percentage >= 50.0 => BatteryStatusTier::Fair,
        None if percentage >= 30.0 => BatteryStatusTier::Low,
        None => BatteryStatusTier::Critical,
    };

    BatteryStatus { percentage, tier }
}

/// Progress of the charge cycle as reported next to the charge ETA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStatus {
    Charging,
    FullyCharged,
    NoPower,
}

impl ChargeStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Charging => "Charging",
            Self::FullyCharged => "Fully Charged",
            Self::NoPower => "No Power",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Charging => palette("blue-600", "blue-100"),
            Self::FullyCharged => palette("green-600", "green-100"),
            Self::NoPower => palette("red-600", "red-100"),
        }
    }
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reports the charge-cycle status. A full battery wins over source state;
/// otherwise charging switched off reads the same as having no input.
pub fn charge_status(
    voltage: f64,
    system_voltage: f64,
    charging: bool,
    sources: &PowerSourceAvailability,
) -> ChargeStatus {
    if battery_percentage(voltage, true, system_voltage) >= 100.0 {
        ChargeStatus::FullyCharged
    } else if !charging || !sources.has_input() {
        ChargeStatus::NoPower
    } else {
        ChargeStatus::Charging
    }
}
