//! Grid (NEPA) and solar input availability.

use std::fmt;

/// Grid voltage above which the utility supply counts as present.
pub const GRID_PRESENT_VOLTS: f64 = 100.0;
/// Panel voltage above which solar input counts as present.
pub const SOLAR_PRESENT_VOLTS: f64 = 20.0;
/// Panel voltage at which the array delivers its rated power.
pub const SOLAR_REFERENCE_VOLTS: f64 = 60.0;

/// Which inputs are feeding the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSourceMode {
    Hybrid,
    SolarOnly,
    NepaOnly,
    BatteryOnly,
}

impl PowerSourceMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hybrid => "Hybrid Mode - Solar & NEPA",
            Self::SolarOnly => "Solar Only Mode",
            Self::NepaOnly => "NEPA Only Mode",
            Self::BatteryOnly => "Battery Only - No Input!",
        }
    }
}

impl fmt::Display for PowerSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerSourceAvailability {
    pub grid_available: bool,
    pub solar_available: bool,
    pub mode: PowerSourceMode,
}

impl PowerSourceAvailability {
    /// At least one input can charge the battery.
    pub fn has_input(&self) -> bool {
        self.grid_available || self.solar_available
    }
}

/// Thresholds the source voltages and derives the operating mode.
///
/// # Examples
///
/// ```
/// use backup_estimator::estimate::sources::{PowerSourceMode, evaluate_sources};
///
/// let sources = evaluate_sources(true, 150.0, true, 50.0);
/// assert_eq!(sources.mode, PowerSourceMode::Hybrid);
/// assert!(sources.grid_available && sources.solar_available);
/// ```
pub fn evaluate_sources(
    grid_enabled: bool,
    grid_voltage: f64,
    solar_enabled: bool,
    solar_voltage: f64,
) -> PowerSourceAvailability {
    let grid_available = grid_enabled && grid_voltage > GRID_PRESENT_VOLTS;
    let solar_available = solar_enabled && solar_voltage > SOLAR_PRESENT_VOLTS;

    let mode = match (grid_available, solar_available) {
        (true, true) => PowerSourceMode::Hybrid,
        (false, true) => PowerSourceMode::SolarOnly,
        (true, false) => PowerSourceMode::NepaOnly,
        (false, false) => PowerSourceMode::BatteryOnly,
    };

    PowerSourceAvailability {
        grid_available,
        solar_available,
        mode,
    }
}

/// Estimated solar output in whole watts, linear in panel voltage up to
/// the rated power at [`SOLAR_REFERENCE_VOLTS`].
pub fn solar_power_watts(solar_voltage: f64, solar_capacity_w: f64) -> f64 {
    (solar_voltage / SOLAR_REFERENCE_VOLTS * solar_capacity_w).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hybrid_when_both_present() {
        let s = evaluate_sources(true, 150.0, true, 50.0);
        assert_eq!(s.mode, PowerSourceMode::Hybrid);
        assert!(s.grid_available);
        assert!(s.solar_available);
        assert!(s.has_input());
    }

    #[test]
    fn single_source_modes() {
        assert_eq!(
            evaluate_sources(false, 230.0, true, 40.0).mode,
            PowerSourceMode::SolarOnly
        );
        assert_eq!(
            evaluate_sources(true, 230.0, true, 10.0).mode,
            PowerSourceMode::NepaOnly
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let s = evaluate_sources(true, 100.0, true, 20.0);
        assert_eq!(s.mode, PowerSourceMode::BatteryOnly);
        assert!(!s.has_input());
        assert_eq!(s.mode.to_string(), "Battery Only - No Input!");
    }

    #[test]
    fn solar_power_rounds_to_whole_watts() {
        assert_eq!(solar_power_watts(58.0, 1000.0), 967.0);
        assert_eq!(solar_power_watts(60.0, 1000.0), 1000.0);
        assert_eq!(solar_power_watts(0.0, 3000.0), 0.0);
    }
}
