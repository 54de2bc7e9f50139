//! Remaining runtime on battery at the current load.

use super::duration::DurationEstimate;
use super::percentage::battery_percentage;
use crate::system::types::SystemConfiguration;

/// Energy (Wh) still drawable before hitting the depth-of-discharge limit.
///
/// Uses the resting percentage, ignoring any charge current.
pub fn usable_energy_wh(voltage: f64, config: &SystemConfiguration) -> f64 {
    let system_voltage = config.system_voltage();
    let percentage = battery_percentage(voltage, false, system_voltage);
    let total_wh = config.battery_capacity_ah * system_voltage * percentage / 100.0;
    total_wh * config.depth_of_discharge_pct / 100.0
}

/// Estimates how long the battery carries `load_w`.
///
/// A load of zero (or less) never drains the bank and yields
/// [`DurationEstimate::Infinite`].
pub fn backup_time(voltage: f64, load_w: f64, config: &SystemConfiguration) -> DurationEstimate {
    if load_w <= 0.0 {
        return DurationEstimate::Infinite;
    }
    DurationEstimate::from_hours(usable_energy_wh(voltage, config) / load_w)
}
