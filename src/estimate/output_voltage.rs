//! Simulated AC output voltage.
//!
//! There is no inverter telemetry, so the dashboard synthesizes a plausible
//! output figure from load, battery health and source state. The value is
//! cosmetic; its clamp window and recompute triggers are what matter.

use super::percentage::battery_percentage;

/// Nominal output before droop and boost.
pub const BASE_OUTPUT_VOLTS: f64 = 216.0;
/// Lowest and highest simulated output while the inverter is running.
pub const OUTPUT_WINDOW_VOLTS: (f64, f64) = (208.0, 228.0);
/// Droop at full inverter load.
pub const MAX_LOAD_DROOP_VOLTS: f64 = 12.0;
/// Largest droop from a depleted battery.
pub const MAX_BATTERY_DROOP_VOLTS: f64 = 6.0;
/// Charge level below which the battery starts pulling the output down.
pub const BATTERY_DROOP_BELOW_PCT: f64 = 60.0;
/// Lift applied while the grid holds the bus.
pub const GRID_BOOST_VOLTS: f64 = 1.0;
/// Jitter amplitude and the divisor applied to the millisecond timestamp.
pub const JITTER_VOLTS: f64 = 1.0;
pub const JITTER_PERIOD_MS: f64 = 30_000.0;

/// Battery voltage at or below which the inverter cannot run unaided.
pub fn battery_floor_volts(system_voltage: f64) -> f64 {
    if system_voltage == 24.0 {
        22.0
    } else if system_voltage == 12.0 {
        11.0
    } else {
        system_voltage - 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputVoltageInputs {
    pub grid_available: bool,
    pub solar_available: bool,
    pub battery_voltage: f64,
    pub charging: bool,
    pub load_w: f64,
    pub system_voltage: f64,
    pub inverter_capacity_w: f64,
}

impl OutputVoltageInputs {
    /// Whether any input (grid, solar or a healthy battery) keeps the output up.
    pub fn can_output(&self) -> bool {
        self.grid_available
            || self.solar_available
            || self.battery_voltage > battery_floor_volts(self.system_voltage)
    }

    /// Recompute key. Load is not part of it, so load changes alone leave
    /// the simulated output where it is.
    pub fn trigger(&self) -> OutputTrigger {
        OutputTrigger {
            grid_available: self.grid_available,
            solar_available: self.solar_available,
            battery_voltage_bits: self.battery_voltage.to_bits(),
            system_voltage_bits: self.system_voltage.to_bits(),
        }
    }
}

/// Values whose change re-runs the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputTrigger {
    grid_available: bool,
    solar_available: bool,
    battery_voltage_bits: u64,
    system_voltage_bits: u64,
}

/// Computes the simulated output voltage at `timestamp_ms`.
///
/// Returns 0 when neither source is present and the battery is below its
/// floor, otherwise a whole voltage within [`OUTPUT_WINDOW_VOLTS`].
pub fn simulate_output_voltage(inputs: &OutputVoltageInputs, timestamp_ms: i64) -> u32 {
    if !inputs.can_output() {
        return 0;
    }

    let load_ratio = (inputs.load_w / inputs.inverter_capacity_w.max(1.0)).clamp(0.0, 1.0);
    let load_droop = (load_ratio * MAX_LOAD_DROOP_VOLTS).min(MAX_LOAD_DROOP_VOLTS);

    let pct = battery_percentage(
        inputs.battery_voltage,
        inputs.charging,
        inputs.system_voltage,
    );
    let battery_droop = if pct < BATTERY_DROOP_BELOW_PCT {
        ((BATTERY_DROOP_BELOW_PCT - pct) / 8.0).min(MAX_BATTERY_DROOP_VOLTS)
    } else {
        0.0
    };

    let boost = if inputs.grid_available {
        GRID_BOOST_VOLTS
    } else {
        0.0
    };
    let jitter = (timestamp_ms as f64 / JITTER_PERIOD_MS).sin() * JITTER_VOLTS;

    let (lo, hi) = OUTPUT_WINDOW_VOLTS;
    let volts = (BASE_OUTPUT_VOLTS - load_droop - battery_droop + boost + jitter).clamp(lo, hi);
    volts.round() as u32
}

/// Returns the new output only when it differs from `current`.
pub fn next_output_voltage(
    current: u32,
    inputs: &OutputVoltageInputs,
    timestamp_ms: i64,
) -> Option<u32> {
    let next = simulate_output_voltage(inputs, timestamp_ms);
    (next != current).then_some(next)
}
