//! Configuration captured at setup and the live reading it is applied to.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::estimate::charge_eta::ChargeEtaInputs;
use crate::estimate::output_voltage::OutputVoltageInputs;
use crate::estimate::sources::{PowerSourceAvailability, evaluate_sources, solar_power_watts};

/// Battery chemistry/construction chosen at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryType {
    Tubular,
    Flat,
    Gel,
    Agm,
    Lithium,
}

impl fmt::Display for BatteryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tubular => "Tubular",
            Self::Flat => "Flat Plate",
            Self::Gel => "Gel",
            Self::Agm => "AGM",
            Self::Lithium => "Lithium",
        };
        f.write_str(name)
    }
}

/// Inverter, battery bank and source setup.
///
/// The system voltage is derived from the per-battery voltage and the
/// battery count and is never stored, so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfiguration {
    pub name: String,
    pub timezone: String,
    pub inverter_brand: String,
    /// Inverter rating (W).
    pub inverter_capacity_w: f64,
    pub battery_type: BatteryType,
    pub battery_brand: String,
    /// Nominal voltage of one battery (V).
    pub battery_voltage: f64,
    pub num_batteries: u32,
    /// Bank capacity (Ah).
    pub battery_capacity_ah: f64,
    pub has_nepa: bool,
    pub has_solar: bool,
    /// Rated panel power (W).
    pub solar_capacity_w: f64,
    /// Share of capacity usable before recharge (%).
    pub depth_of_discharge_pct: f64,
    /// Switch solar on and off with the sunrise/sunset window.
    pub auto_solar_toggle: bool,
    pub sunrise_hour: u32,
    pub sunset_hour: u32,
}

impl Default for SystemConfiguration {
    fn default() -> Self {
        Self {
            name: "SBC".to_string(),
            timezone: "Africa/Lagos".to_string(),
            inverter_brand: String::new(),
            inverter_capacity_w: 4200.0,
            battery_type: BatteryType::Tubular,
            battery_brand: "Star Plus".to_string(),
            battery_voltage: 12.0,
            num_batteries: 2,
            battery_capacity_ah: 220.0,
            has_nepa: true,
            has_solar: true,
            solar_capacity_w: 1000.0,
            depth_of_discharge_pct: 50.0,
            auto_solar_toggle: true,
            sunrise_hour: 6,
            sunset_hour: 18,
        }
    }
}

impl SystemConfiguration {
    /// Bank voltage: battery voltage times battery count.
    pub fn system_voltage(&self) -> f64 {
        self.battery_voltage * f64::from(self.num_batteries)
    }

    /// Nameplate bank energy (kWh) at the system voltage.
    pub fn bank_energy_kwh(&self) -> f64 {
        self.battery_capacity_ah * self.system_voltage() / 1000.0
    }
}

/// Voltages and flags currently entered or simulated on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemReading {
    /// Battery terminal voltage (V).
    pub voltage: f64,
    pub load_w: f64,
    pub grid_voltage: f64,
    pub solar_voltage: f64,
    /// Last simulated inverter output (V).
    pub output_voltage: u32,
    pub charging: bool,
    pub grid_enabled: bool,
    pub solar_enabled: bool,
}

impl Default for SystemReading {
    fn default() -> Self {
        Self {
            voltage: 29.2,
            load_w: 180.0,
            grid_voltage: GRID_ON_VOLTS,
            solar_voltage: SOLAR_ON_VOLTS,
            output_voltage: 190,
            charging: true,
            grid_enabled: true,
            solar_enabled: true,
        }
    }
}

/// Grid voltage written when the grid is switched on.
pub const GRID_ON_VOLTS: f64 = 190.0;
/// Panel voltage written when solar is switched on.
pub const SOLAR_ON_VOLTS: f64 = 58.0;

impl SystemReading {
    pub fn sources(&self) -> PowerSourceAvailability {
        evaluate_sources(
            self.grid_enabled,
            self.grid_voltage,
            self.solar_enabled,
            self.solar_voltage,
        )
    }

    pub fn charge_eta_inputs(&self, config: &SystemConfiguration) -> ChargeEtaInputs {
        let sources = self.sources();
        ChargeEtaInputs {
            voltage: self.voltage,
            system_voltage: config.system_voltage(),
            battery_capacity_ah: config.battery_capacity_ah,
            num_batteries: config.num_batteries,
            grid_available: sources.grid_available,
            solar_available: sources.solar_available,
            solar_power_w: solar_power_watts(self.solar_voltage, config.solar_capacity_w),
            inverter_capacity_w: config.inverter_capacity_w,
        }
    }

    pub fn output_inputs(&self, config: &SystemConfiguration) -> OutputVoltageInputs {
        let sources = self.sources();
        OutputVoltageInputs {
            grid_available: sources.grid_available,
            solar_available: sources.solar_available,
            battery_voltage: self.voltage,
            charging: self.charging,
            load_w: self.load_w,
            system_voltage: config.system_voltage(),
            inverter_capacity_w: config.inverter_capacity_w,
        }
    }
}
