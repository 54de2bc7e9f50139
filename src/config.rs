//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::estimate::curve::NominalVoltage;
use crate::system::types::{BatteryType, SystemConfiguration, SystemReading};

/// Top-level scenario parsed from TOML.
///
/// All sections have defaults matching the factory setup. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or pick a preset with
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Inverter, battery bank and source setup.
    #[serde(default)]
    pub system: SystemConfiguration,
    /// Starting dashboard reading.
    #[serde(default)]
    pub reading: SystemReading,
    /// Stepped session parameters.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Parameters of a simulated session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Hour of day the session starts at.
    pub start_hour: u32,
    /// Minutes between steps (must be > 0).
    pub step_minutes: u32,
    /// Number of steps (must be > 0).
    pub steps: usize,
    /// Random seed for load noise.
    pub seed: u64,
    /// Millisecond timestamp of the first step, drives output jitter.
    pub epoch_ms: i64,
    /// Load outside the evening peak (W).
    pub base_load_w: f64,
    /// Load during the evening peak (W).
    pub peak_load_w: f64,
    /// Peak window start hour (inclusive).
    pub peak_start_hour: u32,
    /// Peak window end hour (exclusive).
    pub peak_end_hour: u32,
    /// Gaussian load noise standard deviation (W).
    pub load_noise_std_w: f64,
    /// Hour the grid drops out (inclusive), if any.
    pub grid_outage_start_hour: Option<u32>,
    /// Hour the grid returns (exclusive).
    pub grid_outage_end_hour: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_hour: 0,
            step_minutes: 60,
            steps: 24,
            seed: 42,
            epoch_ms: 0,
            base_load_w: 180.0,
            peak_load_w: 680.0,
            peak_start_hour: 18,
            peak_end_hour: 22,
            load_noise_std_w: 25.0,
            grid_outage_start_hour: None,
            grid_outage_end_hour: None,
        }
    }
}

impl SessionConfig {
    /// Grid outage window as `[start, end)` hours, when both ends are set.
    pub fn grid_outage(&self) -> Option<(u32, u32)> {
        self.grid_outage_start_hour.zip(self.grid_outage_end_hour)
    }
}

impl ScenarioConfig {
    /// Factory setup: 2 x 12V tubular 220Ah on a 4.2kW inverter with grid and 1kW solar.
    pub fn default_setup() -> Self {
        Self::default()
    }

    /// Small 12V site: one battery, 1kW inverter, 500W of panels.
    pub fn compact_12v() -> Self {
        Self {
            system: SystemConfiguration {
                inverter_capacity_w: 1000.0,
                battery_type: BatteryType::Flat,
                num_batteries: 1,
                battery_capacity_ah: 200.0,
                solar_capacity_w: 500.0,
                ..SystemConfiguration::default()
            },
            reading: SystemReading {
                voltage: 12.9,
                load_w: 100.0,
                charging: false,
                ..SystemReading::default()
            },
            session: SessionConfig {
                base_load_w: 100.0,
                peak_load_w: 400.0,
                load_noise_std_w: 10.0,
                ..SessionConfig::default()
            },
        }
    }

    /// Large 48V lithium bank on a 10kW inverter with 3kW of panels and an
    /// evening grid outage.
    pub fn lithium_48v() -> Self {
        Self {
            system: SystemConfiguration {
                inverter_capacity_w: 10000.0,
                battery_type: BatteryType::Lithium,
                num_batteries: 4,
                battery_capacity_ah: 200.0,
                solar_capacity_w: 3000.0,
                depth_of_discharge_pct: 80.0,
                ..SystemConfiguration::default()
            },
            reading: SystemReading {
                voltage: 52.0,
                load_w: 1500.0,
                ..SystemReading::default()
            },
            session: SessionConfig {
                base_load_w: 900.0,
                peak_load_w: 3000.0,
                load_noise_std_w: 80.0,
                grid_outage_start_hour: Some(17),
                grid_outage_end_hour: Some(23),
                ..SessionConfig::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "compact_12v", "lithium_48v"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default_setup()),
            "compact_12v" => Ok(Self::compact_12v()),
            "lithium_48v" => Ok(Self::lithium_48v()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. A system voltage
    /// without its own reference curve is not an error; see [`Self::warnings`].
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let sys = &self.system;

        if sys.inverter_capacity_w <= 0.0 {
            errors.push(ConfigError::new("system.inverter_capacity_w", "must be > 0"));
        }
        if sys.battery_voltage <= 0.0 {
            errors.push(ConfigError::new("system.battery_voltage", "must be > 0"));
        }
        if sys.num_batteries == 0 {
            errors.push(ConfigError::new("system.num_batteries", "must be >= 1"));
        }
        if sys.battery_capacity_ah <= 0.0 {
            errors.push(ConfigError::new("system.battery_capacity_ah", "must be > 0"));
        }
        if sys.solar_capacity_w < 0.0 {
            errors.push(ConfigError::new("system.solar_capacity_w", "must be >= 0"));
        }
        if !(sys.depth_of_discharge_pct > 0.0 && sys.depth_of_discharge_pct <= 100.0) {
            errors.push(ConfigError::new(
                "system.depth_of_discharge_pct",
                "must be in (0, 100]",
            ));
        }
        if sys.sunrise_hour >= sys.sunset_hour {
            errors.push(ConfigError::new(
                "system.sunrise_hour",
                "must be < system.sunset_hour",
            ));
        }
        if sys.sunset_hour > 24 {
            errors.push(ConfigError::new("system.sunset_hour", "must be <= 24"));
        }

        let r = &self.reading;
        for (field, value) in [
            ("reading.voltage", r.voltage),
            ("reading.load_w", r.load_w),
            ("reading.grid_voltage", r.grid_voltage),
            ("reading.solar_voltage", r.solar_voltage),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                errors.push(ConfigError::new(field, "must be a finite value >= 0"));
            }
        }

        let s = &self.session;
        if s.steps == 0 {
            errors.push(ConfigError::new("session.steps", "must be > 0"));
        }
        if s.step_minutes == 0 {
            errors.push(ConfigError::new("session.step_minutes", "must be > 0"));
        }
        if s.start_hour >= 24 {
            errors.push(ConfigError::new("session.start_hour", "must be < 24"));
        }
        if s.peak_start_hour > s.peak_end_hour {
            errors.push(ConfigError::new(
                "session.peak_start_hour",
                "must be <= session.peak_end_hour",
            ));
        }
        if s.load_noise_std_w < 0.0 {
            errors.push(ConfigError::new("session.load_noise_std_w", "must be >= 0"));
        }
        match (s.grid_outage_start_hour, s.grid_outage_end_hour) {
            (Some(start), Some(end)) if start >= end => {
                errors.push(ConfigError::new(
                    "session.grid_outage_start_hour",
                    "must be < session.grid_outage_end_hour",
                ));
            }
            (Some(_), None) | (None, Some(_)) => {
                errors.push(ConfigError::new(
                    "session.grid_outage_start_hour",
                    "grid outage needs both start and end hours",
                ));
            }
            _ => {}
        }

        errors
    }

    /// Non-fatal findings worth reporting to the operator.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let sv = self.system.system_voltage();
        if NominalVoltage::from_volts(sv).is_none() {
            warnings.push(format!(
                "system voltage {sv}V has no reference curve; the 24V curve is used"
            ));
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_valid() {
        let cfg = ScenarioConfig::default_setup();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
        assert!(cfg.warnings().is_empty());
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn presets_cover_each_curve() {
        assert_eq!(ScenarioConfig::compact_12v().system.system_voltage(), 12.0);
        assert_eq!(ScenarioConfig::default_setup().system.system_voltage(), 24.0);
        assert_eq!(ScenarioConfig::lithium_48v().system.system_voltage(), 48.0);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[system]
name = "Cabin"
inverter_capacity_w = 3500.0
battery_type = "gel"
battery_voltage = 12.0
num_batteries = 4
battery_capacity_ah = 150.0
depth_of_discharge_pct = 30.0
sunrise_hour = 7
sunset_hour = 19

[reading]
voltage = 50.4
load_w = 600.0
charging = false

[session]
steps = 48
step_minutes = 30
grid_outage_start_hour = 2
grid_outage_end_hour = 5
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.system.system_voltage()), Some(48.0));
        assert_eq!(
            cfg.as_ref().map(|c| c.system.battery_type),
            Some(BatteryType::Gel)
        );
        assert_eq!(cfg.as_ref().map(|c| c.session.grid_outage()), Some(Some((2, 5))));
        assert_eq!(cfg.as_ref().map(|c| c.validate().len()), Some(0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[system]
num_batteries = 2
system_voltage = 24.0
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[reading]
load_w = 1200.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.reading.load_w), Some(1200.0));
        assert_eq!(cfg.as_ref().map(|c| c.reading.voltage), Some(29.2));
        assert_eq!(cfg.as_ref().map(|c| c.system.battery_capacity_ah), Some(220.0));
    }

    #[test]
    fn validation_catches_zero_batteries() {
        let mut cfg = ScenarioConfig::default_setup();
        cfg.system.num_batteries = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "system.num_batteries"));
    }

    #[test]
    fn validation_catches_bad_depth_of_discharge() {
        let mut cfg = ScenarioConfig::default_setup();
        cfg.system.depth_of_discharge_pct = 0.0;
        assert!(
            cfg.validate()
                .iter()
                .any(|e| e.field == "system.depth_of_discharge_pct")
        );
        cfg.system.depth_of_discharge_pct = 120.0;
        assert!(
            cfg.validate()
                .iter()
                .any(|e| e.field == "system.depth_of_discharge_pct")
        );
    }

    #[test]
    fn validation_catches_inverted_solar_window() {
        let mut cfg = ScenarioConfig::default_setup();
        cfg.system.sunrise_hour = 19;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "system.sunrise_hour"));
    }

    #[test]
    fn validation_catches_half_open_outage() {
        let mut cfg = ScenarioConfig::default_setup();
        cfg.session.grid_outage_start_hour = Some(3);
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "session.grid_outage_start_hour")
        );
    }

    #[test]
    fn validation_catches_negative_reading() {
        let mut cfg = ScenarioConfig::default_setup();
        cfg.reading.load_w = -10.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "reading.load_w"));
    }

    #[test]
    fn unsupported_bank_voltage_warns() {
        let mut cfg = ScenarioConfig::default_setup();
        cfg.system.num_batteries = 3;
        assert!(cfg.validate().is_empty());
        let warnings = cfg.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("36V"));
    }
}
