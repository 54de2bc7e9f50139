//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use chrono::NaiveTime;

use backup_estimator::config::ScenarioConfig;
use backup_estimator::system::{Instant, SystemConfiguration, SystemReading};

/// Float comparison tolerance used across tests.
pub const EPS: f64 = 1e-9;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

/// Local time of day at `h:m`.
pub fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

/// Instant at `h:m` with a zero jitter timestamp.
pub fn instant(h: u32, m: u32) -> Instant {
    Instant::new(at(h, m), 0)
}

/// Factory setup: 2 x 12V tubular 220Ah, 4.2kW inverter, 1kW solar, 50% DoD.
pub fn default_system() -> SystemConfiguration {
    SystemConfiguration::default()
}

/// A resting reading at `voltage` with both sources switched off.
pub fn battery_only_reading(voltage: f64) -> SystemReading {
    SystemReading {
        voltage,
        charging: false,
        grid_enabled: false,
        grid_voltage: 0.0,
        solar_enabled: false,
        solar_voltage: 0.0,
        ..SystemReading::default()
    }
}

/// Default scenario with load noise removed, so loads are exact.
pub fn quiet_scenario() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::default_setup();
    cfg.session.load_noise_std_w = 0.0;
    cfg
}
