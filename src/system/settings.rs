//! Key-value settings store the dashboard state is saved to.
//!
//! The estimators never touch the store; only [`save_state`] and
//! [`load_state`] translate between it and typed state.

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::{debug, warn};

use super::types::{SystemConfiguration, SystemReading};
use crate::error::{EstimatorError, Result};

pub const KEY_SYSTEM_CONFIG: &str = "systemConfig";
pub const KEY_SETUP_COMPLETE: &str = "setupComplete";
pub const KEY_BATTERY_VOLTAGE: &str = "batteryVoltage";
pub const KEY_CURRENT_LOAD: &str = "currentLoad";
pub const KEY_NEPA_ENABLED: &str = "nepaEnabled";
pub const KEY_SOLAR_VOLTAGE: &str = "solarVoltage";
pub const KEY_GRID_VOLTAGE: &str = "gridVoltage";
pub const KEY_OUTPUT_VOLTAGE: &str = "outputVoltage";
pub const KEY_SOLAR_ENABLED: &str = "solarEnabled";

/// Minimal string key-value store.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-process store, ordered by key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Dashboard state as restored from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredState {
    pub config: SystemConfiguration,
    pub reading: SystemReading,
    pub setup_complete: bool,
}

/// Writes configuration, setup flag and reading into `store`.
///
/// The charging flag is not persisted; it restarts at its default.
pub fn save_state<S: SettingsStore>(
    store: &mut S,
    config: &SystemConfiguration,
    reading: &SystemReading,
    setup_complete: bool,
) -> Result<()> {
    let encoded = toml::to_string(config).map_err(|e| EstimatorError::Settings {
        key: KEY_SYSTEM_CONFIG.to_string(),
        message: e.to_string(),
    })?;
    store.set(KEY_SYSTEM_CONFIG, encoded);
    store.set(KEY_SETUP_COMPLETE, setup_complete.to_string());
    store.set(KEY_BATTERY_VOLTAGE, reading.voltage.to_string());
    store.set(KEY_CURRENT_LOAD, reading.load_w.to_string());
    store.set(KEY_NEPA_ENABLED, reading.grid_enabled.to_string());
    store.set(KEY_SOLAR_VOLTAGE, reading.solar_voltage.to_string());
    store.set(KEY_GRID_VOLTAGE, reading.grid_voltage.to_string());
    store.set(KEY_OUTPUT_VOLTAGE, reading.output_voltage.to_string());
    store.set(KEY_SOLAR_ENABLED, reading.solar_enabled.to_string());
    debug!("dashboard state saved");
    Ok(())
}

/// Restores dashboard state, falling back to defaults for missing keys.
///
/// # Errors
///
/// Returns [`EstimatorError::Settings`] when a stored value does not parse.
pub fn load_state<S: SettingsStore>(store: &S) -> Result<StoredState> {
    let config = match store.get(KEY_SYSTEM_CONFIG) {
        Some(raw) => toml::from_str(&raw).map_err(|e| EstimatorError::Settings {
            key: KEY_SYSTEM_CONFIG.to_string(),
            message: e.to_string(),
        })?,
        None => {
            warn!("no stored configuration, using defaults");
            SystemConfiguration::default()
        }
    };

    let defaults = SystemReading::default();
    let reading = SystemReading {
        voltage: parse_or(store, KEY_BATTERY_VOLTAGE, defaults.voltage)?,
        load_w: parse_or(store, KEY_CURRENT_LOAD, defaults.load_w)?,
        grid_enabled: parse_or(store, KEY_NEPA_ENABLED, defaults.grid_enabled)?,
        solar_voltage: parse_or(store, KEY_SOLAR_VOLTAGE, defaults.solar_voltage)?,
        grid_voltage: parse_or(store, KEY_GRID_VOLTAGE, defaults.grid_voltage)?,
        output_voltage: parse_or(store, KEY_OUTPUT_VOLTAGE, defaults.output_voltage)?,
        solar_enabled: parse_or(store, KEY_SOLAR_ENABLED, defaults.solar_enabled)?,
        charging: defaults.charging,
    };

    Ok(StoredState {
        config,
        reading,
        setup_complete: parse_or(store, KEY_SETUP_COMPLETE, false)?,
    })
}

/// Clears every key written by [`save_state`].
pub fn clear_state<S: SettingsStore>(store: &mut S) {
    for key in [
        KEY_SYSTEM_CONFIG,
        KEY_SETUP_COMPLETE,
        KEY_BATTERY_VOLTAGE,
        KEY_CURRENT_LOAD,
        KEY_NEPA_ENABLED,
        KEY_SOLAR_VOLTAGE,
        KEY_GRID_VOLTAGE,
        KEY_OUTPUT_VOLTAGE,
        KEY_SOLAR_ENABLED,
    ] {
        store.remove(key);
    }
}

fn parse_or<S, T>(store: &S, key: &str, default: T) -> Result<T>
where
    S: SettingsStore,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match store.get(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| EstimatorError::Settings {
            key: key.to_string(),
            message: format!("cannot parse \"{raw}\": {e}"),
        }),
        None => Ok(default),
    }
}
