//! User actions and the two automatic rules applied after them.
//!
//! Every function here is idempotent: applying it to a state that already
//! matches the target leaves the state untouched and reports `false`.

use chrono::{NaiveTime, Timelike};
use tracing::debug;

use super::types::{GRID_ON_VOLTS, SOLAR_ON_VOLTS, SystemConfiguration, SystemReading};
use crate::estimate::load::find_preset;

/// Whether `time_of_day` falls in `[sunrise_hour:00, sunset_hour:00)`.
pub fn is_daytime(config: &SystemConfiguration, time_of_day: NaiveTime) -> bool {
    let minute = time_of_day.hour() * 60 + time_of_day.minute();
    minute >= config.sunrise_hour * 60 && minute < config.sunset_hour * 60
}

/// Switches solar with the sunrise/sunset window.
///
/// Only acts when the site has solar and auto-toggle is on. Returns whether
/// the reading changed.
pub fn solar_schedule_rule(
    config: &SystemConfiguration,
    reading: &mut SystemReading,
    time_of_day: NaiveTime,
) -> bool {
    if !(config.has_solar && config.auto_solar_toggle) {
        return false;
    }

    let daytime = is_daytime(config, time_of_day);
    if daytime == reading.solar_enabled {
        return false;
    }

    reading.solar_enabled = daytime;
    reading.solar_voltage = if daytime { SOLAR_ON_VOLTS } else { 0.0 };
    debug!(%time_of_day, solar_enabled = daytime, "solar schedule toggled solar");
    true
}

/// Forces charging off when no source can supply it.
pub fn charging_cutoff_rule(reading: &mut SystemReading) -> bool {
    if reading.sources().has_input() || !reading.charging {
        return false;
    }
    reading.charging = false;
    debug!("no input available, charging disabled");
    true
}

/// A change requested from the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetVoltage(f64),
    SetLoad(f64),
    SetGridVoltage(f64),
    SetSolarVoltage(f64),
    SetOutputVoltage(u32),
    ToggleCharging,
    /// Flip the grid; switching on writes a nominal grid voltage, off writes 0.
    ToggleNepa,
    /// Flip solar by hand. Ignored while the solar schedule is automatic.
    ToggleSolar,
    /// Set the load to a named appliance preset.
    ApplyPreset(String),
    /// Restore the default configuration and reading.
    Reset,
}

/// Applies `action` to the configuration and reading.
///
/// Returns whether anything changed. Unknown presets and manual solar
/// toggles under auto-toggle are no-ops.
pub fn apply_action(
    action: &Action,
    config: &mut SystemConfiguration,
    reading: &mut SystemReading,
) -> bool {
    let before = reading.clone();
    match action {
        Action::SetVoltage(v) => reading.voltage = *v,
        Action::SetLoad(w) => reading.load_w = *w,
        Action::SetGridVoltage(v) => reading.grid_voltage = *v,
        Action::SetSolarVoltage(v) => reading.solar_voltage = *v,
        Action::SetOutputVoltage(v) => reading.output_voltage = *v,
        Action::ToggleCharging => reading.charging = !reading.charging,
        Action::ToggleNepa => {
            reading.grid_enabled = !reading.grid_enabled;
            reading.grid_voltage = if reading.grid_enabled {
                GRID_ON_VOLTS
            } else {
                0.0
            };
        }
        Action::ToggleSolar => {
            if config.auto_solar_toggle {
                debug!("manual solar toggle ignored while auto-toggle is on");
                return false;
            }
            reading.solar_enabled = !reading.solar_enabled;
            reading.solar_voltage = if reading.solar_enabled {
                SOLAR_ON_VOLTS
            } else {
                0.0
            };
        }
        Action::ApplyPreset(name) => match find_preset(name) {
            Some(preset) => reading.load_w = preset.watts,
            None => {
                debug!(preset = %name, "unknown load preset");
                return false;
            }
        },
        Action::Reset => {
            let changed = *config != SystemConfiguration::default()
                || *reading != SystemReading::default();
            *config = SystemConfiguration::default();
            *reading = SystemReading::default();
            return changed;
        }
    }
    *reading != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
    }

    #[test]
    fn daytime_window_is_half_open() {
        let cfg = SystemConfiguration::default();
        assert!(!is_daytime(&cfg, at(5, 59)));
        assert!(is_daytime(&cfg, at(6, 0)));
        assert!(is_daytime(&cfg, at(17, 59)));
        assert!(!is_daytime(&cfg, at(18, 0)));
    }

    #[test]
    fn schedule_disables_solar_at_night() {
        let cfg = SystemConfiguration::default();
        let mut reading = SystemReading::default();
        assert!(solar_schedule_rule(&cfg, &mut reading, at(22, 0)));
        assert!(!reading.solar_enabled);
        assert_eq!(reading.solar_voltage, 0.0);
        // Already in target state.
        assert!(!solar_schedule_rule(&cfg, &mut reading, at(23, 0)));
    }

    #[test]
    fn schedule_enables_solar_by_day() {
        let cfg = SystemConfiguration::default();
        let mut reading = SystemReading {
            solar_enabled: false,
            solar_voltage: 0.0,
            ..SystemReading::default()
        };
        assert!(solar_schedule_rule(&cfg, &mut reading, at(9, 30)));
        assert!(reading.solar_enabled);
        assert_eq!(reading.solar_voltage, 58.0);
    }

    #[test]
    fn schedule_inactive_without_auto_toggle() {
        let cfg = SystemConfiguration {
            auto_solar_toggle: false,
            ..SystemConfiguration::default()
        };
        let mut reading = SystemReading::default();
        assert!(!solar_schedule_rule(&cfg, &mut reading, at(23, 0)));
        assert!(reading.solar_enabled);
    }

    #[test]
    fn cutoff_only_without_sources() {
        let mut reading = SystemReading::default();
        assert!(!charging_cutoff_rule(&mut reading));
        assert!(reading.charging);

        reading.grid_enabled = false;
        reading.solar_voltage = 10.0;
        assert!(charging_cutoff_rule(&mut reading));
        assert!(!reading.charging);
        assert!(!charging_cutoff_rule(&mut reading));
    }

    #[test]
    fn toggle_nepa_writes_grid_voltage() {
        let mut cfg = SystemConfiguration::default();
        let mut reading = SystemReading::default();
        assert!(apply_action(&Action::ToggleNepa, &mut cfg, &mut reading));
        assert!(!reading.grid_enabled);
        assert_eq!(reading.grid_voltage, 0.0);
        apply_action(&Action::ToggleNepa, &mut cfg, &mut reading);
        assert_eq!(reading.grid_voltage, 190.0);
    }

    #[test]
    fn manual_solar_toggle_respects_auto_mode() {
        let mut cfg = SystemConfiguration::default();
        let mut reading = SystemReading::default();
        assert!(!apply_action(&Action::ToggleSolar, &mut cfg, &mut reading));
        assert!(reading.solar_enabled);

        cfg.auto_solar_toggle = false;
        assert!(apply_action(&Action::ToggleSolar, &mut cfg, &mut reading));
        assert!(!reading.solar_enabled);
        assert_eq!(reading.solar_voltage, 0.0);
    }

    #[test]
    fn presets_set_load() {
        let mut cfg = SystemConfiguration::default();
        let mut reading = SystemReading::default();
        assert!(apply_action(
            &Action::ApplyPreset("TV".into()),
            &mut cfg,
            &mut reading
        ));
        assert_eq!(reading.load_w, 500.0);
        assert!(!apply_action(
            &Action::ApplyPreset("toaster".into()),
            &mut cfg,
            &mut reading
        ));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut cfg = SystemConfiguration {
            num_batteries: 4,
            ..SystemConfiguration::default()
        };
        let mut reading = SystemReading {
            load_w: 2000.0,
            ..SystemReading::default()
        };
        assert!(apply_action(&Action::Reset, &mut cfg, &mut reading));
        assert_eq!(cfg, SystemConfiguration::default());
        assert_eq!(reading, SystemReading::default());
        assert!(!apply_action(&Action::Reset, &mut cfg, &mut reading));
    }
}
