//! State owner: applies actions, runs the reactive rules as change-detection
//! passes, and produces the derived snapshot.

use std::fmt;

use chrono::NaiveTime;
use tracing::debug;

use super::rules::{Action, apply_action, charging_cutoff_rule, is_daytime, solar_schedule_rule};
use super::types::{SystemConfiguration, SystemReading};
use crate::estimate::backup::backup_time;
use crate::estimate::charge_eta::charge_eta;
use crate::estimate::duration::DurationEstimate;
use crate::estimate::load::{LoadAdvisory, format_load_percentage, load_percentage};
use crate::estimate::output_voltage::{OutputTrigger, next_output_voltage};
use crate::estimate::sources::{PowerSourceAvailability, solar_power_watts};
use crate::estimate::status::{BatteryStatus, ChargeStatus, charge_status, classify_battery};

/// Point in time supplied by the caller: local time of day for the solar
/// schedule, and a millisecond timestamp for the output jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instant {
    pub time_of_day: NaiveTime,
    pub timestamp_ms: i64,
}

impl Instant {
    pub fn new(time_of_day: NaiveTime, timestamp_ms: i64) -> Self {
        Self {
            time_of_day,
            timestamp_ms,
        }
    }
}

/// Inputs of the solar schedule rule. The rule runs when this changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduleKey {
    has_solar: bool,
    auto_solar_toggle: bool,
    sunrise_hour: u32,
    sunset_hour: u32,
    solar_enabled: bool,
    daytime: bool,
}

impl ScheduleKey {
    fn of(config: &SystemConfiguration, reading: &SystemReading, now: Instant) -> Self {
        Self {
            has_solar: config.has_solar,
            auto_solar_toggle: config.auto_solar_toggle,
            sunrise_hour: config.sunrise_hour,
            sunset_hour: config.sunset_hour,
            solar_enabled: reading.solar_enabled,
            daytime: is_daytime(config, now.time_of_day),
        }
    }
}

/// Inputs of the charging cutoff rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceKey {
    grid_enabled: bool,
    grid_voltage_bits: u64,
    solar_enabled: bool,
    solar_voltage_bits: u64,
}

impl SourceKey {
    fn of(reading: &SystemReading) -> Self {
        Self {
            grid_enabled: reading.grid_enabled,
            grid_voltage_bits: reading.grid_voltage.to_bits(),
            solar_enabled: reading.solar_enabled,
            solar_voltage_bits: reading.solar_voltage.to_bits(),
        }
    }
}

/// Which automatic rules changed the reading during a settle pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    pub solar_toggled: bool,
    pub charging_cut: bool,
    pub output_updated: bool,
}

/// Owns the configuration and reading and keeps them consistent.
///
/// Each rule remembers the inputs it last ran against and only runs again
/// once they change. A user toggle therefore stands until one of the rule's
/// own inputs moves.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: SystemConfiguration,
    reading: SystemReading,
    last_schedule: Option<ScheduleKey>,
    last_sources: Option<SourceKey>,
    last_output: Option<OutputTrigger>,
}

impl Dashboard {
    pub fn new(config: SystemConfiguration, reading: SystemReading) -> Self {
        Self {
            config,
            reading,
            last_schedule: None,
            last_sources: None,
            last_output: None,
        }
    }

    pub fn config(&self) -> &SystemConfiguration {
        &self.config
    }

    pub fn reading(&self) -> &SystemReading {
        &self.reading
    }

    /// Replaces the configuration, e.g. after a setup edit.
    pub fn set_config(&mut self, config: SystemConfiguration, now: Instant) -> SettleReport {
        self.config = config;
        self.settle(now)
    }

    /// Applies a user action, then settles.
    pub fn dispatch(&mut self, action: &Action, now: Instant) -> SettleReport {
        if apply_action(action, &mut self.config, &mut self.reading) {
            debug!(?action, "action applied");
        }
        self.settle(now)
    }

    /// Runs the change-detection passes: solar schedule, charging cutoff,
    /// then the output simulator.
    pub fn settle(&mut self, now: Instant) -> SettleReport {
        let mut report = SettleReport::default();

        let schedule = ScheduleKey::of(&self.config, &self.reading, now);
        if self.last_schedule != Some(schedule) {
            report.solar_toggled =
                solar_schedule_rule(&self.config, &mut self.reading, now.time_of_day);
            self.last_schedule = Some(ScheduleKey::of(&self.config, &self.reading, now));
        }

        let sources = SourceKey::of(&self.reading);
        if self.last_sources != Some(sources) {
            report.charging_cut = charging_cutoff_rule(&mut self.reading);
            self.last_sources = Some(sources);
        }

        let inputs = self.reading.output_inputs(&self.config);
        let trigger = inputs.trigger();
        if self.last_output != Some(trigger) {
            if let Some(volts) =
                next_output_voltage(self.reading.output_voltage, &inputs, now.timestamp_ms)
            {
                self.reading.output_voltage = volts;
                report.output_updated = true;
            }
            self.last_output = Some(trigger);
        }

        report
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::compute(&self.config, &self.reading)
    }
}

/// Every derived value the dashboard displays.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub system_voltage: f64,
    pub battery: BatteryStatus,
    pub sources: PowerSourceAvailability,
    pub backup_time: DurationEstimate,
    pub charge_eta: DurationEstimate,
    pub charge_status: ChargeStatus,
    pub load_w: f64,
    pub load_pct: f64,
    pub advisory: LoadAdvisory,
    pub solar_power_w: f64,
    pub output_voltage: u32,
}

impl DashboardSnapshot {
    pub fn compute(config: &SystemConfiguration, reading: &SystemReading) -> Self {
        let system_voltage = config.system_voltage();
        let sources = reading.sources();
        let battery = classify_battery(reading.voltage, reading.charging, system_voltage);
        let load_pct = load_percentage(reading.load_w, config.inverter_capacity_w);

        Self {
            system_voltage,
            battery,
            sources,
            backup_time: backup_time(reading.voltage, reading.load_w, config),
            charge_eta: charge_eta(&reading.charge_eta_inputs(config)),
            charge_status: charge_status(
                reading.voltage,
                system_voltage,
                reading.charging,
                &sources,
            ),
            load_w: reading.load_w,
            load_pct,
            advisory: LoadAdvisory::evaluate(
                &sources,
                load_pct,
                reading.charging,
                battery.percentage,
            ),
            solar_power_w: solar_power_watts(reading.solar_voltage, config.solar_capacity_w),
            output_voltage: reading.output_voltage,
        }
    }
}

impl fmt::Display for DashboardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Battery:   {:.0}% ({}) on a {}V bank",
            self.battery.percentage, self.battery.tier, self.system_voltage
        )?;
        writeln!(f, "Sources:   {}", self.sources.mode)?;
        writeln!(
            f,
            "Load:      {:.0}W ({})",
            self.load_w,
            format_load_percentage(self.load_pct)
        )?;
        writeln!(f, "Backup:    {}", self.backup_time)?;
        writeln!(f, "Charge:    {} (ETA {})", self.charge_status, self.charge_eta)?;
        writeln!(f, "Solar:     {:.0}W", self.solar_power_w)?;
        writeln!(f, "Output:    {}V", self.output_voltage)?;
        write!(f, "Advisory:  {}", self.advisory)
    }
}
