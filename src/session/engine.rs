//! Session engine replaying a day of load and grid events on a dashboard.

use chrono::{NaiveTime, Timelike};
use tracing::{debug, info};

use super::clock::SessionClock;
use super::profile::LoadProfile;
use crate::config::ScenarioConfig;
use crate::estimate::duration::DurationEstimate;
use crate::estimate::load::LoadAdvisory;
use crate::estimate::sources::PowerSourceMode;
use crate::estimate::status::{BatteryStatusTier, ChargeStatus};
use crate::system::dashboard::{Dashboard, Instant};
use crate::system::rules::Action;

/// Derived dashboard values recorded at one session step.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStep {
    pub step: usize,
    pub time_of_day: NaiveTime,
    pub timestamp_ms: i64,
    pub load_w: f64,
    pub load_pct: f64,
    pub mode: PowerSourceMode,
    pub grid_available: bool,
    pub solar_available: bool,
    pub charging: bool,
    pub battery_pct: f64,
    pub battery_status: BatteryStatusTier,
    pub backup_time: DurationEstimate,
    pub charge_eta: DurationEstimate,
    pub charge_status: ChargeStatus,
    pub solar_power_w: f64,
    pub output_voltage: u32,
    pub advisory: LoadAdvisory,
}

/// Owns a dashboard and drives it through a [`SessionClock`].
///
/// Each step sets the profiled load, applies the grid outage window, settles
/// the dashboard and records a [`SessionStep`].
#[derive(Debug, Clone)]
pub struct Session {
    dashboard: Dashboard,
    clock: SessionClock,
    profile: LoadProfile,
    grid_outage: Option<(u32, u32)>,
}

impl Session {
    pub fn new(dashboard: Dashboard, clock: SessionClock, profile: LoadProfile) -> Self {
        Self {
            dashboard,
            clock,
            profile,
            grid_outage: None,
        }
    }

    /// Builds a session from every section of a scenario.
    pub fn from_scenario(scenario: &ScenarioConfig) -> Self {
        let s = &scenario.session;
        let start = NaiveTime::from_hms_opt(s.start_hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let mut session = Self::new(
            Dashboard::new(scenario.system.clone(), scenario.reading.clone()),
            SessionClock::new(start, s.step_minutes, s.steps, s.epoch_ms),
            LoadProfile::from_config(s),
        );
        session.grid_outage = s.grid_outage();
        session
    }

    /// Sets a grid outage window `[start, end)` in whole hours.
    pub fn with_grid_outage(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.grid_outage = Some((start_hour, end_hour));
        self
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    fn in_outage(&self, time_of_day: NaiveTime) -> bool {
        self.grid_outage
            .is_some_and(|(start, end)| (start..end).contains(&time_of_day.hour()))
    }

    /// Executes one step at `now` and returns its record.
    pub fn step(&mut self, step: usize, now: Instant) -> SessionStep {
        let load_w = self.profile.demand_w(now.time_of_day);
        self.dashboard.dispatch(&Action::SetLoad(load_w), now);

        if self.grid_outage.is_some() {
            let want_grid = !self.in_outage(now.time_of_day);
            if self.dashboard.reading().grid_enabled != want_grid {
                debug!(step, grid = want_grid, "grid outage window edge");
                self.dashboard.dispatch(&Action::ToggleNepa, now);
                // Charging resumes once the grid is back.
                if want_grid && !self.dashboard.reading().charging {
                    self.dashboard.dispatch(&Action::ToggleCharging, now);
                }
            }
        }

        self.dashboard.settle(now);
        let snap = self.dashboard.snapshot();
        SessionStep {
            step,
            time_of_day: now.time_of_day,
            timestamp_ms: now.timestamp_ms,
            load_w: snap.load_w,
            load_pct: snap.load_pct,
            mode: snap.sources.mode,
            grid_available: snap.sources.grid_available,
            solar_available: snap.sources.solar_available,
            charging: self.dashboard.reading().charging,
            battery_pct: snap.battery.percentage,
            battery_status: snap.battery.tier,
            backup_time: snap.backup_time,
            charge_eta: snap.charge_eta,
            charge_status: snap.charge_status,
            solar_power_w: snap.solar_power_w,
            output_voltage: snap.output_voltage,
            advisory: snap.advisory,
        }
    }

    /// Runs every remaining clock step and returns the records.
    pub fn run(&mut self) -> Vec<SessionStep> {
        let mut steps = Vec::with_capacity(self.clock.total());
        while let Some((step, now)) = self.clock.tick() {
            steps.push(self.step(step, now));
        }
        info!(steps = steps.len(), "session complete");
        steps
    }
}
