//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveTime;
use clap::{Parser, Subcommand};

use crate::config::ScenarioConfig;
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(name = "backup-estimator")]
#[command(version, about = "Home battery backup and solar estimator")]
#[command(
    long_about = "Estimates battery state of charge, backup time and charge ETA for a\n\
    home inverter system, and replays a day of load and grid events.\n\
    \nIf no --scenario or --preset is given, the default preset is used.\n\
    \nExamples:\n  \
    backup-estimator status --at 21:30\n  \
    backup-estimator --preset lithium_48v session --csv-out day.csv\n  \
    backup-estimator --scenario site.toml reference"
)]
pub struct Cli {
    /// Load scenario from a TOML file
    #[arg(long, global = true, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (default, compact_12v, lithium_48v)
    #[arg(long, global = true)]
    pub preset: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Settle the dashboard once and print every derived value
    Status {
        /// Local time of day (HH:MM); defaults to the current time
        #[arg(long, value_parser = parse_time_of_day)]
        at: Option<NaiveTime>,
    },
    /// Replay the scenario's session and print one line per step
    Session {
        /// Export step records to CSV
        #[arg(long)]
        csv_out: Option<PathBuf>,

        /// Override the load noise seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the voltage reference table for the configured bank
    Reference,
}

impl Default for Command {
    fn default() -> Self {
        Self::Status { at: None }
    }
}

impl Cli {
    /// Resolves `--scenario` / `--preset` into a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the preset
    /// is unknown.
    pub fn load_scenario(&self) -> Result<ScenarioConfig> {
        let cfg = match (&self.scenario, &self.preset) {
            (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
            (None, Some(name)) => ScenarioConfig::from_preset(name)?,
            (None, None) => ScenarioConfig::default_setup(),
        };
        Ok(cfg)
    }
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(s: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| format!("invalid time \"{s}\" (expected HH:MM): {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("backup-estimator").chain(args.iter().copied()))
    }

    #[test]
    fn no_args_defaults_to_status() {
        let cli = parse(&[]).ok();
        assert!(cli.as_ref().is_some_and(|c| c.command.is_none()));
        assert_eq!(Command::default(), Command::Status { at: None });
    }

    #[test]
    fn status_at_parses_time() {
        let cli = parse(&["status", "--at", "21:30"]).ok();
        let expected = NaiveTime::from_hms_opt(21, 30, 0);
        assert_eq!(
            cli.and_then(|c| c.command),
            Some(Command::Status { at: expected })
        );
    }

    #[test]
    fn status_rejects_bad_time() {
        assert!(parse(&["status", "--at", "25:00"]).is_err());
        assert!(parse(&["status", "--at", "noon"]).is_err());
    }

    #[test]
    fn session_options() {
        let cli = parse(&[
            "--preset",
            "compact_12v",
            "session",
            "--csv-out",
            "out.csv",
            "--seed",
            "7",
        ])
        .ok();
        assert_eq!(
            cli.as_ref().and_then(|c| c.preset.clone()).as_deref(),
            Some("compact_12v")
        );
        assert_eq!(
            cli.and_then(|c| c.command),
            Some(Command::Session {
                csv_out: Some(PathBuf::from("out.csv")),
                seed: Some(7),
            })
        );
    }

    #[test]
    fn global_preset_after_subcommand() {
        let cli = parse(&["reference", "--preset", "lithium_48v"]).ok();
        assert_eq!(
            cli.as_ref().and_then(|c| c.preset.clone()).as_deref(),
            Some("lithium_48v")
        );
    }

    #[test]
    fn scenario_and_preset_conflict() {
        assert!(parse(&["--scenario", "a.toml", "--preset", "default"]).is_err());
    }

    #[test]
    fn load_scenario_from_preset() {
        let cli = parse(&["--preset", "lithium_48v"]).ok();
        let cfg = cli.map(|c| c.load_scenario());
        assert!(matches!(cfg, Some(Ok(ref c)) if c.system.system_voltage() == 48.0));
    }

    #[test]
    fn load_scenario_unknown_preset() {
        let cli = parse(&["--preset", "tiny"]).ok();
        assert!(matches!(cli.map(|c| c.load_scenario()), Some(Err(_))));
    }
}
