//! Estimator entry point: CLI wiring and config-driven dashboard runs.

use std::process::ExitCode;

use chrono::{Local, NaiveTime};
use clap::Parser;
use tracing::{error, info, warn};

use backup_estimator::cli::{Cli, Command};
use backup_estimator::config::ScenarioConfig;
use backup_estimator::error::{EstimatorError, Result};
use backup_estimator::estimate::curve::reference_table;
use backup_estimator::io::export::export_csv;
use backup_estimator::logging;
use backup_estimator::session::Session;
use backup_estimator::system::{Dashboard, Instant};

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = cli.load_scenario()?;

    for warning in cfg.warnings() {
        warn!("{warning}");
    }
    let errors = cfg.validate();
    if !errors.is_empty() {
        return Err(EstimatorError::Invalid(errors));
    }

    info!(
        site = %cfg.system.name,
        system_voltage = cfg.system.system_voltage(),
        battery = %cfg.system.battery_type,
        "scenario loaded"
    );

    match cli.command.unwrap_or_default() {
        Command::Status { at } => print_status(&cfg, at),
        Command::Session { csv_out, seed } => {
            let mut cfg = cfg;
            if let Some(seed) = seed {
                cfg.session.seed = seed;
            }
            let steps = Session::from_scenario(&cfg).run();
            for s in &steps {
                println!(
                    "{}  load {:>6.0}W  {:<28} battery {:>5.1}%  backup {:<10} eta {:<14} out {}V",
                    s.time_of_day.format("%H:%M"),
                    s.load_w,
                    s.mode.label(),
                    s.battery_pct,
                    s.backup_time.to_string(),
                    s.charge_eta.to_string(),
                    s.output_voltage,
                );
            }
            if let Some(path) = csv_out {
                export_csv(&steps, &path)?;
                info!(path = %path.display(), rows = steps.len(), "session exported");
            }
        }
        Command::Reference => {
            let selection = reference_table(cfg.system.system_voltage());
            println!("{}V reference curve", selection.nominal.volts());
            for row in selection.rows {
                println!("{row}");
            }
        }
    }
    Ok(())
}

fn print_status(cfg: &ScenarioConfig, at: Option<NaiveTime>) {
    let now = Local::now();
    let instant = Instant::new(at.unwrap_or_else(|| now.time()), now.timestamp_millis());

    let mut dashboard = Dashboard::new(cfg.system.clone(), cfg.reading.clone());
    let report = dashboard.settle(instant);
    info!(
        time = %instant.time_of_day.format("%H:%M"),
        solar_toggled = report.solar_toggled,
        charging_cut = report.charging_cut,
        "dashboard settled"
    );
    println!("{}", dashboard.snapshot());
}
