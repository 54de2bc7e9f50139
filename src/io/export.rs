//! CSV export for session step records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::session::SessionStep;

/// Column header for session CSV export.
const HEADER: &str = "step,time,timestamp_ms,load_w,load_pct,mode,grid,solar,charging,\
                       battery_pct,battery_status,backup_time,charge_eta,charge_status,\
                       solar_power_w,output_v,advisory";

/// Exports session records to a CSV file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_csv(steps: &[SessionStep], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(steps, io::BufWriter::new(file))
}

/// Writes session records as CSV to any writer.
///
/// Duration columns carry the dashboard text (`"2.5 hrs"`, `"∞"`), not hours,
/// so sentinel values survive the export.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(steps: &[SessionStep], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for s in steps {
        wtr.write_record(&[
            s.step.to_string(),
            s.time_of_day.format("%H:%M").to_string(),
            s.timestamp_ms.to_string(),
            format!("{:.1}", s.load_w),
            format!("{:.1}", s.load_pct),
            s.mode.label().to_string(),
            s.grid_available.to_string(),
            s.solar_available.to_string(),
            s.charging.to_string(),
            format!("{:.1}", s.battery_pct),
            s.battery_status.label().to_string(),
            s.backup_time.to_string(),
            s.charge_eta.to_string(),
            s.charge_status.label().to_string(),
            format!("{:.0}", s.solar_power_w),
            s.output_voltage.to_string(),
            s.advisory.message().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
