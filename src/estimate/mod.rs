//! Pure estimators turning a configuration and a reading into derived state.
//!
//! Nothing in here holds state or fails: out-of-range inputs saturate.

pub mod backup;
pub mod charge_eta;
pub mod curve;
pub mod duration;
pub mod load;
pub mod output_voltage;
pub mod percentage;
pub mod sources;
pub mod status;

pub use backup::backup_time;
pub use charge_eta::{ChargeEtaInputs, charge_eta};
pub use duration::DurationEstimate;
pub use load::{LoadAdvisory, load_percentage};
pub use output_voltage::{OutputVoltageInputs, simulate_output_voltage};
pub use percentage::battery_percentage;
pub use sources::{PowerSourceAvailability, PowerSourceMode, evaluate_sources};
pub use status::{BatteryStatus, BatteryStatusTier, ChargeStatus, classify_battery};
