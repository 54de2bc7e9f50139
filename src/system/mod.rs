//! Dashboard state: configuration, live reading, reactive rules and
//! persistence.

pub mod dashboard;
pub mod rules;
pub mod settings;
pub mod types;

pub use dashboard::{Dashboard, DashboardSnapshot, Instant};
pub use rules::Action;
pub use types::{BatteryType, SystemConfiguration, SystemReading};
