//! Home battery backup and solar estimator.
//!
//! Turns an inverter/battery setup and a live reading into state of charge,
//! backup time, charge ETA, source mode and a simulated output voltage.

pub mod cli;
pub mod config;
pub mod error;
pub mod estimate;
pub mod io;
pub mod logging;
pub mod session;
pub mod system;
