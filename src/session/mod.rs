//! Stepped replay of a day on the dashboard.
//!
//! A session drives the same actions and settle passes a user would, at
//! injected instants, and records the derived values at each step.

/// Instant generator for session steps.
pub mod clock;
pub mod engine;
/// Household load profile with seeded noise.
pub mod profile;

pub use clock::SessionClock;
pub use engine::{Session, SessionStep};
pub use profile::LoadProfile;
