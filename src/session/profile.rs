use chrono::{NaiveTime, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::SessionConfig;

/// Generates a sample from a normal distribution N(0, `std_dev`^2) using
/// the Box-Muller transform.
///
/// Returns 0.0 when `std_dev` is non-positive.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Household demand: a flat base load with an evening peak window, plus
/// gaussian noise.
///
/// # Examples
///
/// ```
/// use backup_estimator::session::profile::LoadProfile;
/// use chrono::NaiveTime;
///
/// let mut profile = LoadProfile::new(200.0, 800.0, (18, 22), 0.0, 7);
/// let evening = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
/// assert_eq!(profile.demand_w(evening), 800.0);
/// ```
#[derive(Debug, Clone)]
pub struct LoadProfile {
    pub base_w: f64,
    pub peak_w: f64,
    /// Peak window `[start, end)` in whole hours.
    pub peak_hours: (u32, u32),
    pub noise_std_w: f64,
    rng: StdRng,
}

impl LoadProfile {
    pub fn new(base_w: f64, peak_w: f64, peak_hours: (u32, u32), noise_std_w: f64, seed: u64) -> Self {
        Self {
            base_w,
            peak_w,
            peak_hours,
            noise_std_w,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_config(session: &SessionConfig) -> Self {
        Self::new(
            session.base_load_w,
            session.peak_load_w,
            (session.peak_start_hour, session.peak_end_hour),
            session.load_noise_std_w,
            session.seed,
        )
    }

    pub fn in_peak(&self, time_of_day: NaiveTime) -> bool {
        let hour = time_of_day.hour();
        hour >= self.peak_hours.0 && hour < self.peak_hours.1
    }

    /// Demand at `time_of_day` (W), never negative.
    ///
    /// Draws one noise sample per call, so the sequence is reproducible for
    /// a given seed and call order.
    pub fn demand_w(&mut self, time_of_day: NaiveTime) -> f64 {
        let level = if self.in_peak(time_of_day) {
            self.peak_w
        } else {
            self.base_w
        };
        let noise = gaussian_noise(&mut self.rng, self.noise_std_w);
        (level + noise).max(0.0)
    }
}
