use chrono::{NaiveTime, TimeDelta};

use crate::system::dashboard::Instant;

const MS_PER_MINUTE: i64 = 60_000;

/// A session clock that hands out one [`Instant`] per step.
///
/// Time of day wraps past midnight; the millisecond timestamp keeps
/// counting from `epoch_ms`.
///
/// # Examples
///
/// ```
/// use backup_estimator::session::clock::SessionClock;
/// use chrono::NaiveTime;
///
/// let start = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
/// let mut clock = SessionClock::new(start, 30, 3, 0);
/// let mut times = Vec::new();
///
/// clock.run(|_, now| times.push(now.time_of_day.format("%H:%M").to_string()));
/// assert_eq!(times, vec!["23:00", "23:30", "00:00"]);
/// ```
#[derive(Debug, Clone)]
pub struct SessionClock {
    current: usize,
    total: usize,
    start: NaiveTime,
    step_minutes: u32,
    epoch_ms: i64,
}

impl SessionClock {
    /// Creates a clock of `total` steps, `step_minutes` apart, starting at
    /// `start` and timestamp `epoch_ms`.
    pub fn new(start: NaiveTime, step_minutes: u32, total: usize, epoch_ms: i64) -> Self {
        Self {
            current: 0,
            total,
            start,
            step_minutes,
            epoch_ms,
        }
    }

    /// Instant of step `step`, whether or not the clock has reached it.
    pub fn instant_at(&self, step: usize) -> Instant {
        let elapsed_min = i64::try_from(step)
            .unwrap_or(i64::MAX)
            .saturating_mul(i64::from(self.step_minutes));
        let offset = TimeDelta::try_minutes(elapsed_min % (24 * 60)).unwrap_or_default();
        let (time_of_day, _) = self.start.overflowing_add_signed(offset);
        Instant::new(
            time_of_day,
            self.epoch_ms
                .saturating_add(elapsed_min.saturating_mul(MS_PER_MINUTE)),
        )
    }

    /// Advances by one step.
    ///
    /// Returns the step index and its instant, or `None` once all steps ran.
    pub fn tick(&mut self) -> Option<(usize, Instant)> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some((step, self.instant_at(step)))
        } else {
            None
        }
    }

    /// Runs `f` for each remaining step.
    pub fn run(&mut self, mut f: impl FnMut(usize, Instant)) {
        while let Some((step, now)) = self.tick() {
            f(step, now);
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
