//! Proactive throttle for outbound writes.

use std::time::Duration;

/// Published request ceiling of the budgeting service, per hour.
pub const HOURLY_REQUEST_CEILING: u32 = 200;

/// Share of the ceiling the pacer allows itself to use, in percent.
const CEILING_UTILIZATION_PERCENT: u64 = 90;

/// Default spacing between writes: 3600s / (200 * 90%) = 20s.
pub fn default_delay() -> Duration {
    let budget = HOURLY_REQUEST_CEILING as u64 * CEILING_UTILIZATION_PERCENT;
    Duration::from_millis(3_600_000 * 100 / budget)
}

/// Sleeper abstracts blocking waits so pacing is observable in tests.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Enforces a minimum delay between consecutive writes. The first call never waits.
#[derive(Debug)]
pub struct RatePacer<S = ThreadSleeper> {
    delay: Duration,
    sleeper: S,
    calls: usize,
}

impl RatePacer<ThreadSleeper> {
    pub fn new(delay: Duration) -> Self {
        Self::with_sleeper(delay, ThreadSleeper)
    }
}

impl<S: Sleeper> RatePacer<S> {
    pub fn with_sleeper(delay: Duration, sleeper: S) -> Self {
        Self {
            delay,
            sleeper,
            calls: 0,
        }
    }

    /// Runs `call`, first waiting out the delay if another call preceded it.
    pub fn pace<T>(&mut self, call: impl FnOnce() -> T) -> T {
        if self.calls > 0 && !self.delay.is_zero() {
            self.sleeper.sleep(self.delay);
        }
        self.calls += 1;
        call()
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }
}
