//! Time source abstraction for supporting real, explicit, and simulated time.
//!
//! The schedule is resolved against whatever instant the time source reports, and
//! the festive animation suspends through it. Swapping the source lets a caller
//! render an arbitrary time of day (`--time`) or run the animation in tests without
//! waiting for real time to pass.

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use crate::common::constants::{CANCELLATION_POLL_MS, TIME_FORMAT};
use crate::io::signals::CancellationToken;

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current local date and time
    fn now(&self) -> NaiveDateTime;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if the reported time differs from the wall clock
    fn is_simulated(&self) -> bool;

    /// Sleep for `duration` unless `token` is cancelled first.
    ///
    /// Sleeps in short slices so a cancellation arriving mid-sleep is noticed
    /// promptly. Returns `false` if the sleep was cut short by cancellation.
    fn sleep_cancellable(&self, duration: StdDuration, token: &CancellationToken) -> bool {
        let slice = StdDuration::from_millis(CANCELLATION_POLL_MS);
        let mut remaining = duration;

        while !remaining.is_zero() {
            if token.is_cancelled() {
                return false;
            }
            let step = remaining.min(slice);
            self.sleep(step);
            remaining -= step;
        }

        !token.is_cancelled()
    }
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Reports a fixed time of day on today's date. Sleeping still takes real time.
pub struct FixedTimeSource {
    time: NaiveTime,
}

impl FixedTimeSource {
    pub fn new(time: NaiveTime) -> Self {
        Self { time }
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> NaiveDateTime {
        Local::now().date_naive().and_time(self.time)
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Simulated time source that advances instantly when asked to sleep.
///
/// Every sleep is recorded, so callers can verify how long a driver would have
/// suspended without actually waiting.
pub struct SimulatedTimeSource {
    current: Mutex<NaiveDateTime>,
    sleeps: Mutex<Vec<StdDuration>>,
}

impl SimulatedTimeSource {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            current: Mutex::new(start),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// All sleep durations requested so far, in order.
    pub fn sleeps(&self) -> Vec<StdDuration> {
        self.sleeps
            .lock()
            .map(|sleeps| sleeps.clone())
            .unwrap_or_default()
    }

    /// Total simulated time slept.
    pub fn total_slept(&self) -> StdDuration {
        self.sleeps().iter().sum()
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> NaiveDateTime {
        match self.current.lock() {
            Ok(current) => *current,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn sleep(&self, duration: StdDuration) {
        if let Ok(mut current) = self.current.lock() {
            *current += ChronoDuration::milliseconds(duration.as_millis() as i64);
        }
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
    }

    fn is_simulated(&self) -> bool {
        true
    }

    // Whole sleeps: simulated time has no one to keep waiting
    fn sleep_cancellable(&self, duration: StdDuration, token: &CancellationToken) -> bool {
        if token.is_cancelled() {
            return false;
        }
        self.sleep(duration);
        !token.is_cancelled()
    }
}

/// Parse a time of day in the format "HH:MM:SS"
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .with_context(|| format!("Invalid time '{s}'. Use HH:MM:SS (e.g. 20:07:00)"))
}
