//! Schedule resolution: find the checkpoints bracketing a query time.

use chrono::NaiveTime;
use std::fmt;

use super::color::BlendedColor;
use super::schedule::{Checkpoint, Schedule};
use crate::common::constants::TIME_FORMAT;

/// The pair of checkpoints bracketing a query time, with timing in seconds.
///
/// A transition with zero `duration` is a hold: `from` and `to` are the same
/// checkpoint and the resolved color is that checkpoint's color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: Checkpoint,
    pub to: Checkpoint,
    /// Seconds between `from` and `to`.
    pub duration: f64,
    /// Seconds between `from` and the query time.
    pub progress: f64,
}

impl Transition {
    fn between(from: Checkpoint, to: Checkpoint, query_time: NaiveTime) -> Self {
        Self {
            from,
            to,
            duration: seconds_between(from.time, to.time),
            progress: seconds_between(from.time, query_time),
        }
    }

    fn hold(checkpoint: Checkpoint) -> Self {
        Self {
            from: checkpoint,
            to: checkpoint,
            duration: 0.0,
            progress: 0.0,
        }
    }

    /// True when the transition is a zero-duration hold on a single checkpoint.
    pub fn is_hold(&self) -> bool {
        self.duration == 0.0
    }

    /// Fraction of the transition completed, 1.0 for holds.
    pub fn fraction(&self) -> f64 {
        if self.is_hold() {
            1.0
        } else {
            self.progress / self.duration
        }
    }

    /// Interpolate every channel between the bracketing colors.
    pub fn color(&self) -> BlendedColor {
        BlendedColor::between(self.from.color, self.to.color, self.duration, self.progress)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hold() {
            write!(
                f,
                "holding {} from {}",
                self.from.color,
                self.from.time.format(TIME_FORMAT)
            )
        } else {
            write!(
                f,
                "{} @ {} -> {} @ {} ({:.0}s of {:.0}s)",
                self.from.color,
                self.from.time.format(TIME_FORMAT),
                self.to.color,
                self.to.time.format(TIME_FORMAT),
                self.progress,
                self.duration
            )
        }
    }
}

/// Resolve the transition active at `query_time`.
///
/// The first checkpoint strictly later than `query_time` becomes `to` and the
/// checkpoint before it becomes `from`. Query times before the first checkpoint hold
/// the first checkpoint, and query times at or after the last checkpoint hold the
/// last one. There is no wraparound to the previous day.
pub fn resolve(schedule: &Schedule, query_time: NaiveTime) -> Transition {
    let mut from = *schedule.first();

    for (position, checkpoint) in schedule.checkpoints().iter().enumerate() {
        if checkpoint.time > query_time {
            if position == 0 {
                return Transition::hold(*checkpoint);
            }
            return Transition::between(from, *checkpoint, query_time);
        }
        from = *checkpoint;
    }

    Transition::hold(from)
}

fn seconds_between(start: NaiveTime, end: NaiveTime) -> f64 {
    let delta = end.signed_duration_since(start);
    delta.num_milliseconds() as f64 / 1000.0
}
