//! Checkpoint schedules.
//!
//! A [`Schedule`] is an immutable, non-empty list of [`Checkpoint`]s with strictly
//! increasing times. Both invariants are checked on construction so the resolver
//! never sees a schedule it cannot bracket.

use anyhow::{Context, Result};
use chrono::NaiveTime;

use super::color::Rgb;
use crate::common::constants::TIME_FORMAT;

/// A color anchored to a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub time: NaiveTime,
    pub color: Rgb,
}

impl Checkpoint {
    pub fn new(time: NaiveTime, color: Rgb) -> Self {
        Self { time, color }
    }

    /// Build a checkpoint from an `HH:MM:SS` string.
    pub fn parse(time: &str, color: Rgb) -> Result<Self> {
        let time = NaiveTime::parse_from_str(time, TIME_FORMAT)
            .with_context(|| format!("Invalid checkpoint time '{time}'. Use HH:MM:SS"))?;
        Ok(Self::new(time, color))
    }
}

/// Ordered checkpoints spanning one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    checkpoints: Vec<Checkpoint>,
}

impl Schedule {
    /// Create a schedule, rejecting empty lists and times that do not strictly increase.
    pub fn new(checkpoints: Vec<Checkpoint>) -> Result<Self> {
        if checkpoints.is_empty() {
            anyhow::bail!("Schedule must contain at least one checkpoint");
        }

        for pair in checkpoints.windows(2) {
            if pair[1].time <= pair[0].time {
                anyhow::bail!(
                    "Checkpoint times must strictly increase ({} is not after {})",
                    pair[1].time.format(TIME_FORMAT),
                    pair[0].time.format(TIME_FORMAT)
                );
            }
        }

        Ok(Self { checkpoints })
    }

    /// Build a schedule from `(HH:MM:SS, color)` pairs.
    pub fn from_table(table: &[(&str, Rgb)]) -> Result<Self> {
        let checkpoints = table
            .iter()
            .map(|(time, color)| Checkpoint::parse(time, *color))
            .collect::<Result<Vec<_>>>()?;
        Self::new(checkpoints)
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn first(&self) -> &Checkpoint {
        // Non-empty by construction
        &self.checkpoints[0]
    }

    pub fn last(&self) -> &Checkpoint {
        &self.checkpoints[self.checkpoints.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_schedule_rejects_empty() {
        let result = Schedule::new(Vec::new());
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("at least one checkpoint")
        );
    }

    #[test]
    fn test_schedule_rejects_duplicate_times() {
        let result = Schedule::new(vec![
            Checkpoint::new(at(20, 0, 0), Rgb::new(0, 0, 0)),
            Checkpoint::new(at(20, 0, 0), Rgb::new(255, 0, 0)),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_schedule_rejects_decreasing_times() {
        let result = Schedule::new(vec![
            Checkpoint::new(at(22, 0, 0), Rgb::new(0, 0, 0)),
            Checkpoint::new(at(21, 0, 0), Rgb::new(255, 0, 0)),
        ]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("strictly increase"));
    }

    #[test]
    fn test_schedule_single_checkpoint() {
        let schedule = Schedule::new(vec![Checkpoint::new(at(8, 0, 0), Rgb::new(1, 2, 3))]).unwrap();
        assert_eq!(schedule.first(), schedule.last());
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_schedule_from_table() {
        let schedule = Schedule::from_table(&[
            ("17:40:00", Rgb::new(0, 0, 0)),
            ("18:20:00", Rgb::new(102, 255, 255)),
        ])
        .unwrap();
        assert_eq!(schedule.first().time, at(17, 40, 0));
        assert_eq!(schedule.last().color, Rgb::new(102, 255, 255));
    }

    #[test]
    fn test_schedule_from_table_bad_time() {
        let result = Schedule::from_table(&[("25:00:00", Rgb::new(0, 0, 0))]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("25:00:00"));
    }
}
