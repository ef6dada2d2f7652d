//! Configuration system for nightfall.
//!
//! Everything nightfall does can run without a configuration file: the built-in
//! weekday and weekend schedules, pixel address and festive timing are used for any
//! field that is left out. A file only needs to list what it changes.
//!
//! ## Configuration Source
//!
//! `nightfall.toml` is read from the directory given with `--config`, or from
//! **XDG_CONFIG_HOME**/nightfall/nightfall.toml. A missing file is not an error.
//!
//! ## Configuration Structure
//!
//! ```toml
//! #[Schedules]
//! weekend_days = ["fri", "sat"]   # Nights that use the weekend table
//!
//! #[Device]
//! channel = 0                     # BlinkStick channel
//! index = 0                       # Pixel index on the channel
//!
//! #[Festive]
//! fade_duration_ms = 3000         # Length of one fade (0-60000)
//! tick_ms = 50                    # Fade step (10-1000)
//! hold_ms = 2000                  # Time each target stays lit (0-600000)
//! palette = [[255, 0, 0], [0, 255, 0]]
//!
//! # Checkpoint tables go last; [[weekend]] works the same way
//! [[weekday]]
//! time = "20:00:00"               # HH:MM:SS, strictly increasing
//! color = [0, 0, 0]               # RGB, 0-255 per channel
//!
//! [[weekday]]
//! time = "21:00:00"
//! color = [250, 200, 0]
//! ```
//!
//! ## Validation
//!
//! Schedules must be non-empty with parseable, strictly increasing times. Timing
//! values are range checked and the festive palette needs at least two distinct
//! colors. Any violation is a fatal configuration error.

pub mod loading;
pub mod validation;


use anyhow::{Context, Result};
use chrono::Weekday;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::backend::PixelAddress;
use crate::common::constants::*;
use crate::core::color::Rgb;
use crate::core::festive::FestiveSettings;
use crate::core::schedule::{Checkpoint, Schedule};

// Re-export public API
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// One `[[weekday]]` or `[[weekend]]` table entry.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CheckpointConfig {
    pub time: String,
    pub color: Rgb,
}

impl CheckpointConfig {
    pub fn new(time: &str, color: Rgb) -> Self {
        Self {
            time: time.to_string(),
            color,
        }
    }
}

/// Configuration structure for nightfall settings.
///
/// Every field is optional. [`loading::load_from_path`] validates what was given
/// and fills the rest with defaults, so a loaded config has every field set.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Checkpoints used on ordinary nights.
    pub weekday: Option<Vec<CheckpointConfig>>,
    /// Checkpoints used on the nights listed in `weekend_days`.
    pub weekend: Option<Vec<CheckpointConfig>>,
    /// Weekday names ("fri", "saturday", ...) that select the weekend table.
    pub weekend_days: Option<Vec<String>>,
    pub channel: Option<u8>,
    pub index: Option<u8>,
    pub fade_duration_ms: Option<u64>,
    pub tick_ms: Option<u64>,
    pub hold_ms: Option<u64>,
    pub palette: Option<Vec<Rgb>>,
}

/// Convert a built-in table into config entries.
pub(crate) fn table_entries(table: &[(&str, Rgb)]) -> Vec<CheckpointConfig> {
    table
        .iter()
        .map(|(time, color)| CheckpointConfig::new(time, *color))
        .collect()
}

/// Build a validated schedule from config entries.
pub(crate) fn build_schedule(entries: &[CheckpointConfig], table: &str) -> Result<Schedule> {
    let checkpoints = entries
        .iter()
        .map(|entry| Checkpoint::parse(&entry.time, entry.color))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Invalid [[{table}]] entry"))?;

    Schedule::new(checkpoints).with_context(|| format!("Invalid [[{table}]] schedule"))
}

/// Parse a weekday name such as "fri" or "Friday".
pub fn parse_weekday(name: &str) -> Result<Weekday> {
    name.trim().parse::<Weekday>().map_err(|_| {
        anyhow::anyhow!("Unknown weekday '{name}'. Use a name like 'mon' or 'friday'")
    })
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &Path) -> Result<Self> {
        load_from_path(path)
    }

    /// Built-in configuration with every field set.
    pub fn defaults() -> Self {
        let mut config = Self::default();
        loading::apply_defaults(&mut config);
        config
    }

    pub fn weekday_schedule(&self) -> Result<Schedule> {
        match &self.weekday {
            Some(entries) => build_schedule(entries, "weekday"),
            None => Schedule::from_table(DEFAULT_WEEKDAY_SCHEDULE),
        }
    }

    pub fn weekend_schedule(&self) -> Result<Schedule> {
        match &self.weekend {
            Some(entries) => build_schedule(entries, "weekend"),
            None => Schedule::from_table(DEFAULT_WEEKEND_SCHEDULE),
        }
    }

    /// Weekdays whose evening uses the weekend schedule.
    pub fn weekend_days(&self) -> Result<Vec<Weekday>> {
        match &self.weekend_days {
            Some(names) => names.iter().map(|name| parse_weekday(name)).collect(),
            None => DEFAULT_WEEKEND_DAYS
                .iter()
                .map(|name| parse_weekday(name))
                .collect(),
        }
    }

    pub fn is_weekend(&self, day: Weekday) -> Result<bool> {
        Ok(self.weekend_days()?.contains(&day))
    }

    /// Schedule that applies on `day`.
    pub fn schedule_for(&self, day: Weekday) -> Result<Schedule> {
        if self.is_weekend(day)? {
            self.weekend_schedule()
        } else {
            self.weekday_schedule()
        }
    }

    pub fn pixel(&self) -> PixelAddress {
        PixelAddress::new(
            self.channel.unwrap_or(DEFAULT_CHANNEL),
            self.index.unwrap_or(DEFAULT_INDEX),
        )
    }

    pub fn palette(&self) -> Vec<Rgb> {
        self.palette
            .clone()
            .unwrap_or_else(|| DEFAULT_FESTIVE_PALETTE.to_vec())
    }

    pub fn festive_settings(&self) -> FestiveSettings {
        FestiveSettings {
            palette: self.palette(),
            fade: Duration::from_millis(
                self.fade_duration_ms.unwrap_or(DEFAULT_FADE_DURATION_MS),
            ),
            tick: Duration::from_millis(self.tick_ms.unwrap_or(DEFAULT_TICK_MS)),
            hold: Duration::from_millis(self.hold_ms.unwrap_or(DEFAULT_HOLD_MS)),
            pixel: self.pixel(),
        }
    }

    /// Print the effective settings.
    pub fn log_config(&self, source: &str) {
        log_block_start!("Loaded {}", source);

        let pixel = self.pixel();
        log_indented!("Pixel: channel {}, index {}", pixel.channel, pixel.index);

        match self.weekend_days() {
            Ok(days) => {
                let names: Vec<String> = days.iter().map(|day| day.to_string()).collect();
                log_indented!("Weekend nights: {}", names.join(", "));
            }
            Err(e) => log_indented!("Weekend nights: {}", e),
        }

        for (label, schedule) in [
            ("Weekday", self.weekday_schedule()),
            ("Weekend", self.weekend_schedule()),
        ] {
            match schedule {
                Ok(schedule) => {
                    log_indented!(
                        "{} schedule: {} checkpoints, {} to {}",
                        label,
                        schedule.len(),
                        schedule.first().time.format(TIME_FORMAT),
                        schedule.last().time.format(TIME_FORMAT)
                    );
                    for checkpoint in schedule.checkpoints() {
                        log_indented!(
                            "  {} {}",
                            checkpoint.time.format(TIME_FORMAT),
                            checkpoint.color
                        );
                    }
                }
                Err(e) => log_indented!("{} schedule: {}", label, e),
            }
        }

        let festive = self.festive_settings();
        log_indented!(
            "Festive: {}ms fades in {}ms ticks, {}ms holds, {} colors",
            festive.fade.as_millis(),
            festive.tick.as_millis(),
            festive.hold.as_millis(),
            festive.palette.len()
        );
    }
}
