//! Configuration validation functionality.
//!
//! Rejects configurations the core cannot run: unparseable or unordered schedules,
//! unknown weekday names, out-of-range timing and palettes the festive animation
//! would spin on forever.

use anyhow::Result;
use std::collections::HashSet;

use super::{Config, build_schedule, parse_weekday};
use crate::common::constants::*;

/// Validate every field that was given. Missing fields are always valid.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(entries) = &config.weekday {
        build_schedule(entries, "weekday")?;
    }
    if let Some(entries) = &config.weekend {
        build_schedule(entries, "weekend")?;
    }

    if let Some(days) = &config.weekend_days {
        for day in days {
            parse_weekday(day)?;
        }
    }

    if let Some(tick_ms) = config.tick_ms
        && !(MINIMUM_TICK_MS..=MAXIMUM_TICK_MS).contains(&tick_ms)
    {
        anyhow::bail!(
            "tick_ms ({} ms) must be between {} and {} milliseconds",
            tick_ms,
            MINIMUM_TICK_MS,
            MAXIMUM_TICK_MS
        );
    }

    if let Some(fade_ms) = config.fade_duration_ms
        && fade_ms > MAXIMUM_FADE_DURATION_MS
    {
        anyhow::bail!(
            "fade_duration_ms ({} ms) must be at most {} milliseconds",
            fade_ms,
            MAXIMUM_FADE_DURATION_MS
        );
    }

    if let Some(hold_ms) = config.hold_ms
        && hold_ms > MAXIMUM_HOLD_MS
    {
        anyhow::bail!(
            "hold_ms ({} ms) must be at most {} milliseconds",
            hold_ms,
            MAXIMUM_HOLD_MS
        );
    }

    if let Some(palette) = &config.palette {
        let distinct: HashSet<_> = palette.iter().collect();
        if distinct.len() < 2 {
            anyhow::bail!(
                "palette must contain at least two different colors (got {})",
                distinct.len()
            );
        }
    }

    Ok(())
}
