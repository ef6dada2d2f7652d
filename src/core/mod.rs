//! Core application logic.
//!
//! `Core` ties the pieces together for one invocation. In schedule mode it picks the
//! weekday or weekend schedule, resolves the query time against it, interpolates
//! the color and hands it to every device once. In festive mode it runs the
//! animation driver until the cancellation token fires.

pub mod color;
pub mod festive;
pub mod interpolate;
pub mod resolver;
pub mod schedule;

use anyhow::Result;
use chrono::{Datelike, Weekday};

use crate::{
    backend::{LightSink, broadcast},
    common::constants::TIME_FORMAT,
    config::Config,
    core::{
        color::Rgb,
        festive::FestiveAnimation,
        resolver::{Transition, resolve},
    },
    io::signals::CancellationToken,
    time::source::TimeSource,
};

/// Parameters for creating a Core instance.
pub struct CoreParams {
    pub sinks: Vec<Box<dyn LightSink>>,
    pub config: Config,
    pub time_source: Box<dyn TimeSource>,
    /// Forces the weekday used to choose between the weekday and weekend schedule.
    pub weekday_override: Option<Weekday>,
}

/// Runs one invocation against the discovered devices.
pub struct Core {
    sinks: Vec<Box<dyn LightSink>>,
    config: Config,
    time_source: Box<dyn TimeSource>,
    weekday_override: Option<Weekday>,
}

impl Core {
    pub fn new(params: CoreParams) -> Self {
        Self {
            sinks: params.sinks,
            config: params.config,
            time_source: params.time_source,
            weekday_override: params.weekday_override,
        }
    }

    /// The weekday whose schedule applies right now.
    pub fn weekday(&self) -> Weekday {
        self.weekday_override
            .unwrap_or_else(|| self.time_source.now().weekday())
    }

    /// Resolve the transition for the time source's current time.
    pub fn current_transition(&self) -> Result<Transition> {
        let day = self.weekday();
        let schedule = self.config.schedule_for(day)?;
        Ok(resolve(&schedule, self.time_source.now().time()))
    }

    /// Compute the scheduled color and push it to every device.
    ///
    /// Returns the color sent. Devices that fail are reported and skipped.
    pub fn apply_schedule(&mut self) -> Result<Rgb> {
        let day = self.weekday();
        let now = self.time_source.now().time();
        let kind = if self.config.is_weekend(day)? {
            "weekend"
        } else {
            "weekday"
        };

        let transition = self.current_transition()?;
        let blended = transition.color();
        let color = blended.to_rgb();

        log_block_start!(
            "{} at {} ({} schedule)",
            day,
            now.format(TIME_FORMAT),
            kind
        );
        log_indented!("Transition: {}", transition);
        if !transition.is_hold() {
            log_indented!("Progress: {:.1}%", transition.fraction() * 100.0);
        }
        log_debug!("Interpolated {}", blended);
        log_decorated!("Color: {}", color);

        self.send(color);
        Ok(color)
    }

    /// Run the festive animation until `token` is cancelled.
    ///
    /// Every device is turned off before this returns.
    pub fn run_festive(&mut self, token: &CancellationToken) -> Result<usize> {
        let settings = self.config.festive_settings();

        log_block_start!("Festive mode");
        log_indented!(
            "{} colors, {}ms fades, {}ms holds",
            settings.palette.len(),
            settings.fade.as_millis(),
            settings.hold.as_millis()
        );
        log_indented!("Press Ctrl+C to stop");

        let mut animation = FestiveAnimation::new(&settings, rand::rng());
        let fades = animation.run(&mut self.sinks, self.time_source.as_ref(), token)?;

        log_block_start!("Stopped after {} fade(s), lights off", fades);
        Ok(fades)
    }

    fn send(&mut self, color: Rgb) {
        if self.sinks.is_empty() {
            log_warning!("No BlinkStick found, nothing to update");
            return;
        }

        let total = self.sinks.len();
        let delivered = broadcast(&mut self.sinks, self.config.pixel(), color);
        if delivered < total {
            log_warning!("Updated {} of {} device(s)", delivered, total);
        } else {
            log_debug!("Updated {} device(s)", delivered);
        }
    }
}
