//! Application coordinator for one nightfall invocation.
//!
//! Sets up logging, loads the configuration, discovers devices and then hands off
//! to [`Core`]. The `Nightfall` struct uses a builder so `main` only has to forward
//! the parsed command line:
//! - Show the current color: `Nightfall::new(false).run()`
//! - Render another time on another day: `Nightfall::new(true).at_time(t).on_day(d).run()`
//! - Festive animation: `Nightfall::new(false).festive(true).run()`

use anyhow::{Context, Result};
use chrono::{NaiveTime, Weekday};

use crate::{
    backend::{self, LightSink},
    common::{logger::Log, utils::private_path},
    config,
    core::{Core, CoreParams},
    io::signals::setup_signal_handler,
    time::source::{FixedTimeSource, RealTimeSource, TimeSource},
};

/// Builder for configuring and running nightfall.
///
/// # Examples
///
/// ```no_run
/// use chrono::{NaiveTime, Weekday};
/// use nightfall::Nightfall;
///
/// # fn main() -> anyhow::Result<()> {
/// // What the light should show on a Friday at 22:15
/// Nightfall::new(true)
///     .at_time(NaiveTime::from_hms_opt(22, 15, 0))
///     .on_day(Some(Weekday::Fri))
///     .run()?;
/// # Ok(())
/// # }
/// ```
pub struct Nightfall {
    verbose: bool,
    quiet: bool,
    time: Option<NaiveTime>,
    weekday: Option<Weekday>,
    festive: bool,
    config_dir: Option<String>,
}

impl Nightfall {
    /// Create a new runner with defaults matching a plain invocation
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
            time: None,
            weekday: None,
            festive: false,
            config_dir: None,
        }
    }

    /// Suppress all output
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Resolve this time of day instead of the local clock
    pub fn at_time(mut self, time: Option<NaiveTime>) -> Self {
        self.time = time;
        self
    }

    /// Use this weekday's schedule instead of today's
    pub fn on_day(mut self, weekday: Option<Weekday>) -> Self {
        self.weekday = weekday;
        self
    }

    /// Run the festive animation instead of showing the schedule
    pub fn festive(mut self, festive: bool) -> Self {
        self.festive = festive;
        self
    }

    /// Read `nightfall.toml` from this directory
    pub fn with_config_dir(mut self, config_dir: Option<String>) -> Self {
        self.config_dir = config_dir;
        self
    }

    /// Execute the application
    pub fn run(self) -> Result<()> {
        Log::set_enabled(!self.quiet);
        Log::set_verbose(self.verbose);
        if let Some(time) = self.time {
            Log::set_fixed_time(time);
        }

        log_version!();
        if self.verbose {
            log_pipe!();
            log_debug!("Verbose mode enabled - showing interpolation and device details");
        }

        config::set_config_dir(self.config_dir.clone())?;
        let config = config::load().context("Failed to load configuration")?;

        if Log::is_verbose() {
            let source = match config::get_config_path() {
                Ok(path) if path.exists() => private_path(&path),
                _ => "built-in defaults".to_string(),
            };
            config.log_config(&source);
        }

        let time_source: Box<dyn TimeSource> = match self.time {
            Some(time) => Box::new(FixedTimeSource::new(time)),
            None => Box::new(RealTimeSource),
        };
        if time_source.is_simulated() {
            log_debug!("Ignoring the clock, rendering {}", time_source.now().time());
        }

        let sinks = discover_devices();

        let mut core = Core::new(CoreParams {
            sinks,
            config,
            time_source,
            weekday_override: self.weekday,
        });

        if self.festive {
            let token = setup_signal_handler()?;
            core.run_festive(&token)?;
        } else {
            core.apply_schedule()?;
        }

        log_end!();
        Ok(())
    }
}

/// Find attached BlinkSticks. A USB subsystem failure is reported and treated as
/// no devices.
fn discover_devices() -> Vec<Box<dyn LightSink>> {
    match backend::discover() {
        Ok(sinks) => {
            log_block_start!("Found {} BlinkStick(s)", sinks.len());
            for sink in &sinks {
                log_indented!("{}", sink.name());
            }
            sinks
        }
        Err(e) => {
            log_pipe!();
            log_warning!("Device discovery failed: {:#}", e);
            Vec::new()
        }
    }
}
