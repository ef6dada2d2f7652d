//! In-memory sink for exercising the core without hardware.

use anyhow::Result;
use std::sync::{Arc, Mutex};

use super::{LightSink, PixelAddress};
use crate::core::color::Rgb;

/// Records every color it is given.
///
/// The history is shared, so a test can keep a [`RecordingSink::history`] handle
/// after the sink itself has been boxed and handed to the core.
#[derive(Clone, Default)]
pub struct RecordingSink {
    name: String,
    history: Arc<Mutex<Vec<(PixelAddress, Rgb)>>>,
    failing_calls: Vec<usize>,
    calls: usize,
}

impl RecordingSink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Make the given call numbers (zero-based) fail with an I/O-style error.
    pub fn failing_on(mut self, calls: &[usize]) -> Self {
        self.failing_calls = calls.to_vec();
        self
    }

    pub fn history(&self) -> Arc<Mutex<Vec<(PixelAddress, Rgb)>>> {
        Arc::clone(&self.history)
    }

    /// Colors accepted so far, in order.
    pub fn colors(&self) -> Vec<Rgb> {
        self.history
            .lock()
            .map(|history| history.iter().map(|(_, color)| *color).collect())
            .unwrap_or_default()
    }
}

impl LightSink for RecordingSink {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn set_color(&mut self, pixel: PixelAddress, color: Rgb) -> Result<()> {
        let call = self.calls;
        self.calls += 1;

        if self.failing_calls.contains(&call) {
            anyhow::bail!("simulated USB failure on call {call}");
        }

        if let Ok(mut history) = self.history.lock() {
            history.push((pixel, color));
        }
        Ok(())
    }
}
