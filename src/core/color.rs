//! Color types shared by the schedule, the interpolator and the devices.
//!
//! Checkpoints and devices speak integer RGB ([`Rgb`]). While a transition is being
//! computed each channel is an independent real value ([`BlendedColor`]), and only
//! the final conversion back to [`Rgb`] rounds and clamps.

use serde::Deserialize;
use std::fmt;

use super::interpolate::interpolate;

/// An RGB triple as stored in schedules and sent to devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// True when every channel is zero.
    pub fn is_off(&self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x} ({}, {}, {})",
            self.red, self.green, self.blue, self.red, self.green, self.blue
        )
    }
}

/// A color with real-valued channels, produced by interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendedColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl BlendedColor {
    /// Interpolate each channel independently between `from` and `to`.
    pub fn between(from: Rgb, to: Rgb, duration: f64, progress: f64) -> Self {
        Self {
            red: interpolate(f64::from(from.red), f64::from(to.red), duration, progress),
            green: interpolate(
                f64::from(from.green),
                f64::from(to.green),
                duration,
                progress,
            ),
            blue: interpolate(f64::from(from.blue), f64::from(to.blue), duration, progress),
        }
    }

    /// Convert to device values: round to nearest, clamp to 0-255.
    ///
    /// Clamping only matters when progress ran past the transition end and the
    /// interpolation extrapolated outside the channel range.
    pub fn to_rgb(&self) -> Rgb {
        Rgb::new(
            to_channel(self.red),
            to_channel(self.green),
            to_channel(self.blue),
        )
    }
}

fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for BlendedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.red, self.green, self.blue)
    }
}
