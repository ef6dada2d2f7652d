//! Device abstraction layer for indicator lights.
//!
//! The core never talks to USB directly. It pushes colors into [`LightSink`]s, and
//! [`discover`] produces one sink per attached device. The only hardware
//! implementation is the BlinkStick backend; tests substitute mocks or the
//! recording sink from [`testing`].
//!
//! Sink calls can fail transiently (USB devices get unplugged, transfers time out).
//! Callers report and skip such failures rather than retrying.

use anyhow::Result;

use crate::core::color::Rgb;

pub mod blinkstick;
#[cfg(any(test, feature = "testing-support"))]
pub mod testing;

/// Address of a single pixel on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelAddress {
    pub channel: u8,
    pub index: u8,
}

impl PixelAddress {
    pub const fn new(channel: u8, index: u8) -> Self {
        Self { channel, index }
    }
}

/// Trait for devices that can display a color.
#[cfg_attr(test, mockall::automock)]
pub trait LightSink {
    /// Human-readable device name used in log output.
    fn name(&self) -> String;

    /// Set one pixel to `color`.
    ///
    /// # Returns
    /// - `Ok(())` if the device accepted the color
    /// - `Err` on I/O failure; the device may still work on the next call
    fn set_color(&mut self, pixel: PixelAddress, color: Rgb) -> Result<()>;
}

/// Find every attached device.
///
/// Returns an empty list when nothing is plugged in. Errors only when the USB
/// subsystem itself cannot be queried.
pub fn discover() -> Result<Vec<Box<dyn LightSink>>> {
    let sticks = blinkstick::BlinkStick::find_all()?;
    Ok(sticks
        .into_iter()
        .map(|stick| Box::new(stick) as Box<dyn LightSink>)
        .collect())
}

/// Push `color` to every sink, reporting failures without stopping.
///
/// Returns the number of sinks that accepted the color.
pub fn broadcast(sinks: &mut [Box<dyn LightSink>], pixel: PixelAddress, color: Rgb) -> usize {
    let mut delivered = 0;
    for sink in sinks.iter_mut() {
        match sink.set_color(pixel, color) {
            Ok(()) => delivered += 1,
            Err(e) => {
                log_debug!("Failed to set color on {}: {:#}", sink.name(), e);
            }
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    const PIXEL: PixelAddress = PixelAddress::new(0, 0);

    #[test]
    fn test_broadcast_reaches_every_sink() {
        let color = Rgb::new(250, 200, 0);
        let mut sinks: Vec<Box<dyn LightSink>> = (0..3)
            .map(|_| {
                let mut sink = MockLightSink::new();
                sink.expect_set_color()
                    .with(eq(PIXEL), eq(color))
                    .times(1)
                    .returning(|_, _| Ok(()));
                Box::new(sink) as Box<dyn LightSink>
            })
            .collect();

        assert_eq!(broadcast(&mut sinks, PIXEL, color), 3);
    }

    #[test]
    fn test_broadcast_skips_failing_sink() {
        let color = Rgb::new(255, 0, 0);

        let mut failing = MockLightSink::new();
        failing
            .expect_set_color()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("pipe error")));
        failing
            .expect_name()
            .returning(|| "BlinkStick BS000001".to_string());

        let mut healthy = MockLightSink::new();
        healthy
            .expect_set_color()
            .with(eq(PIXEL), eq(color))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut sinks: Vec<Box<dyn LightSink>> = vec![Box::new(failing), Box::new(healthy)];
        assert_eq!(broadcast(&mut sinks, PIXEL, color), 1);
    }

    #[test]
    fn test_broadcast_with_no_devices() {
        let mut sinks: Vec<Box<dyn LightSink>> = Vec::new();
        assert_eq!(broadcast(&mut sinks, PIXEL, Rgb::new(1, 1, 1)), 0);
    }
}
