//! BlinkStick backend over raw USB control transfers.
//!
//! BlinkSticks present as HID devices but accept colors through a class-specific
//! SET_REPORT control transfer on endpoint 0, so no interface has to be claimed.
//! The first pixel of channel 0 has a short dedicated report; every other pixel is
//! addressed through the indexed report.

use anyhow::{Context, Result};
use rusb::{DeviceHandle, GlobalContext};
use std::time::Duration;

use super::{LightSink, PixelAddress};
use crate::common::constants::{BLINKSTICK_PRODUCT_ID, BLINKSTICK_VENDOR_ID, USB_TIMEOUT_MS};
use crate::core::color::Rgb;

// Host-to-device, class request, recipient device
const REQUEST_TYPE_OUT: u8 = 0x20;
// HID SET_REPORT
const REQUEST_SET_REPORT: u8 = 0x09;

const REPORT_SINGLE: u16 = 0x0001;
const REPORT_INDEXED: u16 = 0x0005;

/// One attached BlinkStick.
pub struct BlinkStick {
    handle: DeviceHandle<GlobalContext>,
    serial: String,
}

impl BlinkStick {
    /// Open every BlinkStick on the bus.
    ///
    /// Devices that are visible but cannot be opened (usually a permissions problem)
    /// are reported and skipped.
    pub fn find_all() -> Result<Vec<Self>> {
        let devices = rusb::devices().context("Failed to enumerate USB devices")?;
        let mut sticks = Vec::new();

        for device in devices.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(descriptor) => descriptor,
                Err(_) => continue,
            };

            if descriptor.vendor_id() != BLINKSTICK_VENDOR_ID
                || descriptor.product_id() != BLINKSTICK_PRODUCT_ID
            {
                continue;
            }

            let mut handle = match device.open() {
                Ok(handle) => handle,
                Err(e) => {
                    log_warning!(
                        "Found a BlinkStick on bus {} address {} but could not open it: {}",
                        device.bus_number(),
                        device.address(),
                        e
                    );
                    log_indented!("Check the udev rules for vendor 20a0 product 41e5");
                    continue;
                }
            };

            // Control transfers work without detaching, but some hosts bind usbhid
            // and then reject SET_REPORT
            if handle.kernel_driver_active(0).unwrap_or(false)
                && let Err(e) = handle.detach_kernel_driver(0)
            {
                log_debug!("Could not detach kernel driver: {}", e);
            }

            let serial = handle
                .read_serial_number_string_ascii(&descriptor)
                .unwrap_or_else(|_| format!("bus{}-addr{}", device.bus_number(), device.address()));

            sticks.push(Self { handle, serial });
        }

        Ok(sticks)
    }
}

/// Build the SET_REPORT value and payload for one pixel.
fn control_packet(pixel: PixelAddress, color: Rgb) -> (u16, Vec<u8>) {
    if pixel.channel == 0 && pixel.index == 0 {
        (REPORT_SINGLE, vec![0, color.red, color.green, color.blue])
    } else {
        (
            REPORT_INDEXED,
            vec![
                5,
                pixel.channel,
                pixel.index,
                color.red,
                color.green,
                color.blue,
            ],
        )
    }
}

impl LightSink for BlinkStick {
    fn name(&self) -> String {
        format!("BlinkStick {}", self.serial)
    }

    fn set_color(&mut self, pixel: PixelAddress, color: Rgb) -> Result<()> {
        let (report, payload) = control_packet(pixel, color);

        self.handle
            .write_control(
                REQUEST_TYPE_OUT,
                REQUEST_SET_REPORT,
                report,
                0,
                &payload,
                Duration::from_millis(USB_TIMEOUT_MS),
            )
            .with_context(|| format!("USB write to {} failed", self.name()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pixel_uses_single_report() {
        let (report, payload) = control_packet(PixelAddress::new(0, 0), Rgb::new(255, 30, 0));
        assert_eq!(report, REPORT_SINGLE);
        assert_eq!(payload, vec![0, 255, 30, 0]);
    }

    #[test]
    fn test_other_pixels_use_indexed_report() {
        let (report, payload) = control_packet(PixelAddress::new(1, 7), Rgb::new(1, 2, 3));
        assert_eq!(report, REPORT_INDEXED);
        assert_eq!(payload, vec![5, 1, 7, 1, 2, 3]);

        let (report, _) = control_packet(PixelAddress::new(0, 1), Rgb::new(1, 2, 3));
        assert_eq!(report, REPORT_INDEXED);
    }
}
