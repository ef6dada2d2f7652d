//! Application-wide constants and built-in defaults.

use crate::core::color::Rgb;

// # Exit codes
pub const EXIT_FAILURE: i32 = 1;

// # Configuration file
pub const CONFIG_DIR_NAME: &str = "nightfall";
pub const CONFIG_FILE_NAME: &str = "nightfall.toml";

/// Format used for checkpoint times and the `--time` flag.
pub const TIME_FORMAT: &str = "%H:%M:%S";

// # BlinkStick USB identifiers
pub const BLINKSTICK_VENDOR_ID: u16 = 0x20a0;
pub const BLINKSTICK_PRODUCT_ID: u16 = 0x41e5;
pub const USB_TIMEOUT_MS: u64 = 1000;

// # Pixel addressing
pub const DEFAULT_CHANNEL: u8 = 0;
pub const DEFAULT_INDEX: u8 = 0;

// # Festive animation timing
pub const DEFAULT_TICK_MS: u64 = 50;
pub const DEFAULT_FADE_DURATION_MS: u64 = 3000;
pub const DEFAULT_HOLD_MS: u64 = 2000;

pub const MINIMUM_TICK_MS: u64 = 10;
pub const MAXIMUM_TICK_MS: u64 = 1000;
pub const MAXIMUM_FADE_DURATION_MS: u64 = 60_000;
pub const MAXIMUM_HOLD_MS: u64 = 600_000;

/// Granularity used when sleeping so cancellation is noticed promptly.
pub const CANCELLATION_POLL_MS: u64 = 10;

// # Named colors
pub const OFF: Rgb = Rgb::new(0, 0, 0);
pub const SKY: Rgb = Rgb::new(102, 255, 255);
pub const YELLOW: Rgb = Rgb::new(250, 200, 0);
pub const BURNT_ORANGE: Rgb = Rgb::new(255, 30, 0);
pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const DARK_RED: Rgb = Rgb::new(135, 0, 0);

/// Weekday evenings: sky at 20:30, stop starting things at 21:00, bed at 22:30.
pub const DEFAULT_WEEKDAY_SCHEDULE: &[(&str, Rgb)] = &[
    ("20:00:00", OFF),
    ("20:30:00", SKY),
    ("21:00:00", YELLOW),
    ("22:00:00", BURNT_ORANGE),
    ("22:30:00", RED),
    ("23:30:00", DARK_RED),
    ("23:59:59", OFF),
];

/// Nights before a day off run an hour later.
pub const DEFAULT_WEEKEND_SCHEDULE: &[(&str, Rgb)] = &[
    ("21:00:00", OFF),
    ("21:30:00", SKY),
    ("22:00:00", YELLOW),
    ("23:00:00", BURNT_ORANGE),
    ("23:30:00", RED),
    ("23:59:59", OFF),
];

pub const DEFAULT_WEEKEND_DAYS: &[&str] = &["fri", "sat"];

pub const DEFAULT_FESTIVE_PALETTE: &[Rgb] = &[
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(255, 180, 0),
    Rgb::new(255, 255, 255),
    Rgb::new(0, 80, 255),
];

#[cfg(test)]
pub mod test_constants {
    pub const TEST_BLACK: (u8, u8, u8) = (0, 0, 0);
    pub const TEST_SKY_BLUE: (u8, u8, u8) = (102, 255, 255);
    pub const TEST_DARK_PURPLE: (u8, u8, u8) = (48, 25, 52);
}
