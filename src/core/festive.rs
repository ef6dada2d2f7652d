//! Festive mode: endless random color fades.
//!
//! The animation alternates between two states. While **fading** it steps from the
//! current color to a randomly chosen palette color in fixed ticks, pushing every
//! intermediate color to the devices. While **holding** it leaves the target color
//! on screen for a fixed time. A new target is always different from the color
//! being shown, so every fade visibly changes something.
//!
//! The loop only ends through cancellation, which is checked whenever the animation
//! suspends. The devices are turned off exactly once on the way out, whichever way
//! the loop ends.

use anyhow::Result;
use rand::Rng;
use std::time::Duration;

use super::color::{BlendedColor, Rgb};
use crate::backend::{LightSink, PixelAddress, broadcast};
use crate::common::constants::OFF;
use crate::io::signals::CancellationToken;
use crate::time::source::TimeSource;

/// Timing and palette for the festive animation.
#[derive(Debug, Clone, PartialEq)]
pub struct FestiveSettings {
    pub palette: Vec<Rgb>,
    pub fade: Duration,
    pub tick: Duration,
    pub hold: Duration,
    pub pixel: PixelAddress,
}

/// Turns every sink off when dropped.
///
/// The animation only touches devices through this guard, so the final off call
/// happens on normal return, on early return and while unwinding.
pub struct LightsOut<'a> {
    sinks: &'a mut [Box<dyn LightSink>],
    pixel: PixelAddress,
}

impl<'a> LightsOut<'a> {
    pub fn new(sinks: &'a mut [Box<dyn LightSink>], pixel: PixelAddress) -> Self {
        Self { sinks, pixel }
    }

    pub fn sinks(&mut self) -> &mut [Box<dyn LightSink>] {
        &mut *self.sinks
    }
}

impl Drop for LightsOut<'_> {
    fn drop(&mut self) {
        log_debug!("Turning {} device(s) off", self.sinks.len());
        broadcast(&mut *self.sinks, self.pixel, OFF);
    }
}

/// Colors shown during one fade, one per tick, both endpoints included.
///
/// There are `ceil(fade / tick) + 1` steps. Step `i` sits at `i * tick` into the
/// fade, capped at the fade length so the last step is exactly `to`.
pub fn fade_steps(from: Rgb, to: Rgb, fade: Duration, tick: Duration) -> Vec<Rgb> {
    let fade_ms = fade.as_millis() as u64;
    let tick_ms = (tick.as_millis() as u64).max(1);

    if fade_ms == 0 {
        return vec![to];
    }

    let ticks = fade_ms.div_ceil(tick_ms) + 1;
    (0..ticks)
        .map(|i| {
            let elapsed = (i * tick_ms).min(fade_ms);
            BlendedColor::between(from, to, fade_ms as f64, elapsed as f64).to_rgb()
        })
        .collect()
}

/// Random color-cycling animation.
pub struct FestiveAnimation<'a, R: Rng> {
    settings: &'a FestiveSettings,
    rng: R,
    current: Rgb,
}

impl<'a, R: Rng> FestiveAnimation<'a, R> {
    /// Start with the lights off.
    pub fn new(settings: &'a FestiveSettings, rng: R) -> Self {
        Self {
            settings,
            rng,
            current: OFF,
        }
    }

    /// Color currently shown (the last completed target).
    pub fn current(&self) -> Rgb {
        self.current
    }

    /// Draw palette colors until one differs from the current color.
    ///
    /// Returns `None` when no palette entry differs, which would otherwise loop
    /// forever.
    pub fn pick_target(&mut self) -> Option<Rgb> {
        let palette = &self.settings.palette;
        if !palette.iter().any(|color| *color != self.current) {
            return None;
        }

        loop {
            let candidate = palette[self.rng.random_range(0..palette.len())];
            if candidate != self.current {
                return Some(candidate);
            }
        }
    }

    /// Run until `token` is cancelled, then turn every sink off.
    ///
    /// Device failures during a tick are reported and the animation carries on.
    /// Returns the number of fades that reached their target.
    pub fn run(
        &mut self,
        sinks: &mut [Box<dyn LightSink>],
        time: &dyn TimeSource,
        token: &CancellationToken,
    ) -> Result<usize> {
        let pixel = self.settings.pixel;
        let mut lights = LightsOut::new(sinks, pixel);
        let mut completed = 0;

        loop {
            let Some(target) = self.pick_target() else {
                anyhow::bail!(
                    "Festive palette has no color other than {}",
                    self.current
                );
            };

            log_debug!("Fading {} -> {}", self.current, target);

            let steps = fade_steps(
                self.current,
                target,
                self.settings.fade,
                self.settings.tick,
            );
            for color in steps {
                broadcast(lights.sinks(), pixel, color);
                if !time.sleep_cancellable(self.settings.tick, token) {
                    return Ok(completed);
                }
            }

            self.current = target;
            completed += 1;

            if !time.sleep_cancellable(self.settings.hold, token) {
                return Ok(completed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockLightSink;
    use crate::backend::testing::RecordingSink;
    use crate::time::source::SimulatedTimeSource;
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PIXEL: PixelAddress = PixelAddress::new(0, 0);

    fn settings(palette: Vec<Rgb>) -> FestiveSettings {
        FestiveSettings {
            palette,
            fade: Duration::from_millis(200),
            tick: Duration::from_millis(50),
            hold: Duration::from_millis(1000),
            pixel: PIXEL,
        }
    }

    /// Simulated clock that cancels the token on the n-th suspension.
    struct CancelAfter {
        inner: SimulatedTimeSource,
        token: CancellationToken,
        remaining: AtomicUsize,
    }

    impl CancelAfter {
        fn new(suspensions: usize, token: &CancellationToken) -> Self {
            let start = NaiveDate::from_ymd_opt(2024, 12, 24)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap();
            Self {
                inner: SimulatedTimeSource::new(start),
                token: token.clone(),
                remaining: AtomicUsize::new(suspensions),
            }
        }
    }

    impl TimeSource for CancelAfter {
        fn now(&self) -> chrono::NaiveDateTime {
            self.inner.now()
        }

        fn sleep(&self, duration: Duration) {
            self.inner.sleep(duration);
        }

        fn is_simulated(&self) -> bool {
            true
        }

        fn sleep_cancellable(&self, duration: Duration, token: &CancellationToken) -> bool {
            if self.remaining.fetch_sub(1, Ordering::SeqCst) <= 1 {
                self.token.cancel();
            }
            self.inner.sleep_cancellable(duration, token)
        }
    }

    #[test]
    fn test_fade_steps_count_and_endpoints() {
        let from = Rgb::new(0, 0, 0);
        let to = Rgb::new(200, 100, 40);
        let steps = fade_steps(from, to, Duration::from_millis(200), Duration::from_millis(50));

        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0], from);
        assert_eq!(steps[2], Rgb::new(100, 50, 20));
        assert_eq!(steps[4], to);
    }

    #[test]
    fn test_fade_steps_uneven_tick_lands_on_target() {
        let from = Rgb::new(255, 0, 0);
        let to = Rgb::new(0, 255, 0);
        let steps = fade_steps(from, to, Duration::from_millis(120), Duration::from_millis(50));

        // ceil(120 / 50) + 1
        assert_eq!(steps.len(), 4);
        assert_eq!(*steps.last().unwrap(), to);
    }

    #[test]
    fn test_fade_steps_monotonic_per_channel() {
        let from = Rgb::new(10, 250, 128);
        let to = Rgb::new(240, 5, 128);
        let steps = fade_steps(from, to, Duration::from_millis(3000), Duration::from_millis(50));

        for pair in steps.windows(2) {
            assert!(pair[0].red <= pair[1].red);
            assert!(pair[0].green >= pair[1].green);
            assert_eq!(pair[0].blue, pair[1].blue);
        }
    }

    #[test]
    fn test_fade_steps_zero_fade_jumps_to_target() {
        let steps = fade_steps(
            Rgb::new(1, 1, 1),
            Rgb::new(9, 9, 9),
            Duration::ZERO,
            Duration::from_millis(50),
        );
        assert_eq!(steps, vec![Rgb::new(9, 9, 9)]);
    }

    #[test]
    fn test_pick_target_never_repeats_current() {
        let settings = settings(vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]);
        let mut animation = FestiveAnimation::new(&settings, StdRng::seed_from_u64(7));

        let mut previous = animation.current();
        for _ in 0..100 {
            let target = animation.pick_target().unwrap();
            assert_ne!(target, previous);
            animation.current = target;
            previous = target;
        }
    }

    #[test]
    fn test_pick_target_with_no_alternative() {
        let settings = settings(vec![OFF, OFF]);
        let mut animation = FestiveAnimation::new(&settings, StdRng::seed_from_u64(1));
        assert_eq!(animation.pick_target(), None);
    }

    #[test]
    fn test_run_stops_on_cancellation_and_turns_off() {
        let settings = settings(vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]);
        let token = CancellationToken::new();
        // Five fade ticks and the hold of the first fade, then two ticks into the second
        let time = CancelAfter::new(8, &token);

        let sink = RecordingSink::new("probe");
        let probe = sink.clone();
        let mut sinks: Vec<Box<dyn LightSink>> = vec![Box::new(sink)];

        let mut animation = FestiveAnimation::new(&settings, StdRng::seed_from_u64(42));
        let completed = animation.run(&mut sinks, &time, &token).unwrap();

        assert_eq!(completed, 1);
        let colors = probe.colors();
        // 5 + 2 ticks, then the final off
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[0], OFF);
        assert_eq!(colors[4], animation.current());
        assert_eq!(colors[5], animation.current());
        assert_eq!(*colors.last().unwrap(), OFF);
        assert_eq!(colors.iter().filter(|c| c.is_off()).count(), 2);
    }

    #[test]
    fn test_run_records_tick_and_hold_suspensions() {
        let settings = settings(vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]);
        let token = CancellationToken::new();
        let time = CancelAfter::new(6, &token);
        let mut sinks: Vec<Box<dyn LightSink>> = vec![Box::new(RecordingSink::new("probe"))];

        let mut animation = FestiveAnimation::new(&settings, StdRng::seed_from_u64(3));
        animation.run(&mut sinks, &time, &token).unwrap();

        let sleeps = time.inner.sleeps();
        // The hold is cut short by cancellation, so only the ticks were slept
        assert_eq!(sleeps, vec![Duration::from_millis(50); 5]);
    }

    #[test]
    fn test_run_continues_after_device_failure() {
        let settings = settings(vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]);
        let token = CancellationToken::new();
        let time = CancelAfter::new(5, &token);

        let flaky = RecordingSink::new("flaky").failing_on(&[1, 2]);
        let probe = flaky.clone();
        let mut sinks: Vec<Box<dyn LightSink>> = vec![Box::new(flaky)];

        let mut animation = FestiveAnimation::new(&settings, StdRng::seed_from_u64(11));
        animation.run(&mut sinks, &time, &token).unwrap();

        // Ticks 0, 3 and 4 plus the final off made it through
        let colors = probe.colors();
        assert_eq!(colors.len(), 4);
        assert_eq!(*colors.last().unwrap(), OFF);
    }

    #[test]
    fn test_run_turns_off_exactly_once() {
        let settings = settings(vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]);
        let token = CancellationToken::new();
        let time = CancelAfter::new(1, &token);

        // The first tick starts from off, then the guard turns it off again
        let mut sink = MockLightSink::new();
        sink.expect_set_color()
            .with(eq(PIXEL), eq(OFF))
            .times(2)
            .returning(|_, _| Ok(()));
        let mut sinks: Vec<Box<dyn LightSink>> = vec![Box::new(sink)];

        let mut animation = FestiveAnimation::new(&settings, StdRng::seed_from_u64(5));
        let completed = animation.run(&mut sinks, &time, &token).unwrap();
        assert_eq!(completed, 0);
    }

    #[test]
    fn test_run_rejects_degenerate_palette_and_still_turns_off() {
        let settings = settings(vec![OFF]);
        let token = CancellationToken::new();
        let time = CancelAfter::new(100, &token);

        let sink = RecordingSink::new("probe");
        let probe = sink.clone();
        let mut sinks: Vec<Box<dyn LightSink>> = vec![Box::new(sink)];

        let mut animation = FestiveAnimation::new(&settings, StdRng::seed_from_u64(5));
        assert!(animation.run(&mut sinks, &time, &token).is_err());
        assert_eq!(probe.colors(), vec![OFF]);
    }
}
