//! Linear interpolation of a single color channel.

/// Interpolate a scalar between `from` and `to` after `progress` of `duration` seconds.
///
/// A zero `duration` returns `from` unchanged. The resolver produces such holds
/// before the first and after the last checkpoint.
///
/// Progress is not clamped: `progress > duration` extrapolates past `to`.
pub fn interpolate(from: f64, to: f64, duration: f64, progress: f64) -> f64 {
    if duration == 0.0 {
        return from;
    }

    let fraction = progress / duration;
    from + (to - from) * fraction
}
