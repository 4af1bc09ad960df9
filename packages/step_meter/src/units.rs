//! Numeric helpers shared by the report code.

use std::time::Duration;

/// Skipped time at or below this many nanoseconds is not worth showing in the summary.
pub(crate) const SKIPPED_NOISE_NANOS: u64 = 1_000;

/// Calculates where `value` lies on the `low..=high` scale, in percent.
///
/// A zero-width scale (`high == low`, e.g. a session shorter than the clock resolution)
/// yields 0 instead of dividing by zero.
///
/// # Examples
///
/// ```
/// use step_meter::percent;
///
/// assert!((percent(150, 100, 200) - 50.0).abs() < f64::EPSILON);
/// assert!(percent(100, 100, 100).abs() < f64::EPSILON);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "percentages are for display, nanosecond precision is not required"
)]
pub fn percent(value: u64, low: u64, high: u64) -> f64 {
    let span = high.saturating_sub(low);

    if span == 0 {
        return 0.0;
    }

    (value.saturating_sub(low) as f64) * 100.0 / span as f64
}

/// Converts nanoseconds to fractional milliseconds for display.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "display precision of three decimals is all we need"
)]
pub(crate) fn nanos_to_millis(nanos: u64) -> f64 {
    nanos as f64 / 1_000_000.0
}

/// Converts a duration to fractional milliseconds for display.
#[must_use]
pub(crate) fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
