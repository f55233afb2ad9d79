//! Rounding and phase-duration helpers shared by every derived metric.

/// Rounds to the nearest whole millisecond.
///
/// Half-way cases go towards positive infinity, which is how the browser's
/// `Math.round` behaves (`-2.5` rounds to `-2`, `2.5` to `3`). Values that are
/// already whole, NaN or infinite come back unchanged.
pub fn round(value: f64) -> f64 {
    let rounded = value.round();
    if value - rounded == 0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

/// Rounds `value`, or returns `None` when it is NaN or infinite.
pub fn round_finite(value: f64) -> Option<f64> {
    value.is_finite().then(|| round(value))
}

/// Duration of the phase between two timestamps.
///
/// Returns `round(end - start)` when the difference is a finite, non-negative
/// number and `None` otherwise, so a missing timestamp (NaN) or an
/// out-of-order pair never produces a wrong number.
///
/// # Examples
///
/// ```rust
/// use web_metrics::core::diff;
///
/// assert_eq!(diff(300.0, 0.0), Some(300.0));
/// assert_eq!(diff(100.4, 0.0), Some(100.0));
/// assert_eq!(diff(0.0, 300.0), None);
/// assert_eq!(diff(f64::NAN, 0.0), None);
/// ```
pub fn diff(end: f64, start: f64) -> Option<f64> {
    let result = end - start;

    if result.is_finite() && result >= 0.0 {
        Some(round(result))
    } else {
        None
    }
}
