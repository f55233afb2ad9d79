/// Minimum duration, in milliseconds, of event entries worth observing
pub const DEFAULT_DURATION_THRESHOLD: f64 = 32.0;

/// Whether observations include entries recorded before they started
pub const DEFAULT_BUFFERED: bool = true;
