//! # Core Metrics Module
//!
//! Derived metric records and the set of web vitals a collector tracks.
//!
//! Each vital starts absent and is set by the collector as matching timing
//! entries arrive. CLS is the only cumulative one; INP keeps the worst
//! interaction seen so far; the rest are last-write.
//!
//! ## Example
//!
//! ```rust
//! use web_metrics::core::metrics::{Metric, WebVitals};
//!
//! let mut vitals = WebVitals::default();
//! vitals.fcp = Some(Metric::new(123.0));
//!
//! assert_eq!(vitals.fcp.map(|m| m.value), Some(123.0));
//! assert!(vitals.lcp.is_none());
//! ```
use serde::{Deserialize, Serialize};

/// A single named measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// The measured value, in milliseconds for timings or a unitless score for CLS
    pub value: f64,
}

impl Metric {
    /// Creates a new metric with the given value
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

/// The independently tracked vitals, re-attached to every snapshot at read time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WebVitals {
    /// First Contentful Paint
    #[serde(rename = "FCP", skip_serializing_if = "Option::is_none")]
    pub fcp: Option<Metric>,
    /// First Input start time
    #[serde(rename = "FI", skip_serializing_if = "Option::is_none")]
    pub fi: Option<Metric>,
    /// First Input Delay
    #[serde(rename = "FID", skip_serializing_if = "Option::is_none")]
    pub fid: Option<Metric>,
    /// Largest Contentful Paint
    #[serde(rename = "LCP", skip_serializing_if = "Option::is_none")]
    pub lcp: Option<Metric>,
    /// Cumulative Layout Shift
    #[serde(rename = "CLS", skip_serializing_if = "Option::is_none")]
    pub cls: Option<Metric>,
    /// Interaction to Next Paint
    #[serde(rename = "INP", skip_serializing_if = "Option::is_none")]
    pub inp: Option<Metric>,
}

impl WebVitals {
    /// Returns true if no vital has been observed yet
    pub fn is_empty(&self) -> bool {
        self.fcp.is_none()
            && self.fi.is_none()
            && self.fid.is_none()
            && self.lcp.is_none()
            && self.cls.is_none()
            && self.inp.is_none()
    }
}
