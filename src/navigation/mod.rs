//! Navigation phase metrics
//!
//! A [`NavigationMetrics`] record is derived in one pass from the document's
//! navigation timing entry. Phase durations use [`diff`], so a phase whose
//! timestamps are missing or out of order is absent rather than negative or
//! NaN. Sizes, the redirect count, the navigation type and the URL pass through
//! unchanged.
//!
//! ```rust
//! use web_metrics::entry::NavigationTiming;
//! use web_metrics::navigation::NavigationMetrics;
//!
//! let timing = NavigationTiming {
//!     response_start: 300.0,
//!     transfer_size: Some(12345),
//!     ..Default::default()
//! };
//!
//! let metrics = NavigationMetrics::from_timing(&timing);
//! assert_eq!(metrics.ttfb, Some(300.0));
//! assert_eq!(metrics.transfer_size, Some(12345));
//! ```

use serde::{Deserialize, Serialize};

use crate::core::timing::{diff, round_finite};
use crate::entry::NavigationTiming;

/// Phase durations and passthrough fields of a page navigation, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<f64>,
    /// Service worker startup, `workerStart` to `fetchStart`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<f64>,
    #[serde(rename = "appCache", skip_serializing_if = "Option::is_none")]
    pub app_cache: Option<f64>,
    #[serde(rename = "DNS", skip_serializing_if = "Option::is_none")]
    pub dns: Option<f64>,
    /// `connectStart` to `secureConnectionStart`
    #[serde(rename = "TCP", skip_serializing_if = "Option::is_none")]
    pub tcp: Option<f64>,
    #[serde(rename = "TLS", skip_serializing_if = "Option::is_none")]
    pub tls: Option<f64>,
    /// Whole connection setup, `connectStart` to `connectEnd`
    #[serde(rename = "QUIC", skip_serializing_if = "Option::is_none")]
    pub quic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queueing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<f64>,
    #[serde(rename = "TTFB", skip_serializing_if = "Option::is_none")]
    pub ttfb: Option<f64>,
    #[serde(rename = "HTML", skip_serializing_if = "Option::is_none")]
    pub html: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<f64>,
    #[serde(rename = "processingToDI", skip_serializing_if = "Option::is_none")]
    pub processing_to_di: Option<f64>,
    #[serde(rename = "processingToDCL", skip_serializing_if = "Option::is_none")]
    pub processing_to_dcl: Option<f64>,
    #[serde(rename = "processingDCL", skip_serializing_if = "Option::is_none")]
    pub processing_dcl: Option<f64>,
    #[serde(rename = "processingToDC", skip_serializing_if = "Option::is_none")]
    pub processing_to_dc: Option<f64>,
    #[serde(rename = "processingL", skip_serializing_if = "Option::is_none")]
    pub processing_l: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing: Option<f64>,
    /// Absolute `loadEventEnd`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<f64>,
    #[serde(rename = "redirectCount", skip_serializing_if = "Option::is_none")]
    pub redirect_count: Option<u32>,
    #[serde(rename = "transferSize", skip_serializing_if = "Option::is_none")]
    pub transfer_size: Option<u64>,
    #[serde(rename = "decodedBodySize", skip_serializing_if = "Option::is_none")]
    pub decoded_body_size: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub navigation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NavigationMetrics {
    /// Derive every phase from a navigation timing entry
    pub fn from_timing(t: &NavigationTiming) -> Self {
        Self {
            redirect: diff(t.redirect_end, t.redirect_start),
            worker: diff(t.fetch_start, t.worker_start),
            app_cache: diff(t.domain_lookup_start, t.fetch_start),
            dns: diff(t.domain_lookup_end, t.domain_lookup_start),
            tcp: diff(t.secure_connection_start, t.connect_start),
            tls: diff(t.connect_end, t.secure_connection_start),
            quic: diff(t.connect_end, t.connect_start),
            queueing: diff(t.request_start, t.fetch_start),
            request: diff(t.response_start, t.request_start),
            response: diff(t.response_end, t.response_start),
            ttfb: diff(t.response_start, t.start_time),
            html: diff(t.response_end, t.request_start),
            resource: diff(t.response_end, t.start_time),
            processing_to_di: diff(t.dom_interactive, t.response_end),
            processing_to_dcl: diff(t.dom_content_loaded_event_start, t.dom_interactive),
            processing_dcl: diff(t.dom_content_loaded_event_end, t.dom_content_loaded_event_start),
            processing_to_dc: diff(t.dom_complete, t.dom_content_loaded_event_end),
            processing_l: diff(t.load_event_end, t.load_event_start),
            processing: diff(t.load_event_end, t.response_end),
            navigation: round_finite(t.load_event_end),
            redirect_count: t.redirect_count,
            transfer_size: t.transfer_size,
            decoded_body_size: t.decoded_body_size,
            navigation_type: Some(t.navigation_type.clone()).filter(|s| !s.is_empty()),
            name: Some(t.name.clone()).filter(|s| !s.is_empty()),
        }
    }
}

impl From<&NavigationTiming> for NavigationMetrics {
    fn from(timing: &NavigationTiming) -> Self {
        Self::from_timing(timing)
    }
}
