//! Web Metrics - A Rust library for collecting page performance metrics
//!
//! This crate derives the core web vitals and a navigation timing breakdown
//! from the timing entries a browser's performance instrumentation reports.
//! The host is reached through two traits, so the same collector runs against
//! a real page (with the `web` feature) or against the in-process simulated
//! host used by tests and native tooling.
//!
//! # Features
//!
//! - **Web Vitals**: FCP, LCP, FID, first input time, INP and CLS
//! - **Navigation Metrics**: DNS, TCP, TLS, TTFB, processing phases and sizes
//! - **Device Metrics**: Viewport, visibility, mobile detection, connection and
//!   back-forward cache restores
//! - **Snapshots**: A merged, serializable view readable at any time
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use web_metrics::prelude::*;
//! use web_metrics::host::simulated::{SimulatedHost, SimulatedInstrumentation};
//!
//! fn main() -> Result<()> {
//!     let source = Arc::new(SimulatedInstrumentation::new());
//!     let collector = Collector::new(Environment::new(source.clone(), Arc::new(SimulatedHost::new())));
//!     collector.start();
//!
//!     source.emit(vec![
//!         TimingEntry::paint("first-contentful-paint", 123.0),
//!         TimingEntry::largest_contentful_paint(456.0),
//!     ]);
//!     source.flush();
//!
//!     if let Some(snapshot) = collector.snapshot() {
//!         println!("{}", snapshot.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Collection itself never fails: an unsupported host yields
//! [`StartStatus::Unsupported`](collector::StartStatus) and an absent snapshot,
//! and a category the host refuses is logged and left out. [`Error`] covers the
//! fallible edges, namely configuration parsing, entry decoding, serialization
//! and host calls.
//!
//! # Thread Safety
//!
//! [`Collector`] and [`MetricsReader`] are `Send` and `Sync`. Batches are
//! applied under a write lock, so a snapshot always sees whole batches.

#![doc(html_root_url = "https://docs.rs/web-metrics/0.1.0")]

pub mod collector;
pub mod core;
pub mod device;
pub mod entry;
pub mod error;
pub mod host;
pub mod navigation;
pub mod snapshot;

pub use collector::{Collector, CollectorConfig, LcpStrategy, StartStatus};
pub use error::{Error, Result};
pub use snapshot::{MetricsReader, Snapshot};

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::Error;
    pub use crate::Result;
    pub use crate::collector::{Collector, CollectorConfig, LcpStrategy, StartStatus};
    pub use crate::core::metrics::{Metric, WebVitals};
    pub use crate::device::DeviceMetrics;
    pub use crate::entry::{EntryType, TimingEntry};
    pub use crate::host::{Environment, HostEnvironment, InstrumentationSource, Support};
    pub use crate::navigation::NavigationMetrics;
    pub use crate::snapshot::Snapshot;
}
