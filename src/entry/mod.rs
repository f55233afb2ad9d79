//! Timing entries produced by the host's instrumentation subsystem
//!
//! Entries form a closed set of six categories. Each category carries only the
//! fields that matter for it, so processing code never reads a field that the
//! entry's category does not have.
//!
//! Entries deserialize from the JSON shape the host reports them in:
//!
//! ```rust
//! use web_metrics::entry::{EntryType, TimingEntry};
//!
//! let entry: TimingEntry = serde_json::from_str(
//!     r#"{ "entryType": "layout-shift", "value": 0.25, "hadRecentInput": false }"#,
//! ).unwrap();
//!
//! assert_eq!(entry.entry_type(), EntryType::LayoutShift);
//! ```

/// Entry type names and matching constants
pub mod constants;

/// Entry data types
pub mod types;

pub use types::*;
