//! Collaborator interfaces
//!
//! The collector never talks to a browser directly. It depends on two traits:
//!
//! - [`InstrumentationSource`]: the performance instrumentation subsystem, which
//!   reports the entry types it supports, creates observers and delivers
//!   batches of [`TimingEntry`] values to them.
//! - [`HostEnvironment`]: read-only window, document and navigator state plus the
//!   one-shot page-restore signal.
//!
//! [`simulated`] provides in-process implementations for tests and native
//! use; [`web`] binds both traits to the browser when the `web` feature is on.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entry::{EntryType, TimingEntry};
use crate::error::Result;

#[cfg(test)]
use mockall::automock;

#[cfg(feature = "simulated")]
pub mod simulated;

#[cfg(feature = "web")]
pub mod web;

/// Callback invoked with each delivered batch, entries in host order
pub type BatchHandler = Arc<dyn Fn(&[TimingEntry]) + Send + Sync>;

/// One-shot callback for the page-restore signal, receiving the `persisted` flag
pub type RestoreCallback = Box<dyn FnOnce(bool) + Send>;

/// Identifies an observer created by an [`InstrumentationSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// Options for observing one entry category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    pub entry_type: EntryType,
    /// Include entries recorded before the observation started
    pub buffered: bool,
    /// Drop entries shorter than this many milliseconds
    pub duration_threshold: Option<f64>,
}

impl ObserveOptions {
    pub fn new(entry_type: EntryType) -> Self {
        Self { entry_type, buffered: false, duration_threshold: None }
    }

    pub fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    pub fn duration_threshold(mut self, threshold: f64) -> Self {
        self.duration_threshold = Some(threshold);
        self
    }
}

/// The host's performance instrumentation subsystem
#[cfg_attr(test, automock)]
pub trait InstrumentationSource: Send + Sync {
    /// Entry categories the host can report
    fn supported_entry_types(&self) -> Vec<EntryType>;

    /// Create an observer whose batches go to `handler`
    fn create_observer(&self, handler: BatchHandler) -> Result<ObserverId>;

    /// Start delivering entries of one category to an observer
    fn observe(&self, observer: ObserverId, options: ObserveOptions) -> Result<()>;

    /// Stop all deliveries to an observer
    fn disconnect(&self, observer: ObserverId) -> Result<()>;
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Document visibility at capture time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
}

/// Network connection descriptor, copied verbatim from the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downlink: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_data: Option<bool>,
}

/// Window, document and navigator state of the host
#[cfg_attr(test, automock)]
pub trait HostEnvironment: Send + Sync {
    fn viewport(&self) -> Viewport;

    fn visibility_state(&self) -> VisibilityState;

    fn user_agent(&self) -> String;

    /// The network connection descriptor, if the host exposes one
    fn connection(&self) -> Option<ConnectionInfo>;

    /// Register a listener fired at most once when the page is shown,
    /// with `true` when it was restored from the back-forward cache
    fn on_page_restore(&self, callback: RestoreCallback);
}

/// Why an environment cannot run a collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// The host has no performance instrumentation subsystem
    NoInstrumentation,
    /// There is no window context
    NoWindow,
    /// The instrumentation subsystem lacks a required entry category
    MissingEntryType(EntryType),
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::NoInstrumentation => f.write_str("performance instrumentation is not available"),
            UnsupportedReason::NoWindow => f.write_str("no window context"),
            UnsupportedReason::MissingEntryType(entry_type) => {
                write!(f, "entry type '{entry_type}' is not supported")
            }
        }
    }
}

/// Result of the capability check run by `start` and by every snapshot read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Supported,
    Unsupported(UnsupportedReason),
}

impl Support {
    pub fn is_supported(&self) -> bool {
        matches!(self, Support::Supported)
    }
}

/// The collaborators a collector runs against
///
/// An empty slot models a host that lacks that collaborator entirely.
#[derive(Clone, Default)]
pub struct Environment {
    pub instrumentation: Option<Arc<dyn InstrumentationSource>>,
    pub host: Option<Arc<dyn HostEnvironment>>,
}

impl Environment {
    pub fn new(instrumentation: Arc<dyn InstrumentationSource>, host: Arc<dyn HostEnvironment>) -> Self {
        Self { instrumentation: Some(instrumentation), host: Some(host) }
    }

    /// An environment with neither collaborator, as outside a browser
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_instrumentation(mut self, instrumentation: Arc<dyn InstrumentationSource>) -> Self {
        self.instrumentation = Some(instrumentation);
        self
    }

    pub fn with_host(mut self, host: Arc<dyn HostEnvironment>) -> Self {
        self.host = Some(host);
        self
    }

    /// Check whether a collector can run here
    pub fn support(&self) -> Support {
        match self.capabilities() {
            Ok(_) => Support::Supported,
            Err(reason) => Support::Unsupported(reason),
        }
    }

    /// Both collaborators, provided they exist and largest-contentful-paint is
    /// among the supported entry types (the proxy for overall support)
    pub(crate) fn capabilities(
        &self,
    ) -> std::result::Result<(&Arc<dyn InstrumentationSource>, &Arc<dyn HostEnvironment>), UnsupportedReason> {
        let instrumentation = self.instrumentation.as_ref().ok_or(UnsupportedReason::NoInstrumentation)?;
        let host = self.host.as_ref().ok_or(UnsupportedReason::NoWindow)?;

        let required = EntryType::LargestContentfulPaint;
        if !instrumentation.supported_entry_types().contains(&required) {
            return Err(UnsupportedReason::MissingEntryType(required));
        }

        Ok((instrumentation, host))
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("instrumentation", &self.instrumentation.is_some())
            .field("host", &self.host.is_some())
            .finish()
    }
}
