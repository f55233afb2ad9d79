//! # Collector
//!
//! The collector subscribes to the host's timing entries and keeps the derived
//! metric state up to date as batches arrive.
//!
//! ## Lifecycle
//!
//! 1. [`Collector::start`] checks the environment. A host without
//!    instrumentation, without a window, or without largest-contentful-paint
//!    support is reported as [`StartStatus::Unsupported`] and nothing happens.
//! 2. One observer is created, then a one-shot page-restore listener is
//!    registered and each configured category is observed once on the
//!    observer, independently, so a category the host rejects does not stop
//!    the others.
//! 3. Each delivered batch is applied in delivery order under the state's write
//!    lock. There is no stop operation; the collector runs for the life of the
//!    page.
//!
//! Calling `start` again while running returns [`StartStatus::AlreadyRunning`]
//! and subscribes to nothing.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use web_metrics::collector::{Collector, StartStatus};
//! use web_metrics::entry::TimingEntry;
//! use web_metrics::host::Environment;
//! use web_metrics::host::simulated::{SimulatedHost, SimulatedInstrumentation};
//!
//! let source = Arc::new(SimulatedInstrumentation::new());
//! let host = Arc::new(SimulatedHost::new());
//! let collector = Collector::new(Environment::new(source.clone(), host));
//!
//! assert_eq!(collector.start(), StartStatus::Started);
//!
//! source.emit(vec![TimingEntry::paint("first-contentful-paint", 123.0)]);
//! source.flush();
//!
//! let snapshot = collector.snapshot().unwrap();
//! assert_eq!(snapshot.navigation.vitals.fcp.map(|m| m.value), Some(123.0));
//! ```

/// Collector configuration
pub mod config;

/// Collector defaults
pub mod constants;

mod state;

pub use config::{CollectorConfig, LcpStrategy};
pub use crate::host::{Support, UnsupportedReason};

pub(crate) use state::{MetricsState, PageMetrics};

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, instrument};

use crate::core::metrics::Metric;
use crate::entry::{EntryType, TimingEntry};
use crate::host::{BatchHandler, Environment, HostEnvironment, ObserverId};
use crate::snapshot::{MetricsReader, Snapshot};

/// Outcome of [`Collector::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStatus {
    /// Subscriptions were established
    Started,
    /// A previous call already started this collector
    AlreadyRunning,
    /// The environment cannot support collection
    Unsupported(UnsupportedReason),
    /// The observer could not be created; nothing was subscribed
    Failed,
}

/// Collects timing entries and derives web metrics from them
pub struct Collector {
    env: Environment,
    config: CollectorConfig,
    state: Arc<RwLock<MetricsState>>,
    observer: Mutex<Option<ObserverId>>,
}

impl Collector {
    /// Create a collector with the default configuration
    pub fn new(env: Environment) -> Self {
        Self::with_config(env, CollectorConfig::default())
    }

    /// Create a collector with an explicit configuration
    pub fn with_config(env: Environment, config: CollectorConfig) -> Self {
        Self { env, config, state: Arc::new(RwLock::new(MetricsState::default())), observer: Mutex::new(None) }
    }

    /// The configuration this collector subscribes with
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Capability check for this collector's environment
    pub fn support(&self) -> Support {
        self.env.support()
    }

    /// Whether subscriptions have been established
    pub fn is_running(&self) -> bool {
        self.observer.lock().is_some()
    }

    /// Subscribe to timing entries
    ///
    /// Never fails and never panics on an unsupported or misbehaving host;
    /// subscription errors are logged and the affected category stays absent.
    #[instrument(skip(self), level = "debug")]
    pub fn start(&self) -> StartStatus {
        let (source, host) = match self.env.capabilities() {
            Ok(capabilities) => capabilities,
            Err(reason) => {
                debug!(%reason, "environment does not support collection");
                return StartStatus::Unsupported(reason);
            }
        };

        let mut running = self.observer.lock();
        if running.is_some() {
            debug!("collector already running");
            return StartStatus::AlreadyRunning;
        }

        let observer = match source.create_observer(self.batch_handler(Arc::clone(host))) {
            Ok(observer) => observer,
            Err(e) => {
                error!(error = %e, "failed to create performance observer");
                return StartStatus::Failed;
            }
        };

        // Registered only once an observer exists, so a failed start leaves nothing behind
        let state = Arc::clone(&self.state);
        host.on_page_restore(Box::new(move |persisted| {
            debug!(persisted, "page shown");
            state.write().bfcache = persisted;
        }));

        for entry_type in self.config.subscription_types() {
            // CLS accumulates from an explicit zero, set only while its subscription is live
            if entry_type == EntryType::LayoutShift {
                self.state.write().vitals.cls = Some(Metric::new(0.0));
            }

            match source.observe(observer, self.config.observe_options(entry_type)) {
                Ok(()) => debug!(%entry_type, %observer, "observing entries"),
                Err(e) => {
                    error!(%entry_type, error = %e, "failed to observe entries");
                    if entry_type == EntryType::LayoutShift {
                        self.state.write().vitals.cls = None;
                    }
                }
            }
        }

        *running = Some(observer);
        info!(%observer, "web metrics collector started");
        StartStatus::Started
    }

    /// A cloneable handle onto this collector's metrics
    pub fn reader(&self) -> MetricsReader {
        MetricsReader::new(self.env.clone(), Arc::clone(&self.state))
    }

    /// Current metrics, or `None` if the environment is unsupported
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.reader().snapshot()
    }

    fn batch_handler(&self, host: Arc<dyn HostEnvironment>) -> BatchHandler {
        let state = Arc::clone(&self.state);
        let lcp = self.config.lcp_strategy;

        Arc::new(move |entries: &[TimingEntry]| {
            state.write().record_batch(entries, host.as_ref(), lcp);
        })
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("env", &self.env)
            .field("config", &self.config)
            .field("observer", &*self.observer.lock())
            .finish()
    }
}
