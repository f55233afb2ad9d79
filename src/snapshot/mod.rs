//! Snapshot reader
//!
//! A [`Snapshot`] merges the navigation and device records with the six
//! vitals, which are re-attached at read time because they keep changing after
//! the navigation entry has been processed (INP, CLS and LCP in particular).
//! Reading takes a shared lock, clones, and never changes collector state.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::collector::MetricsState;
use crate::core::metrics::WebVitals;
use crate::device::DeviceMetrics;
use crate::error::Result;
use crate::host::Environment;
use crate::navigation::NavigationMetrics;

/// Navigation phases with the web vitals attached
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    /// Phase metrics; every field is absent until the navigation entry arrives
    #[serde(flatten)]
    pub timing: NavigationMetrics,
    #[serde(flatten)]
    pub vitals: WebVitals,
}

/// The merged metrics view returned to callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub navigation: NavigationSnapshot,
    /// Present once the navigation entry has been processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceMetrics>,
}

impl Snapshot {
    pub(crate) fn assemble(state: &MetricsState) -> Self {
        let (timing, device) = match state.page.as_deref() {
            Some(page) => {
                let mut device = page.device.clone();
                device.bfcache |= state.bfcache;
                (page.navigation.clone(), Some(device))
            }
            None => (NavigationMetrics::default(), None),
        };

        Self { navigation: NavigationSnapshot { timing, vitals: state.vitals }, device }
    }

    pub fn vitals(&self) -> &WebVitals {
        &self.navigation.vitals
    }

    /// Serialize using the host's metric key names (`FCP`, `TTFB`, `processingToDI`, ...)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read-only handle onto a collector's metrics
///
/// Cheap to clone; every clone sees the same state.
#[derive(Clone, Debug)]
pub struct MetricsReader {
    env: Environment,
    state: Arc<RwLock<MetricsState>>,
}

impl MetricsReader {
    pub(crate) fn new(env: Environment, state: Arc<RwLock<MetricsState>>) -> Self {
        Self { env, state }
    }

    /// The current metrics, or `None` when the environment lacks a window
    /// context or the required instrumentation support
    pub fn snapshot(&self) -> Option<Snapshot> {
        if let Err(reason) = self.env.capabilities() {
            trace!(%reason, "no snapshot available");
            return None;
        }

        Some(Snapshot::assemble(&self.state.read()))
    }
}
