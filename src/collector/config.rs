use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::collector::constants::{DEFAULT_BUFFERED, DEFAULT_DURATION_THRESHOLD};
use crate::entry::EntryType;
use crate::error::Result;
use crate::host::ObserveOptions;

/// How successive largest-contentful-paint candidates are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LcpStrategy {
    /// Keep the most recent candidate; browsers only emit growing candidates
    #[default]
    LastCandidate,
    /// Keep the latest-rendering candidate seen, whatever the delivery order
    Largest,
}

/// Collector configuration
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use web_metrics::collector::{CollectorConfig, LcpStrategy};
///
/// let config = CollectorConfig::from_json(r#"{ "lcp_strategy": "largest" }"#).unwrap();
/// assert_eq!(config.lcp_strategy, LcpStrategy::Largest);
/// assert_eq!(config.duration_threshold, 32.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Minimum event duration in milliseconds, for categories that honour it
    pub duration_threshold: f64,
    /// Ask for entries recorded before the subscription
    pub buffered: bool,
    /// Categories to subscribe to, in subscription order
    pub entry_types: Vec<EntryType>,
    pub lcp_strategy: LcpStrategy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            duration_threshold: DEFAULT_DURATION_THRESHOLD,
            buffered: DEFAULT_BUFFERED,
            entry_types: EntryType::ALL.to_vec(),
            lcp_strategy: LcpStrategy::default(),
        }
    }
}

impl CollectorConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    ///
    /// Repeated categories in `entry_types` are dropped, keeping the first.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.entry_types = dedup_entry_types(config.entry_types);
        Ok(config)
    }

    pub fn with_lcp_strategy(mut self, strategy: LcpStrategy) -> Self {
        self.lcp_strategy = strategy;
        self
    }

    pub fn with_duration_threshold(mut self, threshold: f64) -> Self {
        self.duration_threshold = threshold;
        self
    }

    pub fn with_entry_types(mut self, entry_types: impl IntoIterator<Item = EntryType>) -> Self {
        self.entry_types = dedup_entry_types(entry_types);
        self
    }

    /// Categories to observe, each once, in configured order
    pub fn subscription_types(&self) -> Vec<EntryType> {
        dedup_entry_types(self.entry_types.iter().copied())
    }

    /// Options used to observe one category
    pub fn observe_options(&self, entry_type: EntryType) -> ObserveOptions {
        let options = ObserveOptions::new(entry_type).buffered(self.buffered);
        if entry_type.supports_duration_threshold() {
            options.duration_threshold(self.duration_threshold)
        } else {
            options
        }
    }
}

fn dedup_entry_types(entry_types: impl IntoIterator<Item = EntryType>) -> Vec<EntryType> {
    let mut seen = HashSet::new();
    entry_types.into_iter().filter(|entry_type| seen.insert(*entry_type)).collect()
}
