//! In-process instrumentation and host doubles
//!
//! [`SimulatedInstrumentation`] keeps a performance timeline and per-observer
//! delivery queues. Entries passed to [`SimulatedInstrumentation::emit`] are
//! queued for every observer watching their category; nothing reaches a handler
//! until [`flush`](SimulatedInstrumentation::flush) runs, the way a browser
//! queues observer callbacks as tasks. Observing with `buffered` queues the
//! timeline entries recorded before the observation.
//!
//! [`SimulatedHost`] answers window and navigator queries from fixed values and
//! fires the page-restore listener on demand.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::entry::{EntryType, TimingEntry};
use crate::error::{Error, Result};
use crate::host::{
    BatchHandler, ConnectionInfo, HostEnvironment, InstrumentationSource, ObserveOptions, ObserverId, RestoreCallback,
    Viewport, VisibilityState,
};

/// User agent reported by a default [`SimulatedHost`]
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

struct ObserverSlot {
    handler: BatchHandler,
    observed: HashMap<EntryType, ObserveOptions>,
    pending: VecDeque<Vec<TimingEntry>>,
}

impl ObserverSlot {
    fn accepts(&self, entry: &TimingEntry) -> bool {
        match self.observed.get(&entry.entry_type()) {
            Some(options) => passes_threshold(entry, options),
            None => false,
        }
    }
}

fn passes_threshold(entry: &TimingEntry, options: &ObserveOptions) -> bool {
    match (options.duration_threshold, entry.duration()) {
        (Some(threshold), Some(duration)) => duration >= threshold,
        _ => true,
    }
}

#[derive(Default)]
struct Timeline {
    next_id: u64,
    observers: BTreeMap<ObserverId, ObserverSlot>,
    entries: Vec<TimingEntry>,
    observations: usize,
}

/// A scripted performance instrumentation subsystem
pub struct SimulatedInstrumentation {
    supported: Vec<EntryType>,
    rejected: HashSet<EntryType>,
    fail_observer_creation: bool,
    timeline: Mutex<Timeline>,
}

impl Default for SimulatedInstrumentation {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedInstrumentation {
    /// A source supporting every entry category
    pub fn new() -> Self {
        Self::with_supported_entry_types(EntryType::ALL)
    }

    pub fn with_supported_entry_types(entry_types: impl IntoIterator<Item = EntryType>) -> Self {
        Self {
            supported: entry_types.into_iter().collect(),
            rejected: HashSet::new(),
            fail_observer_creation: false,
            timeline: Mutex::new(Timeline::default()),
        }
    }

    /// Make observing `entry_type` fail even though it is reported as supported
    pub fn reject(mut self, entry_type: EntryType) -> Self {
        self.rejected.insert(entry_type);
        self
    }

    /// Make observer creation fail
    pub fn fail_observer_creation(mut self) -> Self {
        self.fail_observer_creation = true;
        self
    }

    /// Record entries on the timeline and queue them, as one batch per
    /// observer, for every observer watching their category
    pub fn emit(&self, entries: impl IntoIterator<Item = TimingEntry>) {
        let entries: Vec<TimingEntry> = entries.into_iter().collect();
        let mut timeline = self.timeline.lock();

        for slot in timeline.observers.values_mut() {
            let batch: Vec<TimingEntry> = entries.iter().filter(|entry| slot.accepts(entry)).cloned().collect();
            if !batch.is_empty() {
                slot.pending.push_back(batch);
            }
        }
        timeline.entries.extend(entries);
    }

    /// Deliver every queued batch, returning how many were delivered
    ///
    /// Handlers run without the timeline lock held, so they may emit further
    /// entries; those are delivered by the same call.
    pub fn flush(&self) -> usize {
        let mut delivered = 0;

        loop {
            let ready: Vec<(BatchHandler, Vec<TimingEntry>)> = {
                let mut timeline = self.timeline.lock();
                let mut ready = Vec::new();
                for slot in timeline.observers.values_mut() {
                    ready.extend(slot.pending.drain(..).map(|batch| (Arc::clone(&slot.handler), batch)));
                }
                ready
            };

            if ready.is_empty() {
                return delivered;
            }

            for (handler, batch) in ready {
                trace!(entries = batch.len(), "delivering simulated batch");
                handler(&batch);
                delivered += 1;
            }
        }
    }

    /// Flush on the tokio runtime after `delay`, like a timer-queued callback
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn_delivery(self: &Arc<Self>, delay: std::time::Duration) -> tokio::task::JoinHandle<usize> {
        let source = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            source.flush()
        })
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.timeline.lock().observers.len()
    }

    /// Number of successful `observe` calls across all observers
    pub fn observation_count(&self) -> usize {
        self.timeline.lock().observations
    }

    /// Categories an observer is currently watching
    pub fn observed_entry_types(&self, observer: ObserverId) -> Vec<EntryType> {
        let timeline = self.timeline.lock();
        let mut types: Vec<EntryType> = timeline
            .observers
            .get(&observer)
            .map(|slot| slot.observed.keys().copied().collect())
            .unwrap_or_default();
        types.sort_by_key(|entry_type| entry_type.as_str());
        types
    }

    /// Options an observer was registered with for one category
    pub fn observe_options(&self, observer: ObserverId, entry_type: EntryType) -> Option<ObserveOptions> {
        self.timeline.lock().observers.get(&observer).and_then(|slot| slot.observed.get(&entry_type).copied())
    }
}

impl InstrumentationSource for SimulatedInstrumentation {
    fn supported_entry_types(&self) -> Vec<EntryType> {
        self.supported.clone()
    }

    fn create_observer(&self, handler: BatchHandler) -> Result<ObserverId> {
        if self.fail_observer_creation {
            return Err(Error::not_available("observer creation disabled"));
        }

        let mut timeline = self.timeline.lock();
        timeline.next_id += 1;
        let id = ObserverId(timeline.next_id);
        timeline.observers.insert(id, ObserverSlot { handler, observed: HashMap::new(), pending: VecDeque::new() });
        Ok(id)
    }

    fn observe(&self, observer: ObserverId, options: ObserveOptions) -> Result<()> {
        let entry_type = options.entry_type;
        if !self.supported.contains(&entry_type) || self.rejected.contains(&entry_type) {
            return Err(Error::subscription(entry_type, "entry type is not supported"));
        }

        let mut timeline = self.timeline.lock();
        let Timeline { observers, entries, observations, .. } = &mut *timeline;
        let slot = observers.get_mut(&observer).ok_or_else(|| Error::not_available(format!("unknown {observer}")))?;

        slot.observed.insert(entry_type, options);
        *observations += 1;

        if options.buffered {
            let buffered: Vec<TimingEntry> = entries
                .iter()
                .filter(|entry| entry.entry_type() == entry_type && passes_threshold(entry, &options))
                .cloned()
                .collect();
            if !buffered.is_empty() {
                slot.pending.push_back(buffered);
            }
        }

        Ok(())
    }

    fn disconnect(&self, observer: ObserverId) -> Result<()> {
        self.timeline
            .lock()
            .observers
            .remove(&observer)
            .map(|_| ())
            .ok_or_else(|| Error::not_available(format!("unknown {observer}")))
    }
}

struct HostState {
    viewport: Viewport,
    visibility_state: VisibilityState,
    user_agent: String,
    connection: Option<ConnectionInfo>,
    restore_listeners: Vec<RestoreCallback>,
}

/// A host environment with fixed window and navigator state
pub struct SimulatedHost {
    state: Mutex<HostState>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    /// A visible 1280x800 desktop window without a connection descriptor
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState {
                viewport: Viewport::new(1280, 800),
                visibility_state: VisibilityState::Visible,
                user_agent: DEFAULT_USER_AGENT.to_string(),
                connection: None,
                restore_listeners: Vec::new(),
            }),
        }
    }

    pub fn with_viewport(self, width: u32, height: u32) -> Self {
        self.state.lock().viewport = Viewport::new(width, height);
        self
    }

    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        self.state.lock().user_agent = user_agent.into();
        self
    }

    pub fn with_connection(self, connection: ConnectionInfo) -> Self {
        self.state.lock().connection = Some(connection);
        self
    }

    pub fn set_visibility_state(&self, visibility_state: VisibilityState) {
        self.state.lock().visibility_state = visibility_state;
    }

    /// Fire the page-show signal, running and discarding every registered
    /// listener. Returns how many listeners ran.
    pub fn fire_page_show(&self, persisted: bool) -> usize {
        let listeners = std::mem::take(&mut self.state.lock().restore_listeners);
        let count = listeners.len();
        for listener in listeners {
            listener(persisted);
        }
        count
    }

    pub fn restore_listener_count(&self) -> usize {
        self.state.lock().restore_listeners.len()
    }
}

impl HostEnvironment for SimulatedHost {
    fn viewport(&self) -> Viewport {
        self.state.lock().viewport
    }

    fn visibility_state(&self) -> VisibilityState {
        self.state.lock().visibility_state
    }

    fn user_agent(&self) -> String {
        self.state.lock().user_agent.clone()
    }

    fn connection(&self) -> Option<ConnectionInfo> {
        self.state.lock().connection.clone()
    }

    fn on_page_restore(&self, callback: RestoreCallback) {
        self.state.lock().restore_listeners.push(callback);
    }
}
