use std::sync::Arc;

use tracing::{debug, trace};

use crate::collector::config::LcpStrategy;
use crate::core::metrics::{Metric, WebVitals};
use crate::core::timing::round;
use crate::device::DeviceMetrics;
use crate::entry::TimingEntry;
use crate::host::HostEnvironment;
use crate::navigation::NavigationMetrics;

/// Navigation and device records, captured together and replaced as one
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageMetrics {
    pub navigation: NavigationMetrics,
    pub device: DeviceMetrics,
}

/// Derived metric state owned by one collector
#[derive(Debug, Default)]
pub(crate) struct MetricsState {
    pub vitals: WebVitals,
    pub page: Option<Arc<PageMetrics>>,
    pub bfcache: bool,
}

impl MetricsState {
    /// Apply a delivered batch, one entry at a time in delivery order
    pub fn record_batch(&mut self, entries: &[TimingEntry], host: &dyn HostEnvironment, lcp: LcpStrategy) {
        trace!(count = entries.len(), "processing entry batch");
        for entry in entries {
            self.record(entry, host, lcp);
        }
    }

    pub fn record(&mut self, entry: &TimingEntry, host: &dyn HostEnvironment, lcp: LcpStrategy) {
        let vitals = &mut self.vitals;

        match entry {
            TimingEntry::Paint(paint) => {
                if paint.is_first_contentful_paint() {
                    vitals.fcp = Some(Metric::new(round(paint.start_time)));
                }
            }
            TimingEntry::LargestContentfulPaint(candidate) => {
                let value = round(candidate.start_time);
                let replace = match (lcp, vitals.lcp) {
                    (LcpStrategy::Largest, Some(current)) => value > current.value,
                    _ => true,
                };
                if replace {
                    vitals.lcp = Some(Metric::new(value));
                }
            }
            TimingEntry::FirstInput(input) => {
                vitals.fid = Some(Metric::new(round(input.input_delay())));
                vitals.fi = Some(Metric::new(round(input.start_time)));
                if vitals.inp.is_none() {
                    vitals.inp = Some(Metric::new(round(input.duration)));
                }
            }
            TimingEntry::LayoutShift(shift) => {
                if shift.had_recent_input {
                    return;
                }
                match vitals.cls.as_mut() {
                    Some(cls) => cls.value += shift.value,
                    None => debug!(value = shift.value, "layout shift without an active CLS baseline, ignored"),
                }
            }
            TimingEntry::Event(event) => {
                let worse = vitals.inp.map_or(true, |inp| event.duration > inp.value);
                if event.is_interaction() && worse {
                    vitals.inp = Some(Metric::new(round(event.duration)));
                }
            }
            TimingEntry::Navigation(timing) => {
                let page = PageMetrics {
                    navigation: NavigationMetrics::from_timing(timing),
                    device: DeviceMetrics::capture(host, self.bfcache),
                };
                debug!(name = %timing.name, ttfb = ?page.navigation.ttfb, "captured navigation metrics");
                self.page = Some(Arc::new(page));
            }
        }
    }
}
