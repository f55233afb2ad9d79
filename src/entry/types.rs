use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entry::constants::{names, FIRST_CONTENTFUL_PAINT, INTERACTION_EVENTS};
use crate::error::{Error, Result};

/// Category of a timing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    Paint,
    LargestContentfulPaint,
    FirstInput,
    LayoutShift,
    Navigation,
    Event,
}

impl EntryType {
    /// Every category, in the order a collector subscribes to them by default
    pub const ALL: [EntryType; 6] = [
        EntryType::Navigation,
        EntryType::Paint,
        EntryType::LargestContentfulPaint,
        EntryType::LayoutShift,
        EntryType::Event,
        EntryType::FirstInput,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Paint => names::PAINT,
            EntryType::LargestContentfulPaint => names::LARGEST_CONTENTFUL_PAINT,
            EntryType::FirstInput => names::FIRST_INPUT,
            EntryType::LayoutShift => names::LAYOUT_SHIFT,
            EntryType::Navigation => names::NAVIGATION,
            EntryType::Event => names::EVENT,
        }
    }

    /// Whether observation of this category honours a minimum duration threshold
    pub fn supports_duration_threshold(&self) -> bool {
        matches!(self, EntryType::Event)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            names::PAINT => Ok(EntryType::Paint),
            names::LARGEST_CONTENTFUL_PAINT => Ok(EntryType::LargestContentfulPaint),
            names::FIRST_INPUT => Ok(EntryType::FirstInput),
            names::LAYOUT_SHIFT => Ok(EntryType::LayoutShift),
            names::NAVIGATION => Ok(EntryType::Navigation),
            names::EVENT => Ok(EntryType::Event),
            other => Err(Error::invalid_data(format!("unknown entry type '{other}'"))),
        }
    }
}

/// A paint timing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintTiming {
    pub name: String,
    pub start_time: f64,
}

impl PaintTiming {
    pub fn is_first_contentful_paint(&self) -> bool {
        self.name == FIRST_CONTENTFUL_PAINT
    }
}

/// A largest-contentful-paint candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestContentfulPaint {
    pub start_time: f64,
}

/// Timing of a user input event, used for both `first-input` and `event` entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTiming {
    #[serde(default)]
    pub name: String,
    pub start_time: f64,
    #[serde(default)]
    pub processing_start: f64,
    #[serde(default)]
    pub duration: f64,
}

impl EventTiming {
    /// Whether the event is one of the interaction types INP tracks
    pub fn is_interaction(&self) -> bool {
        INTERACTION_EVENTS.contains(&self.name.as_str())
    }

    /// Delay between the input and the start of its processing
    pub fn input_delay(&self) -> f64 {
        self.processing_start - self.start_time
    }
}

/// A layout shift entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShift {
    pub value: f64,
    pub had_recent_input: bool,
}

/// The navigation timing entry of the current document
///
/// Timestamps are milliseconds relative to the time origin. A timestamp the
/// host does not report is NaN; phase derivation treats it as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationTiming {
    pub name: String,
    #[serde(rename = "type")]
    pub navigation_type: String,
    pub start_time: f64,
    pub redirect_start: f64,
    pub redirect_end: f64,
    pub worker_start: f64,
    pub fetch_start: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub secure_connection_start: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub response_end: f64,
    pub dom_interactive: f64,
    pub dom_content_loaded_event_start: f64,
    pub dom_content_loaded_event_end: f64,
    pub dom_complete: f64,
    pub load_event_start: f64,
    pub load_event_end: f64,
    pub redirect_count: Option<u32>,
    pub transfer_size: Option<u64>,
    pub decoded_body_size: Option<u64>,
}

/// A timing entry delivered by the instrumentation subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entryType", rename_all = "kebab-case")]
pub enum TimingEntry {
    Paint(PaintTiming),
    LargestContentfulPaint(LargestContentfulPaint),
    FirstInput(EventTiming),
    LayoutShift(LayoutShift),
    Navigation(Box<NavigationTiming>),
    Event(EventTiming),
}

impl TimingEntry {
    /// The category this entry belongs to
    pub fn entry_type(&self) -> EntryType {
        match self {
            TimingEntry::Paint(_) => EntryType::Paint,
            TimingEntry::LargestContentfulPaint(_) => EntryType::LargestContentfulPaint,
            TimingEntry::FirstInput(_) => EntryType::FirstInput,
            TimingEntry::LayoutShift(_) => EntryType::LayoutShift,
            TimingEntry::Navigation(_) => EntryType::Navigation,
            TimingEntry::Event(_) => EntryType::Event,
        }
    }

    /// The entry's duration, where the category carries one
    pub fn duration(&self) -> Option<f64> {
        match self {
            TimingEntry::FirstInput(timing) | TimingEntry::Event(timing) => Some(timing.duration),
            _ => None,
        }
    }

    pub fn paint(name: impl Into<String>, start_time: f64) -> Self {
        TimingEntry::Paint(PaintTiming { name: name.into(), start_time })
    }

    pub fn largest_contentful_paint(start_time: f64) -> Self {
        TimingEntry::LargestContentfulPaint(LargestContentfulPaint { start_time })
    }

    pub fn first_input(start_time: f64, processing_start: f64, duration: f64) -> Self {
        TimingEntry::FirstInput(EventTiming { name: String::new(), start_time, processing_start, duration })
    }

    pub fn layout_shift(value: f64, had_recent_input: bool) -> Self {
        TimingEntry::LayoutShift(LayoutShift { value, had_recent_input })
    }

    pub fn event(name: impl Into<String>, start_time: f64, duration: f64) -> Self {
        TimingEntry::Event(EventTiming { name: name.into(), start_time, processing_start: start_time, duration })
    }

    pub fn navigation(timing: NavigationTiming) -> Self {
        TimingEntry::Navigation(Box::new(timing))
    }
}
