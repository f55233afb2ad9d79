//! Browser bindings
//!
//! [`WebInstrumentation`] drives the page's `PerformanceObserver` and
//! [`WebHost`] reads window, document and navigator state. JS handles are not
//! `Send`, so observers and their callbacks live in a thread-local registry
//! keyed by [`ObserverId`] and both types hold no JS state themselves.
//!
//! Entry fields are read with `Reflect` so the bindings do not depend on which
//! timing interfaces a given `web-sys` build exposes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::PerformanceObserver;

use crate::collector::Collector;
use crate::entry::{EntryType, EventTiming, LayoutShift, LargestContentfulPaint, NavigationTiming, PaintTiming, TimingEntry};
use crate::error::{Error, Result};
use crate::host::{
    BatchHandler, ConnectionInfo, Environment, HostEnvironment, InstrumentationSource, ObserveOptions, ObserverId,
    RestoreCallback, Viewport, VisibilityState,
};

struct Registration {
    observer: PerformanceObserver,
    _callback: Closure<dyn FnMut(JsValue)>,
}

thread_local! {
    static OBSERVERS: RefCell<HashMap<ObserverId, Registration>> = RefCell::new(HashMap::new());
    static COLLECTOR: RefCell<Option<Collector>> = const { RefCell::new(None) };
}

static NEXT_OBSERVER: AtomicU64 = AtomicU64::new(1);

fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn number(target: &JsValue, key: &str) -> Option<f64> {
    get(target, key).as_f64()
}

fn string(target: &JsValue, key: &str) -> String {
    get(target, key).as_string().unwrap_or_default()
}

fn js_error(context: &str, value: JsValue) -> String {
    match value.as_string() {
        Some(message) => format!("{context}: {message}"),
        None => format!("{context}: {value:?}"),
    }
}

fn performance_observer_class() -> Option<JsValue> {
    let class = get(&js_sys::global(), "PerformanceObserver");
    (!class.is_undefined() && !class.is_null()).then_some(class)
}

/// Convert one JS `PerformanceEntry`; categories the collector does not handle yield `None`
fn to_timing_entry(entry: &JsValue) -> Option<TimingEntry> {
    let entry_type: EntryType = string(entry, "entryType").parse().ok()?;
    let start_time = number(entry, "startTime").unwrap_or(0.0);

    let event = || EventTiming {
        name: string(entry, "name"),
        start_time,
        processing_start: number(entry, "processingStart").unwrap_or(start_time),
        duration: number(entry, "duration").unwrap_or(0.0),
    };

    Some(match entry_type {
        EntryType::Paint => TimingEntry::Paint(PaintTiming { name: string(entry, "name"), start_time }),
        EntryType::LargestContentfulPaint => TimingEntry::LargestContentfulPaint(LargestContentfulPaint { start_time }),
        EntryType::FirstInput => TimingEntry::FirstInput(event()),
        EntryType::Event => TimingEntry::Event(event()),
        EntryType::LayoutShift => TimingEntry::LayoutShift(LayoutShift {
            value: number(entry, "value").unwrap_or(0.0),
            had_recent_input: get(entry, "hadRecentInput").as_bool().unwrap_or(false),
        }),
        EntryType::Navigation => TimingEntry::navigation(navigation_timing(entry)),
    })
}

fn navigation_timing(entry: &JsValue) -> NavigationTiming {
    let ts = |key: &str| number(entry, key).unwrap_or(f64::NAN);
    let size = |key: &str| number(entry, key).filter(|v| *v >= 0.0).map(|v| v as u64);

    NavigationTiming {
        name: string(entry, "name"),
        navigation_type: string(entry, "type"),
        start_time: ts("startTime"),
        redirect_start: ts("redirectStart"),
        redirect_end: ts("redirectEnd"),
        worker_start: ts("workerStart"),
        fetch_start: ts("fetchStart"),
        domain_lookup_start: ts("domainLookupStart"),
        domain_lookup_end: ts("domainLookupEnd"),
        connect_start: ts("connectStart"),
        connect_end: ts("connectEnd"),
        secure_connection_start: ts("secureConnectionStart"),
        request_start: ts("requestStart"),
        response_start: ts("responseStart"),
        response_end: ts("responseEnd"),
        dom_interactive: ts("domInteractive"),
        dom_content_loaded_event_start: ts("domContentLoadedEventStart"),
        dom_content_loaded_event_end: ts("domContentLoadedEventEnd"),
        dom_complete: ts("domComplete"),
        load_event_start: ts("loadEventStart"),
        load_event_end: ts("loadEventEnd"),
        redirect_count: number(entry, "redirectCount").map(|v| v as u32),
        transfer_size: size("transferSize"),
        decoded_body_size: size("decodedBodySize"),
    }
}

/// The page's `PerformanceObserver`
#[derive(Debug, Default, Clone, Copy)]
pub struct WebInstrumentation;

impl WebInstrumentation {
    /// `None` when the global scope has no `PerformanceObserver`
    pub fn detect() -> Option<Self> {
        performance_observer_class().map(|_| Self)
    }
}

impl InstrumentationSource for WebInstrumentation {
    fn supported_entry_types(&self) -> Vec<EntryType> {
        let Some(class) = performance_observer_class() else {
            return Vec::new();
        };
        let supported = get(&class, "supportedEntryTypes");
        if !Array::is_array(&supported) {
            return Vec::new();
        }

        Array::from(&supported).iter().filter_map(|name| name.as_string()?.parse().ok()).collect()
    }

    fn create_observer(&self, handler: BatchHandler) -> Result<ObserverId> {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |list: JsValue| {
            let Ok(get_entries) = get(&list, "getEntries").dyn_into::<Function>() else {
                return;
            };
            let Ok(entries) = get_entries.call0(&list) else {
                return;
            };
            let batch: Vec<TimingEntry> = Array::from(&entries).iter().filter_map(|e| to_timing_entry(&e)).collect();
            if !batch.is_empty() {
                handler(&batch);
            }
        });

        let observer = PerformanceObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| Error::host(js_error("PerformanceObserver", e)))?;

        let id = ObserverId(NEXT_OBSERVER.fetch_add(1, Ordering::Relaxed));
        OBSERVERS.with(|observers| {
            observers.borrow_mut().insert(id, Registration { observer, _callback: callback });
        });
        Ok(id)
    }

    fn observe(&self, observer: ObserverId, options: ObserveOptions) -> Result<()> {
        let entry_type = options.entry_type;
        let init = Object::new();
        let set = |key: &str, value: JsValue| {
            Reflect::set(&init, &JsValue::from_str(key), &value)
                .map(|_| ())
                .map_err(|e| Error::subscription(entry_type, js_error("options", e)))
        };
        set("type", JsValue::from_str(entry_type.as_str()))?;
        set("buffered", JsValue::from_bool(options.buffered))?;
        if let Some(threshold) = options.duration_threshold {
            set("durationThreshold", JsValue::from_f64(threshold))?;
        }

        OBSERVERS.with(|observers| {
            let observers = observers.borrow();
            let registration = observers
                .get(&observer)
                .ok_or_else(|| Error::subscription(entry_type, format!("unknown {observer}")))?;
            let target: &JsValue = registration.observer.as_ref();
            let observe = get(target, "observe")
                .dyn_into::<Function>()
                .map_err(|_| Error::subscription(entry_type, "observe is not callable"))?;
            observe.call1(target, &init).map(|_| ()).map_err(|e| Error::subscription(entry_type, js_error("observe", e)))
        })
    }

    fn disconnect(&self, observer: ObserverId) -> Result<()> {
        let registration = OBSERVERS.with(|observers| observers.borrow_mut().remove(&observer));
        match registration {
            Some(registration) => {
                registration.observer.disconnect();
                Ok(())
            }
            None => Err(Error::invalid_data(format!("unknown {observer}"))),
        }
    }
}

/// Window, document and navigator state of the current page
#[derive(Debug, Default, Clone, Copy)]
pub struct WebHost;

impl WebHost {
    /// `None` outside a window context, such as in a worker
    pub fn detect() -> Option<Self> {
        web_sys::window().map(|_| Self)
    }
}

impl HostEnvironment for WebHost {
    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::default();
        };
        let dimension = |value: std::result::Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).map_or(0, |v| v as u32)
        };
        Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
    }

    fn visibility_state(&self) -> VisibilityState {
        match web_sys::window().and_then(|w| w.document()).map(|d| d.visibility_state()) {
            Some(web_sys::VisibilityState::Hidden) => VisibilityState::Hidden,
            _ => VisibilityState::Visible,
        }
    }

    fn user_agent(&self) -> String {
        web_sys::window().and_then(|w| w.navigator().user_agent().ok()).unwrap_or_default()
    }

    fn connection(&self) -> Option<ConnectionInfo> {
        let navigator: JsValue = web_sys::window()?.navigator().into();
        let connection = get(&navigator, "connection");
        if connection.is_undefined() || connection.is_null() {
            return None;
        }

        Some(ConnectionInfo {
            effective_type: get(&connection, "effectiveType").as_string(),
            downlink: number(&connection, "downlink"),
            rtt: number(&connection, "rtt"),
            save_data: get(&connection, "saveData").as_bool(),
        })
    }

    fn on_page_restore(&self, callback: RestoreCallback) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let listener = Closure::once_into_js(move |event: JsValue| {
            callback(get(&event, "persisted").as_bool().unwrap_or(false));
        });

        let options = Object::new();
        if Reflect::set(&options, &JsValue::from_str("once"), &JsValue::TRUE).is_err() {
            tracing::warn!("failed to build pageshow listener options");
        }

        if let Err(e) = window.add_event_listener_with_callback_and_add_event_listener_options(
            "pageshow",
            listener.unchecked_ref(),
            options.unchecked_ref(),
        ) {
            tracing::error!(error = %js_error("pageshow", e), "failed to register page restore listener");
        }
    }
}

impl Environment {
    /// The current page's environment, with each collaborator present only if
    /// the host provides it
    pub fn browser() -> Self {
        Environment {
            instrumentation: WebInstrumentation::detect()
                .map(|source| Arc::new(source) as Arc<dyn InstrumentationSource>),
            host: WebHost::detect().map(|host| Arc::new(host) as Arc<dyn HostEnvironment>),
        }
    }
}

/// Start collecting on the current page; repeated calls are no-ops
#[wasm_bindgen]
pub fn measure() {
    COLLECTOR.with(|slot| {
        let mut slot = slot.borrow_mut();
        let collector = slot.get_or_insert_with(|| Collector::new(Environment::browser()));
        let status = collector.start();
        tracing::debug!(?status, "measure");
    });
}

/// The current metrics as a JSON string, or `undefined` when unsupported
#[wasm_bindgen(js_name = getMetrics)]
pub fn get_metrics() -> Option<String> {
    let snapshot = COLLECTOR.with(|slot| match slot.borrow().as_ref() {
        Some(collector) => collector.snapshot(),
        None => Collector::new(Environment::browser()).snapshot(),
    })?;

    match snapshot.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize metrics");
            None
        }
    }
}
