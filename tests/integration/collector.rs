use std::sync::Arc;
use std::thread;

use web_metrics::host::simulated::SimulatedHost;
use web_metrics::host::{ConnectionInfo, Environment, UnsupportedReason, VisibilityState};
use web_metrics::prelude::*;

use crate::common::{sample_batch, TestEnvironmentBuilder, TestNavigationBuilder};

const IPHONE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 \
                                 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

#[test]
fn test_outside_a_browser_nothing_is_collected() {
    let collector = Collector::new(Environment::unavailable());

    assert_eq!(collector.support(), Support::Unsupported(UnsupportedReason::NoInstrumentation));
    assert_eq!(collector.start(), StartStatus::Unsupported(UnsupportedReason::NoInstrumentation));
    assert!(collector.snapshot().is_none());
}

#[test]
fn test_host_without_lcp_is_unsupported() {
    let test = TestEnvironmentBuilder::new().supported(&[EntryType::Paint, EntryType::Navigation]).build();
    let collector = Collector::new(test.env.clone());

    assert_eq!(
        collector.start(),
        StartStatus::Unsupported(UnsupportedReason::MissingEntryType(EntryType::LargestContentfulPaint))
    );
    assert_eq!(test.source.observer_count(), 0);
    assert_eq!(test.host.restore_listener_count(), 0);
}

#[test]
fn test_unsupported_optional_categories_are_skipped() {
    let test = TestEnvironmentBuilder::new()
        .supported(&[EntryType::Paint, EntryType::LargestContentfulPaint, EntryType::Navigation])
        .build();
    let collector = Collector::new(test.env.clone());

    assert_eq!(collector.start(), StartStatus::Started);
    assert_eq!(test.source.observation_count(), 3);

    test.source.emit(sample_batch());
    test.source.flush();

    let snapshot = collector.snapshot().expect("snapshot");
    assert_eq!(snapshot.vitals().fcp.map(|m| m.value), Some(123.0));
    assert_eq!(snapshot.vitals().fid, None);
    assert_eq!(snapshot.vitals().cls, None);
    assert_eq!(snapshot.navigation.timing.ttfb, Some(300.0));
}

#[test]
fn test_rejected_category_does_not_stop_collection() {
    let test = TestEnvironmentBuilder::new().reject(EntryType::FirstInput).build();
    let collector = Collector::new(test.env.clone());

    assert_eq!(collector.start(), StartStatus::Started);
    test.source.emit(sample_batch());
    test.source.flush();

    let vitals = *collector.snapshot().expect("snapshot").vitals();
    assert_eq!(vitals.fid, None);
    assert_eq!(vitals.inp, None);
    assert_eq!(vitals.lcp.map(|m| m.value), Some(456.0));
    assert_eq!(vitals.cls.map(|m| m.value), Some(1.0));
}

#[test]
fn test_device_capture_reads_host_state() {
    let connection = ConnectionInfo {
        effective_type: Some("4g".to_string()),
        downlink: Some(10.0),
        rtt: Some(50.0),
        save_data: Some(false),
    };
    let test = TestEnvironmentBuilder::new()
        .viewport(390, 844)
        .user_agent(IPHONE_USER_AGENT)
        .connection(connection.clone())
        .hidden()
        .build();
    let collector = Collector::new(test.env.clone());
    collector.start();

    test.source.emit(vec![TestNavigationBuilder::new().entry()]);
    test.source.flush();

    let device = collector.snapshot().expect("snapshot").device.expect("device");
    assert_eq!((device.width, device.height), (390, 844));
    assert!(device.mobile);
    assert_eq!(device.visibility_state, VisibilityState::Hidden);
    assert_eq!(device.user_agent, IPHONE_USER_AGENT);
    assert_eq!(device.connection, Some(connection));
}

#[test]
fn test_device_is_captured_at_navigation_time() {
    let test = TestEnvironmentBuilder::new().build();
    let collector = Collector::new(test.env.clone());
    collector.start();
    test.source.emit(vec![TestNavigationBuilder::new().entry()]);
    test.source.flush();

    test.host.set_visibility_state(VisibilityState::Hidden);

    let device = collector.snapshot().expect("snapshot").device.expect("device");
    assert_eq!(device.visibility_state, VisibilityState::Visible);
}

#[test]
fn test_later_navigation_entry_replaces_page_metrics() {
    let test = TestEnvironmentBuilder::new().build();
    let collector = Collector::new(test.env.clone());
    collector.start();

    test.source.emit(vec![TestNavigationBuilder::new().entry()]);
    test.source.emit(vec![TestNavigationBuilder::new().name("https://example.com/next").response(10.0, 40.0, 90.0).entry()]);
    test.source.flush();

    let timing = collector.snapshot().expect("snapshot").navigation.timing;
    assert_eq!(timing.name.as_deref(), Some("https://example.com/next"));
    assert_eq!(timing.ttfb, Some(40.0));
    assert_eq!(timing.request, Some(30.0));
}

#[test]
fn test_bfcache_restore_before_navigation_entry() {
    let test = TestEnvironmentBuilder::new().build();
    let collector = Collector::new(test.env.clone());
    collector.start();

    assert_eq!(test.host.fire_page_show(true), 1);
    // One-shot: a second page show finds no listener
    assert_eq!(test.host.fire_page_show(false), 0);

    test.source.emit(vec![TestNavigationBuilder::new().entry()]);
    test.source.flush();

    assert!(collector.snapshot().expect("snapshot").device.expect("device").bfcache);
}

#[test]
fn test_two_collectors_are_independent() {
    let test = TestEnvironmentBuilder::new().build();
    let first = Collector::new(test.env.clone());
    let second = Collector::with_config(test.env.clone(), CollectorConfig::default().with_lcp_strategy(LcpStrategy::Largest));
    first.start();
    second.start();
    assert_eq!(test.source.observer_count(), 2);

    test.source.emit(vec![TimingEntry::largest_contentful_paint(900.0), TimingEntry::largest_contentful_paint(456.0)]);
    test.source.flush();

    assert_eq!(first.snapshot().expect("snapshot").vitals().lcp.map(|m| m.value), Some(456.0));
    assert_eq!(second.snapshot().expect("snapshot").vitals().lcp.map(|m| m.value), Some(900.0));
}

#[test]
fn test_readers_on_other_threads_see_whole_batches() {
    let test = TestEnvironmentBuilder::new().build();
    let collector = Collector::new(test.env.clone());
    collector.start();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let reader = collector.reader();
            thread::spawn(move || {
                for _ in 0..100 {
                    let snapshot = reader.snapshot().expect("snapshot");
                    // The navigation entry and FCP arrive in the same batch
                    assert_eq!(snapshot.device.is_some(), snapshot.vitals().fcp.is_some());
                }
            })
        })
        .collect();

    test.source.emit(vec![TimingEntry::paint("first-contentful-paint", 123.0), TestNavigationBuilder::new().entry()]);
    test.source.flush();

    for reader in readers {
        reader.join().expect("reader thread");
    }
}

#[test]
fn test_environment_can_be_assembled_piecewise() {
    let source = Arc::new(web_metrics::host::simulated::SimulatedInstrumentation::new());
    let env = Environment::unavailable().with_instrumentation(source.clone()).with_host(Arc::new(SimulatedHost::new()));

    assert!(env.support().is_supported());
    assert_eq!(Collector::new(env).start(), StartStatus::Started);
    assert_eq!(source.observation_count(), 6);
}
