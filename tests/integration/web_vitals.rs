use std::time::Duration;

use tracing_subscriber::EnvFilter;
use web_metrics::prelude::*;

use crate::common::{sample_batch, TestEnvironmentBuilder};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

#[tokio::test]
async fn test_page_load_end_to_end() -> Result<()> {
    init_tracing();
    let test = TestEnvironmentBuilder::new().build();
    let collector = Collector::new(test.env.clone());

    assert_eq!(collector.start(), StartStatus::Started);
    test.source.emit(sample_batch());

    let delivered = test.source.spawn_delivery(Duration::from_millis(0)).await.expect("delivery task");
    assert_eq!(delivered, 1);

    let snapshot = collector.snapshot().expect("supported environment");
    let vitals = snapshot.vitals();
    assert_eq!(vitals.fcp.map(|m| m.value), Some(123.0));
    assert_eq!(vitals.lcp.map(|m| m.value), Some(456.0));
    assert_eq!(vitals.fid.map(|m| m.value), Some(11.0));
    assert_eq!(vitals.fi.map(|m| m.value), Some(789.0));
    assert_eq!(vitals.inp.map(|m| m.value), Some(50.0));
    assert_eq!(vitals.cls.map(|m| m.value), Some(1.0));

    let timing = &snapshot.navigation.timing;
    assert_eq!(timing.ttfb, Some(300.0));
    assert_eq!(timing.transfer_size, Some(12345));
    assert_eq!(timing.decoded_body_size, Some(67890));
    assert_eq!(timing.navigation, Some(1100.0));
    assert_eq!(timing.name.as_deref(), Some("https://example.com"));

    let device = snapshot.device.as_ref().expect("device captured with navigation");
    assert_eq!((device.width, device.height), (1280, 800));
    assert!(!device.mobile);
    assert!(!device.bfcache);

    Ok(())
}

#[tokio::test]
async fn test_page_load_json_shape() -> Result<()> {
    let test = TestEnvironmentBuilder::new().build();
    let collector = Collector::new(test.env.clone());
    collector.start();
    test.source.emit(sample_batch());
    test.source.spawn_delivery(Duration::from_millis(1)).await.expect("delivery task");

    let json: serde_json::Value = serde_json::from_str(&collector.snapshot().expect("snapshot").to_json()?)?;
    let navigation = &json["navigation"];

    assert_eq!(navigation["FCP"]["value"], 123.0);
    assert_eq!(navigation["LCP"]["value"], 456.0);
    assert_eq!(navigation["FID"]["value"], 11.0);
    assert_eq!(navigation["INP"]["value"], 50.0);
    assert_eq!(navigation["CLS"]["value"], 1.0);
    assert_eq!(navigation["TTFB"], 300.0);
    assert_eq!(navigation["transferSize"], 12345);
    assert_eq!(navigation["decodedBodySize"], 67890);
    assert_eq!(navigation["type"], "navigate");
    assert_eq!(navigation["processingToDI"], 100.0);
    // secureConnectionStart is zero in the fixture, so TCP would be negative
    assert!(navigation.get("TCP").is_none());
    assert_eq!(json["device"]["visibilityState"], "visible");

    Ok(())
}

#[tokio::test]
async fn test_entries_before_delivery_are_not_visible() {
    let test = TestEnvironmentBuilder::new().build();
    let collector = Collector::new(test.env.clone());
    collector.start();

    test.source.emit(sample_batch());
    let before = collector.snapshot().expect("snapshot");
    assert_eq!(before.vitals().fcp, None);
    assert!(before.device.is_none());

    test.source.spawn_delivery(Duration::from_millis(5)).await.expect("delivery task");
    assert!(collector.snapshot().expect("snapshot").device.is_some());
}

#[tokio::test]
async fn test_interactions_after_load_raise_inp() {
    let test = TestEnvironmentBuilder::new().build();
    let collector = Collector::new(test.env.clone());
    collector.start();
    test.source.emit(sample_batch());
    test.source.spawn_delivery(Duration::ZERO).await.expect("delivery task");

    test.source.emit(vec![
        TimingEntry::event("pointerdown", 2000.0, 24.0),
        TimingEntry::event("click", 2100.0, 180.0),
        TimingEntry::event("keyup", 2300.0, 96.0),
    ]);
    test.source.spawn_delivery(Duration::ZERO).await.expect("delivery task");

    let snapshot = collector.snapshot().expect("snapshot");
    // pointerdown falls under the 32ms threshold and is never delivered
    assert_eq!(snapshot.vitals().inp.map(|m| m.value), Some(180.0));
    // Navigation metrics are unchanged by later entries
    assert_eq!(snapshot.navigation.timing.ttfb, Some(300.0));
}
