//! Notifier behavior at the end of the pipeline: delivery degradation and
//! the payload audit round-trip.

use std::time::Duration;

use chrono::Utc;
use tempfile::TempDir;

use scantriage::models::{AnalysisStatus, PipelineVerdict};
use scantriage::notify::{DeliveryOutcome, NotificationPayload, Notifier};

fn warn_verdict() -> PipelineVerdict {
    PipelineVerdict {
        overall_status: AnalysisStatus::Warn,
        verdict_line: "1 of 3 reports raised warnings".into(),
        critical_items: vec![],
        warning_items: vec!["lodash prototype pollution (HIGH)".into()],
        passed_items: vec!["Secret Detection".into(), "Static Application Security Testing".into()],
        recommendation: "Upgrade the affected packages".into(),
        generated_at: Utc::now(),
    }
}

#[tokio::test]
async fn scenario_three_webhook_refused_degrades_to_artifact() {
    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("notification.json");

    // Nothing listens on port 1; the POST is refused
    let notifier = Notifier::new(
        Some("http://127.0.0.1:1/hook".into()),
        Duration::from_secs(2),
        artifact.clone(),
    );

    let (payload, outcome) = notifier.notify(&warn_verdict(), None).await;
    assert_eq!(outcome, DeliveryOutcome::StoredArtifact);
    assert_eq!(payload.color, "warning");

    let stored: NotificationPayload =
        serde_json::from_str(&std::fs::read_to_string(&artifact).unwrap()).unwrap();
    assert_eq!(stored.color, "warning");
}

#[tokio::test]
async fn fallback_verdict_still_produces_gray_payload_and_artifact() {
    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("notification.json");
    let notifier = Notifier::new(None, Duration::from_secs(2), artifact.clone());

    let (payload, outcome) = notifier.notify(&PipelineVerdict::fallback(), None).await;
    assert_eq!(outcome, DeliveryOutcome::StoredArtifact);
    assert_eq!(payload.color, "#6c757d");
    assert_eq!(payload.icon, "ℹ️");
    assert!(artifact.exists());
}

#[tokio::test]
async fn stored_payload_recovers_verdict_fields() {
    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("notification.json");
    let notifier = Notifier::new(None, Duration::from_secs(2), artifact.clone());

    let original = warn_verdict();
    let (_, outcome) = notifier.notify(&original, Some("https://ci.example.com/pipelines/7")).await;
    assert_eq!(outcome, DeliveryOutcome::StoredArtifact);

    let stored: NotificationPayload =
        serde_json::from_str(&std::fs::read_to_string(&artifact).unwrap()).unwrap();
    assert_eq!(stored.action_url.as_deref(), Some("https://ci.example.com/pipelines/7"));

    let recovered = stored.recover_verdict().unwrap();
    assert_eq!(recovered.overall_status, original.overall_status);
    assert_eq!(recovered.verdict_line, original.verdict_line);
    assert_eq!(recovered.warning_items, original.warning_items);
    assert_eq!(recovered.passed_items, original.passed_items);
    assert_eq!(recovered.recommendation, original.recommendation);
}
