use std::path::PathBuf;
use std::time::Duration;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::errors::TriageError;
use crate::models::PipelineVerdict;
use super::payload::NotificationPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Webhook accepted the message.
    Delivered,
    /// Payload written to the retained artifact (no sink, or delivery failed).
    StoredArtifact,
    /// Neither delivery nor artifact storage worked; payload only in logs.
    Failed,
}

/// Delivers the final verdict. Never raises: delivery failure degrades to
/// artifact storage, and artifact storage failure is only logged. The run's
/// exit status is unaffected by anything that happens here.
pub struct Notifier {
    client: Client,
    webhook_url: Option<String>,
    timeout: Duration,
    artifact_path: PathBuf,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>, timeout: Duration, artifact_path: PathBuf) -> Self {
        Self {
            client: Client::new(),
            webhook_url: webhook_url.filter(|u| !u.is_empty()),
            timeout,
            artifact_path,
        }
    }

    pub async fn notify(
        &self,
        verdict: &PipelineVerdict,
        action_url: Option<&str>,
    ) -> (NotificationPayload, DeliveryOutcome) {
        let payload = NotificationPayload::from_verdict(verdict, action_url);

        let outcome = match &self.webhook_url {
            Some(url) => match self.post(url, &payload).await {
                Ok(()) => {
                    info!(status = %verdict.overall_status, "Notification delivered to webhook");
                    DeliveryOutcome::Delivered
                }
                Err(e) => {
                    warn!(error = %e, "Webhook delivery failed; storing payload artifact");
                    self.store(&payload).await
                }
            },
            None => {
                debug!("No webhook configured; storing payload artifact");
                self.store(&payload).await
            }
        };

        (payload, outcome)
    }

    async fn post(&self, url: &str, payload: &NotificationPayload) -> Result<(), TriageError> {
        let resp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&payload.to_message())
            .send()
            .await
            .map_err(|e| TriageError::Delivery(format!("webhook POST failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TriageError::Delivery(format!(
                "webhook rejected payload: {}",
                status
            )));
        }
        Ok(())
    }

    async fn store(&self, payload: &NotificationPayload) -> DeliveryOutcome {
        if let Some(parent) = self.artifact_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!(path = %self.artifact_path.display(), error = %e, "Cannot create artifact directory");
                return DeliveryOutcome::Failed;
            }
        }

        let json = match serde_json::to_string_pretty(payload) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Cannot serialize notification payload");
                return DeliveryOutcome::Failed;
            }
        };

        match tokio::fs::write(&self.artifact_path, json).await {
            Ok(()) => {
                info!(path = %self.artifact_path.display(), "Notification payload stored as artifact");
                DeliveryOutcome::StoredArtifact
            }
            Err(e) => {
                error!(path = %self.artifact_path.display(), error = %e, "Cannot write notification artifact");
                DeliveryOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_no_webhook_stores_artifact() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("notification.json");
        let notifier = Notifier::new(None, Duration::from_secs(5), artifact.clone());

        let (_, outcome) = notifier.notify(&PipelineVerdict::fallback(), None).await;
        assert_eq!(outcome, DeliveryOutcome::StoredArtifact);

        let stored = std::fs::read_to_string(&artifact).unwrap();
        let payload: NotificationPayload = serde_json::from_str(&stored).unwrap();
        assert!(payload.title_line.contains("UNKNOWN"));
    }

    #[tokio::test]
    async fn test_unreachable_webhook_degrades_to_artifact() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("notification.json");
        // Port 1 refuses connections
        let notifier = Notifier::new(
            Some("http://127.0.0.1:1/hook".to_string()),
            Duration::from_secs(2),
            artifact.clone(),
        );

        let (_, outcome) = notifier.notify(&PipelineVerdict::fallback(), None).await;
        assert_eq!(outcome, DeliveryOutcome::StoredArtifact);
        assert!(artifact.exists());
    }

    #[tokio::test]
    async fn test_empty_webhook_url_treated_as_unconfigured() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("notification.json");
        let notifier = Notifier::new(Some(String::new()), Duration::from_secs(2), artifact.clone());

        let (_, outcome) = notifier.notify(&PipelineVerdict::fallback(), None).await;
        assert_eq!(outcome, DeliveryOutcome::StoredArtifact);
    }
}
