use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analysis::parser::parse_verdict;
use crate::models::{AnalysisStatus, PipelineVerdict};

/// Presentation tokens for one overall status. The mapping is a fixed table;
/// the same status always yields the same tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub color: &'static str,
    pub icon: &'static str,
}

pub fn presentation_for(status: AnalysisStatus) -> Presentation {
    match status {
        AnalysisStatus::Pass => Presentation { color: "good", icon: "✅" },
        AnalysisStatus::Warn => Presentation { color: "warning", icon: "⚠️" },
        AnalysisStatus::Fail => Presentation { color: "danger", icon: "🚨" },
        AnalysisStatus::Unknown => Presentation { color: "#6c757d", icon: "ℹ️" },
    }
}

/// Webhook-ready presentation of a pipeline verdict.
///
/// The first body block is the verdict rendered in the pipeline label
/// grammar, so the stored payload can be parsed back into the verdict fields
/// for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub color: String,
    pub icon: String,
    pub title_line: String,
    pub body_blocks: Vec<String>,
    pub action_url: Option<String>,
}

impl NotificationPayload {
    pub fn from_verdict(verdict: &PipelineVerdict, action_url: Option<&str>) -> Self {
        let presentation = presentation_for(verdict.overall_status);

        let mut body_blocks = vec![render_verdict_block(verdict)];
        body_blocks.push(format!("Generated at {}", verdict.generated_at.to_rfc3339()));

        Self {
            color: presentation.color.to_string(),
            icon: presentation.icon.to_string(),
            title_line: format!(
                "{} Security Pipeline: {}",
                presentation.icon, verdict.overall_status
            ),
            body_blocks,
            action_url: action_url.map(str::to_string),
        }
    }

    /// The JSON message shape the webhook sink accepts.
    pub fn to_message(&self) -> serde_json::Value {
        let mut message = json!({
            "color": self.color,
            "title": self.title_line,
            "body": self.body_blocks.join("\n\n"),
        });
        if let Some(url) = &self.action_url {
            message["action_url"] = json!(url);
        }
        message
    }

    /// Re-derive the verdict fields from the stored payload text.
    pub fn recover_verdict(&self) -> Option<PipelineVerdict> {
        self.body_blocks.first().and_then(|block| parse_verdict(block))
    }
}

fn render_verdict_block(verdict: &PipelineVerdict) -> String {
    let mut block = format!(
        "OVERALL_STATUS: {}\nVERDICT: {}\n",
        verdict.overall_status, verdict.verdict_line
    );
    if !verdict.critical_items.is_empty() {
        block.push_str("CRITICAL:\n");
        for item in &verdict.critical_items {
            block.push_str(&format!("- {}\n", item));
        }
    }
    if !verdict.warning_items.is_empty() {
        block.push_str("WARNINGS:\n");
        for item in &verdict.warning_items {
            block.push_str(&format!("- {}\n", item));
        }
    }
    if !verdict.passed_items.is_empty() {
        block.push_str("PASSED:\n");
        for item in &verdict.passed_items {
            block.push_str(&format!("- {}\n", item));
        }
    }
    block.push_str(&format!("RECOMMENDATION: {}\n", verdict.recommendation));
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn verdict(status: AnalysisStatus) -> PipelineVerdict {
        PipelineVerdict {
            overall_status: status,
            verdict_line: "one warning".into(),
            critical_items: vec![],
            warning_items: vec!["cve-2024-0001".into()],
            passed_items: vec!["Secret Detection".into()],
            recommendation: "upgrade".into(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_presentation_mapping_is_fixed() {
        assert_eq!(presentation_for(AnalysisStatus::Pass).color, "good");
        assert_eq!(presentation_for(AnalysisStatus::Warn).color, "warning");
        assert_eq!(presentation_for(AnalysisStatus::Fail).color, "danger");
        assert_eq!(presentation_for(AnalysisStatus::Unknown).color, "#6c757d");
        // Pure: repeated calls agree
        assert_eq!(
            presentation_for(AnalysisStatus::Fail),
            presentation_for(AnalysisStatus::Fail)
        );
    }

    #[test]
    fn test_payload_carries_action_url() {
        let payload = NotificationPayload::from_verdict(
            &verdict(AnalysisStatus::Warn),
            Some("https://ci.example.com/pipelines/42"),
        );
        let message = payload.to_message();
        assert_eq!(message["action_url"], "https://ci.example.com/pipelines/42");
        assert_eq!(message["color"], "warning");
    }

    #[test]
    fn test_payload_without_action_url_omits_field() {
        let payload = NotificationPayload::from_verdict(&verdict(AnalysisStatus::Pass), None);
        assert!(payload.to_message().get("action_url").is_none());
    }

    #[test]
    fn test_verdict_roundtrip_through_payload() {
        let original = verdict(AnalysisStatus::Warn);
        let payload = NotificationPayload::from_verdict(&original, None);
        let recovered = payload.recover_verdict().unwrap();
        assert_eq!(recovered.overall_status, original.overall_status);
        assert_eq!(recovered.verdict_line, original.verdict_line);
        assert_eq!(recovered.warning_items, original.warning_items);
        assert_eq!(recovered.passed_items, original.passed_items);
        assert_eq!(recovered.recommendation, original.recommendation);
    }

    #[test]
    fn test_unknown_verdict_is_gray_info() {
        let payload = NotificationPayload::from_verdict(&PipelineVerdict::fallback(), None);
        assert_eq!(payload.color, "#6c757d");
        assert_eq!(payload.icon, "ℹ️");
        assert!(payload.title_line.contains("UNKNOWN"));
    }
}
