use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use super::analysis::AnalysisStatus;

pub const UNAVAILABLE_VERDICT: &str = "AI analysis unavailable - review pipeline logs manually";
pub const UNAVAILABLE_RECOMMENDATION: &str =
    "Review the raw pipeline logs and scanner report artifacts manually.";

/// The single aggregate outcome of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineVerdict {
    pub overall_status: AnalysisStatus,
    pub verdict_line: String,
    pub critical_items: Vec<String>,
    pub warning_items: Vec<String>,
    pub passed_items: Vec<String>,
    pub recommendation: String,
    pub generated_at: DateTime<Utc>,
}

impl PipelineVerdict {
    /// Fixed verdict for the degrade path where no report could be analyzed
    /// at all (empty result set, or backend never reachable).
    pub fn fallback() -> Self {
        Self {
            overall_status: AnalysisStatus::Unknown,
            verdict_line: UNAVAILABLE_VERDICT.to_string(),
            critical_items: Vec::new(),
            warning_items: Vec::new(),
            passed_items: Vec::new(),
            recommendation: UNAVAILABLE_RECOMMENDATION.to_string(),
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_verdict_is_unknown() {
        let verdict = PipelineVerdict::fallback();
        assert_eq!(verdict.overall_status, AnalysisStatus::Unknown);
        assert!(verdict.verdict_line.contains("review pipeline logs"));
        assert!(verdict.recommendation.to_lowercase().contains("manually"));
        assert!(verdict.critical_items.is_empty());
    }

    #[test]
    fn test_verdict_serde_roundtrip() {
        let verdict = PipelineVerdict::fallback();
        let json = serde_json::to_string(&verdict).unwrap();
        let parsed: PipelineVerdict = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.overall_status, AnalysisStatus::Unknown);
        assert_eq!(parsed.verdict_line, verdict.verdict_line);
    }
}
