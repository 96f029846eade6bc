use serde::{Deserialize, Serialize};

/// Outcome class for one analyzed report.
///
/// Aggregation ordering: FAIL > WARN > PASS > UNKNOWN. A report the backend
/// never judged cannot outrank an explicit result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Pass,
    Warn,
    Fail,
    Unknown,
}

impl AnalysisStatus {
    /// Numeric rank for worst-status aggregation. Higher is worse; UNKNOWN
    /// ranks below PASS.
    pub fn rank(&self) -> u8 {
        match self {
            AnalysisStatus::Fail => 3,
            AnalysisStatus::Warn => 2,
            AnalysisStatus::Pass => 1,
            AnalysisStatus::Unknown => 0,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            AnalysisStatus::Pass => "PASS",
            AnalysisStatus::Warn => "WARN",
            AnalysisStatus::Fail => "FAIL",
            AnalysisStatus::Unknown => "UNKNOWN",
        }
    }

    /// Parse a status label from backend text. Tolerates surrounding
    /// whitespace and case differences; anything else is None.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PASS" => Some(AnalysisStatus::Pass),
            "WARN" | "WARNING" => Some(AnalysisStatus::Warn),
            "FAIL" | "FAILED" => Some(AnalysisStatus::Fail),
            "UNKNOWN" => Some(AnalysisStatus::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Severity attributed to the findings inside one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingSeverity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl FindingSeverity {
    pub fn rank(&self) -> u8 {
        match self {
            FindingSeverity::None => 0,
            FindingSeverity::Low => 1,
            FindingSeverity::Medium => 2,
            FindingSeverity::High => 3,
            FindingSeverity::Critical => 4,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            FindingSeverity::None => "NONE",
            FindingSeverity::Low => "LOW",
            FindingSeverity::Medium => "MEDIUM",
            FindingSeverity::High => "HIGH",
            FindingSeverity::Critical => "CRITICAL",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Some(FindingSeverity::None),
            "LOW" => Some(FindingSeverity::Low),
            "MEDIUM" | "MODERATE" => Some(FindingSeverity::Medium),
            "HIGH" => Some(FindingSeverity::High),
            "CRITICAL" => Some(FindingSeverity::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Structured verdict for one scanner report.
///
/// Always fully populated: analysis and parse failures produce an
/// UNKNOWN/NONE result carrying the failure reason as a detail line, so the
/// aggregator never has to skip a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub source_category: String,
    pub status: AnalysisStatus,
    pub severity: FindingSeverity,
    pub findings_count: u32,
    pub summary: String,
    pub details: Vec<String>,
    pub actions: Vec<String>,
}

impl AnalysisResult {
    /// Best-effort result for a report that could not be analyzed.
    pub fn degraded(category: &str, reason: &str) -> Self {
        Self {
            source_category: category.to_string(),
            status: AnalysisStatus::Unknown,
            severity: FindingSeverity::None,
            findings_count: 0,
            summary: format!("{}: analysis unavailable", category),
            details: vec![reason.to_string()],
            actions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rank_ordering() {
        assert!(AnalysisStatus::Fail.rank() > AnalysisStatus::Warn.rank());
        assert!(AnalysisStatus::Warn.rank() > AnalysisStatus::Pass.rank());
        assert!(AnalysisStatus::Pass.rank() > AnalysisStatus::Unknown.rank());
    }

    #[test]
    fn test_status_from_label_tolerant() {
        assert_eq!(AnalysisStatus::from_label("  pass "), Some(AnalysisStatus::Pass));
        assert_eq!(AnalysisStatus::from_label("WARNING"), Some(AnalysisStatus::Warn));
        assert_eq!(AnalysisStatus::from_label("Failed"), Some(AnalysisStatus::Fail));
        assert_eq!(AnalysisStatus::from_label("maybe"), None);
    }

    #[test]
    fn test_severity_from_label_tolerant() {
        assert_eq!(FindingSeverity::from_label("critical"), Some(FindingSeverity::Critical));
        assert_eq!(FindingSeverity::from_label(" Moderate"), Some(FindingSeverity::Medium));
        assert_eq!(FindingSeverity::from_label("n/a"), None);
    }

    #[test]
    fn test_status_serde_screaming_snake() {
        let json = serde_json::to_string(&AnalysisStatus::Unknown).unwrap();
        assert_eq!(json, "\"UNKNOWN\"");
        let parsed: AnalysisStatus = serde_json::from_str("\"FAIL\"").unwrap();
        assert_eq!(parsed, AnalysisStatus::Fail);
    }

    #[test]
    fn test_degraded_result_is_fully_populated() {
        let result = AnalysisResult::degraded("Dependency Vulnerability Scan", "backend unreachable");
        assert_eq!(result.status, AnalysisStatus::Unknown);
        assert_eq!(result.severity, FindingSeverity::None);
        assert_eq!(result.findings_count, 0);
        assert!(!result.summary.is_empty());
        assert_eq!(result.details, vec!["backend unreachable".to_string()]);
    }
}
