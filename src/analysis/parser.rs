//! Line-oriented parser for the label grammar the backend is asked to reply
//! in. One state per bullet section; labels may arrive in any order; any
//! missing or malformed field degrades to a default plus a visible
//! "parse incomplete" detail entry. Parsing is total: it never fails.

use chrono::Utc;
use crate::models::{
    AnalysisResult, AnalysisStatus, FindingSeverity, PipelineVerdict,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum BulletSection {
    None,
    Details,
    Actions,
    Critical,
    Warnings,
    Passed,
}

/// Match `LABEL:` at the start of a trimmed line, case-insensitive, with
/// optional whitespace before the colon. Returns the text after the colon.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    let head = trimmed.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    trimmed.get(label.len()..)?.trim_start().strip_prefix(':')
}

fn bullet_text(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Parse one per-report backend reply into an AnalysisResult.
pub fn parse_analysis(category: &str, text: &str) -> AnalysisResult {
    let mut status = None;
    let mut severity = None;
    let mut findings_count = None;
    let mut summary = None;
    let mut details = Vec::new();
    let mut actions = Vec::new();
    let mut problems: Vec<String> = Vec::new();
    let mut section = BulletSection::None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(rest) = strip_label(line, "STATUS") {
            section = BulletSection::None;
            match AnalysisStatus::from_label(rest) {
                Some(s) => status = Some(s),
                None => problems.push(format!("unrecognized STATUS value: {}", rest.trim())),
            }
        } else if let Some(rest) = strip_label(line, "SEVERITY") {
            section = BulletSection::None;
            match FindingSeverity::from_label(rest) {
                Some(s) => severity = Some(s),
                None => problems.push(format!("unrecognized SEVERITY value: {}", rest.trim())),
            }
        } else if let Some(rest) = strip_label(line, "FINDINGS") {
            section = BulletSection::None;
            match rest.trim().parse::<u32>() {
                Ok(n) => findings_count = Some(n),
                Err(_) => problems.push(format!("unrecognized FINDINGS value: {}", rest.trim())),
            }
        } else if let Some(rest) = strip_label(line, "SUMMARY") {
            section = BulletSection::None;
            let rest = rest.trim();
            if !rest.is_empty() {
                summary = Some(rest.to_string());
            }
        } else if let Some(rest) = strip_label(line, "DETAILS") {
            section = BulletSection::Details;
            if let Some(inline) = non_empty(rest) {
                details.push(inline);
            }
        } else if let Some(rest) = strip_label(line, "ACTIONS") {
            section = BulletSection::Actions;
            if let Some(inline) = non_empty(rest) {
                actions.push(inline);
            }
        } else if let Some(item) = bullet_text(line) {
            match section {
                BulletSection::Details => details.push(item.to_string()),
                BulletSection::Actions => actions.push(item.to_string()),
                _ => {} // stray bullet outside any section
            }
        }
        // Anything else is free text around the labels; ignore it.
    }

    let mut missing = Vec::new();
    if status.is_none() {
        missing.push("STATUS");
    }
    if severity.is_none() {
        missing.push("SEVERITY");
    }
    if !missing.is_empty() || !problems.is_empty() {
        let mut note = String::from("parse incomplete");
        if !missing.is_empty() {
            note.push_str(&format!(": missing {}", missing.join(", ")));
        }
        for p in &problems {
            note.push_str(&format!("; {}", p));
        }
        details.push(note);
    }

    AnalysisResult {
        source_category: category.to_string(),
        status: status.unwrap_or(AnalysisStatus::Unknown),
        severity: severity.unwrap_or(FindingSeverity::None),
        findings_count: findings_count.unwrap_or(0),
        summary: summary.unwrap_or_else(|| format!("{}: no summary provided", category)),
        details,
        actions,
    }
}

/// Parse the pipeline-level consolidated reply. Returns None when the reply
/// carries no usable OVERALL_STATUS, in which case the caller falls back to
/// the deterministic local aggregation.
pub fn parse_verdict(text: &str) -> Option<PipelineVerdict> {
    let mut overall_status = None;
    let mut verdict_line = None;
    let mut recommendation = None;
    let mut critical_items = Vec::new();
    let mut warning_items = Vec::new();
    let mut passed_items = Vec::new();
    let mut section = BulletSection::None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(rest) = strip_label(line, "OVERALL_STATUS") {
            section = BulletSection::None;
            overall_status = AnalysisStatus::from_label(rest);
        } else if let Some(rest) = strip_label(line, "VERDICT") {
            section = BulletSection::None;
            if let Some(v) = non_empty(rest) {
                verdict_line = Some(v);
            }
        } else if let Some(rest) = strip_label(line, "RECOMMENDATION") {
            section = BulletSection::None;
            if let Some(r) = non_empty(rest) {
                recommendation = Some(r);
            }
        } else if let Some(rest) = strip_label(line, "CRITICAL") {
            section = BulletSection::Critical;
            if let Some(inline) = non_empty(rest) {
                critical_items.push(inline);
            }
        } else if let Some(rest) = strip_label(line, "WARNINGS") {
            section = BulletSection::Warnings;
            if let Some(inline) = non_empty(rest) {
                warning_items.push(inline);
            }
        } else if let Some(rest) = strip_label(line, "PASSED") {
            section = BulletSection::Passed;
            if let Some(inline) = non_empty(rest) {
                passed_items.push(inline);
            }
        } else if let Some(item) = bullet_text(line) {
            match section {
                BulletSection::Critical => critical_items.push(item.to_string()),
                BulletSection::Warnings => warning_items.push(item.to_string()),
                BulletSection::Passed => passed_items.push(item.to_string()),
                _ => {}
            }
        }
    }

    let overall_status = overall_status?;
    Some(PipelineVerdict {
        overall_status,
        verdict_line: verdict_line
            .unwrap_or_else(|| format!("Pipeline security review: {}", overall_status)),
        critical_items,
        warning_items,
        passed_items,
        recommendation: recommendation.unwrap_or_default(),
        generated_at: Utc::now(),
    })
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
STATUS: WARN
SEVERITY: HIGH
FINDINGS: 2
SUMMARY: 2 high severity dependency vulnerabilities
DETAILS:
- lodash 4.17.20 prototype pollution
- minimist 1.2.5 argument injection
ACTIONS:
- Upgrade lodash to 4.17.21
- Upgrade minimist to 1.2.6
";

    #[test]
    fn test_parse_well_formed() {
        let result = parse_analysis("Dependency Vulnerability Scan", WELL_FORMED);
        assert_eq!(result.status, AnalysisStatus::Warn);
        assert_eq!(result.severity, FindingSeverity::High);
        assert_eq!(result.findings_count, 2);
        assert_eq!(result.summary, "2 high severity dependency vulnerabilities");
        assert_eq!(result.details.len(), 2);
        assert_eq!(result.actions.len(), 2);
    }

    #[test]
    fn test_parse_out_of_order_fields() {
        let text = "SUMMARY: fine\nSEVERITY: NONE\nSTATUS: PASS\nFINDINGS: 0\n";
        let result = parse_analysis("Secret Detection", text);
        assert_eq!(result.status, AnalysisStatus::Pass);
        assert_eq!(result.severity, FindingSeverity::None);
        assert!(result.details.is_empty());
    }

    #[test]
    fn test_parse_extra_whitespace_and_case() {
        let text = "  status :  pass  \n  severity:   none\nsummary:  all clear \n";
        let result = parse_analysis("Secret Detection", text);
        assert_eq!(result.status, AnalysisStatus::Pass);
        assert_eq!(result.severity, FindingSeverity::None);
        assert_eq!(result.summary, "all clear");
    }

    #[test]
    fn test_parse_empty_input_is_total() {
        let result = parse_analysis("Semgrep SAST Scan", "");
        assert_eq!(result.status, AnalysisStatus::Unknown);
        assert_eq!(result.severity, FindingSeverity::None);
        assert!(result.details.iter().any(|d| d.contains("parse incomplete")));
    }

    #[test]
    fn test_parse_freeform_chatter_is_total() {
        let text = "Sure! I looked at the report and everything seems mostly okay to me.";
        let result = parse_analysis("Pipeline Summary", text);
        assert_eq!(result.status, AnalysisStatus::Unknown);
        assert!(result.details.iter().any(|d| d.contains("missing STATUS")));
    }

    #[test]
    fn test_parse_malformed_status_degrades() {
        let text = "STATUS: maybe fine\nSEVERITY: HIGH\n";
        let result = parse_analysis("Gitleaks Secret Scan", text);
        assert_eq!(result.status, AnalysisStatus::Unknown);
        // Severity parsed fine, status problem surfaced
        assert_eq!(result.severity, FindingSeverity::High);
        assert!(result.details.iter().any(|d| d.contains("unrecognized STATUS")));
    }

    #[test]
    fn test_parse_malformed_findings_count() {
        let text = "STATUS: PASS\nSEVERITY: NONE\nFINDINGS: a few\n";
        let result = parse_analysis("Secret Detection", text);
        assert_eq!(result.findings_count, 0);
        assert!(result.details.iter().any(|d| d.contains("unrecognized FINDINGS")));
    }

    #[test]
    fn test_status_label_does_not_match_overall_status() {
        let result = parse_analysis("x", "OVERALL_STATUS: FAIL\n");
        // Per-report parser must not pick up the pipeline-level label
        assert_eq!(result.status, AnalysisStatus::Unknown);
    }

    #[test]
    fn test_parse_verdict_well_formed() {
        let text = "\
OVERALL_STATUS: WARN
VERDICT: One scanner reported warnings
CRITICAL:
WARNINGS:
- 2 dependency vulnerabilities
PASSED:
- Secret Detection
- Semgrep SAST Scan
RECOMMENDATION: Upgrade the affected packages
";
        let verdict = parse_verdict(text).unwrap();
        assert_eq!(verdict.overall_status, AnalysisStatus::Warn);
        assert_eq!(verdict.warning_items, vec!["2 dependency vulnerabilities"]);
        assert_eq!(verdict.passed_items.len(), 2);
        assert!(verdict.critical_items.is_empty());
        assert_eq!(verdict.recommendation, "Upgrade the affected packages");
    }

    #[test]
    fn test_parse_verdict_without_status_is_none() {
        assert!(parse_verdict("VERDICT: looks good\n").is_none());
        assert!(parse_verdict("").is_none());
    }

    #[test]
    fn test_parse_verdict_defaults_verdict_line() {
        let verdict = parse_verdict("OVERALL_STATUS: PASS\n").unwrap();
        assert!(verdict.verdict_line.contains("PASS"));
    }
}
