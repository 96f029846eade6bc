use crate::models::{AnalysisResult, ReportArtifact};

pub const ANALYST_SYSTEM_PROMPT: &str = "You are a security analyst reviewing automated scanner \
output from a CI pipeline. Judge only what the scanner output supports. Be concise and factual; \
do not speculate about vulnerabilities the report does not show.";

/// Prompt for one scanner report. The reply format is the line-oriented
/// label grammar consumed by `parser::parse_analysis`.
pub fn build_report_prompt(artifact: &ReportArtifact) -> String {
    let truncation_note = if artifact.truncated {
        "\nNote: the report was truncated to fit the analysis budget; treat counts as partial.\n"
    } else {
        ""
    };

    format!(
        "Analyze this \"{category}\" report from a CI security pipeline.\n\
         \n\
         Respond in exactly this format:\n\
         STATUS: <PASS|WARN|FAIL>\n\
         SEVERITY: <NONE|LOW|MEDIUM|HIGH|CRITICAL>\n\
         FINDINGS: <number of findings>\n\
         SUMMARY: <one line>\n\
         DETAILS:\n\
         - <one bullet per notable finding>\n\
         ACTIONS:\n\
         - <one bullet per recommended remediation>\n\
         {truncation_note}\n\
         Report content:\n\
         {content}",
        category = artifact.category,
        truncation_note = truncation_note,
        content = artifact.content_lossy(),
    )
}

/// Render one analysis result back into the label grammar, prefixed by its
/// category. Used for the consolidated summary prompt and for the audit
/// trail in notification artifacts.
pub fn render_result_block(result: &AnalysisResult) -> String {
    let mut block = format!(
        "### {}\nSTATUS: {}\nSEVERITY: {}\nFINDINGS: {}\nSUMMARY: {}\n",
        result.source_category,
        result.status,
        result.severity,
        result.findings_count,
        result.summary,
    );
    if !result.details.is_empty() {
        block.push_str("DETAILS:\n");
        for detail in &result.details {
            block.push_str(&format!("- {}\n", detail));
        }
    }
    if !result.actions.is_empty() {
        block.push_str("ACTIONS:\n");
        for action in &result.actions {
            block.push_str(&format!("- {}\n", action));
        }
    }
    block
}

/// Prompt for the pipeline-level consolidated summary, built from every
/// per-report result.
pub fn build_summary_prompt(results: &[AnalysisResult]) -> String {
    let blocks: Vec<String> = results.iter().map(render_result_block).collect();

    format!(
        "Below are per-report security analyses from one CI pipeline run. \
         Produce a single consolidated verdict.\n\
         \n\
         Respond in exactly this format:\n\
         OVERALL_STATUS: <PASS|WARN|FAIL>\n\
         VERDICT: <one line>\n\
         CRITICAL:\n\
         - <one bullet per must-fix item, omit the section if none>\n\
         WARNINGS:\n\
         - <one bullet per should-fix item, omit the section if none>\n\
         PASSED:\n\
         - <one bullet per passing check>\n\
         RECOMMENDATION: <one line>\n\
         \n\
         Per-report analyses:\n\
         {blocks}",
        blocks = blocks.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisStatus, FindingSeverity};

    #[test]
    fn test_report_prompt_embeds_category_and_content() {
        let artifact = ReportArtifact::new(
            "semgrep.json",
            "Semgrep SAST Scan",
            b"{\"results\":[]}".to_vec(),
        );
        let prompt = build_report_prompt(&artifact);
        assert!(prompt.contains("Semgrep SAST Scan"));
        assert!(prompt.contains("{\"results\":[]}"));
        assert!(prompt.contains("STATUS:"));
        assert!(!prompt.contains("truncated"));
    }

    #[test]
    fn test_report_prompt_mentions_truncation() {
        let mut artifact = ReportArtifact::new("trivy.json", "Trivy Container Image Scan", b"x".to_vec());
        artifact.truncated = true;
        assert!(build_report_prompt(&artifact).contains("truncated"));
    }

    #[test]
    fn test_render_result_block_roundtrips_labels() {
        let result = AnalysisResult {
            source_category: "Secret Detection".into(),
            status: AnalysisStatus::Warn,
            severity: FindingSeverity::High,
            findings_count: 2,
            summary: "2 hardcoded credentials".into(),
            details: vec!["AWS key in config.py".into()],
            actions: vec!["Rotate the key".into()],
        };
        let block = render_result_block(&result);
        assert!(block.contains("### Secret Detection"));
        assert!(block.contains("STATUS: WARN"));
        assert!(block.contains("SEVERITY: HIGH"));
        assert!(block.contains("- AWS key in config.py"));
        assert!(block.contains("- Rotate the key"));
    }

    #[test]
    fn test_summary_prompt_concatenates_all_categories() {
        let results = vec![
            AnalysisResult::degraded("Secret Detection", "x"),
            AnalysisResult::degraded("Trivy Container Image Scan", "y"),
        ];
        let prompt = build_summary_prompt(&results);
        assert!(prompt.contains("### Secret Detection"));
        assert!(prompt.contains("### Trivy Container Image Scan"));
        assert!(prompt.contains("OVERALL_STATUS:"));
    }
}
