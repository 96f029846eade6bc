/// Fixed allow-list of report artifacts the pipeline stages may leave
/// behind, mapped to the category labels used in prompts and output.
///
/// Closed and versioned with the pipeline templates; unknown files in the
/// report directory are ignored, never analyzed.
pub const KNOWN_REPORTS: &[(&str, &str)] = &[
    ("secrets-report.json", "Secret Detection"),
    ("gitleaks-report.json", "Gitleaks Secret Scan"),
    ("dependency-scan.json", "Dependency Vulnerability Scan"),
    ("sast-report.json", "Static Application Security Testing"),
    ("semgrep.json", "Semgrep SAST Scan"),
    ("iac-report.json", "Infrastructure as Code Scan"),
    ("polaris.json", "Polaris Kubernetes Audit"),
    ("trivy.json", "Trivy Container Image Scan"),
    ("zap/zap.json", "OWASP ZAP Dynamic Scan"),
    ("summary.md", "Pipeline Summary"),
];

pub fn category_for(file_name: &str) -> Option<&'static str> {
    KNOWN_REPORTS
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, category)| *category)
}
