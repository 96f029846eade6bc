use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TriageConfig {
    pub analysis: Option<AnalysisConfig>,
    pub webhook: Option<WebhookConfig>,
    pub scanners: Option<ScannerConfig>,
    pub output: Option<OutputConfig>,
}

/// AI analysis stage settings. `enabled: false` skips the stage entirely;
/// every other field has a CLI flag that takes precedence.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AnalysisConfig {
    pub enabled: Option<bool>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_report_bytes: Option<usize>,
    pub max_retries: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScannerConfig {
    /// Project language for dependency scanning: node, python, php.
    pub language: Option<String>,
    /// Subset of scanners to run; all source scanners when omitted.
    pub include: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    pub directory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triage_config_default_is_empty() {
        let config = TriageConfig::default();
        assert!(config.analysis.is_none());
        assert!(config.webhook.is_none());
        assert!(config.scanners.is_none());
    }

    #[test]
    fn test_yaml_deserialization() {
        let yaml = "\
analysis:
  enabled: true
  provider: anthropic
  max_retries: 2
webhook:
  url: https://hooks.example.com/T000/B000
scanners:
  language: python
";
        let config: TriageConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.analysis.as_ref().unwrap().provider.as_deref(), Some("anthropic"));
        assert_eq!(config.analysis.as_ref().unwrap().max_retries, Some(2));
        assert_eq!(config.scanners.as_ref().unwrap().language.as_deref(), Some("python"));
    }

    #[test]
    fn test_unknown_top_level_keys_tolerated() {
        let yaml = "analysis:\n  enabled: false\nfuture_section:\n  x: 1\n";
        let config: TriageConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.analysis.unwrap().enabled, Some(false));
    }
}
