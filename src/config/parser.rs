use std::path::Path;
use crate::errors::TriageError;
use super::types::TriageConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<TriageConfig, TriageError> {
    if !path.exists() {
        return Err(TriageError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(TriageError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: TriageConfig = serde_yaml::from_value(yaml)?;

    // Semantic conflict detection
    validate_conflicts(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), TriageError> {
    // Convert YAML value to JSON for schema validation
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| TriageError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| TriageError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| TriageError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        if !messages.is_empty() {
            // Warn but don't fail — schema validation is advisory for now
            for msg in &messages {
                warn!(validation_error = %msg, "Config schema warning");
            }
        }
    }

    Ok(())
}

/// Detect semantic conflicts in the parsed configuration.
fn validate_conflicts(config: &TriageConfig) -> Result<(), TriageError> {
    if let Some(scanners) = &config.scanners {
        if let Some(include) = &scanners.include {
            for name in include {
                if !crate::scanners::catalog::SCANNER_NAMES.contains(&name.as_str()) {
                    return Err(TriageError::Config(format!(
                        "Unknown scanner '{}' in scanners.include (known: {})",
                        name,
                        crate::scanners::catalog::SCANNER_NAMES.join(", ")
                    )));
                }
            }
        }
    }

    if let Some(webhook) = &config.webhook {
        if webhook.url.as_deref().map_or(false, str::is_empty) {
            warn!("Webhook section present but url is empty; notifications will go to the artifact only");
        }
    }

    if let Some(analysis) = &config.analysis {
        let enabled = analysis.enabled.unwrap_or(true);
        let has_key = analysis.api_key.as_ref().map_or(false, |k| !k.is_empty());
        let provider = analysis.provider.as_deref().unwrap_or("anthropic");
        if enabled && !has_key && provider != "local" {
            warn!(provider, "AI analysis enabled with no api_key in config; expecting it from CLI or environment");
        }
    }

    Ok(())
}
