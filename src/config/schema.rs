use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "analysis": {
                "type": "object",
                "properties": {
                    "enabled": { "type": "boolean" },
                    "provider": { "type": "string", "enum": ["anthropic", "openai", "local"] },
                    "model": { "type": "string" },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string", "format": "uri" },
                    "max_report_bytes": { "type": "integer", "minimum": 1 },
                    "max_retries": { "type": "integer", "minimum": 0 },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "webhook": {
                "type": "object",
                "properties": {
                    "url": { "type": "string", "format": "uri" },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "scanners": {
                "type": "object",
                "properties": {
                    "language": { "type": "string", "enum": ["node", "python", "php"] },
                    "include": { "type": "array", "items": { "type": "string" } },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "directory": { "type": "string" }
                }
            }
        }
    })
});
