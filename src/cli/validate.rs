use std::path::Path;
use console::style;

use crate::cli::commands::ValidateArgs;
use crate::config;
use crate::errors::TriageError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), TriageError> {
    let config = config::parse_config(Path::new(&args.config)).await?;

    println!("{} {}", style("✓").green(), "Configuration is valid");
    if let Some(analysis) = &config.analysis {
        println!(
            "  analysis: enabled={} provider={}",
            analysis.enabled.unwrap_or(true),
            analysis.provider.as_deref().unwrap_or("anthropic"),
        );
    }
    if let Some(webhook) = &config.webhook {
        println!("  webhook: {}", webhook.url.as_deref().unwrap_or("(artifact only)"));
    }
    if let Some(scanners) = &config.scanners {
        println!("  scanners: language={}", scanners.language.as_deref().unwrap_or("node"));
    }
    Ok(())
}
