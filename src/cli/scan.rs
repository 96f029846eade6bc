use std::path::Path;
use std::time::Duration;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cli::commands::ScanArgs;
use crate::config;
use crate::errors::TriageError;
use crate::scanners::{catalog, ScannerRunner};
use super::analyze::{run_triage, RunSettings};

pub async fn handle_scan(args: ScanArgs) -> Result<(), TriageError> {
    let file_config = if let Some(config_path) = &args.triage.config {
        Some(config::parse_config(Path::new(config_path)).await?)
    } else {
        None
    };
    let scanner_config = file_config.as_ref().and_then(|c| c.scanners.as_ref());

    let language = scanner_config
        .and_then(|s| s.language.clone())
        .unwrap_or_else(|| args.language.clone());
    let timeout = Duration::from_secs(
        scanner_config
            .and_then(|s| s.timeout_secs)
            .unwrap_or(args.scanner_timeout),
    );

    let mut specs = catalog::default_scanners(&language);
    if let Some(image_ref) = &args.image {
        specs.push(catalog::container_scanner(image_ref));
    }

    // CLI --only wins over the config include list
    let include: Option<Vec<String>> = args
        .only
        .as_ref()
        .map(|o| o.split(',').map(|s| s.trim().to_string()).collect())
        .or_else(|| scanner_config.and_then(|s| s.include.clone()));
    if let Some(include) = include {
        for name in &include {
            if !catalog::SCANNER_NAMES.contains(&name.as_str()) {
                return Err(TriageError::Config(format!("Unknown scanner: {}", name)));
            }
        }
        specs.retain(|s| include.iter().any(|name| name == s.name));
    }

    if specs.is_empty() {
        return Err(TriageError::Config("No scanners selected".into()));
    }

    info!(source = %args.source, language = %language, scanners = specs.len(), "Running scanner harness");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Running {} scanners...", specs.len()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let runner = ScannerRunner::new(Path::new(&args.source), timeout)?;
    let outcomes = runner.run_all(specs).await;
    spinner.finish_and_clear();

    for outcome in &outcomes {
        if outcome.completed() {
            println!(
                "  {} {} (exit {}) -> {}",
                style("✓").green(),
                outcome.scanner,
                outcome.exit_code.unwrap_or_default(),
                outcome.report_file
            );
        } else {
            println!(
                "  {} {} failed: {}",
                style("✗").red(),
                outcome.scanner,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if args.analyze {
        let mut triage_args = args.triage.clone();
        // Reports landed in the scanned source tree
        triage_args.reports_dir = args.source.clone();
        let settings = RunSettings::resolve(&triage_args, file_config.as_ref());
        run_triage(settings).await?;
    }

    Ok(())
}
