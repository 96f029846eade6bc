use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::analysis::{ReportAnalyzer, VerdictAggregator};
use crate::cli::commands::AnalyzeArgs;
use crate::config::{self, TriageConfig};
use crate::errors::{RetryConfig, TriageError};
use crate::llm::{self, provider::LLMProvider};
use crate::models::{AnalysisResult, PipelineVerdict};
use crate::notify::{DeliveryOutcome, Notifier};
use crate::reports;
use crate::utils::truncation::DEFAULT_MAX_REPORT_BYTES;

/// Runtime settings merged from CLI args, the optional config file, and the
/// environment. CLI flags win over file values.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub reports_dir: PathBuf,
    pub output_dir: PathBuf,
    pub analysis_enabled: bool,
    pub provider: String,
    pub model: Option<String>,
    pub api_key: String,
    pub base_url: String,
    pub max_report_bytes: usize,
    pub retry: RetryConfig,
    pub call_timeout: Duration,
    pub webhook_url: Option<String>,
    pub webhook_timeout: Duration,
    pub pipeline_url: Option<String>,
}

impl RunSettings {
    pub fn resolve(args: &AnalyzeArgs, file_config: Option<&TriageConfig>) -> Self {
        let analysis = file_config.and_then(|c| c.analysis.as_ref());
        let webhook = file_config.and_then(|c| c.webhook.as_ref());
        let output = file_config.and_then(|c| c.output.as_ref());

        let provider = if args.provider == "anthropic" {
            analysis
                .and_then(|a| a.provider.clone())
                .unwrap_or_else(|| args.provider.clone())
        } else {
            args.provider.clone()
        };

        let api_key = args
            .api_key
            .clone()
            .or_else(|| analysis.and_then(|a| a.api_key.clone()))
            .or_else(|| resolve_api_key_from_env(&provider))
            .unwrap_or_default();

        let enabled = !args.no_ai && analysis.and_then(|a| a.enabled).unwrap_or(true);

        Self {
            reports_dir: PathBuf::from(&args.reports_dir),
            output_dir: output
                .and_then(|o| o.directory.clone())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&args.output)),
            analysis_enabled: enabled,
            model: args.model.clone().or_else(|| analysis.and_then(|a| a.model.clone())),
            api_key,
            base_url: analysis
                .and_then(|a| a.base_url.clone())
                .unwrap_or_else(|| args.base_url.clone()),
            max_report_bytes: args
                .max_report_bytes
                .or_else(|| analysis.and_then(|a| a.max_report_bytes))
                .unwrap_or(DEFAULT_MAX_REPORT_BYTES),
            retry: RetryConfig {
                max_retries: args
                    .max_retries
                    .or_else(|| analysis.and_then(|a| a.max_retries))
                    .unwrap_or(2),
            },
            call_timeout: Duration::from_secs(
                args.timeout
                    .or_else(|| analysis.and_then(|a| a.timeout_secs))
                    .unwrap_or(60),
            ),
            webhook_url: args
                .webhook_url
                .clone()
                .or_else(|| webhook.and_then(|w| w.url.clone())),
            webhook_timeout: Duration::from_secs(
                webhook.and_then(|w| w.timeout_secs).unwrap_or(10),
            ),
            pipeline_url: args
                .pipeline_url
                .clone()
                .or_else(|| std::env::var("CI_PIPELINE_URL").ok()),
            provider,
        }
    }
}

pub async fn handle_analyze(args: AnalyzeArgs) -> Result<(), TriageError> {
    let file_config = if let Some(config_path) = &args.config {
        Some(config::parse_config(Path::new(config_path)).await?)
    } else {
        None
    };

    let settings = RunSettings::resolve(&args, file_config.as_ref());
    run_triage(settings).await
}

/// The full triage flow: collect reports, analyze them in parallel,
/// aggregate, notify. Only configuration errors surface to the caller;
/// backend, parse, and delivery failures all degrade inside their stage.
pub async fn run_triage(settings: RunSettings) -> Result<(), TriageError> {
    info!(
        reports_dir = %settings.reports_dir.display(),
        enabled = settings.analysis_enabled,
        "Starting report triage"
    );
    tokio::fs::create_dir_all(&settings.output_dir).await?;

    let collected = reports::collect(&settings.reports_dir).await;
    info!(
        reports = collected.artifacts.len(),
        gaps = collected.gaps.len(),
        "Report collection complete"
    );

    let verdict = if settings.analysis_enabled {
        analyze_and_aggregate(&settings, collected).await?
    } else {
        info!("AI analysis disabled; emitting fallback verdict");
        PipelineVerdict::fallback()
    };

    let verdict_path = settings.output_dir.join("verdict.json");
    tokio::fs::write(&verdict_path, serde_json::to_string_pretty(&verdict)?).await?;
    info!(path = %verdict_path.display(), "Verdict artifact written");

    let notifier = Notifier::new(
        settings.webhook_url.clone(),
        settings.webhook_timeout,
        settings.output_dir.join("notification.json"),
    );
    let (_, outcome) = notifier
        .notify(&verdict, settings.pipeline_url.as_deref())
        .await;

    print_summary(&verdict, outcome);
    Ok(())
}

async fn analyze_and_aggregate(
    settings: &RunSettings,
    collected: reports::CollectedReports,
) -> Result<PipelineVerdict, TriageError> {
    let llm: Arc<dyn LLMProvider> = Arc::from(llm::create_provider(
        &settings.provider,
        &settings.api_key,
        settings.model.as_deref(),
        Some(&settings.base_url),
    )?);
    info!(provider = %settings.provider, model = llm.model_name(), "Analysis backend ready");

    // Unreadable reports still get a (degraded) result so the verdict
    // surfaces them instead of silently dropping the category.
    let mut results: Vec<AnalysisResult> = collected
        .gaps
        .iter()
        .map(|gap| AnalysisResult::degraded(&gap.category, &gap.reason))
        .collect();

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; abandoning in-flight analyses");
            shutdown.cancel();
        }
    });

    let analyzer = Arc::new(ReportAnalyzer::new(
        Arc::clone(&llm),
        settings.retry.clone(),
        settings.call_timeout,
        settings.max_report_bytes,
    ));
    results.extend(analyzer.analyze_all(collected.artifacts, &cancel).await);

    let aggregator = VerdictAggregator::new(llm, settings.retry.clone(), settings.call_timeout);
    Ok(aggregator.aggregate(&results).await)
}

fn print_summary(verdict: &PipelineVerdict, outcome: DeliveryOutcome) {
    let status = match verdict.overall_status.as_label() {
        "PASS" => style("PASS").green().bold(),
        "WARN" => style("WARN").yellow().bold(),
        "FAIL" => style("FAIL").red().bold(),
        other => style(other).dim().bold(),
    };

    println!();
    println!("  {} {}", status, verdict.verdict_line);
    for item in &verdict.critical_items {
        println!("    {} {}", style("✗").red(), item);
    }
    for item in &verdict.warning_items {
        println!("    {} {}", style("!").yellow(), item);
    }
    for item in &verdict.passed_items {
        println!("    {} {}", style("✓").green(), item);
    }
    println!("  {}", style(&verdict.recommendation).dim());

    let delivery = match outcome {
        DeliveryOutcome::Delivered => "notification delivered to webhook",
        DeliveryOutcome::StoredArtifact => "notification stored as artifact",
        DeliveryOutcome::Failed => "notification could not be stored; see logs",
    };
    println!("  {}", style(delivery).dim());
    println!();
}

fn resolve_api_key_from_env(provider: &str) -> Option<String> {
    let var_name = match provider {
        "anthropic" => "ANTHROPIC_API_KEY",
        "openai" => "OPENAI_API_KEY",
        _ => return None,
    };
    std::env::var(var_name).ok()
}
