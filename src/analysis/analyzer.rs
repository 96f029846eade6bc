use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{RetryConfig, TriageError, with_retry};
use crate::llm::provider::LLMProvider;
use crate::models::{AnalysisResult, ReportArtifact};
use crate::utils::truncation::truncate_report;
use super::prompt::{ANALYST_SYSTEM_PROMPT, build_report_prompt};
use super::parser::parse_analysis;

/// Analyzes scanner reports through the text-generation backend.
///
/// `analyze_one` is total: backend failures, timeouts, and malformed replies
/// all degrade to an UNKNOWN result carrying the failure reason, so the
/// aggregator always receives one result per collected report.
pub struct ReportAnalyzer {
    llm: Arc<dyn LLMProvider>,
    retry: RetryConfig,
    call_timeout: Duration,
    max_report_bytes: usize,
}

impl ReportAnalyzer {
    pub fn new(
        llm: Arc<dyn LLMProvider>,
        retry: RetryConfig,
        call_timeout: Duration,
        max_report_bytes: usize,
    ) -> Self {
        Self { llm, retry, call_timeout, max_report_bytes }
    }

    /// Apply the byte budget to an artifact before analysis.
    pub fn prepare(&self, mut artifact: ReportArtifact) -> ReportArtifact {
        let (content, truncated) = truncate_report(&artifact.raw_content, self.max_report_bytes);
        if truncated {
            debug!(
                file = %artifact.file_name,
                original = artifact.raw_content.len(),
                budget = self.max_report_bytes,
                "Truncating report content"
            );
            artifact.raw_content = content;
            artifact.truncated = true;
        }
        artifact
    }

    pub async fn analyze_one(&self, artifact: &ReportArtifact) -> AnalysisResult {
        let prompt = build_report_prompt(artifact);
        let operation = format!("analyze:{}", artifact.file_name);

        let outcome = with_retry(&operation, &self.retry, || {
            let prompt = prompt.clone();
            let llm = Arc::clone(&self.llm);
            let call_timeout = self.call_timeout;
            async move {
                match tokio::time::timeout(call_timeout, llm.complete(&prompt, Some(ANALYST_SYSTEM_PROMPT))).await {
                    Ok(result) => result,
                    Err(_) => Err(TriageError::Timeout(format!(
                        "backend call exceeded {}s",
                        call_timeout.as_secs()
                    ))),
                }
            }
        })
        .await;

        match outcome {
            Ok(response) => {
                debug!(file = %artifact.file_name, "Backend reply received");
                parse_analysis(&artifact.category, &response.content)
            }
            Err(e) => {
                warn!(file = %artifact.file_name, error = %e, "Analysis degraded");
                AnalysisResult::degraded(&artifact.category, &format!("backend call failed: {}", e))
            }
        }
    }

    /// Analyze every artifact concurrently and join all results before
    /// returning. Result order follows completion order; the aggregation is
    /// order-independent.
    ///
    /// Cancellation abandons in-flight backend calls without blocking
    /// teardown; results that completed before the cancel are kept.
    pub async fn analyze_all(
        self: Arc<Self>,
        artifacts: Vec<ReportArtifact>,
        cancel: &CancellationToken,
    ) -> Vec<AnalysisResult> {
        let total = artifacts.len();
        let mut set = JoinSet::new();

        for artifact in artifacts {
            let analyzer = Arc::clone(&self);
            let artifact = analyzer.prepare(artifact);
            set.spawn(async move { analyzer.analyze_one(&artifact).await });
        }

        let mut results = Vec::with_capacity(total);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!(completed = results.len(), total, "Cancelled; abandoning in-flight analyses");
                    set.abort_all();
                    break;
                }
                joined = set.join_next() => match joined {
                    Some(Ok(result)) => results.push(result),
                    Some(Err(e)) => warn!(error = %e, "Analysis task aborted"),
                    None => break,
                },
            }
        }

        info!(analyzed = results.len(), total, "Report analysis complete");
        results
    }
}
