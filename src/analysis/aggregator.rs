use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tracing::{info, warn};

use crate::errors::{RetryConfig, TriageError, with_retry};
use crate::llm::provider::LLMProvider;
use crate::models::{
    AnalysisResult, AnalysisStatus, PipelineVerdict,
    verdict::{UNAVAILABLE_RECOMMENDATION, UNAVAILABLE_VERDICT},
};
use super::prompt::{ANALYST_SYSTEM_PROMPT, build_summary_prompt};
use super::parser::parse_verdict;

/// Merges all per-report results into one pipeline verdict.
///
/// Preferred path is a single consolidated backend call; any failure there
/// degrades to the deterministic local merge. Aggregation never raises.
pub struct VerdictAggregator {
    llm: Arc<dyn LLMProvider>,
    retry: RetryConfig,
    call_timeout: Duration,
}

impl VerdictAggregator {
    pub fn new(llm: Arc<dyn LLMProvider>, retry: RetryConfig, call_timeout: Duration) -> Self {
        Self { llm, retry, call_timeout }
    }

    pub async fn aggregate(&self, results: &[AnalysisResult]) -> PipelineVerdict {
        if results.is_empty() {
            info!("No analysis results; returning fallback verdict");
            return PipelineVerdict::fallback();
        }

        match self.consolidated(results).await {
            Ok(verdict) => {
                info!(status = %verdict.overall_status, "Consolidated verdict from backend");
                verdict
            }
            Err(e) => {
                warn!(error = %e, "Consolidated summary failed; using local aggregation");
                aggregate_local(results)
            }
        }
    }

    async fn consolidated(&self, results: &[AnalysisResult]) -> Result<PipelineVerdict, TriageError> {
        let prompt = build_summary_prompt(results);

        let response = with_retry("consolidated-summary", &self.retry, || {
            let prompt = prompt.clone();
            let llm = Arc::clone(&self.llm);
            let call_timeout = self.call_timeout;
            async move {
                match tokio::time::timeout(call_timeout, llm.complete(&prompt, Some(ANALYST_SYSTEM_PROMPT))).await {
                    Ok(result) => result,
                    Err(_) => Err(TriageError::Timeout(format!(
                        "consolidated summary call exceeded {}s",
                        call_timeout.as_secs()
                    ))),
                }
            }
        })
        .await?;

        parse_verdict(&response.content).ok_or_else(|| {
            TriageError::Parse("consolidated reply carried no usable OVERALL_STATUS".into())
        })
    }
}

/// Deterministic merge: worst status across all results under the ordering
/// FAIL > WARN > PASS > UNKNOWN. FAIL results feed the critical list, WARN
/// the warnings, PASS the passed list; UNKNOWN (not-analyzed) results are
/// surfaced in the warnings rather than silently coerced to PASS.
pub fn aggregate_local(results: &[AnalysisResult]) -> PipelineVerdict {
    let overall_status = results
        .iter()
        .map(|r| r.status)
        .max_by_key(|s| s.rank())
        .unwrap_or(AnalysisStatus::Unknown);

    let mut critical_items = Vec::new();
    let mut warning_items = Vec::new();
    let mut passed_items = Vec::new();

    for result in results {
        match result.status {
            AnalysisStatus::Fail => {
                critical_items.push(result.summary.clone());
                critical_items.extend(result.details.iter().cloned());
            }
            AnalysisStatus::Warn => {
                warning_items.extend(result.details.iter().cloned());
                if result.details.is_empty() {
                    warning_items.push(result.summary.clone());
                }
            }
            AnalysisStatus::Pass => {
                passed_items.push(result.source_category.clone());
            }
            AnalysisStatus::Unknown => {
                warning_items.push(format!("{}: not analyzed", result.source_category));
                warning_items.extend(result.details.iter().cloned());
            }
        }
    }

    let fail_count = results.iter().filter(|r| r.status == AnalysisStatus::Fail).count();
    let warn_count = results.iter().filter(|r| r.status == AnalysisStatus::Warn).count();
    let total = results.len();

    let (verdict_line, recommendation) = match overall_status {
        AnalysisStatus::Fail => (
            format!("{} of {} reports failed security review", fail_count, total),
            "Address the critical findings before promoting this pipeline.".to_string(),
        ),
        AnalysisStatus::Warn => (
            format!("{} of {} reports raised warnings", warn_count, total),
            "Review the warnings; promote only with the risks documented.".to_string(),
        ),
        AnalysisStatus::Pass => (
            format!("All {} analyzed reports passed", total),
            "No action required.".to_string(),
        ),
        AnalysisStatus::Unknown => (
            UNAVAILABLE_VERDICT.to_string(),
            UNAVAILABLE_RECOMMENDATION.to_string(),
        ),
    };

    PipelineVerdict {
        overall_status,
        verdict_line,
        critical_items,
        warning_items,
        passed_items,
        recommendation,
        generated_at: Utc::now(),
    }
}
