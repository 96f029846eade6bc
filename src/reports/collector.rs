use std::path::Path;
use crate::models::ReportArtifact;
use super::catalog::KNOWN_REPORTS;
use tracing::{debug, warn};

/// A report file that exists but could not be read. The category is later
/// surfaced in the final verdict's warnings instead of being analyzed.
#[derive(Debug, Clone)]
pub struct CollectionGap {
    pub file_name: String,
    pub category: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CollectedReports {
    pub artifacts: Vec<ReportArtifact>,
    pub gaps: Vec<CollectionGap>,
}

impl CollectedReports {
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty() && self.gaps.is_empty()
    }
}

/// Discover which of the known report files are present under `dir` and load
/// their raw content.
///
/// A missing file is not an error; it simply yields no artifact for that
/// slot. A file that exists but cannot be read is recorded as a gap and the
/// run keeps going.
pub async fn collect(dir: &Path) -> CollectedReports {
    let mut collected = CollectedReports::default();

    for (file_name, category) in KNOWN_REPORTS {
        let path = dir.join(file_name);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            _ => {
                debug!(file = file_name, "Report not present, skipping");
                continue;
            }
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(file = file_name, bytes = bytes.len(), "Collected report");
                collected.artifacts.push(ReportArtifact::new(file_name, category, bytes));
            }
            Err(e) => {
                warn!(file = file_name, error = %e, "Report present but unreadable");
                collected.gaps.push(CollectionGap {
                    file_name: file_name.to_string(),
                    category: category.to_string(),
                    reason: format!("report file present but unreadable: {}", e),
                });
            }
        }
    }

    collected
}
