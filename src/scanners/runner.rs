use std::path::{Path, PathBuf};
use std::time::Duration;
use bollard::Docker;
use bollard::container::{Config, CreateContainerOptions, RemoveContainerOptions, StartContainerOptions, WaitContainerOptions};
use bollard::image::CreateImageOptions;
use bollard::models::HostConfig;
use futures::StreamExt;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::TriageError;
use super::catalog::ScannerSpec;

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub scanner: &'static str,
    pub report_file: &'static str,
    pub exit_code: Option<i64>,
    pub error: Option<String>,
}

impl ScanOutcome {
    /// Whether the scanner ran to completion. A non-zero exit is still a
    /// completed run (gitleaks exits 1 on leaks); only infrastructure
    /// failures count as errors.
    pub fn completed(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs scanner containers against a bind-mounted source tree. Scanner
/// failures degrade that report slot; they never abort the harness.
pub struct ScannerRunner {
    docker: Docker,
    source_dir: PathBuf,
    timeout: Duration,
}

impl ScannerRunner {
    pub fn new(source_dir: &Path, timeout: Duration) -> Result<Self, TriageError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| TriageError::Container(format!("Failed to connect to Docker: {}", e)))?;
        let source_dir = source_dir
            .canonicalize()
            .map_err(|e| TriageError::Config(format!("Invalid source directory: {}", e)))?;

        Ok(Self { docker, source_dir, timeout })
    }

    /// Run every scanner concurrently and join all outcomes.
    pub async fn run_all(&self, specs: Vec<ScannerSpec>) -> Vec<ScanOutcome> {
        let mut set = JoinSet::new();

        for spec in specs {
            let docker = self.docker.clone();
            let source = self.source_dir.clone();
            let timeout = self.timeout;
            set.spawn(async move { run_one(docker, source, spec, timeout).await });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => warn!(error = %e, "Scanner task aborted"),
            }
        }
        outcomes
    }
}

async fn run_one(
    docker: Docker,
    source: PathBuf,
    spec: ScannerSpec,
    timeout: Duration,
) -> ScanOutcome {
    info!(scanner = spec.name, image = %spec.image, "Running scanner");

    match execute(&docker, &source, &spec, timeout).await {
        Ok(exit_code) => {
            info!(scanner = spec.name, exit_code, report = spec.report_file, "Scanner finished");
            ScanOutcome {
                scanner: spec.name,
                report_file: spec.report_file,
                exit_code: Some(exit_code),
                error: None,
            }
        }
        Err(e) => {
            warn!(scanner = spec.name, error = %e, "Scanner failed; report slot degraded");
            ScanOutcome {
                scanner: spec.name,
                report_file: spec.report_file,
                exit_code: None,
                error: Some(e.to_string()),
            }
        }
    }
}

async fn execute(
    docker: &Docker,
    source: &Path,
    spec: &ScannerSpec,
    timeout: Duration,
) -> Result<i64, TriageError> {
    ensure_image(docker, &spec.image).await?;

    let container_name = format!(
        "scantriage-{}-{}",
        spec.name,
        &uuid::Uuid::new_v4().simple().to_string()[..8]
    );

    let host_config = HostConfig {
        binds: spec
            .mounts_source
            .then(|| vec![format!("{}:/src", source.display())]),
        ..Default::default()
    };

    let config = Config {
        image: Some(spec.image.clone()),
        cmd: Some(vec!["sh".to_string(), "-c".to_string(), spec.command.clone()]),
        working_dir: Some("/src".to_string()),
        // scanner images pin their tool as the entrypoint; clear it so sh -c runs
        entrypoint: Some(vec!["".to_string()]),
        host_config: Some(host_config),
        ..Default::default()
    };

    docker
        .create_container(
            Some(CreateContainerOptions { name: container_name.as_str(), platform: None }),
            config,
        )
        .await
        .map_err(|e| TriageError::Container(format!("Failed to create container: {}", e)))?;

    let result = async {
        docker
            .start_container(&container_name, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| TriageError::Container(format!("Failed to start container: {}", e)))?;

        let waited = tokio::time::timeout(
            timeout,
            docker
                .wait_container(&container_name, None::<WaitContainerOptions<String>>)
                .next(),
        )
        .await
        .map_err(|_| {
            TriageError::Timeout(format!(
                "scanner {} exceeded {}s",
                spec.name,
                timeout.as_secs()
            ))
        })?;

        match waited {
            Some(Ok(response)) => Ok(response.status_code),
            // bollard surfaces non-zero exits through the wait error channel
            Some(Err(bollard::errors::Error::DockerContainerWaitError { code, .. })) => Ok(code),
            Some(Err(e)) => Err(TriageError::Container(format!("Wait failed: {}", e))),
            None => Err(TriageError::Container("Wait stream ended unexpectedly".into())),
        }
    }
    .await;

    // Always clean up, even after timeout or wait failure
    if let Err(e) = docker
        .remove_container(
            &container_name,
            Some(RemoveContainerOptions { force: true, ..Default::default() }),
        )
        .await
    {
        warn!(container = %container_name, error = %e, "Failed to remove scanner container");
    }

    result
}

async fn ensure_image(docker: &Docker, image: &str) -> Result<(), TriageError> {
    if docker.inspect_image(image).await.is_ok() {
        debug!(image, "Image found locally");
        return Ok(());
    }

    info!(image, "Pulling scanner image");
    let mut pull = docker.create_image(
        Some(CreateImageOptions { from_image: image, ..Default::default() }),
        None,
        None,
    );
    while let Some(progress) = pull.next().await {
        progress.map_err(|e| TriageError::Container(format!("Failed to pull {}: {}", image, e)))?;
    }
    Ok(())
}
