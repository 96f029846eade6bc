//! Pinned scanner containers replicating the pipeline's security stages for
//! local runs. Each scanner writes its report into the mounted source tree,
//! where the collector picks it up.

/// Scanner names accepted in `scanners.include`.
pub const SCANNER_NAMES: &[&str] = &["secrets", "sast", "dependencies", "container"];

/// One containerized scanner invocation.
#[derive(Debug, Clone)]
pub struct ScannerSpec {
    pub name: &'static str,
    pub image: String,
    /// Shell command run inside the container, workdir /src.
    pub command: String,
    pub report_file: &'static str,
    pub mounts_source: bool,
}

/// Secrets detection with Gitleaks. Exit code 1 on leaks is expected; the
/// report is written either way.
pub fn secrets_scanner() -> ScannerSpec {
    ScannerSpec {
        name: "secrets",
        image: "zricethezav/gitleaks:v8.21.2".into(),
        command: "gitleaks detect --redact --source . --report-path gitleaks-report.json --report-format json --no-git"
            .into(),
        report_file: "gitleaks-report.json",
        mounts_source: true,
    }
}

/// Static analysis with Semgrep's security-audit ruleset.
pub fn sast_scanner() -> ScannerSpec {
    ScannerSpec {
        name: "sast",
        image: "returntocorp/semgrep:1.97.0".into(),
        command: "semgrep scan --config p/security-audit --json -o semgrep.json .".into(),
        report_file: "semgrep.json",
        mounts_source: true,
    }
}

/// Dependency audit keyed on the project language. Unknown languages get the
/// stub that writes an empty report so the downstream slot stays populated.
pub fn dependency_scanner(language: &str) -> ScannerSpec {
    let (image, command) = match language {
        "node" => (
            "node:20-alpine",
            "npm audit --json > dependency-scan.json || true",
        ),
        "python" => (
            "python:3.12-slim",
            "pip install -U pip pip-audit && pip-audit -r requirements.txt -f json > dependency-scan.json || true",
        ),
        "php" => (
            "php:8.3-cli",
            "curl -sS https://getcomposer.org/installer | php -- --install-dir=/usr/local/bin --filename=composer && composer audit --format=json > dependency-scan.json || true",
        ),
        _ => ("alpine:3.20", "echo '{}' > dependency-scan.json"),
    };

    ScannerSpec {
        name: "dependencies",
        image: image.into(),
        command: command.into(),
        report_file: "dependency-scan.json",
        mounts_source: true,
    }
}

/// Container image scan with Trivy against an already-built image reference.
pub fn container_scanner(image_ref: &str) -> ScannerSpec {
    ScannerSpec {
        name: "container",
        image: "aquasec/trivy:0.58.1".into(),
        command: format!(
            "trivy image --severity CRITICAL,HIGH --exit-code 0 --format json --output trivy.json {}",
            image_ref
        ),
        report_file: "trivy.json",
        mounts_source: true,
    }
}

/// The source-tree scanners run by default; the container scan needs an
/// image reference and is added separately.
pub fn default_scanners(language: &str) -> Vec<ScannerSpec> {
    vec![
        secrets_scanner(),
        dependency_scanner(language),
        sast_scanner(),
    ]
}
