use clap::{Parser, Subcommand, Args};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser)]
#[command(
    name = "scantriage",
    version,
    long_version = LONG_VERSION,
    about = "AI-assisted triage for DevSecOps pipeline scan reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect scanner reports, analyze them, and deliver the verdict
    Analyze(AnalyzeArgs),
    /// Run the containerized scanners against a source tree
    Scan(ScanArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Directory holding the scanner report artifacts
    #[arg(short, long, default_value = ".")]
    pub reports_dir: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for verdict and notification artifacts
    #[arg(short, long, default_value = "./triage")]
    pub output: String,

    /// LLM provider: anthropic, openai, local
    #[arg(long, default_value = "anthropic")]
    pub provider: String,

    /// LLM model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// LLM API key (or use env vars)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Local LLM endpoint
    #[arg(long, default_value = "http://localhost:11434/v1")]
    pub base_url: String,

    /// Webhook destination for the notification
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// Pipeline URL attached to the notification as its action link
    #[arg(long)]
    pub pipeline_url: Option<String>,

    /// Skip AI analysis entirely
    #[arg(long)]
    pub no_ai: bool,

    /// Retries for transient backend failures
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Per-call backend timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Byte budget for one report fed to the backend
    #[arg(long)]
    pub max_report_bytes: Option<usize>,
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Source tree to scan
    #[arg(short, long, default_value = ".")]
    pub source: String,

    /// Project language for dependency scanning: node, python, php
    #[arg(short, long, default_value = "node")]
    pub language: String,

    /// Container image reference to scan with Trivy
    #[arg(long)]
    pub image: Option<String>,

    /// Comma-separated subset of scanners to run
    #[arg(long)]
    pub only: Option<String>,

    /// Per-scanner timeout in seconds
    #[arg(long, default_value = "600")]
    pub scanner_timeout: u64,

    /// Run triage on the reports after scanning
    #[arg(long)]
    pub analyze: bool,

    #[command(flatten)]
    pub triage: AnalyzeArgs,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
