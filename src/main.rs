use clap::Parser;
use tracing_subscriber::EnvFilter;

use scantriage::cli::{self, Cli, Commands};
use scantriage::errors::TriageError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (_, 0) => "info",
        (_, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        Commands::Analyze(args) => cli::analyze::handle_analyze(args).await,
        Commands::Scan(args) => cli::scan::handle_scan(args).await,
        Commands::Validate(args) => cli::validate::handle_validate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            TriageError::Config(_) => 2,
            TriageError::Authentication(_) => 3,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
