use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use health_orchestrator::config::load_or_default;
use health_orchestrator::lifecycle::build_orchestrator;
use health_orchestrator::observability::logging;
use health_orchestrator::report::{to_human_readable, to_machine_readable};

#[derive(Parser)]
#[command(name = "health-check")]
#[command(about = "Run the enabled health checks once and report", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "HEALTHCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Print the raw JSON report instead of the summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: logging unavailable: {e}");
    }

    if !cli.json {
        println!("🔍 Running system health checks...");
    }

    let report = build_orchestrator(config).run().await;

    if cli.json {
        match serde_json::to_string_pretty(&to_machine_readable(&report)) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to encode report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!();
        for line in to_human_readable(&report) {
            println!("{line}");
        }
    }

    if report.is_healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
