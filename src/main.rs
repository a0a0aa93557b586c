//! sonar-report - entry point
//!
//! Parses the command line, runs the aggregation pipeline, and writes the
//! assembled report as JSON on stdout. Diagnostics go to stderr; any fatal
//! fault produces no report and a non-zero exit code.

use clap::Parser;

use sonar_report::application::pipeline;
use sonar_report::cli::Cli;
use sonar_report::{init_tracing, Config};

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_cli(cli)?;
    let report = pipeline::run(&config).await?;

    let stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(stdout, &report)?;
    println!();
    Ok(())
}
