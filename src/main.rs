use std::path::PathBuf;

use clap::Parser;
use tracing::error;

use dependency_report::config::{DEFAULT_CONFIG_FILE, log_path};
use dependency_report::generator::ReportGenerator;
use dependency_report::logging::init_logging;

#[derive(Parser)]
#[command(name = "dependency-report")]
#[command(
    version,
    about = "Report latest versions and known vulnerabilities of project dependencies"
)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log file (defaults to the data directory)
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Write the log file as JSON lines
    #[arg(long)]
    json_logs: bool,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let generator = ReportGenerator::from_config_file(&cli.config)?;
    generator.run().await?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli.log.clone().unwrap_or_else(log_path);
    let _guard = init_logging(&log_file, cli.json_logs)?;

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli));

    if let Err(e) = &result {
        error!("Dependency report generation failed: {:#}", e);
    }
    result
}
