use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proxy_harness::config::{self, HarnessConfig};
use proxy_harness::harness::run_harness;

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Conformance and performance harness for a forwarding HTTP proxy", long_about = None)]
struct Cli {
    /// Path to the subject proxy executable (binary or script with shebang),
    /// invoked as `<path> <port>`.
    proxy_bin: PathBuf,

    /// Port the primary proxy instance is told to bind. Two more instances
    /// are started on port + 1 and port + 2 during the concurrency test.
    port: u16,

    /// Optional TOML file overriding the built-in harness configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit the full report as JSON after the human-readable sections.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "harness=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => HarnessConfig::default(),
    };

    tracing::info!(
        proxy_bin = %cli.proxy_bin.display(),
        port = cli.port,
        "harness starting"
    );

    let report = run_harness(&config, &cli.proxy_bin, cli.port).await;

    print!("{report}");
    println!(
        "{} of {} checks passed",
        report.passed(),
        report.total_cases()
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
