mod api;
mod collector;
mod config;
mod error;
mod export;
mod metrics;
mod monitor;

use crate::config::Config;
use crate::export::zabbix::ZabbixFileExporter;
use crate::monitor::Output;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "kafka-offset-monitor")]
#[command(about = "Writes Kafka latest-offset and consumer group distance metrics for a Zabbix agent")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file. The built-in cluster registry is used when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Override the output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the metric lines to stdout instead of writing the output file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!("Starting kafka-offset-monitor");

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(path) = args.output {
        config.exporter.output_file = path;
    }
    info!(
        clusters = config.clusters.len(),
        output = %config.exporter.output_file.display(),
        "Configuration loaded"
    );

    let hostname = config.exporter.resolve_hostname()?;

    let output = if args.stdout {
        Output::Stdout
    } else {
        Output::File(ZabbixFileExporter::new(&config.exporter.output_file))
    };

    match monitor::run_once(&config, &hostname, &output).await {
        Ok(lines) => {
            info!(lines, "kafka-offset-monitor finished");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Collection aborted, output left unchanged");
            Err(e.into())
        }
    }
}

// Logs go to stderr so `--stdout` output stays machine-readable.
fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
