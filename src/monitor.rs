use crate::api::client::OffsetApiClient;
use crate::collector::OffsetCollector;
use crate::config::Config;
use crate::error::Result;
use crate::export::zabbix::{render, ZabbixFileExporter};
use tracing::info;

/// Where a successful run's lines go.
pub enum Output {
    File(ZabbixFileExporter),
    Stdout,
}

/// Run one collection pass and publish its lines. Nothing is published unless
/// every cluster answered both endpoints with usable data.
pub async fn run_once(config: &Config, hostname: &str, output: &Output) -> Result<usize> {
    let client = OffsetApiClient::new(&config.exporter)?;
    info!(
        api = client.base_url(),
        clusters = config.clusters.len(),
        hostname,
        "Collecting offsets"
    );

    let collector = OffsetCollector::new(client, config, hostname);
    let lines = collector.collect().await?;

    match output {
        Output::File(exporter) => exporter.write(&lines)?,
        Output::Stdout => println!("{}", render(&lines)),
    }

    Ok(lines.len())
}
