use crate::api::client::OffsetApiClient;
use crate::api::{container_entries, value_kind, ApiPayload, Endpoint};
use crate::config::{Blacklist, ClusterConfig, Config};
use crate::error::{MonitorError, Result};
use crate::metrics::types::MetricLine;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Walks every configured cluster through both endpoints and builds metric lines.
pub struct OffsetCollector {
    client: OffsetApiClient,
    clusters: Vec<ClusterConfig>,
    hostname: String,
    distance_threshold: i64,
}

impl OffsetCollector {
    pub fn new(client: OffsetApiClient, config: &Config, hostname: impl Into<String>) -> Self {
        Self {
            client,
            clusters: config.clusters.clone(),
            hostname: hostname.into(),
            distance_threshold: config.exporter.distance_threshold,
        }
    }

    /// All latest-offset lines for every cluster, then all distance lines. The first
    /// cluster with an unusable response aborts collection; later clusters are not
    /// contacted.
    pub async fn collect(&self) -> Result<Vec<MetricLine>> {
        let start = std::time::Instant::now();
        let mut lines = Vec::new();

        for cluster in &self.clusters {
            let entries = self.fetch_entries(Endpoint::LatestOffset, cluster).await?;
            let cluster_lines = latest_offset_lines(&self.hostname, cluster, entries)?;
            debug!(
                cluster = %cluster.name,
                lines = cluster_lines.len(),
                "Collected latest offsets"
            );
            lines.extend(cluster_lines);
        }
        let latest_count = lines.len();
        info!(lines = latest_count, "Latest offset phase completed");

        for cluster in &self.clusters {
            let entries = self
                .fetch_entries(Endpoint::ConsumerGroupDistance, cluster)
                .await?;
            let cluster_lines =
                distance_lines(&self.hostname, cluster, self.distance_threshold, entries)?;
            debug!(
                cluster = %cluster.name,
                lines = cluster_lines.len(),
                "Collected consumer group distances"
            );
            lines.extend(cluster_lines);
        }
        info!(
            lines = lines.len() - latest_count,
            "Consumer group distance phase completed"
        );

        debug!(
            elapsed_ms = start.elapsed().as_millis(),
            "Collection completed"
        );
        Ok(lines)
    }

    #[instrument(skip(self, cluster), fields(cluster = %cluster.name))]
    async fn fetch_entries(
        &self,
        endpoint: Endpoint,
        cluster: &ClusterConfig,
    ) -> Result<Vec<(String, Value)>> {
        match self.client.fetch(endpoint, cluster).await? {
            ApiPayload::WellFormed(entries) => Ok(entries),
            ApiPayload::Malformed(reason) => Err(MonitorError::MalformedResponse {
                cluster: cluster.name.clone(),
                endpoint,
                reason,
            }),
        }
    }
}

/// One `latest_offset` line per topic, in response order.
pub fn latest_offset_lines(
    hostname: &str,
    cluster: &ClusterConfig,
    entries: Vec<(String, Value)>,
) -> Result<Vec<MetricLine>> {
    entries
        .into_iter()
        .map(|(topic, record)| {
            let total = read_total(cluster, Endpoint::LatestOffset, &topic, &record)?;
            Ok(MetricLine::latest_offset(
                hostname,
                cluster.name.as_str(),
                topic,
                total,
            ))
        })
        .collect()
}

/// One `distance` line per (group, topic) pair, skipping blacklisted pairs.
pub fn distance_lines(
    hostname: &str,
    cluster: &ClusterConfig,
    threshold: i64,
    entries: Vec<(String, Value)>,
) -> Result<Vec<MetricLine>> {
    let blacklist: Blacklist = cluster.compile_blacklist();
    let mut lines = Vec::new();

    for (group, topics) in entries {
        // A group without a topic map has nothing to report; the other groups still do.
        let topics = match container_entries(topics) {
            Ok(topics) => topics,
            Err(kind) => {
                warn!(
                    cluster = %cluster.name,
                    group = %group,
                    kind,
                    "Skipping consumer group without a topic map"
                );
                continue;
            }
        };

        for (topic, record) in topics {
            if blacklist.suppresses(&group, &topic) {
                continue;
            }

            let path = format!("{group}/{topic}");
            let total = read_total(cluster, Endpoint::ConsumerGroupDistance, &path, &record)?;
            lines.push(MetricLine::distance(
                hostname,
                cluster.name.as_str(),
                group.as_str(),
                topic,
                threshold,
                total,
            ));
        }
    }

    Ok(lines)
}

/// A record without an integral `total` that fits in an `i64` is treated as bad
/// upstream data. Whole floats such as `150.0` are accepted.
fn read_total(cluster: &ClusterConfig, endpoint: Endpoint, path: &str, record: &Value) -> Result<i64> {
    let invalid = |reason: String| MonitorError::InvalidRecord {
        cluster: cluster.name.clone(),
        endpoint,
        path: path.to_string(),
        reason,
    };

    match record.get("total") {
        Some(total) => integral_total(total).ok_or_else(|| {
            invalid(format!(
                "'total' is {} ({total}), expected an integer within i64 range",
                value_kind(total)
            ))
        }),
        None => Err(invalid(format!(
            "record is {} without a 'total' field",
            value_kind(record)
        ))),
    }
}

fn integral_total(total: &Value) -> Option<i64> {
    if let Some(value) = total.as_i64() {
        return Some(value);
    }

    // Kafka offsets are signed 64-bit, so anything past i64::MAX is not an offset
    let value = total.as_f64()?;
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}
