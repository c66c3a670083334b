/// Zabbix item key wrapping every line's parameters.
pub const ITEM_KEY: &str = "kafka_monitor";

pub const METRIC_LATEST_OFFSET: &str = "latest_offset";
pub const METRIC_DISTANCE: &str = "distance";

/// Group column for metrics that are not tied to a consumer group.
pub const GROUP_NOT_APPLICABLE: &str = "na";

/// Threshold written for metrics without one. The agent's triggers treat it as
/// "never alert".
pub const UNBOUNDED_THRESHOLD: i64 = i64::MAX;
