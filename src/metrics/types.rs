use crate::metrics::definitions::{
    GROUP_NOT_APPLICABLE, ITEM_KEY, METRIC_DISTANCE, METRIC_LATEST_OFFSET, UNBOUNDED_THRESHOLD,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKey {
    LatestOffset,
    Distance,
}

impl MetricKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LatestOffset => METRIC_LATEST_OFFSET,
            Self::Distance => METRIC_DISTANCE,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One data point in Zabbix sender format:
/// `<host> kafka_monitor[<key>,<cluster>,<group>,<topic>,<threshold>] <value>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLine {
    pub host: String,
    pub key: MetricKey,
    pub cluster: String,
    /// `None` renders as `na`.
    pub group: Option<String>,
    pub topic: String,
    /// `None` renders as the unbounded sentinel.
    pub threshold: Option<i64>,
    pub value: i64,
}

impl MetricLine {
    pub fn latest_offset(
        host: impl Into<String>,
        cluster: impl Into<String>,
        topic: impl Into<String>,
        value: i64,
    ) -> Self {
        Self {
            host: host.into(),
            key: MetricKey::LatestOffset,
            cluster: cluster.into(),
            group: None,
            topic: topic.into(),
            threshold: None,
            value,
        }
    }

    pub fn distance(
        host: impl Into<String>,
        cluster: impl Into<String>,
        group: impl Into<String>,
        topic: impl Into<String>,
        threshold: i64,
        value: i64,
    ) -> Self {
        Self {
            host: host.into(),
            key: MetricKey::Distance,
            cluster: cluster.into(),
            group: Some(group.into()),
            topic: topic.into(),
            threshold: Some(threshold),
            value,
        }
    }

    pub fn group_label(&self) -> &str {
        self.group.as_deref().unwrap_or(GROUP_NOT_APPLICABLE)
    }

    pub fn threshold_value(&self) -> i64 {
        self.threshold.unwrap_or(UNBOUNDED_THRESHOLD)
    }
}

impl fmt::Display for MetricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}[{},{},{},{},{}] {}",
            self.host,
            ITEM_KEY,
            self.key,
            self.cluster,
            self.group_label(),
            self.topic,
            self.threshold_value(),
            self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_strategies::strategies::{
        arb_cluster_name, arb_group_id, arb_topic, arb_total,
    };
    use proptest::prelude::*;

    #[test]
    fn test_latest_offset_line_format() {
        let line = MetricLine::latest_offset("monitor-01", "cart", "orders", 150);
        assert_eq!(
            line.to_string(),
            "monitor-01 kafka_monitor[latest_offset,cart,na,orders,9223372036854775807] 150"
        );
    }

    #[test]
    fn test_distance_line_format() {
        let line = MetricLine::distance("monitor-01", "cart", "g1", "orders", 2000, 5);
        assert_eq!(
            line.to_string(),
            "monitor-01 kafka_monitor[distance,cart,g1,orders,2000] 5"
        );
    }

    #[test]
    fn test_negative_distance_is_rendered_verbatim() {
        let line = MetricLine::distance("h", "cart", "g1", "orders", 2000, -3);
        assert!(line.to_string().ends_with("] -3"));
    }

    proptest! {
        /// Every line splits into host, item key and value, with the parameters in order
        #[test]
        fn prop_line_layout(
            cluster in arb_cluster_name(),
            group in arb_group_id(),
            topic in arb_topic(),
            value in arb_total(),
        ) {
            let line = MetricLine::distance("host", &cluster, &group, &topic, 2000, value);
            let rendered = line.to_string();

            let (head, tail) = rendered.rsplit_once(' ').expect("line should have a value");
            prop_assert_eq!(tail.parse::<i64>().unwrap(), value);

            let expected = format!("host kafka_monitor[distance,{cluster},{group},{topic},2000]");
            prop_assert_eq!(head, expected);
        }

        /// Latest-offset lines always carry the unbounded threshold and `na` group
        #[test]
        fn prop_latest_offset_threshold(topic in arb_topic(), value in arb_total()) {
            let line = MetricLine::latest_offset("host", "cart", &topic, value);
            prop_assert_eq!(line.threshold_value(), i64::MAX);
            prop_assert_eq!(line.group_label(), "na");
            let expected_suffix = format!(",{topic},{}] {value}", i64::MAX);
            prop_assert!(line.to_string().ends_with(&expected_suffix));
        }
    }
}
