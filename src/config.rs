use crate::error::{MonitorError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Kernel and distribution sources consulted when no hostname is configured.
const HOSTNAME_FILES: [&str; 2] = ["/proc/sys/kernel/hostname", "/etc/hostname"];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub exporter: ExporterConfig,
    #[serde(default = "default_clusters")]
    pub clusters: Vec<ClusterConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExporterConfig {
    /// Base URL of the offset API, including the trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    /// Host name written at the start of every line. Looked up from the OS when unset.
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: i64,
    /// Per-request timeout. Requests wait indefinitely when unset.
    #[serde(with = "humantime_serde", default)]
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClusterConfig {
    pub name: String,
    /// Zookeeper connection string, `host:port[,host:port...]/chroot`.
    pub zookeeper: String,
    /// Consumer group -> topics whose distance is never reported.
    #[serde(default)]
    pub blacklist: HashMap<String, Vec<String>>,
}

fn default_api_url() -> String {
    "http://localhost:8098/".to_string()
}

fn default_output_file() -> PathBuf {
    PathBuf::from("/tmp/kafka_cluster_monitor")
}

fn default_distance_threshold() -> i64 {
    2000
}

fn default_clusters() -> Vec<ClusterConfig> {
    let blacklist = HashMap::from([
        (
            "3ea39300b500528bf516957747ba9853".to_string(),
            vec!["cart_op".to_string()],
        ),
        (
            "d852d778ec3037471bbae9835047ec5f".to_string(),
            vec!["cart_operation".to_string()],
        ),
    ]);

    vec![ClusterConfig {
        name: "cart".to_string(),
        zookeeper: "10.0.0.1:2181,10.0.0.2:2181,10.0.0.3:2181/kafka".to_string(),
        blacklist,
    }]
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            output_file: default_output_file(),
            hostname: None,
            distance_threshold: default_distance_threshold(),
            request_timeout: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exporter: ExporterConfig::default(),
            clusters: default_clusters(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or fall back to the built-in registry when no
    /// path is given.
    pub fn load(path: Option<&str>) -> Result<Config> {
        let Some(config_path) = path else {
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        };

        if !Path::new(config_path).exists() {
            return Err(MonitorError::Config(format!(
                "Configuration file not found: {}",
                config_path
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let content = Self::substitute_env_vars(&content)?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| MonitorError::Config(format!("TOML parse error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        // ${VAR} and ${?VAR} expand to the value or "", ${VAR:-default} falls back to "default"
        let re = Regex::new(r"\$\{\??([^}:-]+)(?::-([^}]*))?\}")?;
        Ok(re
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                let default_value = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                std::env::var(var_name).unwrap_or_else(|_| default_value.to_string())
            })
            .to_string())
    }

    pub fn validate(&self) -> Result<()> {
        if self.exporter.api_url.trim().is_empty() {
            return Err(MonitorError::Config(
                "exporter.api_url cannot be empty".to_string(),
            ));
        }

        if self.exporter.output_file.as_os_str().is_empty() {
            return Err(MonitorError::Config(
                "exporter.output_file cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for cluster in &self.clusters {
            cluster.validate()?;
            if !seen.insert(cluster.name.as_str()) {
                return Err(MonitorError::Config(format!(
                    "Cluster '{}' is configured more than once",
                    cluster.name
                )));
            }
        }

        Ok(())
    }
}

impl ExporterConfig {
    /// Host name for metric lines: the configured value, otherwise the kernel's
    /// hostname, `$HOSTNAME`, or `/etc/hostname`, whichever is found first.
    pub fn resolve_hostname(&self) -> Result<String> {
        if let Some(name) = non_empty(self.hostname.as_deref()) {
            return Ok(name);
        }

        if let Some(name) = read_hostname_file(HOSTNAME_FILES[0]) {
            return Ok(name);
        }

        if let Some(name) = non_empty(std::env::var("HOSTNAME").ok().as_deref()) {
            return Ok(name);
        }

        if let Some(name) = read_hostname_file(HOSTNAME_FILES[1]) {
            return Ok(name);
        }

        Err(MonitorError::Config(
            "Unable to determine hostname, set exporter.hostname".to_string(),
        ))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn read_hostname_file(path: &str) -> Option<String> {
    non_empty(std::fs::read_to_string(path).ok().as_deref())
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(MonitorError::Config(
                "Cluster name cannot be empty".to_string(),
            ));
        }

        if self.zookeeper.is_empty() {
            return Err(MonitorError::Config(format!(
                "Cluster '{}': zookeeper cannot be empty",
                self.name
            )));
        }

        Ok(())
    }

    pub fn compile_blacklist(&self) -> Blacklist {
        let groups = self
            .blacklist
            .iter()
            .map(|(group, topics)| (group.clone(), topics.iter().cloned().collect()))
            .collect();

        Blacklist { groups }
    }
}

/// Exact-match suppression of (group, topic) pairs within one cluster.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    groups: HashMap<String, HashSet<String>>,
}

impl Blacklist {
    pub fn suppresses(&self, group: &str, topic: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|topics| topics.contains(topic))
    }
}
