use crate::api::Endpoint;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cluster '{cluster}': {endpoint} request failed: {source}")]
    Request {
        cluster: String,
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Cluster '{cluster}': malformed {endpoint} response: {reason}")]
    MalformedResponse {
        cluster: String,
        endpoint: Endpoint,
        reason: String,
    },

    #[error("Cluster '{cluster}': invalid {endpoint} record at '{path}': {reason}")]
    InvalidRecord {
        cluster: String,
        endpoint: Endpoint,
        path: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, MonitorError>;
