use std::fmt;

use either::{Either, Left};
use thiserror::Error;

use super::MetricLabel;

/// Status reported for failures that never produced an upstream HTTP response.
pub const INTERNAL_ERROR_STATUS: u16 = 500;

/// The two read-only requests made against a Kafka Connect host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectOperation {
    ListConnectors,
    ConnectorStatus,
}

impl ConnectOperation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ListConnectors => "list_connectors",
            Self::ConnectorStatus => "connector_status",
        }
    }

    const fn failure_summary(&self) -> &'static str {
        match self {
            Self::ListConnectors => "Failed to get connectors",
            Self::ConnectorStatus => "Failed to get connector status",
        }
    }
}

impl fmt::Display for ConnectOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of errors occurring while querying a Kafka Connect REST host.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The host could not be reached, timed out, or the response body could not be read.
    #[error("{operation} request to {url} failed: {source}")]
    Transport {
        operation: ConnectOperation,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The host answered with something other than `200 OK`.
    #[error("{}. status: {}, body: {}", .operation.failure_summary(), .status, .body)]
    Upstream {
        operation: ConnectOperation,
        status: u16,
        body: String,
    },

    /// A `200 OK` response whose body is not the expected JSON shape.
    #[error("failed to decode {operation} response from {url}: {source}")]
    Decode {
        operation: ConnectOperation,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse Kafka Connect host url, {host}: {source}")]
    UrlParse {
        host: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Kafka Connect host url cannot be a basis for http requests: {0}")]
    NotABaseUrl(String),

    #[error("failed to build Kafka Connect http client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ConnectError {
    /// HTTP-style status for reporting; failures without an upstream response map to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => INTERNAL_ERROR_STATUS,
        }
    }
}

impl MetricLabel for ConnectError {
    fn slug(&self) -> String {
        "connect".into()
    }

    fn next(&self) -> Either<String, Box<&dyn MetricLabel>> {
        match self {
            Self::Transport { .. } => Left("transport".into()),
            Self::Upstream { .. } => Left("upstream".into()),
            Self::Decode { .. } => Left("decode".into()),
            Self::UrlParse { .. } | Self::NotABaseUrl(_) => Left("url".into()),
            Self::Client(_) => Left("client".into()),
        }
    }
}
