//! Read-only access to Kafka Connect REST hosts.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use url::Url;

use crate::error::ConnectError;

mod client;
mod model;

pub use client::RestConnectClient;
pub use model::{ConnectorState, ConnectorStatus, TaskStatus};

/// The two queries the collector issues against a Kafka Connect host.
///
/// Implementations make exactly one attempt per call; a failed call is reported, never retried.
#[async_trait]
pub trait ConnectApi: Send + Sync + 'static {
    /// `GET {host}/connectors`
    async fn list_connectors(&self, host: &Host) -> Result<Vec<String>, ConnectError>;

    /// `GET {host}/connectors/{connector}/status`, with `connector` escaped as one path segment.
    async fn connector_status(&self, host: &Host, connector: &str) -> Result<ConnectorStatus, ConnectError>;
}

/// Base URL of one Kafka Connect REST endpoint.
///
/// The configured text is kept verbatim (trimmed) as the `host` metric label, while requests
/// are built from the parsed URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host {
    label: String,
    base: Url,
}

impl Host {
    pub fn parse(host: impl AsRef<str>) -> Result<Self, ConnectError> {
        let label = host.as_ref().trim().to_string();
        let base = Url::parse(&label).map_err(|source| ConnectError::UrlParse { host: label.clone(), source })?;
        if base.cannot_be_a_base() {
            return Err(ConnectError::NotABaseUrl(label));
        }

        Ok(Self { label, base })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.label.as_str()
    }

    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn connectors_url(&self) -> Result<Url, ConnectError> {
        self.endpoint(["connectors"])
    }

    pub fn connector_status_url(&self, connector: &str) -> Result<Url, ConnectError> {
        self.endpoint(["connectors", connector, "status"])
    }

    fn endpoint<I>(&self, segments: I) -> Result<Url, ConnectError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ConnectError::NotABaseUrl(self.label.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for Host {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Host {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use claim::*;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_host_keeps_configured_label() {
        let host = assert_ok!(Host::parse(" http://connect-1:8083 "));
        assert_eq!(host.as_str(), "http://connect-1:8083");
        assert_eq!(host.to_string(), "http://connect-1:8083");
    }

    #[test]
    fn test_connectors_url() {
        let host = assert_ok!(Host::parse("http://localhost:4444"));
        assert_eq!(
            assert_ok!(host.connectors_url()).as_str(),
            "http://localhost:4444/connectors"
        );

        let host = assert_ok!(Host::parse("https://gateway.internal/kafka-connect/"));
        assert_eq!(
            assert_ok!(host.connectors_url()).as_str(),
            "https://gateway.internal/kafka-connect/connectors"
        );
    }

    #[test]
    fn test_connector_status_url_escapes_name() {
        let host = assert_ok!(Host::parse("http://localhost:8083"));
        assert_eq!(
            assert_ok!(host.connector_status_url("orders-sink")).as_str(),
            "http://localhost:8083/connectors/orders-sink/status"
        );
        assert_eq!(
            assert_ok!(host.connector_status_url("orders sink/v2?#%")).as_str(),
            "http://localhost:8083/connectors/orders%20sink%2Fv2%3F%23%25/status"
        );
    }

    #[test]
    fn test_reject_invalid_hosts() {
        assert_err!(Host::parse("not a url"));
        assert_err!(Host::parse(""));
        let err = assert_err!(Host::parse("mailto:ops@example.com"));
        assert!(matches!(err, ConnectError::NotABaseUrl(_)));
    }
}
