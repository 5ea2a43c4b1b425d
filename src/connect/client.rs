use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use super::{ConnectApi, ConnectorStatus, Host};
use crate::error::{ConnectError, ConnectOperation};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`ConnectApi`] over the Kafka Connect REST interface.
///
/// A single `reqwest::Client` is shared by every host; its per-request timeout bounds how long
/// a stalled host can hold up a scrape.
#[derive(Debug, Clone)]
pub struct RestConnectClient {
    client: reqwest::Client,
}

impl RestConnectClient {
    pub fn new(request_timeout: Duration) -> Result<Self, ConnectError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConnectError::Client)?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(level = "trace", skip(self, url), fields(%url))]
    async fn get_json<T>(&self, operation: ConnectOperation, url: Url) -> Result<T, ConnectError>
    where
        T: DeserializeOwned,
    {
        let transport = |source| ConnectError::Transport { operation, url: url.to_string(), source };

        let response = self.client.get(url.clone()).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if status != StatusCode::OK {
            return Err(ConnectError::Upstream { operation, status: status.as_u16(), body });
        }

        serde_json::from_str(&body).map_err(|source| ConnectError::Decode { operation, url: url.to_string(), source })
    }
}

#[async_trait]
impl ConnectApi for RestConnectClient {
    #[tracing::instrument(level = "debug", skip(self, host), fields(%host))]
    async fn list_connectors(&self, host: &Host) -> Result<Vec<String>, ConnectError> {
        let url = host.connectors_url()?;
        self.get_json(ConnectOperation::ListConnectors, url).await
    }

    #[tracing::instrument(level = "debug", skip(self, host), fields(%host))]
    async fn connector_status(&self, host: &Host, connector: &str) -> Result<ConnectorStatus, ConnectError> {
        let url = host.connector_status_url(connector)?;
        self.get_json(ConnectOperation::ConnectorStatus, url).await
    }
}
