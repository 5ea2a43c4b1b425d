use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::collector::DEFAULT_CHANNEL_CAPACITY;
use crate::connect::Host;
use crate::error::SettingsError;

pub const DEFAULT_PORT: u16 = 9113;
pub const DEFAULT_METRICS_ENDPOINT: &str = "/metrics";
pub const DEFAULT_HEALTH_CHECK_ENDPOINT: &str = "/health";
pub const DEFAULT_KAFKA_CONNECT_HOST: &str = "http://localhost:4444";

/// Process configuration, loaded once at start and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub bind_address: IpAddr,

    pub port: u16,

    pub metrics_endpoint: String,

    pub health_check_endpoint: String,

    #[serde(
        serialize_with = "crate::serde::serialize_hosts",
        deserialize_with = "crate::serde::deserialize_hosts"
    )]
    pub kafka_connect_hosts: Vec<Host>,

    /// Bound on each individual request to a Kafka Connect host.
    #[serde(
        rename = "request_timeout_secs",
        serialize_with = "crate::serde::serialize_duration_secs",
        deserialize_with = "crate::serde::deserialize_duration_secs"
    )]
    pub request_timeout: Duration,

    /// Bound on one whole collection run; samples of a run that overruns are discarded.
    #[serde(
        rename = "scrape_timeout_secs",
        serialize_with = "crate::serde::serialize_duration_secs",
        deserialize_with = "crate::serde::deserialize_duration_secs"
    )]
    pub scrape_timeout: Duration,

    #[serde(
        rename = "shutdown_timeout_secs",
        serialize_with = "crate::serde::serialize_duration_secs",
        deserialize_with = "crate::serde::deserialize_duration_secs"
    )]
    pub shutdown_timeout: Duration,

    pub channel_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            metrics_endpoint: DEFAULT_METRICS_ENDPOINT.to_string(),
            health_check_endpoint: DEFAULT_HEALTH_CHECK_ENDPOINT.to_string(),
            kafka_connect_hosts: Host::parse(DEFAULT_KAFKA_CONNECT_HOST).into_iter().collect(),
            request_timeout: Duration::from_secs(10),
            scrape_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(5),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Settings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.kafka_connect_hosts.is_empty() {
            return Err(SettingsError::NoHosts);
        }

        let mut seen = HashSet::with_capacity(self.kafka_connect_hosts.len());
        for host in &self.kafka_connect_hosts {
            if !seen.insert(host.as_str()) {
                return Err(SettingsError::InvalidHost {
                    host: host.to_string(),
                    reason: "configured more than once".to_string(),
                });
            }
        }

        Self::check_path("metrics_endpoint", &self.metrics_endpoint)?;
        Self::check_path("health_check_endpoint", &self.health_check_endpoint)?;
        if self.metrics_endpoint == self.health_check_endpoint {
            return Err(SettingsError::InvalidPath {
                setting: "health_check_endpoint".to_string(),
                path: format!("{} collides with metrics_endpoint", self.health_check_endpoint),
            });
        }

        if self.channel_capacity == 0 {
            return Err(SettingsError::Bootstrap {
                message: "channel capacity must be positive".to_string(),
                setting: "channel_capacity".to_string(),
            });
        }

        Ok(())
    }

    fn check_path(setting: &str, path: &str) -> Result<(), SettingsError> {
        if path.starts_with('/') {
            Ok(())
        } else {
            Err(SettingsError::InvalidPath { setting: setting.to_string(), path: path.to_string() })
        }
    }
}
