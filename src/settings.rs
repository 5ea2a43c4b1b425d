pub use model::*;

mod model;

use std::path::{Path, PathBuf};

use clap::Parser;
use config::{Config, Environment, File};

use crate::error::SettingsError;

/// Loads settings from built-in defaults, an optional configuration file named on the command
/// line, and finally the process environment (e.g. `PORT`, `KAFKA_CONNECT_HOSTS`).
pub fn get_settings() -> Result<Settings, SettingsError> {
    let options = CliOptions::parse();
    tracing::info!(config=?options.config, "CLI parsed");
    Settings::load(options.config.as_deref(), Environment::default())
}

#[derive(Debug, Parser)]
#[command(version, about = "Prometheus exporter for Kafka Connect task states")]
pub struct CliOptions {
    /// Optional configuration file overriding the built-in defaults. Environment variables take
    /// precedence over both.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Settings {
    #[tracing::instrument(level = "info", skip(environment))]
    pub fn load(config_path: Option<&Path>, environment: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Self = builder.add_source(environment).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use claim::*;
    use pretty_assertions::assert_eq;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: config::Map<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Environment::default().source(Some(source))
    }

    fn host_labels(settings: &Settings) -> Vec<&str> {
        settings.kafka_connect_hosts.iter().map(|h| h.as_str()).collect()
    }

    #[test]
    fn test_load_defaults() {
        let actual = assert_ok!(Settings::load(None, env(&[])));
        assert_eq!(actual, Settings::default());
        assert_eq!(actual.port, 9113);
        assert_eq!(actual.metrics_endpoint, "/metrics");
        assert_eq!(actual.health_check_endpoint, "/health");
        assert_eq!(host_labels(&actual), vec!["http://localhost:4444"]);
        assert_eq!(actual.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_load_from_environment() {
        let actual = assert_ok!(Settings::load(
            None,
            env(&[
                ("PORT", "9200"),
                ("METRICS_ENDPOINT", "/prometheus"),
                ("HEALTH_CHECK_ENDPOINT", "/healthz"),
                ("KAFKA_CONNECT_HOSTS", "http://connect-1:8083,http://connect-2:8083"),
                ("REQUEST_TIMEOUT_SECS", "3"),
                ("UNRELATED_VARIABLE", "ignored"),
            ])
        ));

        assert_eq!(actual.port, 9200);
        assert_eq!(actual.metrics_endpoint, "/prometheus");
        assert_eq!(actual.health_check_endpoint, "/healthz");
        assert_eq!(host_labels(&actual), vec!["http://connect-1:8083", "http://connect-2:8083"]);
        assert_eq!(actual.request_timeout, Duration::from_secs(3));
        assert_eq!(actual.scrape_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_environment_overrides_config_file() {
        let dir = std::env::temp_dir().join(format!("kafka-connect-exporter-settings-{}", std::process::id()));
        assert_ok!(std::fs::create_dir_all(&dir));
        let path = dir.join("exporter.toml");
        let mut file = assert_ok!(std::fs::File::create(&path));
        assert_ok!(writeln!(
            file,
            "port = 9300\nkafka_connect_hosts = [\"http://file-host:8083\"]\nscrape_timeout_secs = 12"
        ));

        let actual = assert_ok!(Settings::load(Some(&path), env(&[("PORT", "9400")])));
        assert_eq!(actual.port, 9400);
        assert_eq!(host_labels(&actual), vec!["http://file-host:8083"]);
        assert_eq!(actual.scrape_timeout, Duration::from_secs(12));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_reject_invalid_settings() {
        assert_err!(Settings::load(None, env(&[("KAFKA_CONNECT_HOSTS", " , ")])));
        assert_err!(Settings::load(None, env(&[("KAFKA_CONNECT_HOSTS", "connect-1:8083")])));
        assert_err!(Settings::load(None, env(&[("KAFKA_CONNECT_HOSTS", "http://a:1,http://a:1")])));
        assert_err!(Settings::load(None, env(&[("METRICS_ENDPOINT", "metrics")])));
        assert_err!(Settings::load(None, env(&[("HEALTH_CHECK_ENDPOINT", "/metrics")])));
        assert_err!(Settings::load(None, env(&[("PORT", "not-a-port")])));
    }
}
