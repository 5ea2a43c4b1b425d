use either::{Either, Left};
use thiserror::Error;

use super::MetricLabel;

/// Error variants related to configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// Error in configuration settings.
    #[error(transparent)]
    Configuration(#[from] config::ConfigError),

    #[error("invalid Kafka Connect host, {host}: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("no Kafka Connect hosts configured")]
    NoHosts,

    #[error("invalid endpoint path for {setting}: {path}")]
    InvalidPath { setting: String, path: String },

    #[error("error during system bootstrap: {message}: {setting}")]
    Bootstrap { message: String, setting: String },
}

impl MetricLabel for SettingsError {
    fn slug(&self) -> String {
        "settings".into()
    }

    fn next(&self) -> Either<String, Box<&dyn MetricLabel>> {
        match self {
            Self::Configuration(_) => Left("configuration".into()),
            Self::InvalidHost { .. } | Self::NoHosts => Left("hosts".into()),
            Self::InvalidPath { .. } => Left("path".into()),
            Self::Bootstrap { .. } => Left("bootstrap".into()),
        }
    }
}
