use std::fmt::Debug;

use either::{Either, Left, Right};
use thiserror::Error;

mod connect_errors;
mod exposition_errors;
mod settings_errors;

pub use connect_errors::{ConnectError, ConnectOperation};
pub use exposition_errors::ExpositionError;
pub use settings_errors::SettingsError;

/// Hierarchical, metric-friendly label for an error, e.g. `connect::upstream`.
pub trait MetricLabel {
    fn label(&self) -> String {
        match self.next() {
            Either::Right(n) => format!("{}::{}", self.slug(), n.label()),
            Either::Left(ls) => format!("{}::{}", self.slug(), ls),
        }
    }

    fn slug(&self) -> String;
    fn next(&self) -> Either<String, Box<&dyn MetricLabel>>;
}

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("{0}")]
    Connect(#[from] ConnectError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Metrics(#[from] prometheus::Error),

    #[error("HTTP server failed: {0}")]
    Server(#[source] std::io::Error),

    #[error("Could not join task handle: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl MetricLabel for ExporterError {
    fn slug(&self) -> String {
        "exporter".into()
    }

    fn next(&self) -> Either<String, Box<&dyn MetricLabel>> {
        match self {
            Self::Connect(e) => Right(Box::new(e)),
            Self::Settings(e) => Right(Box::new(e)),
            Self::Metrics(_) => Left("prometheus".into()),
            Self::Server(_) => Left("server".into()),
            Self::Join(_) => Left("join".into()),
        }
    }
}
