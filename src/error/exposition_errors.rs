use either::{Either, Left};
use thiserror::Error;

use super::MetricLabel;

#[derive(Debug, Error)]
pub enum ExpositionError {
    #[error("failed to build or encode metrics: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("encoded metrics are not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl MetricLabel for ExpositionError {
    fn slug(&self) -> String {
        "exposition".into()
    }

    fn next(&self) -> Either<String, Box<&dyn MetricLabel>> {
        match self {
            Self::Prometheus(_) => Left("prometheus".into()),
            Self::Utf8(_) => Left("utf8".into()),
        }
    }
}
