//! Prometheus exporter for Kafka Connect clusters.
//!
//! Every scrape fans out one task per configured Kafka Connect host, lists that host's
//! connectors, fetches each connector's status and tallies its tasks by run-state. The
//! resulting samples are rendered fresh for that scrape; nothing is carried between scrapes.

pub mod collector;
pub mod connect;
pub mod error;
pub mod exposition;
pub mod serde;
pub mod server;
pub mod settings;
pub mod tally;
pub mod tracing;

pub use collector::{ConnectCollector, Sample, SampleStream};
pub use connect::{ConnectApi, Host, RestConnectClient};
pub use error::ExporterError;
pub use settings::Settings;
pub use tally::{TaskState, TaskTally};

pub type ExporterResult<T> = Result<T, error::ExporterError>;
