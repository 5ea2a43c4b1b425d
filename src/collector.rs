//! Scrape-time collection of Kafka Connect task states.
//!
//! [`ConnectCollector::collect`] fans out one tokio task per configured host. Each host task lists
//! its connectors, emits the host's connector count, then walks the connectors in listing order,
//! tallying each connector's tasks into five samples. All host tasks write into one bounded
//! channel, read concurrently through the returned [`SampleStream`]; the stream ends once every
//! host task has finished.
//!
//! Failures are isolated and logged, never raised to the caller:
//! - a failed connector listing suppresses every sample for that host, including its count;
//! - a failed status fetch suppresses only that connector's five samples.

use std::collections::BTreeMap;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts};
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::connect::{ConnectApi, Host};
use crate::error::{ConnectError, ConnectOperation, MetricLabel};
use crate::tally::TaskTally;

pub const CONNECTOR_COUNT: &str = "kafka_connect_connector_total";
pub const TASK_COUNT: &str = "kafka_connect_connector_task_total";
pub const RUNNING_TASKS: &str = "kafka_connect_connector_running_total";
pub const FAILED_TASKS: &str = "kafka_connect_connector_failed_total";
pub const PAUSED_TASKS: &str = "kafka_connect_connector_paused_total";
pub const UNASSIGNED_TASKS: &str = "kafka_connect_connector_unassigned_total";

pub const HOST_LABEL: &str = "host";
pub const CONNECTOR_LABEL: &str = "connector";

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Name, help text and label names of one emitted gauge family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFamily {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

const CONNECTOR_LABELS: &[&str] = &[CONNECTOR_LABEL, HOST_LABEL];

pub const SAMPLE_FAMILIES: [SampleFamily; 6] = [
    SampleFamily {
        name: CONNECTOR_COUNT,
        help: "Total number of connectors discovered on the Kafka Connect host",
        labels: &[HOST_LABEL],
    },
    SampleFamily {
        name: TASK_COUNT,
        help: "Total number of tasks for the Kafka Connect connector",
        labels: CONNECTOR_LABELS,
    },
    SampleFamily {
        name: RUNNING_TASKS,
        help: "Total number of tasks in the `RUNNING` state",
        labels: CONNECTOR_LABELS,
    },
    SampleFamily {
        name: FAILED_TASKS,
        help: "Total number of tasks in the `FAILED` state (e.g., due to exceptions reported in status)",
        labels: CONNECTOR_LABELS,
    },
    SampleFamily {
        name: PAUSED_TASKS,
        help: "Total number of paused tasks for the Kafka Connect connector",
        labels: CONNECTOR_LABELS,
    },
    SampleFamily {
        name: UNASSIGNED_TASKS,
        help: "Total number of tasks not in the `RUNNING`, `PAUSED` or `FAILED` state (e.g., not assigned to any worker)",
        labels: CONNECTOR_LABELS,
    },
];

pub(crate) static UPSTREAM_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "kafka_connect_exporter_upstream_errors_total",
            "Number of failed requests against Kafka Connect hosts",
        ),
        &["operation", "error_type"],
    )
    .expect("failed creating kafka_connect_exporter_upstream_errors_total metric")
});

#[inline]
fn track_upstream_error(operation: ConnectOperation, error: &ConnectError) {
    UPSTREAM_ERRORS
        .with_label_values(&[operation.as_str(), error.label().as_str()])
        .inc()
}

/// One gauge value destined for the exposition output.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: &'static str,
    pub labels: BTreeMap<&'static str, String>,
    pub value: f64,
}

impl Sample {
    pub fn connector_count(host: &Host, connectors: usize) -> Self {
        let labels = BTreeMap::from([(HOST_LABEL, host.to_string())]);
        Self { name: CONNECTOR_COUNT, labels, value: connectors as f64 }
    }

    pub fn connector_tasks(name: &'static str, host: &Host, connector: &str, tasks: usize) -> Self {
        let labels = BTreeMap::from([(CONNECTOR_LABEL, connector.to_string()), (HOST_LABEL, host.to_string())]);
        Self { name, labels, value: tasks as f64 }
    }

    /// The five per-connector samples, in emission order.
    pub fn for_connector(host: &Host, connector: &str, tally: &TaskTally) -> [Self; 5] {
        [
            Self::connector_tasks(UNASSIGNED_TASKS, host, connector, tally.unassigned),
            Self::connector_tasks(RUNNING_TASKS, host, connector, tally.running),
            Self::connector_tasks(FAILED_TASKS, host, connector, tally.failed),
            Self::connector_tasks(PAUSED_TASKS, host, connector, tally.paused),
            Self::connector_tasks(TASK_COUNT, host, connector, tally.total()),
        ]
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(|v| v.as_str())
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.labels.iter().map(|(k, v)| format!("{}={:?}", k, v)).collect();
        write!(f, "{}{{{}}} {}", self.name, labels.join(","), self.value)
    }
}

/// Samples of one collection run, produced concurrently by the host tasks.
///
/// Dropping the stream before it ends abandons the run; host tasks stop at their next send.
#[derive(Debug)]
pub struct SampleStream {
    rx: mpsc::Receiver<Sample>,
}

impl SampleStream {
    pub async fn next_sample(&mut self) -> Option<Sample> {
        self.rx.recv().await
    }
}

impl Stream for SampleStream {
    type Item = Sample;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Collection orchestrator over a fixed set of Kafka Connect hosts.
#[derive(Clone)]
pub struct ConnectCollector {
    api: Arc<dyn ConnectApi>,
    hosts: Arc<[Host]>,
    channel_capacity: usize,
}

impl fmt::Debug for ConnectCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectCollector")
            .field("hosts", &self.hosts)
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

impl ConnectCollector {
    pub fn new(api: impl ConnectApi, hosts: Vec<Host>) -> Self {
        Self::with_api(Arc::new(api), hosts)
    }

    pub fn with_api(api: Arc<dyn ConnectApi>, hosts: Vec<Host>) -> Self {
        Self { api, hosts: hosts.into(), channel_capacity: DEFAULT_CHANNEL_CAPACITY }
    }

    pub fn with_channel_capacity(self, channel_capacity: usize) -> Self {
        Self { channel_capacity: channel_capacity.max(1), ..self }
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Starts a fresh collection run and returns its samples as they are produced.
    ///
    /// Must be called within a tokio runtime.
    #[tracing::instrument(level = "debug", skip(self), fields(hosts = self.hosts.len()))]
    pub fn collect(&self) -> SampleStream {
        let (tx, rx) = mpsc::channel(self.channel_capacity);

        for host in self.hosts.iter().cloned() {
            let api = Arc::clone(&self.api);
            let tx = tx.clone();
            let span = tracing::info_span!("collect_host", %host);

            tokio::spawn(
                async move {
                    if let Err(err) = collect_host(api.as_ref(), &host, &tx).await {
                        tracing::debug!(error=?err, "sample stream closed before host collection completed.");
                    }
                }
                .instrument(span),
            );
        }

        SampleStream { rx }
    }

    /// Runs one collection and waits for every host task to finish.
    pub async fn gather(&self) -> Vec<Sample> {
        self.collect().collect().await
    }
}

async fn collect_host(
    api: &dyn ConnectApi, host: &Host, tx: &mpsc::Sender<Sample>,
) -> Result<(), mpsc::error::SendError<Sample>> {
    let connectors = match api.list_connectors(host).await {
        Ok(connectors) => connectors,
        Err(err) => {
            report(host, None, ConnectOperation::ListConnectors, &err);
            return Ok(());
        },
    };

    tracing::debug!(nr_connectors=%connectors.len(), "listed connectors.");
    tx.send(Sample::connector_count(host, connectors.len())).await?;

    for connector in connectors {
        let status = match api.connector_status(host, &connector).await {
            Ok(status) => status,
            Err(err) => {
                report(host, Some(&connector), ConnectOperation::ConnectorStatus, &err);
                continue;
            },
        };

        let tally = TaskTally::tally(&status.tasks);
        tracing::trace!(%connector, ?tally, "tallied connector tasks.");
        for sample in Sample::for_connector(host, &connector, &tally) {
            tx.send(sample).await?;
        }
    }

    Ok(())
}

fn report(host: &Host, connector: Option<&str>, operation: ConnectOperation, error: &ConnectError) {
    track_upstream_error(operation, error);
    tracing::error!(
        %host,
        connector = connector,
        %operation,
        status=%error.status_code(),
        error=%error,
        "Kafka Connect request failed; skipping."
    );
}
