//! Renders a scrape's samples into the Prometheus text exposition format.
//!
//! Every scrape gets a fresh registry of gauges, so series for hosts or connectors that could not
//! be collected are absent rather than stale.

use std::collections::HashMap;

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::collector::{self, Sample, SAMPLE_FAMILIES};
use crate::error::ExpositionError;
use crate::server;

pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Registers the exporter's own operational metrics.
#[tracing::instrument(level = "info", skip(registry))]
pub fn register_exporter_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(collector::UPSTREAM_ERRORS.clone()))?;
    registry.register(Box::new(server::SCRAPE_DURATION.clone()))?;
    registry.register(Box::new(server::SCRAPE_TIMEOUTS.clone()))?;

    #[cfg(target_os = "linux")]
    registry.register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

    Ok(())
}

/// Renders `samples` as gauges, followed by everything gathered from `exporter_registry`.
#[tracing::instrument(level = "debug", skip(samples, exporter_registry), fields(nr_samples=%samples.len()))]
pub fn render(samples: &[Sample], exporter_registry: &Registry) -> Result<String, ExpositionError> {
    let mut families = gather_samples(samples)?;
    families.extend(exporter_registry.gather());
    encode(&families)
}

fn gather_samples(samples: &[Sample]) -> Result<Vec<MetricFamily>, ExpositionError> {
    let registry = Registry::new();
    let mut gauges = HashMap::with_capacity(SAMPLE_FAMILIES.len());
    for family in SAMPLE_FAMILIES.iter() {
        let gauge = GaugeVec::new(Opts::new(family.name, family.help), family.labels)?;
        registry.register(Box::new(gauge.clone()))?;
        gauges.insert(family.name, gauge);
    }

    for sample in samples {
        match gauges.get(sample.name) {
            Some(gauge) => {
                let labels: HashMap<&str, &str> = sample.labels.iter().map(|(k, v)| (*k, v.as_str())).collect();
                gauge.get_metric_with(&labels)?.set(sample.value);
            },
            None => tracing::warn!(%sample, "sample does not belong to a known metric family; skipping."),
        }
    }

    Ok(registry.gather())
}

pub fn encode(families: &[MetricFamily]) -> Result<String, ExpositionError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
