use kafka_connect_exporter::exposition::register_exporter_metrics;
use kafka_connect_exporter::server::{self, AppState, Server};
use kafka_connect_exporter::settings::get_settings;
use kafka_connect_exporter::tracing::{get_subscriber, init_subscriber};
use kafka_connect_exporter::{ConnectCollector, ExporterResult, RestConnectClient};
use prometheus::Registry;

#[tokio::main]
async fn main() -> ExporterResult<()> {
    let subscriber = get_subscriber("kafka_connect_exporter", "info");
    init_subscriber(subscriber);

    let main_span = tracing::info_span!("main");
    let _main_span_guard = main_span.enter();

    let settings = get_settings()?;
    tracing::info!(?settings, "loaded settings.");

    let client = RestConnectClient::new(settings.request_timeout)?;
    let collector = ConnectCollector::new(client, settings.kafka_connect_hosts.clone())
        .with_channel_capacity(settings.channel_capacity);

    let registry = Registry::new();
    register_exporter_metrics(&registry)?;

    let state = AppState::new(collector, registry, settings.scrape_timeout);
    let server = Server::bind(&settings, state).await?;
    tracing::info!(
        address=%server.local_addr()?,
        metrics_endpoint=%settings.metrics_endpoint,
        health_check_endpoint=%settings.health_check_endpoint,
        "serving Kafka Connect metrics."
    );

    server.run_until(server::shutdown_signal()).await?;
    tracing::info!("shutdown complete.");
    Ok(())
}
