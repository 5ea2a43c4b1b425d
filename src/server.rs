//! HTTP surface of the exporter: the scrape endpoint and the liveness probe.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::collector::ConnectCollector;
use crate::error::ExporterError;
use crate::exposition;
use crate::settings::Settings;

pub const HEALTH_RESPONSE: &str = "OK";

pub(crate) static SCRAPE_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(HistogramOpts::new(
        "kafka_connect_exporter_scrape_duration_seconds",
        "Time spent collecting and rendering one scrape",
    ))
    .expect("failed creating kafka_connect_exporter_scrape_duration_seconds metric")
});

pub(crate) static SCRAPE_TIMEOUTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "kafka_connect_exporter_scrape_timeouts_total",
        "Number of scrapes whose collection overran the scrape timeout",
    )
    .expect("failed creating kafka_connect_exporter_scrape_timeouts_total metric")
});

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub collector: ConnectCollector,
    pub registry: Registry,
    pub scrape_timeout: Duration,
}

impl AppState {
    pub fn new(collector: ConnectCollector, registry: Registry, scrape_timeout: Duration) -> Self {
        Self { collector, registry, scrape_timeout }
    }
}

pub fn create_router(state: AppState, metrics_endpoint: &str, health_check_endpoint: &str) -> Router {
    Router::new()
        .route(metrics_endpoint, get(metrics_handler))
        .route(health_check_endpoint, get(health_handler))
        .with_state(state)
}

#[tracing::instrument(level = "info", skip(state))]
async fn metrics_handler(State(state): State<AppState>) -> Response {
    let timer = SCRAPE_DURATION.start_timer();

    let samples = match tokio::time::timeout(state.scrape_timeout, state.collector.gather()).await {
        Ok(samples) => samples,
        Err(_elapsed) => {
            SCRAPE_TIMEOUTS.inc();
            tracing::warn!(
                scrape_timeout=?state.scrape_timeout,
                "collection overran scrape timeout; discarding partial samples."
            );
            Vec::new()
        },
    };

    let rendered = exposition::render(&samples, &state.registry);
    timer.observe_duration();

    match rendered {
        Ok(body) => ([(header::CONTENT_TYPE, exposition::CONTENT_TYPE)], body).into_response(),
        Err(err) => {
            tracing::error!(error=?err, "failed to render metrics.");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        },
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, HEALTH_RESPONSE)
}

/// A bound but not yet serving HTTP listener.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    router: Router,
    shutdown_timeout: Duration,
}

impl Server {
    #[tracing::instrument(level = "info", skip(settings, state), fields(address=%settings.socket_addr()))]
    pub async fn bind(settings: &Settings, state: AppState) -> Result<Self, ExporterError> {
        let listener = TcpListener::bind(settings.socket_addr()).await.map_err(ExporterError::Server)?;
        let router = create_router(state, &settings.metrics_endpoint, &settings.health_check_endpoint);
        Ok(Self { listener, router, shutdown_timeout: settings.shutdown_timeout })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ExporterError> {
        self.listener.local_addr().map_err(ExporterError::Server)
    }

    /// Serves until `signal` completes, then drains in-flight requests for at most the configured
    /// shutdown timeout.
    pub async fn run_until<F>(self, signal: F) -> Result<(), ExporterError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self { listener, router, shutdown_timeout } = self;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        tokio::select! {
            served = &mut handle => return served?.map_err(ExporterError::Server),
            _ = signal => tracing::info!("shutdown requested; draining in-flight requests."),
        }

        let _ = stop_tx.send(());
        match tokio::time::timeout(shutdown_timeout, &mut handle).await {
            Ok(served) => served?.map_err(ExporterError::Server),
            Err(_elapsed) => {
                tracing::warn!(?shutdown_timeout, "graceful shutdown timed out; aborting.");
                handle.abort();
                Ok(())
            },
        }
    }
}

/// Completes on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error=?err, "failed to listen for Ctrl+C.");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(err) => {
                tracing::error!(error=?err, "failed to install SIGTERM handler.");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C signal."),
        _ = terminate => tracing::info!("received terminate signal."),
    }
}
