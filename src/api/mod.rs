pub mod error;
pub mod handlers;
pub mod models;
pub mod router;

use crate::collateral::CollateralStore;
use crate::config::Config;
use crate::funding::FundingRateService;
use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub rates: Arc<FundingRateService>,
    pub collateral: CollateralStore,
}

pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Wraps the funding-rate service in an Arc for shared handler access.
    pub fn new(rates: FundingRateService, collateral: CollateralStore) -> Self {
        Self {
            state: AppState {
                rates: Arc::new(rates),
                collateral,
            },
        }
    }

    /// Binds the server to the configured port and serves until Ctrl+C.
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        // installs the global metrics recorder, so only done once per process
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let app = router::build(self.state)
            .route(
                "/metrics",
                get(move || std::future::ready(metric_handle.render())),
            )
            .layer(prometheus_layer);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
        tracing::info!("API server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
