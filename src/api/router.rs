use super::handlers;
use super::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds and returns the full Axum router with all routes and shared state.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/funding-rates", get(handlers::get_funding_rates))
        .route(
            "/api/funding-rates/batch",
            post(handlers::get_funding_rates_batch),
        )
        .route("/api/tickers", get(handlers::get_tickers))
        .route(
            "/api/collateral-tickers",
            get(handlers::list_collateral)
                .post(handlers::add_collateral)
                .put(handlers::replace_collateral)
                .delete(handlers::remove_collateral),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
