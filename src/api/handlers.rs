use super::error::ApiError;
use super::models::{
    BatchResponse, CollateralResponse, FundingRatesResponse, ReplaceCollateralRequest,
    SymbolQuery, SymbolRequest,
};
use super::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Json,
};
use chrono::Utc;
use serde_json::Value;

/// GET /health: simple liveness check
pub async fn health() -> &'static str {
    "OK"
}

/// GET /api/funding-rates?symbol=PF_XBTUSD: history for one symbol
pub async fn get_funding_rates(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<Json<FundingRatesResponse>, ApiError> {
    let symbol = query
        .symbol
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Symbol is required"))?;

    let rates = state.rates.fetch_series(&symbol).await?;

    Ok(Json(FundingRatesResponse {
        result: "success",
        server_time: Utc::now(),
        rates,
    }))
}

/// POST /api/funding-rates/batch: `{"symbols": [...]}`
///
/// Per-symbol failures come back under `errors` with `result: "partial"`.
pub async fn get_funding_rates_batch(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let symbols = body
        .ok()
        .and_then(|Json(body)| match body.get("symbols") {
            Some(Value::Array(items)) if !items.is_empty() => Some(items.clone()),
            _ => None,
        })
        .ok_or_else(|| ApiError::bad_request("symbols array is required"))?;

    let symbols: Vec<String> = symbols
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            _ => Err(ApiError::bad_request("symbols must be strings")),
        })
        .collect::<Result<_, _>>()?;

    let batch = state
        .rates
        .fetch_batch(&symbols, state.rates.batch_concurrency())
        .await;

    Ok(Json(batch.into()))
}

/// GET /api/tickers: upstream ticker list, unmodified
pub async fn get_tickers(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let tickers = state
        .rates
        .exchange()
        .fetch_tickers()
        .await
        .map_err(ApiError::relay_status)?;

    Ok(Json(tickers))
}

/// GET /api/collateral-tickers
pub async fn list_collateral(State(state): State<AppState>) -> Json<CollateralResponse> {
    Json(CollateralResponse {
        tickers: state.collateral.all(),
    })
}

/// POST /api/collateral-tickers: `{"symbol": "PF_XBTUSD"}`
pub async fn add_collateral(
    State(state): State<AppState>,
    body: Result<Json<SymbolRequest>, JsonRejection>,
) -> Result<Json<CollateralResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let tickers = state.collateral.add(&req.symbol)?;
    Ok(Json(CollateralResponse { tickers }))
}

/// DELETE /api/collateral-tickers?symbol=PF_XBTUSD
pub async fn remove_collateral(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<Json<CollateralResponse>, ApiError> {
    let tickers = state
        .collateral
        .remove(query.symbol.as_deref().unwrap_or_default())?;
    Ok(Json(CollateralResponse { tickers }))
}

/// PUT /api/collateral-tickers: `{"tickers": [...]}`
pub async fn replace_collateral(
    State(state): State<AppState>,
    body: Result<Json<ReplaceCollateralRequest>, JsonRejection>,
) -> Result<Json<CollateralResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(Json(CollateralResponse {
        tickers: state.collateral.replace(&req.tickers),
    }))
}
