use crate::models::{BatchResult, FundingRateSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query for GET /api/funding-rates and DELETE /api/collateral-tickers
#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    pub symbol: Option<String>,
}

/// Body for POST /api/collateral-tickers
#[derive(Debug, Deserialize)]
pub struct SymbolRequest {
    pub symbol: String,
}

/// Body for PUT /api/collateral-tickers
#[derive(Debug, Deserialize)]
pub struct ReplaceCollateralRequest {
    pub tickers: Vec<String>,
}

/// Response for GET /api/funding-rates
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRatesResponse {
    pub result: &'static str,
    pub server_time: DateTime<Utc>,
    pub rates: FundingRateSeries,
}

/// Response for POST /api/funding-rates/batch
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    /// "partial" when any symbol failed
    pub result: &'static str,
    pub server_time: DateTime<Utc>,
    pub rates_by_symbol: BTreeMap<String, FundingRateSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl From<BatchResult> for BatchResponse {
    fn from(batch: BatchResult) -> Self {
        let partial = batch.is_partial();
        Self {
            result: if partial { "partial" } else { "success" },
            server_time: Utc::now(),
            rates_by_symbol: batch.rates_by_symbol,
            errors: partial.then_some(batch.errors),
        }
    }
}

/// Response for every /api/collateral-tickers route
#[derive(Debug, Serialize)]
pub struct CollateralResponse {
    pub tickers: Vec<String>,
}
