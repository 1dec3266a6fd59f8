use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One historical funding observation. `relative_funding_rate` is a fraction,
/// not a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateRecord {
    pub timestamp: DateTime<Utc>,
    pub relative_funding_rate: f64,
}

/// Records in the order upstream returned them.
pub type FundingRateSeries = Vec<FundingRateRecord>;

/// Outcome of a batch fetch. Each requested symbol lands in exactly one map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub rates_by_symbol: BTreeMap<String, FundingRateSeries>,
    pub errors: BTreeMap<String, String>,
}

impl BatchResult {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}
