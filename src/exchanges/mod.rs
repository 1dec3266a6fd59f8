use crate::errors::FundingError;
use crate::models::FundingRateSeries;
use async_trait::async_trait;

pub mod kraken;

/// Upstream market-data API the funding-rate cache sits in front of.
#[async_trait]
pub trait Exchange: Send + Sync {
    fn name(&self) -> &'static str;

    /// Full funding-rate history for one symbol. `symbol` is already trimmed.
    async fn fetch_funding_rates(&self, symbol: &str) -> Result<FundingRateSeries, FundingError>;

    /// Ticker list, passed through as opaque JSON.
    async fn fetch_tickers(&self) -> Result<serde_json::Value, FundingError>;
}
