use super::cache::RateCache;
use super::pool::run_bounded;
use super::{truncate_to_hour, Clock, SystemClock, DEFAULT_BATCH_CONCURRENCY};
use crate::errors::FundingError;
use crate::exchanges::Exchange;
use crate::models::{BatchResult, FundingRateSeries};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Funding-rate history lookups in front of a rate-limited upstream.
///
/// Single symbols are served from an hour-bucketed cache or fetched once per
/// hour; batches fan out over a bounded worker pool and report failures per
/// symbol instead of failing as a whole.
pub struct FundingRateService {
    exchange: Arc<dyn Exchange>,
    cache: RateCache,
    clock: Arc<dyn Clock>,
    // one lock per symbol currently being resolved, so concurrent callers for
    // the same symbol share a single upstream request
    inflight: DashMap<String, Arc<Mutex<()>>>,
    batch_concurrency: usize,
}

impl FundingRateService {
    pub fn new(exchange: Arc<dyn Exchange>) -> Self {
        Self {
            exchange,
            cache: RateCache::new(),
            clock: Arc::new(SystemClock),
            inflight: DashMap::new(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = RateCache::with_capacity(capacity);
        self
    }

    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency.max(1);
        self
    }

    pub fn exchange(&self) -> &dyn Exchange {
        self.exchange.as_ref()
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Worker count used when callers have no preference.
    pub fn batch_concurrency(&self) -> usize {
        self.batch_concurrency
    }

    /// Returns the funding-rate history for one symbol.
    ///
    /// Served from cache while the entry's hour bucket matches the current
    /// UTC hour, otherwise fetched from upstream and cached. Failed fetches
    /// leave the cache untouched.
    pub async fn fetch_series(&self, symbol: &str) -> Result<FundingRateSeries, FundingError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(FundingError::InvalidArgument("Symbol is required".to_string()));
        }

        let bucket = truncate_to_hour(self.clock.now());
        if let Some(series) = self.cache.get_fresh(symbol, bucket) {
            metrics::counter!("funding_cache_hits_total").increment(1);
            tracing::debug!("[{}] {symbol} cache hit", self.exchange.name());
            return Ok(series);
        }

        let lock = self.inflight.entry(symbol.to_string()).or_default().clone();
        let result = {
            let _guard = lock.lock().await;
            self.refresh(symbol, bucket).await
        };

        drop(lock);
        self.inflight
            .remove_if(symbol, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn refresh(
        &self,
        symbol: &str,
        bucket: DateTime<Utc>,
    ) -> Result<FundingRateSeries, FundingError> {
        let name = self.exchange.name();

        // filled by another caller while we waited on the symbol lock
        if let Some(series) = self.cache.get_fresh(symbol, bucket) {
            metrics::counter!("funding_cache_hits_total").increment(1);
            return Ok(series);
        }

        metrics::counter!("funding_cache_misses_total").increment(1);
        tracing::info!("[{name}] fetching funding rates for {symbol}");

        let series = match self.exchange.fetch_funding_rates(symbol).await {
            Ok(series) => series,
            Err(e) => {
                metrics::counter!("funding_upstream_errors_total").increment(1);
                tracing::warn!("[{name}] {symbol} funding rate fetch failed: {e}");
                return Err(e);
            }
        };

        if let Some(evicted) = self.cache.insert(symbol, series.clone(), bucket) {
            metrics::counter!("funding_cache_evictions_total").increment(1);
            tracing::debug!("[{name}] cache full, evicted {evicted}");
        }

        Ok(series)
    }

    /// Fetches many symbols with at most `concurrency` upstream calls in
    /// flight.
    ///
    /// Symbols are trimmed, blanks dropped and duplicates collapsed. Every
    /// remaining symbol ends up in exactly one of the result maps; one
    /// symbol's failure never aborts the others.
    pub async fn fetch_batch<S: AsRef<str>>(&self, symbols: &[S], concurrency: usize) -> BatchResult {
        let unique: BTreeSet<String> = symbols
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let mut result = BatchResult::default();
        if unique.is_empty() {
            return result;
        }

        tracing::info!(
            "[{}] batch of {} symbols, concurrency {}",
            self.exchange.name(),
            unique.len(),
            concurrency
        );

        let symbols: Vec<String> = unique.into_iter().collect();
        let outcomes = run_bounded(symbols, concurrency, move |symbol: String| async move {
            self.fetch_series(&symbol).await
        })
        .await;

        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(series) => {
                    result.rates_by_symbol.insert(symbol, series);
                }
                Err(e) => {
                    result.errors.insert(symbol, e.to_string());
                }
            }
        }

        if result.is_partial() {
            tracing::warn!(
                "[{}] batch finished with {} failed symbols: {:?}",
                self.exchange.name(),
                result.errors.len(),
                result.errors.keys().collect::<Vec<_>>()
            );
        }

        result
    }
}
