#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use funding_desk::errors::FundingError;
use funding_desk::exchanges::Exchange;
use funding_desk::funding::Clock;
use funding_desk::models::{FundingRateRecord, FundingRateSeries};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-process upstream. Records every call, tracks peak concurrency and
/// fails chosen symbols with a given HTTP status.
#[derive(Default)]
pub struct MockExchange {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, u16>>,
    tickers_status: Mutex<Option<u16>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    latency: Duration,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn fail(&self, symbol: &str, status: u16) {
        self.failures.lock().unwrap().insert(symbol.to_string(), status);
    }

    pub fn recover(&self, symbol: &str) {
        self.failures.lock().unwrap().remove(symbol);
    }

    pub fn fail_tickers(&self, status: u16) {
        *self.tickers_status.lock().unwrap() = Some(status);
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, symbol: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|s| *s == symbol).count()
    }

    pub fn called_symbols(&self) -> Vec<String> {
        let mut symbols = self.calls.lock().unwrap().clone();
        symbols.sort();
        symbols
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// Deterministic two-record series for a symbol.
pub fn series_for(symbol: &str) -> FundingRateSeries {
    let rate = symbol.len() as f64 * 1e-6;
    vec![
        FundingRateRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            relative_funding_rate: rate,
        },
        FundingRateRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            relative_funding_rate: -rate,
        },
    ]
}

#[async_trait]
impl Exchange for MockExchange {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_funding_rates(&self, symbol: &str) -> Result<FundingRateSeries, FundingError> {
        self.calls.lock().unwrap().push(symbol.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let failure = self.failures.lock().unwrap().get(symbol).copied();
        match failure {
            Some(status) => Err(FundingError::status(status)),
            None => Ok(series_for(symbol)),
        }
    }

    async fn fetch_tickers(&self) -> Result<serde_json::Value, FundingError> {
        let status = *self.tickers_status.lock().unwrap();
        match status {
            Some(status) => Err(FundingError::status(status)),
            None => Ok(serde_json::json!({
                "result": "success",
                "tickers": [{"symbol": "PF_XBTUSD", "fundingRate": 0.5}]
            })),
        }
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
