pub mod cache;
pub mod pool;
pub mod service;

use chrono::{DateTime, Timelike, Utc};

pub use cache::{CacheEntry, RateCache};
pub use service::FundingRateService;

/// Upper bound on cached symbols.
pub const MAX_CACHE_ENTRIES: usize = 500;

/// Worker count used by batch fetches unless configured otherwise.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 10;

/// Source of wall-clock time, swappable so tests can cross hour boundaries.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Zeroes minutes, seconds and sub-seconds. Always UTC.
pub fn truncate_to_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}
