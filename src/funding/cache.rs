use crate::models::FundingRateSeries;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use super::MAX_CACHE_ENTRIES;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub series: FundingRateSeries,
    /// Hour the entry was populated in. Entries are only served while the
    /// current hour matches.
    pub hour_bucket: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    // keys in first-insertion order, front is evicted first
    order: VecDeque<String>,
}

/// Bounded symbol → series cache with FIFO eviction.
///
/// Eviction follows first-insertion order, not access order: refreshing an
/// existing symbol replaces its entry but keeps its place in the queue.
pub struct RateCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl RateCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
        }
    }

    // a poisoned lock still holds a consistent map, every mutation below
    // completes without panicking
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the series if the entry was populated in `hour_bucket`.
    pub fn get_fresh(&self, symbol: &str, hour_bucket: DateTime<Utc>) -> Option<FundingRateSeries> {
        self.lock()
            .entries
            .get(symbol)
            .filter(|entry| entry.hour_bucket == hour_bucket)
            .map(|entry| entry.series.clone())
    }

    /// Returns the entry regardless of its bucket.
    pub fn peek(&self, symbol: &str) -> Option<CacheEntry> {
        self.lock().entries.get(symbol).cloned()
    }

    /// Stores `series` for `symbol`. Returns the evicted symbol, if the
    /// insert pushed the cache over capacity.
    pub fn insert(
        &self,
        symbol: &str,
        series: FundingRateSeries,
        hour_bucket: DateTime<Utc>,
    ) -> Option<String> {
        let mut inner = self.lock();
        let entry = CacheEntry {
            series,
            hour_bucket,
        };

        if inner.entries.insert(symbol.to_string(), entry).is_some() {
            return None;
        }
        inner.order.push_back(symbol.to_string());

        if inner.entries.len() <= self.capacity {
            return None;
        }

        let oldest = inner.order.pop_front()?;
        inner.entries.remove(&oldest);
        Some(oldest)
    }

    /// Cached symbols, oldest insertion first.
    pub fn symbols(&self) -> Vec<String> {
        self.lock().order.iter().cloned().collect()
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}
