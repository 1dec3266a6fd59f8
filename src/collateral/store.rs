use super::{normalize_symbol, DEFAULT_COLLATERAL};
use crate::errors::CollateralError;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Whitelist of collateral-eligible symbols. Every operation returns the
/// resulting list, sorted.
#[derive(Clone)]
pub struct CollateralStore {
    inner: Arc<RwLock<BTreeSet<String>>>,
}

impl CollateralStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    /// Store pre-filled with the default collateral tickers
    pub fn seeded() -> Self {
        let store = Self::new();
        store.write().extend(
            DEFAULT_COLLATERAL
                .iter()
                .map(|ticker| format!("PF_{ticker}USD")),
        );
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeSet<String>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeSet<String>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn all(&self) -> Vec<String> {
        self.read().iter().cloned().collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        normalize_symbol(symbol).is_some_and(|s| self.read().contains(&s))
    }

    pub fn add(&self, symbol: &str) -> Result<Vec<String>, CollateralError> {
        let normalized =
            normalize_symbol(symbol).ok_or_else(|| CollateralError::InvalidSymbol(symbol.to_string()))?;

        let mut set = self.write();
        set.insert(normalized);
        Ok(set.iter().cloned().collect())
    }

    pub fn remove(&self, symbol: &str) -> Result<Vec<String>, CollateralError> {
        let normalized =
            normalize_symbol(symbol).ok_or_else(|| CollateralError::InvalidSymbol(symbol.to_string()))?;

        let mut set = self.write();
        set.remove(&normalized);
        Ok(set.iter().cloned().collect())
    }

    /// Replaces the whole list. Invalid symbols are dropped, not rejected.
    pub fn replace<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<String> {
        let next: BTreeSet<String> = symbols
            .iter()
            .filter_map(|s| normalize_symbol(s.as_ref()))
            .collect();

        let mut set = self.write();
        *set = next;
        set.iter().cloned().collect()
    }
}

impl Default for CollateralStore {
    fn default() -> Self {
        Self::seeded()
    }
}
