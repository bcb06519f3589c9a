//! In-memory counter storage.
//!
//! Thread-safe implementation of `CounterStore` for tests and for hosts that
//! persist the counters themselves (e.g. by snapshotting into their own
//! preferences system).

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::core::ReviewState;
use crate::error::{RateGateError, Result};
use crate::storage::CounterStore;

/// In-memory counter store.
///
/// State is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    state: RwLock<ReviewState>,
}

impl MemoryCounterStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `state`.
    pub fn with_state(state: ReviewState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ReviewState>> {
        self.state
            .read()
            .map_err(|_| RateGateError::invalid_state("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ReviewState>> {
        self.state
            .write()
            .map_err(|_| RateGateError::invalid_state("memory store lock poisoned"))
    }
}

impl CounterStore for MemoryCounterStore {
    fn first_launch_date(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read()?.first_launch_date)
    }

    fn set_first_launch_date(&self, date: Option<DateTime<Utc>>) -> Result<()> {
        self.write()?.first_launch_date = date;
        Ok(())
    }

    fn happiness_index(&self) -> Result<i64> {
        Ok(self.read()?.happiness_index)
    }

    fn set_happiness_index(&self, value: i64) -> Result<()> {
        self.write()?.happiness_index = value;
        Ok(())
    }

    fn dates_asked_for_review(&self) -> Result<Vec<DateTime<Utc>>> {
        Ok(self.read()?.dates_asked_for_review.clone())
    }

    fn set_dates_asked_for_review(&self, dates: &[DateTime<Utc>]) -> Result<()> {
        self.write()?.dates_asked_for_review = dates.to_vec();
        Ok(())
    }

    fn last_asked_version(&self) -> Result<Option<String>> {
        Ok(self.read()?.last_asked_version.clone())
    }

    fn set_last_asked_version(&self, version: Option<&str>) -> Result<()> {
        self.write()?.last_asked_version = version.map(str::to_string);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.write()? = ReviewState::default();
        Ok(())
    }

    fn snapshot(&self) -> Result<ReviewState> {
        Ok(self.read()?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_counter_store_contract;
    use chrono::TimeZone;

    #[test]
    fn test_memory_store_contract() {
        let store = MemoryCounterStore::new();
        test_counter_store_contract(&store);
    }

    #[test]
    fn test_with_state() {
        let state = ReviewState {
            happiness_index: 3,
            last_asked_version: Some("1.0".to_string()),
            ..Default::default()
        };
        let store = MemoryCounterStore::with_state(state.clone());
        assert_eq!(store.snapshot().unwrap(), state);
    }

    #[test]
    fn test_arc_store_shares_state() {
        use std::sync::Arc;

        let store = Arc::new(MemoryCounterStore::new());
        let handle = Arc::clone(&store);

        handle.set_happiness_index(4).unwrap();
        assert_eq!(store.happiness_index().unwrap(), 4);
    }

    #[test]
    fn test_history_preserves_order() {
        let store = MemoryCounterStore::new();
        let dates = vec![
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
        ];
        store.set_dates_asked_for_review(&dates).unwrap();
        assert_eq!(store.dates_asked_for_review().unwrap(), dates);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryCounterStore::new());
        let mut handles = vec![];

        for i in 0..10 {
            let store_clone = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store_clone.set_happiness_index(i).unwrap();
                store_clone.happiness_index().unwrap();
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let value = store.happiness_index().unwrap();
        assert!((0..10).contains(&value));
    }
}
