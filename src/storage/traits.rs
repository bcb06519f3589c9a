//! Counter storage trait for rategate.
//!
//! This module defines the `CounterStore` trait the engine persists through.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::ReviewState;
use crate::error::Result;

/// Trait for counter storage backends.
///
/// Each slot is independently readable and writable. Writes are never
/// partially visible, and failures are returned rather than hidden.
pub trait CounterStore: Send + Sync {
    /// Read the first-launch date.
    fn first_launch_date(&self) -> Result<Option<DateTime<Utc>>>;

    /// Write the first-launch date.
    fn set_first_launch_date(&self, date: Option<DateTime<Utc>>) -> Result<()>;

    /// Read the happiness index.
    fn happiness_index(&self) -> Result<i64>;

    /// Write the happiness index.
    fn set_happiness_index(&self, value: i64) -> Result<()>;

    /// Read the ask history, oldest first.
    fn dates_asked_for_review(&self) -> Result<Vec<DateTime<Utc>>>;

    /// Replace the ask history.
    fn set_dates_asked_for_review(&self, dates: &[DateTime<Utc>]) -> Result<()>;

    /// Read the version of the most recent ask.
    fn last_asked_version(&self) -> Result<Option<String>>;

    /// Write the version of the most recent ask.
    fn set_last_asked_version(&self, version: Option<&str>) -> Result<()>;

    /// Reset every slot: no first launch, zero happiness, no asks, no version.
    fn clear(&self) -> Result<()>;

    /// Read all four slots.
    fn snapshot(&self) -> Result<ReviewState> {
        Ok(ReviewState {
            first_launch_date: self.first_launch_date()?,
            happiness_index: self.happiness_index()?,
            dates_asked_for_review: self.dates_asked_for_review()?,
            last_asked_version: self.last_asked_version()?,
        })
    }
}

/// Blanket implementation of CounterStore for Arc-wrapped stores.
///
/// This allows a test to keep a handle on the store it gave the engine.
impl<T: CounterStore + ?Sized> CounterStore for Arc<T> {
    fn first_launch_date(&self) -> Result<Option<DateTime<Utc>>> {
        (**self).first_launch_date()
    }

    fn set_first_launch_date(&self, date: Option<DateTime<Utc>>) -> Result<()> {
        (**self).set_first_launch_date(date)
    }

    fn happiness_index(&self) -> Result<i64> {
        (**self).happiness_index()
    }

    fn set_happiness_index(&self, value: i64) -> Result<()> {
        (**self).set_happiness_index(value)
    }

    fn dates_asked_for_review(&self) -> Result<Vec<DateTime<Utc>>> {
        (**self).dates_asked_for_review()
    }

    fn set_dates_asked_for_review(&self, dates: &[DateTime<Utc>]) -> Result<()> {
        (**self).set_dates_asked_for_review(dates)
    }

    fn last_asked_version(&self) -> Result<Option<String>> {
        (**self).last_asked_version()
    }

    fn set_last_asked_version(&self, version: Option<&str>) -> Result<()> {
        (**self).set_last_asked_version(version)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn snapshot(&self) -> Result<ReviewState> {
        (**self).snapshot()
    }
}
