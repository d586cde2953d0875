//! Clock port
//!
//! Supplies "today" to the circulation rules so that due dates and fees can
//! be computed against a pinned date in tests.

use chrono::NaiveDate;

pub trait Clock: Send + Sync {
    /// The current calendar date
    fn today(&self) -> NaiveDate;
}
