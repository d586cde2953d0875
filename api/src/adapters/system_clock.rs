//! Wall-clock adapter for the Clock port

use chrono::{NaiveDate, Utc};

use crate::domain::ports::Clock;

/// Today's date in UTC
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
