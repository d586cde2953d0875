//! Late-fee calculator
//!
//! fee = min(cap, first_tier_rate * min(d, 7) + later_rate * max(0, d - 7))
//! where d is the number of whole days between the due date and the
//! reference date, floored at zero.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::policy::{FIRST_TIER_DAILY_FEE, FIRST_TIER_DAYS, LATER_DAILY_FEE, MAX_LATE_FEE};
use crate::domain::entities::LateFee;

/// Whole days `as_of` lies past `due_on`, never negative
pub fn days_overdue(due_on: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - due_on).num_days().max(0)
}

/// Compute the late fee of a loan due on `due_on`, as of `as_of`
pub fn compute_fee(due_on: NaiveDate, as_of: NaiveDate) -> LateFee {
    let days = days_overdue(due_on, as_of);
    LateFee {
        amount: fee_for_days(days),
        days_overdue: days,
    }
}

/// Fee for a given number of overdue days
pub fn fee_for_days(days: i64) -> Decimal {
    if days <= 0 {
        return Decimal::ZERO;
    }

    let first_tier = Decimal::from(days.min(FIRST_TIER_DAYS)) * FIRST_TIER_DAILY_FEE;
    let later = Decimal::from((days - FIRST_TIER_DAYS).max(0)) * LATER_DAILY_FEE;

    (first_tier + later).min(MAX_LATE_FEE).round_dp(2)
}
