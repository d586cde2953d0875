//! Circulation policy constants
//!
//! Loan period, borrowing limit and the late-fee schedule.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Days between borrowing and the due date
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Maximum concurrent outstanding loans per patron
pub const MAX_OUTSTANDING_LOANS: usize = 5;

/// Overdue days billed at the first-tier rate
pub const FIRST_TIER_DAYS: i64 = 7;

/// Daily fee for the first `FIRST_TIER_DAYS` overdue days
pub const FIRST_TIER_DAILY_FEE: Decimal = dec!(0.50);

/// Daily fee for every overdue day after the first tier
pub const LATER_DAILY_FEE: Decimal = dec!(1.00);

/// Maximum late fee per loan
pub const MAX_LATE_FEE: Decimal = dec!(15.00);

/// Catalog field limits
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_AUTHOR_LEN: usize = 100;
pub const ISBN_LEN: usize = 13;
