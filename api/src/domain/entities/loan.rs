//! Loan domain entity
//!
//! A loan records one book borrowed by one patron. Its return is a tagged
//! state: once `Returned`, the return date and fee never change.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::book::BookId;
use super::patron::PatronId;
use crate::error::DomainError;

/// Unique identifier for a loan (store-assigned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LoanId(pub i32);

impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Overdue fee for a loan as of some date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LateFee {
    #[serde(rename = "fee_amount", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub days_overdue: i64,
}

impl LateFee {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_due(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Whether a loan is still out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoanStatus {
    Outstanding,
    Returned {
        returned_on: NaiveDate,
        fee: LateFee,
    },
}

/// A book borrowed by a patron
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    pub id: LoanId,
    pub patron_id: PatronId,
    pub book_id: BookId,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    pub status: LoanStatus,
}

impl Loan {
    pub fn is_outstanding(&self) -> bool {
        matches!(self.status, LoanStatus::Outstanding)
    }

    /// Record the return. A loan can only be closed once.
    pub fn close(&mut self, returned_on: NaiveDate, fee: LateFee) -> Result<(), DomainError> {
        match self.status {
            LoanStatus::Outstanding => {
                self.status = LoanStatus::Returned { returned_on, fee };
                Ok(())
            }
            LoanStatus::Returned { .. } => Err(DomainError::Conflict(format!(
                "Loan {} has already been returned",
                self.id
            ))),
        }
    }
}

/// Data needed to open a new loan
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub patron_id: PatronId,
    pub book_id: BookId,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
}
