//! Circulation service
//!
//! The loan lifecycle: borrowing, returning, late-fee lookups and the
//! patron status report. Every rule is checked in a fixed order and the
//! first violation is reported to the caller as-is.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::fee_calculator::compute_fee;
use super::policy::{LOAN_PERIOD_DAYS, MAX_OUTSTANDING_LOANS};
use crate::domain::entities::{Book, BookId, LateFee, Loan, LoanStatus, NewLoan, PatronId};
use crate::domain::ports::{BookRepository, Clock, LoanRepository};
use crate::error::{AppError, CirculationError, DomainError};

/// Result of a successful borrow
#[derive(Debug, Clone, Serialize)]
pub struct BorrowReceipt {
    pub loan: Loan,
    /// The book after the copy left the shelf
    pub book: Book,
}

impl BorrowReceipt {
    pub fn message(&self) -> String {
        format!(
            "Successfully borrowed \"{}\". Due date: {}.",
            self.book.title,
            self.loan.due_on.format("%Y-%m-%d")
        )
    }
}

/// Result of a successful return
#[derive(Debug, Clone, Serialize)]
pub struct ReturnReceipt {
    pub loan: Loan,
    /// The book after the copy came back
    pub book: Book,
    pub fee: LateFee,
}

impl ReturnReceipt {
    pub fn message(&self) -> String {
        if self.fee.is_due() {
            format!(
                "Book \"{}\" returned successfully. Late fee: ${:.2} for {} day(s) overdue.",
                self.book.title, self.fee.amount, self.fee.days_overdue
            )
        } else {
            format!(
                "Book \"{}\" returned successfully. No late fee.",
                self.book.title
            )
        }
    }
}

/// Current fee of an outstanding loan
#[derive(Debug, Clone, Serialize)]
pub struct FeeQuote {
    pub book: Book,
    pub loan: Loan,
    pub fee: LateFee,
}

/// A book the patron currently holds
#[derive(Debug, Clone, Serialize)]
pub struct CurrentLoan {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub days_overdue: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub late_fee: Decimal,
}

/// One line of a patron's borrowing history
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    /// Fee recorded at return; absent while the book is still out
    #[serde(with = "rust_decimal::serde::float_option")]
    pub fee_charged: Option<Decimal>,
}

/// Everything a patron wants to know about their account
#[derive(Debug, Clone, Serialize)]
pub struct PatronStatus {
    pub patron_id: PatronId,
    pub currently_borrowed_count: usize,
    pub currently_borrowed: Vec<CurrentLoan>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_late_fees_owed: Decimal,
    pub borrowing_history: Vec<HistoryEntry>,
}

/// Service for the loan lifecycle
pub struct CirculationService<BR, LR>
where
    BR: BookRepository + ?Sized,
    LR: LoanRepository + ?Sized,
{
    books: Arc<BR>,
    loans: Arc<LR>,
    clock: Arc<dyn Clock>,
}

impl<BR, LR> CirculationService<BR, LR>
where
    BR: BookRepository + ?Sized,
    LR: LoanRepository + ?Sized,
{
    pub fn new(books: Arc<BR>, loans: Arc<LR>, clock: Arc<dyn Clock>) -> Self {
        Self {
            books,
            loans,
            clock,
        }
    }

    /// Borrow a book
    ///
    /// Checks, in order: patron ID format, book exists, a copy is on the
    /// shelf, the patron is under the loan limit. The last two are enforced
    /// again by the store in the same unit of work as the new loan.
    pub async fn borrow(
        &self,
        patron_id: &str,
        book_id: BookId,
    ) -> Result<BorrowReceipt, AppError> {
        let patron_id = PatronId::parse(patron_id)?;
        let book = self.require_book(&book_id).await?;

        if !book.is_available() {
            tracing::warn!(
                patron_id = %patron_id,
                book_id = %book_id,
                "Borrow rejected: no copies available"
            );
            return Err(CirculationError::BookUnavailable.into());
        }

        let today = self.clock.today();
        let new_loan = NewLoan {
            patron_id: patron_id.clone(),
            book_id,
            borrowed_on: today,
            due_on: today + Duration::days(LOAN_PERIOD_DAYS),
        };

        let loan = self
            .loans
            .open(&new_loan, MAX_OUTSTANDING_LOANS)
            .await
            .map_err(|e| match e {
                // Another borrower took the last copy after our availability check
                DomainError::Conflict(_) => {
                    AppError::Circulation(CirculationError::BookUnavailable)
                }
                DomainError::NotFound(_) => AppError::Circulation(CirculationError::BookNotFound),
                DomainError::LimitReached(reason) => {
                    tracing::warn!(
                        patron_id = %patron_id,
                        %reason,
                        "Borrow rejected: patron at loan limit"
                    );
                    AppError::Circulation(CirculationError::PatronLimitExceeded {
                        limit: MAX_OUTSTANDING_LOANS,
                    })
                }
                e => AppError::Domain(e),
            })?;

        let book = self.require_book(&book_id).await?;

        tracing::info!(
            patron_id = %patron_id,
            book_id = %book_id,
            loan_id = %loan.id,
            due_on = %loan.due_on,
            "Book borrowed"
        );

        Ok(BorrowReceipt { loan, book })
    }

    /// Return a borrowed book and settle its late fee
    ///
    /// Checks, in order: patron ID format, book exists, the patron holds an
    /// outstanding loan of this book.
    pub async fn return_book(
        &self,
        patron_id: &str,
        book_id: BookId,
    ) -> Result<ReturnReceipt, AppError> {
        let (patron_id, _, loan) = self.require_outstanding(patron_id, book_id).await?;

        let today = self.clock.today();
        let fee = compute_fee(loan.due_on, today);

        let loan = self
            .loans
            .close(&loan.id, today, &fee)
            .await
            .map_err(|e| match e {
                // Returned concurrently; nothing left for this patron to return
                DomainError::Conflict(_) => {
                    AppError::Circulation(CirculationError::NotBorrowedByPatron)
                }
                e => AppError::Domain(e),
            })?;

        let book = self.require_book(&book_id).await?;

        tracing::info!(
            patron_id = %patron_id,
            book_id = %book_id,
            loan_id = %loan.id,
            days_overdue = fee.days_overdue,
            fee = %fee.amount,
            "Book returned"
        );

        Ok(ReturnReceipt { loan, book, fee })
    }

    /// Current late fee of an outstanding loan, without changing anything
    pub async fn late_fee(&self, patron_id: &str, book_id: BookId) -> Result<FeeQuote, AppError> {
        let (_, book, loan) = self.require_outstanding(patron_id, book_id).await?;
        let fee = compute_fee(loan.due_on, self.clock.today());

        Ok(FeeQuote { book, loan, fee })
    }

    /// Status report: current loans with today's fees, and full history
    pub async fn patron_status(&self, patron_id: &str) -> Result<PatronStatus, AppError> {
        let patron_id = PatronId::parse(patron_id)?;
        let today = self.clock.today();

        let history = self.loans.find_by_patron(&patron_id).await?;

        let ids: Vec<BookId> = history
            .iter()
            .map(|loan| loan.book_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let books: HashMap<BookId, Book> = self
            .books
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|book| (book.id, book))
            .collect();

        let describe = |id: &BookId| -> (String, String) {
            books
                .get(id)
                .map(|b| (b.title.clone(), b.author.clone()))
                .unwrap_or_else(|| ("(unknown)".to_string(), "(unknown)".to_string()))
        };

        let outstanding = self.loans.find_outstanding_by_patron(&patron_id).await?;

        let currently_borrowed: Vec<CurrentLoan> = outstanding
            .iter()
            .map(|loan| {
                let fee = compute_fee(loan.due_on, today);
                let (title, author) = describe(&loan.book_id);
                CurrentLoan {
                    book_id: loan.book_id,
                    title,
                    author,
                    borrow_date: loan.borrowed_on,
                    due_date: loan.due_on,
                    days_overdue: fee.days_overdue,
                    late_fee: fee.amount,
                }
            })
            .collect();

        let total_late_fees_owed: Decimal = currently_borrowed.iter().map(|c| c.late_fee).sum();

        let borrowing_history = history
            .iter()
            .map(|loan| {
                let (title, author) = describe(&loan.book_id);
                let (return_date, fee_charged) = match loan.status {
                    LoanStatus::Outstanding => (None, None),
                    LoanStatus::Returned { returned_on, fee } => {
                        (Some(returned_on), Some(fee.amount))
                    }
                };
                HistoryEntry {
                    book_id: loan.book_id,
                    title,
                    author,
                    borrow_date: loan.borrowed_on,
                    due_date: loan.due_on,
                    return_date,
                    fee_charged,
                }
            })
            .collect();

        Ok(PatronStatus {
            patron_id,
            currently_borrowed_count: currently_borrowed.len(),
            currently_borrowed,
            total_late_fees_owed,
            borrowing_history,
        })
    }

    async fn require_book(&self, book_id: &BookId) -> Result<Book, AppError> {
        self.books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| CirculationError::BookNotFound.into())
    }

    async fn require_outstanding(
        &self,
        patron_id: &str,
        book_id: BookId,
    ) -> Result<(PatronId, Book, Loan), AppError> {
        let patron_id = PatronId::parse(patron_id)?;
        let book = self.require_book(&book_id).await?;

        let loan = self
            .loans
            .find_outstanding(&patron_id, &book_id)
            .await?
            .ok_or(CirculationError::NotBorrowedByPatron)?;

        Ok((patron_id, book, loan))
    }
}
