//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{Duration, NaiveDate};

use crate::app::policy::LOAN_PERIOD_DAYS;
use crate::domain::entities::{Book, BookId, Loan, LoanId, LoanStatus, PatronId};

/// Create a test book with every copy on the shelf
pub fn test_book(id: i32, title: &str, author: &str, isbn: &str, copies: i32) -> Book {
    Book {
        id: BookId(id),
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
        total_copies: copies,
        available_copies: copies,
    }
}

/// Create an outstanding loan with the standard loan period
pub fn test_loan(id: i32, patron_id: &str, book_id: i32, borrowed_on: NaiveDate) -> Loan {
    Loan {
        id: LoanId(id),
        patron_id: PatronId::parse(patron_id).expect("fixture patron id must be valid"),
        book_id: BookId(book_id),
        borrowed_on,
        due_on: borrowed_on + Duration::days(LOAN_PERIOD_DAYS),
        status: LoanStatus::Outstanding,
    }
}
