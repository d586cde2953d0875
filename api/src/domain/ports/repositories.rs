//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{Book, BookId, LateFee, Loan, LoanId, NewBook, NewLoan, PatronId};
use crate::error::DomainError;

/// Repository for Book entities
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find a book by ID
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, DomainError>;

    /// Find several books at once (missing IDs are skipped)
    async fn find_by_ids(&self, ids: &[BookId]) -> Result<Vec<Book>, DomainError>;

    /// Find a book by its ISBN
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError>;

    /// List the whole catalog ordered by title
    async fn list_all(&self) -> Result<Vec<Book>, DomainError>;

    /// Add a book with all copies available.
    /// Fails with `AlreadyExists` if the ISBN is taken.
    async fn create(&self, book: &NewBook) -> Result<Book, DomainError>;
}

/// Repository for Loan entities
///
/// `open` and `close` also adjust the book's available copies; each is a
/// single atomic unit of work in the store.
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Find the outstanding loan of a book by a patron
    async fn find_outstanding(
        &self,
        patron_id: &PatronId,
        book_id: &BookId,
    ) -> Result<Option<Loan>, DomainError>;

    /// Outstanding loans of a patron, oldest due date first
    async fn find_outstanding_by_patron(
        &self,
        patron_id: &PatronId,
    ) -> Result<Vec<Loan>, DomainError>;

    /// Every loan of a patron, newest borrow first
    async fn find_by_patron(&self, patron_id: &PatronId) -> Result<Vec<Loan>, DomainError>;

    /// Create a loan and take one copy off the shelf.
    /// Fails with `Conflict` if no copy is available, `NotFound` if the book is
    /// missing and `LimitReached` if the patron already holds `max_outstanding`
    /// loans. The limit is checked in the same unit of work as the insert.
    async fn open(&self, loan: &NewLoan, max_outstanding: usize) -> Result<Loan, DomainError>;

    /// Record a return and put the copy back on the shelf.
    /// Fails with `Conflict` if the loan was already returned.
    async fn close(
        &self,
        id: &LoanId,
        returned_on: NaiveDate,
        fee: &LateFee,
    ) -> Result<Loan, DomainError>;
}
