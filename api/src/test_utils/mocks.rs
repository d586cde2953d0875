//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Book, BookId, LateFee, Loan, LoanId, LoanStatus, NewBook, NewLoan, PatronId,
};
use crate::domain::ports::{BookRepository, Clock, LoanRepository};
use crate::error::DomainError;

// ============================================================================
// In-Memory Library (books + loans in one store)
// ============================================================================

#[derive(Default)]
struct LibraryState {
    books: BTreeMap<BookId, Book>,
    loans: BTreeMap<LoanId, Loan>,
}

/// Both tables behind a single lock, so `open`/`close` are atomic like a
/// database transaction.
#[derive(Default)]
pub struct InMemoryLibrary {
    state: Arc<RwLock<LibraryState>>,
    fail: bool,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with a database error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Pre-populate with a book for testing
    pub fn with_book(self, book: Book) -> Self {
        self.state.write().unwrap().books.insert(book.id, book);
        self
    }

    /// Pre-populate with a loan for testing (book copies are not adjusted)
    pub fn with_loan(self, loan: Loan) -> Self {
        self.state.write().unwrap().loans.insert(loan.id, loan);
        self
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail {
            Err(DomainError::Database("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BookRepository for InMemoryLibrary {
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        self.check()?;
        Ok(self.state.read().unwrap().books.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[BookId]) -> Result<Vec<Book>, DomainError> {
        self.check()?;
        let state = self.state.read().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| state.books.get(id).cloned())
            .collect())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        self.check()?;
        let state = self.state.read().unwrap();
        Ok(state.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Book>, DomainError> {
        self.check()?;
        let state = self.state.read().unwrap();
        let mut books: Vec<Book> = state.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn create(&self, new_book: &NewBook) -> Result<Book, DomainError> {
        self.check()?;
        let mut state = self.state.write().unwrap();

        if state.books.values().any(|b| b.isbn == new_book.isbn) {
            return Err(DomainError::AlreadyExists(format!(
                "Book with ISBN {} already exists",
                new_book.isbn
            )));
        }

        let id = state
            .books
            .keys()
            .next_back()
            .map(|id| BookId(id.0 + 1))
            .unwrap_or(BookId(1));
        let book = Book {
            id,
            title: new_book.title.clone(),
            author: new_book.author.clone(),
            isbn: new_book.isbn.clone(),
            total_copies: new_book.total_copies,
            available_copies: new_book.total_copies,
        };
        state.books.insert(id, book.clone());

        Ok(book)
    }
}

#[async_trait]
impl LoanRepository for InMemoryLibrary {
    async fn find_outstanding(
        &self,
        patron_id: &PatronId,
        book_id: &BookId,
    ) -> Result<Option<Loan>, DomainError> {
        self.check()?;
        let state = self.state.read().unwrap();
        Ok(state
            .loans
            .values()
            .find(|l| &l.patron_id == patron_id && &l.book_id == book_id && l.is_outstanding())
            .cloned())
    }

    async fn find_outstanding_by_patron(
        &self,
        patron_id: &PatronId,
    ) -> Result<Vec<Loan>, DomainError> {
        self.check()?;
        let state = self.state.read().unwrap();
        let mut loans: Vec<Loan> = state
            .loans
            .values()
            .filter(|l| &l.patron_id == patron_id && l.is_outstanding())
            .cloned()
            .collect();
        loans.sort_by_key(|l| (l.due_on, l.id));
        Ok(loans)
    }

    async fn find_by_patron(&self, patron_id: &PatronId) -> Result<Vec<Loan>, DomainError> {
        self.check()?;
        let state = self.state.read().unwrap();
        let mut loans: Vec<Loan> = state
            .loans
            .values()
            .filter(|l| &l.patron_id == patron_id)
            .cloned()
            .collect();
        loans.sort_by(|a, b| b.borrowed_on.cmp(&a.borrowed_on).then(b.id.cmp(&a.id)));
        Ok(loans)
    }

    async fn open(
        &self,
        new_loan: &NewLoan,
        max_outstanding: usize,
    ) -> Result<Loan, DomainError> {
        self.check()?;
        let mut state = self.state.write().unwrap();

        let book = state.books.get(&new_loan.book_id).ok_or_else(|| {
            DomainError::NotFound(format!("Book {} not found", new_loan.book_id))
        })?;
        if book.available_copies <= 0 {
            return Err(DomainError::Conflict(format!(
                "Book {} has no available copies",
                new_loan.book_id
            )));
        }

        let outstanding = state
            .loans
            .values()
            .filter(|l| l.patron_id == new_loan.patron_id && l.is_outstanding())
            .count();
        if outstanding >= max_outstanding {
            return Err(DomainError::LimitReached(format!(
                "Patron {} already holds {} outstanding loans",
                new_loan.patron_id, outstanding
            )));
        }

        if let Some(book) = state.books.get_mut(&new_loan.book_id) {
            book.available_copies -= 1;
        }

        let id = state
            .loans
            .keys()
            .next_back()
            .map(|id| LoanId(id.0 + 1))
            .unwrap_or(LoanId(1));
        let loan = Loan {
            id,
            patron_id: new_loan.patron_id.clone(),
            book_id: new_loan.book_id,
            borrowed_on: new_loan.borrowed_on,
            due_on: new_loan.due_on,
            status: LoanStatus::Outstanding,
        };
        state.loans.insert(id, loan.clone());

        Ok(loan)
    }

    async fn close(
        &self,
        id: &LoanId,
        returned_on: NaiveDate,
        fee: &LateFee,
    ) -> Result<Loan, DomainError> {
        self.check()?;
        let mut state = self.state.write().unwrap();

        let loan = state
            .loans
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Loan {} not found", id)))?;
        loan.close(returned_on, *fee)?;
        let loan = loan.clone();

        if let Some(book) = state.books.get_mut(&loan.book_id) {
            if book.available_copies < book.total_copies {
                book.available_copies += 1;
            }
        }

        Ok(loan)
    }
}

// ============================================================================
// Fixed Clock
// ============================================================================

/// A clock stuck on one date
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
