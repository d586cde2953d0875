//! Domain entities
//!
//! Pure domain models for the catalog and circulation.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod book;
pub mod loan;
pub mod patron;

pub use book::{Book, BookId, NewBook, SearchField};
pub use loan::{LateFee, Loan, LoanId, LoanStatus, NewLoan};
pub use patron::PatronId;
