//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod book_repo;
pub mod loan_repo;
pub mod schema;

#[cfg(test)]
mod integration_tests;

pub use book_repo::PostgresBookRepository;
pub use loan_repo::PostgresLoanRepository;
pub use schema::ensure_schema;
