//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod payments;
pub mod postgres;
pub mod system_clock;

pub use payments::HttpPaymentGateway;
pub use postgres::{ensure_schema, PostgresBookRepository, PostgresLoanRepository};
pub use system_clock::SystemClock;
