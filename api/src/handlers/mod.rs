//! HTTP handlers
//!
//! Axum request handlers for the catalog, circulation and payment endpoints.

pub mod catalog;
pub mod circulation;
pub mod common;
pub mod patrons;
pub mod payments;
pub mod search;

pub use catalog::{add_book, get_book, get_catalog};
pub use circulation::{borrow_book, return_book};
pub use patrons::{get_late_fee, get_patron_status, pay_late_fees};
pub use payments::refund_payment;
pub use search::{api_search, search_page};
