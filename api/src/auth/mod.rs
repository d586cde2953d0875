//! Authentication

pub mod api_key;

pub use api_key::{hash_api_key, librarian_auth};
