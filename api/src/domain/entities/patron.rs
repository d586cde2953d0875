//! Patron identity
//!
//! Patrons are not stored on their own; they exist through their loans.

use serde::{Serialize, Serializer};

use crate::error::CirculationError;

const PATRON_ID_LEN: usize = 6;

/// A library card number: exactly six ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatronId(String);

impl PatronId {
    /// Validate a raw card number
    pub fn parse(raw: &str) -> Result<Self, CirculationError> {
        if raw.len() == PATRON_ID_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(CirculationError::InvalidPatronId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The card number as an integer, for per-patron database locks
    pub fn lock_key(&self) -> i32 {
        self.0
            .bytes()
            .fold(0, |acc, digit| acc * 10 + i32::from(digit - b'0'))
    }
}

impl std::fmt::Display for PatronId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for PatronId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
