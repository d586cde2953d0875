//! Book domain entity
//!
//! Represents a catalog title and how many of its copies are on the shelf.

use serde::{Deserialize, Serialize};

/// Unique identifier for a book (store-assigned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub i32);

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A book in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl Book {
    /// Check if at least one copy can be borrowed
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Human-readable availability, e.g. "3/7 Available"
    pub fn availability_label(&self) -> String {
        if self.is_available() {
            format!("{}/{} Available", self.available_copies, self.total_copies)
        } else {
            "Not Available".to_string()
        }
    }
}

/// Data needed to add a book to the catalog (already validated)
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i32,
}

/// Which field a catalog search matches against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Title,
    Author,
    Isbn,
}

impl SearchField {
    /// Parse a search type, falling back to title for anything unrecognised
    pub fn parse_or_default(s: Option<&str>) -> Self {
        s.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    /// Check whether a book matches an already-trimmed, non-empty query
    pub fn matches(&self, book: &Book, query: &str) -> bool {
        match self {
            SearchField::Isbn => book.isbn == query,
            SearchField::Title => contains_ignore_case(&book.title, query),
            SearchField::Author => contains_ignore_case(&book.author, query),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchField::Title => write!(f, "title"),
            SearchField::Author => write!(f, "author"),
            SearchField::Isbn => write!(f, "isbn"),
        }
    }
}

impl std::str::FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "isbn" => Ok(SearchField::Isbn),
            _ => Err(format!("Unknown search type: {}", s)),
        }
    }
}
