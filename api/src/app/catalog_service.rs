//! Catalog service
//!
//! Handles adding books, listing the catalog and searching it.

use std::sync::Arc;

use super::policy::{ISBN_LEN, MAX_AUTHOR_LEN, MAX_TITLE_LEN};
use crate::domain::entities::{Book, BookId, NewBook, SearchField};
use crate::domain::ports::BookRepository;
use crate::error::{AppError, CirculationError, DomainError};

/// Service for managing the catalog
pub struct CatalogService<BR>
where
    BR: BookRepository + ?Sized,
{
    books: Arc<BR>,
}

impl<BR> CatalogService<BR>
where
    BR: BookRepository + ?Sized,
{
    pub fn new(books: Arc<BR>) -> Self {
        Self { books }
    }

    /// Add a new book with every copy available
    ///
    /// Fields are checked in form order and the first problem is reported.
    pub async fn add_book(
        &self,
        title: &str,
        author: &str,
        isbn: &str,
        total_copies: i64,
    ) -> Result<Book, AppError> {
        let new_book = validate_new_book(title, author, isbn, total_copies)?;

        if self.books.find_by_isbn(&new_book.isbn).await?.is_some() {
            return Err(CirculationError::DuplicateIsbn.into());
        }

        let book = self.books.create(&new_book).await.map_err(|e| match e {
            // Lost a race with another insert of the same ISBN
            DomainError::AlreadyExists(_) => AppError::Circulation(CirculationError::DuplicateIsbn),
            e => AppError::Domain(e),
        })?;

        tracing::info!(book_id = %book.id, isbn = %book.isbn, "Book added to catalog");

        Ok(book)
    }

    /// The whole catalog, ordered by title
    pub async fn list_books(&self) -> Result<Vec<Book>, AppError> {
        Ok(self.books.list_all().await?)
    }

    /// Find a single book
    pub async fn get_book(&self, id: &BookId) -> Result<Book, AppError> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or_else(|| CirculationError::BookNotFound.into())
    }

    /// Search the catalog
    ///
    /// A blank query returns everything. Title and author match partially
    /// and ignore case; ISBN must match exactly.
    pub async fn search(
        &self,
        query: Option<&str>,
        field: SearchField,
    ) -> Result<Vec<Book>, AppError> {
        let books = self.books.list_all().await?;

        let query = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => return Ok(books),
        };

        Ok(books
            .into_iter()
            .filter(|book| field.matches(book, query))
            .collect())
    }
}

/// Validate catalog input and normalise it for storage
fn validate_new_book(
    title: &str,
    author: &str,
    isbn: &str,
    total_copies: i64,
) -> Result<NewBook, CirculationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CirculationError::validation("title", "Title is required."));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CirculationError::validation(
            "title",
            format!("Title must be less than {} characters.", MAX_TITLE_LEN),
        ));
    }

    let author = author.trim();
    if author.is_empty() {
        return Err(CirculationError::validation("author", "Author is required."));
    }
    if author.chars().count() > MAX_AUTHOR_LEN {
        return Err(CirculationError::validation(
            "author",
            format!("Author must be less than {} characters.", MAX_AUTHOR_LEN),
        ));
    }

    if isbn.len() != ISBN_LEN || !isbn.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CirculationError::validation(
            "isbn",
            format!("ISBN must be exactly {} digits.", ISBN_LEN),
        ));
    }

    let total_copies = i32::try_from(total_copies)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            CirculationError::validation("total_copies", "Total copies must be a positive integer.")
        })?;

    Ok(NewBook {
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
        total_copies,
    })
}
