//! PostgreSQL adapter for BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::domain::entities::{Book, BookId, NewBook};
use crate::domain::ports::BookRepository;
use crate::entity::books;
use crate::error::DomainError;

/// PostgreSQL implementation of BookRepository
pub struct PostgresBookRepository {
    db: DatabaseConnection,
}

impl PostgresBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        let result = books::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_ids(&self, ids: &[BookId]) -> Result<Vec<Book>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = books::Entity::find()
            .filter(books::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        let result = books::Entity::find()
            .filter(books::Column::Isbn.eq(isbn))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_all(&self) -> Result<Vec<Book>, DomainError> {
        let results = books::Entity::find()
            .order_by_asc(books::Column::Title)
            .order_by_asc(books::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, book: &NewBook) -> Result<Book, DomainError> {
        let model = books::ActiveModel {
            id: NotSet,
            title: Set(book.title.clone()),
            author: Set(book.author.clone()),
            isbn: Set(book.isbn.clone()),
            total_copies: Set(book.total_copies),
            available_copies: Set(book.total_copies),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error(e, &book.isbn))?;

        Ok(result.into())
    }
}

fn insert_error(err: DbErr, isbn: &str) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::AlreadyExists(format!("Book with ISBN {} already exists", isbn))
        }
        _ => DomainError::Database(err.to_string()),
    }
}

/// Convert SeaORM model to domain entity
impl From<books::Model> for Book {
    fn from(model: books::Model) -> Self {
        Book {
            id: BookId(model.id),
            title: model.title,
            author: model.author,
            isbn: model.isbn,
            total_copies: model.total_copies,
            available_copies: model.available_copies,
        }
    }
}
