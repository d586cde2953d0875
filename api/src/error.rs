//! Unified error types for the library catalog API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Repository and entity-level failures
//! - `CirculationError`: Caller-facing catalog and loan rule violations
//! - `BillingError`: Late-fee payment rule violations
//! - `PaymentError`: Payment gateway client errors
//! - `AppError`: Application layer errors (wraps the above for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - persistence and entity invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Limit reached: {0}")]
    LimitReached(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Catalog and loan lifecycle errors, reported directly to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CirculationError {
    #[error("Invalid patron ID. Must be exactly 6 digits.")]
    InvalidPatronId,

    #[error("Book not found.")]
    BookNotFound,

    #[error("This book is currently not available.")]
    BookUnavailable,

    #[error("You have reached the maximum borrowing limit of {limit} books.")]
    PatronLimitExceeded { limit: usize },

    #[error("No active borrow record for this patron and book.")]
    NotBorrowedByPatron,

    #[error("A book with this ISBN already exists.")]
    DuplicateIsbn,

    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl CirculationError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CirculationError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Late-fee payment and refund rule violations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BillingError {
    #[error("No late fees to pay for this book.")]
    NoLateFees,

    #[error("Payment failed: {0}")]
    PaymentDeclined(String),

    #[error("Invalid transaction ID.")]
    InvalidTransactionId,

    #[error("Refund amount must be greater than 0.")]
    RefundAmountNotPositive,

    #[error("Refund amount exceeds maximum late fee.")]
    RefundExceedsMaximum,

    #[error("Refund failed: {0}")]
    RefundDeclined(String),
}

/// Payment gateway client errors
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - gateway rejected credentials")]
    Unauthorized,

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Circulation(#[from] CirculationError),

    #[error("{0}")]
    Billing(#[from] BillingError),

    #[error("Payment processing error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Domain(DomainError::AlreadyExists(_))
            | AppError::Domain(DomainError::Conflict(_))
            | AppError::Domain(DomainError::LimitReached(_)) => StatusCode::CONFLICT,
            AppError::Domain(DomainError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Circulation(e) => match e {
                CirculationError::InvalidPatronId | CirculationError::Validation { .. } => {
                    StatusCode::BAD_REQUEST
                }
                CirculationError::BookNotFound => StatusCode::NOT_FOUND,
                CirculationError::BookUnavailable
                | CirculationError::PatronLimitExceeded { .. }
                | CirculationError::NotBorrowedByPatron
                | CirculationError::DuplicateIsbn => StatusCode::CONFLICT,
            },
            AppError::Billing(e) => match e {
                BillingError::NoLateFees => StatusCode::CONFLICT,
                BillingError::PaymentDeclined(_) | BillingError::RefundDeclined(_) => {
                    StatusCode::PAYMENT_REQUIRED
                }
                BillingError::InvalidTransactionId
                | BillingError::RefundAmountNotPositive
                | BillingError::RefundExceedsMaximum => StatusCode::BAD_REQUEST,
            },
            AppError::Payment(_) => StatusCode::BAD_GATEWAY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error, details, field) = match &self {
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                ("Internal server error", None, None)
            }
            AppError::Domain(DomainError::NotFound(msg)) => ("Not found", Some(msg.clone()), None),
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                ("Already exists", Some(msg.clone()), None)
            }
            AppError::Domain(DomainError::Conflict(msg))
            | AppError::Domain(DomainError::LimitReached(msg)) => {
                ("Conflict", Some(msg.clone()), None)
            }
            AppError::Circulation(CirculationError::Validation { field, message }) => {
                ("Validation error", Some(message.clone()), Some(*field))
            }
            AppError::Circulation(e) => {
                let category = match e {
                    CirculationError::InvalidPatronId => "Validation error",
                    CirculationError::BookNotFound => "Not found",
                    _ => "Conflict",
                };
                (category, Some(e.to_string()), None)
            }
            AppError::Billing(e) => {
                let category = match e {
                    BillingError::PaymentDeclined(_) | BillingError::RefundDeclined(_) => {
                        "Payment declined"
                    }
                    BillingError::NoLateFees => "Conflict",
                    _ => "Validation error",
                };
                (category, Some(e.to_string()), None)
            }
            AppError::Payment(e) => {
                tracing::error!("Payment gateway error: {}", e);
                ("Payment service error", Some(self.to_string()), None)
            }
            AppError::BadRequest(msg) => ("Bad request", Some(msg.clone()), None),
            AppError::Unauthorized => ("Unauthorized", None, None),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
            field,
        });

        (status, body).into_response()
    }
}
