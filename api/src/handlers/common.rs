//! Helpers shared by the handlers

use axum::http::{header, HeaderMap};

use crate::domain::entities::BookId;
use crate::error::AppError;

/// Check if the client wants JSON response
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// Check if the request body is JSON
pub fn sends_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

/// Parse a book id from a form field or path segment
pub fn parse_book_id(raw: &str) -> Result<BookId, AppError> {
    raw.trim()
        .parse::<i32>()
        .map(BookId)
        .map_err(|_| AppError::BadRequest("Invalid book ID".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parse_book_id_accepts_integers() {
        assert_eq!(parse_book_id(" 42 ").unwrap(), BookId(42));
    }

    #[test]
    fn parse_book_id_rejects_garbage() {
        for raw in ["", "abc", "1.5", "99999999999"] {
            let err = parse_book_id(raw).unwrap_err();
            assert!(err.to_string().contains("Invalid book ID"));
        }
    }

    #[test]
    fn wants_json_reads_accept_header() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!wants_json(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(wants_json(&headers));
    }
}
