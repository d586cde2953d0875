//! Librarian API key middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::AppState;

/// Hash an API key for storage and comparison
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extract the API key from the Authorization header
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Librarian authentication middleware
///
/// Guards catalog changes and refunds. When no librarian key is configured
/// the routes stay open.
pub async fn librarian_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.librarian_key_hash.as_deref() else {
        return Ok(next.run(request).await);
    };

    let api_key = extract_api_key(&request).ok_or(AppError::Unauthorized)?;

    if hash_api_key(api_key) != expected {
        tracing::warn!(path = %request.uri().path(), "Rejected librarian API key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
