//! Catalog handlers
//!
//! Catalog display and book management. The catalog page supports content
//! negotiation: Accept: application/json for JSON, otherwise HTML.

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;

use super::common::{parse_book_id, sends_json, wants_json};
use crate::error::{AppError, CirculationError};
use crate::views::render_catalog;
use crate::AppState;

/// Number of copies as sent by a form (text) or a JSON client (number)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CopiesInput {
    Number(i64),
    Text(String),
}

/// Request body for POST /books
///
/// Missing fields default to empty so validation reports them by name.
#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    pub total_copies: Option<CopiesInput>,
}

impl AddBookRequest {
    fn total_copies(&self) -> Result<i64, AppError> {
        let parsed = match &self.total_copies {
            Some(CopiesInput::Number(n)) => Some(*n),
            Some(CopiesInput::Text(s)) => s.trim().parse().ok(),
            None => None,
        };
        parsed.ok_or_else(|| {
            CirculationError::validation("total_copies", "Total copies must be a positive integer.")
                .into()
        })
    }
}

/// GET /catalog
///
/// - Accept: application/json → JSON list of books
/// - Otherwise → HTML table
pub async fn get_catalog(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let books = state.catalog.list_books().await?;

    if wants_json(&headers) {
        Ok(Json(books).into_response())
    } else {
        Ok(Html(render_catalog(&books)).into_response())
    }
}

/// POST /books
///
/// Accepts a form or a JSON body. Browsers are redirected back to the
/// catalog; JSON clients get 201 with the created book.
pub async fn add_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
) -> Result<Response, AppError> {
    let json_body = sends_json(&headers);

    let body: AddBookRequest = if json_body {
        let Json(body) = Json::<AddBookRequest>::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        body
    } else {
        let Form(body) = Form::<AddBookRequest>::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        body
    };

    let total_copies = body.total_copies()?;
    let book = state
        .catalog
        .add_book(&body.title, &body.author, &body.isbn, total_copies)
        .await?;

    if json_body || wants_json(&headers) {
        Ok((StatusCode::CREATED, Json(book)).into_response())
    } else {
        Ok(Redirect::to("/catalog").into_response())
    }
}

/// GET /books/:id
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let book_id = parse_book_id(&id)?;
    let book = state.catalog.get_book(&book_id).await?;

    Ok(Json(book).into_response())
}
