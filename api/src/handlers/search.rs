//! Search handlers
//!
//! JSON search API and the HTML search page. Unknown search types fall back
//! to title.

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Book, SearchField};
use crate::error::AppError;
use crate::views::render_search;
use crate::AppState;

/// Query string for search endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub search_type: Option<String>,
}

impl SearchParams {
    fn query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn field(&self) -> SearchField {
        SearchField::parse_or_default(self.search_type.as_deref())
    }
}

/// Response for GET /api/search
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(rename = "type")]
    pub search_type: SearchField,
    pub count: usize,
    pub results: Vec<Book>,
}

/// GET /api/search?q=&type=
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params
        .query()
        .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;
    let field = params.field();

    let results = state.catalog.search(Some(query), field).await?;

    Ok(Json(SearchResponse {
        query: query.to_string(),
        search_type: field,
        count: results.len(),
        results,
    }))
}

/// GET /search?q=&type=
///
/// Without a query only the search form is shown.
pub async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let field = params.field();

    let html = match params.query() {
        Some(query) => {
            let results = state.catalog.search(Some(query), field).await?;
            render_search(Some(query), field, Some(results.as_slice()))
        }
        None => render_search(None, field, None),
    };

    Ok(Html(html))
}
