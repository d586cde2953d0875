//! Patron handlers
//!
//! Late-fee lookups and status reports. The status report supports content
//! negotiation: Accept: application/json for JSON, otherwise text/plain.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::common::{parse_book_id, wants_json};
use crate::app::PaymentReceipt;
use crate::domain::entities::LateFee;
use crate::error::AppError;
use crate::views::render_patron_status;
use crate::AppState;

/// Response for GET /api/late_fee/:patron_id/:book_id
#[derive(Debug, Serialize)]
pub struct LateFeeResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub fee_amount: Decimal,
    pub days_overdue: i64,
    /// "Overdue" or "Not overdue"
    pub status: &'static str,
}

impl From<LateFee> for LateFeeResponse {
    fn from(fee: LateFee) -> Self {
        Self {
            fee_amount: fee.amount,
            days_overdue: fee.days_overdue,
            status: if fee.days_overdue > 0 {
                "Overdue"
            } else {
                "Not overdue"
            },
        }
    }
}

/// GET /api/late_fee/:patron_id/:book_id
///
/// Current fee of an outstanding loan; nothing is charged.
pub async fn get_late_fee(
    State(state): State<AppState>,
    Path((patron_id, book_id)): Path<(String, String)>,
) -> Result<Json<LateFeeResponse>, AppError> {
    let book_id = parse_book_id(&book_id)?;
    let quote = state.circulation.late_fee(&patron_id, book_id).await?;

    Ok(Json(LateFeeResponse::from(quote.fee)))
}

/// GET /patrons/:patron_id/status
///
/// - Accept: application/json → JSON response
/// - Otherwise → Plain text report
pub async fn get_patron_status(
    State(state): State<AppState>,
    Path(patron_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let status = state.circulation.patron_status(&patron_id).await?;

    if wants_json(&headers) {
        Ok(Json(status).into_response())
    } else {
        Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            render_patron_status(&status),
        )
            .into_response())
    }
}

/// Response for POST /patrons/:patron_id/fees/:book_id/pay
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    #[serde(flatten)]
    pub receipt: PaymentReceipt,
}

/// POST /patrons/:patron_id/fees/:book_id/pay
pub async fn pay_late_fees(
    State(state): State<AppState>,
    Path((patron_id, book_id)): Path<(String, String)>,
) -> Result<Json<PaymentResponse>, AppError> {
    let book_id = parse_book_id(&book_id)?;
    let receipt = state.payments.pay_late_fees(&patron_id, book_id).await?;

    Ok(Json(PaymentResponse {
        success: true,
        receipt,
    }))
}
