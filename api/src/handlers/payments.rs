//! Payment handlers

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::app::RefundReceipt;
use crate::error::AppError;
use crate::AppState;

/// Request body for POST /payments/refund
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    pub transaction_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Response for POST /payments/refund
#[derive(Debug, Serialize)]
pub struct RefundResponse {
    pub success: bool,
    #[serde(flatten)]
    pub receipt: RefundReceipt,
}

/// POST /payments/refund
pub async fn refund_payment(
    State(state): State<AppState>,
    Json(body): Json<RefundRequest>,
) -> Result<Json<RefundResponse>, AppError> {
    let receipt = state
        .payments
        .refund_late_fee_payment(body.transaction_id.trim(), body.amount)
        .await?;

    Ok(Json(RefundResponse {
        success: true,
        receipt,
    }))
}
