//! Circulation handlers
//!
//! Borrow and return forms posted from the catalog page.

use axum::{extract::State, Form, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::parse_book_id;
use crate::domain::entities::{Book, Loan};
use crate::error::AppError;
use crate::AppState;

/// Form body for POST /borrow and POST /return
#[derive(Debug, Deserialize)]
pub struct LoanForm {
    #[serde(default)]
    pub patron_id: String,
    #[serde(default)]
    pub book_id: String,
}

/// Response for POST /borrow
#[derive(Debug, Serialize)]
pub struct BorrowResponse {
    pub success: bool,
    pub message: String,
    pub loan: Loan,
    pub book: Book,
}

/// Response for POST /return
#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    pub success: bool,
    pub message: String,
    pub loan: Loan,
    pub book: Book,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee_amount: Decimal,
    pub days_overdue: i64,
}

/// POST /borrow
pub async fn borrow_book(
    State(state): State<AppState>,
    Form(form): Form<LoanForm>,
) -> Result<Json<BorrowResponse>, AppError> {
    let book_id = parse_book_id(&form.book_id)?;
    let receipt = state
        .circulation
        .borrow(form.patron_id.trim(), book_id)
        .await?;

    Ok(Json(BorrowResponse {
        success: true,
        message: receipt.message(),
        loan: receipt.loan,
        book: receipt.book,
    }))
}

/// POST /return
pub async fn return_book(
    State(state): State<AppState>,
    Form(form): Form<LoanForm>,
) -> Result<Json<ReturnResponse>, AppError> {
    let book_id = parse_book_id(&form.book_id)?;
    let receipt = state
        .circulation
        .return_book(form.patron_id.trim(), book_id)
        .await?;

    Ok(Json(ReturnResponse {
        success: true,
        message: receipt.message(),
        fee_amount: receipt.fee.amount,
        days_overdue: receipt.fee.days_overdue,
        loan: receipt.loan,
        book: receipt.book,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LateFee;
    use crate::test_utils::{test_book, test_loan};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn serialize_return_response() {
        let mut loan = test_loan(1, "123456", 2, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let fee = LateFee {
            amount: dec!(3.50),
            days_overdue: 7,
        };
        loan.close(NaiveDate::from_ymd_opt(2024, 5, 22).unwrap(), fee)
            .unwrap();
        let response = ReturnResponse {
            success: true,
            message: "returned".to_string(),
            loan,
            book: test_book(2, "Refactoring", "Martin Fowler", "9780201485677", 1),
            fee_amount: fee.amount,
            days_overdue: fee.days_overdue,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["fee_amount"], serde_json::json!(3.5));
        assert_eq!(json["loan"]["status"]["state"], "returned");
        assert_eq!(json["loan"]["patron_id"], "123456");
        assert_eq!(json["book"]["available_copies"], 1);
    }
}
