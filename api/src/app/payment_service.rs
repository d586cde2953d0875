//! Payment service
//!
//! Charges outstanding late fees through the payment gateway and refunds
//! earlier charges. Input is validated before the gateway is contacted.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use super::circulation_service::CirculationService;
use super::policy::MAX_LATE_FEE;
use crate::domain::entities::{BookId, PatronId};
use crate::domain::ports::{BookRepository, LoanRepository, PaymentGateway};
use crate::error::{AppError, BillingError, PaymentError};

const TRANSACTION_PREFIX: &str = "txn_";

/// Result of an approved late-fee payment
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub message: String,
}

/// Result of an approved refund
#[derive(Debug, Clone, Serialize)]
pub struct RefundReceipt {
    pub transaction_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub message: String,
}

/// Service for late-fee payments
pub struct PaymentService<BR, LR, PG>
where
    BR: BookRepository + ?Sized,
    LR: LoanRepository + ?Sized,
    PG: PaymentGateway + ?Sized,
{
    circulation: Arc<CirculationService<BR, LR>>,
    gateway: Arc<PG>,
}

impl<BR, LR, PG> PaymentService<BR, LR, PG>
where
    BR: BookRepository + ?Sized,
    LR: LoanRepository + ?Sized,
    PG: PaymentGateway + ?Sized,
{
    pub fn new(circulation: Arc<CirculationService<BR, LR>>, gateway: Arc<PG>) -> Self {
        Self {
            circulation,
            gateway,
        }
    }

    /// Pay the current late fee of an outstanding loan
    pub async fn pay_late_fees(
        &self,
        patron_id: &str,
        book_id: BookId,
    ) -> Result<PaymentReceipt, AppError> {
        let patron_id = PatronId::parse(patron_id)?;

        let quote = self
            .circulation
            .late_fee(patron_id.as_str(), book_id)
            .await?;
        if !quote.fee.is_due() {
            return Err(BillingError::NoLateFees.into());
        }

        let description = format!("Late fees for '{}'", quote.book.title);
        let outcome = self
            .gateway
            .process_payment(patron_id.as_str(), quote.fee.amount, &description)
            .await?;

        if !outcome.approved {
            tracing::warn!(
                patron_id = %patron_id,
                book_id = %book_id,
                reason = %outcome.message,
                "Late fee payment declined"
            );
            return Err(BillingError::PaymentDeclined(outcome.message).into());
        }

        let transaction_id = outcome.transaction_id.ok_or_else(|| {
            PaymentError::Deserialization("approved payment without transaction id".to_string())
        })?;

        tracing::info!(
            patron_id = %patron_id,
            book_id = %book_id,
            transaction_id = %transaction_id,
            amount = %quote.fee.amount,
            "Late fee paid"
        );

        Ok(PaymentReceipt {
            transaction_id,
            amount: quote.fee.amount,
            message: format!("Payment successful! {}", outcome.message),
        })
    }

    /// Refund an earlier late-fee charge
    ///
    /// No refund can exceed the per-loan fee cap.
    pub async fn refund_late_fee_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundReceipt, AppError> {
        if !transaction_id.starts_with(TRANSACTION_PREFIX) {
            return Err(BillingError::InvalidTransactionId.into());
        }
        if amount <= Decimal::ZERO {
            return Err(BillingError::RefundAmountNotPositive.into());
        }
        if amount > MAX_LATE_FEE {
            return Err(BillingError::RefundExceedsMaximum.into());
        }

        let outcome = self.gateway.refund_payment(transaction_id, amount).await?;

        if !outcome.approved {
            tracing::warn!(transaction_id, reason = %outcome.message, "Refund declined");
            return Err(BillingError::RefundDeclined(outcome.message).into());
        }

        tracing::info!(transaction_id, amount = %amount, "Late fee refunded");

        Ok(RefundReceipt {
            transaction_id: transaction_id.to_string(),
            amount,
            message: outcome.message,
        })
    }
}
