//! Payment gateway port trait
//!
//! Defines the interface for charging and refunding late fees through an
//! external payment provider.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PaymentError;

/// Gateway answer to a charge request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub approved: bool,
    /// Present when the charge was approved
    pub transaction_id: Option<String>,
    pub message: String,
}

/// Gateway answer to a refund request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundOutcome {
    pub approved: bool,
    pub message: String,
}

/// External payment provider
///
/// A declined charge is a normal `Ok` outcome with `approved: false`;
/// `Err` is reserved for transport and protocol failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge a patron
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentOutcome, PaymentError>;

    /// Refund (part of) an earlier charge
    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundOutcome, PaymentError>;
}
