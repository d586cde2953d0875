//! HTTP payment gateway client
//!
//! Talks JSON to the payment provider. When a shared secret is configured
//! every request body is signed with HMAC-SHA256 (`X-Signature: sha256=<hex>`),
//! and every request carries a fresh `Idempotency-Key`.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::ports::{PaymentGateway, PaymentOutcome, RefundOutcome};
use crate::error::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Implementation of the payment gateway port over HTTP
pub struct HttpPaymentGateway {
    http: Client,
    base_url: String,
    secret: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(base_url: String, secret: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            secret,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, PaymentError>
    where
        B: Serialize,
        T: for<'de> Deserialize<'de>,
    {
        let payload =
            serde_json::to_vec(body).map_err(|e| PaymentError::Deserialization(e.to_string()))?;

        let mut request = self
            .http
            .post(self.api_url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("Idempotency-Key", Uuid::new_v4().to_string());

        if let Some(secret) = &self.secret {
            request = request.header("X-Signature", format!("sha256={}", sign(secret, &payload)?));
        }

        let response = request.body(payload).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| PaymentError::Deserialization(e.to_string()))
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(PaymentError::Unauthorized)
        } else if status.as_u16() == 503 {
            let message = response.text().await.unwrap_or_default();
            Err(PaymentError::Unavailable(message))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Hex HMAC-SHA256 of a request body
fn sign(secret: &str, payload: &[u8]) -> Result<String, PaymentError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Unavailable(format!("invalid signing key: {}", e)))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Request types for the gateway API
#[derive(Serialize)]
struct ChargeRequest<'a> {
    patron_id: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    description: &'a str,
}

#[derive(Serialize)]
struct RefundRequest<'a> {
    transaction_id: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum GatewayStatus {
    Approved,
    Declined,
}

#[derive(Deserialize)]
struct ChargeResponse {
    status: GatewayStatus,
    transaction_id: Option<String>,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct RefundResponse {
    status: GatewayStatus,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentOutcome, PaymentError> {
        let response: ChargeResponse = self
            .post(
                "/payments",
                &ChargeRequest {
                    patron_id,
                    amount,
                    description,
                },
            )
            .await?;

        tracing::debug!(patron_id, status = ?response.status, "Gateway charge response");

        Ok(PaymentOutcome {
            approved: response.status == GatewayStatus::Approved,
            transaction_id: response.transaction_id,
            message: response.message,
        })
    }

    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundOutcome, PaymentError> {
        let response: RefundResponse = self
            .post(
                "/refunds",
                &RefundRequest {
                    transaction_id,
                    amount,
                },
            )
            .await?;

        tracing::debug!(transaction_id, status = ?response.status, "Gateway refund response");

        Ok(RefundOutcome {
            approved: response.status == GatewayStatus::Approved,
            message: response.message,
        })
    }
}
