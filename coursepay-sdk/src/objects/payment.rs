//! Payment service request and response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::methods::MethodCode;

/// Request payload for creating a hosted-page redirect payment
/// (card and PayPal style methods).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRedirectPayment {
    pub order_id: Uuid,
    pub method: MethodCode,
}

/// The hosted payment page the user should be sent to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectPaymentUrl {
    pub payment_url: url::Url,
}

/// Settlement state of a payment attempt, as reported by the status
/// polling endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Response of `GET /api/v1/payments/{order_id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub order_id: Uuid,
    pub status: PaymentStatus,
}
