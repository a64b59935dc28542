//! Order service request and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request payload for creating an order from the current cart.
///
/// The backend reads the cart it mirrored via the cart-sync service;
/// the client only supplies the optional promotion code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_code: Option<String>,
}

/// Current lifecycle state of an order, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

/// Response returned by both the "create order" and "get order" endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: Uuid,
    /// Cart subtotal plus tax, as settled by the backend.
    pub final_amount: Decimal,
    pub status: OrderStatus,
    /// Unix timestamp of when the order was created.
    pub created_at: i64,
}
