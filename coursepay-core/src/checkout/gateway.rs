//! Gateway traits over the backend collaborators.
//!
//! The orchestrator talks to the order and payment services through these
//! seams; the SDK clients implement them for production and tests supply
//! in-memory fakes.

use async_trait::async_trait;
use coursepay_sdk::client::{ClientError, OrderClient, PaymentClient};
use coursepay_sdk::objects::{MethodCode, OrderResponse, PaymentStatus, RedirectPaymentUrl};
use uuid::Uuid;

/// The order service: creates orders from the mirrored cart and reports
/// their state.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn create_order_from_cart(
        &self,
        promotion_code: Option<String>,
    ) -> Result<OrderResponse, ClientError>;

    async fn get_order(&self, order_id: Uuid) -> Result<OrderResponse, ClientError>;
}

#[async_trait]
impl OrderService for OrderClient {
    async fn create_order_from_cart(
        &self,
        promotion_code: Option<String>,
    ) -> Result<OrderResponse, ClientError> {
        OrderClient::create_order_from_cart(self, promotion_code).await
    }

    async fn get_order(&self, order_id: Uuid) -> Result<OrderResponse, ClientError> {
        OrderClient::get_order(self, order_id).await
    }
}

/// The payment service: mints redirect URLs and reports settlement status.
#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn create_redirect_url(
        &self,
        order_id: Uuid,
        method: MethodCode,
    ) -> Result<RedirectPaymentUrl, ClientError>;

    async fn payment_status(&self, order_id: Uuid) -> Result<PaymentStatus, ClientError>;
}

#[async_trait]
impl PaymentService for PaymentClient {
    async fn create_redirect_url(
        &self,
        order_id: Uuid,
        method: MethodCode,
    ) -> Result<RedirectPaymentUrl, ClientError> {
        PaymentClient::create_redirect_url(self, order_id, method).await
    }

    async fn payment_status(&self, order_id: Uuid) -> Result<PaymentStatus, ClientError> {
        let resp = PaymentClient::get_payment_status(self, order_id).await?;
        Ok(resp.status)
    }
}
