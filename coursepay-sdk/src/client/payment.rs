//! Payment service client.

use reqwest::Client;
use url::Url;
use uuid::Uuid;

use super::{ClientError, parse_response};
use crate::objects::methods::MethodCode;
use crate::objects::payment::{CreateRedirectPayment, PaymentStatusResponse, RedirectPaymentUrl};

/// Typed HTTP client for the **Payment service**.
///
/// Covers the two things the checkout flow needs: minting a hosted-page
/// redirect URL for card/PayPal methods, and polling the settlement
/// status of an order's payment attempt.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    http: Client,
    base_url: Url,
}

impl PaymentClient {
    /// Create a new `PaymentClient` rooted at the backend's base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api/v1/payments/redirect` – create a hosted payment page
    /// for the order and return its URL.
    pub async fn create_redirect_url(
        &self,
        order_id: Uuid,
        method: MethodCode,
    ) -> Result<RedirectPaymentUrl, ClientError> {
        let url = self.base_url.join("/api/v1/payments/redirect")?;

        let resp = self
            .http
            .post(url)
            .json(&CreateRedirectPayment { order_id, method })
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET /api/v1/payments/{order_id}/status` – poll the settlement
    /// status of the order's payment attempt.
    pub async fn get_payment_status(
        &self,
        order_id: Uuid,
    ) -> Result<PaymentStatusResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/payments/{order_id}/status"))?;

        let resp = self.http.get(url).send().await?;

        parse_response(resp).await
    }
}
