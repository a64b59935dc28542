//! Order service client (checkout core → marketplace backend).

use reqwest::Client;
use url::Url;
use uuid::Uuid;

use super::{ClientError, parse_response};
use crate::objects::order::{CreateOrderRequest, OrderResponse};

/// Typed HTTP client for the **Order service**.
///
/// Orders are created from the server-side mirror of the visitor's cart;
/// the client only contributes an optional promotion code.
#[derive(Debug, Clone)]
pub struct OrderClient {
    http: Client,
    base_url: Url,
}

impl OrderClient {
    /// Create a new `OrderClient` rooted at the backend's base URL.
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

    /// `POST /api/v1/orders` – create an order from the current cart.
    pub async fn create_order_from_cart(
        &self,
        promotion_code: Option<String>,
    ) -> Result<OrderResponse, ClientError> {
        let url = self.base_url.join("/api/v1/orders")?;

        let resp = self
            .http
            .post(url)
            .json(&CreateOrderRequest { promotion_code })
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET /api/v1/orders/{order_id}` – fetch the current order state.
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderResponse, ClientError> {
        let url = self.base_url.join(&format!("/api/v1/orders/{order_id}"))?;

        let resp = self.http.get(url).send().await?;

        parse_response(resp).await
    }
}
