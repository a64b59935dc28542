//! Cart sync client.
//!
//! Mirrors local cart mutations to the backend. The local cart store is
//! the authority for immediate UI feedback; callers treat failures here
//! as log-and-continue, never as a failed user action.

use reqwest::Client;
use url::Url;

use super::{ClientError, expect_success};
use crate::objects::cart::CartMutation;

/// Typed HTTP client for the **cart sync service**.
#[derive(Debug, Clone)]
pub struct CartSyncClient {
    http: Client,
    base_url: Url,
}

impl CartSyncClient {
    /// Create a new `CartSyncClient` rooted at the backend's base URL.
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

    /// `POST /api/v1/cart/mutations` – mirror one cart mutation.
    pub async fn push(&self, mutation: &CartMutation) -> Result<(), ClientError> {
        let url = self.base_url.join("/api/v1/cart/mutations")?;

        let resp = self.http.post(url).json(mutation).send().await?;

        expect_success(resp).await
    }
}
