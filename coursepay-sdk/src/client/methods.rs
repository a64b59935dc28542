//! Payment-method directory client.

use reqwest::Client;
use tokio::sync::OnceCell;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::methods::PaymentMethod;

/// Typed HTTP client for the **payment-method directory service**.
///
/// The directory is read-only and stable for the lifetime of a session,
/// so the first successful fetch is cached; [`refresh`](Self::refresh)
/// bypasses the cache when a caller really wants a fresh list.
#[derive(Debug)]
pub struct MethodDirectoryClient {
    http: Client,
    base_url: Url,
    cache: OnceCell<Vec<PaymentMethod>>,
}

impl MethodDirectoryClient {
    /// Create a new `MethodDirectoryClient` rooted at the backend's base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
            cache: OnceCell::new(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET /api/v1/payment-methods` – list the available settlement
    /// channels, cached after the first successful call.
    pub async fn list_payment_methods(&self) -> Result<&[PaymentMethod], ClientError> {
        let methods = self
            .cache
            .get_or_try_init(|| self.fetch())
            .await?;
        Ok(methods.as_slice())
    }

    /// Fetch the directory from the backend, ignoring the session cache.
    pub async fn refresh(&self) -> Result<Vec<PaymentMethod>, ClientError> {
        self.fetch().await
    }

    async fn fetch(&self) -> Result<Vec<PaymentMethod>, ClientError> {
        let url = self.base_url.join("/api/v1/payment-methods")?;

        let resp = self.http.get(url).send().await?;

        parse_response(resp).await
    }
}
