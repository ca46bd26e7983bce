//! HTTP client for the marketplace cart endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header::COOKIE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{RemoteCart, RemoteCartItem, RemoteError, RemoteLine};

const CART_PATH: &str = "/api/users/cart";

/// Configuration for connecting to the marketplace backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Backend base address, e.g. `"http://localhost:5000"`.
    pub base_url: String,

    /// Session cookie sent with every request, e.g. `"connect.sid=..."`.
    pub session_cookie: Option<String>,

    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

/// Remote cart backed by `GET`/`POST /api/users/cart`.
#[derive(Debug, Clone)]
pub struct HttpRemoteCart {
    config: RemoteConfig,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct CartResponse {
    #[serde(default)]
    cart: Vec<RemoteLine>,
}

#[derive(Debug, Serialize)]
struct CartRequest {
    cart: Vec<RemoteCartItem>,
}

impl HttpRemoteCart {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let mut builder = Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    fn url(&self) -> String {
        format!("{}{CART_PATH}", self.config.base_url.trim_end_matches('/'))
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }
}

async fn ensure_success(response: Response, operation: &str) -> Result<Response, RemoteError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    Err(RemoteError::UnexpectedResponse(format!(
        "{operation} request failed with status {status}: {text}"
    )))
}

#[async_trait]
impl RemoteCart for HttpRemoteCart {
    async fn fetch_cart(&self) -> Result<Vec<RemoteLine>, RemoteError> {
        let response = self.with_session(self.http.get(self.url())).send().await?;
        let parsed: CartResponse = ensure_success(response, "fetch cart").await?.json().await?;

        debug!(lines = parsed.cart.len(), "fetched remote cart");

        Ok(parsed.cart)
    }

    async fn push_cart(&self, items: Vec<RemoteCartItem>) -> Result<(), RemoteError> {
        let lines = items.len();
        let body = CartRequest { cart: items };

        let response = self
            .with_session(self.http.post(self.url()))
            .json(&body)
            .send()
            .await?;

        ensure_success(response, "push cart").await?;

        debug!(lines, "pushed remote cart");

        Ok(())
    }
}
