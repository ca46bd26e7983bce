//! Remote cart synchronisation.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    items::{CartLineItem, default_rental_days},
    products::{ProductId, ProductSummary},
};

mod http;

pub use http::{HttpRemoteCart, RemoteConfig};

/// Errors that can occur when talking to the remote cart store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx response.
    #[error("unexpected response from cart endpoint: {0}")]
    UnexpectedResponse(String),
}

/// A line as pushed to the remote store: the product is referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCartItem {
    /// Product id
    pub product: ProductId,

    /// Units in the cart
    pub quantity: u32,

    /// Rental duration in days
    pub rental_days: u32,
}

impl From<&CartLineItem> for RemoteCartItem {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product: item.product.id.clone(),
            quantity: item.quantity,
            rental_days: item.rental_days,
        }
    }
}

/// A line as returned by the remote store, with the product populated.
///
/// `product` is `None` when the referenced product no longer exists.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteLine {
    /// Populated product
    #[serde(default)]
    pub product: Option<ProductSummary>,

    /// Units in the cart
    #[serde(default)]
    pub quantity: u32,

    /// Rental duration in days
    #[serde(default = "default_rental_days")]
    pub rental_days: u32,
}

impl RemoteLine {
    /// Convert to a cart line, dropping dangling or empty entries.
    pub fn into_line_item(self) -> Option<CartLineItem> {
        let product = self.product?;

        let rental_days = self.rental_days.max(1);

        (self.quantity > 0).then(|| CartLineItem::new(product, self.quantity, rental_days))
    }
}

/// Project cart lines onto the push payload.
pub fn remote_items(items: &[CartLineItem]) -> Vec<RemoteCartItem> {
    items.iter().map(RemoteCartItem::from).collect()
}

/// The server-side copy of a user's cart.
#[automock]
#[async_trait]
pub trait RemoteCart: Send + Sync {
    /// Fetch the user's cart.
    async fn fetch_cart(&self) -> Result<Vec<RemoteLine>, RemoteError>;

    /// Replace the user's cart with `items`.
    async fn push_cart(&self, items: Vec<RemoteCartItem>) -> Result<(), RemoteError>;
}
