//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier, as issued by the marketplace backend (`_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a raw backend id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Product summary copied into a cart line at the time it is added.
///
/// This is a snapshot, not a live reference: stock and price changes on the
/// backend are only picked up when the cart is re-hydrated from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product id
    #[serde(rename = "_id")]
    pub id: ProductId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Price per rental day
    #[serde(rename = "pricePerDay", with = "rust_decimal::serde::float")]
    pub price_per_day: Decimal,

    /// Units available to rent
    #[serde(rename = "availableQuantity", default)]
    pub available_quantity: u32,
}

impl ProductSummary {
    /// Create a product summary.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price_per_day: Decimal,
        available_quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_per_day,
            available_quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn deserializes_backend_product_ignoring_extra_fields() -> TestResult {
        let product: ProductSummary = serde_json::from_value(json!({
            "_id": "65f0c0ffee",
            "name": "Graphing calculator",
            "pricePerDay": 12.5,
            "availableQuantity": 3,
            "images": ["a.png"],
            "owner": { "_id": "u1" }
        }))?;

        assert_eq!(product.id, ProductId::new("65f0c0ffee"));
        assert_eq!(product.price_per_day, Decimal::new(125, 1));
        assert_eq!(product.available_quantity, 3);

        Ok(())
    }

    #[test]
    fn serializes_with_backend_field_names() -> TestResult {
        let product = ProductSummary::new("p1", "Bike", Decimal::from(20), 5);

        let value = serde_json::to_value(&product)?;

        assert_eq!(
            value,
            json!({ "_id": "p1", "name": "Bike", "pricePerDay": 20.0, "availableQuantity": 5 })
        );

        Ok(())
    }
}
