//! Cart line items

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::products::{ProductId, ProductSummary};

/// Identity of a line item: the same product rented for a different number
/// of days is a different line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product id
    pub product_id: ProductId,

    /// Rental duration in days
    pub rental_days: u32,
}

/// A product, quantity and rental duration in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product summary captured when the line was added
    pub product: ProductSummary,

    /// Units in the cart
    pub quantity: u32,

    /// Rental duration in days
    #[serde(default = "default_rental_days")]
    pub rental_days: u32,
}

pub(crate) const fn default_rental_days() -> u32 {
    1
}

impl CartLineItem {
    /// Create a line item.
    pub fn new(product: ProductSummary, quantity: u32, rental_days: u32) -> Self {
        Self {
            product,
            quantity,
            rental_days,
        }
    }

    /// Key used to collapse and look up lines.
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id.clone(),
            rental_days: self.rental_days,
        }
    }

    /// Whether this line belongs to the given product, whatever its duration.
    pub fn is_product(&self, product_id: &ProductId) -> bool {
        self.product.id == *product_id
    }

    /// `price_per_day × rental_days × quantity`, or `None` on overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        self.product
            .price_per_day
            .checked_mul(Decimal::from(self.rental_days))?
            .checked_mul(Decimal::from(self.quantity))
    }
}

/// Merge `incoming` lines into `base`.
///
/// Lines sharing a [`LineKey`] have their quantities summed, capped at the
/// product's available stock. A merge never lowers an existing quantity.
/// Order is preserved: `base` lines first, then new keys from `incoming` in
/// their original order. The most recently seen product summary wins.
pub fn merge_line_items(base: Vec<CartLineItem>, incoming: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(base.len() + incoming.len());
    let mut positions: FxHashMap<LineKey, usize> = FxHashMap::default();

    for item in base.into_iter().chain(incoming) {
        let key = item.key();

        if let Some(existing) = positions
            .get(&key)
            .copied()
            .and_then(|index| merged.get_mut(index))
        {
            let cap = item.product.available_quantity.max(existing.quantity);

            existing.quantity = existing.quantity.saturating_add(item.quantity).min(cap);
            existing.product = item.product;

            continue;
        }

        positions.insert(key, merged.len());
        merged.push(item);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, stock: u32) -> ProductSummary {
        ProductSummary::new(id, id, Decimal::from(10), stock)
    }

    #[test]
    fn line_total_multiplies_price_days_and_quantity() {
        let item = CartLineItem::new(product("p1", 5), 2, 3);

        assert_eq!(item.line_total(), Some(Decimal::from(60)));
    }

    #[test]
    fn line_total_overflow_is_none() {
        let item = CartLineItem::new(
            ProductSummary::new("p1", "p1", Decimal::MAX, 5),
            2,
            1,
        );

        assert_eq!(item.line_total(), None);
    }

    #[test]
    fn key_distinguishes_rental_days() {
        let short = CartLineItem::new(product("p1", 5), 1, 1);
        let long = CartLineItem::new(product("p1", 5), 1, 7);

        assert_ne!(short.key(), long.key());
        assert!(short.is_product(&long.product.id));
    }

    #[test]
    fn merge_sums_matching_keys_and_caps_at_stock() {
        let base = vec![
            CartLineItem::new(product("p1", 4), 3, 2),
            CartLineItem::new(product("p2", 9), 1, 1),
        ];
        let incoming = vec![
            CartLineItem::new(product("p1", 4), 3, 2),
            CartLineItem::new(product("p3", 2), 1, 1),
            CartLineItem::new(product("p2", 9), 2, 5),
        ];

        let merged = merge_line_items(base, incoming);

        let summary: Vec<(&str, u32, u32)> = merged
            .iter()
            .map(|item| (item.product.id.as_str(), item.quantity, item.rental_days))
            .collect();

        assert_eq!(
            summary,
            vec![("p1", 4, 2), ("p2", 1, 1), ("p3", 1, 1), ("p2", 2, 5)]
        );
    }

    #[test]
    fn merge_with_empty_base_keeps_incoming() {
        let incoming = vec![CartLineItem::new(product("p1", 4), 2, 1)];

        assert_eq!(merge_line_items(Vec::new(), incoming.clone()), incoming);
    }
}
