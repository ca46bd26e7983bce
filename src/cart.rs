//! Cart state and its transition function.
//!
//! [`CartState::apply`] is the only way to derive a new state from an
//! existing one. Every constructor recomputes the total from the lines with
//! checked arithmetic; a transition whose total would overflow is rejected.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    items::{CartLineItem, LineKey, default_rental_days, merge_line_items},
    pricing::total_amount,
    products::{ProductId, ProductSummary},
};

/// Errors that reject a cart transition. The prior state is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity exceeds the product's available stock.
    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        /// Product whose stock would be exceeded
        product_id: ProductId,

        /// Resulting line quantity that was requested
        requested: u32,

        /// Units available
        available: u32,
    },

    /// Quantities added to the cart must be positive.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Rental durations must be at least one day.
    #[error("invalid rental duration: {0} days")]
    InvalidRentalDays(u32),

    /// The cart total would exceed the representable amount.
    #[error("cart total overflows")]
    AmountOverflow,
}

/// A cart transition.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add units of a product for a rental duration.
    AddItem {
        /// Product summary to copy into the line
        product: ProductSummary,

        /// Units to add
        quantity: u32,

        /// Rental duration in days
        rental_days: u32,
    },

    /// Remove every line for a product.
    RemoveItem {
        /// Product to remove
        product_id: ProductId,
    },

    /// Set the quantity of a product's lines; zero removes them.
    UpdateQuantity {
        /// Product to update
        product_id: ProductId,

        /// New quantity
        quantity: u32,
    },

    /// Set the rental duration of a product's lines.
    UpdateItemRentalDays {
        /// Product to update
        product_id: ProductId,

        /// New rental duration in days
        rental_days: u32,
    },

    /// Set the rental duration of every line and the cart default.
    UpdateRentalDays {
        /// New rental duration in days
        rental_days: u32,
    },

    /// Empty the cart.
    Clear,
}

/// Projection of a line for order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    /// Product id
    pub product_id: ProductId,

    /// Units ordered
    pub quantity: u32,
}

/// Cart contents.
#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    items: Vec<CartLineItem>,
    total_amount: Decimal,
    rental_days_default: u32,
}

impl Default for CartState {
    fn default() -> Self {
        Self::with_items(Vec::new(), default_rental_days())
    }
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored or remote lines, deriving the total.
    ///
    /// Lines with a zero quantity or duration are dropped, lines sharing a
    /// [`LineKey`] are merged, and lines whose amount would overflow the
    /// total are dropped. Each dropped line is logged.
    pub fn with_items(items: Vec<CartLineItem>, rental_days_default: u32) -> Self {
        let valid = items
            .into_iter()
            .filter(|item| {
                let valid = item.quantity > 0 && item.rental_days > 0;

                if !valid {
                    warn!(
                        product_id = %item.product.id,
                        quantity = item.quantity,
                        rental_days = item.rental_days,
                        "dropping invalid cart line"
                    );
                }

                valid
            })
            .collect();

        let mut lines = Vec::new();
        let mut total = Decimal::ZERO;

        for item in merge_line_items(Vec::new(), valid) {
            match item.line_total().and_then(|amount| total.checked_add(amount)) {
                Some(next) => {
                    total = next;
                    lines.push(item);
                }
                None => warn!(
                    product_id = %item.product.id,
                    "dropping cart line whose amount overflows the total"
                ),
            }
        }

        Self {
            items: lines,
            total_amount: total,
            rental_days_default: rental_days_default.max(1),
        }
    }

    fn try_with_items(
        items: Vec<CartLineItem>,
        rental_days_default: u32,
    ) -> Result<Self, CartError> {
        let total_amount = total_amount(&items).ok_or(CartError::AmountOverflow)?;

        Ok(Self {
            items,
            total_amount,
            rental_days_default,
        })
    }

    /// Lines in display order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consume the state, returning its lines.
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// `Σ price_per_day × rental_days × quantity` over the current lines.
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Duration applied by the last cart-wide duration change.
    pub fn rental_days_default(&self) -> u32 {
        self.rental_days_default
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines projected to `(product id, quantity)` pairs for checkout.
    pub fn checkout_items(&self) -> Vec<CheckoutItem> {
        self.items
            .iter()
            .map(|item| CheckoutItem {
                product_id: item.product.id.clone(),
                quantity: item.quantity,
            })
            .collect()
    }

    /// Apply a transition, returning the next state.
    ///
    /// # Errors
    ///
    /// - [`CartError::InsufficientStock`]: a line would exceed its product's stock.
    /// - [`CartError::InvalidQuantity`]: zero units were added.
    /// - [`CartError::InvalidRentalDays`]: a duration below one day was given.
    /// - [`CartError::AmountOverflow`]: the resulting total would overflow.
    pub fn apply(&self, action: CartAction) -> Result<Self, CartError> {
        match action {
            CartAction::AddItem {
                product,
                quantity,
                rental_days,
            } => self.add_item(product, quantity, rental_days),
            CartAction::RemoveItem { product_id } => self.remove_item(&product_id),
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => self.update_quantity(&product_id, quantity),
            CartAction::UpdateItemRentalDays {
                product_id,
                rental_days,
            } => self.update_item_rental_days(&product_id, rental_days),
            CartAction::UpdateRentalDays { rental_days } => self.update_rental_days(rental_days),
            CartAction::Clear => Ok(Self::default()),
        }
    }

    fn add_item(
        &self,
        product: ProductSummary,
        quantity: u32,
        rental_days: u32,
    ) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if rental_days == 0 {
            return Err(CartError::InvalidRentalDays(rental_days));
        }

        let key = LineKey {
            product_id: product.id.clone(),
            rental_days,
        };

        let mut items = self.items.clone();
        let existing = items.iter_mut().find(|item| item.key() == key);
        let held = existing.as_ref().map_or(0, |item| item.quantity);
        let available = product.available_quantity;

        let requested = held
            .checked_add(quantity)
            .filter(|requested| *requested <= available)
            .ok_or_else(|| CartError::InsufficientStock {
                product_id: product.id.clone(),
                requested: held.saturating_add(quantity),
                available,
            })?;

        match existing {
            Some(item) => item.quantity = requested,
            None => items.push(CartLineItem::new(product, quantity, rental_days)),
        }

        Self::try_with_items(items, self.rental_days_default)
    }

    fn remove_item(&self, product_id: &ProductId) -> Result<Self, CartError> {
        let items = self
            .items
            .iter()
            .filter(|item| !item.is_product(product_id))
            .cloned()
            .collect();

        Self::try_with_items(items, self.rental_days_default)
    }

    fn update_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<Self, CartError> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        if let Some(item) = self.items.iter().find(|item| {
            item.is_product(product_id) && quantity > item.product.available_quantity
        }) {
            return Err(CartError::InsufficientStock {
                product_id: product_id.clone(),
                requested: quantity,
                available: item.product.available_quantity,
            });
        }

        if !self.items.iter().any(|item| item.is_product(product_id)) {
            debug!(%product_id, "quantity update for product not in cart");
        }

        let items = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.is_product(product_id) {
                    item.quantity = quantity;
                }

                item
            })
            .collect();

        Self::try_with_items(items, self.rental_days_default)
    }

    fn update_item_rental_days(
        &self,
        product_id: &ProductId,
        rental_days: u32,
    ) -> Result<Self, CartError> {
        if rental_days == 0 {
            return Err(CartError::InvalidRentalDays(rental_days));
        }

        let items = self.items.iter().cloned().map(|mut item| {
            if item.is_product(product_id) {
                item.rental_days = rental_days;
            }

            item
        });

        Self::try_with_items(collapse_lines(items)?, self.rental_days_default)
    }

    fn update_rental_days(&self, rental_days: u32) -> Result<Self, CartError> {
        if rental_days == 0 {
            return Err(CartError::InvalidRentalDays(rental_days));
        }

        let items = self.items.iter().cloned().map(|mut item| {
            item.rental_days = rental_days;

            item
        });

        Self::try_with_items(collapse_lines(items)?, rental_days)
    }
}

/// Collapse lines that share a [`LineKey`] into the first occurrence,
/// rejecting the result if a collapsed line would exceed its stock.
fn collapse_lines(
    items: impl IntoIterator<Item = CartLineItem>,
) -> Result<Vec<CartLineItem>, CartError> {
    let mut lines: Vec<CartLineItem> = Vec::new();
    let mut positions: FxHashMap<LineKey, usize> = FxHashMap::default();

    for item in items {
        let key = item.key();

        if let Some(existing) = positions
            .get(&key)
            .copied()
            .and_then(|index| lines.get_mut(index))
        {
            let available = existing.product.available_quantity;
            let requested = existing.quantity.saturating_add(item.quantity);

            if requested > available {
                return Err(CartError::InsufficientStock {
                    product_id: key.product_id,
                    requested,
                    available,
                });
            }

            existing.quantity = requested;

            continue;
        }

        positions.insert(key, lines.len());
        lines.push(item);
    }

    Ok(lines)
}
