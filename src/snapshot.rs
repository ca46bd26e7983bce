//! Persisted cart snapshots.
//!
//! Snapshot layout:
//!
//! ```json
//! { "items": [ { "product": { "_id": "...", "pricePerDay": 20, "availableQuantity": 5 },
//!                "quantity": 2, "rentalDays": 3 } ],
//!   "totalAmount": 120, "rentalDays": 3 }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::CartState,
    items::{CartLineItem, default_rental_days},
    storage::{CartStorage, StorageError},
};

/// Errors raised while reading or writing snapshots.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage backend failed.
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// The document is not a valid snapshot.
    #[error("malformed cart snapshot")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of [`CartState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Lines
    #[serde(default)]
    pub items: Vec<CartLineItem>,

    /// Total at the time of writing. Informational only.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Cart-wide default duration
    #[serde(default = "default_rental_days")]
    pub rental_days: u32,
}

impl From<&CartState> for CartSnapshot {
    fn from(state: &CartState) -> Self {
        Self {
            items: state.items().to_vec(),
            total_amount: state.total_amount(),
            rental_days: state.rental_days_default(),
        }
    }
}

impl From<CartSnapshot> for CartState {
    fn from(snapshot: CartSnapshot) -> Self {
        let state = CartState::with_items(snapshot.items, snapshot.rental_days);

        if state.total_amount() != snapshot.total_amount {
            debug!(
                stored = %snapshot.total_amount,
                derived = %state.total_amount(),
                "stored cart total differs from lines; using derived total"
            );
        }

        state
    }
}

impl CartSnapshot {
    /// Whether the snapshot carries any lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Read the snapshot stored at `key`.
///
/// # Errors
///
/// Returns an error if storage fails or the document cannot be parsed.
pub fn load_snapshot(
    storage: &dyn CartStorage,
    key: &str,
) -> Result<Option<CartSnapshot>, PersistenceError> {
    storage
        .get(key)?
        .map(|document| serde_json::from_str(&document))
        .transpose()
        .map_err(PersistenceError::from)
}

/// Write `state` as a snapshot at `key`.
///
/// # Errors
///
/// Returns an error if the state cannot be serialized or storage fails.
pub fn save_snapshot(
    storage: &dyn CartStorage,
    key: &str,
    state: &CartState,
) -> Result<(), PersistenceError> {
    save_raw_snapshot(storage, key, &CartSnapshot::from(state))
}

/// Write an already-built snapshot at `key`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be serialized or storage fails.
pub fn save_raw_snapshot(
    storage: &dyn CartStorage,
    key: &str,
    snapshot: &CartSnapshot,
) -> Result<(), PersistenceError> {
    let document = serde_json::to_string(snapshot)?;

    storage.set(key, &document)?;

    Ok(())
}
