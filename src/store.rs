//! Cart store.
//!
//! Owns the in-memory [`CartState`] for one identity at a time, hydrates it
//! from local storage or the remote cart when the identity changes, and
//! mirrors every change once hydration has completed.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{
    cart::{CartAction, CartError, CartState, CheckoutItem},
    hydration::{HydrationEvent, HydrationPhase},
    identity::{ANONYMOUS_CART_KEY, Identity, UserId, user_cart_key},
    items::{CartLineItem, default_rental_days, merge_line_items},
    products::{ProductId, ProductSummary},
    remote::{RemoteCart, RemoteError, RemoteLine, remote_items},
    snapshot::{CartSnapshot, load_snapshot, save_raw_snapshot, save_snapshot},
    storage::CartStorage,
    sync::SyncWorker,
};

/// What happens to the anonymous cart when an anonymous session logs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MigrationPolicy {
    /// Copy the anonymous cart to the user's key when the user has no
    /// local cart of their own.
    #[default]
    Adopt,

    /// Merge the anonymous cart into the user's local cart, or into the
    /// remote cart when there is no local one.
    Merge,

    /// Leave the anonymous cart behind.
    Ignore,
}

/// Where a hydrated cart came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    /// The local snapshot for the identity.
    Local,

    /// The remote cart, mirrored into local storage.
    Remote,

    /// Nothing to load.
    Empty,
}

/// Cart store for the current identity.
pub struct CartStore {
    state: CartState,
    identity: Identity,
    last_resolved: Option<Identity>,
    phase: HydrationPhase,
    storage: Arc<dyn CartStorage>,
    remote: Arc<dyn RemoteCart>,
    sync: SyncWorker,
    migration: MigrationPolicy,
}

impl Debug for CartStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("identity", &self.identity)
            .field("phase", &self.phase)
            .field("sync", &self.sync)
            .field("migration", &self.migration)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store awaiting its first identity.
    pub fn new(storage: Arc<dyn CartStorage>, remote: Arc<dyn RemoteCart>) -> Self {
        Self {
            state: CartState::default(),
            identity: Identity::Pending,
            last_resolved: None,
            phase: HydrationPhase::default(),
            storage,
            sync: SyncWorker::new(Arc::clone(&remote)),
            remote,
            migration: MigrationPolicy::default(),
        }
    }

    /// Use `policy` when an anonymous session logs in.
    #[must_use]
    pub fn with_migration_policy(mut self, policy: MigrationPolicy) -> Self {
        self.migration = policy;
        self
    }

    /// Current cart contents.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Identity the cart is loaded for.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Hydration phase.
    pub fn phase(&self) -> HydrationPhase {
        self.phase
    }

    /// Local storage key for the current identity.
    pub fn storage_key(&self) -> Option<String> {
        self.identity.storage_key()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Cart total.
    pub fn total_amount(&self) -> Decimal {
        self.state.total_amount()
    }

    /// Lines projected for order submission.
    pub fn checkout_items(&self) -> Vec<CheckoutItem> {
        self.state.checkout_items()
    }

    /// React to an authentication change.
    ///
    /// A pending identity suspends hydration and leaves any push in flight
    /// running. A resolved identity waits for that push, then re-runs
    /// hydration for its storage key, after deleting the user's snapshot on
    /// logout or migrating the anonymous cart on login.
    ///
    /// Returns `None` while the identity is pending or unchanged.
    pub async fn set_identity(&mut self, identity: Identity) -> Option<HydrationSource> {
        if identity == self.identity && self.phase.persists() {
            return None;
        }

        self.identity = identity;

        if self.identity.is_pending() {
            self.phase = self.phase.transition(HydrationEvent::AuthPending);

            debug!("authentication pending; cart hydration suspended");

            return None;
        }

        // The previous identity's last push lands before its key is switched
        // or discarded.
        self.sync.settle().await;

        let previous = self.last_resolved.replace(self.identity.clone());

        if let Some(Identity::Authenticated {
            user_id: Some(user_id),
        }) = &previous
            && !self.identity.is_authenticated()
        {
            self.discard_user_cart(user_id);
        }

        if previous == Some(Identity::Anonymous)
            && let Some(user_id) = self.identity.user_id().cloned()
        {
            self.migrate_anonymous_cart(&user_id).await;
        }

        self.hydrate().await
    }

    /// Load the cart for the current identity.
    ///
    /// Prefers a non-empty local snapshot (pushing it to the remote when
    /// authenticated), then the remote cart when authenticated, else empty.
    /// Read failures are logged and treated as "nothing stored".
    pub async fn hydrate(&mut self) -> Option<HydrationSource> {
        let Some(key) = self.identity.storage_key() else {
            self.phase = self.phase.transition(HydrationEvent::AuthPending);

            return None;
        };

        self.phase = self.phase.transition(HydrationEvent::IdentityResolved);

        let local = match load_snapshot(self.storage.as_ref(), &key) {
            Ok(snapshot) => snapshot.filter(|snapshot| !snapshot.is_empty()),
            Err(error) => {
                warn!(%key, "failed to read cart snapshot: {error}");

                None
            }
        };

        let source = match local {
            Some(snapshot) => {
                self.state = CartState::from(snapshot);

                if self.identity.is_authenticated() {
                    self.sync.push(remote_items(self.state.items()));
                }

                HydrationSource::Local
            }
            None if self.identity.is_authenticated() => self.hydrate_from_remote(&key).await,
            None => {
                self.state = CartState::default();

                HydrationSource::Empty
            }
        };

        self.phase = self.phase.transition(HydrationEvent::Hydrated);

        info!(
            %key,
            ?source,
            lines = self.state.items().len(),
            "cart hydrated"
        );

        Some(source)
    }

    /// Add units of a product for a rental duration.
    ///
    /// # Errors
    ///
    /// - [`CartError::InsufficientStock`]: the line would exceed available stock.
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::InvalidRentalDays`]: `rental_days` is zero.
    pub fn add_item(
        &mut self,
        product: ProductSummary,
        quantity: u32,
        rental_days: u32,
    ) -> Result<(), CartError> {
        self.dispatch(CartAction::AddItem {
            product,
            quantity,
            rental_days,
        })
    }

    /// Remove every line for a product. Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Removal itself never fails; the signature matches the other mutations.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<(), CartError> {
        self.dispatch(CartAction::RemoveItem {
            product_id: product_id.clone(),
        })
    }

    /// Set the quantity of a product's lines; zero removes them.
    ///
    /// # Errors
    ///
    /// - [`CartError::InsufficientStock`]: `quantity` exceeds available stock.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        self.dispatch(CartAction::UpdateQuantity {
            product_id: product_id.clone(),
            quantity,
        })
    }

    /// Set the rental duration of a product's lines.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidRentalDays`]: `rental_days` is zero.
    /// - [`CartError::InsufficientStock`]: lines collapsing onto the same
    ///   duration would exceed available stock.
    pub fn update_item_rental_days(
        &mut self,
        product_id: &ProductId,
        rental_days: u32,
    ) -> Result<(), CartError> {
        self.dispatch(CartAction::UpdateItemRentalDays {
            product_id: product_id.clone(),
            rental_days,
        })
    }

    /// Set the rental duration of every line and the cart default.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidRentalDays`]: `rental_days` is zero.
    /// - [`CartError::InsufficientStock`]: lines collapsing onto the same
    ///   duration would exceed available stock.
    pub fn update_rental_days(&mut self, rental_days: u32) -> Result<(), CartError> {
        self.dispatch(CartAction::UpdateRentalDays { rental_days })
    }

    /// Empty the cart locally and, when authenticated, on the remote.
    ///
    /// The remote clear is awaited, superseding any push in flight. A
    /// failure is logged; the local cart stays empty either way.
    pub async fn clear_cart(&mut self) {
        self.commit(CartState::default());

        if !self.identity.is_authenticated() {
            return;
        }

        match self.sync.push_now(Vec::new()).await {
            Ok(()) => info!("cleared remote cart"),
            Err(error) => warn!("failed to clear remote cart: {error}"),
        }
    }

    /// Wait for the remote push in flight, if any.
    pub async fn settle(&mut self) {
        self.sync.settle().await;
    }

    fn dispatch(&mut self, action: CartAction) -> Result<(), CartError> {
        let next = self
            .state
            .apply(action)
            .inspect_err(|error| info!("cart change rejected: {error}"))?;

        self.commit(next);

        Ok(())
    }

    /// Replace the state and mirror it. Empty carts are never pushed here:
    /// only [`CartStore::clear_cart`] empties the remote.
    fn commit(&mut self, next: CartState) {
        self.state = next;

        if !self.phase.persists() {
            debug!(phase = ?self.phase, "cart not hydrated; change kept in memory only");

            return;
        }

        if let Some(key) = self.identity.storage_key()
            && let Err(error) = save_snapshot(self.storage.as_ref(), &key, &self.state)
        {
            warn!(%key, "failed to persist cart: {error}");
        }

        if self.identity.is_authenticated() && !self.state.is_empty() {
            self.sync.push(remote_items(self.state.items()));
        }
    }

    async fn hydrate_from_remote(&mut self, key: &str) -> HydrationSource {
        let items = match self.fetch_remote_items().await {
            Ok(items) => items,
            Err(error) => {
                warn!("failed to fetch remote cart: {error}");

                Vec::new()
            }
        };

        if items.is_empty() {
            self.state = CartState::default();

            return HydrationSource::Empty;
        }

        self.state = CartState::with_items(items, default_rental_days());

        if let Err(error) = save_snapshot(self.storage.as_ref(), key, &self.state) {
            warn!(%key, "failed to mirror remote cart locally: {error}");
        }

        HydrationSource::Remote
    }

    async fn fetch_remote_items(&self) -> Result<Vec<CartLineItem>, RemoteError> {
        let lines = self.remote.fetch_cart().await?;

        Ok(lines
            .into_iter()
            .filter_map(RemoteLine::into_line_item)
            .collect())
    }

    fn discard_user_cart(&mut self, user_id: &UserId) {
        let key = user_cart_key(user_id);

        if let Err(error) = self.storage.remove(&key) {
            warn!(%key, "failed to remove user cart on logout: {error}");
        }

        self.state = CartState::default();

        info!(%user_id, "discarded user cart on logout");
    }

    async fn migrate_anonymous_cart(&mut self, user_id: &UserId) {
        if self.migration == MigrationPolicy::Ignore {
            return;
        }

        let anonymous = match load_snapshot(self.storage.as_ref(), ANONYMOUS_CART_KEY) {
            Ok(Some(snapshot)) if !snapshot.is_empty() => snapshot,
            Ok(_) => return,
            Err(error) => {
                warn!("failed to read anonymous cart for migration: {error}");

                return;
            }
        };

        let key = user_cart_key(user_id);

        let existing = match load_snapshot(self.storage.as_ref(), &key) {
            Ok(snapshot) => snapshot.filter(|snapshot| !snapshot.is_empty()),
            Err(error) => {
                warn!(%key, "failed to read user cart for migration: {error}");

                None
            }
        };

        let migrated = match (self.migration, existing) {
            (MigrationPolicy::Adopt, None) => anonymous,
            (MigrationPolicy::Merge, existing) => {
                let base = match existing {
                    Some(snapshot) => snapshot.items,
                    None => self.fetch_remote_items().await.unwrap_or_else(|error| {
                        warn!("failed to fetch remote cart for merge: {error}");

                        Vec::new()
                    }),
                };

                let merged = CartState::with_items(
                    merge_line_items(base, anonymous.items),
                    anonymous.rental_days,
                );

                CartSnapshot::from(&merged)
            }
            (MigrationPolicy::Adopt, Some(_)) | (MigrationPolicy::Ignore, _) => return,
        };

        if let Err(error) = save_raw_snapshot(self.storage.as_ref(), &key, &migrated) {
            warn!(%key, "failed to migrate anonymous cart: {error}");

            return;
        }

        info!(
            %user_id,
            policy = ?self.migration,
            lines = migrated.items.len(),
            "migrated anonymous cart"
        );
    }
}
