//! Campus Cart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartAction, CartError, CartState, CheckoutItem},
    hydration::{HydrationEvent, HydrationPhase},
    identity::{Identity, UserId},
    items::{CartLineItem, LineKey, merge_line_items},
    observer::observe_identity,
    pricing::{PricingError, currency, to_money, total_amount},
    products::{ProductId, ProductSummary},
    remote::{HttpRemoteCart, RemoteCart, RemoteCartItem, RemoteConfig, RemoteError, RemoteLine},
    snapshot::{CartSnapshot, PersistenceError},
    storage::{CartStorage, FileStorage, MemoryStorage, StorageError},
    store::{CartStore, HydrationSource, MigrationPolicy},
    sync::{SyncToken, SyncWorker},
};
