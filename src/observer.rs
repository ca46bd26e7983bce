//! Identity observer.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::debug;

use crate::{identity::Identity, store::CartStore};

/// Drive `store` from an authentication status channel.
///
/// Applies the current identity, then every subsequent change, until the
/// sender is dropped. Intermediate values published faster than they are
/// applied are coalesced; only the latest identity is hydrated.
pub async fn observe_identity(
    store: Arc<Mutex<CartStore>>,
    mut identities: watch::Receiver<Identity>,
) {
    loop {
        let identity = identities.borrow_and_update().clone();

        debug!(?identity, "identity changed");

        store.lock().await.set_identity(identity).await;

        if identities.changed().await.is_err() {
            debug!("identity source closed; observer stopping");

            return;
        }
    }
}
