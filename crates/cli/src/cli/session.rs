use std::sync::Arc;

use campus_cart::{
    cart::CartError,
    identity::Identity,
    remote::{HttpRemoteCart, RemoteConfig},
    storage::FileStorage,
    store::CartStore,
};
use tracing::debug;

use crate::config::SessionConfig;

/// Build a store for `config` and hydrate it for `identity`.
pub(super) async fn open_as(
    config: &SessionConfig,
    identity: Identity,
) -> Result<CartStore, String> {
    let storage = FileStorage::open(&config.storage_dir).map_err(|error| {
        format!(
            "failed to open cart storage at {}: {error}",
            config.storage_dir.display()
        )
    })?;

    let remote = HttpRemoteCart::new(RemoteConfig {
        base_url: config.api_url.clone(),
        session_cookie: config.session_cookie.clone(),
        timeout: config.timeout(),
    })
    .map_err(|error| format!("failed to create cart client: {error}"))?;

    let mut store = CartStore::new(Arc::new(storage), Arc::new(remote))
        .with_migration_policy(config.migration.into());

    let source = store.set_identity(identity).await;

    debug!(?source, key = ?store.storage_key(), "cart session opened");

    Ok(store)
}

/// Build a store for the identity implied by `config`.
pub(super) async fn open(config: &SessionConfig) -> Result<CartStore, String> {
    open_as(config, config.identity()).await
}

/// Apply `change`, wait for any push it (or hydration) scheduled, then
/// report the outcome.
pub(super) async fn change_cart(
    store: &mut CartStore,
    action: &str,
    change: impl FnOnce(&mut CartStore) -> Result<(), CartError>,
) -> Result<(), String> {
    let result = change(store);

    store.settle().await;

    result.map_err(|error| format!("failed to {action}: {error}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use campus_cart::{
        cart::CartState,
        items::CartLineItem,
        products::{ProductId, ProductSummary},
        remote::MockRemoteCart,
        snapshot::save_snapshot,
        storage::MemoryStorage,
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn rejected_change_still_delivers_hydration_push() -> TestResult {
        let storage = MemoryStorage::new();
        let bike = ProductSummary::new("bike", "Bike", Decimal::from(20), 2);

        save_snapshot(
            &storage,
            "cart_u1",
            &CartState::with_items(vec![CartLineItem::new(bike, 1, 1)], 1),
        )?;

        let pushes = Arc::new(Mutex::new(0_usize));
        let recorder = Arc::clone(&pushes);
        let mut remote = MockRemoteCart::new();

        remote.expect_fetch_cart().never();
        remote.expect_push_cart().returning(move |_| {
            if let Ok(mut pushes) = recorder.lock() {
                *pushes += 1;
            }

            Ok(())
        });

        let mut store = CartStore::new(Arc::new(storage), Arc::new(remote));

        store.set_identity(Identity::user("u1")).await;

        let result = change_cart(&mut store, "update quantity", |store| {
            store.update_quantity(&ProductId::new("bike"), 9)
        })
        .await;

        assert!(
            result.is_err_and(|error| error.starts_with("failed to update quantity")),
            "expected a rejected quantity update"
        );
        assert_eq!(pushes.lock().map(|pushes| *pushes).ok(), Some(1));

        Ok(())
    }
}
