//! Shared fixtures for store integration tests.

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use campus_cart::{
    cart::CartState,
    items::CartLineItem,
    products::ProductSummary,
    remote::{MockRemoteCart, RemoteCartItem, RemoteError, RemoteLine},
    snapshot::save_snapshot,
    storage::{CartStorage, MemoryStorage},
    store::CartStore,
};

/// Pushes received by a mock remote, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct PushLog(Arc<Mutex<Vec<Vec<RemoteCartItem>>>>);

impl PushLog {
    fn record(&self, items: Vec<RemoteCartItem>) {
        if let Ok(mut pushes) = self.0.lock() {
            pushes.push(items);
        }
    }

    pub fn pushes(&self) -> Vec<Vec<RemoteCartItem>> {
        self.0.lock().map(|pushes| pushes.clone()).unwrap_or_default()
    }

    pub fn empty_pushes(&self) -> usize {
        self.pushes().iter().filter(|items| items.is_empty()).count()
    }
}

/// How the mock remote answers `fetch_cart`.
#[derive(Debug, Clone)]
pub enum Fetch {
    Lines(Vec<RemoteLine>),
    Fail,
    Never,
}

pub fn remote(fetch: Fetch) -> (MockRemoteCart, PushLog) {
    let log = PushLog::default();
    let recorder = log.clone();
    let mut remote = MockRemoteCart::new();

    match fetch {
        Fetch::Lines(lines) => {
            remote
                .expect_fetch_cart()
                .returning(move || Ok(lines.clone()));
        }
        Fetch::Fail => {
            remote
                .expect_fetch_cart()
                .returning(|| Err(RemoteError::UnexpectedResponse("500".to_string())));
        }
        Fetch::Never => {
            remote.expect_fetch_cart().never();
        }
    }

    remote.expect_push_cart().returning(move |items| {
        recorder.record(items);

        Ok(())
    });

    (remote, log)
}

pub fn store(storage: &Arc<MemoryStorage>, remote: MockRemoteCart) -> CartStore {
    CartStore::new(Arc::clone(storage) as Arc<dyn CartStorage>, Arc::new(remote))
}

pub fn bike() -> ProductSummary {
    ProductSummary::new("bike", "Bike", Decimal::from(20), 5)
}

pub fn lamp() -> ProductSummary {
    ProductSummary::new("lamp", "Desk lamp", Decimal::new(450, 2), 3)
}

pub fn remote_line(product: ProductSummary, quantity: u32, rental_days: u32) -> RemoteLine {
    RemoteLine {
        product: Some(product),
        quantity,
        rental_days,
    }
}

pub fn pushed(product: &ProductSummary, quantity: u32, rental_days: u32) -> RemoteCartItem {
    RemoteCartItem {
        product: product.id.clone(),
        quantity,
        rental_days,
    }
}

/// Seed `key` with a snapshot holding `items`.
pub fn seed(
    storage: &MemoryStorage,
    key: &str,
    items: Vec<CartLineItem>,
) -> Result<(), Box<dyn std::error::Error>> {
    save_snapshot(storage, key, &CartState::with_items(items, 1))?;

    Ok(())
}

/// Items stored under `key`, if any.
pub fn stored_items(
    storage: &MemoryStorage,
    key: &str,
) -> Result<Option<Vec<CartLineItem>>, Box<dyn std::error::Error>> {
    let snapshot = campus_cart::snapshot::load_snapshot(storage, key)?;

    Ok(snapshot.map(|snapshot| snapshot.items))
}
