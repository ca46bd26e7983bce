use campus_cart::identity::Identity;
use tracing::info;

use crate::config::SessionConfig;

use super::{render, session};

pub(super) async fn run(config: &SessionConfig) -> Result<(), String> {
    let identity = config.identity();

    if !identity.is_authenticated() {
        return Err("logout requires --user-id".to_string());
    }

    let mut store = session::open(config).await?;

    store.settle().await;
    store.set_identity(Identity::Anonymous).await;

    info!(key = ?store.storage_key(), "signed out");

    render::print_cart(store.state(), config)
}
