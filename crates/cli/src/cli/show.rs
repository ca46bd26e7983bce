use crate::config::SessionConfig;

use super::{render, session};

pub(super) async fn run(config: &SessionConfig) -> Result<(), String> {
    let mut store = session::open(config).await?;

    store.settle().await;

    render::print_cart(store.state(), config)
}
