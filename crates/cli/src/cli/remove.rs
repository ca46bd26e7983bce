use campus_cart::products::ProductId;
use clap::Args;

use crate::config::SessionConfig;

use super::{render, session};

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    /// Product id
    product_id: String,
}

pub(super) async fn run(config: &SessionConfig, args: RemoveArgs) -> Result<(), String> {
    let mut store = session::open(config).await?;

    session::change_cart(&mut store, "remove item", |store| {
        store.remove_item(&ProductId::new(args.product_id))
    })
    .await?;

    render::print_cart(store.state(), config)
}
