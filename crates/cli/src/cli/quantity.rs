use campus_cart::products::ProductId;
use clap::Args;

use crate::config::SessionConfig;

use super::{render, session};

#[derive(Debug, Args)]
pub(crate) struct QuantityArgs {
    /// Product id
    pub(crate) product_id: String,

    /// New quantity; zero removes the product
    pub(crate) quantity: u32,
}

pub(super) async fn run(config: &SessionConfig, args: QuantityArgs) -> Result<(), String> {
    let mut store = session::open(config).await?;

    session::change_cart(&mut store, "update quantity", |store| {
        store.update_quantity(&ProductId::new(args.product_id), args.quantity)
    })
    .await?;

    render::print_cart(store.state(), config)
}
