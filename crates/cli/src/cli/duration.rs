use campus_cart::products::ProductId;
use clap::Args;

use crate::config::SessionConfig;

use super::{render, session};

#[derive(Debug, Args)]
pub(crate) struct ItemDaysArgs {
    /// Product id
    product_id: String,

    /// Rental duration in days
    days: u32,
}

#[derive(Debug, Args)]
pub(crate) struct DurationArgs {
    /// Rental duration in days for every line
    days: u32,
}

pub(super) async fn run_item(config: &SessionConfig, args: ItemDaysArgs) -> Result<(), String> {
    let mut store = session::open(config).await?;

    session::change_cart(&mut store, "update rental days", |store| {
        store.update_item_rental_days(&ProductId::new(args.product_id), args.days)
    })
    .await?;

    render::print_cart(store.state(), config)
}

pub(super) async fn run_cart(config: &SessionConfig, args: DurationArgs) -> Result<(), String> {
    let mut store = session::open(config).await?;

    session::change_cart(&mut store, "update rental days", |store| {
        store.update_rental_days(args.days)
    })
    .await?;

    render::print_cart(store.state(), config)
}
