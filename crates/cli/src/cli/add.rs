use campus_cart::products::ProductSummary;
use clap::Args;
use rust_decimal::Decimal;

use crate::config::SessionConfig;

use super::{render, session};

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product id
    product_id: String,

    /// Product display name
    #[arg(long, default_value = "")]
    name: String,

    /// Price per rental day
    #[arg(long)]
    price: Decimal,

    /// Units available to rent
    #[arg(long)]
    stock: u32,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Rental duration in days; defaults to the cart's duration
    #[arg(long)]
    days: Option<u32>,
}

pub(super) async fn run(config: &SessionConfig, args: AddArgs) -> Result<(), String> {
    if args.price.is_sign_negative() {
        return Err("price cannot be negative".to_string());
    }

    let mut store = session::open(config).await?;
    let rental_days = args
        .days
        .unwrap_or_else(|| store.state().rental_days_default());

    session::change_cart(&mut store, "add item", |store| {
        store.add_item(
            ProductSummary::new(args.product_id, args.name, args.price, args.stock),
            args.quantity,
            rental_days,
        )
    })
    .await?;

    render::print_cart(store.state(), config)
}
