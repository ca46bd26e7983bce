use std::io;

use campus_cart::{cart::CartState, pricing};
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::config::SessionConfig;

use super::write_stdout;

const HEADER: [&str; 6] = ["#", "Product", "Per day", "Qty", "Days", "Line total"];

/// Print the cart in the configured currency.
pub(super) fn print_cart(state: &CartState, config: &SessionConfig) -> Result<(), String> {
    let currency = pricing::currency(&config.currency).map_err(|error| error.to_string())?;

    write_stdout(|out| write_cart(out, state, currency))
}

/// Write the cart as a table followed by a summary.
pub(super) fn write_cart(
    out: &mut impl io::Write,
    state: &CartState,
    currency: &'static Currency,
) -> io::Result<()> {
    if state.is_empty() {
        return writeln!(out, "Cart is empty");
    }

    let mut builder = Builder::default();

    builder.push_record(HEADER);

    for (idx, item) in state.items().iter().enumerate() {
        let name = if item.product.name.is_empty() {
            item.product.id.to_string()
        } else {
            format!("{} ({})", item.product.name, item.product.id)
        };

        builder.push_record([
            format!("{}", idx + 1),
            name,
            pricing::to_money(item.product.price_per_day, currency).to_string(),
            item.quantity.to_string(),
            item.rental_days.to_string(),
            item.line_total().map_or_else(String::new, |amount| {
                pricing::to_money(amount, currency).to_string()
            }),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..6), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, " Items: {}", state.item_count())?;
    writeln!(out, " Rental days: {}", state.rental_days_default())?;
    writeln!(
        out,
        " Total: {}",
        pricing::to_money(state.total_amount(), currency)
    )
}
