use std::io::{self, Write};

use clap::{Parser, Subcommand};

use crate::config::{LoggingConfig, SessionConfig};

mod add;
mod checkout;
mod clear;
mod duration;
mod login;
mod logout;
mod quantity;
mod remove;
mod render;
mod session;
mod show;

#[derive(Debug, Parser)]
#[command(
    name = "campus-cart",
    about = "Campus rental cart",
    long_about = None
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) session: SessionConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the cart
    Show,

    /// Add a product to the cart
    Add(add::AddArgs),

    /// Remove every line for a product
    Remove(remove::RemoveArgs),

    /// Set a product's quantity; zero removes it
    Quantity(quantity::QuantityArgs),

    /// Set a product's rental duration
    Days(duration::ItemDaysArgs),

    /// Set the rental duration of the whole cart
    Duration(duration::DurationArgs),

    /// Empty the cart
    Clear,

    /// Print the checkout payload as JSON
    Checkout,

    /// Sign in, carrying the anonymous cart over
    Login(login::LoginArgs),

    /// Sign out, discarding the user's local cart
    Logout,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let session = self.session;

        match self.command {
            Commands::Show => show::run(&session).await,
            Commands::Add(args) => add::run(&session, args).await,
            Commands::Remove(args) => remove::run(&session, args).await,
            Commands::Quantity(args) => quantity::run(&session, args).await,
            Commands::Days(args) => duration::run_item(&session, args).await,
            Commands::Duration(args) => duration::run_cart(&session, args).await,
            Commands::Clear => clear::run(&session).await,
            Commands::Checkout => checkout::run(&session).await,
            Commands::Login(args) => login::run(&session, args).await,
            Commands::Logout => logout::run(&session).await,
        }
    }
}

fn write_stdout(
    render: impl FnOnce(&mut io::StdoutLock<'static>) -> io::Result<()>,
) -> Result<(), String> {
    let mut out = io::stdout().lock();

    render(&mut out)
        .and_then(|()| out.flush())
        .map_err(|error| format!("failed to write output: {error}"))
}
