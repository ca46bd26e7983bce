use campus_cart::identity::Identity;
use clap::Args;
use tracing::info;

use crate::config::SessionConfig;

use super::{render, session};

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// User id to sign in as; defaults to `--user-id`
    user: Option<String>,
}

pub(super) async fn run(config: &SessionConfig, args: LoginArgs) -> Result<(), String> {
    let Some(user_id) = args.user.or_else(|| config.user_id.clone()) else {
        return Err("login requires a user id".to_string());
    };

    let mut store = session::open_as(config, Identity::Anonymous).await?;
    let source = store.set_identity(Identity::user(user_id.clone())).await;

    store.settle().await;

    info!(%user_id, ?source, "signed in");

    render::print_cart(store.state(), config)
}
