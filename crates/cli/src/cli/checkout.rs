use std::io::Write;

use crate::config::SessionConfig;

use super::{session, write_stdout};

pub(super) async fn run(config: &SessionConfig) -> Result<(), String> {
    let mut store = session::open(config).await?;

    store.settle().await;

    if store.is_empty() {
        return Err("cart is empty".to_string());
    }

    let payload = serde_json::to_string_pretty(&store.checkout_items())
        .map_err(|error| format!("failed to encode checkout items: {error}"))?;

    write_stdout(|out| writeln!(out, "{payload}"))
}
