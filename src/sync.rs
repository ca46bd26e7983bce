//! Tracking of in-flight remote pushes.
//!
//! At most one push is in flight. Scheduling a newer push aborts the older
//! one, so a superseded payload never lands after its replacement from this
//! process. Two processes (or tabs) writing the same remote cart are still
//! last-writer-wins.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, warn};

use crate::remote::{RemoteCart, RemoteCartItem, RemoteError};

/// Identifies a scheduled push. Tokens increase monotonically per worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyncToken(u64);

impl SyncToken {
    /// Raw sequence number.
    pub fn sequence(self) -> u64 {
        self.0
    }
}

struct InFlight {
    token: SyncToken,
    handle: JoinHandle<()>,
}

/// Best-effort pusher for the remote cart.
pub struct SyncWorker {
    remote: Arc<dyn RemoteCart>,
    issued: u64,
    in_flight: Option<InFlight>,
}

impl Debug for SyncWorker {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SyncWorker")
            .field("issued", &self.issued)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl SyncWorker {
    /// Create a worker pushing to `remote`.
    pub fn new(remote: Arc<dyn RemoteCart>) -> Self {
        Self {
            remote,
            issued: 0,
            in_flight: None,
        }
    }

    /// Token of the push currently in flight, if any.
    pub fn in_flight(&self) -> Option<SyncToken> {
        self.in_flight
            .as_ref()
            .filter(|in_flight| !in_flight.handle.is_finished())
            .map(|in_flight| in_flight.token)
    }

    /// Schedule a fire-and-forget push, superseding any push in flight.
    ///
    /// Failures are logged and otherwise ignored. Without a Tokio runtime
    /// the push is skipped and `None` is returned.
    pub fn push(&mut self, items: Vec<RemoteCartItem>) -> Option<SyncToken> {
        self.cancel();

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(error) => {
                warn!(lines = items.len(), "skipping cart sync: {error}");

                return None;
            }
        };

        let token = self.issue();
        let remote = Arc::clone(&self.remote);

        debug!(token = token.0, lines = items.len(), "scheduling cart sync");

        let handle = runtime.spawn(async move {
            if let Err(error) = remote.push_cart(items).await {
                warn!(token = token.0, "best-effort cart sync failed: {error}");
            }
        });

        self.in_flight = Some(InFlight { token, handle });

        Some(token)
    }

    /// Push inline, superseding any push in flight.
    ///
    /// # Errors
    ///
    /// Returns the remote error so the caller can decide how to report it.
    pub async fn push_now(&mut self, items: Vec<RemoteCartItem>) -> Result<(), RemoteError> {
        self.cancel();

        let token = self.issue();

        debug!(token = token.0, lines = items.len(), "pushing cart");

        self.remote.push_cart(items).await
    }

    /// Abort the push in flight, returning its token if it was still running.
    pub fn cancel(&mut self) -> Option<SyncToken> {
        let in_flight = self.in_flight.take()?;

        if in_flight.handle.is_finished() {
            return None;
        }

        in_flight.handle.abort();

        debug!(token = in_flight.token.0, "discarded superseded cart sync");

        Some(in_flight.token)
    }

    /// Wait for the push in flight to finish.
    pub async fn settle(&mut self) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };

        if let Err(error) = in_flight.handle.await
            && !error.is_cancelled()
        {
            warn!(token = in_flight.token.0, "cart sync task failed: {error}");
        }
    }

    fn issue(&mut self) -> SyncToken {
        self.issued += 1;

        SyncToken(self.issued)
    }
}
