//! CLI configuration

use std::{path::PathBuf, time::Duration};

use campus_cart::{identity::Identity, store::MigrationPolicy};
use clap::{Args, ValueEnum};

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub(crate) log_format: LogFormat,
}

/// Handling of the anonymous cart on login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Migration {
    /// Copy the anonymous cart when the user has none.
    Adopt,

    /// Merge the anonymous cart into the user's cart.
    Merge,

    /// Leave the anonymous cart behind.
    Ignore,
}

impl From<Migration> for MigrationPolicy {
    fn from(value: Migration) -> Self {
        match value {
            Migration::Adopt => Self::Adopt,
            Migration::Merge => Self::Merge,
            Migration::Ignore => Self::Ignore,
        }
    }
}

/// Cart session settings.
#[derive(Debug, Args)]
pub(crate) struct SessionConfig {
    /// Directory holding cart snapshots
    #[arg(
        long,
        env = "CART_STORAGE_DIR",
        default_value = ".campus-cart",
        global = true
    )]
    pub(crate) storage_dir: PathBuf,

    /// Marketplace backend address
    #[arg(
        long,
        env = "CART_API_URL",
        default_value = "http://localhost:5000",
        global = true
    )]
    pub(crate) api_url: String,

    /// Signed-in user id; omit for the anonymous cart
    #[arg(long, env = "CART_USER_ID", global = true)]
    pub(crate) user_id: Option<String>,

    /// Session cookie sent to the backend, e.g. `connect.sid=...`
    #[arg(long, env = "CART_SESSION_COOKIE", hide_env_values = true, global = true)]
    pub(crate) session_cookie: Option<String>,

    /// Backend request timeout in seconds (0 disables the timeout)
    #[arg(
        long,
        env = "CART_REQUEST_TIMEOUT_SECS",
        default_value_t = 10_u64,
        global = true
    )]
    pub(crate) request_timeout_secs: u64,

    /// Anonymous cart handling on login
    #[arg(
        long,
        env = "CART_MIGRATION",
        value_enum,
        default_value_t = Migration::Adopt,
        global = true
    )]
    pub(crate) migration: Migration,

    /// Display currency (ISO 4217 code)
    #[arg(long, env = "CART_CURRENCY", default_value = "INR", global = true)]
    pub(crate) currency: String,
}

impl SessionConfig {
    /// Identity implied by the configured user id.
    pub(crate) fn identity(&self) -> Identity {
        match &self.user_id {
            Some(user_id) => Identity::user(user_id.clone()),
            None => Identity::Anonymous,
        }
    }

    /// Request timeout, if enabled.
    pub(crate) fn timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
