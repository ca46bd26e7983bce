//! Identity

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Storage key shared by every anonymous session.
pub const ANONYMOUS_CART_KEY: &str = "cart";

/// Prefix of per-user storage keys.
pub const USER_CART_KEY_PREFIX: &str = "cart_";

/// User identifier, as issued by the authentication backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw backend id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Authentication status as seen by the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    /// The authentication check has not finished.
    #[default]
    Pending,

    /// No session.
    Anonymous,

    /// A session exists. The user id may not be resolved yet.
    Authenticated {
        /// Resolved user id
        user_id: Option<UserId>,
    },
}

impl Identity {
    /// Authenticated identity with a known user id.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::Authenticated {
            user_id: Some(UserId::new(user_id)),
        }
    }

    /// Whether remote sync applies to this identity.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Whether the authentication check is still running.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The resolved user id, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Authenticated { user_id } => user_id.as_ref(),
            Self::Pending | Self::Anonymous => None,
        }
    }

    /// Local storage key for this identity; `None` while pending.
    pub fn storage_key(&self) -> Option<String> {
        match self {
            Self::Pending => None,
            Self::Authenticated {
                user_id: Some(user_id),
            } => Some(user_cart_key(user_id)),
            Self::Anonymous | Self::Authenticated { user_id: None } => {
                Some(ANONYMOUS_CART_KEY.to_string())
            }
        }
    }
}

/// Per-user storage key, `cart_<userId>`.
pub fn user_cart_key(user_id: &UserId) -> String {
    format!("{USER_CART_KEY_PREFIX}{user_id}")
}
