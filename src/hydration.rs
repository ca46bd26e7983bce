//! Hydration phases.
//!
//! The store only mirrors state to storage and the remote once the cart has
//! been hydrated for the current identity. Otherwise an empty initial state
//! could overwrite a snapshot that has not been read yet.

/// Where the store is in loading the cart for the current identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HydrationPhase {
    /// Waiting for the authentication check; no reads or writes.
    #[default]
    Idle,

    /// Loading the cart for a resolved identity.
    Hydrating,

    /// Loaded; mutations are persisted.
    Ready,
}

/// Inputs to [`HydrationPhase::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationEvent {
    /// The authentication check started or restarted.
    AuthPending,

    /// A new identity was resolved.
    IdentityResolved,

    /// Loading finished.
    Hydrated,
}

impl HydrationPhase {
    /// The phase after `event`.
    ///
    /// A `Hydrated` event outside `Hydrating` is stale and leaves the phase
    /// unchanged.
    #[must_use]
    pub fn transition(self, event: HydrationEvent) -> Self {
        match (self, event) {
            (_, HydrationEvent::AuthPending) => Self::Idle,
            (_, HydrationEvent::IdentityResolved) => Self::Hydrating,
            (Self::Hydrating, HydrationEvent::Hydrated) => Self::Ready,
            (phase @ (Self::Idle | Self::Ready), HydrationEvent::Hydrated) => phase,
        }
    }

    /// Whether mutations should be persisted.
    pub fn persists(self) -> bool {
        self == Self::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::{HydrationEvent as Event, HydrationPhase as Phase};

    #[test]
    fn test_transitions() {
        let cases = [
            (Phase::Idle, Event::AuthPending, Phase::Idle),
            (Phase::Idle, Event::IdentityResolved, Phase::Hydrating),
            (Phase::Idle, Event::Hydrated, Phase::Idle),
            (Phase::Hydrating, Event::Hydrated, Phase::Ready),
            (Phase::Hydrating, Event::AuthPending, Phase::Idle),
            (Phase::Hydrating, Event::IdentityResolved, Phase::Hydrating),
            (Phase::Ready, Event::IdentityResolved, Phase::Hydrating),
            (Phase::Ready, Event::AuthPending, Phase::Idle),
            (Phase::Ready, Event::Hydrated, Phase::Ready),
        ];

        for (from, event, to) in cases {
            assert_eq!(from.transition(event), to, "{from:?} --{event:?}--> {to:?}");
        }
    }

    #[test]
    fn only_ready_persists() {
        assert!(!Phase::Idle.persists());
        assert!(!Phase::Hydrating.persists());
        assert!(Phase::Ready.persists());
    }
}
