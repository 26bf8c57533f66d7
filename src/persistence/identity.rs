//! Identity as seen by the sync engine
//!
//! Authentication itself happens elsewhere. The engine only learns that an
//! opaque identity became available or went away.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Opaque identifier of the signed-in user
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display format for logs (first 8 chars)
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the engine stands with respect to the remote record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityState {
    /// No identity: local cache only
    #[default]
    Anonymous,
    /// Identity known, first remote fetch in flight
    Fetching(Identity),
    /// Remote record fetched (or known absent); remote writes allowed
    Linked(Identity),
    /// Remote fetch failed; local-only for the rest of this identity's session
    Offline(Identity),
}

impl IdentityState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Fetching(id) | Self::Linked(id) | Self::Offline(id) => Some(id),
        }
    }

    /// Identity to write for, if remote writes are currently allowed
    pub fn writable(&self) -> Option<&Identity> {
        match self {
            Self::Linked(id) => Some(id),
            _ => None,
        }
    }
}

/// Sender half of an identity feed, handed to whatever owns authentication
pub type IdentitySender = watch::Sender<Option<Identity>>;

/// Receiver half of an identity feed, handed to the coordinator
pub type IdentityFeed = watch::Receiver<Option<Identity>>;

/// Create an identity feed seeded with the identity known at startup
pub fn identity_channel(initial: Option<Identity>) -> (IdentitySender, IdentityFeed) {
    watch::channel(initial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_is_char_safe() {
        assert_eq!(Identity::new("a3f2c91b4e8d7f01").short(), "a3f2c91b");
        assert_eq!(Identity::new("ñandú").short(), "ñandú");
        assert_eq!(Identity::new("日本語日本語日本語").short(), "日本語日本語日本");
    }

    #[test]
    fn test_only_linked_is_writable() {
        let id = Identity::new("u-1");
        assert_eq!(IdentityState::Anonymous.writable(), None);
        assert_eq!(IdentityState::Fetching(id.clone()).writable(), None);
        assert_eq!(IdentityState::Offline(id.clone()).writable(), None);
        assert_eq!(IdentityState::Linked(id.clone()).writable(), Some(&id));
        assert_eq!(IdentityState::Offline(id.clone()).identity(), Some(&id));
    }
}
