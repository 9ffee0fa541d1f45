//! Lobby configuration and lifecycle status.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LobbyConfig
// ---------------------------------------------------------------------------

/// What a lobby does when a seat's outbox is full.
///
/// Delivery never waits on a receiver: a full outbox is a slow client,
/// and the lobby keeps serving everyone else.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum SlowReceiverPolicy {
    /// Drop the message for that seat and keep its channel attached.
    #[default]
    Drop,
    /// Drop the message and detach the channel. The client has to
    /// register again to receive anything.
    Detach,
}

/// Settings shared by every lobby a registry creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyConfig {
    /// Capacity of each lobby actor's command queue. Callers wait when
    /// it is full.
    pub command_buffer: usize,

    /// Capacity of the outboxes created by
    /// [`LobbyRegistry::connect`](crate::LobbyRegistry::connect).
    pub outbox_capacity: usize,

    /// Behaviour when a seat's outbox is full.
    pub slow_receiver: SlowReceiverPolicy,

    /// Seed for every game's random source. `None` seeds from the OS;
    /// `Some` makes role and card draws replayable.
    pub seed: Option<u64>,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            command_buffer: 64,
            outbox_capacity: 32,
            slow_receiver: SlowReceiverPolicy::Drop,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// LobbyStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a lobby.
///
/// ```text
/// Open ──(start)──→ Started
/// ```
///
/// The transition is one-way: a started lobby keeps its game until the
/// registry closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LobbyStatus {
    /// Accepting joins; no game yet.
    Open,
    /// A game is running or finished.
    Started,
}

impl LobbyStatus {
    /// Returns `true` if the lobby is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for LobbyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Started => write!(f, "Started"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_status_is_joinable() {
        assert!(LobbyStatus::Open.is_joinable());
        assert!(!LobbyStatus::Started.is_joinable());
    }

    #[test]
    fn test_lobby_status_display() {
        assert_eq!(LobbyStatus::Open.to_string(), "Open");
        assert_eq!(LobbyStatus::Started.to_string(), "Started");
    }

    #[test]
    fn test_lobby_config_default() {
        let config = LobbyConfig::default();
        assert_eq!(config.command_buffer, 64);
        assert_eq!(config.outbox_capacity, 32);
        assert_eq!(config.slow_receiver, SlowReceiverPolicy::Drop);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_lobby_config_from_json() {
        let raw = r#"{
            "command_buffer": 8,
            "outbox_capacity": 4,
            "slow_receiver": "Detach",
            "seed": 42
        }"#;
        let config: LobbyConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.slow_receiver, SlowReceiverPolicy::Detach);
        assert_eq!(config.seed, Some(42));
    }
}
