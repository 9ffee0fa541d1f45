//! Roster entries for seated players.

use rand::Rng;
use tokio::time::Instant;
use traitor_game::Seat;
use traitor_protocol::LobbyId;

use crate::PlayerSender;

/// One seated player. Owned by the lobby actor.
#[derive(Debug)]
pub(crate) struct Player {
    seat: Seat,
    name: String,
    token: String,
    last_seen: Instant,
    sender: Option<PlayerSender>,
}

impl Player {
    pub(crate) fn new(seat: Seat, name: String) -> Self {
        Self {
            seat,
            name,
            token: generate_token(),
            last_seen: Instant::now(),
            sender: None,
        }
    }

    pub(crate) fn seat(&self) -> Seat {
        self.seat
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    pub(crate) fn last_seen(&self) -> Instant {
        self.last_seen
    }

    pub(crate) fn sender(&self) -> Option<&PlayerSender> {
        self.sender.as_ref()
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.sender.is_some()
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }

    /// Marks the player as active now.
    pub(crate) fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Attaches an outbox, replacing any previous one.
    pub(crate) fn attach(&mut self, sender: PlayerSender) {
        self.sender = Some(sender);
    }

    /// Detaches the outbox. Returns `true` if one was attached.
    pub(crate) fn detach(&mut self) -> bool {
        self.sender.take().is_some()
    }
}

/// Where a player ended up after creating or joining a lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seating {
    pub lobby_id: LobbyId,
    pub seat: Seat,
    /// Opaque per-player secret. The lobby hands it out once; a
    /// transport can use it to tie a reconnecting client to its seat.
    pub token: String,
}

/// Generates a random 128-bit token as a 32-character hex string.
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_is_hex() {
        let token = generate_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(generate_token(), generate_token());
    }

    #[tokio::test]
    async fn test_attach_and_detach() {
        let mut player = Player::new(Seat(0), "ann".into());
        assert!(!player.is_connected());
        let (tx, _rx) = crate::outbox(1);
        player.attach(tx);
        assert!(player.is_connected());
        assert!(player.detach());
        assert!(!player.detach());
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_advances_last_seen() {
        let mut player = Player::new(Seat(1), "bo".into());
        let before = player.last_seen();
        tokio::time::advance(std::time::Duration::from_secs(5)).await;
        player.touch();
        assert!(player.last_seen() > before);
    }
}
