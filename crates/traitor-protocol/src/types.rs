//! Protocol types: everything a lobby sends to players, and everything a
//! player can ask of a lobby.
//!
//! These are the structures a transport serializes and pushes to clients.
//! Every message is one of five fixed kinds, and each kind carries either
//! its success payload or a [`MessageError`], never both.

use std::fmt;

use serde::{Deserialize, Serialize};
use traitor_game::{Cards, GameError, Phase, Role, Seat};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique, random identifier for a lobby.
///
/// Newtype over `u64` so it can't be mixed up with a seat or a count.
/// `#[serde(transparent)]` puts it on the wire as a plain number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LobbyId(pub u64);

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Errors carried inside messages
// ---------------------------------------------------------------------------

/// The broad class of a failure, shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Bad input: player count, duplicate name, full lobby, empty hand.
    Validation,
    /// Action attempted in the wrong phase, including after a win.
    Phase,
    /// Play attempted by a seat that doesn't hold the turn.
    Turn,
    /// Unknown lobby or unseated seat.
    Lookup,
    /// A message could not be handed to a seat's channel.
    Delivery,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Phase => write!(f, "phase"),
            Self::Turn => write!(f, "turn"),
            Self::Lookup => write!(f, "lookup"),
            Self::Delivery => write!(f, "delivery"),
        }
    }
}

impl From<&GameError> for ErrorKind {
    fn from(err: &GameError) -> Self {
        match err {
            GameError::InvalidPlayerCount(_) | GameError::EmptyHand(_) => {
                Self::Validation
            }
            GameError::WrongPhase { .. } | GameError::GameOver(_) => {
                Self::Phase
            }
            GameError::WrongTurn { .. } => Self::Turn,
            GameError::UnknownSeat(_) => Self::Lookup,
        }
    }
}

/// A failure attached to a message instead of its payload.
///
/// The typed errors stay on the server; clients get the kind
/// (for branching) and the rendered reason (for display).
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error,
)]
#[error("{kind} error: {reason}")]
pub struct MessageError {
    pub kind: ErrorKind,
    pub reason: String,
}

impl MessageError {
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl From<&GameError> for MessageError {
    fn from(err: &GameError) -> Self {
        Self::new(ErrorKind::from(err), err.to_string())
    }
}

impl From<GameError> for MessageError {
    fn from(err: GameError) -> Self {
        Self::from(&err)
    }
}

/// Either a message's payload or the reason it has none.
pub type Outcome<T> = Result<T, MessageError>;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Broadcast after a seat claims its hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimMessage {
    pub seat: Seat,
    /// The claim exactly as recorded.
    pub claim: Outcome<Cards>,
}

/// Broadcast after a play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealCardMessage {
    pub from: Seat,
    pub to: Seat,
    /// Cumulative revealed counts after the play.
    pub revealed: Outcome<Cards>,
}

/// Sent only to the seat whose role it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMessage {
    pub seat: Seat,
    pub role: Outcome<Role>,
}

/// Sent only to the seat whose hand it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandMessage {
    pub seat: Seat,
    pub hand: Outcome<Cards>,
}

/// Broadcast on request with the derived game phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMessage {
    pub phase: Outcome<Phase>,
}

/// Any message a lobby delivers to a player's outbox.
///
/// `#[serde(tag = "kind")]` flattens the variant name into the payload:
///   `{ "kind": "ClaimMessage", "seat": 2, "claim": { "Ok": { ... } } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LobbyMessage {
    #[serde(rename = "ClaimMessage")]
    Claim(ClaimMessage),
    #[serde(rename = "RevealCardMessage")]
    RevealCard(RevealCardMessage),
    #[serde(rename = "RoleMessage")]
    Role(RoleMessage),
    #[serde(rename = "HandMessage")]
    Hand(HandMessage),
    #[serde(rename = "StateMessage")]
    State(StateMessage),
}

impl LobbyMessage {
    /// The wire name of this message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Claim(_) => "ClaimMessage",
            Self::RevealCard(_) => "RevealCardMessage",
            Self::Role(_) => "RoleMessage",
            Self::Hand(_) => "HandMessage",
            Self::State(_) => "StateMessage",
        }
    }

    /// The attached error, if the action behind this message failed.
    pub fn error(&self) -> Option<&MessageError> {
        match self {
            Self::Claim(m) => m.claim.as_ref().err(),
            Self::RevealCard(m) => m.revealed.as_ref().err(),
            Self::Role(m) => m.role.as_ref().err(),
            Self::Hand(m) => m.hand.as_ref().err(),
            Self::State(m) => m.phase.as_ref().err(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error().is_none()
    }
}

impl From<ClaimMessage> for LobbyMessage {
    fn from(m: ClaimMessage) -> Self {
        Self::Claim(m)
    }
}

impl From<RevealCardMessage> for LobbyMessage {
    fn from(m: RevealCardMessage) -> Self {
        Self::RevealCard(m)
    }
}

impl From<RoleMessage> for LobbyMessage {
    fn from(m: RoleMessage) -> Self {
        Self::Role(m)
    }
}

impl From<HandMessage> for LobbyMessage {
    fn from(m: HandMessage) -> Self {
        Self::Hand(m)
    }
}

impl From<StateMessage> for LobbyMessage {
    fn from(m: StateMessage) -> Self {
        Self::State(m)
    }
}

// ---------------------------------------------------------------------------
// Action: what a seated player can ask for
// ---------------------------------------------------------------------------

/// An in-session request from a seated player.
///
/// A transport decodes these from client frames and hands them to the
/// lobby together with the sender's seat. The outcome always comes back
/// as a [`LobbyMessage`], never as a direct reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Action {
    /// Publicly claim a hand.
    Claim { cards: Cards },
    /// Pass the turn to `to`, revealing one of their cards.
    Play { to: Seat },
    /// Ask for your own role.
    GetRole,
    /// Ask for your own hand.
    GetHand,
    /// Ask for the phase to be broadcast to the table.
    GetGameState,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&LobbyId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_lobby_id_display() {
        assert_eq!(LobbyId(7).to_string(), "L-7");
    }

    #[test]
    fn test_seat_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&Seat(3)).unwrap(), "3");
    }

    // =====================================================================
    // Error kinds
    // =====================================================================

    #[test]
    fn test_error_kind_from_game_errors() {
        let cases = [
            (GameError::InvalidPlayerCount(2), ErrorKind::Validation),
            (GameError::EmptyHand(Seat(1)), ErrorKind::Validation),
            (GameError::GameOver(Phase::WinGood), ErrorKind::Phase),
            (
                GameError::WrongPhase {
                    seat: Seat(0),
                    action: "play",
                    phase: Phase::Claiming,
                },
                ErrorKind::Phase,
            ),
            (
                GameError::WrongTurn {
                    seat: Seat(2),
                    current: Seat(0),
                },
                ErrorKind::Turn,
            ),
            (GameError::UnknownSeat(Seat(9)), ErrorKind::Lookup),
        ];
        for (err, kind) in cases {
            assert_eq!(ErrorKind::from(&err), kind, "{err}");
        }
    }

    #[test]
    fn test_message_error_keeps_rendered_reason() {
        let err = MessageError::from(GameError::WrongTurn {
            seat: Seat(2),
            current: Seat(0),
        });
        assert_eq!(err.kind, ErrorKind::Turn);
        assert!(err.reason.contains("S-2"));
        assert!(err.reason.contains("S-0"));
        assert!(err.to_string().starts_with("turn error"));
    }

    // =====================================================================
    // Messages
    // =====================================================================

    #[test]
    fn test_claim_message_json_format() {
        let msg = LobbyMessage::from(ClaimMessage {
            seat: Seat(2),
            claim: Ok(Cards::new(3, 1, 1)),
        });
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["kind"], "ClaimMessage");
        assert_eq!(json["seat"], 2);
        assert_eq!(json["claim"]["Ok"]["good"], 1);
    }

    #[test]
    fn test_error_message_json_format() {
        let msg = LobbyMessage::from(StateMessage {
            phase: Err(MessageError::new(ErrorKind::Phase, "not started")),
        });
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["kind"], "StateMessage");
        assert_eq!(json["phase"]["Err"]["kind"], "Phase");
        assert_eq!(json["phase"]["Err"]["reason"], "not started");
    }

    #[test]
    fn test_reveal_message_round_trip() {
        let msg = LobbyMessage::from(RevealCardMessage {
            from: Seat(0),
            to: Seat(3),
            revealed: Ok(Cards::new(2, 1, 0)),
        });
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: LobbyMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_kind_names_match_wire_tags() {
        fn err<T>() -> Outcome<T> {
            Err(MessageError::new(ErrorKind::Lookup, "x"))
        }
        let msgs = [
            LobbyMessage::from(ClaimMessage { seat: Seat(0), claim: err() }),
            LobbyMessage::from(RevealCardMessage {
                from: Seat(0),
                to: Seat(1),
                revealed: err(),
            }),
            LobbyMessage::from(RoleMessage { seat: Seat(0), role: err() }),
            LobbyMessage::from(HandMessage { seat: Seat(0), hand: err() }),
            LobbyMessage::from(StateMessage { phase: err() }),
        ];
        for msg in msgs {
            let json = serde_json::to_value(&msg).unwrap();
            assert_eq!(json["kind"], msg.kind());
            assert!(!msg.is_ok());
            assert_eq!(msg.error().unwrap().kind, ErrorKind::Lookup);
        }
    }

    #[test]
    fn test_role_message_ok_has_no_error() {
        let msg = LobbyMessage::from(RoleMessage {
            seat: Seat(1),
            role: Ok(Role::Bad),
        });
        assert!(msg.is_ok());
        assert_eq!(msg.error(), None);
    }

    // =====================================================================
    // Actions
    // =====================================================================

    #[test]
    fn test_action_json_format() {
        let json = serde_json::to_value(Action::Play { to: Seat(4) }).unwrap();
        assert_eq!(json["action"], "Play");
        assert_eq!(json["to"], 4);

        let json = serde_json::to_value(Action::GetHand).unwrap();
        assert_eq!(json, serde_json::json!({"action": "GetHand"}));
    }

    #[test]
    fn test_action_claim_decodes_from_client_json() {
        let raw = r#"{"action":"Claim","cards":{"neutral":4,"good":1,"bad":0}}"#;
        let action: Action = serde_json::from_str(raw).unwrap();
        assert_eq!(
            action,
            Action::Claim {
                cards: Cards::new(4, 1, 0)
            }
        );
    }

    #[test]
    fn test_decode_unknown_action_returns_error() {
        let raw = r#"{"action":"Cheat"}"#;
        assert!(serde_json::from_str::<Action>(raw).is_err());
    }
}
