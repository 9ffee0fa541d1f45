//! Lobby actor: an isolated Tokio task that owns a roster and a game.
//!
//! Each lobby runs in its own task and talks to the outside world
//! through a bounded command queue. Every command is handled to
//! completion before the next one is read, so the roster and the game
//! are never touched by two operations at once and need no lock.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use traitor_game::{Cards, Game, MAX_PLAYERS, MIN_PLAYERS, Phase, Seat};
use traitor_protocol::{
    ClaimMessage, HandMessage, LobbyId, LobbyMessage, MessageError,
    RevealCardMessage, RoleMessage, StateMessage,
};

use crate::player::Player;
use crate::{
    DeliveryError, DeliveryReport, LobbyConfig, LobbyError, LobbyStatus,
    PlayerSender, Seating, SlowReceiverPolicy,
};

type Reply<T> = oneshot::Sender<Result<T, LobbyError>>;

/// Commands sent to a lobby actor through its queue.
///
/// Most variants carry a reply channel; the caller sends the command
/// and waits for the answer on it.
pub(crate) enum LobbyCommand {
    Join {
        name: String,
        reply: Reply<Seating>,
    },
    Start {
        reply: Reply<()>,
    },
    Claim {
        seat: Seat,
        cards: Cards,
        reply: Reply<DeliveryReport>,
    },
    Play {
        from: Seat,
        to: Seat,
        reply: Reply<DeliveryReport>,
    },
    GetRole {
        seat: Seat,
        reply: Reply<DeliveryReport>,
    },
    GetHand {
        seat: Seat,
        reply: Reply<DeliveryReport>,
    },
    GetGameState {
        reply: Reply<DeliveryReport>,
    },
    Register {
        seat: Seat,
        sender: PlayerSender,
        reply: Reply<()>,
    },
    Unregister {
        seat: Seat,
        reply: Reply<()>,
    },
    Rename {
        seat: Seat,
        name: String,
        reply: Reply<()>,
    },
    GetInfo {
        reply: Reply<LobbyInfo>,
    },
    Shutdown,
}

/// A snapshot of one seated player, as seen from outside the lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub seat: Seat,
    pub name: String,
    /// Whether an outbox is attached.
    pub connected: bool,
    /// Last time this seat acted or joined.
    pub last_seen: Instant,
}

/// A snapshot of lobby metadata. Holds nothing secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyInfo {
    pub lobby_id: LobbyId,
    pub status: LobbyStatus,
    /// The roster in seat order.
    pub players: Vec<PlayerInfo>,
    /// `None` until the lobby starts.
    pub phase: Option<Phase>,
}

impl LobbyInfo {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

/// Handle to a running lobby actor.
///
/// Cheap to clone; it's a `LobbyId` plus an `mpsc::Sender`. The
/// registry keeps one per lobby and hands out clones.
#[derive(Debug, Clone)]
pub struct LobbyHandle {
    lobby_id: LobbyId,
    sender: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    pub fn lobby_id(&self) -> LobbyId {
        self.lobby_id
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub async fn join(&self, name: String) -> Result<Seating, LobbyError> {
        self.request(|reply| LobbyCommand::Join { name, reply }).await
    }

    pub async fn start(&self) -> Result<(), LobbyError> {
        self.request(|reply| LobbyCommand::Start { reply }).await
    }

    pub async fn claim(
        &self,
        seat: Seat,
        cards: Cards,
    ) -> Result<DeliveryReport, LobbyError> {
        self.request(|reply| LobbyCommand::Claim { seat, cards, reply })
            .await
    }

    pub async fn play(
        &self,
        from: Seat,
        to: Seat,
    ) -> Result<DeliveryReport, LobbyError> {
        self.request(|reply| LobbyCommand::Play { from, to, reply })
            .await
    }

    pub async fn get_role(
        &self,
        seat: Seat,
    ) -> Result<DeliveryReport, LobbyError> {
        self.request(|reply| LobbyCommand::GetRole { seat, reply })
            .await
    }

    pub async fn get_hand(
        &self,
        seat: Seat,
    ) -> Result<DeliveryReport, LobbyError> {
        self.request(|reply| LobbyCommand::GetHand { seat, reply })
            .await
    }

    pub async fn get_game_state(&self) -> Result<DeliveryReport, LobbyError> {
        self.request(|reply| LobbyCommand::GetGameState { reply })
            .await
    }

    pub async fn register(
        &self,
        seat: Seat,
        sender: PlayerSender,
    ) -> Result<(), LobbyError> {
        self.request(|reply| LobbyCommand::Register {
            seat,
            sender,
            reply,
        })
        .await
    }

    pub async fn unregister(&self, seat: Seat) -> Result<(), LobbyError> {
        self.request(|reply| LobbyCommand::Unregister { seat, reply })
            .await
    }

    pub async fn rename(
        &self,
        seat: Seat,
        name: String,
    ) -> Result<(), LobbyError> {
        self.request(|reply| LobbyCommand::Rename { seat, name, reply })
            .await
    }

    pub async fn info(&self) -> Result<LobbyInfo, LobbyError> {
        self.request(|reply| LobbyCommand::GetInfo { reply }).await
    }

    /// Tells the lobby to stop. Commands already queued are handled
    /// first; later ones fail with [`LobbyError::Unavailable`].
    pub async fn shutdown(&self) -> Result<(), LobbyError> {
        self.sender
            .send(LobbyCommand::Shutdown)
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id))
    }

    /// Sends a command and waits for its reply.
    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> LobbyCommand,
    ) -> Result<T, LobbyError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id))?;
        reply_rx
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id))?
    }
}

/// The internal lobby state. Runs inside a Tokio task.
struct LobbyActor {
    lobby_id: LobbyId,
    config: LobbyConfig,
    /// Indexed by seat.
    players: Vec<Player>,
    /// Set once by Start and kept for the lobby's lifetime.
    game: Option<Game>,
    receiver: mpsc::Receiver<LobbyCommand>,
}

impl LobbyActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(lobby_id = %self.lobby_id, "lobby actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LobbyCommand::Join { name, reply } => {
                    let _ = reply.send(self.handle_join(name));
                }
                LobbyCommand::Start { reply } => {
                    let _ = reply.send(self.handle_start());
                }
                LobbyCommand::Claim { seat, cards, reply } => {
                    let _ = reply.send(Ok(self.handle_claim(seat, cards)));
                }
                LobbyCommand::Play { from, to, reply } => {
                    let _ = reply.send(Ok(self.handle_play(from, to)));
                }
                LobbyCommand::GetRole { seat, reply } => {
                    let _ = reply.send(self.handle_get_role(seat));
                }
                LobbyCommand::GetHand { seat, reply } => {
                    let _ = reply.send(self.handle_get_hand(seat));
                }
                LobbyCommand::GetGameState { reply } => {
                    let _ = reply.send(Ok(self.handle_get_game_state()));
                }
                LobbyCommand::Register {
                    seat,
                    sender,
                    reply,
                } => {
                    let _ = reply.send(self.handle_register(seat, sender));
                }
                LobbyCommand::Unregister { seat, reply } => {
                    let _ = reply.send(self.handle_unregister(seat));
                }
                LobbyCommand::Rename { seat, name, reply } => {
                    let _ = reply.send(self.handle_rename(seat, name));
                }
                LobbyCommand::GetInfo { reply } => {
                    let _ = reply.send(Ok(self.info()));
                }
                LobbyCommand::Shutdown => {
                    tracing::info!(lobby_id = %self.lobby_id, "lobby shutting down");
                    break;
                }
            }
        }

        tracing::info!(lobby_id = %self.lobby_id, "lobby actor stopped");
    }

    fn status(&self) -> LobbyStatus {
        match self.game {
            Some(_) => LobbyStatus::Started,
            None => LobbyStatus::Open,
        }
    }

    // -- Roster --

    fn handle_join(&mut self, name: String) -> Result<Seating, LobbyError> {
        if !self.status().is_joinable() {
            return Err(LobbyError::AlreadyStarted(self.lobby_id));
        }
        check_name(&name)?;
        if self.players.len() >= MAX_PLAYERS {
            return Err(LobbyError::LobbyFull(self.lobby_id));
        }
        if self.players.iter().any(|p| p.name() == name) {
            return Err(LobbyError::NameTaken(name));
        }

        let seat = Seat(self.players.len() as u8);
        let player = Player::new(seat, name);
        let seating = Seating {
            lobby_id: self.lobby_id,
            seat,
            token: player.token().to_owned(),
        };
        tracing::info!(
            lobby_id = %self.lobby_id,
            %seat,
            name = player.name(),
            "player joined"
        );
        self.players.push(player);
        Ok(seating)
    }

    fn handle_rename(
        &mut self,
        seat: Seat,
        name: String,
    ) -> Result<(), LobbyError> {
        check_name(&name)?;
        if self
            .players
            .iter()
            .any(|p| p.seat() != seat && p.name() == name)
        {
            return Err(LobbyError::NameTaken(name));
        }
        let lobby_id = self.lobby_id;
        let player = self.player_mut(seat)?;
        tracing::info!(%lobby_id, %seat, from = player.name(), to = %name, "player renamed");
        player.rename(name);
        player.touch();
        Ok(())
    }

    fn handle_register(
        &mut self,
        seat: Seat,
        sender: PlayerSender,
    ) -> Result<(), LobbyError> {
        let lobby_id = self.lobby_id;
        let player = self.player_mut(seat)?;
        player.attach(sender);
        player.touch();
        tracing::info!(%lobby_id, %seat, "channel registered");
        Ok(())
    }

    fn handle_unregister(&mut self, seat: Seat) -> Result<(), LobbyError> {
        let lobby_id = self.lobby_id;
        if self.player_mut(seat)?.detach() {
            tracing::info!(%lobby_id, %seat, "channel unregistered");
        }
        Ok(())
    }

    // -- Game --

    fn handle_start(&mut self) -> Result<(), LobbyError> {
        if self.game.is_some() {
            return Err(LobbyError::AlreadyStarted(self.lobby_id));
        }
        let n = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return Err(LobbyError::InvalidPlayerCount(n));
        }

        let game = match self.config.seed {
            Some(seed) => Game::with_seed(n, seed)?,
            None => Game::new(n)?,
        };
        let phase = game.phase();
        self.game = Some(game);
        tracing::info!(lobby_id = %self.lobby_id, players = n, "game started");

        self.broadcast(StateMessage { phase: Ok(phase) }.into());
        Ok(())
    }

    fn handle_claim(&mut self, seat: Seat, cards: Cards) -> DeliveryReport {
        self.touch(seat);
        let claim = self
            .game_mut()
            .and_then(|game| Ok(game.claim(seat, cards)?))
            .map(|()| cards);
        if let Err(err) = &claim {
            tracing::debug!(lobby_id = %self.lobby_id, %seat, %err, "claim rejected");
        }
        self.broadcast(
            ClaimMessage {
                seat,
                claim: claim.map_err(MessageError::from),
            }
            .into(),
        )
    }

    fn handle_play(&mut self, from: Seat, to: Seat) -> DeliveryReport {
        self.touch(from);
        let lobby_id = self.lobby_id;
        let revealed = self.game_mut().and_then(|game| {
            let card = game.play(from, to)?;
            tracing::debug!(%lobby_id, %from, %to, %card, "card revealed");
            let phase = game.phase();
            if phase.is_terminal() {
                tracing::info!(%lobby_id, %phase, revealed = %game.revealed(), "game over");
            }
            Ok(game.revealed())
        });
        if let Err(err) = &revealed {
            tracing::debug!(%lobby_id, %from, %to, %err, "play rejected");
        }
        self.broadcast(
            RevealCardMessage {
                from,
                to,
                revealed: revealed.map_err(MessageError::from),
            }
            .into(),
        )
    }

    fn handle_get_role(
        &mut self,
        seat: Seat,
    ) -> Result<DeliveryReport, LobbyError> {
        self.player_mut(seat)?.touch();
        let role = self
            .game_ref()
            .and_then(|game| Ok(game.role(seat)?))
            .map_err(MessageError::from);
        self.unicast(seat, RoleMessage { seat, role }.into())
    }

    fn handle_get_hand(
        &mut self,
        seat: Seat,
    ) -> Result<DeliveryReport, LobbyError> {
        self.player_mut(seat)?.touch();
        let hand = self
            .game_ref()
            .and_then(|game| Ok(game.hand(seat)?))
            .map_err(MessageError::from);
        self.unicast(seat, HandMessage { seat, hand }.into())
    }

    fn handle_get_game_state(&mut self) -> DeliveryReport {
        let phase = self
            .game_ref()
            .map(Game::phase)
            .map_err(MessageError::from);
        self.broadcast(StateMessage { phase }.into())
    }

    // -- Delivery --

    /// Offers one shared message to every seat in seat order.
    fn broadcast(&mut self, msg: LobbyMessage) -> DeliveryReport {
        let msg = Arc::new(msg);
        let mut report = DeliveryReport::default();
        for player in &mut self.players {
            match deliver(self.lobby_id, self.config.slow_receiver, player, &msg)
            {
                Ok(()) => report.delivered.push(player.seat()),
                Err(err) => report.failed.push(err),
            }
        }
        report
    }

    fn unicast(
        &mut self,
        seat: Seat,
        msg: LobbyMessage,
    ) -> Result<DeliveryReport, LobbyError> {
        let (lobby_id, policy) = (self.lobby_id, self.config.slow_receiver);
        let player = self.player_mut(seat)?;
        let mut report = DeliveryReport::default();
        match deliver(lobby_id, policy, player, &Arc::new(msg)) {
            Ok(()) => report.delivered.push(seat),
            Err(err) => report.failed.push(err),
        }
        Ok(report)
    }

    // -- Helpers --

    fn player_mut(&mut self, seat: Seat) -> Result<&mut Player, LobbyError> {
        self.players
            .get_mut(seat.index())
            .ok_or(LobbyError::NotSeated(self.lobby_id, seat))
    }

    fn touch(&mut self, seat: Seat) {
        if let Some(player) = self.players.get_mut(seat.index()) {
            player.touch();
        }
    }

    fn game_ref(&self) -> Result<&Game, LobbyError> {
        self.game
            .as_ref()
            .ok_or(LobbyError::NotStarted(self.lobby_id))
    }

    fn game_mut(&mut self) -> Result<&mut Game, LobbyError> {
        self.game
            .as_mut()
            .ok_or(LobbyError::NotStarted(self.lobby_id))
    }

    fn info(&self) -> LobbyInfo {
        LobbyInfo {
            lobby_id: self.lobby_id,
            status: self.status(),
            players: self
                .players
                .iter()
                .map(|p| PlayerInfo {
                    seat: p.seat(),
                    name: p.name().to_owned(),
                    connected: p.is_connected(),
                    last_seen: p.last_seen(),
                })
                .collect(),
            phase: self.game.as_ref().map(Game::phase),
        }
    }
}

/// Offers a message to one seat's outbox without waiting.
///
/// A missing channel is skipped. A full outbox is handled according to
/// `policy`; a dropped receiver always detaches the channel.
fn deliver(
    lobby_id: LobbyId,
    policy: SlowReceiverPolicy,
    player: &mut Player,
    msg: &Arc<LobbyMessage>,
) -> Result<(), DeliveryError> {
    let seat = player.seat();
    let Some(sender) = player.sender() else {
        tracing::warn!(%lobby_id, %seat, kind = msg.kind(), "no channel attached, message skipped");
        return Err(DeliveryError::NoChannel(seat));
    };

    match sender.try_send(Arc::clone(msg)) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(%lobby_id, %seat, kind = msg.kind(), ?policy, "outbox full, message dropped");
            if policy == SlowReceiverPolicy::Detach {
                player.detach();
            }
            Err(DeliveryError::OutboxFull(seat))
        }
        Err(TrySendError::Closed(_)) => {
            tracing::warn!(%lobby_id, %seat, kind = msg.kind(), "receiver gone, channel detached");
            player.detach();
            Err(DeliveryError::Closed(seat))
        }
    }
}

/// Rejects names that are empty or only whitespace.
pub(crate) fn check_name(name: &str) -> Result<(), LobbyError> {
    if name.trim().is_empty() {
        Err(LobbyError::BlankName)
    } else {
        Ok(())
    }
}

/// Spawns a lobby actor with `host` already seated at seat 0.
///
/// The caller validates `host` with [`check_name`] first.
pub(crate) fn spawn_lobby(
    lobby_id: LobbyId,
    host: String,
    config: LobbyConfig,
) -> (LobbyHandle, Seating) {
    let (tx, rx) = mpsc::channel(config.command_buffer.max(1));

    let seat = Seat(0);
    let player = Player::new(seat, host);
    let seating = Seating {
        lobby_id,
        seat,
        token: player.token().to_owned(),
    };

    let actor = LobbyActor {
        lobby_id,
        config,
        players: vec![player],
        game: None,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    let handle = LobbyHandle {
        lobby_id,
        sender: tx,
    };
    (handle, seating)
}
