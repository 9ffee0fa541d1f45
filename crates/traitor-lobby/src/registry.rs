//! Lobby registry: creates, tracks, and routes requests to lobbies.

use std::collections::HashMap;

use rand::Rng;
use tokio::sync::RwLock;
use traitor_game::{Cards, Seat};
use traitor_protocol::{Action, LobbyId};

use crate::lobby::{check_name, spawn_lobby};
use crate::{
    DeliveryReport, LobbyConfig, LobbyError, LobbyHandle, LobbyInfo,
    PlayerReceiver, PlayerSender, Seating, outbox,
};

/// Owns every live lobby.
///
/// The map lock is only held to insert, remove, or clone a
/// [`LobbyHandle`]; it is always released before the lobby itself is
/// contacted. Share the registry between tasks with an `Arc`.
pub struct LobbyRegistry {
    config: LobbyConfig,
    lobbies: RwLock<HashMap<LobbyId, LobbyHandle>>,
}

impl LobbyRegistry {
    /// Creates an empty registry. Every lobby it creates uses `config`.
    pub fn new(config: LobbyConfig) -> Self {
        Self {
            config,
            lobbies: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    /// Creates a lobby with `host` at seat 0 and returns its seating.
    ///
    /// The lobby id is random and never collides with a live lobby.
    pub async fn create_lobby(
        &self,
        host: impl Into<String>,
    ) -> Result<Seating, LobbyError> {
        let host = host.into();
        check_name(&host)?;

        let mut lobbies = self.lobbies.write().await;
        let lobby_id = loop {
            let candidate = LobbyId(rand::rng().random());
            if !lobbies.contains_key(&candidate) {
                break candidate;
            }
        };
        let (handle, seating) = spawn_lobby(lobby_id, host, self.config.clone());
        lobbies.insert(lobby_id, handle);
        tracing::info!(%lobby_id, lobbies = lobbies.len(), "lobby created");
        Ok(seating)
    }

    /// Seats a new player at the next free seat.
    pub async fn join(
        &self,
        lobby_id: LobbyId,
        name: impl Into<String>,
    ) -> Result<Seating, LobbyError> {
        self.handle(lobby_id).await?.join(name.into()).await
    }

    /// Starts the game with the current roster.
    pub async fn start(&self, lobby_id: LobbyId) -> Result<(), LobbyError> {
        self.handle(lobby_id).await?.start().await
    }

    /// Records a claim and broadcasts a `ClaimMessage`.
    pub async fn claim(
        &self,
        lobby_id: LobbyId,
        seat: Seat,
        cards: Cards,
    ) -> Result<DeliveryReport, LobbyError> {
        self.handle(lobby_id).await?.claim(seat, cards).await
    }

    /// Plays from `from` to `to` and broadcasts a `RevealCardMessage`.
    pub async fn play(
        &self,
        lobby_id: LobbyId,
        from: Seat,
        to: Seat,
    ) -> Result<DeliveryReport, LobbyError> {
        self.handle(lobby_id).await?.play(from, to).await
    }

    /// Sends `seat` its role, and nobody else.
    pub async fn get_role(
        &self,
        lobby_id: LobbyId,
        seat: Seat,
    ) -> Result<DeliveryReport, LobbyError> {
        self.handle(lobby_id).await?.get_role(seat).await
    }

    /// Sends `seat` its hand, and nobody else.
    pub async fn get_hand(
        &self,
        lobby_id: LobbyId,
        seat: Seat,
    ) -> Result<DeliveryReport, LobbyError> {
        self.handle(lobby_id).await?.get_hand(seat).await
    }

    /// Broadcasts the current phase.
    pub async fn get_game_state(
        &self,
        lobby_id: LobbyId,
    ) -> Result<DeliveryReport, LobbyError> {
        self.handle(lobby_id).await?.get_game_state().await
    }

    /// Attaches `sender` as the outbox for `seat`, replacing any
    /// previous one.
    pub async fn register(
        &self,
        lobby_id: LobbyId,
        seat: Seat,
        sender: PlayerSender,
    ) -> Result<(), LobbyError> {
        self.handle(lobby_id).await?.register(seat, sender).await
    }

    /// Creates an outbox of `outbox_capacity` messages, attaches it to
    /// `seat`, and returns the receiving end.
    pub async fn connect(
        &self,
        lobby_id: LobbyId,
        seat: Seat,
    ) -> Result<PlayerReceiver, LobbyError> {
        let (tx, rx) = outbox(self.config.outbox_capacity);
        self.register(lobby_id, seat, tx).await?;
        Ok(rx)
    }

    /// Detaches the outbox for `seat`. The seat keeps its place.
    pub async fn unregister_channel(
        &self,
        lobby_id: LobbyId,
        seat: Seat,
    ) -> Result<(), LobbyError> {
        self.handle(lobby_id).await?.unregister(seat).await
    }

    /// Changes a seated player's display name.
    pub async fn rename(
        &self,
        lobby_id: LobbyId,
        seat: Seat,
        name: impl Into<String>,
    ) -> Result<(), LobbyError> {
        self.handle(lobby_id).await?.rename(seat, name.into()).await
    }

    /// Returns a snapshot of one lobby.
    pub async fn info(&self, lobby_id: LobbyId) -> Result<LobbyInfo, LobbyError> {
        self.handle(lobby_id).await?.info().await
    }

    /// Lists all lobbies that are still accepting players.
    ///
    /// Lobbies that fail to respond (e.g., shutting down) are skipped.
    pub async fn list_lobbies(&self) -> Vec<LobbyInfo> {
        let handles: Vec<LobbyHandle> =
            self.lobbies.read().await.values().cloned().collect();

        let mut infos = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(info) = handle.info().await {
                if info.status.is_joinable() {
                    infos.push(info);
                }
            }
        }
        infos.sort_by_key(|info| info.lobby_id);
        infos
    }

    /// Runs an in-session action on behalf of `seat`.
    pub async fn dispatch(
        &self,
        lobby_id: LobbyId,
        seat: Seat,
        action: Action,
    ) -> Result<DeliveryReport, LobbyError> {
        let handle = self.handle(lobby_id).await?;
        match action {
            Action::Claim { cards } => handle.claim(seat, cards).await,
            Action::Play { to } => handle.play(seat, to).await,
            Action::GetRole => handle.get_role(seat).await,
            Action::GetHand => handle.get_hand(seat).await,
            Action::GetGameState => handle.get_game_state().await,
        }
    }

    /// Removes a lobby and stops its actor.
    pub async fn close(&self, lobby_id: LobbyId) -> Result<(), LobbyError> {
        let handle = self
            .lobbies
            .write()
            .await
            .remove(&lobby_id)
            .ok_or(LobbyError::NotFound(lobby_id))?;

        let _ = handle.shutdown().await;
        tracing::info!(%lobby_id, "lobby closed");
        Ok(())
    }

    /// Closes every lobby. Returns how many were closed.
    pub async fn shutdown(&self) -> usize {
        let handles: Vec<LobbyHandle> = self
            .lobbies
            .write()
            .await
            .drain()
            .map(|(_, handle)| handle)
            .collect();

        for handle in &handles {
            let _ = handle.shutdown().await;
        }
        tracing::info!(lobbies = handles.len(), "registry shut down");
        handles.len()
    }

    /// Returns the number of live lobbies.
    pub async fn lobby_count(&self) -> usize {
        self.lobbies.read().await.len()
    }

    /// Lists all live lobby ids.
    pub async fn lobby_ids(&self) -> Vec<LobbyId> {
        let mut ids: Vec<LobbyId> =
            self.lobbies.read().await.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Resolves a lobby id to a cloned handle. The read lock is dropped
    /// before this returns.
    async fn handle(&self, lobby_id: LobbyId) -> Result<LobbyHandle, LobbyError> {
        self.lobbies
            .read()
            .await
            .get(&lobby_id)
            .cloned()
            .ok_or(LobbyError::NotFound(lobby_id))
    }
}

impl Default for LobbyRegistry {
    fn default() -> Self {
        Self::new(LobbyConfig::default())
    }
}
