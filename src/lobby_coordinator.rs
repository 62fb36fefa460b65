use crate::client::ClientId;
use crate::config::{MatchmakingSettings, PLAYERS_PER_LOBBY};
use crate::countdown::countdown_task;
use crate::game_variant::GameVariant;
use crate::lobby::{ClientBroadcaster, LobbyHandlers, LobbyStores, RoundOutcome};
use crate::messages::{ClientToServer, CoordinatorMessage, ServerToClient};
use crate::waiting_pool::WaitingPool;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the waiting pool and every lobby store. All state changes go through
/// `handle_message`, one message at a time, so each mutation and the broadcast
/// that follows it are never interleaved with another client's.
pub struct LobbyCoordinator {
    settings: MatchmakingSettings,
    coordinator_tx: mpsc::UnboundedSender<CoordinatorMessage>,
    broadcaster: ClientBroadcaster,
    waiting_pool: WaitingPool,
    lobbies: LobbyStores,
    countdown_active: bool,
}

impl LobbyCoordinator {
    pub fn new(
        coordinator_tx: mpsc::UnboundedSender<CoordinatorMessage>,
        settings: MatchmakingSettings,
    ) -> Self {
        Self {
            settings,
            coordinator_tx,
            broadcaster: ClientBroadcaster::new(),
            waiting_pool: WaitingPool::new(),
            lobbies: LobbyStores::new(),
            countdown_active: false,
        }
    }

    pub fn handle_message(&mut self, msg: CoordinatorMessage) {
        match msg {
            CoordinatorMessage::ClientConnected {
                client_id,
                client_response_tx,
            } => {
                self.broadcaster.add_client(client_id, client_response_tx);
                debug!("Client {} registered with coordinator", client_id);
            }
            CoordinatorMessage::ClientAction { client_id, action } => {
                self.handle_client_action(client_id, action);
            }
            CoordinatorMessage::ClientDisconnected { client_id } => {
                self.handle_disconnect(client_id);
            }
            CoordinatorMessage::CountdownTick { seconds } => {
                self.broadcaster.broadcast(
                    self.waiting_pool.members(),
                    ServerToClient::Countdown { seconds },
                );
            }
            CoordinatorMessage::CountdownFinished => {
                self.finish_countdown();
            }
        }
    }

    fn handle_client_action(&mut self, client_id: ClientId, action: ClientToServer) {
        if !self.broadcaster.is_connected(client_id) {
            warn!("Dropping action from unregistered client {}", client_id);
            return;
        }

        let outcome = match action {
            ClientToServer::JoinLobby {} => return self.handle_join(client_id),
            ClientToServer::LeaveLobby {} => return self.handle_leave(client_id),
            ClientToServer::GameWon {} => {
                LobbyHandlers::handle_game_won(&mut self.lobbies, &self.broadcaster, client_id)
            }
            ClientToServer::SimonScore { score } => LobbyHandlers::handle_score(
                &mut self.lobbies,
                &self.broadcaster,
                GameVariant::Simon,
                client_id,
                score,
            ),
            ClientToServer::NrgScore { score } => LobbyHandlers::handle_score(
                &mut self.lobbies,
                &self.broadcaster,
                GameVariant::Nrg,
                client_id,
                score,
            ),
        };

        if outcome == RoundOutcome::Resolved {
            debug!(
                "Round resolved by client {} ({} lobbies active)",
                client_id,
                self.lobbies.total_lobbies()
            );
        }
    }

    fn handle_join(&mut self, client_id: ClientId) {
        // A client still indexed in a lobby abandons it before waiting again
        self.leave_current_lobby(client_id);

        if self.waiting_pool.join(client_id) {
            info!(
                "Client {} joined waiting pool ({} waiting)",
                client_id,
                self.waiting_pool.len()
            );
        }
        self.broadcast_player_count();
        self.maybe_start_countdown();
    }

    fn handle_leave(&mut self, client_id: ClientId) {
        if self.waiting_pool.leave(client_id) {
            info!(
                "Client {} left waiting pool ({} waiting)",
                client_id,
                self.waiting_pool.len()
            );
        }
        self.broadcast_player_count();
    }

    fn handle_disconnect(&mut self, client_id: ClientId) {
        self.handle_leave(client_id);
        self.leave_current_lobby(client_id);
        self.broadcaster.remove_client(client_id);
        debug!("Client {} cleanup complete", client_id);
    }

    fn leave_current_lobby(&mut self, client_id: ClientId) {
        let outcome =
            LobbyHandlers::handle_participant_left(&mut self.lobbies, &self.broadcaster, client_id);
        if outcome != RoundOutcome::Ignored {
            debug!(
                "Client {} left its lobby: {:?} ({} lobbies active)",
                client_id,
                outcome,
                self.lobbies.total_lobbies()
            );
        }
    }

    fn broadcast_player_count(&self) {
        self.broadcaster.broadcast(
            self.waiting_pool.members(),
            ServerToClient::update_users(self.waiting_pool.len()),
        );
    }

    fn maybe_start_countdown(&mut self) {
        if self.countdown_active || self.waiting_pool.len() < PLAYERS_PER_LOBBY {
            return;
        }
        self.countdown_active = true;
        info!("Starting countdown with {} waiting", self.waiting_pool.len());
        tokio::spawn(countdown_task(self.coordinator_tx.clone(), self.settings));
    }

    /// Promotes the longest-waiting clients into a new lobby of a random variant.
    fn finish_countdown(&mut self) {
        self.countdown_active = false;

        let Some(participants) = self.waiting_pool.take_first(PLAYERS_PER_LOBBY) else {
            info!(
                "Countdown finished with only {} waiting, no game started",
                self.waiting_pool.len()
            );
            self.broadcast_player_count();
            return;
        };

        let variant = GameVariant::random();
        let code = self.lobbies.create(variant, participants.clone());
        info!(
            "New {} lobby {} created with {:?} ({} active)",
            variant,
            code,
            participants,
            self.lobbies.total_lobbies()
        );

        self.broadcaster
            .broadcast(&participants, ServerToClient::GameStart { game: variant });

        if !self.waiting_pool.is_empty() {
            self.broadcast_player_count();
        }
        self.maybe_start_countdown();
    }
}

/// Coordinator task: applies every message to the shared matchmaking state in order
pub async fn lobby_coordinator(
    mut rx: mpsc::UnboundedReceiver<CoordinatorMessage>,
    coordinator_tx: mpsc::UnboundedSender<CoordinatorMessage>,
    settings: MatchmakingSettings,
) {
    let mut coordinator = LobbyCoordinator::new(coordinator_tx, settings);

    info!("Lobby coordinator started");

    while let Some(msg) = rx.recv().await {
        coordinator.handle_message(msg);
    }

    debug!("Lobby coordinator stopped");
}
