use super::{broadcaster::ClientBroadcaster, lobby::Lobby, store::LobbyStores};
use crate::client::ClientId;
use crate::game_variant::{CompletionRule, GameVariant};
use crate::messages::ServerToClient;
use serde_json::Number;
use tracing::{debug, info, warn};

/// What an incoming game event did to the sender's lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// No matching lobby, or the event was a repeat
    Ignored,
    /// The lobby is still waiting on other participants
    Continued,
    /// The round is over and the lobby has been removed
    Resolved,
}

// Per-variant round resolution
pub struct LobbyHandlers;

impl LobbyHandlers {
    /// Card flip: the first reported win ends the round and every other participant loses.
    pub fn handle_game_won(
        stores: &mut LobbyStores,
        broadcaster: &ClientBroadcaster,
        client_id: ClientId,
    ) -> RoundOutcome {
        let Some(code) = stores.find_code(GameVariant::CardFlip, client_id) else {
            debug!("Client {} reported a win outside a cardflip lobby", client_id);
            return RoundOutcome::Ignored;
        };

        if let Some(lobby) = stores.get(GameVariant::CardFlip, &code) {
            broadcaster.broadcast_except(
                lobby.participants(),
                client_id,
                ServerToClient::GameLost {},
            );
        }
        Self::close_lobby(stores, GameVariant::CardFlip, &code);
        info!("Client {} won cardflip lobby {}", client_id, code);
        RoundOutcome::Resolved
    }

    /// Simon / NRG: relay the score to opponents and end the round once everyone has scored.
    pub fn handle_score(
        stores: &mut LobbyStores,
        broadcaster: &ClientBroadcaster,
        variant: GameVariant,
        client_id: ClientId,
        score: Number,
    ) -> RoundOutcome {
        let Some(relay) = ServerToClient::score_for(variant, score) else {
            return RoundOutcome::Ignored;
        };
        let Some(code) = stores.find_code(variant, client_id) else {
            debug!("Client {} sent a {} score outside a {} lobby", client_id, variant, variant);
            return RoundOutcome::Ignored;
        };
        let Some(lobby) = stores.get_mut(variant, &code) else {
            return RoundOutcome::Ignored;
        };

        if !lobby.record_score(client_id) {
            warn!(
                "Ignoring repeated {} score from client {} in lobby {}",
                variant, client_id, code
            );
            return RoundOutcome::Ignored;
        }
        debug!(
            "Lobby {} has {}/{} scores",
            code,
            lobby.finished_count(),
            lobby.participants().len()
        );

        broadcaster.broadcast_except(lobby.participants(), client_id, relay);

        if lobby.all_scored() {
            broadcaster.broadcast(lobby.participants(), ServerToClient::GameEnd {});
            Self::close_lobby(stores, variant, &code);
            info!("{} lobby {} ended", variant, code);
            RoundOutcome::Resolved
        } else {
            RoundOutcome::Continued
        }
    }

    /// A participant disconnected. Empty lobbies are dropped and a score lobby whose
    /// remaining participants have all scored ends for them.
    pub fn handle_participant_left(
        stores: &mut LobbyStores,
        broadcaster: &ClientBroadcaster,
        client_id: ClientId,
    ) -> RoundOutcome {
        let Some((variant, code)) = stores.remove_participant(client_id) else {
            return RoundOutcome::Ignored;
        };
        let Some(lobby) = stores.get(variant, &code) else {
            return RoundOutcome::Ignored;
        };
        info!("Client {} left {} lobby {}", client_id, variant, code);

        if lobby.is_empty() {
            Self::close_lobby(stores, variant, &code);
            info!("{} lobby {} abandoned", variant, code);
            return RoundOutcome::Resolved;
        }

        if variant.completion_rule() == CompletionRule::AllScored && lobby.all_scored() {
            broadcaster.broadcast(lobby.participants(), ServerToClient::GameEnd {});
            Self::close_lobby(stores, variant, &code);
            info!("{} lobby {} ended after a participant left", variant, code);
            return RoundOutcome::Resolved;
        }

        RoundOutcome::Continued
    }

    fn close_lobby(stores: &mut LobbyStores, variant: GameVariant, code: &str) -> Option<Lobby> {
        let lobby = stores.remove(variant, code);
        let store = stores.store(variant);
        debug!("{} store now holds {} lobbies", store.variant(), store.len());
        lobby
    }
}
