use crate::{client::ClientId, game_variant::GameVariant};
use std::collections::HashSet;

pub type LobbyCode = String;

/// A matched group of clients playing one round of a single game variant.
#[derive(Debug, Clone)]
pub struct Lobby {
    pub code: LobbyCode,
    pub variant: GameVariant,
    participants: Vec<ClientId>,
    // Participants that have reported a score; always a subset of `participants`
    scored: HashSet<ClientId>,
}

impl Lobby {
    pub fn new(code: LobbyCode, variant: GameVariant, participants: Vec<ClientId>) -> Self {
        Self {
            code,
            variant,
            participants,
            scored: HashSet::new(),
        }
    }

    pub fn participants(&self) -> &[ClientId] {
        &self.participants
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.participants.contains(&client_id)
    }

    pub fn finished_count(&self) -> usize {
        self.scored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Records a participant's score. Returns false for non-participants and repeat reports.
    pub fn record_score(&mut self, client_id: ClientId) -> bool {
        self.contains(client_id) && self.scored.insert(client_id)
    }

    /// Every remaining participant has reported a score.
    pub fn all_scored(&self) -> bool {
        !self.participants.is_empty() && self.scored.len() == self.participants.len()
    }

    pub fn remove_participant(&mut self, client_id: ClientId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|&id| id != client_id);
        self.scored.remove(&client_id);
        self.participants.len() != before
    }
}
