use super::lobby::{Lobby, LobbyCode};
use crate::{client::ClientId, game_variant::GameVariant};
use rand::Rng;
use std::collections::HashMap;

/// Active lobbies of a single game variant.
#[derive(Debug)]
pub struct LobbyStore {
    variant: GameVariant,
    lobbies: HashMap<LobbyCode, Lobby>,
}

impl LobbyStore {
    pub fn new(variant: GameVariant) -> Self {
        Self {
            variant,
            lobbies: HashMap::new(),
        }
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    pub fn get(&self, code: &str) -> Option<&Lobby> {
        self.lobbies.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Lobby> {
        self.lobbies.get_mut(code)
    }

    fn insert(&mut self, lobby: Lobby) {
        debug_assert_eq!(lobby.variant, self.variant);
        self.lobbies.insert(lobby.code.clone(), lobby);
    }

    fn remove(&mut self, code: &str) -> Option<Lobby> {
        self.lobbies.remove(code)
    }
}

/// The three per-variant stores plus an index from client to the lobby it plays in.
/// A client is indexed for at most one lobby across all stores.
#[derive(Debug)]
pub struct LobbyStores {
    cardflip: LobbyStore,
    simon: LobbyStore,
    nrg: LobbyStore,
    client_lobbies: HashMap<ClientId, (GameVariant, LobbyCode)>,
}

impl LobbyStores {
    pub fn new() -> Self {
        Self {
            cardflip: LobbyStore::new(GameVariant::CardFlip),
            simon: LobbyStore::new(GameVariant::Simon),
            nrg: LobbyStore::new(GameVariant::Nrg),
            client_lobbies: HashMap::new(),
        }
    }

    pub fn store(&self, variant: GameVariant) -> &LobbyStore {
        match variant {
            GameVariant::CardFlip => &self.cardflip,
            GameVariant::Simon => &self.simon,
            GameVariant::Nrg => &self.nrg,
        }
    }

    pub fn store_mut(&mut self, variant: GameVariant) -> &mut LobbyStore {
        match variant {
            GameVariant::CardFlip => &mut self.cardflip,
            GameVariant::Simon => &mut self.simon,
            GameVariant::Nrg => &mut self.nrg,
        }
    }

    /// Inserts a fresh lobby for `participants` and indexes each of them.
    pub fn create(&mut self, variant: GameVariant, participants: Vec<ClientId>) -> LobbyCode {
        let mut code = generate_lobby_code();
        while self.store(variant).get(&code).is_some() {
            code = generate_lobby_code();
        }

        for &client_id in &participants {
            self.client_lobbies
                .insert(client_id, (variant, code.clone()));
        }
        self.store_mut(variant)
            .insert(Lobby::new(code.clone(), variant, participants));
        code
    }

    pub fn lobby_of(&self, client_id: ClientId) -> Option<(GameVariant, &LobbyCode)> {
        self.client_lobbies
            .get(&client_id)
            .map(|(variant, code)| (*variant, code))
    }

    /// Code of the client's lobby, only if it belongs to the given variant's store.
    pub fn find_code(&self, variant: GameVariant, client_id: ClientId) -> Option<LobbyCode> {
        match self.client_lobbies.get(&client_id) {
            Some((indexed, code)) if *indexed == variant => Some(code.clone()),
            _ => None,
        }
    }

    pub fn get(&self, variant: GameVariant, code: &str) -> Option<&Lobby> {
        self.store(variant).get(code)
    }

    pub fn get_mut(&mut self, variant: GameVariant, code: &str) -> Option<&mut Lobby> {
        self.store_mut(variant).get_mut(code)
    }

    /// Removes a resolved lobby and drops its participants from the index.
    pub fn remove(&mut self, variant: GameVariant, code: &str) -> Option<Lobby> {
        let lobby = self.store_mut(variant).remove(code)?;
        for client_id in lobby.participants() {
            self.client_lobbies.remove(client_id);
        }
        Some(lobby)
    }

    /// Takes a client out of whatever lobby it is in, returning that lobby's key.
    pub fn remove_participant(&mut self, client_id: ClientId) -> Option<(GameVariant, LobbyCode)> {
        let (variant, code) = self.client_lobbies.remove(&client_id)?;
        if let Some(lobby) = self.store_mut(variant).get_mut(&code) {
            lobby.remove_participant(client_id);
        }
        Some((variant, code))
    }

    pub fn total_lobbies(&self) -> usize {
        GameVariant::ALL
            .iter()
            .map(|&variant| self.store(variant).len())
            .sum()
    }
}

/// Generate a simple 5-character lobby code
fn generate_lobby_code() -> LobbyCode {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::rng();
    (0..5)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_create_indexes_participants() {
        let mut stores = LobbyStores::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let code = stores.create(GameVariant::Simon, vec![a, b]);

        assert_eq!(code.len(), 5);
        assert_eq!(stores.lobby_of(a), Some((GameVariant::Simon, &code)));
        assert_eq!(stores.lobby_of(b), Some((GameVariant::Simon, &code)));
        assert_eq!(stores.store(GameVariant::Simon).len(), 1);
        assert_eq!(stores.store(GameVariant::Nrg).len(), 0);
        assert_eq!(stores.store(GameVariant::CardFlip).len(), 0);
    }

    #[test]
    fn test_find_code_respects_variant() {
        let mut stores = LobbyStores::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let code = stores.create(GameVariant::Nrg, vec![a, b]);

        assert_eq!(stores.find_code(GameVariant::Nrg, a), Some(code));
        assert_eq!(stores.find_code(GameVariant::Simon, a), None);
        assert_eq!(stores.find_code(GameVariant::CardFlip, a), None);
        assert_eq!(stores.find_code(GameVariant::Nrg, Uuid::new_v4()), None);
    }

    #[test]
    fn test_remove_happens_once() {
        let mut stores = LobbyStores::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let code = stores.create(GameVariant::CardFlip, vec![a, b]);

        let removed = stores.remove(GameVariant::CardFlip, &code).unwrap();
        assert_eq!(removed.participants(), &[a, b]);
        assert!(stores.remove(GameVariant::CardFlip, &code).is_none());
        assert!(stores.lobby_of(a).is_none());
        assert!(stores.lobby_of(b).is_none());
        assert_eq!(stores.total_lobbies(), 0);
    }

    #[test]
    fn test_remove_participant_keeps_lobby_for_others() {
        let mut stores = LobbyStores::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let code = stores.create(GameVariant::Simon, vec![a, b]);

        assert_eq!(
            stores.remove_participant(a),
            Some((GameVariant::Simon, code.clone()))
        );
        assert!(stores.remove_participant(a).is_none());

        let lobby = stores.get(GameVariant::Simon, &code).unwrap();
        assert_eq!(lobby.participants(), &[b]);
        assert!(stores.lobby_of(b).is_some());
    }

    #[test]
    fn test_separate_lobbies_per_store() {
        let mut stores = LobbyStores::new();
        let clients: Vec<ClientId> = (0..6).map(|_| Uuid::new_v4()).collect();
        stores.create(GameVariant::CardFlip, clients[0..2].to_vec());
        stores.create(GameVariant::Simon, clients[2..4].to_vec());
        stores.create(GameVariant::Simon, clients[4..6].to_vec());

        assert_eq!(stores.total_lobbies(), 3);
        assert_eq!(stores.store(GameVariant::Simon).len(), 2);
        assert_eq!(stores.store(GameVariant::Simon).variant(), GameVariant::Simon);
    }
}
