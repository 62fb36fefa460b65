use serde::{Deserialize, Serialize};
use serde_json::Number;

// Client to Server Actions
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ClientToServer {
    // Waiting pool actions
    #[serde(rename = "join_lobby")]
    JoinLobby {},
    #[serde(rename = "leave_lobby")]
    LeaveLobby {},

    // Card flip: first to finish wins
    #[serde(rename = "game_won")]
    GameWon {},

    // Score-and-tally games
    #[serde(rename = "simon_score")]
    SimonScore { score: Number },
    #[serde(rename = "nrg_score")]
    NrgScore { score: Number },
}

impl ClientToServer {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
