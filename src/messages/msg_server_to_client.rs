use serde::Serialize;
use serde_json::Number;

use crate::game_variant::GameVariant;

// Server to Client Actions
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ServerToClient {
    // Waiting pool
    #[serde(rename = "update_users")]
    UpdateUsers {
        #[serde(rename = "playerCount")]
        player_count: usize,
    },
    #[serde(rename = "countdown")]
    Countdown { seconds: u32 },
    #[serde(rename = "game_start")]
    GameStart { game: GameVariant },

    // Round results
    #[serde(rename = "game_lost")]
    GameLost {},
    #[serde(rename = "simon_score")]
    SimonScore { score: Number },
    #[serde(rename = "nrg_score")]
    NrgScore { score: Number },
    #[serde(rename = "game_end")]
    GameEnd {},
}

impl ServerToClient {
    /// Wire text of the message; the writer drops anything that fails to encode.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn update_users(player_count: usize) -> Self {
        Self::UpdateUsers { player_count }
    }

    /// Relay of an opponent's score. Card flip has no score messages.
    pub fn score_for(variant: GameVariant, score: Number) -> Option<Self> {
        match variant {
            GameVariant::Simon => Some(Self::SimonScore { score }),
            GameVariant::Nrg => Some(Self::NrgScore { score }),
            GameVariant::CardFlip => None,
        }
    }
}
