use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameVariant {
    #[serde(rename = "cardflip")]
    CardFlip,
    #[serde(rename = "simon")]
    Simon,
    #[serde(rename = "nrg")]
    Nrg,
}

/// How a lobby's round comes to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRule {
    /// The first participant to report a win ends the round for everyone.
    FirstToWin,
    /// The round ends once every participant has reported a score.
    AllScored,
}

impl GameVariant {
    pub const ALL: [GameVariant; 3] = [GameVariant::CardFlip, GameVariant::Simon, GameVariant::Nrg];

    pub fn completion_rule(&self) -> CompletionRule {
        match self {
            GameVariant::CardFlip => CompletionRule::FirstToWin,
            GameVariant::Simon | GameVariant::Nrg => CompletionRule::AllScored,
        }
    }

    /// Uniformly random pick among all variants
    pub fn random() -> Self {
        let mut rng = rand::rng();
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameVariant::CardFlip => "cardflip",
            GameVariant::Simon => "simon",
            GameVariant::Nrg => "nrg",
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_completion_rules() {
        assert_eq!(GameVariant::CardFlip.completion_rule(), CompletionRule::FirstToWin);
        assert_eq!(GameVariant::Simon.completion_rule(), CompletionRule::AllScored);
        assert_eq!(GameVariant::Nrg.completion_rule(), CompletionRule::AllScored);
    }

    #[test]
    fn test_random_covers_every_variant() {
        let seen: HashSet<GameVariant> = (0..500).map(|_| GameVariant::random()).collect();
        assert_eq!(seen.len(), GameVariant::ALL.len());
    }

    #[test]
    fn test_names_match_wire_format() {
        for variant in GameVariant::ALL {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, format!("\"{}\"", variant));
        }
    }
}
