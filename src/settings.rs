//! Match settings
//!
//! Chosen by the host menu before a match starts; fixed for the whole match.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PLAYERS;
use crate::error::{SimResult, ensure_in_range};

/// AI difficulty tiers, strictly increasing in aggressiveness
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum AiDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Max,
}

impl AiDifficulty {
    pub const ALL: [AiDifficulty; 4] = [
        AiDifficulty::Easy,
        AiDifficulty::Medium,
        AiDifficulty::Hard,
        AiDifficulty::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiDifficulty::Easy => "Easy",
            AiDifficulty::Medium => "Medium",
            AiDifficulty::Hard => "Hard",
            AiDifficulty::Max => "Max",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(AiDifficulty::Easy),
            "medium" | "med" => Some(AiDifficulty::Medium),
            "hard" => Some(AiDifficulty::Hard),
            "max" | "expert" => Some(AiDifficulty::Max),
            _ => None,
        }
    }
}

/// Match settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of human players (1..=4); remaining seats are bots
    pub player_count: usize,
    /// Bot behavior tier
    pub difficulty: AiDifficulty,
    /// RNG seed for the match (None = caller picks one)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_count: 1,
            difficulty: AiDifficulty::Medium,
            seed: None,
        }
    }
}

impl Settings {
    pub fn new(player_count: usize, difficulty: AiDifficulty) -> Self {
        Self {
            player_count,
            difficulty,
            seed: None,
        }
    }

    /// Parse and validate settings from JSON (missing keys use defaults)
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> SimResult<()> {
        ensure_in_range(
            "player_count",
            self.player_count as f32,
            1.0,
            MAX_PLAYERS as f32,
            "[1, 4]",
        )
    }

    /// Whether `player` is seated by a human
    pub fn is_human(&self, player: usize) -> bool {
        player < self.player_count
    }
}
