//! Table configuration models.

use serde::{Deserialize, Serialize};

use crate::game::{
    TableError,
    constants::{DEFAULT_WIN_SCORE, MAX_PLAYERS},
    entities::Score,
};

/// How much the table says about each round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Round transitions, eliminations and winners.
    #[default]
    Summary,
    /// Also dumps every candidate's hand when a round is judged.
    Detailed,
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verbosity::Summary => write!(f, "summary"),
            Verbosity::Detailed => write!(f, "detailed"),
        }
    }
}

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Maximum number of seated players (default: 3)
    pub max_players: usize,

    /// Score a player needs to become a candidate (default: 50)
    pub win_score: Score,

    /// Progress line detail
    pub verbosity: Verbosity,

    /// Whether the dealer shuffles before the first round
    pub shuffle: bool,

    /// Seed for the shuffle; `None` draws from the thread RNG
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_players: MAX_PLAYERS,
            win_score: DEFAULT_WIN_SCORE,
            verbosity: Verbosity::Summary,
            shuffle: true,
            seed: None,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), TableError> {
        if self.max_players == 0 || self.max_players > MAX_PLAYERS {
            return Err(TableError::InvalidConfig(format!(
                "max players must be between 1 and {MAX_PLAYERS}"
            )));
        }

        if self.win_score == 0 {
            return Err(TableError::InvalidConfig(
                "win score must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_detailed(&self) -> bool {
        self.verbosity == Verbosity::Detailed
    }
}
