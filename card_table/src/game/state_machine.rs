//! Game phases, terminal outcomes and table errors.
//!
//! The dealer is the only participant that moves the game between phases:
//!
//! ```text
//! NotStarted -> Dealing -> AwaitingReports -> Evaluating -+-> Dealing
//!      |                                                  |
//!      +--------------------> Terminal <------------------+
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::entities::{Score, Standing, Username};

/// Errors that can occur while seating participants or dealing.
#[derive(Clone, Debug, Eq, Error, PartialEq, Serialize)]
pub enum TableError {
    #[error("game has started, can't replace the dealer")]
    DealerLocked,
    #[error("game has started, can't add {0}")]
    GameAlreadyStarted(Username),
    #[error("sorry {0}, the table is full")]
    CapacityReached(Username),
    #[error("no dealer has joined the table")]
    NoDealer,
    #[error("no cards are left in the deck")]
    NoCardsLeft,
    #[error("game is already over")]
    GameOver,
    #[error("dealer left before the game finished")]
    DealerGone,
    #[error("invalid table config: {0}")]
    InvalidConfig(String),
}

/// Why a game stopped.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum TerminalReason {
    NoPlayers,
    SingleWinner,
    AllWinners,
    Interrupted,
    /// The dealer stopped on an error.
    Failed,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NoPlayers => "no players",
            Self::SingleWinner => "single winner",
            Self::AllWinners => "all winners",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Dealing,
    AwaitingReports,
    Evaluating,
    Terminal(TerminalReason),
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::Dealing => write!(f, "dealing"),
            Self::AwaitingReports => write!(f, "awaiting reports"),
            Self::Evaluating => write!(f, "evaluating"),
            Self::Terminal(reason) => write!(f, "over ({reason})"),
        }
    }
}

/// How a game ended, with the hands of whoever won.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum GameOutcome {
    NoPlayers,
    SingleWinner { winner: Standing, rounds: u32 },
    AllWinners { winners: Vec<Standing>, rounds: u32 },
    Interrupted,
}

impl GameOutcome {
    pub fn reason(&self) -> TerminalReason {
        match self {
            Self::NoPlayers => TerminalReason::NoPlayers,
            Self::SingleWinner { .. } => TerminalReason::SingleWinner,
            Self::AllWinners { .. } => TerminalReason::AllWinners,
            Self::Interrupted => TerminalReason::Interrupted,
        }
    }

    pub fn winners(&self) -> Vec<&Standing> {
        match self {
            Self::SingleWinner { winner, .. } => vec![winner],
            Self::AllWinners { winners, .. } => winners.iter().collect(),
            Self::NoPlayers | Self::Interrupted => Vec::new(),
        }
    }

    pub fn winning_score(&self) -> Option<Score> {
        self.winners().iter().map(|s| s.score).max()
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPlayers => write!(f, "there is no player, game is over"),
            Self::SingleWinner { winner, rounds } => {
                write!(f, "winner after {rounds} rounds is {}", winner.name)
            }
            Self::AllWinners { winners, rounds } => {
                let names = winners
                    .iter()
                    .map(|s| s.name.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "no more cards for every player after {rounds} rounds, so you are all winners: {names}"
                )
            }
            Self::Interrupted => write!(f, "game was interrupted"),
        }
    }
}
