//! Table-wide rule constants.

use super::entities::{Score, Value};

/// A table seats at most this many players.
pub const MAX_PLAYERS: usize = 3;

/// Minimum cumulative score a player needs to become a candidate.
pub const DEFAULT_WIN_SCORE: Score = 50;

/// Both jokers carry this value instead of a 1-13 rank.
pub const JOKER_VALUE: Value = 20;

/// Lowest rank of a standard suit (ace).
pub const MIN_RANK: Value = 1;

/// Highest rank of a standard suit (king).
pub const MAX_RANK: Value = 13;

/// Four standard suits of thirteen ranks plus two jokers.
pub const DECK_SIZE: usize = 54;
