//! Elimination rules applied to the players that crossed the win threshold.
//!
//! The judge only ever sees the candidates of the current round. Players
//! below the threshold are not its concern: the table drops them whenever
//! at least one candidate exists.

use serde::Serialize;

use super::entities::{PlayerId, Score};

/// A player that reported a score at or above the threshold this round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Contender {
    pub id: PlayerId,
    pub score: Score,
}

impl Contender {
    pub fn new(id: PlayerId, score: Score) -> Self {
        Self { id, score }
    }
}

/// Result of judging one round's candidates.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Verdict {
    /// Nobody crossed the threshold; every seated player keeps going.
    NoCandidates,
    /// Exactly one player is left standing.
    Winner(PlayerId),
    /// Tied candidates play on; everyone else is out. Ids keep the order
    /// the candidates reported in.
    TieBreak(Vec<PlayerId>),
}

impl Verdict {
    pub fn survivors(&self) -> Vec<PlayerId> {
        match self {
            Self::NoCandidates => Vec::new(),
            Self::Winner(id) => vec![*id],
            Self::TieBreak(ids) => ids.clone(),
        }
    }
}

/// Decides who survives a round.
///
/// * one candidate wins outright;
/// * two candidates: the higher score wins, equal scores both play on;
/// * three candidates, ranked by score: a strictly highest score wins, three
///   equal scores all play on, a tie at the top drops the third.
///
/// Any other shape (only reachable past the table's capacity) leaves the
/// candidates untouched.
pub fn judge(candidates: &[Contender]) -> Verdict {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let keep = |dropped: &[PlayerId]| {
        let survivors: Vec<_> = candidates
            .iter()
            .map(|c| c.id)
            .filter(|id| !dropped.contains(id))
            .collect();
        match survivors.as_slice() {
            [winner] => Verdict::Winner(*winner),
            _ => Verdict::TieBreak(survivors),
        }
    };

    match ranked.as_slice() {
        [] => Verdict::NoCandidates,
        [only] => Verdict::Winner(only.id),
        [first, second] => {
            if first.score == second.score {
                keep(&[])
            } else {
                keep(&[second.id])
            }
        }
        [first, second, third] => {
            if first.score > second.score {
                keep(&[second.id, third.id])
            } else if first.score == third.score {
                keep(&[])
            } else if first.score == second.score {
                keep(&[third.id])
            } else {
                keep(&[])
            }
        }
        _ => keep(&[]),
    }
}
