//! Card game rules, independent of how participants are scheduled.
//!
//! - Card and participant entities
//! - The elimination judge for each round's candidates
//! - Game phases, outcomes and errors

pub mod constants;
pub mod entities;
pub mod scoring;
pub mod state_machine;

pub use scoring::{Contender, Verdict, judge};
pub use state_machine::{GameOutcome, GamePhase, TableError, TerminalReason};
