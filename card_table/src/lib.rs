//! # Card Table
//!
//! A dealer and up to three players race to a score threshold, one card per
//! round, coordinating through a single shared table.
//!
//! ## Architecture
//!
//! Every round is a barrier between the dealer and the players:
//!
//! - **Dealing**: the dealer gives each active player one card and wakes it
//! - **Reporting**: each player reports its running score; players at or
//!   above the threshold become candidates; the last report wakes the dealer
//! - **Evaluating**: the candidates are judged; the game ends with a single
//!   winner, keeps the tied candidates for another round, or declares every
//!   remaining player a winner once the deck can't cover another round
//!
//! ## Core Modules
//!
//! - [`game`]: cards, participants, the elimination judge, phases and errors
//! - [`table`]: the shared table, wait slots and participant tasks
//!
//! ## Example
//!
//! ```
//! use card_table::game::{Contender, Verdict, entities::PlayerId, judge};
//!
//! let verdict = judge(&[
//!     Contender::new(PlayerId(0), 100),
//!     Contender::new(PlayerId(1), 80),
//! ]);
//! assert_eq!(verdict, Verdict::Winner(PlayerId(0)));
//! ```

/// Card game rules: entities, scoring and game phases.
pub mod game;
pub use game::{
    GameOutcome, GamePhase, TableError, TerminalReason,
    constants::{self, DEFAULT_WIN_SCORE, MAX_PLAYERS},
    entities::{self, Card, Dealer, Player, Suit},
};

/// Shared table state and participant tasks.
pub mod table;
pub use table::{Game, Table, TableConfig, Verbosity};
