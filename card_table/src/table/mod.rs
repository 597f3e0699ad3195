//! Table module coordinating one dealer and up to three players.
//!
//! This module implements:
//! - Table: the shared state behind a single lock and the round protocol
//! - Wait slots: one capacity-1 channel per participant for directed wakeups
//! - Dealer and player loops, each on its own Tokio task
//! - Game: launches the participants, reports completion, cancels them
//!
//! ## Example
//!
//! ```no_run
//! use card_table::game::entities::{Dealer, Player};
//! use card_table::table::{Game, Table, TableConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = Arc::new(Table::new(TableConfig::default())?);
//!     let dealer = table.register_dealer(Dealer::new()).await?;
//!     let mut players = Vec::new();
//!     for name in ["alice", "bob"] {
//!         players.push(table.register_player(Player::new(name)).await?);
//!     }
//!
//!     let mut game = Game::launch(table, dealer, players);
//!     let outcome = game.wait().await?;
//!     println!("{outcome}");
//!     game.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod coordinator;
pub mod messages;
pub mod participants;

pub use config::{TableConfig, Verbosity};
pub use coordinator::{Deal, DealerSeat, PlayerSeat, Table, TableSnapshot};
pub use messages::{ReportStatus, Wakeup};
pub use participants::Game;
