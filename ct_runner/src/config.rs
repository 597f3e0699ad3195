//! Runner configuration management.
//!
//! Consolidates the environment variable reads and command-line overrides
//! into one validated configuration.

use card_table::{
    TableConfig, Verbosity,
    constants::{DEFAULT_WIN_SCORE, MAX_PLAYERS},
    entities::Score,
};
use std::time::Duration;

/// Player requests made by default; one more than the table seats, so the
/// capacity rejection shows up in a plain run.
pub const DEFAULT_PLAYER_REQUESTS: usize = MAX_PLAYERS + 1;

/// Seconds to wait for a game before giving up.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Upper bound on player requests; anything past the table's capacity is
/// rejected anyway.
const MAX_PLAYER_REQUESTS: usize = 64;

/// Command-line values that take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub players: Option<usize>,
    pub win_score: Option<Score>,
    pub seed: Option<u64>,
    pub no_shuffle: bool,
    pub timeout_secs: Option<u64>,
    pub verbose: bool,
    pub json: bool,
}

/// Complete runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Settings handed to the table
    pub table: TableConfig,
    /// Number of players asking for a seat
    pub player_requests: usize,
    /// How long to wait for the game to end
    pub timeout: Duration,
    /// Debug logging for the runner and the table
    pub verbose: bool,
    /// Print the outcome as JSON on stdout
    pub json: bool,
}

impl RunnerConfig {
    /// Load configuration from environment variables, then apply overrides
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let player_requests = match overrides.players {
            Some(players) => players,
            None => parse_env("CT_PLAYERS")?.unwrap_or(DEFAULT_PLAYER_REQUESTS),
        };
        let win_score = match overrides.win_score {
            Some(score) => score,
            None => parse_env("CT_WIN_SCORE")?.unwrap_or(DEFAULT_WIN_SCORE),
        };
        let seed = match overrides.seed {
            Some(seed) => Some(seed),
            None => parse_env("CT_SEED")?,
        };
        let shuffle = !overrides.no_shuffle && parse_env("CT_SHUFFLE")?.unwrap_or(true);
        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => parse_env("CT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        let verbose = overrides.verbose || parse_env("CT_VERBOSE")?.unwrap_or(false);

        let table = TableConfig {
            win_score,
            verbosity: if verbose {
                Verbosity::Detailed
            } else {
                Verbosity::Summary
            },
            shuffle,
            seed,
            ..TableConfig::default()
        };

        Ok(RunnerConfig {
            table,
            player_requests,
            timeout: Duration::from_secs(timeout_secs),
            verbose,
            json: overrides.json,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_requests > MAX_PLAYER_REQUESTS {
            return Err(ConfigError::Invalid {
                var: "CT_PLAYERS".to_string(),
                reason: format!("Must be at most {MAX_PLAYER_REQUESTS}"),
            });
        }

        if self.table.win_score == 0 {
            return Err(ConfigError::Invalid {
                var: "CT_WIN_SCORE".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "CT_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parses an optional environment variable. Unset is `None`; set but
/// unparsable is an error.
fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("cannot parse {raw:?}"),
    })
}
