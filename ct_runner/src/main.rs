//! Runs one card table game from the command line.
//!
//! One dealer and the requested players are seated on a fresh table, each
//! on its own task. The runner waits for the game to end, gives up after a
//! timeout or on Ctrl-C, and exits non-zero unless the game completed.

mod config;
mod logging;

use std::sync::Arc;

use anyhow::Error;
use card_table::{Dealer, Game, GameOutcome, Player, Table, TableError};
use config::{Overrides, RunnerConfig};
use ctrlc::set_handler;
use log::{debug, error, info, warn};
use pico_args::Arguments;
use tokio::{sync::watch, time::timeout};

const HELP: &str = "\
Run a card table game: one dealer and up to three players race to a score

USAGE:
  ct_runner [OPTIONS]

OPTIONS:
  --players       N        Players asking for a seat     [default: env CT_PLAYERS or 4]
  --win-score     N        Score that makes a candidate  [default: env CT_WIN_SCORE or 50]
  --seed          N        Seed for a repeatable shuffle [default: env CT_SEED or random]
  --timeout-secs  N        Give up after this long       [default: env CT_TIMEOUT_SECS or 30]

FLAGS:
  --no-shuffle             Deal the deck in factory order (env CT_SHUFFLE=false)
  --json                   Print the outcome as JSON
  -v, --verbose            Debug logging and per-hand dumps (env CT_VERBOSE=true)
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log filter, overrides --verbose
  (A .env file in the working directory is loaded first)
";

/// How the wait for the game ended.
enum Ending {
    Completed(GameOutcome),
    Failed(TableError),
    TimedOut,
    Interrupted,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        players: pargs.opt_value_from_str("--players")?,
        win_score: pargs.opt_value_from_str("--win-score")?,
        seed: pargs.opt_value_from_str("--seed")?,
        no_shuffle: pargs.contains("--no-shuffle"),
        timeout_secs: pargs.opt_value_from_str("--timeout-secs")?,
        verbose: pargs.contains(["-v", "--verbose"]),
        json: pargs.contains("--json"),
    };
    let unused = pargs.finish();

    let config = RunnerConfig::from_env(overrides)?;
    config.validate()?;

    logging::init(config.verbose);
    if !unused.is_empty() {
        warn!("Ignoring unknown arguments: {unused:?}");
    }

    // Catching signals for exit.
    let (interrupt, mut interrupted) = watch::channel(false);
    set_handler(move || {
        let _ = interrupt.send(true);
    })?;

    let table = Arc::new(Table::new(config.table.clone())?);
    let dealer = table.register_dealer(Dealer::new()).await?;
    let mut players = Vec::with_capacity(config.player_requests);
    for i in 0..config.player_requests {
        // Rejections are already reported by the table.
        if let Ok(seat) = table.register_player(Player::new(format!("player-{i}"))).await {
            players.push(seat);
        }
    }

    info!(
        "Starting a game with {} player(s), win score {}",
        players.len(),
        config.table.win_score
    );
    let mut game = Game::launch(table, dealer, players);

    let ending = tokio::select! {
        waited = timeout(config.timeout, game.wait()) => match waited {
            Ok(Ok(outcome)) => Ending::Completed(outcome),
            Ok(Err(e)) => Ending::Failed(e),
            Err(_) => Ending::TimedOut,
        },
        _ = interrupted.changed() => Ending::Interrupted,
    };

    let exit_code = match ending {
        Ending::Completed(outcome) => {
            report(&outcome, config.json)?;
            0
        }
        Ending::Failed(e) => {
            error!("Game failed: {e}");
            1
        }
        Ending::TimedOut => {
            warn!("No result after {:?}, stopping the game", config.timeout);
            stop(&mut game, config.json).await?
        }
        Ending::Interrupted => {
            warn!("Interrupted, stopping the game");
            stop(&mut game, config.json).await?
        }
    };

    game.shutdown().await;
    debug!("every participant stopped");
    std::process::exit(exit_code);
}

/// Cancels every participant and reports whatever the dealer ended with.
async fn stop(game: &mut Game, json: bool) -> Result<i32, Error> {
    game.cancel();
    match game.wait().await {
        Ok(outcome) => report(&outcome, json)?,
        Err(e) => debug!("dealer ended with {e}"),
    }
    Ok(1)
}

fn report(outcome: &GameOutcome, json: bool) -> Result<(), Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        info!("{outcome}");
    }
    Ok(())
}
