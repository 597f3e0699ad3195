//! Dealer and player loops, and the [`Game`] that runs them.
//!
//! Each participant runs on its own task. A shared `watch` channel cancels
//! them all; the dealer's result is handed back through a `oneshot` owned by
//! the [`Game`], so several games can run side by side.

use log::{debug, error, info};
use std::sync::Arc;
use tokio::{
    sync::{oneshot, watch},
    task::JoinSet,
};

use super::{
    coordinator::{Deal, DealerSeat, PlayerSeat, Table},
    messages::{ReportStatus, Wakeup},
};
use crate::game::{GameOutcome, TableError};

type Completion = Result<GameOutcome, TableError>;

impl DealerSeat {
    /// Drives the game until it ends or is cancelled. An error leaves the
    /// table in a failed terminal phase.
    pub async fn run(
        mut self,
        table: Arc<Table>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Completion {
        let result = self.play(&table, &mut shutdown).await;
        if let Err(e) = &result {
            table.fail(e).await;
        }
        result
    }

    async fn play(&mut self, table: &Table, shutdown: &mut watch::Receiver<bool>) -> Completion {
        if let Some(outcome) = table.start().await? {
            return Ok(outcome);
        }

        loop {
            let round = match table.deal_round(self).await? {
                Deal::Round(round) => round,
                Deal::Over(outcome) => return Ok(outcome),
            };
            debug!("round {round} dealt, waiting for reports");
            if !self.await_reports(round, shutdown).await {
                info!("Dealer quits the game.");
                return Ok(table.interrupt().await);
            }
            if let Some(outcome) = table.evaluate().await {
                return Ok(outcome);
            }
        }
    }

    /// Parks until the last report of `round` arrives. Returns false when
    /// cancelled or when the table closed the slot.
    async fn await_reports(&mut self, round: u32, shutdown: &mut watch::Receiver<bool>) -> bool {
        loop {
            tokio::select! {
                wakeup = self.slot.wait() => match wakeup {
                    Some(Wakeup::RoundReported(reported)) if reported == round => return true,
                    Some(other) => debug!("dealer ignores {other:?} in round {round}"),
                    None => return false,
                },
                _ = shutdown.changed() => return false,
            }
        }
    }
}

impl PlayerSeat {
    /// Reports, parks until the next card, reports again. Ends when the
    /// player is eliminated or the game is cancelled.
    pub async fn run(mut self, table: Arc<Table>, mut shutdown: watch::Receiver<bool>) {
        loop {
            match table.report_score(self.id).await {
                ReportStatus::Out => {
                    info!("{} leaves the table.", self.name);
                    return;
                }
                ReportStatus::Reported { round, candidate } => {
                    debug!("{} reported for round {round} (candidate: {candidate})", self.name);
                }
                ReportStatus::Keepalive | ReportStatus::AlreadyReported => {}
            }

            tokio::select! {
                wakeup = self.slot.wait() => {
                    if wakeup.is_none() {
                        info!("{} leaves the table.", self.name);
                        return;
                    }
                }
                _ = shutdown.changed() => {
                    info!("{} quit the game.", self.name);
                    return;
                }
            }
        }
    }
}

/// A running game: one dealer task and one task per seated player.
pub struct Game {
    table: Arc<Table>,
    shutdown: watch::Sender<bool>,
    completion: oneshot::Receiver<Completion>,
    outcome: Option<Completion>,
    tasks: JoinSet<()>,
}

impl Game {
    /// Spawns every participant on the current runtime.
    pub fn launch(table: Arc<Table>, dealer: DealerSeat, players: Vec<PlayerSeat>) -> Self {
        let (shutdown, _) = watch::channel(false);
        let (done, completion) = oneshot::channel();
        let mut tasks = JoinSet::new();

        let dealer_table = Arc::clone(&table);
        let dealer_shutdown = shutdown.subscribe();
        tasks.spawn(async move {
            let result = dealer.run(dealer_table, dealer_shutdown).await;
            if let Err(e) = &result {
                debug!("dealer stopped with {e}");
            }
            if done.send(result).is_err() {
                debug!("nobody is waiting for the game result");
            }
        });

        for player in players {
            tasks.spawn(player.run(Arc::clone(&table), shutdown.subscribe()));
        }

        Self {
            table,
            shutdown,
            completion,
            outcome: None,
            tasks,
        }
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Waits for the dealer to finish. Safe to call again after it returned.
    pub async fn wait(&mut self) -> Completion {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        let outcome = (&mut self.completion)
            .await
            .unwrap_or(Err(TableError::DealerGone));
        self.outcome = Some(outcome.clone());
        outcome
    }

    /// Tells every participant to stop waiting.
    pub fn cancel(&self) {
        if self.shutdown.send(true).is_err() {
            debug!("every participant already stopped");
        }
    }

    /// Cancels every participant and waits for their tasks to end.
    pub async fn shutdown(mut self) {
        self.cancel();
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                error!("participant task failed: {e}");
            }
        }
    }
}
