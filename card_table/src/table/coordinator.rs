//! Shared table state and the round protocol.
//!
//! One [`tokio::sync::Mutex`] guards everything: the deck, the seated
//! players, the candidates of the current round, the started flag and the
//! report counter. Participants never hold it while parked.
//!
//! A round is a barrier between the dealer and the active players:
//!
//! 1. the dealer deals one card to every active player, in seat order, and
//!    wakes each of them;
//! 2. every player reports once; the last report wakes the dealer;
//! 3. the dealer judges the candidates and either ends the game or deals
//!    again.

use log::{debug, error, info, warn};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use tokio::sync::Mutex;

use super::{
    config::TableConfig,
    messages::{ReportStatus, SlotSender, WaitSlot, Wakeup, wait_slot},
};
use crate::game::{
    GameOutcome, GamePhase, TableError, TerminalReason,
    entities::{Dealer, Deck, Player, PlayerId, Score, Standing, Username},
    scoring::{Contender, Verdict, judge},
};

/// Handle given to the dealer when it joins a table.
#[derive(Debug)]
pub struct DealerSeat {
    pub(super) slot: WaitSlot,
}

/// Handle given to a player when it joins a table.
#[derive(Debug)]
pub struct PlayerSeat {
    pub(super) id: PlayerId,
    pub(super) name: Username,
    pub(super) slot: WaitSlot,
}

impl PlayerSeat {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &Username {
        &self.name
    }
}

/// Point-in-time view of a table, taken under the lock.
#[derive(Clone, Debug, Serialize)]
pub struct TableSnapshot {
    pub phase: GamePhase,
    pub round: u32,
    pub started: bool,
    pub reported: usize,
    pub remaining_cards: usize,
    pub players: Vec<Standing>,
    pub candidates: Vec<Username>,
}

/// What a call to [`Table::deal_round`] did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Deal {
    /// Every active player got a card for this round.
    Round(u32),
    /// Too few cards were left to deal a round; the game is over.
    Over(GameOutcome),
}

#[derive(Debug)]
struct Seat {
    player: Player,
    /// Dropped when the player is eliminated so its task stops parking.
    slot: Option<SlotSender>,
    last_reported_round: u32,
}

#[derive(Debug)]
struct DealerEntry {
    dealer: Dealer,
    slot: SlotSender,
}

#[derive(Debug, Default)]
struct TableState {
    deck: Deck,
    /// Every player that ever sat down, indexed by [`PlayerId`].
    seats: Vec<Seat>,
    /// Players still in the game, in dealing order.
    players: Vec<PlayerId>,
    dealer: Option<DealerEntry>,
    candidates: Vec<PlayerId>,
    started: bool,
    reported: usize,
    round: u32,
    phase: GamePhase,
}

impl TableState {
    fn seat(&self, id: PlayerId) -> &Seat {
        &self.seats[id.0]
    }

    fn standings(&self, ids: &[PlayerId]) -> Vec<Standing> {
        ids.iter().map(|&id| self.seat(id).player.standing()).collect()
    }

    fn remaining_cards(&self) -> usize {
        self.dealer
            .as_ref()
            .map_or(self.deck.len(), |entry| entry.dealer.remaining(&self.deck))
    }

    /// Ends the game with everyone still seated as winners when the deck
    /// can't give each of them another card.
    fn finish_if_short(&mut self) -> Option<GameOutcome> {
        if self.remaining_cards() >= self.players.len() {
            return None;
        }
        let winners = self.standings(&self.players);
        let rounds = self.round;
        Some(self.finish(GameOutcome::AllWinners { winners, rounds }))
    }

    fn finish(&mut self, outcome: GameOutcome) -> GameOutcome {
        self.phase = GamePhase::Terminal(outcome.reason());
        match &outcome {
            GameOutcome::NoPlayers => warn!("There is no player. Game is over."),
            GameOutcome::SingleWinner { winner, rounds } => {
                info!("Game over after {rounds} rounds");
                info!("Winner is {winner}");
            }
            GameOutcome::AllWinners { winners, rounds } => {
                info!(
                    "Game over after {rounds} rounds: no more cards for each player, so you are all winners"
                );
                for winner in winners {
                    info!("Winner is {winner}");
                }
            }
            GameOutcome::Interrupted => warn!("Game was interrupted in round {}", self.round),
        }
        outcome
    }
}

/// The table every participant coordinates through.
#[derive(Debug)]
pub struct Table {
    config: TableConfig,
    state: Mutex<TableState>,
}

impl Table {
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        Self::with_deck(config, Deck::default())
    }

    /// A table dealing from a prepared deck instead of the standard 54 cards.
    pub fn with_deck(config: TableConfig, deck: Deck) -> Result<Self, TableError> {
        config.validate()?;
        Ok(Self {
            config,
            state: Mutex::new(TableState {
                deck,
                ..TableState::default()
            }),
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Seats the dealer, replacing any earlier one until the game starts.
    pub async fn register_dealer(&self, dealer: Dealer) -> Result<DealerSeat, TableError> {
        let mut state = self.state.lock().await;
        if state.started {
            warn!("Game is running, can't replace the dealer");
            return Err(TableError::DealerLocked);
        }
        if state.dealer.is_some() {
            debug!("replacing the table's dealer");
        }
        let (sender, slot) = wait_slot();
        state.dealer = Some(DealerEntry {
            dealer,
            slot: sender,
        });
        Ok(DealerSeat { slot })
    }

    /// Seats a player. Rejected once the game has started or every seat is
    /// taken; the caller decides whether that matters.
    pub async fn register_player(&self, player: Player) -> Result<PlayerSeat, TableError> {
        let mut state = self.state.lock().await;
        let name = player.name().clone();
        if state.started {
            warn!("Game has started, {name} can't join");
            return Err(TableError::GameAlreadyStarted(name));
        }
        if state.players.len() >= self.config.max_players {
            warn!("Sorry {name}, the table is full now. You can watch or join the next game.");
            return Err(TableError::CapacityReached(name));
        }

        let id = PlayerId(state.seats.len());
        let (sender, slot) = wait_slot();
        state.seats.push(Seat {
            player,
            slot: Some(sender),
            last_reported_round: 0,
        });
        state.players.push(id);
        info!("{name} joined the table");
        Ok(PlayerSeat { id, name, slot })
    }

    /// Leaves the lobby. Ends the game at once when nobody sat down,
    /// otherwise shuffles the deck if the table is configured to.
    pub async fn start(&self) -> Result<Option<GameOutcome>, TableError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.dealer.is_none() {
            return Err(TableError::NoDealer);
        }
        if state.players.is_empty() {
            return Ok(Some(state.finish(GameOutcome::NoPlayers)));
        }

        let entry = state.dealer.as_mut().ok_or(TableError::NoDealer)?;
        if self.config.shuffle {
            info!("Shuffle the cards at first.");
            match self.config.seed {
                Some(seed) => entry
                    .dealer
                    .shuffle(&mut state.deck, &mut StdRng::seed_from_u64(seed)),
                None => entry.dealer.shuffle(&mut state.deck, &mut rand::rng()),
            }
        }
        info!("Starting to send cards to {} players.", state.players.len());
        state.phase = GamePhase::Dealing;
        Ok(None)
    }

    /// Deals one card to every active player in seat order and wakes each
    /// of them.
    ///
    /// When fewer cards are left than active players nothing is dealt and
    /// everyone still seated wins. Takes the dealer's seat so that pings left
    /// over from the lobby are discarded while the lock is held: once
    /// `started` is set no player sends another one.
    pub async fn deal_round(&self, seat: &mut DealerSeat) -> Result<Deal, TableError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.phase.is_terminal() {
            return Err(TableError::GameOver);
        }
        if state.dealer.is_none() {
            return Err(TableError::NoDealer);
        }

        state.started = true;
        let drained = seat.slot.drain();
        if drained > 0 {
            debug!("discarded {drained} stale dealer wakeup(s)");
        }
        if let Some(outcome) = state.finish_if_short() {
            return Ok(Deal::Over(outcome));
        }

        let entry = state.dealer.as_mut().ok_or(TableError::NoDealer)?;
        state.phase = GamePhase::Dealing;
        state.reported = 0;
        state.round += 1;
        let round = state.round;

        for &id in &state.players {
            let card = entry.dealer.deal_card(&state.deck)?;
            let target = &mut state.seats[id.0];
            target.player.add_card(card);
            debug!("round {round}: {} gets {card}", target.player.name());
            let delivered = target
                .slot
                .as_ref()
                .is_some_and(|slot| slot.signal(Wakeup::CardDealt(round)));
            if !delivered {
                debug!("{} is no longer listening", target.player.name());
            }
        }

        state.phase = GamePhase::AwaitingReports;
        Ok(Deal::Round(round))
    }

    /// A player checks in. Before the first deal this only pings the dealer.
    /// Afterwards each player counts once per round, joins the candidates
    /// when its score reaches the threshold, and the last one to report
    /// wakes the dealer.
    pub async fn report_score(&self, id: PlayerId) -> ReportStatus {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if !state.players.contains(&id) {
            return ReportStatus::Out;
        }

        if !state.started {
            if let Some(entry) = &state.dealer {
                entry.slot.signal(Wakeup::Keepalive);
            }
            return ReportStatus::Keepalive;
        }

        let round = state.round;
        let seat = &mut state.seats[id.0];
        if seat.last_reported_round >= round {
            return ReportStatus::AlreadyReported;
        }
        seat.last_reported_round = round;

        let candidate = seat.player.score() >= self.config.win_score;
        if candidate {
            state.candidates.push(id);
        }
        state.reported += 1;

        if state.reported == state.players.len() {
            state.phase = GamePhase::Evaluating;
            match &state.dealer {
                Some(entry) => {
                    entry.slot.signal(Wakeup::RoundReported(round));
                }
                None => error!("round {round} is complete but the table has no dealer"),
            }
        }

        ReportStatus::Reported { round, candidate }
    }

    /// Judges the round's candidates, drops whoever lost, and checks there
    /// are enough cards left for another round. Returns the outcome when the
    /// game is over.
    pub async fn evaluate(&self) -> Option<GameOutcome> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.phase = GamePhase::Evaluating;
        let rounds = state.round;

        if !state.candidates.is_empty() {
            info!(
                "{} player(s) scored at least {}",
                state.candidates.len(),
                self.config.win_score
            );
            if self.config.is_detailed() {
                let mut ranked = state.standings(&state.candidates);
                ranked.sort_by(|a, b| b.score.cmp(&a.score));
                for standing in ranked {
                    info!("  {standing}");
                }
            }

            let contenders: Vec<_> = state
                .candidates
                .iter()
                .map(|&id| Contender::new(id, state.seat(id).player.score()))
                .collect();

            let verdict = judge(&contenders);
            if let Verdict::Winner(id) = verdict {
                let winner = state.seat(id).player.standing();
                return Some(state.finish(GameOutcome::SingleWinner { winner, rounds }));
            }

            let survivors = verdict.survivors();
            let (kept, dropped): (Vec<_>, Vec<_>) = state
                .players
                .iter()
                .copied()
                .partition(|id| survivors.contains(id));
            for id in dropped {
                let seat = &mut state.seats[id.0];
                info!(
                    "{} is out with a score of {}",
                    seat.player.name(),
                    seat.player.score()
                );
                seat.slot = None;
            }
            state.players = kept;
            state.candidates.clear();
        }

        info!("Next round with {} players.", state.players.len());
        if let Some(outcome) = state.finish_if_short() {
            return Some(outcome);
        }
        state.phase = GamePhase::Dealing;
        None
    }

    /// Marks the game as interrupted unless it already ended.
    pub async fn interrupt(&self) -> GameOutcome {
        let mut state = self.state.lock().await;
        if !state.phase.is_terminal() {
            state.finish(GameOutcome::Interrupted);
        }
        GameOutcome::Interrupted
    }

    /// Marks the game as failed unless it already ended.
    pub async fn fail(&self, err: &TableError) {
        let mut state = self.state.lock().await;
        if !state.phase.is_terminal() {
            error!("Game stopped in round {}: {err}", state.round);
            state.phase = GamePhase::Terminal(TerminalReason::Failed);
        }
    }

    pub async fn phase(&self) -> GamePhase {
        self.state.lock().await.phase
    }

    pub async fn snapshot(&self) -> TableSnapshot {
        let state = self.state.lock().await;
        TableSnapshot {
            phase: state.phase,
            round: state.round,
            started: state.started,
            reported: state.reported,
            remaining_cards: state.remaining_cards(),
            players: state.standings(&state.players),
            candidates: state
                .candidates
                .iter()
                .map(|&id| state.seat(id).player.name().clone())
                .collect(),
        }
    }

    /// Score of a seated or eliminated player.
    pub async fn score_of(&self, id: PlayerId) -> Option<Score> {
        let state = self.state.lock().await;
        state.seats.get(id.0).map(|seat| seat.player.score())
    }

    pub async fn terminal_reason(&self) -> Option<TerminalReason> {
        match self.phase().await {
            GamePhase::Terminal(reason) => Some(reason),
            _ => None,
        }
    }
}
