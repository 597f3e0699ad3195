/// Integration tests for whole games
///
/// These tests run the dealer and players on their own tasks and check how
/// games end: outright winners, shared wins when the deck runs short, empty
/// tables, and cancellation.
use std::{sync::Arc, time::Duration};

use card_table::{
    Card, Dealer, Game, GameOutcome, GamePhase, Player, Suit, Table, TableConfig, TableError,
    TerminalReason,
    entities::{Deck, Score, Username},
};
use tokio::time::timeout;

const GAME_TIMEOUT: Duration = Duration::from_secs(10);

fn unshuffled(win_score: Score) -> TableConfig {
    TableConfig {
        win_score,
        shuffle: false,
        ..TableConfig::default()
    }
}

/// Seats a dealer and every named player that fits, then launches the game.
async fn launch(config: TableConfig, names: &[&str]) -> Game {
    let table = Arc::new(Table::new(config).unwrap());
    let dealer = table.register_dealer(Dealer::new()).await.unwrap();
    let mut players = Vec::new();
    for name in names {
        if let Ok(seat) = table.register_player(Player::new(*name)).await {
            players.push(seat);
        }
    }
    Game::launch(table, dealer, players)
}

async fn finish(mut game: Game) -> (GameOutcome, Game) {
    let outcome = timeout(GAME_TIMEOUT, game.wait())
        .await
        .expect("game should finish")
        .expect("game should not fail");
    (outcome, game)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_players_unshuffled_deck() {
    // player-0 draws the odd spades, player-1 the even ones. After seven
    // rounds they hold 49 and 43 (player-1's seventh card is the ace of
    // hearts); round eight brings the 2 and 3 of hearts: 51 against 46.
    let game = launch(unshuffled(50), &["player-0", "player-1"]).await;
    let (outcome, game) = finish(game).await;

    match &outcome {
        GameOutcome::SingleWinner { winner, rounds } => {
            assert_eq!(winner.name, Username::new("player-0"));
            assert_eq!(winner.score, 51);
            assert_eq!(winner.cards.len(), 8);
            assert_eq!(*rounds, 8);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let snapshot = game.table().snapshot().await;
    let loser = snapshot
        .players
        .iter()
        .find(|s| s.name == Username::new("player-1"))
        .unwrap();
    assert_eq!(loser.score, 46);
    assert_eq!(
        snapshot.phase,
        GamePhase::Terminal(TerminalReason::SingleWinner)
    );
    game.shutdown().await;
}

#[tokio::test]
async fn test_no_players() {
    let game = launch(TableConfig::default(), &[]).await;
    let (outcome, game) = finish(game).await;
    assert_eq!(outcome, GameOutcome::NoPlayers);
    assert_eq!(game.table().snapshot().await.round, 0);
    game.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_everyone_wins_when_deck_runs_out() {
    let game = launch(unshuffled(10_000), &["a", "b", "c"]).await;
    let (outcome, game) = finish(game).await;

    assert_eq!(outcome.reason(), TerminalReason::AllWinners);
    let names: Vec<_> = outcome.winners().iter().map(|s| s.name.to_string()).collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert_eq!(game.table().snapshot().await.remaining_cards, 0);
    game.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fourth_player_is_left_out() {
    let game = launch(
        unshuffled(50),
        &["player-0", "player-1", "player-2", "player-3"],
    )
    .await;
    let (outcome, game) = finish(game).await;

    // Three seats, dealt in order: after round eight the totals are 53, 48
    // and 56, so player-0 and player-2 are candidates and the higher wins.
    match &outcome {
        GameOutcome::SingleWinner { winner, rounds } => {
            assert_eq!(winner.name, Username::new("player-2"));
            assert_eq!(winner.score, 56);
            assert_eq!(*rounds, 8);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    let snapshot = game.table().snapshot().await;
    assert_eq!(snapshot.players.len(), 3);
    assert!(
        snapshot
            .players
            .iter()
            .all(|s| s.name != Username::new("player-3"))
    );
    game.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_interrupts_waiting_dealer() {
    let table = Arc::new(Table::new(unshuffled(50)).unwrap());
    let dealer = table.register_dealer(Dealer::new()).await.unwrap();
    // Seated but never launched: the dealer will wait for a report that
    // never comes.
    let _silent = table.register_player(Player::new("silent")).await.unwrap();

    let mut game = Game::launch(Arc::clone(&table), dealer, Vec::new());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(game.table().terminal_reason().await.is_none());

    game.cancel();
    let outcome = timeout(GAME_TIMEOUT, game.wait()).await.unwrap();
    assert_eq!(outcome, Ok(GameOutcome::Interrupted));
    assert_eq!(
        table.terminal_reason().await,
        Some(TerminalReason::Interrupted)
    );

    // The result stays available.
    assert_eq!(game.wait().await, Ok(GameOutcome::Interrupted));
    game.shutdown().await;
}

#[tokio::test]
async fn test_replaced_dealer_seat_is_interrupted() {
    let table = Arc::new(Table::new(unshuffled(50)).unwrap());
    let dealer = table.register_dealer(Dealer::new()).await.unwrap();
    let player = table.register_player(Player::new("alice")).await.unwrap();
    // Replacing the dealer closes the first seat, so a game driven from it
    // never hears the round's reports.
    let _replacement = table.register_dealer(Dealer::new()).await.unwrap();

    let mut game = Game::launch(table, dealer, vec![player]);
    let outcome = timeout(GAME_TIMEOUT, game.wait()).await.unwrap();
    assert_eq!(outcome, Ok(GameOutcome::Interrupted));
    game.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_games_do_not_share_completion() {
    let first = launch(unshuffled(50), &["player-0", "player-1"]);
    let second = launch(TableConfig::default(), &[]);
    let (first, second) = tokio::join!(first, second);

    let ((first_outcome, first), (second_outcome, second)) =
        tokio::join!(finish(first), finish(second));
    assert_eq!(first_outcome.reason(), TerminalReason::SingleWinner);
    assert_eq!(second_outcome, GameOutcome::NoPlayers);

    first.shutdown().await;
    second.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_seeded_shuffle_is_repeatable() {
    let config = TableConfig {
        seed: Some(2024),
        ..TableConfig::default()
    };
    let (a, game_a) = finish(launch(config.clone(), &["x", "y", "z"]).await).await;
    let (b, game_b) = finish(launch(config, &["x", "y", "z"]).await).await;
    assert_eq!(a, b);

    game_a.shutdown().await;
    game_b.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_deck_shorter_than_the_table() {
    let deck = Deck::from(vec![Card::new(9, Suit::Heart).unwrap()]);
    let table = Arc::new(Table::with_deck(unshuffled(50), deck).unwrap());
    let dealer = table.register_dealer(Dealer::new()).await.unwrap();
    let mut players = Vec::new();
    for name in ["alice", "bob"] {
        players.push(table.register_player(Player::new(name)).await.unwrap());
    }

    let (outcome, game) = finish(Game::launch(table, dealer, players)).await;
    match &outcome {
        GameOutcome::AllWinners { winners, rounds } => {
            assert_eq!(*rounds, 0);
            assert_eq!(winners.len(), 2);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let snapshot = game.table().snapshot().await;
    assert_eq!(snapshot.round, 0);
    assert_eq!(
        snapshot.phase,
        GamePhase::Terminal(TerminalReason::AllWinners)
    );
    assert!(snapshot.players.iter().all(|s| s.cards.is_empty()));
    game.shutdown().await;
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = TableConfig {
        max_players: 5,
        ..TableConfig::default()
    };
    assert!(matches!(
        Table::new(config),
        Err(TableError::InvalidConfig(_))
    ));
}
