/// Property-based tests for cards, shuffling and the elimination judge
///
/// These tests check the card model and the round judge across randomly
/// generated values, plus whole seeded games for their end-of-game
/// guarantees.
use card_table::{
    Card, Dealer, Game, GameOutcome, Player, Suit, Table, TableConfig, TerminalReason,
    constants::{DECK_SIZE, JOKER_VALUE},
    entities::{Deck, PlayerId, Score, Value},
    game::{Contender, Verdict, judge},
};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use std::{sync::Arc, time::Duration};

fn suit_strategy() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Spade),
        Just(Suit::Heart),
        Just(Suit::Diamond),
        Just(Suit::Club),
        Just(Suit::RedJoker),
        Just(Suit::BlackJoker),
    ]
}

// One to three candidates, as a three-seat table can produce.
fn contenders_strategy() -> impl Strategy<Value = Vec<Contender>> {
    prop::collection::vec(50u32..=120, 1..=3).prop_map(|scores| {
        scores
            .into_iter()
            .enumerate()
            .map(|(i, score)| Contender::new(PlayerId(i), score))
            .collect()
    })
}

fn sorted(deck: &Deck) -> Vec<Card> {
    let mut cards = deck.cards().to_vec();
    cards.sort();
    cards
}

proptest! {
    #[test]
    fn test_card_construction_matches_suit_rules(value in any::<Value>(), suit in suit_strategy()) {
        let expected = if suit.is_joker() {
            value == JOKER_VALUE
        } else {
            (1..=13).contains(&value)
        };
        prop_assert_eq!(Card::new(value, suit).is_ok(), expected);
    }

    #[test]
    fn test_shuffle_is_a_permutation(seed in any::<u64>()) {
        let original = Deck::default();
        let mut shuffled = original.clone();
        shuffled.shuffle_with(&mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(shuffled.len(), DECK_SIZE);
        prop_assert_eq!(sorted(&shuffled), sorted(&original));
    }

    #[test]
    fn test_dealer_never_deals_a_card_twice(seed in any::<u64>(), draws in 0usize..=DECK_SIZE) {
        let mut deck = Deck::default();
        let mut dealer = Dealer::new();
        dealer.shuffle(&mut deck, &mut StdRng::seed_from_u64(seed));

        let mut dealt: Vec<Card> = (0..draws).map(|_| dealer.deal_card(&deck).unwrap()).collect();
        prop_assert_eq!(dealer.remaining(&deck), DECK_SIZE - draws);
        dealt.sort();
        dealt.dedup();
        prop_assert_eq!(dealt.len(), draws);
    }

    #[test]
    fn test_judge_survivors_are_candidates(candidates in contenders_strategy()) {
        let ids: Vec<_> = candidates.iter().map(|c| c.id).collect();
        let survivors = judge(&candidates).survivors();

        prop_assert!(!survivors.is_empty());
        prop_assert!(survivors.iter().all(|id| ids.contains(id)));
    }

    #[test]
    fn test_judge_never_drops_the_top_score(candidates in contenders_strategy()) {
        let top: Score = candidates.iter().map(|c| c.score).max().unwrap();
        let survivors = judge(&candidates).survivors();

        for contender in candidates.iter().filter(|c| c.score == top) {
            prop_assert!(survivors.contains(&contender.id));
        }
    }

    #[test]
    fn test_judge_winner_iff_unique_top(candidates in contenders_strategy()) {
        let top: Score = candidates.iter().map(|c| c.score).max().unwrap();
        let leaders = candidates.iter().filter(|c| c.score == top).count();

        match judge(&candidates) {
            Verdict::Winner(id) => {
                prop_assert_eq!(leaders, 1);
                let winner = candidates.iter().find(|c| c.id == id).unwrap();
                prop_assert_eq!(winner.score, top);
            }
            Verdict::TieBreak(ids) => {
                prop_assert!(leaders > 1);
                prop_assert_eq!(ids.len(), leaders);
            }
            Verdict::NoCandidates => prop_assert!(false, "candidates were given"),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_seeded_games_end_cleanly(seed in any::<u64>(), seats in 1usize..=3, win_score in 20u32..=80) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        let outcome = runtime.block_on(async {
            let config = TableConfig {
                win_score,
                seed: Some(seed),
                ..TableConfig::default()
            };
            let table = Arc::new(Table::new(config).unwrap());
            let dealer = table.register_dealer(Dealer::new()).await.unwrap();
            let mut players = Vec::new();
            for i in 0..seats {
                players.push(table.register_player(Player::new(format!("player-{i}"))).await.unwrap());
            }
            let mut game = Game::launch(table, dealer, players);
            let outcome = tokio::time::timeout(Duration::from_secs(10), game.wait())
                .await
                .unwrap()
                .unwrap();
            game.shutdown().await;
            outcome
        });

        match &outcome {
            GameOutcome::SingleWinner { winner, .. } => {
                prop_assert!(winner.score >= win_score);
            }
            GameOutcome::AllWinners { winners, .. } => {
                prop_assert!(!winners.is_empty());
                prop_assert!(winners.len() <= seats);
            }
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
        prop_assert!(matches!(
            outcome.reason(),
            TerminalReason::SingleWinner | TerminalReason::AllWinners
        ));
    }
}
