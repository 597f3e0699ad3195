use rand::{Rng, seq::SliceRandom};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::constants::{DECK_SIZE, JOKER_VALUE, MAX_RANK, MIN_RANK};
use super::state_machine::TableError;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
    RedJoker,
    BlackJoker,
}

impl Suit {
    /// The four suits that carry ranked cards, in deck order.
    pub const STANDARD: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    pub fn is_joker(self) -> bool {
        matches!(self, Self::RedJoker | Self::BlackJoker)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Spade => "♠",
            Self::Heart => "♥",
            Self::Diamond => "♦",
            Self::Club => "♣",
            Self::RedJoker => "red joker",
            Self::BlackJoker => "black joker",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// Running total of a player's card values.
pub type Score = u32;

#[derive(Debug, Eq, Error, PartialEq)]
pub enum CardError {
    #[error("{suit:?} can't carry the value {value}")]
    InvalidRank { suit: Suit, value: Value },
}

/// A card is a suit plus a value. Standard suits carry 1 (ace) to 13 (king),
/// jokers always carry [`JOKER_VALUE`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card {
    value: Value,
    suit: Suit,
}

impl Card {
    pub fn new(value: Value, suit: Suit) -> Result<Self, CardError> {
        let valid = if suit.is_joker() {
            value == JOKER_VALUE
        } else {
            (MIN_RANK..=MAX_RANK).contains(&value)
        };
        if valid {
            Ok(Self { value, suit })
        } else {
            Err(CardError::InvalidRank { suit, value })
        }
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.suit.is_joker() {
            return write!(f, "{} ({})", self.suit, self.value);
        }
        match self.value {
            1 => write!(f, "A")?,
            11 => write!(f, "J")?,
            12 => write!(f, "Q")?,
            13 => write!(f, "K")?,
            v => write!(f, "{v}")?,
        }
        write!(f, "/{} ({})", self.suit, self.value)
    }
}

/// The table's full set of cards. Built once per table; the dealer walks it
/// with a cursor rather than removing cards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Card> {
        self.cards.get(idx).copied()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }
}

impl Default for Deck {
    /// Spades, hearts, diamonds and clubs from ace to king, then the black
    /// and red jokers.
    fn default() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::STANDARD {
            for value in MIN_RANK..=MAX_RANK {
                cards.push(Card { value, suit });
            }
        }
        cards.push(Card {
            value: JOKER_VALUE,
            suit: Suit::BlackJoker,
        });
        cards.push(Card {
            value: JOKER_VALUE,
            suit: Suit::RedJoker,
        });
        Self { cards }
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

pub const MAX_NAME_LENGTH: usize = 32;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    /// Whitespace becomes `_` and the name is cut to [`MAX_NAME_LENGTH`]
    /// characters.
    pub fn new(s: &str) -> Self {
        let username: String = s
            .chars()
            .take(MAX_NAME_LENGTH)
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        Self(username)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Stable index of a player within a table. Ids are handed out at
/// registration and never reused.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    name: Username,
    hand: Vec<Card>,
    score: Score,
}

impl Player {
    pub fn new(name: impl Into<Username>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            score: 0,
        }
    }

    pub fn name(&self) -> &Username {
        &self.name
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn add_card(&mut self, card: Card) {
        self.hand.push(card);
        self.score += Score::from(card.value());
    }

    pub fn standing(&self) -> Standing {
        Standing {
            name: self.name.clone(),
            cards: self.hand.clone(),
            score: self.score,
        }
    }
}

/// The dealer owns no cards; it only remembers how far into the table's
/// deck it has dealt.
#[derive(Clone, Debug, Default)]
pub struct Dealer {
    dealt: usize,
}

impl Dealer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dealt(&self) -> usize {
        self.dealt
    }

    pub fn remaining(&self, deck: &Deck) -> usize {
        deck.len().saturating_sub(self.dealt)
    }

    /// Shuffles the deck and starts dealing from its top again.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, deck: &mut Deck, rng: &mut R) {
        deck.shuffle_with(rng);
        self.dealt = 0;
    }

    pub fn deal_card(&mut self, deck: &Deck) -> Result<Card, TableError> {
        let card = deck.get(self.dealt).ok_or(TableError::NoCardsLeft)?;
        self.dealt += 1;
        Ok(card)
    }
}

/// Snapshot of a player's hand, used for progress lines and outcomes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub name: Username,
    pub cards: Vec<Card>,
    pub score: Score,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = self
            .cards
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "{} has {} cards, sum score is {} [{cards}]",
            self.name,
            self.cards.len(),
            self.score
        )
    }
}
