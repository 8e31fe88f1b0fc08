use crate::cards::Rank;
use crate::config::ConfigError;
use crate::hand::Hand;
use rand::seq::SliceRandom;
use rand::Rng;

/// Copies of each of A, K and Q in a fresh deck.
pub const COPIES_PER_RANK: usize = 6;
/// Copies of the Wild card in a fresh deck.
pub const WILD_COPIES: usize = 2;
/// Total cards in a fresh deck.
pub const DECK_SIZE: usize = 3 * COPIES_PER_RANK + WILD_COPIES;
/// Seat counts the deck composition is designed for.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// The Liar's Bar deck: 6×A, 6×K, 6×Q and 2×Wild.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Rank>,
}

impl Deck {
    /// ```
    /// use liars_bar::cards::Rank;
    /// use liars_bar::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 20);
    /// assert_eq!(deck.count(Rank::Wild), 2);
    /// ```
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for &r in &Rank::TARGETS {
            cards.extend(std::iter::repeat(r).take(COPIES_PER_RANK));
        }
        cards.extend(std::iter::repeat(Rank::Wild).take(WILD_COPIES));
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count(&self, rank: Rank) -> usize {
        self.cards.iter().filter(|&&r| r == rank).count()
    }

    pub fn as_slice(&self) -> &[Rank] {
        &self.cards
    }

    /// Shuffle using the provided RNG implementing Rng.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Shuffle, then cut the deck into `players` contiguous equal slices.
    ///
    /// Each hand holds `DECK_SIZE / players` cards; the remainder stays in
    /// [`Deal::undealt`]. Hands come back sorted.
    pub fn deal<R: Rng + ?Sized>(
        mut self,
        players: usize,
        rng: &mut R,
    ) -> Result<Deal, ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ConfigError::PlayerCount(players));
        }
        self.shuffle_with(rng);
        let per_player = self.cards.len() / players;
        let undealt = self.cards.split_off(per_player * players);
        let hands = self.cards.chunks_exact(per_player).map(|c| Hand::new(c.to_vec())).collect();
        Ok(Deal { hands, undealt })
    }

    /// Like [`Deck::deal`], discarding the undealt remainder.
    pub fn deal_hands<R: Rng + ?Sized>(
        self,
        players: usize,
        rng: &mut R,
    ) -> Result<Vec<Hand>, ConfigError> {
        self.deal(players, rng).map(|d| d.hands)
    }
}

/// Result of one deal: a sorted hand per player plus the cards left over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: Vec<Hand>,
    pub undealt: Vec<Rank>,
}
