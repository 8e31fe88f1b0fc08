use crate::cards::Rank;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A player's private cards: a multiset of ranks kept in canonical order
/// (A, K, Q, Wild) so that displays and snapshots are deterministic.
///
/// ```
/// use liars_bar::cards::Rank;
/// use liars_bar::hand::Hand;
///
/// let hand = Hand::new(vec![Rank::Wild, Rank::King, Rank::Ace, Rank::King]);
/// assert_eq!(hand.as_slice(), &[Rank::Ace, Rank::King, Rank::King, Rank::Wild]);
/// assert_eq!(hand.count(Rank::King), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hand(Vec<Rank>);

impl Hand {
    pub fn new(mut cards: Vec<Rank>) -> Self {
        cards.sort();
        Self(cards)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Rank] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Rank> + '_ {
        self.0.iter().copied()
    }

    /// Number of copies of `rank` held.
    pub fn count(&self, rank: Rank) -> usize {
        self.0.iter().filter(|&&r| r == rank).count()
    }

    /// Number of cards that would honour a claim of `target` (target + Wild).
    pub fn matching(&self, target: Rank) -> usize {
        self.0.iter().filter(|r| r.matches(target)).count()
    }

    /// Whether `cards`, taken as a multiset, is contained in this hand.
    pub fn contains_all(&self, cards: &[Rank]) -> bool {
        Rank::ALL.iter().all(|&r| cards.iter().filter(|&&c| c == r).count() <= self.count(r))
    }

    /// First rank in `cards` of which more copies are requested than held,
    /// along with the requested and held counts.
    pub fn first_shortfall(&self, cards: &[Rank]) -> Option<(Rank, usize, usize)> {
        Rank::ALL.iter().find_map(|&r| {
            let wanted = cards.iter().filter(|&&c| c == r).count();
            let held = self.count(r);
            (wanted > held).then_some((r, wanted, held))
        })
    }

    /// Remove one copy of each card in `cards`. Returns false and leaves the
    /// hand untouched if any card is missing.
    pub fn remove_all(&mut self, cards: &[Rank]) -> bool {
        if !self.contains_all(cards) {
            return false;
        }
        for c in cards {
            if let Some(pos) = self.0.iter().position(|r| r == c) {
                self.0.remove(pos);
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<Rank>> for Hand {
    fn from(cards: Vec<Rank>) -> Self {
        Self::new(cards)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", crate::cards::format_cards(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Rank::*;

    #[test]
    fn contains_all_respects_multiplicity() {
        let h = Hand::new(vec![King, King, Queen, Ace, Ace]);
        assert!(h.contains_all(&[King, King]));
        assert!(!h.contains_all(&[King, King, King]));
        assert!(!h.contains_all(&[Wild]));
        assert!(h.contains_all(&[]));
    }

    #[test]
    fn remove_all_is_atomic() {
        let mut h = Hand::new(vec![Ace, King]);
        assert!(!h.remove_all(&[Ace, Queen]));
        assert_eq!(h.len(), 2);
        assert!(h.remove_all(&[King]));
        assert_eq!(h.as_slice(), &[Ace]);
    }

    #[test]
    fn shortfall_reports_first_missing_rank() {
        let h = Hand::new(vec![Ace, Queen]);
        assert_eq!(h.first_shortfall(&[Ace, Ace]), Some((Ace, 2, 1)));
        assert_eq!(h.first_shortfall(&[Ace, Queen]), None);
    }

    #[test]
    fn matching_counts_wilds() {
        let h = Hand::new(vec![Ace, Wild, Queen, Wild]);
        assert_eq!(h.matching(Ace), 3);
        assert_eq!(h.matching(King), 2);
    }

    #[test]
    fn display_lists_sorted_cards() {
        let h = Hand::new(vec![Wild, Ace]);
        assert_eq!(h.to_string(), "[A Wild]");
    }
}
