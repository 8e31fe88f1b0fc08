use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four card ranks in the Liar's Bar deck. Cards carry no suit, so a
/// card is fully described by its rank.
///
/// Declaration order is the canonical display order used when sorting hands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "Q")]
    Queen,
    /// Counts as whatever the current target rank is.
    #[serde(rename = "Wild")]
    Wild,
}

impl Rank {
    pub const ALL: [Rank; 4] = [Rank::Ace, Rank::King, Rank::Queen, Rank::Wild];

    /// Ranks that can be drawn as a round's target. Wild is never a target.
    pub const TARGETS: [Rank; 3] = [Rank::Ace, Rank::King, Rank::Queen];

    pub const fn is_wild(self) -> bool {
        matches!(self, Rank::Wild)
    }

    /// Whether a card of this rank honours a claim of `target`.
    ///
    /// ```
    /// use liars_bar::cards::Rank;
    ///
    /// assert!(Rank::King.matches(Rank::King));
    /// assert!(Rank::Wild.matches(Rank::Queen));
    /// assert!(!Rank::Ace.matches(Rank::King));
    /// ```
    pub const fn matches(self, target: Rank) -> bool {
        self.is_wild() || self as u8 == target as u8
    }

    pub const fn to_char(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::King => 'K',
            Rank::Queen => 'Q',
            Rank::Wild => 'W',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Wild => write!(f, "Wild"),
            other => write!(f, "{}", other.to_char()),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankParseError {
    #[error("invalid card: '{0}' (expected A, K, Q or Wild)")]
    Invalid(String),
}

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let r = match upper.as_str() {
            "A" | "ACE" => Rank::Ace,
            "K" | "KING" => Rank::King,
            "Q" | "QUEEN" => Rank::Queen,
            "W" | "WILD" | "J" | "JOKER" | "*" => Rank::Wild,
            _ => return Err(RankParseError::Invalid(s.to_string())),
        };
        Ok(r)
    }
}

impl TryFrom<char> for Rank {
    type Error = RankParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Rank::Ace),
            'K' => Ok(Rank::King),
            'Q' => Ok(Rank::Queen),
            'W' | 'J' | '*' => Ok(Rank::Wild),
            _ => Err(RankParseError::Invalid(c.to_string())),
        }
    }
}

/// Parse ranks separated by whitespace or commas.
///
/// ```
/// use liars_bar::cards::{parse_cards, Rank};
///
/// let cards = parse_cards("K, k Wild").unwrap();
/// assert_eq!(cards, vec![Rank::King, Rank::King, Rank::Wild]);
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Rank>, RankParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Rank::from_str)
        .collect()
}

/// Render ranks as a compact space-separated list, e.g. `A K Wild`.
pub fn format_cards(cards: &[Rank]) -> String {
    cards.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(" ")
}
