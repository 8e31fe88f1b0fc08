//! Stateless legality checks and the action vocabulary.
//!
//! Every check here runs before the engine mutates anything, so a rejected
//! action leaves the game exactly as it was.

use crate::cards::{parse_cards, Rank};
use crate::hand::Hand;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fewest cards a single play may declare.
pub const MIN_PLAY: usize = 1;
/// Most cards a single play may declare.
pub const MAX_PLAY: usize = 3;

/// Which actions the table offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Ruleset {
    /// Play or challenge, plus the forced challenge on an emptied hand.
    #[default]
    Classic,
    /// Classic plus `skip` (decline to challenge) and a voluntary `shoot`.
    Extended,
}

impl Ruleset {
    pub fn label(self) -> &'static str {
        match self {
            Ruleset::Classic => "Classic",
            Ruleset::Extended => "Extended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ActionKind {
    Play,
    Challenge,
    /// The challenge the table issues itself when a play empties a hand.
    AutoChallenge,
    Skip,
    Shoot,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Play => "Play",
            ActionKind::Challenge => "Challenge",
            ActionKind::AutoChallenge => "Auto-challenge",
            ActionKind::Skip => "Skip",
            ActionKind::Shoot => "Shoot",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An action a seat asks the engine to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Play { cards: Vec<Rank> },
    Challenge,
    Skip,
    Shoot,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Play { .. } => ActionKind::Play,
            Action::Challenge => ActionKind::Challenge,
            Action::Skip => ActionKind::Skip,
            Action::Shoot => ActionKind::Shoot,
        }
    }
}

/// The most recent unchallenged play since the last deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastPlay {
    pub seat: usize,
    pub cards: Vec<Rank>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,
    #[error("declared count out of range: play {MIN_PLAY} to {MAX_PLAY} cards, got {0}")]
    CardCount(usize),
    #[error("you do not hold that card: {wanted}x {rank} requested, {held} held")]
    NotHeld { rank: Rank, wanted: usize, held: usize },
    #[error("invalid card: '{0}' (expected A, K, Q or Wild)")]
    UnknownCard(String),
    #[error("nothing to challenge: no play since the last deal")]
    NothingToChallenge,
    #[error("cannot challenge your own play")]
    OwnPlay,
    #[error("nothing to skip: no play since the last deal")]
    NothingToSkip,
    #[error("{0} is not offered in the {1} ruleset")]
    NotOffered(ActionKind, &'static str),
}

/// A play must declare 1 to 3 cards, all of them held.
///
/// ```
/// use liars_bar::cards::Rank;
/// use liars_bar::hand::Hand;
/// use liars_bar::rules::{validate_play, ActionError};
///
/// let hand = Hand::new(vec![Rank::Ace, Rank::King]);
/// assert!(validate_play(&[Rank::Ace], &hand).is_ok());
/// assert_eq!(validate_play(&[], &hand), Err(ActionError::CardCount(0)));
/// ```
pub fn validate_play(cards: &[Rank], hand: &Hand) -> Result<(), ActionError> {
    if !(MIN_PLAY..=MAX_PLAY).contains(&cards.len()) {
        return Err(ActionError::CardCount(cards.len()));
    }
    if let Some((rank, wanted, held)) = hand.first_shortfall(cards) {
        return Err(ActionError::NotHeld { rank, wanted, held });
    }
    Ok(())
}

/// Parse a textual play such as `"K K Wild"` and validate it against `hand`.
pub fn parse_play(input: &str, hand: &Hand) -> Result<Vec<Rank>, ActionError> {
    let cards = parse_cards(input).map_err(|_| {
        let bad = input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .find(|s| s.parse::<Rank>().is_err())
            .unwrap_or(input);
        ActionError::UnknownCard(bad.to_string())
    })?;
    validate_play(&cards, hand)?;
    Ok(cards)
}

/// A challenge needs a play since the last deal, made by someone else.
pub fn validate_challenge(seat: usize, last_play: Option<&LastPlay>) -> Result<(), ActionError> {
    match last_play {
        Some(lp) if lp.seat == seat => Err(ActionError::OwnPlay),
        Some(_) => Ok(()),
        None => Err(ActionError::NothingToChallenge),
    }
}

pub fn validate_skip(ruleset: Ruleset, last_play: Option<&LastPlay>) -> Result<(), ActionError> {
    if ruleset != Ruleset::Extended {
        return Err(ActionError::NotOffered(ActionKind::Skip, ruleset.label()));
    }
    match last_play {
        Some(_) => Ok(()),
        None => Err(ActionError::NothingToSkip),
    }
}

/// A voluntary shot has no precondition beyond the ruleset offering it.
pub fn validate_shoot(ruleset: Ruleset) -> Result<(), ActionError> {
    if ruleset != Ruleset::Extended {
        return Err(ActionError::NotOffered(ActionKind::Shoot, ruleset.label()));
    }
    Ok(())
}

/// A claim is a lie when any played card is neither the target nor Wild.
pub fn is_lie(cards: &[Rank], target: Rank) -> bool {
    cards.iter().any(|c| !c.matches(target))
}

/// Legal action kinds for the seat to act, in menu order.
pub fn available_actions(
    ruleset: Ruleset,
    seat: usize,
    last_play: Option<&LastPlay>,
) -> Vec<ActionKind> {
    let mut out = vec![ActionKind::Play];
    if let Some(lp) = last_play {
        if lp.seat != seat {
            out.push(ActionKind::Challenge);
        }
        if ruleset == Ruleset::Extended {
            out.push(ActionKind::Skip);
        }
    }
    if ruleset == Ruleset::Extended {
        out.push(ActionKind::Shoot);
    }
    out
}
