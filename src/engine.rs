// Engine API boundary. Decision sources and front-ends drive the game through
// this trait and read it through owned snapshots, never through live
// references into the state machine. It is implemented for `Game`.

use crate::cards::Rank;
use crate::game::{ActionError, Game, TurnReport};
use crate::hand::Hand;
use crate::rules::{Action, ActionKind, Ruleset};
use serde::{Deserialize, Serialize};

/// An action plus whatever free text its source attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(flatten)]
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl Decision {
    pub fn new(action: Action) -> Self {
        Self { action, remark: None }
    }

    pub fn play(cards: Vec<Rank>) -> Self {
        Self::new(Action::Play { cards })
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }
}

/// The public face of the most recent play: who made it and how many
/// cards they claimed. The cards themselves stay face down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimView {
    pub seat: usize,
    pub count: usize,
}

/// What everyone at the table can see about one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: usize,
    pub name: String,
    pub alive: bool,
    pub cards: usize,
    pub shots_fired: u32,
    pub last_action: Option<String>,
}

/// Read-only view of the round for one seat: public state plus that seat's
/// private hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub seat: usize,
    pub hand: Hand,
    pub target: Rank,
    pub current: usize,
    pub last_claim: Option<ClaimView>,
    pub claimed_this_round: usize,
    pub seats: Vec<SeatView>,
    pub turn_count: u32,
    pub round: u32,
    pub ruleset: Ruleset,
    /// Legal actions, empty unless `seat` is the one to act.
    pub available: Vec<ActionKind>,
}

impl RoundSnapshot {
    pub fn is_my_turn(&self) -> bool {
        self.seat == self.current && !self.available.is_empty()
    }

    pub fn can(&self, kind: ActionKind) -> bool {
        self.available.contains(&kind)
    }

    pub fn alive_count(&self) -> usize {
        self.seats.iter().filter(|s| s.alive).count()
    }
}

pub trait RoundEngine {
    /// Validate and apply a decision for the current seat.
    fn act(&mut self, decision: &Decision) -> Result<TurnReport, ActionError>;

    // Queries
    fn snapshot(&self, seat: usize) -> RoundSnapshot;
    fn current(&self) -> usize;
    fn is_game_over(&self) -> bool;
    fn winner(&self) -> Option<usize>;
    fn num_players(&self) -> usize;
}

impl RoundEngine for Game {
    fn act(&mut self, decision: &Decision) -> Result<TurnReport, ActionError> {
        Game::act(self, &decision.action, decision.remark.as_deref())
    }

    fn snapshot(&self, seat: usize) -> RoundSnapshot {
        let seats = self
            .players
            .iter()
            .map(|p| SeatView {
                seat: p.id(),
                name: p.name().to_string(),
                alive: p.alive(),
                cards: p.hand().len(),
                shots_fired: p.shots_fired(),
                last_action: p.last_action().map(str::to_string),
            })
            .collect();
        let available =
            if seat == self.current { self.available_actions() } else { Vec::new() };
        RoundSnapshot {
            seat,
            hand: self.players.get(seat).map(|p| p.hand().clone()).unwrap_or_default(),
            target: self.target,
            current: self.current,
            last_claim: self
                .last_play
                .as_ref()
                .map(|lp| ClaimView { seat: lp.seat, count: lp.cards.len() }),
            claimed_this_round: self.claimed_this_round,
            seats,
            turn_count: self.turn_count,
            round: self.round,
            ruleset: self.ruleset(),
            available,
        }
    }

    fn current(&self) -> usize {
        self.current
    }
    fn is_game_over(&self) -> bool {
        Game::is_game_over(self)
    }
    fn winner(&self) -> Option<usize> {
        Game::winner(self)
    }
    fn num_players(&self) -> usize {
        self.players.len()
    }
}
