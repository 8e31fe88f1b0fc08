//! Agents: pluggable seat controllers (bots, humans via a front-end).
//!
//! A [`DecisionSource`] turns a read-only [`RoundSnapshot`] into a
//! [`Decision`]; a [`PlayerAgent`] owns the pacing and hands that decision to
//! the engine. [`AgentTable`] maps seats to agents so front-ends stay thin and
//! do not implement bot coordination themselves.

use crate::engine::{Decision, RoundEngine, RoundSnapshot};
use crate::game::ActionError;
use core::fmt;
use std::time::{Duration, Instant};

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// A decision source failed to produce any action. The engine never raises
/// this; callers decide whether to retry or fall back.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecisionError {
    #[error("no legal action for seat {0}")]
    NoLegalAction(usize),
    #[error("could not understand '{0}'")]
    Unparseable(String),
    #[error("decision source unavailable: {0}")]
    Unavailable(String),
}

/// Chooses an action for the seat described by `snapshot`.
pub trait DecisionSource {
    fn decide(&mut self, snapshot: &RoundSnapshot) -> Result<Decision, DecisionError>;
    /// Short label for logs and records.
    fn name(&self) -> &'static str;
}

/// A seat controller that can act for a player when it is their turn.
pub trait PlayerAgent {
    /// Called when `seat` is the current actor. Implementations may throttle internally.
    fn on_turn(&mut self, engine: &mut dyn RoundEngine, seat: usize) -> Result<bool, ActionError>;
    /// The kind of this agent (human, bot, etc.).
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    /// Optionally receive a decision from outside; default is to ignore and return false.
    fn receive(&mut self, _decision: Decision) -> bool {
        false
    }
}

mod bots;

pub use bots::{
    strategy, BotAgent, BotProfile, CountingStrategy, RandomStrategy, RuleStrategy, StrategyKind,
};

/// Executes decisions handed in by a front-end when it is this seat's turn.
pub struct HumanAgent {
    pending: Option<Decision>,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self { pending: None }
    }
}

impl Default for HumanAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerAgent for HumanAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    fn receive(&mut self, decision: Decision) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(decision);
        true
    }
    fn on_turn(&mut self, engine: &mut dyn RoundEngine, seat: usize) -> Result<bool, ActionError> {
        if engine.is_game_over() {
            self.pending = None;
            return Ok(false);
        }
        if engine.current() != seat {
            return Ok(false);
        }
        match self.pending.take() {
            Some(decision) => engine.act(&decision).map(|_| true),
            None => Ok(false),
        }
    }
}

/// Manages a set of optional agents, one per seat, and drives the agent at the
/// current seat when appropriate.
pub struct AgentTable {
    seats: Vec<Option<Box<dyn PlayerAgent>>>,
    min_action_delay: Duration,
    next_action_at: Option<Instant>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|a| match a.as_deref().map(|ag| ag.kind()) {
                Some(AgentKind::Bot) => 'B',
                Some(_) => 'H',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    /// Create a table with `n` seats, all empty.
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats, min_action_delay: Duration::ZERO, next_action_at: None }
    }

    /// A human at `human` (if any) and a bot of `profile`'s strategy everywhere
    /// else. Bot seeds are derived from the profile seed so each seat differs.
    pub fn with_bots(n: usize, human: Option<usize>, profile: &BotProfile) -> Self {
        let mut table = Self::for_seats(n);
        for seat in 0..n {
            let agent: Box<dyn PlayerAgent> = if Some(seat) == human {
                Box::new(HumanAgent::new())
            } else {
                let mut p = profile.clone();
                p.rng_seed = profile.rng_seed.map(|s| s.wrapping_add(seat as u64));
                Box::new(BotAgent::new(p))
            };
            table.set_agent(seat, Some(agent));
        }
        table
    }

    /// Ensure the table has room for `n` seats.
    pub fn ensure_len(&mut self, n: usize) {
        if self.seats.len() < n {
            self.seats.resize_with(n, || None);
        }
        if self.seats.len() > n {
            self.seats.truncate(n);
        }
    }

    /// Assign an agent to a seat (or remove when `None`).
    pub fn set_agent(&mut self, seat: usize, agent: Option<Box<dyn PlayerAgent>>) {
        if seat >= self.seats.len() {
            self.ensure_len(seat + 1);
        }
        self.seats[seat] = agent;
    }

    /// Return the kind of agent at a seat, if any.
    pub fn agent_kind(&self, seat: usize) -> Option<AgentKind> {
        self.seats.get(seat).and_then(|a| a.as_deref().map(|ag| ag.kind()))
    }

    /// Send a decision to a specific seat agent, if any.
    pub fn receive(&mut self, seat: usize, decision: Decision) -> bool {
        if let Some(Some(agent)) = self.seats.get_mut(seat) {
            return agent.receive(decision);
        }
        false
    }

    /// Set a global minimum delay between any actions at the table.
    pub fn set_min_action_delay_ms(&mut self, delay_ms: u64) {
        self.min_action_delay = Duration::from_millis(delay_ms);
    }

    /// Drive the agent assigned to the current seat, if any.
    pub fn on_turn(&mut self, engine: &mut dyn RoundEngine) -> Result<bool, ActionError> {
        let seat = engine.current();
        if let Some(Some(agent)) = self.seats.get_mut(seat) {
            let is_bot = matches!(agent.kind(), AgentKind::Bot);
            let now = Instant::now();
            if is_bot {
                if let Some(next) = self.next_action_at {
                    if now < next {
                        return Ok(false);
                    }
                }
            }
            let acted = agent.on_turn(engine, seat)?;
            if acted && self.min_action_delay > Duration::ZERO {
                self.next_action_at = Some(now + self.min_action_delay);
            }
            return Ok(acted);
        }
        Ok(false)
    }

    /// Drive agents until the game ends or `max_turns` actions have been
    /// taken. Stops early, returning `None`, if the current seat has nobody to
    /// act for it. Only meaningful for tables without pacing delays.
    pub fn run_to_end(
        &mut self,
        engine: &mut dyn RoundEngine,
        max_turns: usize,
    ) -> Result<Option<usize>, ActionError> {
        for _ in 0..max_turns {
            if engine.is_game_over() {
                break;
            }
            if !self.on_turn(engine)? {
                log::warn!("seat {} has no agent ready to act", engine.current());
                return Ok(None);
            }
        }
        Ok(engine.winner())
    }
}
