use crate::cards::Rank;
use crate::config::ConfigError;
use crate::deck::{COPIES_PER_RANK, WILD_COPIES};
use crate::engine::{Decision, RoundEngine, RoundSnapshot};
use crate::game::ActionError;
use crate::hand::Hand;
use crate::rules::{Action, ActionKind, MAX_PLAY};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use super::{AgentKind, DecisionError, DecisionSource, PlayerAgent};

/// Cards in a fresh deck that satisfy any target: its six copies plus both Wilds.
const MATCHING_IN_DECK: usize = COPIES_PER_RANK + WILD_COPIES;

/// Which decision policy a bot runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StrategyKind {
    /// Uniform over legal actions, 1 to 3 random cards on a play.
    Random,
    /// Challenges big claims, otherwise plays target cards, then a Wild,
    /// then bluffs a single card.
    Rule,
    /// Tracks how many matching cards could still be out there and calls
    /// claims that exceed it.
    Counting,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] =
        [StrategyKind::Random, StrategyKind::Rule, StrategyKind::Counting];

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Rule => "rule",
            StrategyKind::Counting => "counting",
        }
    }

    /// Cycle forward through [`StrategyKind::ALL`].
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(StrategyKind::Random),
            "rule" | "rules" | "rule-based" => Ok(StrategyKind::Rule),
            "counting" | "count" => Ok(StrategyKind::Counting),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Configuration for a bot's policy, pacing and randomness.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct BotProfile {
    pub strategy: StrategyKind,
    /// Probability of calling a claim the policy considers worth calling.
    pub challenge_bias: f64,
    /// Probability of padding a truthful play with one off-target card.
    pub bluff: f64,
    /// Probability of passing (extended rules) when holding nothing matching.
    pub skip_rate: f64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub rng_seed: Option<u64>,
}

impl BotProfile {
    /// Create a profile with tuned defaults for a strategy.
    pub fn for_strategy(strategy: StrategyKind) -> Self {
        let (challenge_bias, bluff, skip_rate) = match strategy {
            StrategyKind::Random => (0.5, 0.0, 0.0),
            StrategyKind::Rule => (0.7, 0.1, 0.3),
            StrategyKind::Counting => (0.6, 0.05, 0.2),
        };
        Self {
            strategy,
            challenge_bias,
            bluff,
            skip_rate,
            min_delay_ms: 0,
            max_delay_ms: 0,
            rng_seed: None,
        }
    }

    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Pause between `min_ms` and `max_ms` before each action.
    pub fn with_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_delay_ms = min_ms;
        self.max_delay_ms = max_ms;
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::for_strategy(StrategyKind::Rule)
    }
}

#[derive(Debug)]
struct BotState {
    rng: StdRng,
}

impl BotState {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(v) => StdRng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                StdRng::from_seed(seed)
            }
        };
        Self { rng }
    }

    fn chance(&mut self, p: f64) -> bool {
        p > 0.0 && self.rng.random::<f64>() < p
    }
}

#[derive(Debug, Clone)]
struct BotDecision {
    action: Action,
    confidence: f64,
    reason: &'static str,
}

impl BotDecision {
    fn new(action: Action, confidence: f64, reason: &'static str) -> Self {
        Self { action, confidence, reason }
    }

    fn play(cards: Vec<Rank>, confidence: f64, reason: &'static str) -> Self {
        Self::new(Action::Play { cards }, confidence, reason)
    }

    fn into_decision(self) -> Decision {
        let remark = format!("{} ({:.0}%)", self.reason, self.confidence * 100.0);
        Decision::new(self.action).with_remark(remark)
    }
}

fn ensure_turn(snapshot: &RoundSnapshot) -> Result<(), DecisionError> {
    if !snapshot.is_my_turn() || snapshot.hand.is_empty() {
        return Err(DecisionError::NoLegalAction(snapshot.seat));
    }
    Ok(())
}

/// Target cards first, then a single Wild, then a one-card bluff.
fn preferred_play(hand: &Hand, target: Rank) -> BotDecision {
    let held = hand.count(target).min(MAX_PLAY);
    if held > 0 {
        return BotDecision::play(vec![target; held], 0.9, "truthful");
    }
    if hand.count(Rank::Wild) > 0 {
        return BotDecision::play(vec![Rank::Wild], 0.8, "wild");
    }
    let card = hand.as_slice().first().copied().unwrap_or(Rank::Wild);
    BotDecision::play(vec![card], 0.3, "bluff")
}

fn random_play(hand: &Hand, rng: &mut StdRng) -> Vec<Rank> {
    let mut cards = hand.as_slice().to_vec();
    cards.shuffle(rng);
    let n = rng.random_range(1..=MAX_PLAY.min(cards.len()).max(1));
    cards.truncate(n);
    cards
}

pub struct RandomStrategy {
    state: BotState,
}

impl RandomStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        Self { state: BotState::new(seed) }
    }
}

impl DecisionSource for RandomStrategy {
    fn decide(&mut self, snapshot: &RoundSnapshot) -> Result<Decision, DecisionError> {
        ensure_turn(snapshot)?;
        let idx = self.state.rng.random_range(0..snapshot.available.len());
        let decision = match snapshot.available[idx] {
            ActionKind::Play => {
                let cards = random_play(&snapshot.hand, &mut self.state.rng);
                BotDecision::play(cards, 0.5, "coin flip")
            }
            ActionKind::Challenge => BotDecision::new(Action::Challenge, 0.5, "coin flip"),
            ActionKind::Skip => BotDecision::new(Action::Skip, 0.5, "coin flip"),
            ActionKind::Shoot => BotDecision::new(Action::Shoot, 0.5, "coin flip"),
            ActionKind::AutoChallenge => return Err(DecisionError::NoLegalAction(snapshot.seat)),
        };
        Ok(decision.into_decision())
    }

    fn name(&self) -> &'static str {
        StrategyKind::Random.label()
    }
}

pub struct RuleStrategy {
    profile: BotProfile,
    state: BotState,
}

impl RuleStrategy {
    pub fn new(profile: BotProfile) -> Self {
        let state = BotState::new(profile.rng_seed);
        Self { profile, state }
    }
}

impl DecisionSource for RuleStrategy {
    fn decide(&mut self, snapshot: &RoundSnapshot) -> Result<Decision, DecisionError> {
        ensure_turn(snapshot)?;
        let hand = &snapshot.hand;
        let target = snapshot.target;

        if let Some(claim) = snapshot.last_claim {
            if snapshot.can(ActionKind::Challenge)
                && claim.count >= 2
                && self.state.chance(self.profile.challenge_bias)
            {
                let bias = self.profile.challenge_bias;
                return Ok(BotDecision::new(Action::Challenge, bias, "big claim").into_decision());
            }
            if snapshot.can(ActionKind::Skip)
                && hand.matching(target) == 0
                && self.state.chance(self.profile.skip_rate)
            {
                return Ok(BotDecision::new(Action::Skip, 0.4, "nothing to play").into_decision());
            }
        }

        let mut decision = preferred_play(hand, target);
        if let Action::Play { cards } = &mut decision.action {
            let off_target = hand.iter().find(|c| !c.matches(target));
            if decision.reason == "truthful"
                && cards.len() < MAX_PLAY
                && self.state.chance(self.profile.bluff)
            {
                if let Some(extra) = off_target {
                    cards.push(extra);
                    decision.reason = "padded claim";
                    decision.confidence = 0.5;
                }
            }
        }
        Ok(decision.into_decision())
    }

    fn name(&self) -> &'static str {
        StrategyKind::Rule.label()
    }
}

/// What the counting bot itself put on the table this round.
#[derive(Debug, Clone, Copy, Default)]
struct RoundMemory {
    round: u32,
    claimed: usize,
    matching_played: usize,
}

pub struct CountingStrategy {
    profile: BotProfile,
    state: BotState,
    memory: RoundMemory,
}

impl CountingStrategy {
    pub fn new(profile: BotProfile) -> Self {
        let state = BotState::new(profile.rng_seed);
        Self { profile, state, memory: RoundMemory::default() }
    }

    /// Matching cards the other seats could hold or have played.
    fn possible_elsewhere(&self, snapshot: &RoundSnapshot) -> usize {
        MATCHING_IN_DECK
            .saturating_sub(snapshot.hand.matching(snapshot.target))
            .saturating_sub(self.memory.matching_played)
    }

    fn remember(&mut self, decision: &BotDecision, target: Rank) {
        if let Action::Play { cards } = &decision.action {
            self.memory.claimed += cards.len();
            self.memory.matching_played += cards.iter().filter(|c| c.matches(target)).count();
        }
    }
}

impl DecisionSource for CountingStrategy {
    fn decide(&mut self, snapshot: &RoundSnapshot) -> Result<Decision, DecisionError> {
        ensure_turn(snapshot)?;
        if self.memory.round != snapshot.round {
            self.memory = RoundMemory { round: snapshot.round, ..RoundMemory::default() };
        }

        if snapshot.last_claim.is_some() && snapshot.can(ActionKind::Challenge) {
            let others_claimed = snapshot.claimed_this_round.saturating_sub(self.memory.claimed);
            let possible = self.possible_elsewhere(snapshot);
            if others_claimed > possible {
                let d = BotDecision::new(Action::Challenge, 1.0, "impossible claim");
                return Ok(d.into_decision());
            }
            let suspicion = others_claimed as f64 / possible.max(1) as f64;
            if self.state.chance(suspicion * self.profile.challenge_bias) {
                let d = BotDecision::new(Action::Challenge, suspicion, "suspicious claim");
                return Ok(d.into_decision());
            }
        }

        let hand = &snapshot.hand;
        if snapshot.can(ActionKind::Skip)
            && hand.matching(snapshot.target) == 0
            && self.state.chance(self.profile.skip_rate)
        {
            return Ok(BotDecision::new(Action::Skip, 0.4, "waiting it out").into_decision());
        }

        let mut decision = preferred_play(hand, snapshot.target);
        if decision.reason == "bluff" {
            decision.reason = "forced bluff";
        }
        self.remember(&decision, snapshot.target);
        Ok(decision.into_decision())
    }

    fn name(&self) -> &'static str {
        StrategyKind::Counting.label()
    }
}

/// Build the decision source a profile asks for.
pub fn strategy(profile: &BotProfile) -> Box<dyn DecisionSource> {
    match profile.strategy {
        StrategyKind::Random => Box::new(RandomStrategy::new(profile.rng_seed)),
        StrategyKind::Rule => Box::new(RuleStrategy::new(profile.clone())),
        StrategyKind::Counting => Box::new(CountingStrategy::new(profile.clone())),
    }
}

/// A seat driven by a strategy, paced by the profile's delay range.
pub struct BotAgent {
    profile: BotProfile,
    source: Box<dyn DecisionSource>,
    state: BotState,
    next_action_at: Option<Instant>,
}

impl BotAgent {
    pub fn new(profile: BotProfile) -> Self {
        let source = strategy(&profile);
        let state = BotState::new(profile.rng_seed.map(|s| s.rotate_left(17)));
        Self { profile, source, state, next_action_at: None }
    }

    pub fn strategy(&self) -> StrategyKind {
        self.profile.strategy
    }
}

impl PlayerAgent for BotAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }
    fn on_turn(&mut self, engine: &mut dyn RoundEngine, seat: usize) -> Result<bool, ActionError> {
        if engine.is_game_over() {
            return Ok(false);
        }
        if engine.current() != seat {
            return Ok(false);
        }
        let now = Instant::now();
        let delay = choose_delay_ms(&self.profile, &mut self.state);
        if delay > 0 {
            match self.next_action_at {
                None => {
                    self.next_action_at = Some(now + Duration::from_millis(delay));
                    return Ok(false);
                }
                Some(next) if now < next => {
                    return Ok(false);
                }
                Some(_) => {}
            }
        }
        self.next_action_at = None;

        let snapshot = engine.snapshot(seat);
        let name = self.source.name();
        let decision = match self.source.decide(&snapshot) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("seat {seat}: {name} strategy failed ({e}); falling back");
                fallback(&snapshot)
            }
        };
        log::debug!("seat {seat} ({name}) decides {decision:?}");
        match engine.act(&decision) {
            Ok(_) => Ok(true),
            Err(e) => {
                log::warn!("seat {seat}: {name} chose an illegal action ({e}); falling back");
                engine.act(&fallback(&snapshot)).map(|_| true)
            }
        }
    }
}

/// Always legal for a live seat on its turn: play the first held card.
fn fallback(snapshot: &RoundSnapshot) -> Decision {
    let card = snapshot.hand.as_slice().first().copied().unwrap_or(Rank::Wild);
    Decision::play(vec![card]).with_remark("fallback")
}

fn choose_delay_ms(profile: &BotProfile, state: &mut BotState) -> u64 {
    let min = profile.min_delay_ms;
    let max = profile.max_delay_ms.max(min);
    if max == min {
        min
    } else {
        state.rng.random_range(min..=max)
    }
}
