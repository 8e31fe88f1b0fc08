use crate::cards::{format_cards, Rank};
use crate::config::{ConfigError, GameOptions};
use crate::deck::{Deck, COPIES_PER_RANK, WILD_COPIES};
use crate::hand::Hand;
use crate::player::{Player, PlayerTally};
use crate::revolver::Revolver;
use crate::rules::{self, Action, ActionKind, LastPlay, Ruleset};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub use crate::rules::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Phase {
    AwaitingAction,
    GameOver,
}

/// What a challenge found when the cards were turned over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Lie,
    Truthful,
}

/// Resolution of a challenge, auto-challenge or direct shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// `None` for a direct shot.
    pub verdict: Option<Verdict>,
    /// `None` when a truthful auto-challenge leaves no one to shoot.
    pub shooter: Option<usize>,
    pub hit: bool,
}

/// One committed transition, as fed to recorders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ActionRecord {
    pub turn: u32,
    pub seat: usize,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Rank>>,
    /// Cards `seat` holds after the action.
    pub hand_remaining: usize,
    /// Trigger pulls by `seat` so far. On a challenge the one who pulled
    /// may be someone else; see `outcome.shooter`.
    pub shots_fired: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Free text from the decision source, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Hidden per-seat state after a deal. Only god-view recorders show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatDeal {
    pub seat: usize,
    pub hand: Vec<Rank>,
    pub bullet: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum GameEvent {
    Action(ActionRecord),
    RoundReset { round: u32, alive: Vec<usize> },
    TargetRankChanged { round: u32, rank: Rank },
    Dealt { round: u32, seats: Vec<SeatDeal> },
    GameOver { winner: usize, tallies: Vec<PlayerTally> },
}

impl GameEvent {
    pub fn as_action(&self) -> Option<&ActionRecord> {
        match self {
            GameEvent::Action(rec) => Some(rec),
            _ => None,
        }
    }
}

/// Events produced by one accepted action, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TurnReport {
    pub events: Vec<GameEvent>,
}

impl TurnReport {
    /// The challenge or shot resolution, if this turn had one.
    pub fn outcome(&self) -> Option<Outcome> {
        self.events.iter().filter_map(GameEvent::as_action).find_map(|r| r.outcome)
    }

    pub fn round_reset(&self) -> bool {
        self.events.iter().any(|e| matches!(e, GameEvent::RoundReset { .. }))
    }

    pub fn game_over(&self) -> bool {
        self.events.iter().any(|e| matches!(e, GameEvent::GameOver { .. }))
    }
}

/// An explicit starting position: replays, tutorials and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub target: Rank,
    /// One hand per seat. Eliminated seats hold nothing.
    pub hands: Vec<Vec<Rank>>,
    pub bullets: Vec<u8>,
    pub current: usize,
    pub eliminated: Vec<usize>,
}

impl Scenario {
    pub fn new(target: Rank, hands: Vec<Vec<Rank>>, bullets: Vec<u8>) -> Self {
        Self { target, hands, bullets, current: 0, eliminated: Vec::new() }
    }

    pub fn starting_at(mut self, seat: usize) -> Self {
        self.current = seat;
        self
    }

    pub fn with_eliminated(mut self, seats: &[usize]) -> Self {
        self.eliminated = seats.to_vec();
        self
    }

    fn validate(&self, players: usize) -> Result<(), ConfigError> {
        let bad = |msg: String| Err(ConfigError::Scenario(msg));
        if self.hands.len() != players || self.bullets.len() != players {
            return bad(format!(
                "{players} seats need {players} hands and bullets, got {} and {}",
                self.hands.len(),
                self.bullets.len()
            ));
        }
        if self.target.is_wild() {
            return bad("target rank cannot be Wild".into());
        }
        if let Some(&seat) = self.eliminated.iter().find(|&&s| s >= players) {
            return bad(format!("eliminated seat {seat} does not exist"));
        }
        let mut listed = self.eliminated.clone();
        listed.sort_unstable();
        if let Some(pair) = listed.windows(2).find(|w| w[0] == w[1]) {
            return bad(format!("eliminated seat {} listed twice", pair[0]));
        }
        let alive = (0..players).filter(|s| !self.eliminated.contains(s)).count();
        if alive < 2 {
            return bad("fewer than two players alive".into());
        }
        if self.current >= players || self.eliminated.contains(&self.current) {
            return bad(format!("seat {} cannot start", self.current));
        }
        for rank in Rank::ALL {
            let limit = if rank.is_wild() { WILD_COPIES } else { COPIES_PER_RANK };
            let used: usize =
                self.hands.iter().map(|h| h.iter().filter(|&&r| r == rank).count()).sum();
            if used > limit {
                return bad(format!("{used}x {rank} exceeds the deck's {limit}"));
            }
        }
        for (seat, hand) in self.hands.iter().enumerate() {
            let alive = !self.eliminated.contains(&seat);
            if alive && hand.is_empty() {
                return bad(format!("seat {seat} is alive with an empty hand"));
            }
            if !alive && !hand.is_empty() {
                return bad(format!("seat {seat} is eliminated but holds cards"));
            }
        }
        Ok(())
    }
}

/// The round/turn state machine. Single writer of all game state; readers
/// get snapshots through [`crate::engine::RoundEngine`].
#[derive(Debug)]
#[non_exhaustive]
pub struct Game {
    pub(crate) options: GameOptions,
    pub(crate) players: Vec<Player>,
    pub(crate) target: Rank,
    pub(crate) current: usize,
    pub(crate) last_play: Option<LastPlay>,
    /// Cards claimed since the last deal, the current claim included.
    pub(crate) claimed_this_round: usize,
    /// Committed player turns across the whole game.
    pub(crate) turn_count: u32,
    /// Deals so far; 1 after the opening deal.
    pub(crate) round: u32,
    pub(crate) phase: Phase,
    pub(crate) undealt: Vec<Rank>,
    rng: ChaCha8Rng,
    history: Vec<GameEvent>,
}

impl Game {
    /// Seat the players, apply any debug elimination, draw a target and deal.
    pub fn new(options: GameOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let mut rng = seeded_rng(options.seed);
        let players =
            (0..options.players).map(|i| Player::new(i, Revolver::random(&mut rng))).collect();
        let mut game = Self::blank(options, players, rng);
        if let Some(seat) = game.options.kill_on_start {
            log::info!("debug: seat {seat} eliminated before the first deal");
            game.players[seat].eliminate();
        }
        game.current = game.next_alive_from(game.players.len() - 1);
        game.deal_round()?;
        Ok(game)
    }

    /// Start from an explicit position instead of a random deal.
    pub fn from_scenario(options: GameOptions, scenario: Scenario) -> Result<Self, ConfigError> {
        options.validate()?;
        scenario.validate(options.players)?;
        let rng = seeded_rng(options.seed);
        let mut players = Vec::with_capacity(options.players);
        for (seat, (hand, &bullet)) in scenario.hands.iter().zip(&scenario.bullets).enumerate() {
            let revolver = Revolver::new(bullet)
                .map_err(|e| ConfigError::Scenario(format!("seat {seat}: {e}")))?;
            let mut p = Player::new(seat, revolver);
            p.hand = Hand::new(hand.clone());
            if scenario.eliminated.contains(&seat) {
                p.alive = false;
            }
            players.push(p);
        }
        let mut game = Self::blank(options, players, rng);
        game.target = scenario.target;
        game.current = scenario.current;
        game.round = 1;
        game.record_deal();
        Ok(game)
    }

    fn blank(options: GameOptions, players: Vec<Player>, rng: ChaCha8Rng) -> Self {
        Self {
            options,
            players,
            target: Rank::Ace,
            current: 0,
            last_play: None,
            claimed_this_round: 0,
            turn_count: 0,
            round: 0,
            phase: Phase::AwaitingAction,
            undealt: Vec::new(),
            rng,
            history: Vec::new(),
        }
    }

    /// Returns the options this game was built with
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    /// Returns the active rule set
    pub fn ruleset(&self) -> Ruleset {
        self.options.ruleset
    }

    /// Returns a reference to the players
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the player at `seat`
    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    /// Returns the target rank for this round
    pub fn target(&self) -> Rank {
        self.target
    }

    /// Returns the current player index
    pub fn current(&self) -> usize {
        self.current
    }

    /// Returns the play a challenge would test, if any
    pub fn last_play(&self) -> Option<&LastPlay> {
        self.last_play.as_ref()
    }

    /// Returns the number of cards claimed since the last deal
    pub fn claimed_this_round(&self) -> usize {
        self.claimed_this_round
    }

    /// Returns the number of committed turns in this game
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Returns the deal number, starting at 1
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Returns the current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the cards left out of the last deal
    pub fn undealt(&self) -> &[Rank] {
        &self.undealt
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    /// The sole surviving seat once the game is over.
    pub fn winner(&self) -> Option<usize> {
        if !self.is_game_over() {
            return None;
        }
        self.players.iter().position(|p| p.alive)
    }

    pub fn alive_seats(&self) -> Vec<usize> {
        self.players.iter().filter(|p| p.alive).map(|p| p.id).collect()
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    /// Legal action kinds for the seat to act; empty once the game is over.
    pub fn available_actions(&self) -> Vec<ActionKind> {
        if self.is_game_over() {
            return Vec::new();
        }
        rules::available_actions(self.ruleset(), self.current, self.last_play.as_ref())
    }

    pub fn tallies(&self) -> Vec<PlayerTally> {
        self.players.iter().map(Player::tally).collect()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.history
    }

    /// Events recorded at or after `cursor`, for incremental consumers.
    pub fn events_since(&self, cursor: usize) -> &[GameEvent] {
        &self.history[cursor.min(self.history.len())..]
    }

    pub fn history_recent(&self, n: usize) -> Vec<GameEvent> {
        if n == 0 {
            return Vec::new();
        }
        let len = self.history.len();
        let start = len.saturating_sub(n);
        self.history[start..].to_vec()
    }

    pub fn history_recent_offset(&self, n: usize, offset: usize) -> Vec<GameEvent> {
        if n == 0 {
            return Vec::new();
        }
        let len = self.history.len();
        if len == 0 {
            return Vec::new();
        }
        let max_offset = len.saturating_sub(n);
        let offset = offset.min(max_offset);
        let end = len.saturating_sub(offset);
        let start = end.saturating_sub(n);
        self.history[start..end].to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Apply any action for the current seat. `remark` is recorded verbatim.
    pub fn act(
        &mut self,
        action: &Action,
        remark: Option<&str>,
    ) -> Result<TurnReport, ActionError> {
        match action {
            Action::Play { cards } => self.play(cards, remark),
            Action::Challenge => self.challenge(remark),
            Action::Skip => self.skip(remark),
            Action::Shoot => self.shoot(remark),
        }
    }

    pub fn action_play(&mut self, cards: &[Rank]) -> Result<TurnReport, ActionError> {
        self.play(cards, None)
    }

    pub fn action_challenge(&mut self) -> Result<TurnReport, ActionError> {
        self.challenge(None)
    }

    pub fn action_skip(&mut self) -> Result<TurnReport, ActionError> {
        self.skip(None)
    }

    pub fn action_shoot(&mut self) -> Result<TurnReport, ActionError> {
        self.shoot(None)
    }

    fn ensure_can_act(&self) -> Result<(), ActionError> {
        if self.is_game_over() {
            return Err(ActionError::GameOver);
        }
        Ok(())
    }

    fn play(&mut self, cards: &[Rank], remark: Option<&str>) -> Result<TurnReport, ActionError> {
        self.ensure_can_act()?;
        let seat = self.current;
        rules::validate_play(cards, &self.players[seat].hand)?;
        let start = self.history.len();

        let p = &mut self.players[seat];
        if !p.hand.remove_all(cards) {
            return Err(ActionError::CardCount(cards.len()));
        }
        p.last_action = Some(format!("Play {}", cards.len()));
        self.turn_count += 1;
        self.claimed_this_round += cards.len();
        self.last_play = Some(LastPlay { seat, cards: cards.to_vec() });
        log::debug!("seat {seat} plays {} (target {})", format_cards(cards), self.target);
        self.record_action(seat, ActionKind::Play, Some(cards.to_vec()), None, remark);

        if self.players[seat].hand.is_empty() {
            self.auto_challenge(seat, cards);
        } else {
            self.current = self.next_alive_from(seat);
        }
        Ok(self.report_since(start))
    }

    /// An emptied hand can never be challenged in turn, so the table checks it.
    fn auto_challenge(&mut self, seat: usize, cards: &[Rank]) {
        let lie = rules::is_lie(cards, self.target);
        let played = Some(cards.to_vec());
        if lie {
            let hit = self.players[seat].pull_trigger();
            log::info!("seat {seat} emptied their hand on a lie; trigger pulled, hit={hit}");
            let outcome = Outcome { verdict: Some(Verdict::Lie), shooter: Some(seat), hit };
            self.record_action(seat, ActionKind::AutoChallenge, played, Some(outcome), None);
            self.resolve_shot(seat, hit);
        } else {
            log::info!("seat {seat} emptied their hand truthfully; nobody shoots");
            let outcome = Outcome { verdict: Some(Verdict::Truthful), shooter: None, hit: false };
            self.record_action(seat, ActionKind::AutoChallenge, played, Some(outcome), None);
            self.current = seat;
            self.reset_round();
        }
    }

    fn challenge(&mut self, remark: Option<&str>) -> Result<TurnReport, ActionError> {
        self.ensure_can_act()?;
        let challenger = self.current;
        rules::validate_challenge(challenger, self.last_play.as_ref())?;
        let Some(claim) = self.last_play.clone() else {
            return Err(ActionError::NothingToChallenge);
        };
        let start = self.history.len();

        let lie = rules::is_lie(&claim.cards, self.target);
        let (verdict, shooter) = if lie {
            self.players[challenger].challenge_success += 1;
            (Verdict::Lie, claim.seat)
        } else {
            self.players[challenger].challenge_fail += 1;
            (Verdict::Truthful, challenger)
        };
        self.turn_count += 1;
        self.players[challenger].last_action = Some("Challenge".into());
        let hit = self.players[shooter].pull_trigger();
        log::info!(
            "seat {challenger} challenges seat {}: {} was {:?}; seat {shooter} pulls, hit={hit}",
            claim.seat,
            format_cards(&claim.cards),
            verdict
        );
        let outcome = Outcome { verdict: Some(verdict), shooter: Some(shooter), hit };
        let cards = Some(claim.cards);
        self.record_action(challenger, ActionKind::Challenge, cards, Some(outcome), remark);
        self.resolve_shot(shooter, hit);
        Ok(self.report_since(start))
    }

    fn skip(&mut self, remark: Option<&str>) -> Result<TurnReport, ActionError> {
        self.ensure_can_act()?;
        rules::validate_skip(self.ruleset(), self.last_play.as_ref())?;
        let start = self.history.len();
        let seat = self.current;
        self.turn_count += 1;
        self.players[seat].last_action = Some("Skip".into());
        log::debug!("seat {seat} skips");
        self.record_action(seat, ActionKind::Skip, None, None, remark);
        self.current = self.next_alive_from(seat);
        Ok(self.report_since(start))
    }

    fn shoot(&mut self, remark: Option<&str>) -> Result<TurnReport, ActionError> {
        self.ensure_can_act()?;
        rules::validate_shoot(self.ruleset())?;
        let start = self.history.len();
        let seat = self.current;
        self.turn_count += 1;
        self.players[seat].last_action = Some("Shoot".into());
        let hit = self.players[seat].pull_trigger();
        log::info!("seat {seat} shoots voluntarily, hit={hit}");
        let outcome = Outcome { verdict: None, shooter: Some(seat), hit };
        self.record_action(seat, ActionKind::Shoot, None, Some(outcome), remark);
        self.resolve_shot(seat, hit);
        Ok(self.report_since(start))
    }

    /// After any trigger pull: end the game or reset the round. A surviving
    /// shooter keeps the turn; otherwise it passes to the next live seat.
    fn resolve_shot(&mut self, shooter: usize, hit: bool) {
        if hit {
            log::info!("seat {shooter} eliminated");
        }
        if self.alive_count() <= 1 {
            self.finish_game();
            return;
        }
        self.current = if hit { self.next_alive_from(shooter) } else { shooter };
        self.reset_round();
    }

    fn reset_round(&mut self) {
        for p in self.players.iter_mut().filter(|p| p.alive) {
            p.rounds_survived += 1;
        }
        let round = self.round + 1;
        let alive = self.alive_seats();
        self.record(GameEvent::RoundReset { round, alive });
        if let Err(e) = self.deal_round() {
            log::error!("redeal failed: {e}");
        }
    }

    /// Fresh target, fresh deck dealt to live seats, fresh revolvers.
    fn deal_round(&mut self) -> Result<(), ConfigError> {
        let seats = self.alive_seats();
        let deal = Deck::standard().deal(seats.len(), &mut self.rng)?;
        self.round += 1;
        self.target = Rank::TARGETS[self.rng.random_range(0..Rank::TARGETS.len())];
        for (&seat, hand) in seats.iter().zip(deal.hands) {
            let p = &mut self.players[seat];
            p.hand = hand;
            p.revolver.reload(&mut self.rng);
        }
        self.undealt = deal.undealt;
        self.last_play = None;
        self.claimed_this_round = 0;
        log::info!("round {}: target {}, dealt to seats {:?}", self.round, self.target, seats);
        self.record_deal();
        Ok(())
    }

    fn record_deal(&mut self) {
        let round = self.round;
        self.record(GameEvent::TargetRankChanged { round, rank: self.target });
        let seats = self
            .players
            .iter()
            .filter(|p| p.alive)
            .map(|p| SeatDeal {
                seat: p.id,
                hand: p.hand.as_slice().to_vec(),
                bullet: p.revolver.bullet(),
            })
            .collect();
        self.record(GameEvent::Dealt { round, seats });
    }

    fn finish_game(&mut self) {
        self.phase = Phase::GameOver;
        self.last_play = None;
        let Some(winner) = self.players.iter().position(|p| p.alive) else {
            log::error!("game ended with no player alive");
            return;
        };
        self.current = winner;
        log::info!("game over after {} turns: seat {winner} wins", self.turn_count);
        let tallies = self.tallies();
        self.record(GameEvent::GameOver { winner, tallies });
    }

    /// Next live seat after `start`, wrapping. Falls back to `start` when
    /// nobody else is alive.
    pub(crate) fn next_alive_from(&self, start: usize) -> usize {
        let n = self.players.len();
        if n == 0 {
            return 0;
        }
        let mut i = (start + 1) % n;
        for _ in 0..n {
            if self.players[i].alive {
                return i;
            }
            i = (i + 1) % n;
        }
        start % n
    }

    fn record_action(
        &mut self,
        seat: usize,
        action: ActionKind,
        cards: Option<Vec<Rank>>,
        outcome: Option<Outcome>,
        remark: Option<&str>,
    ) {
        let p = &self.players[seat];
        let rec = ActionRecord {
            turn: self.turn_count,
            seat,
            action,
            cards,
            hand_remaining: p.hand.len(),
            shots_fired: p.shots_fired,
            outcome,
            remark: remark.map(str::to_string),
        };
        self.record(GameEvent::Action(rec));
    }

    fn record(&mut self, event: GameEvent) {
        self.history.push(event);
    }

    fn report_since(&self, start: usize) -> TurnReport {
        TurnReport { events: self.history[start..].to_vec() }
    }
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::seed_from_u64(rand::rng().random()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Rank::*;

    fn mk_game(n: usize) -> Game {
        Game::new(GameOptions::new(n).unwrap().with_seed(17)).unwrap()
    }

    fn scenario_game(hands: Vec<Vec<Rank>>, bullets: Vec<u8>, target: Rank) -> Game {
        let opts = GameOptions::new(hands.len()).unwrap().with_seed(5);
        Game::from_scenario(opts, Scenario::new(target, hands, bullets)).unwrap()
    }

    #[test]
    fn opening_deal_gives_every_seat_five_cards() {
        let g = mk_game(4);
        assert_eq!(g.round(), 1);
        assert!(g.players().iter().all(|p| p.hand().len() == 5));
        assert!(Rank::TARGETS.contains(&g.target()));
        assert!(g.last_play().is_none());
        assert_eq!(g.available_actions(), vec![ActionKind::Play]);
    }

    #[test]
    fn same_seed_same_game() {
        let a = mk_game(3);
        let b = mk_game(3);
        assert_eq!(a.target(), b.target());
        for (pa, pb) in a.players().iter().zip(b.players()) {
            assert_eq!(pa.hand(), pb.hand());
            assert_eq!(pa.revolver(), pb.revolver());
        }
    }

    #[test]
    fn kill_on_start_removes_seat_from_deal_and_turns() {
        let g = Game::new(GameOptions::new(3).unwrap().with_seed(2).with_kill_on_start(0)).unwrap();
        assert!(!g.players()[0].alive());
        assert!(g.players()[0].hand().is_empty());
        assert_eq!(g.players()[1].hand().len(), 10);
        assert_eq!(g.current(), 1);
    }

    #[test]
    fn next_alive_skips_eliminated_seats() {
        let mut g = mk_game(4);
        g.players[2].alive = false;
        assert_eq!(g.next_alive_from(1), 3);
        assert_eq!(g.next_alive_from(3), 0);
    }

    #[test]
    fn play_moves_cards_and_passes_turn() {
        let mut g =
            scenario_game(vec![vec![King, King, Ace], vec![Queen, Queen]], vec![6, 6], King);
        let report = g.action_play(&[King, King]).unwrap();
        assert_eq!(report.events.len(), 1);
        assert_eq!(g.players[0].hand().as_slice(), &[Ace]);
        assert_eq!(g.last_play(), Some(&LastPlay { seat: 0, cards: vec![King, King] }));
        assert_eq!(g.current(), 1);
        assert_eq!(g.claimed_this_round(), 2);
    }

    #[test]
    fn rejected_action_changes_nothing() {
        let mut g = scenario_game(vec![vec![King, Ace], vec![Queen, Queen]], vec![3, 3], King);
        let before = (g.players[0].hand().clone(), g.last_play.clone(), g.current, g.history_len());
        assert_eq!(
            g.action_play(&[Queen]),
            Err(ActionError::NotHeld { rank: Queen, wanted: 1, held: 0 })
        );
        assert_eq!(g.action_play(&[]), Err(ActionError::CardCount(0)));
        assert_eq!(g.action_challenge(), Err(ActionError::NothingToChallenge));
        assert!(matches!(g.action_skip(), Err(ActionError::NotOffered(..))));
        assert!(matches!(g.action_shoot(), Err(ActionError::NotOffered(..))));
        let after = (g.players[0].hand().clone(), g.last_play.clone(), g.current, g.history_len());
        assert_eq!(before, after);
        assert_eq!(g.turn_count(), 0);
    }

    #[test]
    fn caught_lie_shoots_the_liar() {
        let mut g = scenario_game(vec![vec![Queen, Ace], vec![Ace, Ace]], vec![1, 4], King);
        g.action_play(&[Queen]).unwrap();
        let report = g.action_challenge().unwrap();
        assert_eq!(
            report.outcome(),
            Some(Outcome { verdict: Some(Verdict::Lie), shooter: Some(0), hit: true })
        );
        assert_eq!(g.players[1].challenge_success(), 1);
        assert!(g.is_game_over());
        assert_eq!(g.winner(), Some(1));
        assert!(report.game_over());
    }

    #[test]
    fn failed_challenge_shoots_challenger_who_keeps_turn() {
        let mut g = scenario_game(
            vec![vec![King, Wild, Ace], vec![Ace, Ace], vec![Queen]],
            vec![6, 6, 6],
            King,
        );
        g.action_play(&[King, Wild]).unwrap();
        let report = g.action_challenge().unwrap();
        assert_eq!(
            report.outcome(),
            Some(Outcome { verdict: Some(Verdict::Truthful), shooter: Some(1), hit: false })
        );
        assert!(report.round_reset());
        assert_eq!(g.players[1].challenge_fail(), 1);
        assert_eq!(g.players[1].shots_fired(), 1);
        assert_eq!(g.current(), 1);
        assert_eq!(g.round(), 2);
        assert!(g.last_play().is_none());
        assert!(g.players().iter().all(|p| p.hand().len() == 6));
        assert!(g.players().iter().all(|p| p.revolver().hammer() == 1));
        assert!(g.players().iter().all(|p| p.rounds_survived() == 1));
    }

    #[test]
    fn eliminated_shooter_passes_turn_onward() {
        let mut g = scenario_game(
            vec![vec![King, Ace], vec![Ace, Queen], vec![Queen, Queen]],
            vec![6, 1, 6],
            King,
        );
        g.action_play(&[King]).unwrap();
        g.action_challenge().unwrap();
        assert!(!g.players[1].alive());
        assert_eq!(g.current(), 2);
        assert_eq!(g.players[0].hand().len(), 10);
        assert!(g.players[1].hand().is_empty());
    }

    #[test]
    fn truthful_empty_hand_resets_without_a_shot() {
        let mut g = scenario_game(vec![vec![King, Wild], vec![Ace, Ace]], vec![1, 1], King);
        let report = g.action_play(&[King, Wild]).unwrap();
        assert_eq!(
            report.outcome(),
            Some(Outcome { verdict: Some(Verdict::Truthful), shooter: None, hit: false })
        );
        assert!(report.round_reset());
        assert_eq!(g.current(), 0);
        assert!(g.players().iter().all(|p| p.shots_fired() == 0));
    }

    #[test]
    fn extended_skip_keeps_last_play() {
        let opts = GameOptions::new(3).unwrap().with_ruleset(Ruleset::Extended).with_seed(1);
        let mut g = Game::from_scenario(
            opts,
            Scenario::new(
                Ace,
                vec![vec![Ace, King], vec![Queen, Queen], vec![King]],
                vec![2, 2, 2],
            ),
        )
        .unwrap();
        g.action_play(&[Ace]).unwrap();
        g.action_skip().unwrap();
        assert_eq!(g.current(), 2);
        assert_eq!(g.last_play().map(|lp| lp.seat), Some(0));
        assert_eq!(
            g.available_actions(),
            vec![ActionKind::Play, ActionKind::Challenge, ActionKind::Skip, ActionKind::Shoot]
        );
    }

    #[test]
    fn direct_shoot_miss_resets_with_shooter_to_act() {
        let opts = GameOptions::new(2).unwrap().with_ruleset(Ruleset::Extended).with_seed(1);
        let mut g = Game::from_scenario(
            opts,
            Scenario::new(Queen, vec![vec![Ace], vec![King]], vec![4, 4]).starting_at(1),
        )
        .unwrap();
        let report = g.action_shoot().unwrap();
        assert_eq!(report.outcome(), Some(Outcome { verdict: None, shooter: Some(1), hit: false }));
        assert_eq!(g.current(), 1);
        assert_eq!(g.round(), 2);
    }

    #[test]
    fn no_actions_after_game_over() {
        let mut g = scenario_game(vec![vec![Queen, Ace], vec![Ace, Ace]], vec![1, 4], King);
        g.action_play(&[Queen]).unwrap();
        g.action_challenge().unwrap();
        assert!(g.available_actions().is_empty());
        assert_eq!(g.action_play(&[Ace]), Err(ActionError::GameOver));
    }

    #[test]
    fn scenario_validation() {
        let opts = GameOptions::new(2).unwrap();
        let hands = || vec![vec![Ace], vec![King]];
        let twice = Scenario::new(Ace, hands(), vec![1, 1]).with_eliminated(&[1, 1, 1]);
        assert_eq!(
            Game::from_scenario(opts.clone(), twice).map(|_| ()),
            Err(ConfigError::Scenario("eliminated seat 1 listed twice".into()))
        );
        let wild = Scenario::new(Wild, vec![vec![Ace], vec![King]], vec![1, 1]);
        assert!(matches!(Game::from_scenario(opts.clone(), wild), Err(ConfigError::Scenario(_))));
        let too_many = Scenario::new(Ace, vec![vec![Wild, Wild], vec![Wild]], vec![1, 1]);
        assert!(Game::from_scenario(opts.clone(), too_many).is_err());
        let bad_bullet = Scenario::new(Ace, vec![vec![Ace], vec![King]], vec![0, 1]);
        assert!(Game::from_scenario(opts, bad_bullet).is_err());

        let three = GameOptions::new(3).unwrap();
        let repeat = Scenario::new(Ace, vec![vec![Ace], vec![King], vec![]], vec![1, 1, 1])
            .with_eliminated(&[2, 2]);
        assert!(matches!(
            Game::from_scenario(three.clone(), repeat),
            Err(ConfigError::Scenario(msg)) if msg.contains("listed twice")
        ));
        let one_dead = Scenario::new(Ace, vec![vec![Ace], vec![King], vec![]], vec![1, 1, 1])
            .with_eliminated(&[2]);
        let g = Game::from_scenario(three, one_dead).unwrap();
        assert_eq!(g.alive_seats(), vec![0, 1]);
    }

    #[test]
    fn challenge_record_counts_the_challengers_shots() {
        let mut g = scenario_game(vec![vec![Queen, Ace], vec![King, King]], vec![3, 6], King);
        g.action_play(&[Queen]).unwrap();
        let report = g.action_challenge().unwrap();
        let rec = report.events.iter().find_map(GameEvent::as_action).unwrap();
        assert_eq!(rec.seat, 1);
        assert_eq!(rec.outcome.and_then(|o| o.shooter), Some(0));
        assert_eq!(rec.shots_fired, g.players()[1].shots_fired());
        assert_eq!(g.players()[0].shots_fired(), 1);
    }

    #[test]
    fn history_paging() {
        let mut g = scenario_game(
            vec![vec![Ace, Ace, Ace], vec![King, King, King]],
            vec![6, 6],
            Ace,
        );
        g.action_play(&[Ace]).unwrap();
        g.action_play(&[King]).unwrap();
        let len = g.history_len();
        assert_eq!(g.history_recent(1).len(), 1);
        assert_eq!(g.history_recent_offset(1, 1), g.events()[len - 2..len - 1].to_vec());
        assert_eq!(g.events_since(len).len(), 0);
        assert!(g.history_recent(0).is_empty());
    }
}
