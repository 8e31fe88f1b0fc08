use crate::agents::{AgentKind, AgentTable, BotAgent, BotProfile, StrategyKind};
use crate::cards::Rank;
use crate::config::{ConfigError, GameOptions};
use crate::engine::Decision;
use crate::game::Game;
use crate::record::Session;
use crate::rules::{Action, Ruleset, MAX_PLAY};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    ToggleHistory,
    HistoryUp,
    HistoryDown,
    NewGame,
    /// Stage or unstage the card at this position of the human hand.
    ToggleCard(usize),
    ClearSelection,
    PlaySelected,
    Challenge,
    Skip,
    Shoot,
    BotStrategyNext,
    FocusNext,
    FocusPrev,
}

/// Everything needed to build a table: game options plus who sits where.
#[derive(Debug, Clone)]
pub struct TableSettings {
    pub options: GameOptions,
    /// Seat played from the keyboard; `None` to watch bots only.
    pub human: Option<usize>,
    pub strategy: StrategyKind,
    pub bot_delay_ms: u64,
    /// Show every hand and chamber (debug).
    pub reveal: bool,
    /// Where session records go; `None` disables recording.
    pub log_dir: Option<PathBuf>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            options: GameOptions::default(),
            human: Some(0),
            strategy: StrategyKind::Rule,
            bot_delay_ms: 600,
            reveal: false,
            log_dir: None,
        }
    }
}

/// A freshly dealt game with agents seated.
struct Table {
    game: Game,
    agents: AgentTable,
    human: Option<usize>,
    strategies: Vec<Option<StrategyKind>>,
}

fn build_table(settings: &TableSettings, game_index: u64) -> Result<Table, ConfigError> {
    let mut options = settings.options.clone();
    options.seed = options.seed.map(|s| s.wrapping_add(game_index));
    let game = Game::new(options)?;
    let n = game.players().len();
    let human = settings.human.filter(|&s| s < n);
    let delay = settings.bot_delay_ms;
    let mut profile = BotProfile::for_strategy(settings.strategy).with_delay(delay, delay);
    if let Some(seed) = settings.options.seed {
        profile = profile.with_seed(seed.wrapping_add(game_index).rotate_left(7));
    }
    let mut agents = AgentTable::with_bots(n, human, &profile);
    agents.set_min_action_delay_ms(delay.min(150));
    let strategies =
        (0..n).map(|s| if Some(s) == human { None } else { Some(settings.strategy) }).collect();
    Ok(Table { game, agents, human, strategies })
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub started: Instant,
    // Core game engine instance
    pub game: Game,
    // UI focus seat index (does not auto-move with action)
    pub focus: usize,
    pub agents: AgentTable,
    pub settings: TableSettings,
    // Menu config being edited
    pub menu_index: usize,
    pub cfg_num_players: usize,
    pub cfg_human: bool,
    pub cfg_strategy: StrategyKind,
    pub cfg_extended: bool,
    pub cfg_bot_delay_ms: u64,
    pub game_started: bool,
    pub(crate) bot_strategies: Vec<Option<StrategyKind>>,
    human: Option<usize>,
    session: Session,
    games_built: u64,
    selected: Vec<usize>,
    selection_round: u32,
    help_open: bool,
    history_open: bool,
    history_offset: usize,
    action_error: Option<String>,
    action_error_at: Option<Instant>,
}

impl AppState {
    pub const HISTORY_PAGE_SIZE: usize = 20;
    const ACTION_ERROR_TTL: Duration = Duration::from_secs(3);

    /// Deal the first game. Play begins once [`InputAction::NewGame`] arrives.
    pub fn new(settings: TableSettings) -> Result<Self, ConfigError> {
        let table = build_table(&settings, 0)?;
        let focus = table.human.unwrap_or(0);
        let round = table.game.round();
        Ok(Self {
            scene: Scene::Table,
            started: Instant::now(),
            game: table.game,
            focus,
            agents: table.agents,
            menu_index: 0,
            cfg_num_players: settings.options.players,
            cfg_human: settings.human.is_some(),
            cfg_strategy: settings.strategy,
            cfg_extended: settings.options.ruleset == Ruleset::Extended,
            cfg_bot_delay_ms: settings.bot_delay_ms,
            game_started: false,
            bot_strategies: table.strategies,
            human: table.human,
            session: Session::detached(),
            games_built: 1,
            selected: Vec::new(),
            selection_round: round,
            help_open: false,
            history_open: false,
            history_offset: 0,
            action_error: None,
            action_error_at: None,
            settings,
        })
    }

    /// Close the current session and deal a new game from `settings`.
    pub(crate) fn rebuild_table(&mut self) -> Result<(), ConfigError> {
        let table = build_table(&self.settings, self.games_built)?;
        self.session.close(&self.game);
        self.games_built += 1;
        self.focus = table.human.unwrap_or(0);
        self.selection_round = table.game.round();
        self.game = table.game;
        self.agents = table.agents;
        self.human = table.human;
        self.bot_strategies = table.strategies;
        self.session = Session::detached();
        self.game_started = false;
        self.selected.clear();
        self.history_offset = 0;
        Ok(())
    }

    fn open_session(&self) -> Session {
        let Some(dir) = self.settings.log_dir.as_deref() else {
            return Session::detached();
        };
        match Session::open(dir) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("recording disabled for this game: {e}");
                Session::detached()
            }
        }
    }

    /// The human seat, when it is that seat's turn in a running game.
    fn human_to_act(&self) -> Option<usize> {
        if self.scene != Scene::Table || !self.game_started || self.game.is_game_over() {
            return None;
        }
        let seat = self.game.current();
        if self.human != Some(seat) {
            return None;
        }
        matches!(self.agents.agent_kind(seat), Some(AgentKind::Human)).then_some(seat)
    }

    fn queue_decision(&mut self, decision: Decision) -> bool {
        let Some(seat) = self.human_to_act() else {
            return false;
        };
        self.clear_action_error();
        self.agents.receive(seat, decision)
    }

    pub fn human_seat(&self) -> Option<usize> {
        self.human
    }

    pub fn is_human_turn(&self) -> bool {
        self.human_to_act().is_some()
    }

    pub fn reveal(&self) -> bool {
        self.settings.reveal
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    fn set_action_error(&mut self, msg: impl Into<String>) {
        self.action_error = Some(msg.into());
        self.action_error_at = Some(Instant::now());
    }

    fn clear_action_error(&mut self) {
        self.action_error = None;
        self.action_error_at = None;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn history_offset(&self) -> usize {
        self.history_offset
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    pub(crate) fn close_history(&mut self) {
        self.history_open = false;
    }

    pub fn bot_profile_label(&self, seat: usize) -> Option<&'static str> {
        if !matches!(self.agents.agent_kind(seat), Some(AgentKind::Bot)) {
            return None;
        }
        let kind = self.bot_strategies.get(seat).copied().flatten().unwrap_or(StrategyKind::Rule);
        Some(kind.label())
    }

    /// Positions in the human hand staged for the next play, in pick order.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn is_selected(&self, idx: usize) -> bool {
        self.selected.contains(&idx)
    }

    pub fn selected_cards(&self) -> Vec<Rank> {
        let Some(hand) = self.human.and_then(|s| self.game.player(s)).map(|p| p.hand()) else {
            return Vec::new();
        };
        self.selected.iter().filter_map(|&i| hand.as_slice().get(i).copied()).collect()
    }

    fn toggle_card(&mut self, idx: usize) {
        let held = self.human.and_then(|s| self.game.player(s)).map_or(0, |p| p.hand().len());
        self.selected.retain(|&i| i < held);
        if idx >= held {
            return;
        }
        if let Some(pos) = self.selected.iter().position(|&i| i == idx) {
            self.selected.remove(pos);
        } else if self.selected.len() < MAX_PLAY {
            self.selected.push(idx);
        } else {
            self.set_action_error(format!("At most {MAX_PLAY} cards per play"));
        }
    }

    fn play_selected(&mut self) -> bool {
        if self.human_to_act().is_none() {
            return false;
        }
        let cards = self.selected_cards();
        if cards.is_empty() {
            self.set_action_error("Select 1-3 cards first");
            return false;
        }
        if self.queue_decision(Decision::play(cards)) {
            self.selected.clear();
            return true;
        }
        false
    }

    /// Apply one input. Returns true only when a turn decision was handed
    /// to the human seat's agent.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        use InputAction as In;
        match (self.scene, action) {
            (_, In::ToggleMenu) => self.toggle_menu(),
            (_, In::PlaySelected) => return self.play_selected(),
            (_, In::Challenge) => return self.queue_decision(Decision::new(Action::Challenge)),
            (_, In::Skip) => return self.queue_decision(Decision::new(Action::Skip)),
            (_, In::Shoot) => return self.queue_decision(Decision::new(Action::Shoot)),
            (_, In::ClearSelection) => self.selected.clear(),
            (Scene::Menu, In::MenuNext) => self.menu_next(),
            (Scene::Menu, In::MenuPrev) => self.menu_prev(),
            (Scene::Menu, In::MenuInc) => self.menu_inc(),
            (Scene::Menu, In::MenuDec) => self.menu_dec(),
            (Scene::Menu, In::MenuApply) => self.apply_menu(),
            (Scene::Menu, In::MenuCancel) => self.cancel_menu(),
            (Scene::Table, In::ToggleHelp) => {
                self.history_open = false;
                self.help_open = !self.help_open;
            }
            (Scene::Table, In::ToggleHistory) => {
                self.help_open = false;
                self.history_open = !self.history_open;
                self.history_offset = 0;
            }
            (Scene::Table, In::HistoryUp) if self.history_open => self.scroll_history(1),
            (Scene::Table, In::HistoryDown) if self.history_open => self.scroll_history(-1),
            (Scene::Table, In::NewGame) => self.new_game(),
            (Scene::Table, In::ToggleCard(idx)) => self.toggle_card(idx),
            (Scene::Table, In::BotStrategyNext) => self.cycle_focus_bot_strategy(),
            (Scene::Table, In::FocusNext) => self.focus_next(),
            (Scene::Table, In::FocusPrev) => self.focus_prev(),
            _ => {}
        }
        false
    }

    /// Positive steps page back into older events.
    fn scroll_history(&mut self, step: isize) {
        let oldest = self.game.history_len().saturating_sub(Self::HISTORY_PAGE_SIZE);
        self.history_offset = self.history_offset.saturating_add_signed(step).min(oldest);
    }

    /// Start play on the dealt table, or deal a fresh game once the last one
    /// is over. Ignored while a game is running.
    pub fn new_game(&mut self) {
        if self.game_started && !self.game.is_game_over() {
            return;
        }
        if self.game_started {
            if let Err(e) = self.rebuild_table() {
                self.set_action_error(e.to_string());
                return;
            }
        }
        self.game_started = true;
        self.history_offset = 0;
        self.clear_action_error();
        self.session = self.open_session();
        self.session.sync(&self.game);
        log::info!(
            "game {} started: {} players, {} rules",
            self.session.game_number(),
            self.game.players().len(),
            self.game.ruleset().label()
        );
    }

    pub fn focus_next(&mut self) {
        if self.game.players().is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % self.game.players().len();
    }

    pub fn focus_prev(&mut self) {
        if self.game.players().is_empty() {
            return;
        }
        let n = self.game.players().len();
        self.focus = (self.focus + n - 1) % n;
    }

    pub fn cycle_focus_bot_strategy(&mut self) {
        if !matches!(self.agents.agent_kind(self.focus), Some(AgentKind::Bot)) {
            return;
        }
        let n = self.game.players().len();
        if self.bot_strategies.len() < n {
            self.bot_strategies.resize(n, Some(self.settings.strategy));
        }
        let current = self.bot_strategies[self.focus].unwrap_or(self.settings.strategy);
        let next = current.next();
        let delay = self.settings.bot_delay_ms;
        let mut profile = BotProfile::for_strategy(next).with_delay(delay, delay);
        if let Some(seed) = self.settings.options.seed {
            profile = profile.with_seed(seed.wrapping_add(self.focus as u64));
        }
        self.bot_strategies[self.focus] = Some(next);
        self.agents.set_agent(self.focus, Some(Box::new(BotAgent::new(profile))));
        log::debug!("seat {} now plays the {next} strategy", self.focus);
    }

    /// Drive whichever agent holds the turn, then forward new events to
    /// the session. Called on every tick and right after human input.
    pub fn agents_on_turn(&mut self) {
        if self.scene != Scene::Table || !self.game_started {
            return;
        }
        if let Some(at) = self.action_error_at {
            if at.elapsed() >= Self::ACTION_ERROR_TTL {
                self.clear_action_error();
            }
        }
        self.agents.ensure_len(self.game.players().len());
        match self.agents.on_turn(&mut self.game) {
            Ok(true) => {
                self.clear_action_error();
                self.after_action();
            }
            Ok(false) => {}
            Err(err) => self.set_action_error(err.to_string()),
        }
    }

    /// Flush the session on quit. A game cut short is recorded as far as it got.
    pub fn finish(&mut self) {
        self.session.close(&self.game);
    }

    fn after_action(&mut self) {
        self.session.sync(&self.game);
        if self.game.round() != self.selection_round {
            self.selection_round = self.game.round();
            self.selected.clear();
        }
        if self.game.is_game_over() && !self.session.is_closed() {
            self.session.close(&self.game);
            if let Some(winner) = self.game.winner() {
                log::info!("game {} won by seat {winner}", self.session.game_number());
            }
        }
    }
}
