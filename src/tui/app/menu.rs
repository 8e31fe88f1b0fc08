use crate::deck::{MAX_PLAYERS, MIN_PLAYERS};
use crate::rules::Ruleset;

use super::AppState;

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Players,
    Seat,
    Strategy,
    Rules,
    BotDelayMs,
}

const DELAY_STEP_MS: u64 = 100;

const MENU_ITEMS: [MenuItem; 5] =
    [MenuItem::Players, MenuItem::Seat, MenuItem::Strategy, MenuItem::Rules, MenuItem::BotDelayMs];

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::Players => format!("Players: {}", app.cfg_num_players),
            MenuItem::Seat => {
                format!("You: {}", if app.cfg_human { "play a seat" } else { "watch the bots" })
            }
            MenuItem::Strategy => format!("Bot Strategy: {}", app.cfg_strategy),
            MenuItem::Rules => {
                format!("Rules: {}", if app.cfg_extended { "Extended" } else { "Classic" })
            }
            MenuItem::BotDelayMs => format!("Bot Delay (ms): {}", app.cfg_bot_delay_ms),
        }
    }

    /// Move the item's value one step up (`up`) or down.
    fn step(self, app: &mut AppState, up: bool) {
        match self {
            MenuItem::Players => {
                let n = app.cfg_num_players;
                let n = if up { n + 1 } else { n.saturating_sub(1) };
                app.cfg_num_players = n.clamp(MIN_PLAYERS, MAX_PLAYERS);
            }
            MenuItem::Seat => app.cfg_human = !app.cfg_human,
            MenuItem::Strategy => {
                app.cfg_strategy =
                    if up { app.cfg_strategy.next() } else { app.cfg_strategy.prev() };
            }
            MenuItem::Rules => app.cfg_extended = !app.cfg_extended,
            MenuItem::BotDelayMs => {
                app.cfg_bot_delay_ms = if up {
                    app.cfg_bot_delay_ms.saturating_add(DELAY_STEP_MS)
                } else {
                    app.cfg_bot_delay_ms.saturating_sub(DELAY_STEP_MS)
                };
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_help();
        self.close_history();
        self.scene = match self.scene {
            super::Scene::Menu => super::Scene::Table,
            _ => {
                self.open_menu();
                super::Scene::Menu
            }
        };
    }

    // --- Menu operations ---
    pub fn open_menu(&mut self) {
        self.close_help();
        self.close_history();
        self.menu_index = 0;
        self.cfg_num_players = self.settings.options.players;
        self.cfg_human = self.settings.human.is_some();
        self.cfg_strategy = self.settings.strategy;
        self.cfg_extended = self.settings.options.ruleset == Ruleset::Extended;
        self.cfg_bot_delay_ms = self.settings.bot_delay_ms;
        self.scene = super::Scene::Menu;
    }

    /// Store the edited settings and deal a new table. On a bad combination
    /// (a debug kill seat that no longer exists) the menu stays open.
    pub fn apply_menu(&mut self) {
        let previous = self.settings.clone();
        let n = self.cfg_num_players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self.settings.options.players = n;
        self.settings.options.ruleset =
            if self.cfg_extended { Ruleset::Extended } else { Ruleset::Classic };
        self.settings.human =
            if self.cfg_human { Some(previous.human.unwrap_or(0).min(n - 1)) } else { None };
        self.settings.strategy = self.cfg_strategy;
        self.settings.bot_delay_ms = self.cfg_bot_delay_ms;

        if let Err(e) = self.rebuild_table() {
            log::warn!("menu settings rejected: {e}");
            self.settings = previous;
            self.scene = super::Scene::Menu;
            return;
        }
        self.scene = super::Scene::Table;
    }

    pub fn cancel_menu(&mut self) {
        self.scene = super::Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        MENU_ITEMS[self.menu_index % MENU_ITEMS.len()].step(self, true);
    }
    pub fn menu_dec(&mut self) {
        MENU_ITEMS[self.menu_index % MENU_ITEMS.len()].step(self, false);
    }
}
