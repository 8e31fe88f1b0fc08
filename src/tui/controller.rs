use crate::tui::app::{AppState, InputAction, Scene};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.agents_on_turn();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// What a key press asks of the app.
enum KeyIntent {
    Quit,
    /// Bookkeeping input that never takes a turn.
    Ui(InputAction),
    /// Input that may commit the human seat's turn.
    Turn(InputAction),
}

fn overlay_intent(app: &AppState, code: KeyCode) -> Option<KeyIntent> {
    if app.help_open() {
        return matches!(code, KeyCode::Esc).then_some(KeyIntent::Ui(InputAction::ToggleHelp));
    }
    let action = match code {
        KeyCode::Up => InputAction::HistoryUp,
        KeyCode::Down => InputAction::HistoryDown,
        KeyCode::Esc => InputAction::ToggleHistory,
        _ => return None,
    };
    Some(KeyIntent::Ui(action))
}

fn menu_intent(code: KeyCode) -> Option<KeyIntent> {
    let action = match code {
        KeyCode::Char('q' | 'Q') => return Some(KeyIntent::Quit),
        KeyCode::Up => InputAction::MenuPrev,
        KeyCode::Down => InputAction::MenuNext,
        KeyCode::Char('+' | '=') | KeyCode::Right => InputAction::MenuInc,
        KeyCode::Char('-' | '_') | KeyCode::Left => InputAction::MenuDec,
        KeyCode::Enter => InputAction::MenuApply,
        KeyCode::Esc => InputAction::MenuCancel,
        KeyCode::Char('m' | 'M') => InputAction::ToggleMenu,
        _ => return None,
    };
    Some(KeyIntent::Ui(action))
}

fn table_intent(code: KeyCode) -> Option<KeyIntent> {
    let turn = match code {
        KeyCode::Char('p' | 'P') | KeyCode::Enter => Some(InputAction::PlaySelected),
        KeyCode::Char('c' | 'C') => Some(InputAction::Challenge),
        KeyCode::Char('s' | 'S') => Some(InputAction::Skip),
        KeyCode::Char('x' | 'X') => Some(InputAction::Shoot),
        _ => None,
    };
    if let Some(action) = turn {
        return Some(KeyIntent::Turn(action));
    }
    let action = match code {
        KeyCode::Char('m' | 'M') => InputAction::ToggleMenu,
        KeyCode::Char(' ') => InputAction::NewGame,
        // '1' is the first card, '0' the tenth.
        KeyCode::Char(c @ '0'..='9') => {
            InputAction::ToggleCard((c as u8 - b'0' + 9) as usize % 10)
        }
        KeyCode::Backspace | KeyCode::Esc => InputAction::ClearSelection,
        KeyCode::Char('d' | 'D') => InputAction::BotStrategyNext,
        KeyCode::Char(']') => InputAction::FocusNext,
        KeyCode::Char('[') => InputAction::FocusPrev,
        _ => return None,
    };
    Some(KeyIntent::Ui(action))
}

/// Returns true when the app should quit.
fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    let intent = match code {
        KeyCode::Char('?') => Some(KeyIntent::Ui(InputAction::ToggleHelp)),
        KeyCode::Char('h' | 'H') => Some(KeyIntent::Ui(InputAction::ToggleHistory)),
        _ if app.help_open() || app.history_open() => overlay_intent(app, code),
        _ => match app.scene {
            Scene::Menu => menu_intent(code),
            Scene::Table => table_intent(code),
        },
    };
    match intent {
        Some(KeyIntent::Quit) => return true,
        Some(KeyIntent::Ui(action)) => {
            app.handle_input(action);
        }
        // Apply an accepted turn right away instead of on the next tick.
        Some(KeyIntent::Turn(action)) => {
            if app.handle_input(action) {
                app.agents_on_turn();
            }
        }
        None => {}
    }
    false
}
