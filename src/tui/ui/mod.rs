mod layout;
mod menu;
mod table;

use crate::tui::app::{AppState, Scene};
use ratatui::prelude::{Frame, Rect};
use ratatui::widgets::{Paragraph, Wrap};

const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 24;

pub fn draw(f: &mut Frame, app: &AppState) {
    let area = f.area();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        draw_too_small(f, area);
        return;
    }
    match app.scene {
        Scene::Menu => menu::draw_menu(f, app),
        Scene::Table => table::draw_table(f, app),
    }
}

fn draw_too_small(f: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal is {}x{}; Liar's Bar needs at least {MIN_WIDTH}x{MIN_HEIGHT}.",
        area.width, area.height
    );
    f.render_widget(Paragraph::new(msg).wrap(Wrap { trim: true }), area);
}
