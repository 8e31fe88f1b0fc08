use ratatui::layout::{Constraint, Direction};
use ratatui::prelude::{Layout, Rect};

/// The area inside a one-cell border. Collapses to zero on tiny terminals.
pub(super) fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(margins(percent_y))
        .split(r);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(margins(percent_x))
        .split(rows[1]);
    cols[1]
}

fn margins(percent: u16) -> [Constraint; 3] {
    let side = (100 - percent.min(100)) / 2;
    [Constraint::Percentage(side), Constraint::Percentage(percent), Constraint::Percentage(side)]
}

/// `n` equal columns across `area`.
pub(super) fn columns(area: Rect, n: usize) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }
    let width = area.width / n as u16;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..n).map(|_| Constraint::Length(width)).collect::<Vec<_>>())
        .split(area)
        .to_vec()
}
