use crate::cards::Rank;
use crate::player::Player;
use crate::record::describe_event;
use crate::rules::ActionKind;
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, columns, inner};

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(5), // hand
            Constraint::Min(3),    // seats
            Constraint::Length(5), // status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    draw_hand(f, chunks[1], app);
    draw_seats(f, chunks[2], app);
    draw_status(f, chunks[3], app);

    if app.help_open() {
        draw_help(f);
    } else if app.history_open() {
        draw_history(f, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &AppState) {
    let game = &app.game;
    let target_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let first = Line::from(vec![
        Span::raw(format!("Round {}   Target: ", game.round())),
        Span::styled(game.target().to_string(), target_style),
        Span::raw(format!(
            "   Rules: {}   Turn {}   Alive {}/{}",
            game.ruleset().label(),
            game.turn_count(),
            game.alive_count(),
            game.players().len()
        )),
    ]);
    let claim = match game.last_play() {
        Some(lp) => format!("Last claim: P{} says {} x {}", lp.seat, lp.cards.len(), game.target()),
        None => "No claim on the table".to_string(),
    };
    let second =
        Line::from(format!("{claim}   Claimed this round: {}", game.claimed_this_round()));
    let title = match app.session().game_number() {
        0 => "liars-bar".to_string(),
        n => format!("liars-bar: game {n}"),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    f.render_widget(Paragraph::new(vec![first, second]).block(block), area);
}

/// The seat whose cards the hand panel shows, and whether they belong to
/// the human.
fn shown_hand_seat(app: &AppState) -> Option<(usize, bool)> {
    match app.human_seat() {
        Some(seat) => Some((seat, true)),
        None if app.reveal() => Some((app.focus, false)),
        None => None,
    }
}

fn draw_hand(f: &mut Frame, area: Rect, app: &AppState) {
    let Some((seat, own)) = shown_hand_seat(app) else {
        let block = Block::default().title("Spectating").borders(Borders::ALL);
        let para = Paragraph::new("Bots only. Press Space to start, ? for help.").block(block);
        f.render_widget(para, area);
        return;
    };
    let title = if own { format!("Your hand (P{seat})") } else { format!("P{seat} (revealed)") };
    let block = Block::default().title(title).borders(Borders::ALL);
    let hand_inner = inner(area);
    f.render_widget(block, area);
    let Some(player) = app.game.player(seat) else {
        return;
    };
    if !player.alive() {
        f.render_widget(Paragraph::new("Eliminated."), hand_inner);
        return;
    }
    let cards = player.hand().as_slice();
    let slots = columns(hand_inner, cards.len().max(1));
    for (i, (&card, slot)) in cards.iter().zip(slots).enumerate() {
        let selected = own && app.is_selected(i);
        let label = if own { Some(i + 1) } else { None };
        render_card_widget(f, slot, card, app.game.target(), label, selected);
    }
}

fn draw_seats(f: &mut Frame, area: Rect, app: &AppState) {
    let players = app.game.players();
    let total = players.len();
    let top_cols = (total + 1) / 2;
    let bottom_cols = total - top_cols;
    let row_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);
    for (r, cols_this) in [top_cols, bottom_cols].into_iter().enumerate() {
        let col_chunks = columns(row_chunks[r], cols_this);
        for (c, seat_area) in col_chunks.into_iter().enumerate() {
            // Top row left to right, bottom row right to left, like a ring.
            let idx = if r == 0 { c } else { total - 1 - c };
            if let Some(p) = players.get(idx) {
                render_player_card(f, seat_area, app, idx, p);
            }
        }
    }
}

fn render_player_card(f: &mut Frame, seat_area: Rect, app: &AppState, idx: usize, p: &Player) {
    let game = &app.game;
    let running = app.game_started && !game.is_game_over();
    let mut title = p.name().to_string();
    if app.human_seat() == Some(idx) {
        title.push_str(" [You]");
    }
    if let Some(label) = app.bot_profile_label(idx) {
        title.push_str(&format!(" [BOT:{label}]"));
    }
    if idx == app.focus {
        title.push_str(" [Focus]");
    }
    if !p.alive() {
        title.push_str(" [OUT]");
    } else if running && idx == game.current() {
        title.push_str(" [Act]");
    }

    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut lines: Vec<Line> = Vec::with_capacity(6);
    lines.push(Line::from(format!("Cards: {}", p.hand().len())));
    lines.push(Line::from(format!("Shots taken: {}", p.shots_fired())));
    lines.push(Line::from(format!(
        "Challenges: {} won / {} lost",
        p.challenge_success(),
        p.challenge_fail()
    )));
    lines.push(match p.last_action() {
        Some(last) => Line::from(format!("Last: {last}")),
        None => Line::from(vec![Span::raw("Last: "), Span::styled("--", dim)]),
    });
    if app.reveal() && p.alive() {
        lines.push(Line::from(Span::styled(format!("Hand: {}", p.hand()), dim)));
        let gun = p.revolver();
        lines.push(Line::from(Span::styled(
            format!("Bullet {} / hammer {}", gun.bullet(), gun.hammer()),
            dim,
        )));
    }

    let mut block = Block::default().title(title).borders(Borders::ALL);
    if !p.alive() {
        block = block.border_style(Style::default().fg(Color::DarkGray));
    } else if game.winner() == Some(idx) {
        block = block.border_style(Style::default().fg(Color::Green));
    } else if running && idx == game.current() && idx == app.focus {
        block = block.border_style(Style::default().fg(Color::Magenta));
    } else if running && idx == game.current() {
        block = block.border_style(Style::default().fg(Color::Yellow));
    } else if idx == app.focus {
        block = block.border_style(Style::default().fg(Color::Cyan));
    }
    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, seat_area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(inner(area));
    let game = &app.game;

    let mut left_info = if !app.game_started {
        vec![Line::from("Cards are dealt. Press Space to start.")]
    } else if let Some(winner) = game.winner() {
        vec![Line::from(Span::styled(
            format!("P{winner} is the last one standing. Space for a new game."),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))]
    } else if app.is_human_turn() {
        vec![Line::from(Span::styled(
            "Your turn.",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))]
    } else {
        vec![Line::from(format!("Waiting for P{}.", game.current()))]
    };

    if let Some(err) = app.action_error() {
        left_info.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(event) = game.history_recent(1).first() {
        left_info.push(Line::from(describe_event(event, app.reveal())));
    }

    if app.human_seat().is_some() && app.game_started && !game.is_game_over() {
        let available = if app.is_human_turn() { game.available_actions() } else { Vec::new() };
        let action_style = |kind: ActionKind| {
            if available.contains(&kind) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            }
        };
        let staged = app.selected_cards();
        let play_label = if staged.is_empty() {
            "P play".to_string()
        } else {
            format!("P play [{}]", crate::cards::format_cards(&staged))
        };
        let mut spans = vec![
            Span::raw("Actions: "),
            Span::styled(play_label, action_style(ActionKind::Play)),
            Span::raw(" • "),
            Span::styled("C challenge", action_style(ActionKind::Challenge)),
        ];
        if available.contains(&ActionKind::Skip) || available.contains(&ActionKind::Shoot) {
            spans.push(Span::raw(" • "));
            spans.push(Span::styled("S skip", action_style(ActionKind::Skip)));
            spans.push(Span::raw(" • "));
            spans.push(Span::styled("X shoot", action_style(ActionKind::Shoot)));
        }
        left_info.push(Line::from(spans));
    }

    let right_keys = vec![
        Line::from("1-9, 0 pick cards • Space start"),
        Line::from("? help • H history • M menu"),
    ];
    let left_para = Paragraph::new(left_info).wrap(Wrap { trim: true });
    let right_para =
        Paragraph::new(right_keys).wrap(Wrap { trim: true }).alignment(Alignment::Right);
    f.render_widget(left_para, cols[0]);
    f.render_widget(right_para, cols[1]);
}

fn draw_history(f: &mut Frame, app: &AppState) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("History").borders(Borders::ALL);
    let mut lines: Vec<Line> = Vec::new();
    let entries = app.game.history_recent_offset(AppState::HISTORY_PAGE_SIZE, app.history_offset());
    if entries.is_empty() {
        lines.push(Line::from("No history yet."));
    } else {
        for entry in &entries {
            lines.push(Line::from(describe_event(entry, app.reveal())));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down scroll • Close: H or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Rules:", bold)),
        Line::from("- Play 1-3 cards face down, claiming they all match the target."),
        Line::from("- Wild matches any target."),
        Line::from("- Call a lie: if it was one, the liar pulls the trigger; if not, you do."),
        Line::from("- Emptying your hand gets checked by the table automatically."),
        Line::from(""),
        Line::from(Span::styled("Table:", bold)),
        Line::from("- Space: start / new game"),
        Line::from("- 1-9, 0: pick or drop a card (0 is the tenth)"),
        Line::from("- P or Enter: play picked cards"),
        Line::from("- Backspace: drop all picks"),
        Line::from("- C: challenge the last claim"),
        Line::from("- S / X: skip / shoot (extended rules)"),
        Line::from("- D: cycle bot strategy (focus)"),
        Line::from("- ] / [: focus next / prev"),
        Line::from("- H: history"),
        Line::from(""),
        Line::from(Span::styled("Menu:", bold)),
        Line::from("- M: open / close menu"),
        Line::from("- Up / Down: move, + / -: adjust"),
        Line::from("- Enter: apply, Esc: cancel, Q: quit"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

fn rank_style(card: Rank, target: Rank) -> Style {
    if card.is_wild() {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else if card.matches(target) {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_card_widget(
    f: &mut Frame,
    area: Rect,
    card: Rank,
    target: Rank,
    label: Option<usize>,
    selected: bool,
) {
    let mut block = Block::default().borders(Borders::ALL).title_alignment(Alignment::Center);
    if let Some(n) = label {
        block = block.title(n.to_string());
    }
    if selected {
        block = block.border_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    }
    let content = Line::from(Span::styled(card.to_string(), rank_style(card, target)));
    let para = Paragraph::new(content).block(block).alignment(Alignment::Center);
    f.render_widget(para, area);
}
