use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use liars_bar::agents::{AgentTable, BotProfile};
use liars_bar::config::Cli;
use liars_bar::game::Game;
use liars_bar::record::{describe_event, Session};
use liars_bar::tui::{
    app::{AppState, TableSettings},
    controller,
};
use ratatui::prelude::*;
use std::fs::{self, File};
use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;

const LOG_FILE: &str = "liars-bar.log";
const MAX_AUTO_TURNS: usize = 100_000;

/// In the TUI, log lines go to a file so they do not tear the screen.
fn init_logging(cli: &Cli, to_file: bool) -> Result<()> {
    let level = match (cli.debug, to_file) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    if to_file {
        fs::create_dir_all(&cli.log_dir)
            .with_context(|| format!("creating log directory {}", cli.log_dir.display()))?;
        let path = cli.log_dir.join(LOG_FILE);
        let file = File::options()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_tui(cli: &Cli) -> Result<()> {
    let mut settings = TableSettings::default();
    settings.options = cli.game_options()?;
    settings.human = cli.human_seat()?;
    settings.strategy = cli.strategy;
    settings.bot_delay_ms = cli.bot_delay_ms;
    settings.reveal = cli.debug;
    settings.log_dir = (!cli.no_record).then(|| cli.log_dir.clone());
    let mut app = AppState::new(settings)?;

    let mut terminal = setup_terminal()?;
    let res = controller::run(&mut terminal, &mut app, Duration::from_millis(100));

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    app.finish();
    res.context("terminal UI failed")
}

/// Play an all-bot game and print every event as it happens.
fn run_auto(cli: &Cli) -> Result<()> {
    let mut game = Game::new(cli.game_options()?)?;
    let mut profile = BotProfile::for_strategy(cli.strategy);
    if let Some(seed) = cli.seed {
        profile = profile.with_seed(seed);
    }
    let mut table = AgentTable::with_bots(game.players().len(), None, &profile);
    let mut session =
        if cli.no_record { Session::detached() } else { Session::open(&cli.log_dir)? };

    let mut printed = 0;
    for _ in 0..MAX_AUTO_TURNS {
        for event in game.events_since(printed) {
            println!("{}", describe_event(event, cli.debug));
        }
        printed = game.history_len();
        if game.is_game_over() {
            break;
        }
        if !table.on_turn(&mut game)? {
            bail!("seat {} has no agent to act for it", game.current());
        }
        session.sync(&game);
    }
    session.close(&game);

    let Some(winner) = game.winner() else {
        bail!("no winner after {MAX_AUTO_TURNS} turns");
    };
    println!();
    println!("P{winner} wins after {} turns and {} rounds.", game.turn_count(), game.round());
    for t in game.tallies() {
        println!(
            "  P{}: {}, {} shot(s), challenges {} won / {} lost, {} round(s) survived",
            t.seat,
            if t.alive { "alive" } else { "out" },
            t.shots_fired,
            t.challenge_success,
            t.challenge_fail,
            t.rounds_survived
        );
    }
    if let Some(dir) = session.dir() {
        println!("Records written to {}", dir.display());
    }
    if session.failures() > 0 {
        eprintln!("warning: {} record write(s) failed", session.failures());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.auto {
        init_logging(&cli, false)?;
        return run_auto(&cli);
    }
    if !io::stdout().is_terminal() {
        println!(
            "liars-bar TUI requires a real terminal (TTY).\nUse --auto for a headless all-bot game. Version: {}",
            liars_bar::VERSION
        );
        return Ok(());
    }
    init_logging(&cli, true)?;
    run_tui(&cli)
}
