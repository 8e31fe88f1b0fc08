use liars_bar::agents::{AgentTable, BotProfile, StrategyKind};
use liars_bar::config::GameOptions;
use liars_bar::game::{Game, GameEvent};
use liars_bar::record::{
    GameCounter, Session, EVENTS_FILE, GAME_INFO_FILE, GOD_VIEW_FILE, ROUNDS_FILE,
};
use liars_bar::tui::app::{AppState, InputAction, TableSettings};
use std::fs;

fn finished_game(seed: u64) -> Game {
    let mut game = Game::new(GameOptions::new(3).unwrap().with_seed(seed)).unwrap();
    let profile = BotProfile::for_strategy(StrategyKind::Rule).with_seed(seed);
    let mut table = AgentTable::with_bots(3, None, &profile);
    table.run_to_end(&mut game, 20_000).unwrap();
    assert!(game.is_game_over());
    game
}

#[test]
fn session_writes_every_event_and_both_logs() {
    let tmp = tempfile::tempdir().unwrap();
    let game = finished_game(8);
    let mut session = Session::open(tmp.path()).unwrap();
    assert_eq!(session.game_number(), 1);
    session.close(&game);
    assert!(session.is_closed());
    assert_eq!(session.failures(), 0);

    let dir = session.dir().unwrap();
    assert!(dir.file_name().unwrap().to_string_lossy().starts_with("game_1_"));
    let events = fs::read_to_string(dir.join(EVENTS_FILE)).unwrap();
    assert_eq!(events.lines().count(), game.history_len());
    let last: GameEvent = serde_json::from_str(events.lines().last().unwrap()).unwrap();
    assert!(matches!(last, GameEvent::GameOver { .. }));

    let rounds = fs::read_to_string(dir.join(ROUNDS_FILE)).unwrap();
    let god = fs::read_to_string(dir.join(GOD_VIEW_FILE)).unwrap();
    assert!(rounds.contains("Liar's Bar: game 1"));
    assert!(god.contains("| Seat | Hand | Bullet |"));
    assert!(god.len() > rounds.len(), "god view adds the deals");
}

#[test]
fn game_numbers_persist_across_sessions() {
    let tmp = tempfile::tempdir().unwrap();
    let counter = GameCounter::new(tmp.path());
    assert_eq!(counter.current().unwrap(), 0);

    let first = Session::open(tmp.path()).unwrap();
    let second = Session::open(tmp.path()).unwrap();
    assert_eq!((first.game_number(), second.game_number()), (1, 2));
    assert_ne!(first.dir(), second.dir());
    assert_eq!(counter.current().unwrap(), 2);

    let info = fs::read_to_string(tmp.path().join(GAME_INFO_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&info).unwrap();
    assert_eq!(json["game_count"], 2);
}

#[test]
fn closed_session_ignores_later_events() {
    let game = finished_game(21);
    let mut session = Session::detached();
    session.close(&game);
    assert_eq!(session.sync(&game), 0);
}

#[test]
fn tui_table_records_a_watched_game() {
    let tmp = tempfile::tempdir().unwrap();
    let mut settings = TableSettings::default();
    settings.options = GameOptions::new(2).unwrap().with_seed(77);
    settings.human = None;
    settings.bot_delay_ms = 0;
    settings.log_dir = Some(tmp.path().to_path_buf());
    let mut app = AppState::new(settings).unwrap();

    app.handle_input(InputAction::NewGame);
    assert_eq!(app.session().game_number(), 1);
    for _ in 0..20_000 {
        if app.game.is_game_over() {
            break;
        }
        app.agents_on_turn();
    }
    assert!(app.game.is_game_over());
    assert!(app.session().is_closed());

    let dir = app.session().dir().unwrap().to_path_buf();
    let events = fs::read_to_string(dir.join(EVENTS_FILE)).unwrap();
    assert_eq!(events.lines().count(), app.game.history_len());

    app.handle_input(InputAction::NewGame);
    assert_eq!(app.session().game_number(), 2);
    app.finish();
    assert!(app.session().is_closed());
}
