//! Session records.
//!
//! The engine only appends to its own event feed. A caller-owned [`Session`]
//! is opened when a game starts, forwards new events to its recorders after
//! each transition, and is closed at game over. Only this module touches
//! disk: the per-session directory and the persisted game counter.

use crate::cards::format_cards;
use crate::game::{ActionRecord, Game, GameEvent, Outcome, Verdict};
use crate::player::PlayerTally;
use crate::rules::ActionKind;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const EVENTS_FILE: &str = "events.jsonl";
pub const ROUNDS_FILE: &str = "rounds.md";
pub const GOD_VIEW_FILE: &str = "god_view.md";
pub const GAME_INFO_FILE: &str = "game_info.json";

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum RecordError {
    #[error("record I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("record serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Consumes committed game events.
pub trait Recorder {
    fn record(&mut self, event: &GameEvent) -> Result<(), RecordError>;
    /// Flush whatever is buffered. Called once when the session closes.
    fn finish(&mut self) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Keeps every event in memory. Clones share the same buffer, so a caller
/// can keep a handle while the session owns the recorder.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl Recorder for MemoryRecorder {
    fn record(&mut self, event: &GameEvent) -> Result<(), RecordError> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

/// One JSON object per line.
#[derive(Debug)]
pub struct JsonLinesRecorder<W: Write> {
    out: W,
}

impl JsonLinesRecorder<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, RecordError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonLinesRecorder<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Recorder for JsonLinesRecorder<W> {
    fn record(&mut self, event: &GameEvent) -> Result<(), RecordError> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Two Markdown logs: the public table view and a god view that also shows
/// every dealt hand, bullet chamber and played card.
#[derive(Debug)]
pub struct MarkdownRecorder<W: Write> {
    public: W,
    god: W,
}

impl MarkdownRecorder<BufWriter<File>> {
    /// Create `rounds.md` and `god_view.md` inside `dir`.
    pub fn create(dir: &Path, title: &str) -> Result<Self, RecordError> {
        let public = BufWriter::new(File::create(dir.join(ROUNDS_FILE))?);
        let god = BufWriter::new(File::create(dir.join(GOD_VIEW_FILE))?);
        Self::new(public, god, title)
    }
}

impl<W: Write> MarkdownRecorder<W> {
    pub fn new(mut public: W, mut god: W, title: &str) -> Result<Self, RecordError> {
        writeln!(public, "# {title}")?;
        writeln!(god, "# {title} (god view)")?;
        Ok(Self { public, god })
    }

    pub fn into_inner(self) -> (W, W) {
        (self.public, self.god)
    }
}

impl<W: Write> Recorder for MarkdownRecorder<W> {
    fn record(&mut self, event: &GameEvent) -> Result<(), RecordError> {
        if let Some(text) = render_markdown(event, false) {
            self.public.write_all(text.as_bytes())?;
        }
        if let Some(text) = render_markdown(event, true) {
            self.god.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        self.public.flush()?;
        self.god.flush()?;
        Ok(())
    }
}

/// Markdown for one event. `god` reveals hidden information; events that
/// carry nothing public render to `None` in the public view.
pub fn render_markdown(event: &GameEvent, god: bool) -> Option<String> {
    match event {
        GameEvent::TargetRankChanged { round, rank } => {
            Some(format!("\n## Round {round}\n\nTarget rank: **{rank}**\n\n"))
        }
        GameEvent::Dealt { seats, .. } => {
            if !god {
                return None;
            }
            let mut out = String::from("| Seat | Hand | Bullet |\n|---|---|---|\n");
            for s in seats {
                out.push_str(&format!(
                    "| P{} | {} | {} |\n",
                    s.seat,
                    format_cards(&s.hand),
                    s.bullet
                ));
            }
            out.push('\n');
            Some(out)
        }
        GameEvent::RoundReset { alive, .. } => {
            let seats: Vec<String> = alive.iter().map(|s| format!("P{s}")).collect();
            Some(format!("\n*Round reset. Still alive: {}.*\n", seats.join(", ")))
        }
        GameEvent::Action(rec) => Some(render_action(rec, god)),
        GameEvent::GameOver { winner, tallies } => Some(render_game_over(*winner, tallies)),
    }
}

/// One line of plain text for any event, as shown in feeds and overlays.
pub fn describe_event(event: &GameEvent, god: bool) -> String {
    match event {
        GameEvent::TargetRankChanged { round, rank } => format!("Round {round}: target is {rank}"),
        GameEvent::Dealt { round, seats } => {
            if !god {
                return format!("Round {round}: {} hands dealt", seats.len());
            }
            let hands: Vec<String> = seats
                .iter()
                .map(|s| format!("P{} [{}] bullet {}", s.seat, format_cards(&s.hand), s.bullet))
                .collect();
            format!("Round {round} dealt: {}", hands.join(", "))
        }
        GameEvent::RoundReset { alive, .. } => {
            let seats: Vec<String> = alive.iter().map(|s| format!("P{s}")).collect();
            format!("Round reset, alive: {}", seats.join(" "))
        }
        GameEvent::Action(rec) => describe_action(rec, god),
        GameEvent::GameOver { winner, .. } => format!("Game over: P{winner} wins"),
    }
}

pub fn describe_action(rec: &ActionRecord, god: bool) -> String {
    let seat = rec.seat;
    let mut line = match rec.action {
        ActionKind::Play => {
            let n = rec.cards.as_ref().map_or(0, Vec::len);
            match (&rec.cards, god) {
                (Some(cards), true) => {
                    format!("P{seat} plays {n} card(s) [{}]", format_cards(cards))
                }
                _ => format!("P{seat} plays {n} card(s)"),
            }
        }
        ActionKind::Challenge => format!("P{seat} challenges"),
        ActionKind::AutoChallenge => format!("P{seat} emptied their hand; the table checks it"),
        ActionKind::Skip => format!("P{seat} skips"),
        ActionKind::Shoot => format!("P{seat} pulls the trigger on themselves"),
    };
    if let Some(outcome) = rec.outcome {
        line.push_str(": ");
        line.push_str(&describe_outcome(outcome, rec));
    }
    line
}

fn describe_outcome(outcome: Outcome, rec: &ActionRecord) -> String {
    let revealed = rec.cards.as_deref().map(format_cards).unwrap_or_default();
    let verdict = match outcome.verdict {
        Some(Verdict::Lie) => format!("[{revealed}] was a lie. "),
        Some(Verdict::Truthful) => format!("[{revealed}] was true. "),
        None => String::new(),
    };
    let shot = match (outcome.shooter, outcome.hit) {
        (Some(s), true) => format!("P{s} pulls the trigger... BANG, P{s} is out"),
        (Some(s), false) => format!("P{s} pulls the trigger... click"),
        (None, _) => "nobody shoots".to_string(),
    };
    format!("{verdict}{shot}")
}

fn render_action(rec: &ActionRecord, god: bool) -> String {
    let mut out = format!(
        "- Turn {}: {} ({} left, {} shot(s) fired)",
        rec.turn,
        describe_action(rec, god),
        rec.hand_remaining,
        rec.shots_fired
    );
    if let Some(remark) = &rec.remark {
        out.push_str(&format!(" _\"{remark}\"_"));
    }
    out.push('\n');
    out
}

fn render_game_over(winner: usize, tallies: &[PlayerTally]) -> String {
    let mut out = format!("\n## Game over\n\nWinner: **P{winner}**\n\n");
    out.push_str(
        "| Seat | Alive | Shots | Challenges won | Challenges lost | Rounds survived |\n\
         |---|---|---|---|---|---|\n",
    );
    for t in tallies {
        out.push_str(&format!(
            "| P{} | {} | {} | {} | {} | {} |\n",
            t.seat,
            if t.alive { "yes" } else { "no" },
            t.shots_fired,
            t.challenge_success,
            t.challenge_fail,
            t.rounds_survived
        ));
    }
    out
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct GameInfo {
    game_count: u64,
}

/// Persisted game numbering (`game_info.json`).
#[derive(Debug, Clone)]
pub struct GameCounter {
    path: PathBuf,
}

impl GameCounter {
    pub fn new(dir: &Path) -> Self {
        Self { path: dir.join(GAME_INFO_FILE) }
    }

    /// Games numbered so far; 0 when no counter file exists yet.
    pub fn current(&self) -> Result<u64, RecordError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str::<GameInfo>(&text)?.game_count),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Claim the next game number and persist it.
    pub fn next(&self) -> Result<u64, RecordError> {
        let game_count = self.current()? + 1;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&GameInfo { game_count })?)?;
        Ok(game_count)
    }
}

/// Caller-owned record of one game.
pub struct Session {
    game_number: u64,
    id: String,
    dir: Option<PathBuf>,
    recorders: Vec<Box<dyn Recorder>>,
    cursor: usize,
    failures: usize,
    closed: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("game_number", &self.game_number)
            .field("id", &self.id)
            .field("dir", &self.dir)
            .field("recorders", &self.recorders.len())
            .field("cursor", &self.cursor)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Session {
    /// Number the game, create `log_dir/game_{n}_{id}` and open the JSON
    /// lines and Markdown recorders inside it.
    pub fn open(log_dir: &Path) -> Result<Self, RecordError> {
        let game_number = GameCounter::new(log_dir).next()?;
        let id = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let dir = log_dir.join(format!("game_{game_number}_{id}"));
        fs::create_dir_all(&dir)?;
        let title = format!("Liar's Bar: game {game_number}");
        let recorders: Vec<Box<dyn Recorder>> = vec![
            Box::new(JsonLinesRecorder::create(&dir.join(EVENTS_FILE))?),
            Box::new(MarkdownRecorder::create(&dir, &title)?),
        ];
        log::info!("recording game {game_number} to {}", dir.display());
        Ok(Self {
            game_number,
            id,
            dir: Some(dir),
            recorders,
            cursor: 0,
            failures: 0,
            closed: false,
        })
    }

    /// A session that writes nothing until recorders are attached.
    pub fn detached() -> Self {
        Self {
            game_number: 0,
            id: String::new(),
            dir: None,
            recorders: Vec::new(),
            cursor: 0,
            failures: 0,
            closed: false,
        }
    }

    pub fn with_recorder(mut self, recorder: Box<dyn Recorder>) -> Self {
        self.recorders.push(recorder);
        self
    }

    pub fn game_number(&self) -> u64 {
        self.game_number
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Recorder failures so far. Failures are logged and never stop a game.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Forward events the recorders have not seen yet. Returns how many.
    pub fn sync(&mut self, game: &Game) -> usize {
        if self.closed {
            return 0;
        }
        let fresh = game.events_since(self.cursor);
        for event in fresh {
            for recorder in &mut self.recorders {
                if let Err(e) = recorder.record(event) {
                    self.failures += 1;
                    log::warn!("recorder failed on game {}: {e}", self.game_number);
                }
            }
        }
        self.cursor += fresh.len();
        fresh.len()
    }

    /// Final sync and flush. Further syncs are ignored.
    pub fn close(&mut self, game: &Game) {
        if self.closed {
            return;
        }
        self.sync(game);
        for recorder in &mut self.recorders {
            if let Err(e) = recorder.finish() {
                self.failures += 1;
                log::warn!("recorder failed to flush game {}: {e}", self.game_number);
            }
        }
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rank::*;
    use crate::config::GameOptions;
    use crate::game::Scenario;

    fn short_game() -> Game {
        let mut g = Game::from_scenario(
            GameOptions::new(2).unwrap().with_seed(6),
            Scenario::new(King, vec![vec![Queen, Ace], vec![Ace, Ace]], vec![1, 4]),
        )
        .unwrap();
        g.act(&crate::rules::Action::Play { cards: vec![Queen] }, Some("trust me")).unwrap();
        g.action_challenge().unwrap();
        g
    }

    #[test]
    fn memory_recorder_shares_buffer_across_clones() {
        let mem = MemoryRecorder::new();
        let g = short_game();
        let mut session = Session::detached().with_recorder(Box::new(mem.clone()));
        assert_eq!(session.sync(&g), g.history_len());
        assert_eq!(mem.events(), g.events());
        assert_eq!(session.sync(&g), 0, "nothing new");
    }

    #[test]
    fn json_lines_one_event_per_line() {
        let g = short_game();
        let mut rec = JsonLinesRecorder::new(Vec::new());
        for e in g.events() {
            rec.record(e).unwrap();
        }
        let text = String::from_utf8(rec.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), g.history_len());
        assert!(lines[0].starts_with(r#"{"event":"target_rank_changed""#));
        let parsed: GameEvent = serde_json::from_str(lines.last().unwrap()).unwrap();
        assert!(matches!(parsed, GameEvent::GameOver { winner: 1, .. }));
    }

    #[test]
    fn public_markdown_hides_played_cards_until_revealed() {
        let g = short_game();
        let play = g.events().iter().find_map(GameEvent::as_action).unwrap();
        let public = describe_action(play, false);
        let god = describe_action(play, true);
        assert_eq!(public, "P0 plays 1 card(s)");
        assert_eq!(god, "P0 plays 1 card(s) [Q]");
        let dealt = g.events().iter().find(|e| matches!(e, GameEvent::Dealt { .. })).unwrap();
        assert!(render_markdown(dealt, false).is_none());
        assert!(render_markdown(dealt, true).unwrap().contains("| P0 | A Q | 1 |"));
    }

    #[test]
    fn challenge_line_reveals_verdict_and_shot() {
        let g = short_game();
        let challenge = g
            .events()
            .iter()
            .filter_map(GameEvent::as_action)
            .find(|r| r.action == ActionKind::Challenge)
            .unwrap();
        let line = describe_action(challenge, false);
        assert_eq!(line, "P1 challenges: [Q] was a lie. P0 pulls the trigger... BANG, P0 is out");
    }

    #[test]
    fn event_lines_hide_deals_outside_god_view() {
        let g = short_game();
        let lines: Vec<String> = g.events().iter().map(|e| describe_event(e, false)).collect();
        assert_eq!(lines[0], "Round 1: target is K");
        assert_eq!(lines[1], "Round 1: 2 hands dealt");
        assert_eq!(lines.last().unwrap(), "Game over: P1 wins");
        let god = describe_event(&g.events()[1], true);
        assert_eq!(god, "Round 1 dealt: P0 [A Q] bullet 1, P1 [A A] bullet 4");
    }
}
