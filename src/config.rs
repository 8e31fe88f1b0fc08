//! Construction-time configuration: validated game options plus the
//! command-line surface of the `liars-bar` binary.

use crate::agents::StrategyKind;
use crate::deck::{MAX_PLAYERS, MIN_PLAYERS};
use crate::rules::Ruleset;
use clap::Parser;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("player count must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {0}")]
    PlayerCount(usize),
    #[error("human seat {seat} does not exist at a {players}-player table")]
    HumanSeat { seat: usize, players: usize },
    #[error("kill-on-start seat {seat} does not exist at a {players}-player table")]
    KillSeat { seat: usize, players: usize },
    #[error("kill-on-start would leave fewer than two players at a {0}-player table")]
    KillLeavesNoGame(usize),
    #[error("unknown strategy '{0}' (expected random, rule or counting)")]
    UnknownStrategy(String),
    #[error("invalid scenario: {0}")]
    Scenario(String),
}

/// Parameters fixed for the lifetime of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GameOptions {
    pub players: usize,
    pub ruleset: Ruleset,
    pub seed: Option<u64>,
    /// Debug aid: this seat is eliminated before the first deal.
    pub kill_on_start: Option<usize>,
}

impl GameOptions {
    /// ```
    /// use liars_bar::config::{ConfigError, GameOptions};
    ///
    /// assert!(GameOptions::new(4).is_ok());
    /// assert_eq!(GameOptions::new(5), Err(ConfigError::PlayerCount(5)));
    /// ```
    pub fn new(players: usize) -> Result<Self, ConfigError> {
        let opts = Self { players, ruleset: Ruleset::Classic, seed: None, kill_on_start: None };
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    /// Set a deterministic RNG seed for reproducible games.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_kill_on_start(mut self, seat: usize) -> Self {
        self.kill_on_start = Some(seat);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::PlayerCount(self.players));
        }
        if let Some(seat) = self.kill_on_start {
            if seat >= self.players {
                return Err(ConfigError::KillSeat { seat, players: self.players });
            }
            if self.players - 1 < MIN_PLAYERS {
                return Err(ConfigError::KillLeavesNoGame(self.players));
            }
        }
        Ok(())
    }
}

impl Default for GameOptions {
    fn default() -> Self {
        Self { players: MAX_PLAYERS, ruleset: Ruleset::Classic, seed: None, kill_on_start: None }
    }
}

/// Liar's Bar: claim cards match the target rank, call out liars, and pray
/// the chamber is empty.
#[derive(Parser, Debug, Clone)]
#[command(name = "liars-bar", version, about)]
pub struct Cli {
    /// Number of players (2-4)
    #[arg(short = 'n', long, default_value_t = 4)]
    pub players: usize,

    /// Seat controlled by the human player (0-based)
    #[arg(long, default_value_t = 0)]
    pub human: usize,

    /// Let bots play every seat
    #[arg(long)]
    pub no_human: bool,

    /// Bot strategy: random, rule or counting
    #[arg(short, long, default_value = "rule")]
    pub strategy: StrategyKind,

    /// Offer skip and voluntary shoot in addition to play/challenge
    #[arg(long)]
    pub extended: bool,

    /// Seed for a reproducible game
    #[arg(long)]
    pub seed: Option<u64>,

    /// Debug: eliminate this seat before the first deal
    #[arg(long)]
    pub kill_on_start: Option<usize>,

    /// Reveal every hand and bullet, and log at debug level
    #[arg(short, long)]
    pub debug: bool,

    /// Directory for session records and the game counter
    #[arg(long, default_value = "log")]
    pub log_dir: PathBuf,

    /// Do not write session records to disk
    #[arg(long)]
    pub no_record: bool,

    /// Pause between bot actions in the terminal UI
    #[arg(long, default_value_t = 600)]
    pub bot_delay_ms: u64,

    /// Play an all-bot game without the terminal UI and print the events
    #[arg(long)]
    pub auto: bool,
}

impl Cli {
    pub fn ruleset(&self) -> Ruleset {
        if self.extended {
            Ruleset::Extended
        } else {
            Ruleset::Classic
        }
    }

    pub fn game_options(&self) -> Result<GameOptions, ConfigError> {
        let opts = GameOptions {
            players: self.players,
            ruleset: self.ruleset(),
            seed: self.seed,
            kill_on_start: self.kill_on_start,
        };
        opts.validate()?;
        Ok(opts)
    }

    /// The human seat, or `None` when every seat is a bot.
    pub fn human_seat(&self) -> Result<Option<usize>, ConfigError> {
        if self.no_human || self.auto {
            return Ok(None);
        }
        if self.human >= self.players {
            return Err(ConfigError::HumanSeat { seat: self.human, players: self.players });
        }
        Ok(Some(self.human))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_to_classic_four_players() {
        let cli = Cli::try_parse_from(["liars-bar"]).unwrap();
        let opts = cli.game_options().unwrap();
        assert_eq!(opts.players, 4);
        assert_eq!(opts.ruleset, Ruleset::Classic);
        assert_eq!(cli.strategy, StrategyKind::Rule);
        assert_eq!(cli.human_seat().unwrap(), Some(0));
    }

    #[test]
    fn flags_map_onto_options() {
        let cli = Cli::try_parse_from([
            "liars-bar",
            "-n",
            "3",
            "--extended",
            "--seed",
            "9",
            "--strategy",
            "counting",
            "--no-human",
        ])
        .unwrap();
        let opts = cli.game_options().unwrap();
        assert_eq!(opts.players, 3);
        assert_eq!(opts.ruleset, Ruleset::Extended);
        assert_eq!(opts.seed, Some(9));
        assert_eq!(cli.strategy, StrategyKind::Counting);
        assert_eq!(cli.human_seat().unwrap(), None);
    }

    #[test]
    fn bad_values_become_config_errors() {
        let cli = Cli::try_parse_from(["liars-bar", "-n", "5"]).unwrap();
        assert_eq!(cli.game_options(), Err(ConfigError::PlayerCount(5)));

        let cli = Cli::try_parse_from(["liars-bar", "-n", "2", "--human", "3"]).unwrap();
        assert_eq!(cli.human_seat(), Err(ConfigError::HumanSeat { seat: 3, players: 2 }));

        assert!(Cli::try_parse_from(["liars-bar", "--strategy", "llm"]).is_err());
    }

    #[test]
    fn kill_on_start_needs_a_surviving_table() {
        assert_eq!(
            GameOptions::new(2).unwrap().with_kill_on_start(0).validate(),
            Err(ConfigError::KillLeavesNoGame(2))
        );
        assert_eq!(
            GameOptions::new(3).unwrap().with_kill_on_start(3).validate(),
            Err(ConfigError::KillSeat { seat: 3, players: 3 })
        );
        assert!(GameOptions::new(3).unwrap().with_kill_on_start(1).validate().is_ok());
    }
}
