//! liars-bar: the Liar's Bar bluffing game engine
//!
//! Goals:
//! - One authoritative state machine ([`game::Game`]) that validates every
//!   action before touching state
//! - Pluggable decision sources behind a read-only snapshot ([`engine`], [`agents`])
//! - Reproducible games from a seed; no panics for invalid input
//!
//! ## Quick start: call a bluff
//! ```
//! use liars_bar::cards::Rank;
//! use liars_bar::config::GameOptions;
//! use liars_bar::game::{Game, Scenario, Verdict};
//!
//! let opts = GameOptions::new(2).unwrap().with_seed(7);
//! let start = Scenario::new(
//!     Rank::King,
//!     vec![vec![Rank::Queen, Rank::Ace], vec![Rank::King, Rank::King]],
//!     vec![1, 6],
//! );
//! let mut game = Game::from_scenario(opts, start).unwrap();
//!
//! game.action_play(&[Rank::Queen]).unwrap();
//! let report = game.action_challenge().unwrap();
//! let outcome = report.outcome().unwrap();
//! assert_eq!(outcome.verdict, Some(Verdict::Lie));
//! assert_eq!(outcome.shooter, Some(0));
//! assert!(game.is_game_over());
//! assert_eq!(game.winner(), Some(1));
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin liars-bar
//! ```

pub mod agents;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod game;
pub mod hand;
pub mod player;
pub mod record;
pub mod revolver;
pub mod rules;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
