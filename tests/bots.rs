use liars_bar::agents::{AgentTable, BotProfile, StrategyKind};
use liars_bar::config::GameOptions;
use liars_bar::game::{Game, GameEvent};
use liars_bar::rules::{ActionKind, Ruleset};

const TURN_CAP: usize = 20_000;

fn play_out(players: usize, ruleset: Ruleset, strategy: StrategyKind, seed: u64) -> Game {
    let opts = GameOptions::new(players).unwrap().with_ruleset(ruleset).with_seed(seed);
    let mut game = Game::new(opts).unwrap();
    let profile = BotProfile::for_strategy(strategy).with_seed(seed);
    let mut table = AgentTable::with_bots(players, None, &profile);
    let winner = table.run_to_end(&mut game, TURN_CAP).unwrap();
    assert!(winner.is_some(), "{strategy} bots stalled at {players} players ({ruleset:?})");
    game
}

#[test]
fn every_strategy_finishes_under_both_rulesets() {
    for strategy in StrategyKind::ALL {
        for ruleset in [Ruleset::Classic, Ruleset::Extended] {
            for players in 2..=4 {
                let game = play_out(players, ruleset, strategy, 40 + players as u64);
                let winner = game.winner().unwrap();
                assert_eq!(game.alive_seats(), vec![winner]);
                assert!(matches!(game.events().last(), Some(GameEvent::GameOver { .. })));
            }
        }
    }
}

#[test]
fn seeded_tables_replay_identically() {
    let a = play_out(4, Ruleset::Extended, StrategyKind::Counting, 99);
    let b = play_out(4, Ruleset::Extended, StrategyKind::Counting, 99);
    assert_eq!(a.events(), b.events());
    assert_eq!(a.tallies(), b.tallies());
}

#[test]
fn bots_only_act_within_the_offered_actions() {
    let game = play_out(3, Ruleset::Classic, StrategyKind::Random, 5);
    for rec in game.events().iter().filter_map(GameEvent::as_action) {
        assert!(
            !matches!(rec.action, ActionKind::Skip | ActionKind::Shoot),
            "classic tables never skip or shoot voluntarily"
        );
    }
}

#[test]
fn eliminated_seats_never_act_again() {
    let game = play_out(4, Ruleset::Extended, StrategyKind::Rule, 12);
    let mut dead = Vec::new();
    for event in game.events() {
        if let GameEvent::Action(rec) = event {
            assert!(!dead.contains(&rec.seat), "seat {} acted after elimination", rec.seat);
            if let Some(out) = rec.outcome {
                if out.hit {
                    dead.extend(out.shooter);
                }
            }
        }
    }
    assert_eq!(dead.len(), 3);
}
