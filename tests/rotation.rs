use liars_bar::cards::Rank::*;
use liars_bar::config::GameOptions;
use liars_bar::game::{Game, Scenario};

fn four_with_seat_two_out() -> Game {
    let opts = GameOptions::new(4).unwrap().with_seed(3);
    let start = Scenario::new(
        King,
        vec![vec![Ace, Ace], vec![King, Queen], vec![], vec![Queen, Wild]],
        vec![6, 6, 6, 6],
    )
    .with_eliminated(&[2])
    .starting_at(1);
    Game::from_scenario(opts, start).unwrap()
}

#[test]
fn turn_skips_eliminated_seat() {
    let mut g = four_with_seat_two_out();
    assert_eq!(g.current(), 1);
    g.action_play(&[King]).unwrap();
    assert_eq!(g.current(), 3);
    g.action_play(&[Queen]).unwrap();
    assert_eq!(g.current(), 0, "wraps past the end of the table");
}

#[test]
fn reset_deals_only_to_live_seats() {
    let mut g = four_with_seat_two_out();
    g.action_play(&[Queen]).unwrap();
    g.action_challenge().unwrap();
    assert_eq!(g.round(), 2);
    assert_eq!(g.current(), 1, "liar missed and leads the next round");
    assert!(g.players()[2].hand().is_empty());
    for seat in [0, 1, 3] {
        assert_eq!(g.players()[seat].hand().len(), 6);
    }
    assert_eq!(g.undealt().len(), 2);
}

#[test]
fn killed_seat_never_gets_a_turn() {
    let mut g =
        Game::new(GameOptions::new(3).unwrap().with_seed(40).with_kill_on_start(1)).unwrap();
    assert_eq!(g.current(), 0);
    let card = g.players()[0].hand().as_slice()[0];
    g.action_play(&[card]).unwrap();
    assert_eq!(g.current(), 2);
    assert_eq!(g.alive_seats(), vec![0, 2]);
}
