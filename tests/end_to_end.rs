use liars_bar::cards::Rank::{self, *};
use liars_bar::config::GameOptions;
use liars_bar::deck::Deck;
use liars_bar::game::{Game, GameEvent, Scenario, Verdict};

fn table(seat1_bullet: u8) -> Game {
    let opts = GameOptions::new(4).unwrap().with_seed(2024);
    let start = Scenario::new(
        King,
        vec![
            vec![King, King, Queen, Ace, Ace],
            vec![King, Queen, Queen, Ace, Wild],
            vec![Ace, Ace, Queen, Queen, King],
            vec![King, Queen, Ace, Wild, King],
        ],
        vec![3, seat1_bullet, 2, 4],
    );
    Game::from_scenario(opts, start).unwrap()
}

fn all_cards(g: &Game) -> Vec<Rank> {
    let held = g.players().iter().flat_map(|p| p.hand().iter());
    let mut cards: Vec<Rank> = held.chain(g.undealt().iter().copied()).collect();
    cards.sort();
    cards
}

#[test]
fn truthful_claim_survived_challenge_redeals_everyone() {
    let mut g = table(6);
    g.action_play(&[King, King]).unwrap();
    assert_eq!(g.current(), 1);

    let report = g.action_challenge().unwrap();
    let outcome = report.outcome().unwrap();
    assert_eq!(outcome.verdict, Some(Verdict::Truthful));
    assert_eq!(outcome.shooter, Some(1));
    assert!(!outcome.hit);

    assert!(report.round_reset());
    assert!(report.events.iter().any(|e| matches!(e, GameEvent::RoundReset { round: 2, .. })));
    let retargeted = |e: &GameEvent| matches!(e, GameEvent::TargetRankChanged { round: 2, .. });
    assert!(report.events.iter().any(retargeted));
    assert_eq!(g.round(), 2);
    assert_eq!(g.current(), 1, "the challenger survived and acts first");
    assert!(g.last_play().is_none());
    assert_eq!(g.claimed_this_round(), 0);
    assert!(g.players().iter().all(|p| p.alive() && p.hand().len() == 5));
    assert!(Rank::TARGETS.contains(&g.target()));

    let mut fresh = Deck::standard().as_slice().to_vec();
    fresh.sort();
    assert_eq!(all_cards(&g), fresh, "a full deck went out again");
}

#[test]
fn fatal_failed_challenge_passes_the_lead_onward() {
    let mut g = table(1);
    g.action_play(&[King, King]).unwrap();
    let outcome = g.action_challenge().unwrap().outcome().unwrap();
    assert!(outcome.hit);
    assert!(!g.players()[1].alive());
    assert_eq!(g.current(), 2);
    assert_eq!(g.alive_seats(), vec![0, 2, 3]);
    assert!(g.players()[1].hand().is_empty());
    for seat in [0, 2, 3] {
        assert_eq!(g.players()[seat].hand().len(), 6);
    }
    assert!(!g.is_game_over());
}

#[test]
fn rounds_survived_counts_resets_for_live_players() {
    let mut g = table(1);
    g.action_play(&[King, King]).unwrap();
    g.action_challenge().unwrap();
    let tallies = g.tallies();
    assert_eq!(tallies[0].rounds_survived, 1);
    assert_eq!(tallies[1].rounds_survived, 0);
    assert_eq!(tallies[1].challenge_fail, 1);
}
