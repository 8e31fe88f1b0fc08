use liars_bar::cards::Rank::*;
use liars_bar::config::GameOptions;
use liars_bar::game::{ActionError, Game, Scenario};
use liars_bar::hand::Hand;
use liars_bar::rules::{parse_play, ActionKind, LastPlay, Ruleset};

type Fingerprint = (Vec<Hand>, Option<LastPlay>, usize, u32, usize, usize);

fn fingerprint(g: &Game) -> Fingerprint {
    (
        g.players().iter().map(|p| p.hand().clone()).collect(),
        g.last_play().cloned(),
        g.current(),
        g.turn_count(),
        g.claimed_this_round(),
        g.history_len(),
    )
}

fn mk_game(ruleset: Ruleset) -> Game {
    let opts = GameOptions::new(2).unwrap().with_ruleset(ruleset).with_seed(13);
    let hands = vec![vec![Ace, Ace, King, Queen], vec![Queen, Wild]];
    let start = Scenario::new(Ace, hands, vec![2, 2]);
    Game::from_scenario(opts, start).unwrap()
}

#[test]
fn rejected_actions_leave_state_untouched() {
    let mut g = mk_game(Ruleset::Classic);
    let before = fingerprint(&g);

    assert_eq!(g.action_play(&[]), Err(ActionError::CardCount(0)));
    assert_eq!(g.action_play(&[Ace, Ace, King, Queen]), Err(ActionError::CardCount(4)));
    assert_eq!(
        g.action_play(&[King, King]),
        Err(ActionError::NotHeld { rank: King, wanted: 2, held: 1 })
    );
    assert_eq!(
        g.action_play(&[Wild]),
        Err(ActionError::NotHeld { rank: Wild, wanted: 1, held: 0 })
    );
    assert_eq!(g.action_challenge(), Err(ActionError::NothingToChallenge));
    assert_eq!(g.action_skip(), Err(ActionError::NotOffered(ActionKind::Skip, "Classic")));
    assert_eq!(g.action_shoot(), Err(ActionError::NotOffered(ActionKind::Shoot, "Classic")));

    assert_eq!(fingerprint(&g), before);
}

#[test]
fn own_play_cannot_be_challenged() {
    let mut g = mk_game(Ruleset::Extended);
    g.action_play(&[King]).unwrap();
    g.action_skip().unwrap();
    assert_eq!(g.current(), 0);
    let before = fingerprint(&g);
    assert_eq!(g.action_challenge(), Err(ActionError::OwnPlay));
    assert_eq!(g.available_actions(), vec![ActionKind::Play, ActionKind::Skip, ActionKind::Shoot]);
    assert_eq!(fingerprint(&g), before);
}

#[test]
fn skip_needs_a_claim_on_the_table() {
    let mut g = mk_game(Ruleset::Extended);
    assert_eq!(g.action_skip(), Err(ActionError::NothingToSkip));
}

#[test]
fn textual_plays_name_the_bad_token() {
    let hand = Hand::new(vec![Ace, Ace, King]);
    assert_eq!(parse_play("A A", &hand), Ok(vec![Ace, Ace]));
    assert_eq!(parse_play("A K Q J", &hand), Err(ActionError::UnknownCard("J".into())));
    assert!(matches!(parse_play("Q", &hand), Err(ActionError::NotHeld { rank: Queen, .. })));
}
