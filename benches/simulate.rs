use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use liars_bar::agents::{AgentTable, BotProfile, StrategyKind};
use liars_bar::config::GameOptions;
use liars_bar::deck::Deck;
use liars_bar::game::Game;
use liars_bar::rules::Ruleset;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_deal(c: &mut Criterion) {
    let mut g = c.benchmark_group("deal");
    for players in 2..=4usize {
        g.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, &n| {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            b.iter(|| Deck::standard().deal(black_box(n), &mut rng))
        });
    }
    g.finish();
}

fn full_game(strategy: StrategyKind, ruleset: Ruleset, seed: u64) -> Option<usize> {
    let opts = GameOptions::new(4).ok()?.with_ruleset(ruleset).with_seed(seed);
    let mut game = Game::new(opts).ok()?;
    let profile = BotProfile::for_strategy(strategy).with_seed(seed);
    let mut table = AgentTable::with_bots(4, None, &profile);
    table.run_to_end(&mut game, 20_000).ok().flatten()
}

fn bench_full_game(c: &mut Criterion) {
    let mut g = c.benchmark_group("full_game");
    for strategy in StrategyKind::ALL {
        for ruleset in [Ruleset::Classic, Ruleset::Extended] {
            let id = format!("{strategy}/{}", ruleset.label());
            g.bench_function(BenchmarkId::from_parameter(id), |b| {
                let mut seed = 0u64;
                b.iter(|| {
                    seed = seed.wrapping_add(1);
                    full_game(strategy, ruleset, black_box(seed))
                })
            });
        }
    }
    g.finish();
}

criterion_group!(benches, bench_deal, bench_full_game);
criterion_main!(benches);
