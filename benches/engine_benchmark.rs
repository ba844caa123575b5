//! Benchmarks for the engine hot paths: cloning, rent, liquidation planning and
//! whole matches.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rust_monopoly::agents::{GreedyAgent, RandomAgent};
use rust_monopoly::bankruptcy::BankruptcyResolver;
use rust_monopoly::board::{PropertyGroup, TileId};
use rust_monopoly::core::{GameState, PlayerId};
use rust_monopoly::games::classic::ClassicMatchBuilder;
use rust_monopoly::rules::{rent_due, RentContext};

/// Mid-game ledger: two built groups, a few railways, some mortgages.
fn mid_game() -> GameState {
    let a = PlayerId::new(0);
    let b = PlayerId::new(1);
    let mut state = GameState::new(["A", "B", "C", "D"]);
    for tile in [1, 3, 6, 8, 9, 5, 15] {
        state.buy_property(a, TileId(tile)).unwrap();
    }
    for tile in [37, 39, 25, 12, 28] {
        state.buy_property(b, TileId(tile)).unwrap();
    }
    state.upgrade_group(a, PropertyGroup::Brown).unwrap();
    state.upgrade_group(a, PropertyGroup::LightBlue).unwrap();
    state.mortgage_property(b, TileId(25)).unwrap();
    state
}

fn bench_state_clone(c: &mut Criterion) {
    let state = mid_game();
    c.bench_function("state_clone", |b| b.iter(|| black_box(state.clone())));
}

fn bench_rent_due(c: &mut Criterion) {
    let state = mid_game();
    let ctx = RentContext::rolled(7);
    c.bench_function("rent_due_all_tiles", |b| {
        b.iter(|| {
            for tile in 0..40 {
                let _ = black_box(rent_due(&state, TileId(tile), ctx));
            }
        });
    });
}

fn bench_resolver(c: &mut Criterion) {
    let state = mid_game();
    let resolver = BankruptcyResolver::default();
    let debtor = PlayerId::new(0);
    let owed = state.balance(debtor) + 400;

    c.bench_function("resolve_shortfall", |b| {
        b.iter(|| black_box(resolver.resolve(&state, debtor, black_box(owed))));
    });
}

fn bench_match(c: &mut Criterion) {
    c.bench_function("match_4p_random", |b| {
        b.iter(|| {
            let mut game = ClassicMatchBuilder::new()
                .player("A", RandomAgent::new("A", 1))
                .player("B", RandomAgent::new("B", 2))
                .player("C", RandomAgent::new("C", 3))
                .player("D", RandomAgent::new("D", 4))
                .seed(black_box(42))
                .max_turns(500)
                .build()
                .unwrap();
            black_box(game.run().unwrap())
        });
    });

    c.bench_function("match_2p_greedy", |b| {
        b.iter(|| {
            let mut game = ClassicMatchBuilder::new()
                .player("A", GreedyAgent::new("A", 150))
                .player("B", GreedyAgent::new("B", 150))
                .seed(black_box(7))
                .max_turns(500)
                .build()
                .unwrap();
            black_box(game.run().unwrap())
        });
    });
}

criterion_group!(benches, bench_state_clone, bench_rent_due, bench_resolver, bench_match);
criterion_main!(benches);
