use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use soulfire_engine::board::Coord;
use soulfire_engine::cards::starter_catalog;
use soulfire_engine::core::{EngineConfig, SideId, SideSetup};
use soulfire_engine::engine::BattleEngine;

fn cards(slug: &str, count: usize) -> Vec<String> {
    vec![slug.to_string(); count]
}

/// One human end-turn, which includes a full NPC turn in reply.
fn npc_turn(c: &mut Criterion) {
    c.bench_function("npc_turn", |b| {
        b.iter_batched(
            || {
                let mut engine = BattleEngine::new(starter_catalog(), EngineConfig::default());
                let id = engine
                    .create_match(
                        SideSetup::human("Ada", cards("bone-knight", 12)),
                        SideSetup::npc("Warden", cards("ember-imp", 12)),
                    )
                    .expect("match");
                engine.place(id, SideId::FIRST, "bone-knight", Coord::new(2, 1)).expect("place");
                engine.place(id, SideId::FIRST, "bone-knight", Coord::new(2, 3)).expect("place");
                engine.ready(id, SideId::FIRST).expect("ready");
                (engine, id)
            },
            |(mut engine, id)| black_box(engine.end_turn(id, SideId::FIRST)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, npc_turn);
criterion_main!(benches);
