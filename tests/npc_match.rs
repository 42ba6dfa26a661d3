//! Matches against the NPC, end to end.

use soulfire_engine::board::Coord;
use soulfire_engine::cards::starter_catalog;
use soulfire_engine::core::{EngineConfig, MatchId, SideId, SideSetup};
use soulfire_engine::engine::{BattleEngine, MatchView};
use soulfire_engine::npc::NpcHistory;

const HUMAN: SideId = SideId::FIRST;
const NPC: SideId = SideId::SECOND;

fn cards(slug: &str, count: usize) -> Vec<String> {
    vec![slug.to_string(); count]
}

/// The human owns one imp and nothing else; the NPC fields bone knights.
fn lone_imp_match(engine: &mut BattleEngine) -> MatchId {
    let id = engine
        .create_match(
            SideSetup::human("Ada", cards("ember-imp", 1)),
            SideSetup::npc("Warden", cards("bone-knight", 12)),
        )
        .unwrap();
    engine.place(id, HUMAN, "ember-imp", Coord::new(2, 2)).unwrap();
    engine.ready(id, HUMAN).unwrap();
    id
}

/// End human turns until the match is decided or the turn budget runs out.
fn pass_until_over(engine: &mut BattleEngine, id: MatchId, turns: usize) -> MatchView {
    let mut view = engine.view(id, HUMAN).unwrap();
    for _ in 0..turns {
        if view.is_over() {
            break;
        }
        view = engine.end_turn(id, HUMAN).unwrap();
    }
    view
}

#[test]
fn test_npc_hunts_down_a_passive_side() {
    let mut engine = BattleEngine::new(starter_catalog(), EngineConfig::default());
    let id = lone_imp_match(&mut engine);
    let view = pass_until_over(&mut engine, id, 40);

    assert!(view.is_over());
    assert_eq!(view.winner(), Some(NPC));

    let history = engine.history();
    assert_eq!(history.battles, 1);
    assert_eq!(history.wins, 1);
    // The imp had 4 health and never fought back.
    assert_eq!(history.damage_dealt, 4);
    assert_eq!(history.damage_taken, 0);
    assert!(engine.aggression() > 1.0);
}

#[test]
fn test_history_recorded_once() {
    let mut engine = BattleEngine::new(starter_catalog(), EngineConfig::default());
    let id = lone_imp_match(&mut engine);
    pass_until_over(&mut engine, id, 40);
    assert!(engine.end_turn(id, HUMAN).is_err());
    assert!(engine.view(id, HUMAN).is_ok());
    assert_eq!(engine.history().battles, 1);
}

#[test]
fn test_same_seed_same_match() {
    let play = || {
        let mut engine = BattleEngine::new(starter_catalog(), EngineConfig::default().with_seed(7));
        let id = lone_imp_match(&mut engine);
        pass_until_over(&mut engine, id, 40)
    };
    assert_eq!(play(), play());
}

#[test]
fn test_stored_history_drives_aggression() {
    let veteran = NpcHistory {
        battles: 2,
        damage_dealt: 30,
        damage_taken: 4,
        ..NpcHistory::default()
    };
    let engine = BattleEngine::new(starter_catalog(), EngineConfig::default()).with_history(veteran);
    assert_eq!(engine.aggression(), 3.0);

    let timid = NpcHistory {
        battles: 2,
        damage_dealt: 0,
        damage_taken: 30,
        ..NpcHistory::default()
    };
    let engine = BattleEngine::new(starter_catalog(), EngineConfig::default()).with_history(timid);
    assert_eq!(engine.aggression(), 0.25);
}

#[test]
fn test_npc_turns_keep_the_board_legal() {
    let mut engine = BattleEngine::new(starter_catalog(), EngineConfig::default());
    let id = engine
        .create_match(
            SideSetup::human("Ada", cards("bone-knight", 12)),
            SideSetup::npc("Warden", cards("ember-imp", 12)),
        )
        .unwrap();
    engine.place(id, HUMAN, "bone-knight", Coord::new(0, 1)).unwrap();
    engine.place(id, HUMAN, "bone-knight", Coord::new(0, 3)).unwrap();
    engine.ready(id, HUMAN).unwrap();

    for _ in 0..10 {
        let view = engine.view(id, HUMAN).unwrap();
        if view.is_over() {
            break;
        }
        for unit in &view.units {
            assert!(unit.health > 0);
            assert!(unit.stamina >= 0 && unit.stamina <= unit.stamina_max);
        }
        engine.end_turn(id, HUMAN).unwrap();
    }
}
