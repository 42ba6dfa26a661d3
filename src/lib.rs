//! # soulfire-engine
//!
//! Battle resolution engine for a turn-based tactical card duel.
//!
//! Two sides deploy units onto a grid, cast spells from a shared catalog,
//! spend vitality, will, soulfire and stamina, and fight until one side has
//! no units, no hand and no deck left.
//!
//! ## Design Principles
//!
//! 1. **Validate, then mutate**: every action is checked completely before
//!    it touches the match. A rejection leaves no trace.
//!
//! 2. **Closed effect set**: card behaviour is data built from a fixed enum
//!    of effect kinds that the resolver matches exhaustively.
//!
//! 3. **Explicit collaborators**: the catalog, the match repository and the
//!    RNG are constructed and passed in, never global.
//!
//! ## Modules
//!
//! - `core`: IDs, sides, RNG, configuration, errors, the match log and state
//! - `zones`: hand, deck, discard and void piles
//! - `cards`: card, ability and status definitions and the catalog store
//! - `effects`: effect kinds, targeting and the effect resolver
//! - `rules`: turn/phase controller and spell casting
//! - `board`: grid, units and combat
//! - `npc`: aggression, scoring and the NPC planner
//! - `engine`: the `BattleEngine` facade, repository and views

pub mod board;
pub mod cards;
pub mod core;
pub mod effects;
pub mod engine;
pub mod npc;
pub mod rules;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    EngineConfig, EngineError, GameRng, InstanceId, MatchId, MatchState, MatchStatus, Phase, Resource, Result,
    SideController, SideId, SideMap, SideSetup,
};

pub use crate::zones::{Pile, PileKind, SidePiles, ZonePosition};

pub use crate::cards::{
    starter_catalog, starter_deck, AbilityDefinition, CardDefinition, CardInstance, CardKind, CatalogStore,
    RitualCost, School, StatusEffectDefinition, TargetType,
};

pub use crate::effects::{Effect, EffectResolver, ResolutionContext, TargetChoice, TargetLabel};

pub use crate::rules::{CastOptions, SpellCaster, TurnController};

pub use crate::board::{AttackOutcome, CombatResolver, Coord, Grid, Unit};

pub use crate::npc::{NpcConfig, NpcHistory, NpcPlanner};

pub use crate::engine::{BattleEngine, MatchRepository, MatchView};
