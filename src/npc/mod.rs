//! Computer-controlled opponent.
//!
//! ## Key Types
//!
//! - `NpcHistory`: results across matches, source of the aggression scalar
//! - `NpcConfig`: scoring weights and thresholds
//! - `NpcPlanner`: deploys, places, attacks and moves for the NPC side
//!
//! Scoring lives in `scoring` as pure functions over extracted board facts.

pub mod aggression;
pub mod config;
pub mod planner;
pub mod scoring;

pub use aggression::NpcHistory;
pub use config::NpcConfig;
pub use planner::{NpcPlanner, NpcTurnReport};
pub use scoring::{ability_score, placement_score, status_utility, AbilityInput, PlacementInput};
