//! The public face of the crate.
//!
//! ## Key Types
//!
//! - `BattleEngine`: action API over every live match, drives NPC sides
//! - `MatchRepository`: live matches keyed by `MatchId`
//! - `MatchView`: what one side may see of a match

pub mod battle;
pub mod repository;
pub mod view;

pub use battle::BattleEngine;
pub use repository::{MatchRepository, MatchSlot};
pub use view::{EffectView, HexView, MatchView, SideView, UnitView};
