//! Match rules outside the board: the turn/phase state machine, deployment,
//! and casting.
//!
//! - `TurnController`: start, draw, main and end phases, deployment readiness
//! - `SpellCaster`: spell costs, rituals and haunts

pub mod casting;
pub mod phases;

pub use casting::{CastOptions, CastOutcome, SpellCaster};
pub use phases::{TurnController, RESHUFFLE_PENALTY};
