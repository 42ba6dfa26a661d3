//! Effect system for spells, hexes and haunts.
//!
//! - `Effect`: the closed set of effect kinds cards are built from
//! - `TargetLabel` / `TargetResolver`: symbolic targets and how they map to
//!   sides and board cells
//! - `EffectResolver`: executes effects on match state
//!
//! ## Resolution
//!
//! A card's effect list resolves in order with one `ResolutionContext`.
//! Conditionals recurse with the same context, so an `any-*` pick made by
//! an earlier effect is what a later condition asks about, and a drain
//! armed early fires on the first later vitality damage.

mod effect;
mod resolver;
mod targeting;

pub use effect::{Comparison, Condition, Effect, HexGate, HexTiming, OngoingEffect};
pub use resolver::{EffectResolver, ResolutionContext, ResolveResult};
pub use targeting::{TargetChoice, TargetLabel, TargetResolver};
