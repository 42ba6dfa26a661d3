//! Per-side card piles.
//!
//! ## Key Types
//!
//! - `Pile`: an ordered list of card instances, last element on top
//! - `SidePiles`: hand, deck, discard and void of one side
//! - `ZonePosition`: where a card is inserted into a pile

pub mod piles;

pub use piles::{Pile, PileKind, SidePiles, ZonePosition};
