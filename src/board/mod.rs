//! The battle grid and the units on it.
//!
//! ## Key Types
//!
//! - `Coord` / `Grid`: cells, territory halves and Chebyshev distance
//! - `Unit` / `ActiveEffect`: a deployed unit and the statuses it carries
//! - `CombatResolver`: placement, movement and ability attacks

pub mod combat;
pub mod grid;
pub mod unit;

pub use combat::{AttackOutcome, CombatResolver, MOVE_COST, TERRITORY_SURCHARGE};
pub use grid::{Coord, Grid};
pub use unit::{ActiveEffect, Unit};
