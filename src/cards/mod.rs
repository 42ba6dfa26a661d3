//! Card system: definitions, instances, and the catalog store.
//!
//! ## Key Types
//!
//! - `CardDefinition`: static card data (cost, effects, ritual, haunt, unit profile)
//! - `AbilityDefinition`: a unit ability (stamina cost, damage, range, target type)
//! - `StatusEffectDefinition`: a buff or debuff abilities attach to units
//! - `CardInstance`: one physical copy of a card in a match
//! - `CatalogStore`: read-only slug lookup for all of the above

pub mod ability;
pub mod definition;
pub mod instance;
pub mod registry;
pub mod starter;
pub mod status;

pub use ability::{AbilityDefinition, DamageRange, TargetType};
pub use definition::{CardDefinition, CardKind, RitualCost, RitualMode, School, UnitProfile};
pub use instance::CardInstance;
pub use registry::CatalogStore;
pub use starter::{starter_catalog, starter_deck, DAMAGE_BOOST, STAMINA_SAPPED};
pub use status::{StatusDuration, StatusEffectDefinition, StatusKind, StatusModifiers};
