//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its cost, its
//! effect list, and (for unit cards) the unit profile. Instance data lives
//! in `CardInstance`, and board state in `board::Unit`.

use serde::{Deserialize, Serialize};

use crate::core::resources::Resource;
use crate::effects::Effect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum School {
    Blood,
    Shadow,
    Flame,
    Grave,
    Hex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Attack,
    Hex,
    Ritual,
    Unit,
}

impl CardKind {
    /// Attack, hex and ritual cards are cast; unit cards are placed.
    #[must_use]
    pub fn is_spell(self) -> bool {
        !matches!(self, CardKind::Unit)
    }
}

/// Extra cost a caster may pay to swap in a ritual effect list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RitualCost {
    Resource { resource: Resource, amount: i32 },
    /// Discard this many other cards from hand, chosen at random.
    Discard(u32),
    /// Exile this many cards from the caster's void, most recent first.
    ExileFromVoid(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RitualMode {
    pub cost: RitualCost,
    /// Effects resolved instead of the card's normal list.
    pub replaces: Vec<Effect>,
}

/// Stats of the unit a unit card places.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitProfile {
    pub health: i32,
    pub stamina: i32,
    /// Maximum Chebyshev distance of a single move.
    pub speed: u8,
    /// Ability slugs, in preference order.
    pub abilities: Vec<String>,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use soulfire_engine::cards::{CardDefinition, CardKind, School};
/// use soulfire_engine::core::Resource;
/// use soulfire_engine::effects::{Effect, TargetLabel};
///
/// let bolt = CardDefinition::new("firebolt", "Firebolt", School::Flame, CardKind::Attack)
///     .with_cost(2)
///     .with_effect(Effect::damage(3, Resource::Vitality, TargetLabel::AnyTarget));
///
/// assert_eq!(bolt.cost, 2);
/// assert!(bolt.kind.is_spell());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub slug: String,
    pub name: String,
    pub school: School,
    pub kind: CardKind,
    /// Base soulfire cost.
    pub cost: i32,
    pub effects: Vec<Effect>,
    pub ritual: Option<RitualMode>,
    /// Effect resolved when the card is exiled from the void.
    pub haunt: Option<Effect>,
    pub unit: Option<UnitProfile>,
    #[serde(default)]
    pub rules_text: String,
}

impl CardDefinition {
    #[must_use]
    pub fn new(slug: impl Into<String>, name: impl Into<String>, school: School, kind: CardKind) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            school,
            kind,
            cost: 0,
            effects: Vec::new(),
            ritual: None,
            haunt: None,
            unit: None,
            rules_text: String::new(),
        }
    }

    /// A unit card with the given stats.
    #[must_use]
    pub fn unit(
        slug: impl Into<String>,
        name: impl Into<String>,
        school: School,
        health: i32,
        stamina: i32,
        speed: u8,
    ) -> Self {
        let mut card = Self::new(slug, name, school, CardKind::Unit);
        card.unit = Some(UnitProfile {
            health,
            stamina,
            speed,
            abilities: Vec::new(),
        });
        card
    }

    #[must_use]
    pub fn with_cost(mut self, soulfire: i32) -> Self {
        self.cost = soulfire;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_ritual(mut self, cost: RitualCost, replaces: Vec<Effect>) -> Self {
        self.ritual = Some(RitualMode { cost, replaces });
        self
    }

    #[must_use]
    pub fn with_haunt(mut self, effect: Effect) -> Self {
        self.haunt = Some(effect);
        self
    }

    /// Add an ability to a unit card. No-op on spells.
    #[must_use]
    pub fn with_ability(mut self, slug: impl Into<String>) -> Self {
        if let Some(unit) = self.unit.as_mut() {
            unit.abilities.push(slug.into());
        }
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.rules_text = text.into();
        self
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.kind == CardKind::Unit
    }
}
