//! Unit abilities.

use serde::{Deserialize, Serialize};

/// Which units an ability may be aimed at, relative to the acting side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Enemy,
    Friendly,
    Any,
}

impl TargetType {
    /// Check whether a target with the given relationship is allowed.
    #[must_use]
    pub fn allows(self, target_is_friendly: bool) -> bool {
        match self {
            TargetType::Enemy => !target_is_friendly,
            TargetType::Friendly => target_is_friendly,
            TargetType::Any => true,
        }
    }
}

/// Inclusive damage range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: i32,
    pub max: i32,
}

impl DamageRange {
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn expected(self) -> f64 {
        f64::from(self.min + self.max) / 2.0
    }
}

/// An ability a unit can use in place of a basic attack.
///
/// ## Example
///
/// ```
/// use soulfire_engine::cards::{AbilityDefinition, TargetType};
///
/// let slash = AbilityDefinition::new("slash", "Slash", 1)
///     .with_damage(2, 3)
///     .with_range(1);
///
/// assert_eq!(slash.target_type, TargetType::Enemy);
/// assert_eq!(slash.damage.map(|d| d.max), Some(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub slug: String,
    pub name: String,
    pub stamina_cost: i32,
    pub damage: Option<DamageRange>,
    /// Maximum Chebyshev distance to the target.
    pub range: u8,
    pub target_type: TargetType,
    /// Status-effect slugs attached to the target on use.
    pub effects: Vec<String>,
}

impl AbilityDefinition {
    /// A melee enemy-targeting ability with no damage.
    #[must_use]
    pub fn new(slug: impl Into<String>, name: impl Into<String>, stamina_cost: i32) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            stamina_cost,
            damage: None,
            range: 1,
            target_type: TargetType::Enemy,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_damage(mut self, min: i32, max: i32) -> Self {
        self.damage = Some(DamageRange::new(min, max));
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: u8) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, status_slug: impl Into<String>) -> Self {
        self.effects.push(status_slug.into());
        self
    }
}
