//! Status-effect definitions attached to units by abilities.

use serde::{Deserialize, Serialize};

use super::ability::{DamageRange, TargetType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Buff,
    Debuff,
}

/// How long an applied status lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusDuration {
    /// Until the end phase of the side that applied it.
    Turn,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusModifiers {
    /// Immediate change to current stamina, reversed on expiry.
    pub stamina_change: i32,
    /// Extra damage rolled on each of the bearer's damaging attacks.
    pub damage_bonus: Option<DamageRange>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffectDefinition {
    pub slug: String,
    pub name: String,
    pub kind: StatusKind,
    /// Who the effect is meant for. Informational; NPC scoring uses it.
    pub target_hint: TargetType,
    pub modifiers: StatusModifiers,
    pub duration: StatusDuration,
}

impl StatusEffectDefinition {
    #[must_use]
    pub fn buff(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            kind: StatusKind::Buff,
            target_hint: TargetType::Friendly,
            modifiers: StatusModifiers::default(),
            duration: StatusDuration::Turn,
        }
    }

    #[must_use]
    pub fn debuff(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Debuff,
            target_hint: TargetType::Enemy,
            ..Self::buff(slug, name)
        }
    }

    #[must_use]
    pub fn with_stamina_change(mut self, delta: i32) -> Self {
        self.modifiers.stamina_change = delta;
        self
    }

    #[must_use]
    pub fn with_damage_bonus(mut self, min: i32, max: i32) -> Self {
        self.modifiers.damage_bonus = Some(DamageRange::new(min, max));
        self
    }
}
