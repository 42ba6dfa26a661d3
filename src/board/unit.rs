//! Units on the board and the status effects they carry.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{AbilityDefinition, DamageRange, StatusKind, TargetType};
use crate::core::entity::InstanceId;
use crate::core::player::SideId;

/// A status effect currently applied to a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub slug: String,
    pub name: String,
    pub kind: StatusKind,
    /// Removed at the end phase of this side.
    pub expires_after: SideId,
    /// Stamina change actually applied (after clamping), reversed on expiry.
    pub applied_stamina_delta: i32,
    pub damage_bonus: Option<DamageRange>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub instance: InstanceId,
    pub slug: String,
    pub name: String,
    pub owner: SideId,
    pub health: i32,
    pub max_health: i32,
    pub stamina: i32,
    pub stamina_max: i32,
    pub speed: u8,
    pub abilities: SmallVec<[AbilityDefinition; 2]>,
    pub effects: Vec<ActiveEffect>,
    pub summoning_sick: bool,
    /// Recomputed by the grid whenever the unit is placed or moved.
    pub in_enemy_territory: bool,
}

impl Unit {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        instance: InstanceId,
        slug: impl Into<String>,
        name: impl Into<String>,
        owner: SideId,
        health: i32,
        stamina: i32,
        speed: u8,
        abilities: Vec<AbilityDefinition>,
    ) -> Self {
        Self {
            instance,
            slug: slug.into(),
            name: name.into(),
            owner,
            health,
            max_health: health,
            stamina,
            stamina_max: stamina,
            speed,
            abilities: abilities.into_iter().collect(),
            effects: Vec::new(),
            summoning_sick: false,
            in_enemy_territory: false,
        }
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Take damage, clamped at 0. Returns the health actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let lost = amount.max(0).min(self.health.max(0));
        self.health -= lost;
        lost
    }

    /// Change current stamina within `[0, stamina_max]`. Returns the change
    /// actually applied.
    pub fn adjust_stamina(&mut self, delta: i32) -> i32 {
        let before = self.stamina;
        self.stamina = (self.stamina + delta).clamp(0, self.stamina_max);
        self.stamina - before
    }

    /// Start-of-turn refresh.
    pub fn refresh(&mut self) {
        self.stamina = self.stamina_max;
        self.summoning_sick = false;
    }

    /// First ability usable against a target with the given relationship.
    #[must_use]
    pub fn ability_for(&self, target_is_friendly: bool) -> Option<&AbilityDefinition> {
        self.abilities
            .iter()
            .find(|a| a.target_type.allows(target_is_friendly))
    }

    #[must_use]
    pub fn ability(&self, slug: &str) -> Option<&AbilityDefinition> {
        self.abilities.iter().find(|a| a.slug == slug)
    }

    /// Longest range among abilities that can hit enemies.
    #[must_use]
    pub fn attack_range(&self) -> Option<u8> {
        self.abilities
            .iter()
            .filter(|a| a.target_type != TargetType::Friendly)
            .map(|a| a.range)
            .max()
    }

    /// Damage bonuses from active effects, to be rolled per attack.
    pub fn damage_bonuses(&self) -> impl Iterator<Item = DamageRange> + '_ {
        self.effects.iter().filter_map(|e| e.damage_bonus)
    }

    /// Remove effects expiring after `side`'s end phase, reversing their
    /// still-applied stamina change. Returns the names removed.
    pub fn expire_effects(&mut self, side: SideId) -> Vec<String> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(|e| e.expires_after == side);
        self.effects = kept;
        for effect in &expired {
            self.adjust_stamina(-effect.applied_stamina_delta);
        }
        expired.into_iter().map(|e| e.name).collect()
    }
}
