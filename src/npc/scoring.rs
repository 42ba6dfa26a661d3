//! Pure NPC scoring functions.
//!
//! Nothing here touches a match. The planner extracts the numbers from the
//! board and asks these functions which option is best.

use super::config::NpcConfig;
use crate::cards::{AbilityDefinition, StatusEffectDefinition, StatusKind};

/// Board facts about one candidate placement cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementInput {
    /// Distance to the nearest enemy unit, or the row count when none is visible.
    pub enemy_distance: u8,
    /// Rows between the cell and the home/enemy boundary. 0 on the front row.
    pub depth: u8,
    /// Distance to the home anchor.
    pub anchor_distance: u8,
}

/// Score a placement cell. Higher is better.
///
/// Aggressive NPCs favour cells near the enemy; cautious ones favour
/// distance and depth. In defensive mode the anchor dominates.
#[must_use]
pub fn placement_score(input: PlacementInput, aggression: f64, defensive: bool, config: &NpcConfig) -> f64 {
    let aggression = config.clamp_aggression(aggression);
    let distance = f64::from(input.enemy_distance);
    let safety = distance * config.safety_weight + f64::from(input.depth) * config.depth_weight;
    if defensive {
        safety - f64::from(input.anchor_distance) * config.anchor_weight
    } else {
        safety / aggression - distance * aggression
    }
}

/// Utility of a status effect, before weighting.
#[must_use]
pub fn status_utility(status: &StatusEffectDefinition) -> f64 {
    let bonus = status.modifiers.damage_bonus.map_or(0.0, |range| range.expected());
    bonus + f64::from(status.modifiers.stamina_change.abs())
}

/// Board facts about one ability/target pair.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityInput<'a> {
    pub ability: &'a AbilityDefinition,
    /// Stamina the use costs, surcharge included.
    pub cost: i32,
    pub target_is_friendly: bool,
    pub target_health: i32,
    /// Expected extra damage from the attacker's active effects.
    pub bonus_expected: f64,
    /// Definitions of the statuses the ability applies.
    pub statuses: &'a [StatusEffectDefinition],
    /// Friendly target only: whether it can attack right after the buff.
    pub follow_up: bool,
}

/// Score an ability/target pair. Higher is better.
#[must_use]
pub fn ability_score(input: &AbilityInput<'_>, aggression: f64, config: &NpcConfig) -> f64 {
    let aggression = config.clamp_aggression(aggression);
    let score = if input.target_is_friendly {
        let utility: f64 = input
            .statuses
            .iter()
            .filter(|s| s.kind == StatusKind::Buff)
            .map(status_utility)
            .sum();
        let follow_up = if input.follow_up && utility > 0.0 {
            config.follow_up_bonus
        } else {
            0.0
        };
        utility * config.buff_weight + follow_up
    } else {
        let expected = input
            .ability
            .damage
            .map_or(0.0, |range| range.expected() + input.bonus_expected);
        let debuffs: f64 = input
            .statuses
            .iter()
            .filter(|s| s.kind == StatusKind::Debuff)
            .map(status_utility)
            .sum();
        let lethal = if expected > 0.0 && expected >= f64::from(input.target_health) {
            config.lethal_bonus
        } else {
            0.0
        };
        expected * aggression + debuffs + lethal
    };
    score - f64::from(input.cost) * config.stamina_penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{TargetType, DAMAGE_BOOST, STAMINA_SAPPED};

    fn cell(enemy_distance: u8, depth: u8, anchor_distance: u8) -> PlacementInput {
        PlacementInput {
            enemy_distance,
            depth,
            anchor_distance,
        }
    }

    #[test]
    fn test_aggression_shifts_placement() {
        let config = NpcConfig::default();
        let front = cell(2, 0, 2);
        let back = cell(4, 2, 0);

        assert!(placement_score(front, 3.0, false, &config) > placement_score(back, 3.0, false, &config));
        assert!(placement_score(back, 0.25, false, &config) > placement_score(front, 0.25, false, &config));
    }

    #[test]
    fn test_defensive_placement_hugs_anchor() {
        let config = NpcConfig::default();
        let near_anchor = cell(2, 2, 0);
        let far_from_anchor = cell(3, 2, 3);
        assert!(
            placement_score(near_anchor, 3.0, true, &config) > placement_score(far_from_anchor, 3.0, true, &config)
        );
    }

    #[test]
    fn test_lethal_attack_preferred() {
        let config = NpcConfig::default();
        let strike = AbilityDefinition::new("strike", "Strike", 1).with_damage(1, 2);
        let attack = |health| AbilityInput {
            ability: &strike,
            cost: 1,
            target_is_friendly: false,
            target_health: health,
            bonus_expected: 0.0,
            statuses: &[],
            follow_up: false,
        };
        let lethal = ability_score(&attack(1), 1.0, &config);
        let chip = ability_score(&attack(8), 1.0, &config);
        assert_eq!(chip, 1.5 - 0.25);
        assert_eq!(lethal, chip + 5.0);
    }

    #[test]
    fn test_aggression_scales_damage() {
        let config = NpcConfig::default();
        let cleave = AbilityDefinition::new("cleave", "Cleave", 2).with_damage(2, 4);
        let input = AbilityInput {
            ability: &cleave,
            cost: 2,
            target_is_friendly: false,
            target_health: 10,
            bonus_expected: 1.0,
            statuses: &[],
            follow_up: false,
        };
        assert!(ability_score(&input, 2.0, &config) > ability_score(&input, 1.0, &config));
        assert_eq!(ability_score(&input, 1.0, &config), 4.0 - 0.5);
    }

    #[test]
    fn test_buff_follow_up_bonus() {
        let config = NpcConfig::default();
        let rally = AbilityDefinition::new("rally", "Rally", 1).with_target(TargetType::Friendly);
        let boost = [StatusEffectDefinition::buff(DAMAGE_BOOST, "Battle Focus").with_damage_bonus(1, 3)];
        let mut input = AbilityInput {
            ability: &rally,
            cost: 1,
            target_is_friendly: true,
            target_health: 4,
            bonus_expected: 0.0,
            statuses: &boost,
            follow_up: false,
        };
        let idle = ability_score(&input, 1.0, &config);
        assert_eq!(idle, 2.0 * 1.5 - 0.25);
        input.follow_up = true;
        assert_eq!(ability_score(&input, 1.0, &config), idle + 2.0);
    }

    #[test]
    fn test_debuff_adds_to_enemy_score() {
        let config = NpcConfig::default();
        let sap = AbilityDefinition::new("sap", "Sap", 1).with_damage(1, 2);
        let sapped = [StatusEffectDefinition::debuff(STAMINA_SAPPED, "Fatigue").with_stamina_change(-1)];
        let plain = AbilityInput {
            ability: &sap,
            cost: 1,
            target_is_friendly: false,
            target_health: 5,
            bonus_expected: 0.0,
            statuses: &[],
            follow_up: false,
        };
        let with_debuff = AbilityInput {
            statuses: &sapped,
            ..plain.clone()
        };
        assert_eq!(
            ability_score(&with_debuff, 1.0, &config),
            ability_score(&plain, 1.0, &config) + 1.0
        );
    }

    #[test]
    fn test_useless_buff_below_threshold() {
        let config = NpcConfig::default();
        let rally = AbilityDefinition::new("rally", "Rally", 1).with_target(TargetType::Friendly);
        let input = AbilityInput {
            ability: &rally,
            cost: 1,
            target_is_friendly: true,
            target_health: 4,
            bonus_expected: 0.0,
            statuses: &[],
            follow_up: true,
        };
        assert!(ability_score(&input, 1.0, &config) < config.action_threshold);
    }
}
