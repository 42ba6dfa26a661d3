//! NPC tuning parameters.

use serde::{Deserialize, Serialize};

/// Weights and thresholds for the NPC heuristics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpcConfig {
    /// Lower clamp for the aggression scalar.
    pub min_aggression: f64,

    /// Upper clamp for the aggression scalar.
    pub max_aggression: f64,

    /// Added when an attack's expected damage kills the target.
    pub lethal_bonus: f64,

    /// Added when a buffed ally can attack right away.
    pub follow_up_bonus: f64,

    /// Subtracted per point of stamina an ability costs.
    pub stamina_penalty: f64,

    /// An ability/target pair must score above this to be used.
    pub action_threshold: f64,

    /// Multiplier for the utility of friendly status effects.
    pub buff_weight: f64,

    /// Placement: value of distance from the nearest enemy.
    pub safety_weight: f64,

    /// Placement: value of depth into home territory.
    pub depth_weight: f64,

    /// Placement, defensive mode: penalty per cell away from the home anchor.
    pub anchor_weight: f64,

    /// Defensive mode triggers when an enemy is this close to the anchor.
    pub defensive_radius: u8,

    /// Safety cap on actions a single unit takes per turn.
    pub max_actions_per_unit: usize,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            min_aggression: 0.25,
            max_aggression: 3.0,
            lethal_bonus: 5.0,
            follow_up_bonus: 2.0,
            stamina_penalty: 0.25,
            action_threshold: 0.5,
            buff_weight: 1.5,
            safety_weight: 0.5,
            depth_weight: 0.3,
            anchor_weight: 1.0,
            defensive_radius: 2,
            max_actions_per_unit: 6,
        }
    }
}

impl NpcConfig {
    #[must_use]
    pub fn with_aggression_range(mut self, min: f64, max: f64) -> Self {
        self.min_aggression = min;
        self.max_aggression = max;
        self
    }

    #[must_use]
    pub fn with_lethal_bonus(mut self, bonus: f64) -> Self {
        self.lethal_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_action_threshold(mut self, threshold: f64) -> Self {
        self.action_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_stamina_penalty(mut self, penalty: f64) -> Self {
        self.stamina_penalty = penalty;
        self
    }

    #[must_use]
    pub fn with_defensive_radius(mut self, radius: u8) -> Self {
        self.defensive_radius = radius;
        self
    }

    /// Clamp an aggression value into the configured range.
    #[must_use]
    pub fn clamp_aggression(&self, aggression: f64) -> f64 {
        aggression.clamp(self.min_aggression, self.max_aggression)
    }
}
