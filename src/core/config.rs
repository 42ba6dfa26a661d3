//! Match configuration types.
//!
//! - `Phase`: the four turn phases plus the deployment sub-phase
//! - `EngineConfig`: resource limits, grid size, deployment quota, seed
//!
//! Everything here has a `Default` matching the standard duel, and every
//! field can be overridden with a `with_*` builder.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};

/// Turn phase.
///
/// Turns cycle `Start → Draw → Main → End`, then the other side starts.
/// `Deployment` only occurs before the first turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Deployment,
    Start,
    Draw,
    Main,
    End,
}

impl Phase {
    /// The phase that follows this one within a turn cycle.
    ///
    /// `End` wraps to `Start` (of the other side). `Deployment` leads to the
    /// first `Start`.
    #[must_use]
    pub const fn next(self) -> Phase {
        match self {
            Phase::Deployment => Phase::Start,
            Phase::Start => Phase::Draw,
            Phase::Draw => Phase::Main,
            Phase::Main => Phase::End,
            Phase::End => Phase::Start,
        }
    }

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Deployment => "deployment",
            Phase::Start => "start",
            Phase::Draw => "draw",
            Phase::Main => "main",
            Phase::End => "end",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine-wide limits and defaults.
///
/// ## Example
///
/// ```
/// use soulfire_engine::core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_seed(7)
///     .with_grid(8, 5)
///     .with_deployment_quota(3);
///
/// assert_eq!(config.rows, 8);
/// assert_eq!(config.max_vitality, 20);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Vitality cap and starting value.
    pub max_vitality: i32,

    /// Will cap and starting value.
    pub max_will: i32,

    /// Ceiling for maximum soulfire growth.
    pub max_soulfire: i32,

    /// Soulfire max a side starts the match with (before its first refresh).
    pub starting_soulfire: i32,

    /// Cards drawn by the first side before deployment.
    pub opening_hand: usize,

    /// Extra opening cards for the second side.
    pub second_side_extra_cards: usize,

    /// Hand size kept at end of turn.
    pub hand_limit: usize,

    /// Grid rows. Each side's home territory is half of them.
    pub rows: u8,

    /// Grid columns.
    pub cols: u8,

    /// Units each side may place during deployment.
    pub deployment_quota: usize,

    /// Log entries included in a view.
    pub log_tail: usize,

    /// Root seed; each match forks its own stream from it.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_vitality: 20,
            max_will: 10,
            max_soulfire: 10,
            starting_soulfire: 3,
            opening_hand: 5,
            second_side_extra_cards: 1,
            hand_limit: 7,
            rows: 6,
            cols: 5,
            deployment_quota: 2,
            log_tail: 20,
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resource caps.
    #[must_use]
    pub fn with_limits(mut self, vitality: i32, will: i32, soulfire: i32) -> Self {
        self.max_vitality = vitality;
        self.max_will = will;
        self.max_soulfire = soulfire;
        self
    }

    /// Set the starting soulfire max.
    #[must_use]
    pub fn with_starting_soulfire(mut self, soulfire: i32) -> Self {
        self.starting_soulfire = soulfire;
        self
    }

    /// Set the opening hand size of the first side.
    #[must_use]
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    /// Set the hand limit enforced at end of turn.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    /// Set the grid dimensions. `rows` must be even; see `validate`.
    #[must_use]
    pub fn with_grid(mut self, rows: u8, cols: u8) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Reject a board the two sides cannot split evenly.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.rows % 2 != 0 || self.cols == 0 {
            return Err(EngineError::InvalidGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Set the deployment quota.
    #[must_use]
    pub fn with_deployment_quota(mut self, quota: usize) -> Self {
        self.deployment_quota = quota;
        self
    }

    /// Set the number of log entries included in a view.
    #[must_use]
    pub fn with_log_tail(mut self, entries: usize) -> Self {
        self.log_tail = entries;
        self
    }

    /// Set the root seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cycle() {
        assert_eq!(Phase::Deployment.next(), Phase::Start);
        assert_eq!(Phase::Start.next(), Phase::Draw);
        assert_eq!(Phase::Draw.next(), Phase::Main);
        assert_eq!(Phase::Main.next(), Phase::End);
        assert_eq!(Phase::End.next(), Phase::Start);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(format!("{}", Phase::Main), "main");
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::new()
            .with_limits(30, 12, 8)
            .with_hand_limit(5)
            .with_seed(99);

        assert_eq!(config.max_vitality, 30);
        assert_eq!(config.max_will, 12);
        assert_eq!(config.max_soulfire, 8);
        assert_eq!(config.hand_limit, 5);
        assert_eq!(config.seed, 99);
        assert_eq!(config.rows, 6);
    }

    #[test]
    fn test_odd_rows_rejected() {
        assert!(EngineConfig::default().validate().is_ok());
        assert_eq!(
            EngineConfig::default().with_grid(7, 5).validate(),
            Err(EngineError::InvalidGrid { rows: 7, cols: 5 })
        );
        assert!(EngineConfig::default().with_grid(6, 0).validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = EngineConfig::default().with_grid(8, 7);
        let json = serde_json::to_string(&config).unwrap();
        let restored: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
