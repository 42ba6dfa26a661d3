//! Persistent NPC battle history and the aggression scalar derived from it.

use serde::{Deserialize, Serialize};

use super::config::NpcConfig;
use crate::core::state::NpcTally;

/// Record of the NPC across matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcHistory {
    pub battles: u32,
    pub wins: u32,
    pub losses: u32,
    pub damage_dealt: i64,
    pub damage_taken: i64,
}

impl NpcHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// `1 + (dealt − taken) / max(1, battles)`, clamped to the configured range.
    ///
    /// ```
    /// use soulfire_engine::npc::{NpcConfig, NpcHistory};
    ///
    /// let history = NpcHistory { battles: 4, damage_dealt: 10, damage_taken: 6, ..NpcHistory::default() };
    /// assert_eq!(history.aggression(&NpcConfig::default()), 2.0);
    /// ```
    #[must_use]
    pub fn aggression(&self, config: &NpcConfig) -> f64 {
        let net = (self.damage_dealt - self.damage_taken) as f64;
        let raw = 1.0 + net / f64::from(self.battles.max(1));
        config.clamp_aggression(raw)
    }

    /// Fold a finished match into the history. `won` is `None` for a draw.
    pub fn record(&mut self, tally: NpcTally, won: Option<bool>) {
        self.battles += 1;
        match won {
            Some(true) => self.wins += 1,
            Some(false) => self.losses += 1,
            None => {}
        }
        self.damage_dealt += tally.dealt;
        self.damage_taken += tally.taken;
    }

    /// Fraction of battles won.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.battles == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.battles)
        }
    }
}
