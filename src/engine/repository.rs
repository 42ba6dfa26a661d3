//! Live match storage.

use rustc_hash::FxHashMap;

use crate::core::entity::MatchId;
use crate::core::error::{EngineError, Result};
use crate::core::state::MatchState;

/// One stored match plus the engine-side bookkeeping around it.
#[derive(Clone, Debug)]
pub struct MatchSlot {
    pub state: MatchState,
    /// Set while an NPC turn runs; every action on the match is refused.
    pub npc_turn_in_progress: bool,
    /// The NPC history already absorbed this match's result.
    pub recorded: bool,
    /// Why the last automatic NPC run was abandoned. Cleared when an NPC run
    /// succeeds.
    pub npc_error: Option<EngineError>,
}

/// Owns every live match, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct MatchRepository {
    matches: FxHashMap<MatchId, MatchSlot>,
    next_id: u64,
}

impl MatchRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh match id.
    pub fn next_id(&mut self) -> MatchId {
        self.next_id += 1;
        MatchId(self.next_id)
    }

    /// Store a match, replacing any previous one with the same id.
    pub fn insert(&mut self, state: MatchState) {
        self.next_id = self.next_id.max(state.id.raw());
        self.matches.insert(
            state.id,
            MatchSlot {
                state,
                npc_turn_in_progress: false,
                recorded: false,
                npc_error: None,
            },
        );
    }

    pub fn get(&self, id: MatchId) -> Result<&MatchSlot> {
        self.matches.get(&id).ok_or(EngineError::UnknownMatch(id))
    }

    pub fn get_mut(&mut self, id: MatchId) -> Result<&mut MatchSlot> {
        self.matches.get_mut(&id).ok_or(EngineError::UnknownMatch(id))
    }

    /// Remove a match, returning its final state.
    pub fn remove(&mut self, id: MatchId) -> Result<MatchState> {
        self.matches
            .remove(&id)
            .map(|slot| slot.state)
            .ok_or(EngineError::UnknownMatch(id))
    }

    #[must_use]
    pub fn contains(&self, id: MatchId) -> bool {
        self.matches.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Ids of all stored matches, in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<MatchId> {
        let mut ids: Vec<MatchId> = self.matches.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
