//! The battle engine facade.
//!
//! Every external action enters here as `(match id, acting side, params)`
//! and comes back as the acting side's `MatchView` or a rejection. After a
//! successful action the engine lets NPC sides catch up: an NPC deploys as
//! soon as the match exists and plays its turn as soon as it becomes active.
//! An NPC run that fails is rolled back and recorded on the match slot; the
//! action that triggered it still succeeds.

use super::repository::MatchRepository;
use super::view::MatchView;
use crate::board::{CombatResolver, Coord};
use crate::cards::CatalogStore;
use crate::core::config::EngineConfig;
use crate::core::entity::MatchId;
use crate::core::error::{EngineError, Result};
use crate::core::player::{SideId, SideMap};
use crate::core::rng::GameRng;
use crate::core::state::{MatchState, MatchStatus, SideSetup};
use crate::effects::TargetChoice;
use crate::npc::{NpcConfig, NpcHistory, NpcPlanner, NpcTurnReport};
use crate::rules::{CastOptions, SpellCaster, TurnController};

/// Upper bound on NPC turns run back to back after one action. Two NPC
/// sides would otherwise play each other to the end inside a single call.
const MAX_CHAINED_NPC_TURNS: usize = 2;

/// Owns the catalog, the live matches and the NPC history.
///
/// ## Example
///
/// ```
/// use soulfire_engine::cards::{starter_catalog, starter_deck, School};
/// use soulfire_engine::core::{EngineConfig, SideId, SideSetup};
/// use soulfire_engine::engine::BattleEngine;
///
/// let mut engine = BattleEngine::new(starter_catalog(), EngineConfig::default());
/// let id = engine
///     .create_match(
///         SideSetup::human("Ada", starter_deck(School::Flame)),
///         SideSetup::npc("Warden", starter_deck(School::Grave)),
///     )
///     .unwrap();
///
/// let view = engine.view(id, SideId::FIRST).unwrap();
/// assert!(view.opponent.ready);
/// ```
pub struct BattleEngine {
    catalog: CatalogStore,
    repository: MatchRepository,
    history: NpcHistory,
    npc_config: NpcConfig,
    config: EngineConfig,
    rng: GameRng,
    auto_npc: bool,
}

impl BattleEngine {
    #[must_use]
    pub fn new(catalog: CatalogStore, config: EngineConfig) -> Self {
        Self {
            catalog,
            repository: MatchRepository::new(),
            history: NpcHistory::new(),
            npc_config: NpcConfig::default(),
            rng: GameRng::new(config.seed),
            config,
            auto_npc: true,
        }
    }

    #[must_use]
    pub fn with_npc_config(mut self, config: NpcConfig) -> Self {
        self.npc_config = config;
        self
    }

    /// Start from a stored NPC history.
    #[must_use]
    pub fn with_history(mut self, history: NpcHistory) -> Self {
        self.history = history;
        self
    }

    /// With `false`, NPC sides only act through [`BattleEngine::run_npc_turn`].
    #[must_use]
    pub fn with_auto_npc(mut self, enabled: bool) -> Self {
        self.auto_npc = enabled;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    #[must_use]
    pub fn history(&self) -> &NpcHistory {
        &self.history
    }

    #[must_use]
    pub fn repository(&self) -> &MatchRepository {
        &self.repository
    }

    /// Current NPC aggression.
    #[must_use]
    pub fn aggression(&self) -> f64 {
        self.history.aggression(&self.npc_config)
    }

    /// Seat two sides and open the deployment phase.
    pub fn create_match(&mut self, first: SideSetup, second: SideSetup) -> Result<MatchId> {
        let id = self.repository.next_id();
        let state = MatchState::new(
            id,
            SideMap::from_pair(first, second),
            &self.catalog,
            self.config.clone(),
            self.rng.fork(),
        )
        .map_err(|err| Self::reject(id, "create match", err))?;
        self.repository.insert(state);
        self.settle(id)?;
        Ok(id)
    }

    /// `viewer`'s projection of a match.
    pub fn view(&self, id: MatchId, viewer: SideId) -> Result<MatchView> {
        let slot = self.repository.get(id)?;
        Ok(MatchView::build(&slot.state, &self.catalog, viewer))
    }

    pub fn place(&mut self, id: MatchId, side: SideId, slug: &str, coord: Coord) -> Result<MatchView> {
        self.act(id, side, "place", |state, catalog| {
            CombatResolver::place(state, catalog, side, slug, coord).map(drop)
        })
    }

    pub fn move_unit(&mut self, id: MatchId, side: SideId, from: Coord, to: Coord) -> Result<MatchView> {
        self.act(id, side, "move", |state, _| CombatResolver::move_unit(state, side, from, to))
    }

    pub fn attack(
        &mut self,
        id: MatchId,
        side: SideId,
        from: Coord,
        target: Coord,
        ability: Option<&str>,
    ) -> Result<MatchView> {
        self.act(id, side, "attack", |state, catalog| {
            CombatResolver::attack(state, catalog, side, from, target, ability).map(drop)
        })
    }

    pub fn cast(&mut self, id: MatchId, side: SideId, slug: &str, options: CastOptions) -> Result<MatchView> {
        self.act(id, side, "cast", |state, catalog| {
            SpellCaster::cast(state, catalog, side, slug, options).map(drop)
        })
    }

    pub fn haunt(
        &mut self,
        id: MatchId,
        side: SideId,
        slug: &str,
        target: Option<TargetChoice>,
    ) -> Result<MatchView> {
        self.act(id, side, "haunt", |state, catalog| {
            SpellCaster::haunt(state, catalog, side, slug, target).map(drop)
        })
    }

    pub fn ready(&mut self, id: MatchId, side: SideId) -> Result<MatchView> {
        self.act(id, side, "ready", |state, catalog| {
            TurnController::ready(state, catalog, side).map(drop)
        })
    }

    pub fn end_turn(&mut self, id: MatchId, side: SideId) -> Result<MatchView> {
        self.act(id, side, "end turn", |state, catalog| TurnController::end_turn(state, catalog, side))
    }

    /// Let the NPC controlling `side` deploy or play its turn. Returns the
    /// view of the NPC's opponent.
    pub fn run_npc_turn(&mut self, id: MatchId, side: SideId) -> Result<MatchView> {
        let slot = self.repository.get(id)?;
        if slot.npc_turn_in_progress {
            return Err(Self::reject(id, "npc turn", EngineError::NpcTurnInProgress));
        }
        if !slot.state.side(side).is_npc() {
            return Err(Self::reject(id, "npc turn", EngineError::NotNpcSide));
        }
        self.run_npc(id, side)
            .map_err(|err| Self::reject(id, "npc turn", err))?;
        self.finish(id)?;
        self.settle(id)?;
        self.view(id, side.opponent())
    }

    /// Snapshot bytes of a match for the storage layer.
    pub fn snapshot(&self, id: MatchId) -> Result<Vec<u8>> {
        self.repository.get(id)?.state.to_bytes()
    }

    /// Load a match from snapshot bytes, replacing any live match with the
    /// same id.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<MatchId> {
        let state = MatchState::from_bytes(bytes)?;
        let id = state.id;
        let over = state.is_over();
        self.repository.insert(state);
        self.repository.get_mut(id)?.recorded = over;
        tracing::info!(match_id = %id, "match restored");
        Ok(id)
    }

    /// Drop a match, returning its final state.
    pub fn remove_match(&mut self, id: MatchId) -> Result<MatchState> {
        self.repository.remove(id)
    }

    fn act<F>(&mut self, id: MatchId, side: SideId, action: &'static str, apply: F) -> Result<MatchView>
    where
        F: FnOnce(&mut MatchState, &CatalogStore) -> Result<()>,
    {
        let slot = self
            .repository
            .get_mut(id)
            .map_err(|err| Self::reject(id, action, err))?;
        if slot.npc_turn_in_progress {
            return Err(Self::reject(id, action, EngineError::NpcTurnInProgress));
        }
        apply(&mut slot.state, &self.catalog).map_err(|err| Self::reject(id, action, err))?;
        tracing::debug!(match_id = %id, %side, action, "action applied");
        self.finish(id)?;
        self.settle(id)?;
        self.view(id, side)
    }

    /// Run NPC work that is due: deployment for unready NPC sides, turns
    /// while an NPC side is active.
    fn settle(&mut self, id: MatchId) -> Result<()> {
        if !self.auto_npc {
            return Ok(());
        }
        let deploying: Vec<SideId> = {
            let state = &self.repository.get(id)?.state;
            if state.status == MatchStatus::Deployment {
                state
                    .sides
                    .iter()
                    .filter(|(_, s)| s.is_npc() && !s.ready)
                    .map(|(side, _)| side)
                    .collect()
            } else {
                Vec::new()
            }
        };
        for side in deploying {
            if !self.run_npc_logged(id, side)? {
                return Ok(());
            }
        }

        for _ in 0..MAX_CHAINED_NPC_TURNS {
            let state = &self.repository.get(id)?.state;
            let active = state.active;
            if state.status != MatchStatus::InProgress || !state.side(active).is_npc() {
                break;
            }
            if !self.run_npc_logged(id, active)? {
                break;
            }
            self.finish(id)?;
        }
        Ok(())
    }

    /// Automatic NPC run. A failure is logged and stored on the slot instead
    /// of being returned; `Ok(false)` tells the caller to stop settling.
    fn run_npc_logged(&mut self, id: MatchId, side: SideId) -> Result<bool> {
        match self.run_npc(id, side) {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = Self::reject(id, "npc turn", err);
                self.repository.get_mut(id)?.npc_error = Some(err);
                Ok(false)
            }
        }
    }

    /// Deploy or play one NPC turn, holding the in-progress flag throughout.
    /// A failed run leaves the match as it was before the run.
    fn run_npc(&mut self, id: MatchId, side: SideId) -> Result<Option<NpcTurnReport>> {
        let aggression = self.aggression();
        let slot = self.repository.get_mut(id)?;
        slot.npc_turn_in_progress = true;
        let before = slot.state.clone();
        let state = &mut slot.state;
        let result = if state.status == MatchStatus::Deployment {
            NpcPlanner::deploy(state, &self.catalog, side, aggression, &self.npc_config).map(|_| None)
        } else {
            NpcPlanner::take_turn(state, &self.catalog, side, aggression, &self.npc_config).map(Some)
        };
        slot.npc_turn_in_progress = false;
        if result.is_err() {
            slot.state = before;
        } else {
            slot.npc_error = None;
        }
        if let Ok(Some(report)) = &result {
            tracing::info!(
                match_id = %id,
                %side,
                aggression,
                defensive = report.defensive,
                attacks = report.attacks.len(),
                moves = report.moves.len(),
                "npc turn"
            );
        }
        result
    }

    /// Fold a completed match into the NPC history, once.
    fn finish(&mut self, id: MatchId) -> Result<()> {
        let slot = self.repository.get_mut(id)?;
        let MatchStatus::Completed { winner } = slot.state.status else {
            return Ok(());
        };
        if slot.recorded {
            return Ok(());
        }
        slot.recorded = true;
        let Some(npc) = slot.state.npc_side() else {
            return Ok(());
        };
        let won = winner.map(|side| side == npc);
        self.history.record(slot.state.npc_tally, won);
        tracing::info!(
            match_id = %id,
            ?won,
            battles = self.history.battles,
            aggression = self.history.aggression(&self.npc_config),
            "npc history updated"
        );
        Ok(())
    }

    fn reject(id: MatchId, action: &'static str, err: EngineError) -> EngineError {
        if err.is_data_integrity() {
            tracing::error!(match_id = %id, action, error = %err, "action failed");
        } else {
            tracing::warn!(match_id = %id, action, error = %err, "action rejected");
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{starter_catalog, starter_deck, AbilityDefinition, CardDefinition, School};
    use crate::core::config::Phase;

    const HUMAN: SideId = SideId::FIRST;
    const NPC: SideId = SideId::SECOND;

    fn engine() -> BattleEngine {
        BattleEngine::new(starter_catalog(), EngineConfig::default())
    }

    fn units_deck() -> Vec<String> {
        ["bone-knight", "ember-imp"].iter().cycle().take(12).map(|s| s.to_string()).collect()
    }

    fn npc_match(engine: &mut BattleEngine) -> MatchId {
        engine
            .create_match(SideSetup::human("Ada", units_deck()), SideSetup::npc("Warden", units_deck()))
            .unwrap()
    }

    #[test]
    fn test_npc_deploys_on_creation() {
        let mut engine = engine();
        let id = npc_match(&mut engine);
        let state = &engine.repository().get(id).unwrap().state;
        assert!(state.side(NPC).ready);
        assert_eq!(state.grid.unit_count(NPC), 2);

        // The human cannot see them yet.
        let view = engine.view(id, HUMAN).unwrap();
        assert!(view.units.iter().all(|u| u.owner == HUMAN));
    }

    #[test]
    fn test_unknown_match() {
        let mut engine = engine();
        let err = engine.end_turn(MatchId(42), HUMAN).unwrap_err();
        assert_eq!(err, EngineError::UnknownMatch(MatchId(42)));
    }

    #[test]
    fn test_unknown_deck_card_rejected() {
        let mut engine = engine();
        let err = engine
            .create_match(
                SideSetup::human("Ada", vec!["no-such-card".to_string()]),
                SideSetup::npc("Warden", starter_deck(School::Grave)),
            )
            .unwrap_err();
        assert!(err.is_data_integrity());
    }

    #[test]
    fn test_odd_board_rejected() {
        let mut engine = BattleEngine::new(starter_catalog(), EngineConfig::default().with_grid(5, 5));
        let err = engine
            .create_match(SideSetup::human("Ada", units_deck()), SideSetup::npc("Warden", units_deck()))
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidGrid { rows: 5, cols: 5 });
        assert!(engine.repository().is_empty());
    }

    #[test]
    fn test_run_npc_turn_rejects_human_side() {
        let mut engine = engine();
        let id = npc_match(&mut engine);
        assert_eq!(engine.run_npc_turn(id, HUMAN).unwrap_err(), EngineError::NotNpcSide);
    }

    #[test]
    fn test_actions_refused_during_npc_turn() {
        let mut engine = engine();
        let id = npc_match(&mut engine);
        engine.repository.get_mut(id).unwrap().npc_turn_in_progress = true;

        assert_eq!(engine.ready(id, HUMAN).unwrap_err(), EngineError::NpcTurnInProgress);
        assert_eq!(engine.run_npc_turn(id, NPC).unwrap_err(), EngineError::NpcTurnInProgress);
    }

    #[test]
    fn test_npc_answers_end_turn() {
        let mut engine = engine();
        let id = npc_match(&mut engine);
        let hand: Vec<String> = engine
            .view(id, HUMAN)
            .unwrap()
            .you
            .hand
            .unwrap()
            .into_iter()
            .map(|c| c.slug)
            .collect();
        let units: Vec<&String> = hand.iter().filter(|s| engine.catalog().is_unit_card(s)).collect();
        for (col, slug) in units.iter().take(2).enumerate() {
            engine.place(id, HUMAN, slug, Coord::new(1, col as u8)).unwrap();
        }

        let view = engine.ready(id, HUMAN).unwrap();
        assert_eq!(view.status, MatchStatus::InProgress);
        assert_eq!(view.active, HUMAN);
        assert_eq!(view.phase, Phase::Main);

        let view = engine.end_turn(id, HUMAN).unwrap();
        // The NPC played its whole turn inside the call.
        if !view.is_over() {
            assert_eq!(view.active, HUMAN);
            assert_eq!(view.turn, 3);
        }
    }

    #[test]
    fn test_manual_npc_driving() {
        let mut engine = engine().with_auto_npc(false);
        let id = npc_match(&mut engine);
        assert!(!engine.repository().get(id).unwrap().state.side(NPC).ready);

        engine.run_npc_turn(id, NPC).unwrap();
        assert!(engine.repository().get(id).unwrap().state.side(NPC).ready);
    }

    #[test]
    fn test_failed_npc_turn_rolls_back_and_spares_the_action() {
        let mut catalog = starter_catalog();
        catalog.register_ability(
            AbilityDefinition::new("hex-bite", "Hex Bite", 1)
                .with_damage(1, 2)
                .with_range(1)
                .with_effect("no-such-status"),
        );
        catalog.register_card(CardDefinition::unit("hexling", "Hexling", School::Hex, 5, 3, 1).with_ability("hex-bite"));
        let mut engine = BattleEngine::new(catalog, EngineConfig::default());
        let id = engine
            .create_match(
                SideSetup::human("Ada", vec!["bone-knight".to_string(); 12]),
                SideSetup::npc("Warden", vec!["hexling".to_string(); 12]),
            )
            .unwrap();
        engine.place(id, HUMAN, "bone-knight", Coord::new(1, 0)).unwrap();
        engine.place(id, HUMAN, "bone-knight", Coord::new(1, 1)).unwrap();
        engine.ready(id, HUMAN).unwrap();

        // The human's end turn stands even though the NPC could not play.
        let view = engine.end_turn(id, HUMAN).unwrap();
        assert_eq!(view.active, NPC);
        assert_eq!(view.turn, 2);
        assert_eq!(view.phase, Phase::Main);

        let slot = engine.repository().get(id).unwrap();
        assert_eq!(slot.npc_error, Some(EngineError::UnknownStatusEffect("no-such-status".into())));
        assert!(!slot.npc_turn_in_progress);
        // The NPC's main-phase placement was rolled back with the rest.
        assert_eq!(slot.state.grid.unit_count(NPC), 2);
        assert!(!slot.state.side(NPC).flags.placed);

        let before = engine.snapshot(id).unwrap();
        assert_eq!(
            engine.run_npc_turn(id, NPC).unwrap_err(),
            EngineError::UnknownStatusEffect("no-such-status".into())
        );
        assert_eq!(engine.snapshot(id).unwrap(), before);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut engine = engine();
        let id = npc_match(&mut engine);
        let bytes = engine.snapshot(id).unwrap();
        engine.remove_match(id).unwrap();
        assert!(engine.view(id, HUMAN).is_err());

        assert_eq!(engine.restore(&bytes).unwrap(), id);
        assert!(engine.view(id, HUMAN).is_ok());
    }
}
