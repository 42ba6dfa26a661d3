//! Turn and phase controller.
//!
//! Turns cycle `Start → Draw → Main → End`. Leaving `End` switches the
//! active side, bumps the turn number and runs the new side's `Start`.
//! Before the first turn both sides deploy units and mark themselves ready.

use crate::cards::CatalogStore;
use crate::core::config::Phase;
use crate::core::error::{EngineError, Result};
use crate::core::player::SideId;
use crate::core::resources::Resource;
use crate::core::state::{MatchState, MatchStatus};
use crate::effects::{EffectResolver, HexTiming};

/// Will lost at the end of a turn in which a side drew after having
/// reshuffled its deck at least once.
pub const RESHUFFLE_PENALTY: i32 = 1;

/// Drives the phase state machine.
pub struct TurnController;

impl TurnController {
    /// Fail unless `side` may act in its main phase right now.
    pub fn ensure_main(state: &MatchState, side: SideId, action: &'static str) -> Result<()> {
        state.ensure_live()?;
        if state.status != MatchStatus::InProgress {
            return Err(EngineError::WrongPhase {
                action,
                phase: state.phase,
            });
        }
        if state.active != side {
            return Err(EngineError::NotYourTurn);
        }
        if state.phase != Phase::Main {
            return Err(EngineError::WrongPhase {
                action,
                phase: state.phase,
            });
        }
        Ok(())
    }

    /// Step to the next phase and run its automatic work.
    ///
    /// From `Main` this runs the end phase and the next side's start, so the
    /// returned phase is `Start`.
    pub fn advance_phase(state: &mut MatchState, catalog: &CatalogStore) -> Result<Phase> {
        state.ensure_live()?;
        if state.status != MatchStatus::InProgress {
            return Err(EngineError::WrongPhase {
                action: "advance",
                phase: state.phase,
            });
        }
        match state.phase {
            Phase::Start => Self::run_draw(state),
            Phase::Draw => state.phase = Phase::Main,
            Phase::Main | Phase::End => Self::run_end(state, catalog),
            Phase::Deployment => {
                return Err(EngineError::WrongPhase {
                    action: "advance",
                    phase: state.phase,
                })
            }
        }
        Ok(state.phase)
    }

    /// Run start and draw for the active side and leave it in main.
    pub fn begin_turn(state: &mut MatchState, catalog: &CatalogStore) {
        Self::run_start(state, catalog);
        Self::run_draw(state);
        state.phase = Phase::Main;
    }

    /// End `side`'s turn and carry the other side through to its main phase.
    pub fn end_turn(state: &mut MatchState, catalog: &CatalogStore, side: SideId) -> Result<()> {
        Self::ensure_main(state, side, "end turn")?;
        Self::run_end(state, catalog);
        if state.is_over() {
            return Ok(());
        }
        Self::run_draw(state);
        state.phase = Phase::Main;
        state.check_defeat();
        Ok(())
    }

    /// Start phase of the active side.
    pub fn run_start(state: &mut MatchState, catalog: &CatalogStore) {
        let side = state.active;
        state.phase = Phase::Start;
        {
            let actor = state.side_mut(side);
            actor.flags.reset();
            actor.resources.reset_turn();
            actor.resources.refresh_soulfire();
        }
        let name = state.side(side).name.clone();
        let soulfire = state.side(side).resources.soulfire;
        state.log(format!("Turn {}: {name}'s turn begins with {soulfire} soulfire.", state.turn));

        EffectResolver::tick_burn(state, side, catalog);
        EffectResolver::resolve_hexes(state, side, HexTiming::StartOfTurn, catalog);
        for unit in state.grid.units_mut().filter(|u| u.owner == side) {
            unit.refresh();
        }
    }

    /// Draw phase: one card, except the first side's first turn.
    pub fn run_draw(state: &mut MatchState) {
        let side = state.active;
        state.phase = Phase::Draw;
        if side == SideId::FIRST && state.turn == 1 {
            let name = state.side(side).name.clone();
            state.log(format!("{name} skips the first draw."));
            return;
        }
        state.draw_cards(side, 1);
    }

    /// End phase of the active side, then the switch to the other side's
    /// start phase.
    pub fn run_end(state: &mut MatchState, catalog: &CatalogStore) {
        let side = state.active;
        state.phase = Phase::End;
        let name = state.side(side).name.clone();

        let limit = state.config.hand_limit;
        let overflow = state.side_mut(side).piles.hand.truncate_to(limit);
        if !overflow.is_empty() {
            let names: Vec<String> = overflow.iter().map(|c| catalog.card_name(&c.slug).to_string()).collect();
            state.side_mut(side).piles.discard.extend(overflow);
            state.log(format!("{name} discards down to {limit}: {}.", names.join(", ")));
        }

        EffectResolver::resolve_hexes(state, side, HexTiming::EndOfTurn, catalog);

        let flags = state.side(side).flags;
        if flags.has_reshuffled && flags.drew_from_deck {
            let lost = state.side_mut(side).resources.lose(Resource::Will, RESHUFFLE_PENALTY);
            state.log(format!("{name} loses {lost} will to the strain of a reshuffled deck."));
        }

        let mut expired = Vec::new();
        for unit in state.grid.units_mut() {
            for effect in unit.expire_effects(side) {
                expired.push(format!("{effect} fades from {}", unit.name));
            }
        }
        for message in expired {
            state.log(format!("{message}."));
        }

        state.check_defeat();
        if state.is_over() {
            return;
        }
        state.active = side.opponent();
        state.turn += 1;
        Self::run_start(state, catalog);
    }

    /// Mark `side` ready. Once both sides are ready the board is revealed and
    /// the first side begins its turn. Returns `true` when that happened.
    pub fn ready(state: &mut MatchState, catalog: &CatalogStore, side: SideId) -> Result<bool> {
        state.ensure_live()?;
        if state.status != MatchStatus::Deployment {
            return Err(EngineError::WrongPhase {
                action: "ready",
                phase: state.phase,
            });
        }
        let actor = state.side(side);
        if actor.ready {
            return Err(EngineError::AlreadyReady);
        }
        let remaining = state.config.deployment_quota.saturating_sub(actor.deployed);
        let has_units = actor.piles.hand.iter().any(|card| catalog.is_unit_card(&card.slug));
        if remaining > 0 && has_units {
            return Err(EngineError::DeploymentIncomplete { remaining });
        }

        state.side_mut(side).ready = true;
        let name = state.side(side).name.clone();
        state.log(format!("{name} is ready."));

        if !state.sides.iter().all(|(_, s)| s.ready) {
            return Ok(false);
        }
        state.status = MatchStatus::InProgress;
        state.active = SideId::FIRST;
        state.turn = 1;
        state.log("Both sides are ready. The battlefield is revealed.");
        tracing::info!(match_id = %state.id, "deployment complete");
        Self::begin_turn(state, catalog);
        state.check_defeat();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ActiveEffect, Coord, Unit};
    use crate::cards::{starter_catalog, CardInstance, StatusKind};
    use crate::core::config::EngineConfig;
    use crate::core::entity::MatchId;
    use crate::core::player::SideMap;
    use crate::core::rng::GameRng;
    use crate::core::state::{Hex, SideSetup};
    use crate::effects::{Effect, OngoingEffect, TargetLabel};

    const FIRST: SideId = SideId::FIRST;
    const SECOND: SideId = SideId::SECOND;

    fn deck() -> Vec<String> {
        ["ember-imp", "scorch", "firebolt", "bloodlash"]
            .iter()
            .cycle()
            .take(16)
            .map(|s| s.to_string())
            .collect()
    }

    fn setup() -> (MatchState, CatalogStore) {
        let catalog = starter_catalog();
        let state = MatchState::new(
            MatchId(5),
            SideMap::from_pair(SideSetup::human("Ada", deck()), SideSetup::human("Bo", deck())),
            &catalog,
            EngineConfig::default(),
            GameRng::new(5),
        )
        .unwrap();
        (state, catalog)
    }

    fn started() -> (MatchState, CatalogStore) {
        let (mut state, catalog) = setup();
        state.status = MatchStatus::InProgress;
        state.active = FIRST;
        state.turn = 1;
        TurnController::begin_turn(&mut state, &catalog);
        (state, catalog)
    }

    fn imp(state: &mut MatchState, owner: SideId) -> Unit {
        Unit::new(state.alloc_instance(), "ember-imp", "Ember Imp", owner, 4, 3, 2, Vec::new())
    }

    #[test]
    fn test_first_turn_skips_draw() {
        let (state, _) = started();
        assert_eq!(state.phase, Phase::Main);
        assert_eq!(state.side(FIRST).piles.hand.len(), 5);
        assert_eq!(state.side(FIRST).resources.soulfire, 4);
    }

    #[test]
    fn test_end_turn_hands_over() {
        let (mut state, catalog) = started();
        TurnController::end_turn(&mut state, &catalog, FIRST).unwrap();
        assert_eq!(state.active, SECOND);
        assert_eq!(state.turn, 2);
        assert_eq!(state.phase, Phase::Main);
        assert_eq!(state.side(SECOND).piles.hand.len(), 7);
        assert_eq!(
            TurnController::end_turn(&mut state, &catalog, FIRST),
            Err(EngineError::NotYourTurn)
        );
    }

    #[test]
    fn test_advance_phase_cycle() {
        let (mut state, catalog) = started();
        assert_eq!(TurnController::advance_phase(&mut state, &catalog), Ok(Phase::Start));
        assert_eq!(state.active, SECOND);
        assert_eq!(TurnController::advance_phase(&mut state, &catalog), Ok(Phase::Draw));
        assert_eq!(TurnController::advance_phase(&mut state, &catalog), Ok(Phase::Main));
    }

    #[test]
    fn test_hand_limit_discards_overflow() {
        let (mut state, catalog) = started();
        for _ in 0..4 {
            let id = state.alloc_instance();
            state.side_mut(FIRST).piles.hand.push(CardInstance::new(id, "scorch"));
        }
        TurnController::end_turn(&mut state, &catalog, FIRST).unwrap();
        assert_eq!(state.side(FIRST).piles.hand.len(), 7);
        assert_eq!(state.side(FIRST).piles.discard.len(), 2);
    }

    #[test]
    fn test_reshuffle_penalty() {
        let (mut state, catalog) = started();
        state.side_mut(FIRST).flags.has_reshuffled = true;
        TurnController::end_turn(&mut state, &catalog, FIRST).unwrap();
        // First turn skipped the draw.
        assert_eq!(state.side(FIRST).resources.will, 10);

        state.side_mut(SECOND).flags.has_reshuffled = true;
        TurnController::end_turn(&mut state, &catalog, SECOND).unwrap();
        assert_eq!(state.side(SECOND).resources.will, 9);
    }

    #[test]
    fn test_start_ticks_burn_and_refreshes_units() {
        let (mut state, catalog) = started();
        state.side_mut(SECOND).resources.add_burn(3);
        let mut unit = imp(&mut state, SECOND);
        unit.stamina = 0;
        unit.summoning_sick = true;
        state.grid.place(Coord::new(5, 0), unit).unwrap();

        TurnController::end_turn(&mut state, &catalog, FIRST).unwrap();
        assert_eq!(state.side(SECOND).resources.vitality, 17);
        assert_eq!(state.side(SECOND).resources.total_burn(), 0);
        let unit = state.grid.get(Coord::new(5, 0)).unwrap();
        assert_eq!(unit.stamina, 3);
        assert!(!unit.summoning_sick);
    }

    #[test]
    fn test_start_resolves_hexes_after_reset() {
        let (mut state, catalog) = started();
        let id = state.alloc_instance();
        state.hexes.push(Hex {
            card: CardInstance::new(id, "chains-of-obligation"),
            owner: FIRST,
            attached_to: SECOND,
            ongoing: vec![OngoingEffect::at_start(Effect::CostIncrease {
                amount: 1,
                target: Some(TargetLabel::AttachedWizard),
            })],
        });
        TurnController::end_turn(&mut state, &catalog, FIRST).unwrap();
        assert_eq!(state.side(SECOND).resources.cost_modifiers.increase, 1);
        assert_eq!(state.side(SECOND).resources.spell_cost(1), 2);
    }

    #[test]
    fn test_end_resolves_end_hexes() {
        let (mut state, catalog) = started();
        let id = state.alloc_instance();
        state.hexes.push(Hex {
            card: CardInstance::new(id, "lingering-fear"),
            owner: SECOND,
            attached_to: FIRST,
            ongoing: vec![OngoingEffect::at_end(Effect::damage(1, Resource::Will, TargetLabel::AttachedWizard))],
        });
        TurnController::end_turn(&mut state, &catalog, FIRST).unwrap();
        assert_eq!(state.side(FIRST).resources.will, 9);
    }

    #[test]
    fn test_status_expires_after_applier_end() {
        let (mut state, catalog) = started();
        let mut unit = imp(&mut state, SECOND);
        unit.stamina = 2;
        unit.effects.push(ActiveEffect {
            slug: "stamina-sapped-turn".into(),
            name: "Fatigue".into(),
            kind: StatusKind::Debuff,
            expires_after: FIRST,
            applied_stamina_delta: -1,
            damage_bonus: None,
        });
        state.grid.place(Coord::new(4, 4), unit).unwrap();

        TurnController::run_end(&mut state, &catalog);
        let unit = state.grid.get(Coord::new(4, 4)).unwrap();
        assert!(unit.effects.is_empty());
        assert_eq!(unit.stamina, 3);
    }

    #[test]
    fn test_ready_requires_quota() {
        let (mut state, catalog) = setup();
        let has_unit = state.side(FIRST).piles.hand.iter().any(|c| c.slug == "ember-imp");
        if has_unit {
            assert_eq!(
                TurnController::ready(&mut state, &catalog, FIRST),
                Err(EngineError::DeploymentIncomplete { remaining: 2 })
            );
        }
        state.side_mut(FIRST).deployed = 2;
        assert_eq!(TurnController::ready(&mut state, &catalog, FIRST), Ok(false));
        assert_eq!(
            TurnController::ready(&mut state, &catalog, FIRST),
            Err(EngineError::AlreadyReady)
        );

        state.side_mut(SECOND).deployed = 2;
        assert_eq!(TurnController::ready(&mut state, &catalog, SECOND), Ok(true));
        assert_eq!(state.status, MatchStatus::InProgress);
        assert_eq!(state.active, FIRST);
        assert_eq!(state.phase, Phase::Main);
    }

    #[test]
    fn test_ready_without_unit_cards() {
        let (mut state, catalog) = setup();
        let hand = state.side_mut(FIRST).piles.hand.take_all();
        let spells: Vec<_> = hand.into_iter().filter(|c| c.slug != "ember-imp").collect();
        state.side_mut(FIRST).piles.hand.extend(spells);
        assert_eq!(TurnController::ready(&mut state, &catalog, FIRST), Ok(false));
    }

    #[test]
    fn test_actions_rejected_outside_phase() {
        let (mut state, catalog) = setup();
        assert!(matches!(
            TurnController::end_turn(&mut state, &catalog, FIRST),
            Err(EngineError::WrongPhase { .. })
        ));
        let (mut state, catalog) = started();
        assert!(matches!(
            TurnController::ready(&mut state, &catalog, FIRST),
            Err(EngineError::WrongPhase { .. })
        ));
    }
}
