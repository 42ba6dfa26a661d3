//! Board combat: placing, moving and attacking with units.
//!
//! Every operation validates completely before it touches the match, so a
//! rejected action leaves no trace except the returned error.

use super::grid::Coord;
use super::unit::Unit;
use crate::cards::{AbilityDefinition, CardInstance, CatalogStore, StatusEffectDefinition};
use crate::core::error::{EngineError, Result};
use crate::core::player::SideId;
use crate::core::state::{MatchState, MatchStatus};
use crate::effects::{EffectResolver, TargetResolver};
use crate::rules::TurnController;
use crate::zones::ZonePosition;

/// Stamina to move one unit, before the enemy-territory surcharge.
pub const MOVE_COST: i32 = 1;
/// Extra stamina for moving into, or attacking from, enemy territory.
pub const TERRITORY_SURCHARGE: i32 = 1;

/// What an attack did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    pub ability: String,
    /// Health actually removed from the target.
    pub damage: i32,
    pub destroyed: bool,
    /// Status effects applied to the target.
    pub statuses: Vec<String>,
}

/// Validates and applies board actions.
pub struct CombatResolver;

impl CombatResolver {
    /// Place a unit card from hand onto a home cell.
    ///
    /// During deployment a side may place up to the deployment quota; during
    /// its own main phase, one unit per turn.
    pub fn place(
        state: &mut MatchState,
        catalog: &CatalogStore,
        side: SideId,
        slug: &str,
        coord: Coord,
    ) -> Result<Coord> {
        state.ensure_live()?;
        let deploying = state.status == MatchStatus::Deployment;
        if deploying {
            let quota = state.config.deployment_quota;
            let actor = state.side(side);
            if actor.ready {
                return Err(EngineError::AlreadyReady);
            }
            if actor.deployed >= quota {
                return Err(EngineError::DeploymentQuotaReached(quota));
            }
        } else {
            TurnController::ensure_main(state, side, "place")?;
            if state.side(side).flags.placed {
                return Err(EngineError::PlacementUsed);
            }
        }

        if !state.grid.in_bounds(coord) {
            return Err(EngineError::OutOfBounds {
                row: coord.row,
                col: coord.col,
            });
        }
        if !state.grid.is_home(coord, side) {
            return Err(EngineError::NotHomeTerritory);
        }
        if !state.grid.is_empty(coord) {
            return Err(EngineError::CellOccupied {
                row: coord.row,
                col: coord.col,
            });
        }
        if !state.side(side).piles.hand.contains_slug(slug) {
            return Err(EngineError::CardNotInHand(slug.to_string()));
        }
        let card = catalog.card(slug)?;
        let Some(profile) = card.unit.as_ref() else {
            return Err(EngineError::NotAUnitCard(slug.to_string()));
        };
        let abilities = catalog.unit_abilities(card)?;

        let Some(instance) = state.side_mut(side).piles.hand.remove_slug(slug) else {
            return Err(EngineError::CardNotInHand(slug.to_string()));
        };
        let mut unit = Unit::new(
            instance.id,
            slug,
            card.name.clone(),
            side,
            profile.health,
            profile.stamina,
            profile.speed,
            abilities,
        );
        unit.summoning_sick = !deploying;
        if let Err(unit) = state.grid.place(coord, unit) {
            // Emptiness and bounds were checked above.
            state
                .side_mut(side)
                .piles
                .hand
                .push(CardInstance::new(unit.instance, unit.slug));
            return Err(EngineError::CellOccupied {
                row: coord.row,
                col: coord.col,
            });
        }

        let actor = state.side_mut(side);
        if deploying {
            actor.deployed += 1;
        } else {
            actor.flags.placed = true;
        }
        let name = actor.name.clone();
        if deploying {
            // The board stays hidden until both sides are ready.
            state.log_private(side, format!("{name} deploys {} at {coord}.", card.name));
            state.log(format!("{name} deploys a unit."));
        } else {
            state.log(format!("{name} places {} at {coord}.", card.name));
        }
        Ok(coord)
    }

    /// Move an own unit to an empty cell within its speed.
    pub fn move_unit(state: &mut MatchState, side: SideId, from: Coord, to: Coord) -> Result<()> {
        TurnController::ensure_main(state, side, "move")?;
        let unit = Self::own_ready_unit(state, side, from)?;

        if !state.grid.in_bounds(to) {
            return Err(EngineError::OutOfBounds { row: to.row, col: to.col });
        }
        if !state.grid.is_empty(to) {
            return Err(EngineError::CellOccupied { row: to.row, col: to.col });
        }
        let distance = from.distance(to);
        if distance > unit.speed {
            return Err(EngineError::OutOfRange {
                distance,
                range: unit.speed,
            });
        }
        let cost = Self::move_cost(state, side, to);
        if unit.stamina < cost {
            return Err(EngineError::InsufficientStamina {
                have: unit.stamina,
                need: cost,
            });
        }

        let unit_name = unit.name.clone();
        if let Some(unit) = state.grid.get_mut(from) {
            unit.stamina -= cost;
        }
        state.grid.relocate(from, to);
        state.log(format!("{unit_name} moves from {from} to {to} ({cost} stamina)."));
        Ok(())
    }

    /// Stamina a move of `side`'s unit to `to` costs.
    #[must_use]
    pub fn move_cost(state: &MatchState, side: SideId, to: Coord) -> i32 {
        if state.grid.territory_of(to) == side {
            MOVE_COST
        } else {
            MOVE_COST + TERRITORY_SURCHARGE
        }
    }

    /// Stamina an ability costs the unit using it.
    #[must_use]
    pub fn ability_cost(unit: &Unit, ability: &AbilityDefinition) -> i32 {
        if unit.in_enemy_territory {
            ability.stamina_cost + TERRITORY_SURCHARGE
        } else {
            ability.stamina_cost
        }
    }

    /// Use an ability of the unit on `from` against the unit on `target`.
    ///
    /// Without an explicit ability the unit's first ability matching the
    /// relationship to the target is used.
    pub fn attack(
        state: &mut MatchState,
        catalog: &CatalogStore,
        side: SideId,
        from: Coord,
        target: Coord,
        ability: Option<&str>,
    ) -> Result<AttackOutcome> {
        TurnController::ensure_main(state, side, "attack")?;
        let attacker = Self::own_ready_unit(state, side, from)?;

        let Some(defender) = state.grid.get(target) else {
            return Err(if state.grid.in_bounds(target) {
                EngineError::CellEmpty {
                    row: target.row,
                    col: target.col,
                }
            } else {
                EngineError::OutOfBounds {
                    row: target.row,
                    col: target.col,
                }
            });
        };
        let friendly = defender.owner == side;
        let ability = match ability {
            Some(slug) => attacker.ability(slug).ok_or(EngineError::NoUsableAbility)?,
            None => attacker.ability_for(friendly).ok_or(EngineError::WrongTargetType)?,
        }
        .clone();
        TargetResolver::validate_ability_target(&state.grid, from, side, target, &ability)?;

        let cost = Self::ability_cost(attacker, &ability);
        if attacker.stamina < cost {
            return Err(EngineError::InsufficientStamina {
                have: attacker.stamina,
                need: cost,
            });
        }
        let statuses: Vec<StatusEffectDefinition> = ability
            .effects
            .iter()
            .map(|slug| catalog.status(slug).cloned())
            .collect::<Result<_>>()?;

        let bonuses: Vec<_> = if ability.damage.is_some() {
            attacker.damage_bonuses().collect()
        } else {
            Vec::new()
        };
        let attacker_name = attacker.name.clone();
        let defender_name = defender.name.clone();
        let defender_owner = defender.owner;

        if let Some(unit) = state.grid.get_mut(from) {
            unit.stamina -= cost;
        }

        let mut damage = 0;
        if let Some(range) = ability.damage {
            let mut rolled = state.rng.roll(range.min, range.max);
            for bonus in &bonuses {
                rolled += state.rng.roll(bonus.min, bonus.max);
            }
            if let Some(unit) = state.grid.get_mut(target) {
                damage = unit.take_damage(rolled);
            }
            state.record_damage(side, defender_owner, damage);
            state.log(format!(
                "{attacker_name} uses {} on {defender_name} for {damage} damage.",
                ability.name
            ));
        } else {
            state.log(format!("{attacker_name} uses {} on {defender_name}.", ability.name));
        }

        let destroyed = state.grid.get(target).is_some_and(Unit::is_destroyed);
        let mut applied = Vec::new();
        if !destroyed {
            for status in &statuses {
                if EffectResolver::apply_status(state, target, status, side) {
                    applied.push(status.name.clone());
                }
            }
        }

        if destroyed {
            Self::destroy(state, target);
        }

        Ok(AttackOutcome {
            ability: ability.slug,
            damage,
            destroyed,
            statuses: applied,
        })
    }

    /// Remove the unit on `coord`: its card goes to the owner's void, then
    /// the defeat check runs.
    pub fn destroy(state: &mut MatchState, coord: Coord) {
        let Some(unit) = state.grid.remove(coord) else {
            return;
        };
        let owner = unit.owner;
        state
            .side_mut(owner)
            .piles
            .void
            .insert(CardInstance::new(unit.instance, unit.slug), ZonePosition::Top);
        state.log(format!("{} at {coord} is destroyed.", unit.name));
        state.check_defeat();
    }

    fn own_ready_unit(state: &MatchState, side: SideId, coord: Coord) -> Result<&Unit> {
        if !state.grid.in_bounds(coord) {
            return Err(EngineError::OutOfBounds {
                row: coord.row,
                col: coord.col,
            });
        }
        let unit = state.grid.get(coord).ok_or(EngineError::CellEmpty {
            row: coord.row,
            col: coord.col,
        })?;
        if unit.owner != side {
            return Err(EngineError::NotYourUnit);
        }
        if unit.summoning_sick {
            return Err(EngineError::SummoningSick);
        }
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{starter_catalog, DAMAGE_BOOST};
    use crate::core::config::{EngineConfig, Phase};
    use crate::core::entity::MatchId;
    use crate::core::player::SideMap;
    use crate::core::rng::GameRng;
    use crate::core::state::SideSetup;

    const FIRST: SideId = SideId::FIRST;
    const SECOND: SideId = SideId::SECOND;

    fn deck() -> Vec<String> {
        ["ember-imp", "bone-knight", "shade-stalker", "scorch"]
            .iter()
            .cycle()
            .take(12)
            .map(|s| s.to_string())
            .collect()
    }

    fn setup() -> (MatchState, CatalogStore) {
        let catalog = starter_catalog();
        let state = MatchState::new(
            MatchId(3),
            SideMap::from_pair(SideSetup::human("Ada", deck()), SideSetup::human("Bo", deck())),
            &catalog,
            EngineConfig::default(),
            GameRng::new(11),
        )
        .unwrap();
        (state, catalog)
    }

    fn in_main(mut state: MatchState) -> MatchState {
        state.status = MatchStatus::InProgress;
        state.phase = Phase::Main;
        state.active = FIRST;
        state
    }

    fn put(state: &mut MatchState, catalog: &CatalogStore, slug: &str, owner: SideId, coord: Coord) {
        let card = catalog.card(slug).unwrap();
        let profile = card.unit.as_ref().unwrap();
        let id = state.alloc_instance();
        let unit = Unit::new(
            id,
            slug,
            card.name.clone(),
            owner,
            profile.health,
            profile.stamina,
            profile.speed,
            catalog.unit_abilities(card).unwrap(),
        );
        state.grid.place(coord, unit).unwrap();
    }

    fn give(state: &mut MatchState, side: SideId, slug: &str) {
        let id = state.alloc_instance();
        state.side_mut(side).piles.hand.push(CardInstance::new(id, slug));
    }

    #[test]
    fn test_deployment_quota() {
        let (mut state, catalog) = setup();
        give(&mut state, FIRST, "ember-imp");
        give(&mut state, FIRST, "ember-imp");
        give(&mut state, FIRST, "ember-imp");

        CombatResolver::place(&mut state, &catalog, FIRST, "ember-imp", Coord::new(0, 0)).unwrap();
        CombatResolver::place(&mut state, &catalog, FIRST, "ember-imp", Coord::new(1, 1)).unwrap();
        let err = CombatResolver::place(&mut state, &catalog, FIRST, "ember-imp", Coord::new(2, 2)).unwrap_err();
        assert_eq!(err, EngineError::DeploymentQuotaReached(2));
        assert!(!state.grid.get(Coord::new(0, 0)).unwrap().summoning_sick);
        assert_eq!(state.side(FIRST).deployed, 2);
    }

    #[test]
    fn test_place_validation() {
        let (state, catalog) = setup();
        let mut state = in_main(state);
        give(&mut state, FIRST, "ember-imp");
        give(&mut state, FIRST, "scorch");

        let before = state.side(FIRST).piles.hand.len();
        assert_eq!(
            CombatResolver::place(&mut state, &catalog, FIRST, "ember-imp", Coord::new(4, 0)),
            Err(EngineError::NotHomeTerritory)
        );
        assert_eq!(
            CombatResolver::place(&mut state, &catalog, FIRST, "ember-imp", Coord::new(0, 9)),
            Err(EngineError::OutOfBounds { row: 0, col: 9 })
        );
        assert_eq!(
            CombatResolver::place(&mut state, &catalog, FIRST, "scorch", Coord::new(0, 0)),
            Err(EngineError::NotAUnitCard("scorch".into()))
        );
        assert_eq!(
            CombatResolver::place(&mut state, &catalog, FIRST, "hex-warden", Coord::new(0, 0)),
            Err(EngineError::CardNotInHand("hex-warden".into()))
        );
        assert_eq!(
            CombatResolver::place(&mut state, &catalog, SECOND, "ember-imp", Coord::new(5, 0)),
            Err(EngineError::NotYourTurn)
        );
        assert_eq!(state.side(FIRST).piles.hand.len(), before);

        CombatResolver::place(&mut state, &catalog, FIRST, "ember-imp", Coord::new(0, 0)).unwrap();
        assert!(state.grid.get(Coord::new(0, 0)).unwrap().summoning_sick);
        give(&mut state, FIRST, "ember-imp");
        assert_eq!(
            CombatResolver::place(&mut state, &catalog, FIRST, "ember-imp", Coord::new(0, 1)),
            Err(EngineError::PlacementUsed)
        );
    }

    #[test]
    fn test_speed_two_reach() {
        let (state, catalog) = setup();
        let mut state = in_main(state);
        put(&mut state, &catalog, "ember-imp", FIRST, Coord::new(0, 0));

        assert_eq!(
            CombatResolver::move_unit(&mut state, FIRST, Coord::new(0, 0), Coord::new(3, 0)),
            Err(EngineError::OutOfRange { distance: 3, range: 2 })
        );
        CombatResolver::move_unit(&mut state, FIRST, Coord::new(0, 0), Coord::new(2, 2)).unwrap();
        let unit = state.grid.get(Coord::new(2, 2)).unwrap();
        assert_eq!(unit.stamina, 2);
        assert!(state.grid.get(Coord::new(0, 0)).is_none());
    }

    #[test]
    fn test_move_into_enemy_territory_costs_more() {
        let (state, catalog) = setup();
        let mut state = in_main(state);
        put(&mut state, &catalog, "ember-imp", FIRST, Coord::new(2, 0));

        CombatResolver::move_unit(&mut state, FIRST, Coord::new(2, 0), Coord::new(3, 0)).unwrap();
        let unit = state.grid.get(Coord::new(3, 0)).unwrap();
        assert_eq!(unit.stamina, 1);
        assert!(unit.in_enemy_territory);

        assert_eq!(
            CombatResolver::move_unit(&mut state, FIRST, Coord::new(3, 0), Coord::new(4, 0)),
            Err(EngineError::InsufficientStamina { have: 1, need: 2 })
        );
    }

    #[test]
    fn test_move_rejections() {
        let (state, catalog) = setup();
        let mut state = in_main(state);
        put(&mut state, &catalog, "ember-imp", FIRST, Coord::new(0, 0));
        put(&mut state, &catalog, "ember-imp", SECOND, Coord::new(5, 0));
        put(&mut state, &catalog, "bone-knight", FIRST, Coord::new(0, 1));

        assert_eq!(
            CombatResolver::move_unit(&mut state, FIRST, Coord::new(5, 0), Coord::new(4, 0)),
            Err(EngineError::NotYourUnit)
        );
        assert_eq!(
            CombatResolver::move_unit(&mut state, FIRST, Coord::new(0, 0), Coord::new(0, 1)),
            Err(EngineError::CellOccupied { row: 0, col: 1 })
        );
        assert_eq!(
            CombatResolver::move_unit(&mut state, FIRST, Coord::new(1, 1), Coord::new(1, 2)),
            Err(EngineError::CellEmpty { row: 1, col: 1 })
        );
        state.grid.get_mut(Coord::new(0, 0)).unwrap().summoning_sick = true;
        assert_eq!(
            CombatResolver::move_unit(&mut state, FIRST, Coord::new(0, 0), Coord::new(1, 0)),
            Err(EngineError::SummoningSick)
        );
    }

    #[test]
    fn test_attack_surcharge_from_enemy_territory() {
        let (state, catalog) = setup();
        let mut state = in_main(state);
        put(&mut state, &catalog, "bone-knight", FIRST, Coord::new(3, 0));
        put(&mut state, &catalog, "bone-knight", SECOND, Coord::new(4, 0));
        state.grid.get_mut(Coord::new(3, 0)).unwrap().stamina = 2;

        // Cleave costs 2, plus 1 from enemy territory.
        assert_eq!(
            CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(3, 0), Coord::new(4, 0), None),
            Err(EngineError::InsufficientStamina { have: 2, need: 3 })
        );
        assert_eq!(state.grid.get(Coord::new(4, 0)).unwrap().health, 8);

        state.grid.get_mut(Coord::new(3, 0)).unwrap().stamina = 3;
        let outcome =
            CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(3, 0), Coord::new(4, 0), None).unwrap();
        assert_eq!(outcome.ability, "cleave");
        assert!((2..=4).contains(&outcome.damage));
        assert_eq!(state.grid.get(Coord::new(3, 0)).unwrap().stamina, 0);
        assert_eq!(state.grid.get(Coord::new(4, 0)).unwrap().health, 8 - outcome.damage);
    }

    #[test]
    fn test_attack_range_and_target_type() {
        let (state, catalog) = setup();
        let mut state = in_main(state);
        put(&mut state, &catalog, "bone-knight", FIRST, Coord::new(1, 0));
        put(&mut state, &catalog, "ember-imp", FIRST, Coord::new(1, 1));
        put(&mut state, &catalog, "ember-imp", SECOND, Coord::new(3, 0));

        assert_eq!(
            CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(1, 0), Coord::new(3, 0), None),
            Err(EngineError::OutOfRange { distance: 2, range: 1 })
        );
        assert_eq!(
            CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(1, 0), Coord::new(3, 0), Some("rally")),
            Err(EngineError::WrongTargetType)
        );
        assert_eq!(
            CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(1, 0), Coord::new(1, 1), Some("cleave")),
            Err(EngineError::WrongTargetType)
        );
        assert_eq!(
            CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(1, 0), Coord::new(3, 0), Some("firelash")),
            Err(EngineError::NoUsableAbility)
        );

        // Firelash reaches 2 cells.
        let outcome =
            CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(1, 1), Coord::new(3, 0), None).unwrap();
        assert_eq!(outcome.ability, "firelash");
    }

    #[test]
    fn test_friendly_ability_applies_status() {
        let (state, catalog) = setup();
        let mut state = in_main(state);
        put(&mut state, &catalog, "bone-knight", FIRST, Coord::new(1, 0));
        put(&mut state, &catalog, "ember-imp", FIRST, Coord::new(1, 1));

        let outcome =
            CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(1, 0), Coord::new(1, 1), None).unwrap();
        assert_eq!(outcome.ability, "rally");
        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.statuses, vec!["Battle Focus".to_string()]);
        let imp = state.grid.get(Coord::new(1, 1)).unwrap();
        assert_eq!(imp.effects[0].slug, DAMAGE_BOOST);
        assert_eq!(imp.damage_bonuses().count(), 1);
    }

    #[test]
    fn test_destroyed_unit_goes_to_void() {
        let (state, catalog) = setup();
        let mut state = in_main(state);
        put(&mut state, &catalog, "bone-knight", FIRST, Coord::new(2, 0));
        put(&mut state, &catalog, "ember-imp", SECOND, Coord::new(3, 0));
        state.grid.get_mut(Coord::new(3, 0)).unwrap().health = 1;

        let outcome =
            CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(2, 0), Coord::new(3, 0), None).unwrap();
        assert!(outcome.destroyed);
        assert!(state.grid.get(Coord::new(3, 0)).is_none());
        assert!(state.side(SECOND).piles.void.contains_slug("ember-imp"));
        assert_eq!(state.status, MatchStatus::InProgress);
    }

    #[test]
    fn test_last_unit_with_empty_piles_ends_match() {
        let (state, catalog) = setup();
        let mut state = in_main(state);
        put(&mut state, &catalog, "bone-knight", FIRST, Coord::new(2, 0));
        put(&mut state, &catalog, "ember-imp", SECOND, Coord::new(3, 0));
        state.grid.get_mut(Coord::new(3, 0)).unwrap().health = 1;
        state.side_mut(SECOND).piles.hand.take_all();
        state.side_mut(SECOND).piles.deck.take_all();

        CombatResolver::attack(&mut state, &catalog, FIRST, Coord::new(2, 0), Coord::new(3, 0), None).unwrap();
        assert_eq!(state.status, MatchStatus::Completed { winner: Some(FIRST) });
        assert_eq!(
            CombatResolver::move_unit(&mut state, FIRST, Coord::new(2, 0), Coord::new(1, 0)),
            Err(EngineError::MatchOver)
        );
    }

    #[test]
    fn test_actions_outside_main_rejected() {
        let (mut state, catalog) = setup();
        put(&mut state, &catalog, "ember-imp", FIRST, Coord::new(0, 0));
        assert_eq!(
            CombatResolver::move_unit(&mut state, FIRST, Coord::new(0, 0), Coord::new(1, 0)),
            Err(EngineError::WrongPhase {
                action: "move",
                phase: Phase::Deployment
            })
        );
        state.status = MatchStatus::InProgress;
        state.phase = Phase::Draw;
        assert_eq!(
            CombatResolver::move_unit(&mut state, FIRST, Coord::new(0, 0), Coord::new(1, 0)),
            Err(EngineError::WrongPhase {
                action: "move",
                phase: Phase::Draw
            })
        );
    }
}
