//! NPC turn planning.
//!
//! The planner reads the board, asks the pure scoring functions for the
//! best option and drives the same resolvers a human side uses. It never
//! touches match state directly.

use super::config::NpcConfig;
use super::scoring::{ability_score, placement_score, AbilityInput, PlacementInput};
use crate::board::{AttackOutcome, CombatResolver, Coord, Unit};
use crate::cards::{CatalogStore, StatusEffectDefinition};
use crate::core::error::Result;
use crate::core::player::SideId;
use crate::core::state::MatchState;
use crate::effects::TargetResolver;
use crate::rules::TurnController;

/// What the NPC did on one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NpcTurnReport {
    pub defensive: bool,
    pub placed: Option<Coord>,
    pub attacks: Vec<AttackOutcome>,
    /// `(from, to)` for each step taken.
    pub moves: Vec<(Coord, Coord)>,
}

/// Best ability use found for one unit.
struct Choice {
    ability: String,
    target: Coord,
    score: f64,
}

/// Plans and executes NPC deployments and turns.
pub struct NpcPlanner;

impl NpcPlanner {
    /// Place units up to the deployment quota, then mark the side ready.
    ///
    /// Enemy units are hidden during deployment, so placement only weighs
    /// depth and the anchor. Returns the cells used.
    pub fn deploy(
        state: &mut MatchState,
        catalog: &CatalogStore,
        side: SideId,
        aggression: f64,
        config: &NpcConfig,
    ) -> Result<Vec<Coord>> {
        let mut placed = Vec::new();
        while state.side(side).deployed < state.config.deployment_quota {
            let Some(slug) = Self::unit_card_in_hand(state, catalog, side) else {
                break;
            };
            let Some(cell) = Self::best_cell(state, side, aggression, false, true, config) else {
                break;
            };
            placed.push(CombatResolver::place(state, catalog, side, &slug, cell)?);
        }
        TurnController::ready(state, catalog, side)?;
        tracing::debug!(match_id = %state.id, %side, units = placed.len(), "npc deployed");
        Ok(placed)
    }

    /// Play the NPC's main phase and end its turn.
    pub fn take_turn(
        state: &mut MatchState,
        catalog: &CatalogStore,
        side: SideId,
        aggression: f64,
        config: &NpcConfig,
    ) -> Result<NpcTurnReport> {
        TurnController::ensure_main(state, side, "npc turn")?;
        let aggression = config.clamp_aggression(aggression);
        let defensive = Self::is_defensive(state, side, config);
        let mut report = NpcTurnReport {
            defensive,
            ..NpcTurnReport::default()
        };

        if !state.side(side).flags.placed {
            if let (Some(slug), Some(cell)) = (
                Self::unit_card_in_hand(state, catalog, side),
                Self::best_cell(state, side, aggression, defensive, false, config),
            ) {
                report.placed = Some(CombatResolver::place(state, catalog, side, &slug, cell)?);
            }
        }

        let movers: Vec<Coord> = state
            .grid
            .units_of(side)
            .filter(|(_, unit)| !unit.summoning_sick)
            .map(|(coord, _)| coord)
            .collect();
        for start in movers {
            let mut position = start;
            for _ in 0..config.max_actions_per_unit {
                if state.is_over() {
                    break;
                }
                let Some(unit) = state.grid.get(position) else {
                    break;
                };
                if unit.stamina <= 0 {
                    break;
                }
                let best = Self::best_ability(state, catalog, side, position, unit, aggression, config)?;
                if let Some(choice) = best.filter(|c| c.score > config.action_threshold) {
                    tracing::debug!(
                        match_id = %state.id,
                        ability = %choice.ability,
                        from = %position,
                        target = %choice.target,
                        score = choice.score,
                        "npc attacks"
                    );
                    let outcome = CombatResolver::attack(
                        state,
                        catalog,
                        side,
                        position,
                        choice.target,
                        Some(&choice.ability),
                    )?;
                    report.attacks.push(outcome);
                    continue;
                }
                let Some(step) = Self::step_toward_enemy(state, side, position, unit) else {
                    break;
                };
                CombatResolver::move_unit(state, side, position, step)?;
                report.moves.push((position, step));
                position = step;
            }
        }

        if !state.is_over() {
            TurnController::end_turn(state, catalog, side)?;
        }
        tracing::debug!(
            match_id = %state.id,
            %side,
            defensive,
            attacks = report.attacks.len(),
            moves = report.moves.len(),
            "npc turn finished"
        );
        Ok(report)
    }

    /// Outnumbered, or an enemy within the defensive radius of the anchor.
    #[must_use]
    pub fn is_defensive(state: &MatchState, side: SideId, config: &NpcConfig) -> bool {
        let grid = &state.grid;
        let enemy = side.opponent();
        if grid.unit_count(side) < grid.unit_count(enemy) {
            return true;
        }
        grid.nearest_unit_of(enemy, grid.anchor(side))
            .is_some_and(|(_, distance)| distance <= config.defensive_radius)
    }

    /// Best empty home cell, ties broken by the match RNG.
    fn best_cell(
        state: &mut MatchState,
        side: SideId,
        aggression: f64,
        defensive: bool,
        hide_enemies: bool,
        config: &NpcConfig,
    ) -> Option<Coord> {
        let grid = &state.grid;
        let rows = grid.rows();
        let home_rows = if side == SideId::FIRST { rows / 2 } else { rows - rows / 2 };
        let anchor = grid.anchor(side);

        let scored: Vec<(Coord, f64)> = grid
            .home_cells(side)
            .filter(|&cell| grid.is_empty(cell))
            .map(|cell| {
                let enemy_distance = if hide_enemies {
                    rows
                } else {
                    grid.nearest_unit_of(side.opponent(), cell)
                        .map_or(rows, |(_, distance)| distance)
                };
                let input = PlacementInput {
                    enemy_distance,
                    depth: home_rows.saturating_sub(1).saturating_sub(grid.advance(cell, side)),
                    anchor_distance: cell.distance(anchor),
                };
                (cell, placement_score(input, aggression, defensive, config))
            })
            .collect();

        let best = scored.iter().map(|&(_, score)| score).fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<Coord> = scored
            .iter()
            .filter(|&&(_, score)| (score - best).abs() < 1e-9)
            .map(|&(cell, _)| cell)
            .collect();
        state.rng.choose(&tied).copied()
    }

    fn unit_card_in_hand(state: &MatchState, catalog: &CatalogStore, side: SideId) -> Option<String> {
        state
            .side(side)
            .piles
            .hand
            .iter()
            .find(|card| catalog.is_unit_card(&card.slug))
            .map(|card| card.slug.clone())
    }

    fn best_ability(
        state: &MatchState,
        catalog: &CatalogStore,
        side: SideId,
        position: Coord,
        unit: &Unit,
        aggression: f64,
        config: &NpcConfig,
    ) -> Result<Option<Choice>> {
        let bonus_expected: f64 = unit.damage_bonuses().map(|range| range.expected()).sum();
        let mut best: Option<Choice> = None;

        for ability in &unit.abilities {
            let cost = CombatResolver::ability_cost(unit, ability);
            if unit.stamina < cost {
                continue;
            }
            let statuses: Vec<StatusEffectDefinition> = ability
                .effects
                .iter()
                .map(|slug| catalog.status(slug).cloned())
                .collect::<Result<_>>()?;

            for target in TargetResolver::valid_ability_targets(&state.grid, position, side, ability) {
                let Some(defender) = state.grid.get(target) else {
                    continue;
                };
                let friendly = defender.owner == side;
                // Statuses stack, so skip the ones the target already carries.
                let fresh: Vec<StatusEffectDefinition> = statuses
                    .iter()
                    .filter(|status| !defender.effects.iter().any(|e| e.slug == status.slug))
                    .cloned()
                    .collect();
                let follow_up = friendly
                    && !defender.summoning_sick
                    && defender.stamina > 0
                    && defender.attack_range().is_some();
                let input = AbilityInput {
                    ability,
                    cost,
                    target_is_friendly: friendly,
                    target_health: defender.health,
                    bonus_expected,
                    statuses: &fresh,
                    follow_up,
                };
                let score = ability_score(&input, aggression, config);
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(Choice {
                        ability: ability.slug.clone(),
                        target,
                        score,
                    });
                }
            }
        }
        Ok(best)
    }

    /// One affordable step that strictly closes on the nearest enemy, unless
    /// it is already within the unit's attack range.
    fn step_toward_enemy(state: &MatchState, side: SideId, position: Coord, unit: &Unit) -> Option<Coord> {
        let grid = &state.grid;
        let (enemy, distance) = grid.nearest_unit_of(side.opponent(), position)?;
        if distance <= unit.attack_range().unwrap_or(1) {
            return None;
        }
        grid.cells_within(position, 1)
            .filter(|&cell| grid.is_empty(cell))
            .filter(|&cell| unit.stamina >= CombatResolver::move_cost(state, side, cell))
            .map(|cell| (cell.distance(enemy), cell))
            .filter(|&(closer, _)| closer < distance)
            .min()
            .map(|(_, cell)| cell)
    }
}
