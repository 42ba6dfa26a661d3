//! Effect targeting.
//!
//! Two forms:
//! - side form: a symbolic `TargetLabel` on an effect resolves to one of
//!   the two sides (or to nothing, for an empty cell)
//! - board form: the cells an ability can reach from a unit, filtered by
//!   the ability's target type

use serde::{Deserialize, Serialize};

use super::resolver::ResolutionContext;
use crate::board::{Coord, Grid};
use crate::cards::AbilityDefinition;
use crate::core::error::{EngineError, Result};
use crate::core::player::SideId;

/// Symbolic target on an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetLabel {
    #[serde(rename = "self")]
    Self_,
    Controller,
    HexController,
    EnemyWizard,
    AttachedWizard,
    AnyWizard,
    AnyTarget,
    /// The owner of whatever unit stands on the cell.
    Cell(Coord),
}

impl TargetLabel {
    /// `any-*` labels pick up the caller's explicit choice.
    #[must_use]
    pub fn is_choice(self) -> bool {
        matches!(self, TargetLabel::AnyWizard | TargetLabel::AnyTarget)
    }

    fn is_controller(self) -> bool {
        matches!(self, TargetLabel::Self_ | TargetLabel::Controller | TargetLabel::HexController)
    }
}

/// What the acting player picked for `any-*` labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetChoice {
    Side(SideId),
    /// A board cell; resolves to the owner of the unit there.
    Cell(Coord),
}

/// Maps labels to sides and cells.
pub struct TargetResolver;

impl TargetResolver {
    /// Resolve an effect's target label to a side.
    ///
    /// `None` means there is nothing to affect (an empty or off-board cell)
    /// and the effect is a no-op.
    pub fn resolve_side(
        label: TargetLabel,
        offensive: bool,
        ctx: &mut ResolutionContext,
        grid: &Grid,
    ) -> Option<SideId> {
        match label {
            TargetLabel::Self_ | TargetLabel::Controller | TargetLabel::HexController => Some(ctx.controller),
            TargetLabel::EnemyWizard | TargetLabel::AttachedWizard => Some(ctx.opposing),
            TargetLabel::AnyWizard | TargetLabel::AnyTarget => {
                let side = match ctx.chosen {
                    Some(choice) => Self::resolve_choice(choice, grid)?,
                    None if offensive => ctx.opposing,
                    None => ctx.controller,
                };
                ctx.focus = Some(side);
                Some(side)
            }
            TargetLabel::Cell(coord) => Self::resolve_choice(TargetChoice::Cell(coord), grid),
        }
    }

    /// Resolve a condition's target. Conditions ask about the side an
    /// earlier `any-*` effect picked ("that wizard"), so every label except
    /// the controller ones reuses the focus when one exists.
    pub fn resolve_condition_side(label: TargetLabel, ctx: &mut ResolutionContext, grid: &Grid) -> Option<SideId> {
        match ctx.focus {
            Some(focus) if !label.is_controller() => Some(focus),
            _ => Self::resolve_side(label, false, ctx, grid),
        }
    }

    fn resolve_choice(choice: TargetChoice, grid: &Grid) -> Option<SideId> {
        match choice {
            TargetChoice::Side(side) => Some(side),
            TargetChoice::Cell(coord) => grid.get(coord).map(|unit| unit.owner),
        }
    }

    /// Cells within `range` of `origin` (Chebyshev), excluding `origin`.
    #[must_use]
    pub fn cells_in_range(grid: &Grid, origin: Coord, range: u8) -> Vec<Coord> {
        grid.cells_within(origin, range).collect()
    }

    /// Occupied cells an ability used from `origin` by `actor` may target.
    #[must_use]
    pub fn valid_ability_targets(
        grid: &Grid,
        origin: Coord,
        actor: SideId,
        ability: &AbilityDefinition,
    ) -> Vec<Coord> {
        grid.cells_within(origin, ability.range)
            .filter(|&cell| {
                grid.get(cell)
                    .is_some_and(|unit| ability.target_type.allows(unit.owner == actor))
            })
            .collect()
    }

    /// Check an ability target. Returns the distance on success.
    pub fn validate_ability_target(
        grid: &Grid,
        origin: Coord,
        actor: SideId,
        target: Coord,
        ability: &AbilityDefinition,
    ) -> Result<u8> {
        if !grid.in_bounds(target) {
            return Err(EngineError::OutOfBounds {
                row: target.row,
                col: target.col,
            });
        }
        let unit = grid.get(target).ok_or(EngineError::CellEmpty {
            row: target.row,
            col: target.col,
        })?;
        if target == origin || !ability.target_type.allows(unit.owner == actor) {
            return Err(EngineError::WrongTargetType);
        }
        let distance = origin.distance(target);
        if distance > ability.range {
            return Err(EngineError::OutOfRange {
                distance,
                range: ability.range,
            });
        }
        Ok(distance)
    }
}
