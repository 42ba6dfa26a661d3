//! Engine errors.
//!
//! Every rejected action returns one of these before any state is touched.
//! Variants fall into two groups:
//!
//! - validation errors: the action is illegal right now (wrong phase, out of
//!   range, not enough stamina, ...)
//! - data-integrity errors: a slug does not resolve in the catalog
//!
//! Game-logic no-ops (a second ward in the same turn, a target cell that
//! turned out empty) are not errors; they only produce a log entry.

use thiserror::Error;

use super::config::Phase;
use super::entity::MatchId;
use super::resources::Resource;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("no match with id {0}")]
    UnknownMatch(MatchId),

    #[error("the match is already over")]
    MatchOver,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("{action} is not allowed during the {phase} phase")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: u8, col: u8 },

    #[error("cell ({row}, {col}) is occupied")]
    CellOccupied { row: u8, col: u8 },

    #[error("there is no unit at ({row}, {col})")]
    CellEmpty { row: u8, col: u8 },

    #[error("units can only be placed in your home territory")]
    NotHomeTerritory,

    #[error("that unit is not yours")]
    NotYourUnit,

    #[error("that unit was summoned this turn and cannot act yet")]
    SummoningSick,

    #[error("not enough stamina: have {have}, need {need}")]
    InsufficientStamina { have: i32, need: i32 },

    #[error("not enough {resource}: have {have}, need {need}")]
    InsufficientResource { resource: Resource, have: i32, need: i32 },

    #[error("target is out of range: distance {distance}, range {range}")]
    OutOfRange { distance: u8, range: u8 },

    #[error("that ability cannot target this unit")]
    WrongTargetType,

    #[error("the unit has no ability usable against that target")]
    NoUsableAbility,

    #[error("you already placed a unit this turn")]
    PlacementUsed,

    #[error("deployment quota of {0} units reached")]
    DeploymentQuotaReached(usize),

    #[error("you are already ready")]
    AlreadyReady,

    #[error("place {remaining} more unit(s) before readying")]
    DeploymentIncomplete { remaining: usize },

    #[error("card {0} is not in your hand")]
    CardNotInHand(String),

    #[error("card {0} is not a unit card")]
    NotAUnitCard(String),

    #[error("card {0} is a unit and cannot be cast")]
    NotASpellCard(String),

    #[error("card {0} has no ritual mode")]
    NoRitual(String),

    #[error("cannot pay the ritual cost of {0}")]
    RitualUnaffordable(String),

    #[error("you already used haunt this turn")]
    HauntUsed,

    #[error("no haunt available for {0} in your void")]
    NoHaunt(String),

    #[error("an NPC turn is in progress")]
    NpcTurnInProgress,

    #[error("that side is not controlled by the NPC")]
    NotNpcSide,

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("unknown ability: {0}")]
    UnknownAbility(String),

    #[error("unknown status effect: {0}")]
    UnknownStatusEffect(String),

    #[error("a {rows}x{cols} board cannot be split into two home territories")]
    InvalidGrid { rows: u8, cols: u8 },

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl EngineError {
    /// The catalog failed to resolve a slug. Such errors are fatal for the
    /// action and are logged at error level.
    #[must_use]
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownCard(_)
                | EngineError::UnknownAbility(_)
                | EngineError::UnknownStatusEffect(_)
                | EngineError::Snapshot(_)
        )
    }

    /// The action was illegal in the current state.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !self.is_data_integrity()
    }
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        EngineError::Snapshot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EngineError::WrongPhase {
            action: "cast",
            phase: Phase::Draw,
        };
        assert_eq!(err.to_string(), "cast is not allowed during the draw phase");

        let err = EngineError::InsufficientStamina { have: 1, need: 3 };
        assert_eq!(err.to_string(), "not enough stamina: have 1, need 3");
    }

    #[test]
    fn test_classification() {
        assert!(EngineError::UnknownCard("x".into()).is_data_integrity());
        assert!(EngineError::NotYourTurn.is_validation());
        assert!(!EngineError::OutOfRange { distance: 3, range: 1 }.is_data_integrity());
    }
}
