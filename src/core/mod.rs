//! Core engine types: sides, IDs, RNG, configuration, errors, the match log
//! and match state.
//!
//! Nothing here knows about the board rules or effect semantics; those
//! modules build on these types.

pub mod config;
pub mod entity;
pub mod error;
pub mod log;
pub mod player;
pub mod resources;
pub mod rng;
pub mod state;

pub use config::{EngineConfig, Phase};
pub use entity::{InstanceId, MatchId};
pub use error::{EngineError, Result};
pub use log::{LogEntry, MatchLog, Visibility};
pub use player::{SideId, SideMap};
pub use resources::{BurnStack, CostModifiers, DamageOutcome, Resource, ResourcePool, Ward};
pub use rng::{GameRng, GameRngState};
pub use state::{Hex, MatchState, MatchStatus, NpcTally, SideController, SideSetup, SideState, TurnFlags};
