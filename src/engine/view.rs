//! Per-viewer projections of a match.
//!
//! A view is what one side is allowed to see: its own hand, only a count of
//! the opponent's, the board (minus the opponent's units while deployment is
//! still hidden) and the log tail with the other side's private entries
//! filtered out.

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::cards::{CardInstance, CatalogStore, StatusKind};
use crate::core::config::Phase;
use crate::core::entity::{InstanceId, MatchId};
use crate::core::log::LogEntry;
use crate::core::player::SideId;
use crate::core::resources::Ward;
use crate::core::state::{MatchState, MatchStatus, SideController};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectView {
    pub name: String,
    pub kind: StatusKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    pub coord: Coord,
    pub slug: String,
    pub name: String,
    pub owner: SideId,
    pub health: i32,
    pub max_health: i32,
    pub stamina: i32,
    pub stamina_max: i32,
    pub speed: u8,
    pub summoning_sick: bool,
    pub in_enemy_territory: bool,
    pub effects: Vec<EffectView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexView {
    pub id: InstanceId,
    pub name: String,
    pub owner: SideId,
    pub attached_to: SideId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideView {
    pub side: SideId,
    pub name: String,
    pub controller: SideController,
    pub vitality: i32,
    pub max_vitality: i32,
    pub will: i32,
    pub max_will: i32,
    pub soulfire: i32,
    pub channel: i32,
    pub burn: i32,
    pub ward: Option<Ward>,
    /// Only filled in for the viewer's own side.
    pub hand: Option<Vec<CardInstance>>,
    pub hand_count: usize,
    pub deck_count: usize,
    pub discard_count: usize,
    pub void_count: usize,
    pub ready: bool,
}

/// Everything one side may see of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub viewer: SideId,
    pub active: SideId,
    pub phase: Phase,
    pub turn: u32,
    pub status: MatchStatus,
    pub rows: u8,
    pub cols: u8,
    pub units: Vec<UnitView>,
    pub you: SideView,
    pub opponent: SideView,
    pub hexes: Vec<HexView>,
    pub log: Vec<LogEntry>,
}

impl MatchView {
    /// Project `state` for `viewer`.
    #[must_use]
    pub fn build(state: &MatchState, catalog: &CatalogStore, viewer: SideId) -> Self {
        let hide_opponent = state.status == MatchStatus::Deployment;
        let grid = &state.grid;
        let units = grid
            .units()
            .filter(|(_, unit)| !hide_opponent || unit.owner == viewer)
            .map(|(coord, unit)| UnitView {
                coord,
                slug: unit.slug.clone(),
                name: unit.name.clone(),
                owner: unit.owner,
                health: unit.health,
                max_health: unit.max_health,
                stamina: unit.stamina,
                stamina_max: unit.stamina_max,
                speed: unit.speed,
                summoning_sick: unit.summoning_sick,
                in_enemy_territory: grid.territory_of(coord) != unit.owner,
                effects: unit
                    .effects
                    .iter()
                    .map(|e| EffectView {
                        name: e.name.clone(),
                        kind: e.kind,
                    })
                    .collect(),
            })
            .collect();

        let hexes = state
            .hexes
            .iter()
            .map(|hex| HexView {
                id: hex.id(),
                name: catalog.card_name(&hex.card.slug).to_string(),
                owner: hex.owner,
                attached_to: hex.attached_to,
            })
            .collect();

        Self {
            id: state.id,
            viewer,
            active: state.active,
            phase: state.phase,
            turn: state.turn,
            status: state.status,
            rows: grid.rows(),
            cols: grid.cols(),
            units,
            you: side_view(state, viewer, true),
            opponent: side_view(state, viewer.opponent(), false),
            hexes,
            log: state.log.tail_for(viewer, state.config.log_tail),
        }
    }

    /// Winner once the match is over.
    #[must_use]
    pub fn winner(&self) -> Option<SideId> {
        match self.status {
            MatchStatus::Completed { winner } => winner,
            _ => None,
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.status, MatchStatus::Completed { .. })
    }
}

fn side_view(state: &MatchState, side: SideId, own: bool) -> SideView {
    let s = state.side(side);
    let pool = &s.resources;
    SideView {
        side,
        name: s.name.clone(),
        controller: s.controller,
        vitality: pool.vitality,
        max_vitality: pool.max_vitality,
        will: pool.will,
        max_will: pool.max_will,
        soulfire: pool.soulfire,
        channel: pool.channel,
        burn: pool.total_burn(),
        ward: pool.ward.is_active().then_some(pool.ward),
        hand: own.then(|| s.piles.hand.iter().cloned().collect()),
        hand_count: s.piles.hand.len(),
        deck_count: s.piles.deck.len(),
        discard_count: s.piles.discard.len(),
        void_count: s.piles.void.len(),
        ready: s.ready,
    }
}
