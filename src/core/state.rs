//! Match state: the authoritative record of one battle.
//!
//! ## SideState
//!
//! Everything one side owns: name, controller kind, resource pool, piles,
//! deployment progress and per-turn flags.
//!
//! ## MatchState
//!
//! Both sides plus the shared parts:
//! - Active side, phase, turn number, status
//! - Grid of units and the list of attached hexes
//! - Append-only log
//! - NPC damage tally
//! - RNG
//!
//! Only the engine mutates a `MatchState`. Callers get `MatchView`s.

use serde::{Deserialize, Serialize};

use super::config::{EngineConfig, Phase};
use super::entity::{InstanceId, MatchId};
use super::error::{EngineError, Result};
use super::log::MatchLog;
use super::player::{SideId, SideMap};
use super::resources::ResourcePool;
use super::rng::GameRng;
use crate::board::Grid;
use crate::cards::{CardInstance, CatalogStore};
use crate::effects::OngoingEffect;
use crate::zones::{SidePiles, ZonePosition};

/// Who drives a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideController {
    Human,
    Npc,
}

/// Flags reset at the side's start phase, except `has_reshuffled`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFlags {
    /// Set the first time the deck is rebuilt; never cleared.
    pub has_reshuffled: bool,
    pub drew_from_deck: bool,
    pub haunted: bool,
    pub spells_cast: u32,
    pub placed: bool,
}

impl TurnFlags {
    pub fn reset(&mut self) {
        *self = Self {
            has_reshuffled: self.has_reshuffled,
            ..Self::default()
        };
    }
}

/// How to seat one side in a new match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSetup {
    pub name: String,
    pub controller: SideController,
    /// Card slugs, in any order; the deck is shuffled.
    pub deck: Vec<String>,
}

impl SideSetup {
    #[must_use]
    pub fn human(name: impl Into<String>, deck: Vec<String>) -> Self {
        Self {
            name: name.into(),
            controller: SideController::Human,
            deck,
        }
    }

    #[must_use]
    pub fn npc(name: impl Into<String>, deck: Vec<String>) -> Self {
        Self {
            name: name.into(),
            controller: SideController::Npc,
            deck,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    pub name: String,
    pub controller: SideController,
    pub resources: ResourcePool,
    pub piles: SidePiles,
    /// Deployment: marked ready.
    pub ready: bool,
    /// Deployment: units placed so far.
    pub deployed: usize,
    pub flags: TurnFlags,
}

impl SideState {
    #[must_use]
    pub fn is_npc(&self) -> bool {
        self.controller == SideController::Npc
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Deployment,
    InProgress,
    Completed { winner: Option<SideId> },
}

/// A hex attached to a side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    /// The card that became this hex.
    pub card: CardInstance,
    /// The side that cast it.
    pub owner: SideId,
    pub attached_to: SideId,
    pub ongoing: Vec<OngoingEffect>,
}

impl Hex {
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.card.id
    }
}

/// Damage dealt and taken by the NPC side over one match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcTally {
    pub dealt: i64,
    pub taken: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    pub id: MatchId,
    pub sides: SideMap<SideState>,
    pub active: SideId,
    pub phase: Phase,
    /// Turn number, starting at 1 and incremented on every side switch.
    pub turn: u32,
    pub grid: Grid,
    pub hexes: Vec<Hex>,
    pub log: MatchLog,
    pub status: MatchStatus,
    pub npc_tally: NpcTally,
    pub config: EngineConfig,
    pub rng: GameRng,
    next_instance: u32,
}

impl MatchState {
    /// Seat both sides, shuffle their decks and deal opening hands.
    ///
    /// Fails with `InvalidGrid` for an odd or empty board, and with
    /// `UnknownCard` if any deck slug is missing from the catalog.
    pub fn new(
        id: MatchId,
        setups: SideMap<SideSetup>,
        catalog: &CatalogStore,
        config: EngineConfig,
        rng: GameRng,
    ) -> Result<Self> {
        config.validate()?;
        for (_, setup) in setups.iter() {
            for slug in &setup.deck {
                catalog.card(slug)?;
            }
        }

        let pool = ResourcePool::new(
            config.max_vitality,
            config.max_will,
            config.starting_soulfire,
            config.max_soulfire,
        );
        let [first, second] = [SideId::FIRST, SideId::SECOND].map(|side| {
            let setup = setups.get(side);
            SideState {
                name: setup.name.clone(),
                controller: setup.controller,
                resources: pool.clone(),
                piles: SidePiles::new(),
                ready: false,
                deployed: 0,
                flags: TurnFlags::default(),
            }
        });

        let mut state = Self {
            id,
            sides: SideMap::from_pair(first, second),
            active: SideId::FIRST,
            phase: Phase::Deployment,
            turn: 1,
            grid: Grid::new(config.rows, config.cols),
            hexes: Vec::new(),
            log: MatchLog::new(),
            status: MatchStatus::Deployment,
            npc_tally: NpcTally::default(),
            config,
            rng,
            next_instance: 0,
        };

        for side in SideId::both() {
            for slug in &setups.get(side).deck {
                let card = CardInstance::new(state.alloc_instance(), slug.clone());
                state.sides[side].piles.deck.push(card);
            }
            let MatchState { sides, rng, .. } = &mut state;
            sides[side].piles.deck.shuffle(rng);
        }

        for side in SideId::both() {
            let mut count = state.config.opening_hand;
            if side == SideId::SECOND {
                count += state.config.second_side_extra_cards;
            }
            state.draw_cards(side, count);
            state.sides[side].flags.drew_from_deck = false;
        }

        let first_name = state.sides[SideId::FIRST].name.clone();
        let second_name = state.sides[SideId::SECOND].name.clone();
        state.log(format!("{first_name} faces {second_name}. Deploy your units."));
        tracing::info!(match_id = %id, first = %first_name, second = %second_name, "match created");
        Ok(state)
    }

    pub fn side(&self, side: SideId) -> &SideState {
        &self.sides[side]
    }

    pub fn side_mut(&mut self, side: SideId) -> &mut SideState {
        &mut self.sides[side]
    }

    /// Append a public log entry.
    pub fn log(&mut self, message: impl Into<String>) {
        self.log.push(self.turn, self.phase, message);
    }

    /// Append a log entry only `side` can read.
    pub fn log_private(&mut self, side: SideId, message: impl Into<String>) {
        self.log.push_private(side, self.turn, self.phase, message);
    }

    /// Allocate a new card instance ID.
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.status, MatchStatus::Completed { .. })
    }

    /// Fail with `MatchOver` once the match has completed.
    pub fn ensure_live(&self) -> Result<()> {
        if self.is_over() {
            return Err(EngineError::MatchOver);
        }
        Ok(())
    }

    /// The side controlled by the NPC, if any.
    #[must_use]
    pub fn npc_side(&self) -> Option<SideId> {
        self.sides.iter().find(|(_, s)| s.is_npc()).map(|(side, _)| side)
    }

    /// Draw up to `count` cards, rebuilding the deck when it runs out.
    ///
    /// Returns the number of cards actually drawn.
    pub fn draw_cards(&mut self, side: SideId, count: usize) -> usize {
        let mut drawn = 0;
        for _ in 0..count {
            if self.sides[side].piles.deck.is_empty() {
                self.reshuffle(side);
            }
            let piles = &mut self.sides[side].piles;
            let Some(card) = piles.deck.pop_top() else {
                break;
            };
            piles.hand.push(card);
            drawn += 1;
        }
        if drawn > 0 {
            self.sides[side].flags.drew_from_deck = true;
        }
        let name = self.sides[side].name.clone();
        self.log(format!("{name} draws {drawn} card(s)."));
        drawn
    }

    /// Rebuild `side`'s deck from its discard, void and the hexes it owns.
    pub fn reshuffle(&mut self, side: SideId) {
        let (owned, kept): (Vec<Hex>, Vec<Hex>) =
            std::mem::take(&mut self.hexes).into_iter().partition(|h| h.owner == side);
        self.hexes = kept;

        let MatchState { sides, rng, .. } = &mut *self;
        let state = &mut sides[side];
        let discard = state.piles.discard.take_all();
        let void = state.piles.void.take_all();
        let recycled = discard.len() + void.len() + owned.len();
        state.piles.deck.extend(discard);
        state.piles.deck.extend(void);
        state.piles.deck.extend(owned.into_iter().map(|h| h.card));
        state.piles.deck.shuffle(rng);
        state.flags.has_reshuffled = true;

        let name = state.name.clone();
        self.log(format!(
            "{name} reshuffles {recycled} card(s) from discard, void and hexes into a new deck."
        ));
    }

    /// Discard up to `count` random cards from hand. Returns the slugs discarded.
    pub fn discard_random(&mut self, side: SideId, count: usize) -> Vec<String> {
        let mut discarded = Vec::new();
        for _ in 0..count {
            let len = self.sides[side].piles.hand.len();
            if len == 0 {
                break;
            }
            let index = self.rng.gen_range_usize(0..len);
            let piles = &mut self.sides[side].piles;
            if let Some(card) = piles.hand.remove_at(index) {
                discarded.push(card.slug.clone());
                piles.discard.insert(card, ZonePosition::Top);
            }
        }
        if !discarded.is_empty() {
            let name = self.sides[side].name.clone();
            self.log(format!("{name} discards {}.", discarded.join(", ")));
        }
        discarded
    }

    /// Hexes attached to `side`, in attach order.
    pub fn hexes_on(&self, side: SideId) -> impl Iterator<Item = &Hex> {
        self.hexes.iter().filter(move |h| h.attached_to == side)
    }

    #[must_use]
    pub fn is_defeated(&self, side: SideId) -> bool {
        self.grid.unit_count(side) == 0 && self.sides[side].piles.cards_in_hand_and_deck() == 0
    }

    /// Complete the match if a side has no units, no hand and no deck.
    ///
    /// Both sides out at once ends the match without a winner.
    pub fn check_defeat(&mut self) -> Option<MatchStatus> {
        if self.status != MatchStatus::InProgress {
            return None;
        }
        let first = self.is_defeated(SideId::FIRST);
        let second = self.is_defeated(SideId::SECOND);
        let winner = match (first, second) {
            (false, false) => return None,
            (true, false) => Some(SideId::SECOND),
            (false, true) => Some(SideId::FIRST),
            (true, true) => None,
        };
        self.status = MatchStatus::Completed { winner };
        match winner {
            Some(side) => {
                let name = self.sides[side].name.clone();
                self.log(format!("{name} wins the battle."));
            }
            None => self.log("Both sides fall. The battle ends in a draw."),
        }
        tracing::info!(match_id = %self.id, ?winner, turn = self.turn, "match completed");
        Some(self.status)
    }

    /// Fold damage into the NPC tally when the NPC is involved.
    pub fn record_damage(&mut self, dealer: SideId, target: SideId, amount: i32) {
        if amount <= 0 || dealer == target {
            return;
        }
        let amount = i64::from(amount);
        if self.sides[dealer].is_npc() {
            self.npc_tally.dealt += amount;
        }
        if self.sides[target].is_npc() {
            self.npc_tally.taken += amount;
        }
    }

    /// Serialize the whole match for the storage layer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a match serialized with `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{starter_catalog, CardInstance};

    fn deck(n: usize) -> Vec<String> {
        (0..n).map(|i| if i % 2 == 0 { "scorch" } else { "ember-imp" }.to_string()).collect()
    }

    fn new_match(first: usize, second: usize) -> MatchState {
        let catalog = starter_catalog();
        MatchState::new(
            MatchId(1),
            SideMap::from_pair(
                SideSetup::human("Ada", deck(first)),
                SideSetup::npc("Grim", deck(second)),
            ),
            &catalog,
            EngineConfig::default(),
            GameRng::new(42),
        )
        .unwrap()
    }

    #[test]
    fn test_opening_hands() {
        let state = new_match(12, 12);
        assert_eq!(state.side(SideId::FIRST).piles.hand.len(), 5);
        assert_eq!(state.side(SideId::SECOND).piles.hand.len(), 6);
        assert_eq!(state.side(SideId::FIRST).piles.deck.len(), 7);
        assert_eq!(state.status, MatchStatus::Deployment);
        assert_eq!(state.npc_side(), Some(SideId::SECOND));
        assert!(!state.side(SideId::FIRST).flags.drew_from_deck);
    }

    #[test]
    fn test_unknown_deck_card_rejected() {
        let catalog = starter_catalog();
        let result = MatchState::new(
            MatchId(1),
            SideMap::from_pair(
                SideSetup::human("Ada", vec!["no-such-card".into()]),
                SideSetup::human("Bo", deck(3)),
            ),
            &catalog,
            EngineConfig::default(),
            GameRng::new(1),
        );
        assert!(matches!(result, Err(EngineError::UnknownCard(_))));
    }

    #[test]
    fn test_draw_reshuffles_discard_void_and_owned_hexes() {
        let mut state = new_match(5, 12);
        let side = SideId::FIRST;
        assert!(state.side(side).piles.deck.is_empty());

        let id = state.alloc_instance();
        state.side_mut(side).piles.discard.push(CardInstance::new(id, "scorch"));
        let id = state.alloc_instance();
        state.side_mut(side).piles.void.push(CardInstance::new(id, "firebolt"));
        let id = state.alloc_instance();
        state.hexes.push(Hex {
            card: CardInstance::new(id, "lingering-fear"),
            owner: side,
            attached_to: SideId::SECOND,
            ongoing: Vec::new(),
        });

        assert_eq!(state.draw_cards(side, 1), 1);
        let piles = &state.side(side).piles;
        assert_eq!(piles.deck.len(), 2);
        assert!(piles.discard.is_empty() && piles.void.is_empty());
        assert!(state.hexes.is_empty());
        assert!(state.side(side).flags.has_reshuffled);
        assert!(state.side(side).flags.drew_from_deck);
    }

    #[test]
    fn test_draw_stops_when_everything_is_empty() {
        let mut state = new_match(5, 12);
        assert_eq!(state.draw_cards(SideId::FIRST, 3), 0);
        assert_eq!(state.side(SideId::FIRST).piles.hand.len(), 5);
    }

    #[test]
    fn test_discard_random() {
        let mut state = new_match(12, 12);
        let discarded = state.discard_random(SideId::FIRST, 2);
        assert_eq!(discarded.len(), 2);
        assert_eq!(state.side(SideId::FIRST).piles.hand.len(), 3);
        assert_eq!(state.side(SideId::FIRST).piles.discard.len(), 2);
    }

    #[test]
    fn test_defeat_requires_everything_empty() {
        let mut state = new_match(5, 12);
        state.status = MatchStatus::InProgress;
        assert_eq!(state.check_defeat(), None);

        state.side_mut(SideId::FIRST).piles.hand.take_all();
        let status = state.check_defeat();
        assert_eq!(status, Some(MatchStatus::Completed { winner: Some(SideId::SECOND) }));
        assert!(state.ensure_live().is_err());
    }

    #[test]
    fn test_npc_tally() {
        let mut state = new_match(12, 12);
        state.record_damage(SideId::SECOND, SideId::FIRST, 3);
        state.record_damage(SideId::FIRST, SideId::SECOND, 2);
        state.record_damage(SideId::SECOND, SideId::SECOND, 9);
        assert_eq!(state.npc_tally, NpcTally { dealt: 3, taken: 2 });
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = new_match(12, 12);
        state.log("checkpoint");
        let bytes = state.to_bytes().unwrap();
        let mut restored = MatchState::from_bytes(&bytes).unwrap();

        assert_eq!(restored.side(SideId::SECOND).piles, state.side(SideId::SECOND).piles);
        assert_eq!(restored.log.len(), state.log.len());
        assert_eq!(restored.rng.roll(0, 1000), state.rng.roll(0, 1000));
        assert!(MatchState::from_bytes(&[1, 2, 3]).is_err());
    }
}
