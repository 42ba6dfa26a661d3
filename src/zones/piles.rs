//! Card piles and their movement.
//!
//! Each side owns four piles: hand, deck, discard and void. Piles are
//! ordered; the last element is the top (for the deck, the next draw).
//! Hands keep insertion order so overflow beyond the hand limit is the
//! most recently drawn cards.

use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;
use crate::core::entity::InstanceId;
use crate::core::rng::GameRng;

/// Position for inserting a card into a pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Add to top of pile (e.g., top of deck).
    Top,
    /// Add to bottom of pile.
    Bottom,
    /// Insert at specific index (0 = bottom).
    Index(usize),
}

/// Which of a side's piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PileKind {
    Hand,
    Deck,
    Discard,
    Void,
}

/// An ordered pile of cards.
///
/// ## Usage
///
/// ```
/// use soulfire_engine::zones::{Pile, ZonePosition};
/// use soulfire_engine::cards::CardInstance;
/// use soulfire_engine::core::InstanceId;
///
/// let mut deck = Pile::new();
/// deck.insert(CardInstance::new(InstanceId(10), "scorch"), ZonePosition::Top);
/// deck.insert(CardInstance::new(InstanceId(11), "firebolt"), ZonePosition::Bottom);
///
/// assert_eq!(deck.top().map(|c| c.slug.as_str()), Some("scorch"));
/// assert_eq!(deck.pop_top().map(|c| c.id), Some(InstanceId(10)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: Vec<CardInstance>,
}

impl Pile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card at the given position.
    pub fn insert(&mut self, card: CardInstance, position: ZonePosition) {
        match position {
            ZonePosition::Top => self.cards.push(card),
            ZonePosition::Bottom => self.cards.insert(0, card),
            ZonePosition::Index(i) => {
                let idx = i.min(self.cards.len());
                self.cards.insert(idx, card);
            }
        }
    }

    /// Add a card on top.
    pub fn push(&mut self, card: CardInstance) {
        self.cards.push(card);
    }

    #[must_use]
    pub fn top(&self) -> Option<&CardInstance> {
        self.cards.last()
    }

    /// Remove and return the top card.
    pub fn pop_top(&mut self) -> Option<CardInstance> {
        self.cards.pop()
    }

    /// The top `n` cards, topmost first.
    pub fn peek_top(&self, n: usize) -> impl Iterator<Item = &CardInstance> {
        self.cards.iter().rev().take(n)
    }

    /// Remove a specific copy.
    pub fn remove(&mut self, id: InstanceId) -> Option<CardInstance> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(index))
    }

    /// Remove the copy of `slug` nearest the top.
    pub fn remove_slug(&mut self, slug: &str) -> Option<CardInstance> {
        let index = self.cards.iter().rposition(|c| c.is(slug))?;
        Some(self.cards.remove(index))
    }

    /// Remove the topmost card matching a predicate.
    pub fn remove_where<F>(&mut self, predicate: F) -> Option<CardInstance>
    where
        F: Fn(&CardInstance) -> bool,
    {
        let index = self.cards.iter().rposition(|c| predicate(c))?;
        Some(self.cards.remove(index))
    }

    /// Remove the card at an index (0 = bottom).
    pub fn remove_at(&mut self, index: usize) -> Option<CardInstance> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Split off every card above the first `keep`.
    pub fn truncate_to(&mut self, keep: usize) -> Vec<CardInstance> {
        if self.cards.len() <= keep {
            return Vec::new();
        }
        self.cards.split_off(keep)
    }

    /// Remove and return all cards, bottom first.
    pub fn take_all(&mut self) -> Vec<CardInstance> {
        std::mem::take(&mut self.cards)
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = CardInstance>) {
        self.cards.extend(cards);
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    #[must_use]
    pub fn contains_slug(&self, slug: &str) -> bool {
        self.cards.iter().any(|c| c.is(slug))
    }

    #[must_use]
    pub fn find_slug(&self, slug: &str) -> Option<&CardInstance> {
        self.cards.iter().rev().find(|c| c.is(slug))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CardInstance> {
        self.cards.iter()
    }
}

/// The four piles of one side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePiles {
    pub hand: Pile,
    pub deck: Pile,
    pub discard: Pile,
    pub void: Pile,
}

impl SidePiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pile(&self, kind: PileKind) -> &Pile {
        match kind {
            PileKind::Hand => &self.hand,
            PileKind::Deck => &self.deck,
            PileKind::Discard => &self.discard,
            PileKind::Void => &self.void,
        }
    }

    pub fn pile_mut(&mut self, kind: PileKind) -> &mut Pile {
        match kind {
            PileKind::Hand => &mut self.hand,
            PileKind::Deck => &mut self.deck,
            PileKind::Discard => &mut self.discard,
            PileKind::Void => &mut self.void,
        }
    }

    /// Move a specific copy between piles. Returns `false` if it was not in `from`.
    pub fn move_card(&mut self, id: InstanceId, from: PileKind, to: PileKind, position: ZonePosition) -> bool {
        match self.pile_mut(from).remove(id) {
            Some(card) => {
                self.pile_mut(to).insert(card, position);
                true
            }
            None => false,
        }
    }

    /// Cards a side still holds outside the board.
    #[must_use]
    pub fn cards_in_hand_and_deck(&self) -> usize {
        self.hand.len() + self.deck.len()
    }
}
