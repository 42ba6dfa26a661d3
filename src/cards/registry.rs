//! Catalog store for definition lookup.
//!
//! The `CatalogStore` holds every card, ability and status-effect
//! definition, keyed by slug. It is built once, then shared read-only by
//! every match.

use rustc_hash::FxHashMap;

use super::ability::AbilityDefinition;
use super::definition::CardDefinition;
use super::status::StatusEffectDefinition;
use crate::core::error::{EngineError, Result};

/// Read-only definition catalog.
///
/// ## Example
///
/// ```
/// use soulfire_engine::cards::{CatalogStore, CardDefinition, CardKind, School};
///
/// let mut catalog = CatalogStore::new();
/// catalog.register_card(CardDefinition::new("scorch", "Scorch", School::Flame, CardKind::Attack));
///
/// assert_eq!(catalog.card("scorch").unwrap().name, "Scorch");
/// assert!(catalog.card("missing").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CatalogStore {
    cards: FxHashMap<String, CardDefinition>,
    abilities: FxHashMap<String, AbilityDefinition>,
    statuses: FxHashMap<String, StatusEffectDefinition>,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same slug already exists.
    pub fn register_card(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.slug) {
            panic!("Card {:?} already registered", card.slug);
        }
        self.cards.insert(card.slug.clone(), card);
    }

    /// Register an ability definition.
    ///
    /// Panics if an ability with the same slug already exists.
    pub fn register_ability(&mut self, ability: AbilityDefinition) {
        if self.abilities.contains_key(&ability.slug) {
            panic!("Ability {:?} already registered", ability.slug);
        }
        self.abilities.insert(ability.slug.clone(), ability);
    }

    /// Register a status-effect definition.
    ///
    /// Panics if a status effect with the same slug already exists.
    pub fn register_status(&mut self, status: StatusEffectDefinition) {
        if self.statuses.contains_key(&status.slug) {
            panic!("Status effect {:?} already registered", status.slug);
        }
        self.statuses.insert(status.slug.clone(), status);
    }

    /// Look up a card by slug.
    pub fn card(&self, slug: &str) -> Result<&CardDefinition> {
        self.cards
            .get(slug)
            .ok_or_else(|| EngineError::UnknownCard(slug.to_string()))
    }

    /// Look up an ability by slug.
    pub fn ability(&self, slug: &str) -> Result<&AbilityDefinition> {
        self.abilities
            .get(slug)
            .ok_or_else(|| EngineError::UnknownAbility(slug.to_string()))
    }

    /// Look up a status effect by slug.
    pub fn status(&self, slug: &str) -> Result<&StatusEffectDefinition> {
        self.statuses
            .get(slug)
            .ok_or_else(|| EngineError::UnknownStatusEffect(slug.to_string()))
    }

    #[must_use]
    pub fn contains_card(&self, slug: &str) -> bool {
        self.cards.contains_key(slug)
    }

    /// Display name of a card, falling back to the slug.
    #[must_use]
    pub fn card_name<'a>(&'a self, slug: &'a str) -> &'a str {
        self.cards.get(slug).map_or(slug, |card| card.name.as_str())
    }

    /// Check whether a slug names a unit card.
    #[must_use]
    pub fn is_unit_card(&self, slug: &str) -> bool {
        self.cards.get(slug).is_some_and(CardDefinition::is_unit)
    }

    /// Resolve a unit card's ability list.
    pub fn unit_abilities(&self, card: &CardDefinition) -> Result<Vec<AbilityDefinition>> {
        let Some(profile) = card.unit.as_ref() else {
            return Err(EngineError::NotAUnitCard(card.slug.clone()));
        };
        profile
            .abilities
            .iter()
            .map(|slug| self.ability(slug).cloned())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn cards(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardDefinition>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardKind, School};

    fn catalog() -> CatalogStore {
        let mut catalog = CatalogStore::new();
        catalog.register_ability(AbilityDefinition::new("bite", "Bite", 1).with_damage(1, 2));
        catalog.register_card(
            CardDefinition::unit("ash-hound", "Ash Hound", School::Flame, 5, 3, 2).with_ability("bite"),
        );
        catalog.register_card(CardDefinition::new("scorch", "Scorch", School::Flame, CardKind::Attack));
        catalog
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.card("scorch").unwrap().name, "Scorch");
        assert!(matches!(catalog.card("nope"), Err(EngineError::UnknownCard(slug)) if slug == "nope"));
        assert!(catalog.ability("bite").is_ok());
        assert!(matches!(catalog.status("burning"), Err(EngineError::UnknownStatusEffect(_))));
    }

    #[test]
    fn test_unit_abilities() {
        let catalog = catalog();
        let hound = catalog.card("ash-hound").unwrap();
        let abilities = catalog.unit_abilities(hound).unwrap();
        assert_eq!(abilities.len(), 1);
        assert_eq!(abilities[0].slug, "bite");

        let scorch = catalog.card("scorch").unwrap();
        assert!(matches!(catalog.unit_abilities(scorch), Err(EngineError::NotAUnitCard(_))));
    }

    #[test]
    fn test_missing_ability_is_data_error() {
        let mut catalog = catalog();
        catalog.register_card(
            CardDefinition::unit("broken", "Broken", School::Grave, 1, 1, 1).with_ability("missing"),
        );
        let broken = catalog.card("broken").unwrap();
        let err = catalog.unit_abilities(broken).unwrap_err();
        assert!(err.is_data_integrity());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_slug_panics() {
        let mut catalog = catalog();
        catalog.register_card(CardDefinition::new("scorch", "Scorch", School::Flame, CardKind::Attack));
    }

    #[test]
    fn test_find_and_names() {
        let catalog = catalog();
        assert_eq!(catalog.find(|c| c.is_unit()).count(), 1);
        assert_eq!(catalog.card_name("scorch"), "Scorch");
        assert_eq!(catalog.card_name("unknown"), "unknown");
        assert!(catalog.is_unit_card("ash-hound"));
        assert!(!catalog.is_unit_card("scorch"));
    }
}
