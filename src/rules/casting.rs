//! Casting spells and haunting from the void.

use serde::{Deserialize, Serialize};

use super::phases::TurnController;
use crate::cards::{CardDefinition, CatalogStore, RitualCost, RitualMode};
use crate::core::error::{EngineError, Result};
use crate::core::player::SideId;
use crate::core::resources::Resource;
use crate::core::state::MatchState;
use crate::effects::{EffectResolver, ResolutionContext, ResolveResult, TargetChoice};
use crate::zones::ZonePosition;

/// Caller choices for a cast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastOptions {
    /// Pay the ritual cost and resolve the ritual effects instead.
    pub use_ritual: bool,
    /// Explicit pick for `any-*` targets.
    pub target: Option<TargetChoice>,
}

impl CastOptions {
    #[must_use]
    pub fn targeting(target: TargetChoice) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ritual(mut self) -> Self {
        self.use_ritual = true;
        self
    }
}

/// What a cast did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastOutcome {
    pub slug: String,
    /// Soulfire paid.
    pub cost: i32,
    pub ritual: bool,
    pub results: Vec<ResolveResult>,
}

/// Validates and resolves spells.
pub struct SpellCaster;

impl SpellCaster {
    /// Soulfire `side` would pay for `card` right now.
    #[must_use]
    pub fn compute_cost(state: &MatchState, side: SideId, card: &CardDefinition) -> i32 {
        state.side(side).resources.spell_cost(card.cost)
    }

    /// Whether `side` can pay a ritual cost on top of `soulfire_cost`.
    #[must_use]
    pub fn ritual_affordable(state: &MatchState, side: SideId, ritual: &RitualMode, soulfire_cost: i32) -> bool {
        let actor = state.side(side);
        match &ritual.cost {
            RitualCost::Resource { resource, amount } => {
                let available = match resource {
                    Resource::Soulfire => actor.resources.soulfire - soulfire_cost,
                    other => actor.resources.get(*other),
                };
                available >= *amount
            }
            // The cast card itself leaves the hand first.
            RitualCost::Discard(count) => actor.piles.hand.len().saturating_sub(1) >= *count as usize,
            RitualCost::ExileFromVoid(count) => actor.piles.void.len() >= *count as usize,
        }
    }

    /// Cast a spell from hand.
    pub fn cast(
        state: &mut MatchState,
        catalog: &CatalogStore,
        side: SideId,
        slug: &str,
        options: CastOptions,
    ) -> Result<CastOutcome> {
        TurnController::ensure_main(state, side, "cast")?;
        if !state.side(side).piles.hand.contains_slug(slug) {
            return Err(EngineError::CardNotInHand(slug.to_string()));
        }
        let card = catalog.card(slug)?;
        if card.is_unit() || !card.kind.is_spell() {
            return Err(EngineError::NotASpellCard(slug.to_string()));
        }
        let cost = Self::compute_cost(state, side, card);
        let soulfire = state.side(side).resources.soulfire;
        if soulfire < cost {
            return Err(EngineError::InsufficientResource {
                resource: Resource::Soulfire,
                have: soulfire,
                need: cost,
            });
        }
        let ritual = if options.use_ritual {
            let ritual = card.ritual.as_ref().ok_or_else(|| EngineError::NoRitual(slug.to_string()))?;
            if !Self::ritual_affordable(state, side, ritual, cost) {
                return Err(EngineError::RitualUnaffordable(slug.to_string()));
            }
            Some(ritual)
        } else {
            None
        };

        let Some(instance) = state.side_mut(side).piles.hand.remove_slug(slug) else {
            return Err(EngineError::CardNotInHand(slug.to_string()));
        };
        {
            let actor = state.side_mut(side);
            actor.resources.lose(Resource::Soulfire, cost);
            actor.resources.channel = 0;
            actor.flags.spells_cast += 1;
        }
        let name = state.side(side).name.clone();
        state.log(format!("{name} casts {} for {cost} soulfire.", card.name));

        let effects = match ritual {
            Some(ritual) => {
                Self::pay_ritual(state, catalog, side, &ritual.cost);
                state.log(format!("{name} performs the ritual of {}.", card.name));
                &ritual.replaces
            }
            None => &card.effects,
        };

        let mut ctx = ResolutionContext::new(side, side.opponent(), card.name.clone())
            .with_choice(options.target)
            .with_source_instance(instance);
        let results = EffectResolver::resolve_all(effects, &mut ctx, state, catalog);
        if let Some(instance) = ctx.source_instance.take() {
            state.side_mut(side).piles.discard.insert(instance, ZonePosition::Top);
        }
        state.check_defeat();
        tracing::debug!(match_id = %state.id, %side, slug, cost, ritual = ritual.is_some(), "spell cast");

        Ok(CastOutcome {
            slug: slug.to_string(),
            cost,
            ritual: ritual.is_some(),
            results,
        })
    }

    /// Exile a card with a haunt effect from the void and resolve the haunt.
    /// Once per turn.
    pub fn haunt(
        state: &mut MatchState,
        catalog: &CatalogStore,
        side: SideId,
        slug: &str,
        target: Option<TargetChoice>,
    ) -> Result<ResolveResult> {
        TurnController::ensure_main(state, side, "haunt")?;
        if state.side(side).flags.haunted {
            return Err(EngineError::HauntUsed);
        }
        if !state.side(side).piles.void.contains_slug(slug) {
            return Err(EngineError::NoHaunt(slug.to_string()));
        }
        let card = catalog.card(slug)?;
        let Some(effect) = card.haunt.as_ref() else {
            return Err(EngineError::NoHaunt(slug.to_string()));
        };

        let Some(instance) = state.side_mut(side).piles.void.remove_slug(slug) else {
            return Err(EngineError::NoHaunt(slug.to_string()));
        };
        state.side_mut(side).flags.haunted = true;
        let name = state.side(side).name.clone();
        state.log(format!("{name} exiles {} from the void to haunt.", card.name));

        let mut ctx = ResolutionContext::new(side, side.opponent(), format!("{} (haunt)", card.name))
            .with_choice(target)
            .with_source_instance(instance);
        let result = EffectResolver::resolve(effect, &mut ctx, state, catalog);
        state.check_defeat();
        Ok(result)
    }

    fn pay_ritual(state: &mut MatchState, catalog: &CatalogStore, side: SideId, cost: &RitualCost) {
        match cost {
            RitualCost::Resource { resource, amount } => {
                let lost = state.side_mut(side).resources.lose(*resource, *amount);
                let name = state.side(side).name.clone();
                state.log(format!("{name} pays {lost} {resource} to the ritual."));
            }
            RitualCost::Discard(count) => {
                state.discard_random(side, *count as usize);
            }
            RitualCost::ExileFromVoid(count) => {
                let mut exiled = Vec::new();
                for _ in 0..*count {
                    match state.side_mut(side).piles.void.pop_top() {
                        Some(card) => exiled.push(catalog.card_name(&card.slug).to_string()),
                        None => break,
                    }
                }
                let name = state.side(side).name.clone();
                state.log(format!("{name} exiles {} from the void.", exiled.join(", ")));
            }
        }
    }
}
