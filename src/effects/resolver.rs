//! Effect resolution: executing effects on match state.
//!
//! The `EffectResolver` is a recursive interpreter over `Effect`. It carries
//! a `ResolutionContext` through one card's (or one hex tick's) effect list
//! so later effects can see what earlier ones did: the armed drain and the
//! side an `any-*` label picked.

use super::effect::{Condition, Effect, HexGate, HexTiming};
use super::targeting::{TargetChoice, TargetLabel, TargetResolver};
use crate::board::{ActiveEffect, Coord};
use crate::cards::{CardInstance, CatalogStore, StatusEffectDefinition};
use crate::core::player::SideId;
use crate::core::resources::{DamageOutcome, Resource};
use crate::core::state::{Hex, MatchState};
use crate::zones::ZonePosition;

/// State threaded through one resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionContext {
    /// The side the effects belong to (caster, or hex owner).
    pub controller: SideId,
    /// The side `enemy-wizard` and `attached-wizard` resolve to.
    pub opposing: SideId,
    /// Explicit choice for `any-*` labels.
    pub chosen: Option<TargetChoice>,
    /// Side most recently picked by an `any-*` label.
    pub focus: Option<SideId>,
    /// Armed drain: heal amount and resource.
    pub pending_drain: Option<(i32, Resource)>,
    /// Display name of whatever is resolving, for the log.
    pub source: String,
    /// The card being resolved. `AttachHex` takes it to become the hex.
    pub source_instance: Option<CardInstance>,
}

impl ResolutionContext {
    pub fn new(controller: SideId, opposing: SideId, source: impl Into<String>) -> Self {
        Self {
            controller,
            opposing,
            chosen: None,
            focus: None,
            pending_drain: None,
            source: source.into(),
            source_instance: None,
        }
    }

    #[must_use]
    pub fn with_choice(mut self, chosen: Option<TargetChoice>) -> Self {
        self.chosen = chosen;
        self
    }

    #[must_use]
    pub fn with_source_instance(mut self, card: CardInstance) -> Self {
        self.source_instance = Some(card);
        self
    }
}

/// Result of resolving an effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// Effect changed the match.
    Applied,
    /// Nothing to do (no target, ward already granted, ...). Logged.
    NoOp(String),
    /// Conditional whose condition did not hold.
    Skipped,
}

/// Resolves effects on match state.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve an effect list in order with one shared context.
    pub fn resolve_all(
        effects: &[Effect],
        ctx: &mut ResolutionContext,
        state: &mut MatchState,
        catalog: &CatalogStore,
    ) -> Vec<ResolveResult> {
        effects
            .iter()
            .map(|effect| Self::resolve(effect, ctx, state, catalog))
            .collect()
    }

    /// Resolve a single effect.
    pub fn resolve(
        effect: &Effect,
        ctx: &mut ResolutionContext,
        state: &mut MatchState,
        catalog: &CatalogStore,
    ) -> ResolveResult {
        tracing::debug!(match_id = %state.id, kind = effect.kind_name(), source = %ctx.source, "resolving effect");
        let offensive = effect.is_offensive();

        match effect {
            Effect::Damage {
                amount,
                resource,
                target,
            } => {
                let Some(side) = TargetResolver::resolve_side(*target, offensive, ctx, &state.grid) else {
                    return Self::no_op(state, ctx, "no target");
                };
                Self::apply_damage(state, ctx, side, *resource, *amount);
                ResolveResult::Applied
            }

            Effect::CostPayment {
                amount,
                resource,
                target,
            } => {
                let Some(side) = TargetResolver::resolve_side(*target, offensive, ctx, &state.grid) else {
                    return Self::no_op(state, ctx, "no target");
                };
                let lost = state.sides[side].resources.lose(*resource, *amount);
                let name = state.sides[side].name.clone();
                state.log(format!("{name} pays {lost} {resource} for {}.", ctx.source));
                ResolveResult::Applied
            }

            Effect::Drain { amount, resource } => {
                ctx.pending_drain = Some((*amount, *resource));
                ResolveResult::Applied
            }

            Effect::Channel { amount } => {
                state.sides[ctx.controller].resources.channel(*amount);
                let name = state.sides[ctx.controller].name.clone();
                state.log(format!("{name} channels {amount}."));
                ResolveResult::Applied
            }

            Effect::Burn { amount, target } => {
                let Some(side) = TargetResolver::resolve_side(*target, offensive, ctx, &state.grid) else {
                    return Self::no_op(state, ctx, "no target");
                };
                state.sides[side].resources.add_burn(*amount);
                let name = state.sides[side].name.clone();
                state.log(format!("{name} is set alight: burn {amount}."));
                ResolveResult::Applied
            }

            Effect::Ward {
                amount,
                target,
                focus,
            } => {
                let Some(side) = TargetResolver::resolve_side(*target, offensive, ctx, &state.grid) else {
                    return Self::no_op(state, ctx, "no target");
                };
                let turn = state.turn;
                let name = state.sides[side].name.clone();
                if !state.sides[side].resources.grant_ward(*amount, *focus, turn) {
                    return Self::no_op(state, ctx, format!("{name} is already warded this turn"));
                }
                let covers = focus.map_or_else(|| "any resource".to_string(), |r| r.to_string());
                state.log(format!("{name} gains a ward of {amount} ({covers})."));
                ResolveResult::Applied
            }

            Effect::Draw { amount, target } => {
                let Some(side) = Self::side_or_controller(*target, offensive, ctx, state) else {
                    return Self::no_op(state, ctx, "no target");
                };
                state.draw_cards(side, *amount as usize);
                ResolveResult::Applied
            }

            Effect::Discard { amount, target } => {
                let Some(side) = Self::side_or_controller(*target, offensive, ctx, state) else {
                    return Self::no_op(state, ctx, "no target");
                };
                if state.discard_random(side, *amount as usize).is_empty() {
                    let name = state.sides[side].name.clone();
                    return Self::no_op(state, ctx, format!("{name} has nothing to discard"));
                }
                ResolveResult::Applied
            }

            Effect::Insight { amount } => {
                let names: Vec<&str> = state.sides[ctx.controller]
                    .piles
                    .deck
                    .peek_top(*amount as usize)
                    .map(|card| catalog.card_name(&card.slug))
                    .collect();
                let message = if names.is_empty() {
                    "Insight: your deck is empty.".to_string()
                } else {
                    format!("Insight: {}.", names.join(", "))
                };
                state.log_private(ctx.controller, message);
                ResolveResult::Applied
            }

            Effect::ReturnFromVoid { slug, target } => {
                let Some(side) = Self::side_or_controller(*target, offensive, ctx, state) else {
                    return Self::no_op(state, ctx, "no target");
                };
                let piles = &mut state.sides[side].piles;
                let card = match slug {
                    Some(slug) => piles.void.remove_slug(slug),
                    None => piles.void.remove_where(|card| !catalog.is_unit_card(&card.slug)),
                };
                let Some(card) = card else {
                    return Self::no_op(state, ctx, "nothing in the void to return");
                };
                let card_name = catalog.card_name(&card.slug).to_string();
                piles.deck.insert(card, ZonePosition::Top);
                let name = state.sides[side].name.clone();
                state.log(format!("{name} returns {card_name} from the void to the top of their deck."));
                ResolveResult::Applied
            }

            Effect::AttachHex { target, ongoing } => {
                let Some(side) = TargetResolver::resolve_side(*target, offensive, ctx, &state.grid) else {
                    return Self::no_op(state, ctx, "no target");
                };
                let Some(card) = ctx.source_instance.take() else {
                    return Self::no_op(state, ctx, "no card to attach");
                };
                let name = state.sides[side].name.clone();
                state.log(format!("{} is attached to {name}.", ctx.source));
                state.hexes.push(Hex {
                    card,
                    owner: ctx.controller,
                    attached_to: side,
                    ongoing: ongoing.clone(),
                });
                ResolveResult::Applied
            }

            Effect::Dispel { amount, target } => {
                let Some(side) = TargetResolver::resolve_side(*target, offensive, ctx, &state.grid) else {
                    return Self::no_op(state, ctx, "no target");
                };
                // Zero means every hex on the side.
                let limit = if *amount == 0 { usize::MAX } else { *amount as usize };
                let mut removed = Vec::new();
                let mut kept = Vec::with_capacity(state.hexes.len());
                for hex in std::mem::take(&mut state.hexes) {
                    if hex.attached_to == side && removed.len() < limit {
                        removed.push(hex);
                    } else {
                        kept.push(hex);
                    }
                }
                state.hexes = kept;
                if removed.is_empty() {
                    let name = state.sides[side].name.clone();
                    return Self::no_op(state, ctx, format!("no hexes on {name}"));
                }
                for hex in removed {
                    let card_name = catalog.card_name(&hex.card.slug).to_string();
                    state.sides[hex.owner].piles.discard.insert(hex.card, ZonePosition::Top);
                    state.log(format!("{card_name} is dispelled."));
                }
                ResolveResult::Applied
            }

            Effect::CostIncrease { amount, target } => {
                let Some(side) = Self::side_or_controller(*target, offensive, ctx, state) else {
                    return Self::no_op(state, ctx, "no target");
                };
                state.sides[side].resources.cost_modifiers.increase += amount;
                let name = state.sides[side].name.clone();
                state.log(format!("{name}'s spells cost {amount} more."));
                ResolveResult::Applied
            }

            Effect::CostReduction { amount, target } => {
                let Some(side) = Self::side_or_controller(*target, offensive, ctx, state) else {
                    return Self::no_op(state, ctx, "no target");
                };
                state.sides[side].resources.cost_modifiers.reduction += amount;
                let name = state.sides[side].name.clone();
                state.log(format!("{name}'s spells cost {amount} less."));
                ResolveResult::Applied
            }

            Effect::Conditional { condition, then } => {
                if !Self::check(condition, ctx, state) {
                    return ResolveResult::Skipped;
                }
                for nested in then {
                    Self::resolve(nested, ctx, state, catalog);
                }
                ResolveResult::Applied
            }
        }
    }

    /// Damage a side's resource: ward first, then clamped loss, then the
    /// armed drain if vitality was actually lost.
    pub fn apply_damage(
        state: &mut MatchState,
        ctx: &mut ResolutionContext,
        target: SideId,
        resource: Resource,
        amount: i32,
    ) -> DamageOutcome {
        let outcome = state.sides[target].resources.absorb(resource, amount);
        let name = state.sides[target].name.clone();
        if outcome.prevented > 0 {
            state.log(format!("{name}'s ward absorbs {}.", outcome.prevented));
        }
        state.log(format!("{} deals {} {resource} damage to {name}.", ctx.source, outcome.lost));
        state.record_damage(ctx.controller, target, outcome.lost);

        if resource == Resource::Vitality && outcome.lost > 0 {
            if let Some((heal, heal_resource)) = ctx.pending_drain.take() {
                let healed = state.sides[ctx.controller].resources.restore(heal_resource, heal);
                let controller = state.sides[ctx.controller].name.clone();
                state.log(format!("{controller} drains {healed} {heal_resource}."));
            }
        }
        outcome
    }

    /// Fire every burn stack on `side` as vitality damage, then clear them.
    /// Each stack that deals damage triggers the side's on-burn hexes.
    pub fn tick_burn(state: &mut MatchState, side: SideId, catalog: &CatalogStore) {
        let stacks = state.sides[side].resources.take_burn();
        for stack in stacks {
            let mut ctx = ResolutionContext::new(side.opponent(), side, "Burn");
            let outcome = Self::apply_damage(state, &mut ctx, side, Resource::Vitality, stack.value);
            if outcome.lost > 0 {
                Self::resolve_hexes(state, side, HexTiming::OnBurn, catalog);
            }
        }
    }

    /// Resolve the ongoing effects with `timing` of every hex attached to
    /// `side`, in attach order.
    pub fn resolve_hexes(state: &mut MatchState, side: SideId, timing: HexTiming, catalog: &CatalogStore) {
        let spells_cast = state.sides[side].flags.spells_cast;
        let due: Vec<(SideId, String, Vec<Effect>)> = state
            .hexes_on(side)
            .map(|hex| {
                let effects: Vec<Effect> = hex
                    .ongoing
                    .iter()
                    .filter(|o| o.timing == timing)
                    .filter(|o| match o.gate {
                        HexGate::Always => true,
                        HexGate::NoSpellCast => spells_cast == 0,
                    })
                    .map(|o| o.effect.clone())
                    .collect();
                (hex.owner, catalog.card_name(&hex.card.slug).to_string(), effects)
            })
            .filter(|(_, _, effects)| !effects.is_empty())
            .collect();

        for (owner, name, effects) in due {
            let mut ctx = ResolutionContext::new(owner, side, name);
            Self::resolve_all(&effects, &mut ctx, state, catalog);
        }
    }

    /// Apply a status effect to the unit on `coord`. Returns `false` if the
    /// cell is empty.
    pub fn apply_status(
        state: &mut MatchState,
        coord: Coord,
        status: &StatusEffectDefinition,
        applier: SideId,
    ) -> bool {
        let Some(unit) = state.grid.get_mut(coord) else {
            return false;
        };
        let applied = unit.adjust_stamina(status.modifiers.stamina_change);
        unit.effects.push(ActiveEffect {
            slug: status.slug.clone(),
            name: status.name.clone(),
            kind: status.kind,
            expires_after: applier,
            applied_stamina_delta: applied,
            damage_bonus: status.modifiers.damage_bonus,
        });
        let unit_name = unit.name.clone();
        state.log(format!("{unit_name} at {coord} gains {}.", status.name));
        true
    }

    fn check(condition: &Condition, ctx: &mut ResolutionContext, state: &MatchState) -> bool {
        let Some(side) = TargetResolver::resolve_condition_side(*condition.target(), ctx, &state.grid) else {
            return false;
        };
        let target = &state.sides[side];
        match condition {
            Condition::Threshold {
                resource,
                threshold,
                comparison,
                ..
            } => comparison.holds(target.resources.get(*resource), *threshold),
            Condition::HasWard { .. } => target.resources.has_ward(),
            Condition::VoidSizeAtLeast { count, .. } => target.piles.void.len() >= *count,
        }
    }

    fn side_or_controller(
        label: Option<TargetLabel>,
        offensive: bool,
        ctx: &mut ResolutionContext,
        state: &MatchState,
    ) -> Option<SideId> {
        match label {
            Some(label) => TargetResolver::resolve_side(label, offensive, ctx, &state.grid),
            None => Some(ctx.controller),
        }
    }

    fn no_op(state: &mut MatchState, ctx: &ResolutionContext, reason: impl Into<String>) -> ResolveResult {
        let reason = reason.into();
        state.log(format!("{}: {reason}.", ctx.source));
        ResolveResult::NoOp(reason)
    }
}
