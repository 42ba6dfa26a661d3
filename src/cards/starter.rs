//! Built-in starter catalog.
//!
//! Thirty spells across the five schools, a unit roster, their abilities
//! and the two standard status effects. Enough to run full matches without
//! an external catalog.

use super::ability::{AbilityDefinition, TargetType};
use super::definition::{CardDefinition, CardKind, RitualCost, School};
use super::registry::CatalogStore;
use super::status::StatusEffectDefinition;
use crate::core::resources::Resource::{Vitality, Will};
use crate::effects::{Condition, Effect, HexGate, OngoingEffect, TargetLabel};

use CardKind::{Attack, Hex, Ritual};
use TargetLabel::{AnyTarget, AnyWizard, AttachedWizard, Controller, EnemyWizard, HexController};

pub const DAMAGE_BOOST: &str = "damage-boost-turn";
pub const STAMINA_SAPPED: &str = "stamina-sapped-turn";

/// Build the starter catalog.
#[must_use]
pub fn starter_catalog() -> CatalogStore {
    let mut catalog = CatalogStore::new();
    for status in statuses() {
        catalog.register_status(status);
    }
    for ability in abilities() {
        catalog.register_ability(ability);
    }
    for card in spells().into_iter().chain(units()) {
        catalog.register_card(card);
    }
    catalog
}

/// A ready-made deck for one school: its units and spells, two copies each
/// of the cheapest ones.
#[must_use]
pub fn starter_deck(school: School) -> Vec<String> {
    let catalog_spells = spells();
    let catalog_units = units();
    let mut deck = Vec::new();
    for card in catalog_units.iter().filter(|c| c.school == school) {
        deck.push(card.slug.clone());
        deck.push(card.slug.clone());
    }
    for card in catalog_spells.iter().filter(|c| c.school == school) {
        deck.push(card.slug.clone());
        if card.cost <= 1 {
            deck.push(card.slug.clone());
        }
    }
    deck
}

fn statuses() -> Vec<StatusEffectDefinition> {
    vec![
        StatusEffectDefinition::buff(DAMAGE_BOOST, "Battle Focus").with_damage_bonus(1, 3),
        StatusEffectDefinition::debuff(STAMINA_SAPPED, "Fatigue").with_stamina_change(-1),
    ]
}

fn abilities() -> Vec<AbilityDefinition> {
    vec![
        AbilityDefinition::new("firelash", "Firelash", 1).with_damage(1, 3).with_range(2),
        AbilityDefinition::new("cleave", "Cleave", 2).with_damage(2, 4),
        AbilityDefinition::new("rally", "Rally", 1)
            .with_target(TargetType::Friendly)
            .with_effect(DAMAGE_BOOST),
        AbilityDefinition::new("sap", "Sap", 1)
            .with_damage(1, 2)
            .with_effect(STAMINA_SAPPED),
        AbilityDefinition::new("bloodbolt", "Bloodbolt", 2).with_damage(2, 3).with_range(3),
        AbilityDefinition::new("hex-bolt", "Hex Bolt", 1)
            .with_damage(1, 2)
            .with_range(2)
            .with_effect(STAMINA_SAPPED),
        AbilityDefinition::new("strike", "Strike", 1).with_damage(1, 2),
    ]
}

fn units() -> Vec<CardDefinition> {
    vec![
        CardDefinition::unit("ember-imp", "Ember Imp", School::Flame, 4, 3, 2)
            .with_ability("firelash")
            .with_ability("strike"),
        CardDefinition::unit("bone-knight", "Bone Knight", School::Grave, 8, 3, 1)
            .with_ability("cleave")
            .with_ability("rally"),
        CardDefinition::unit("shade-stalker", "Shade Stalker", School::Shadow, 5, 4, 2).with_ability("sap"),
        CardDefinition::unit("blood-acolyte", "Blood Acolyte", School::Blood, 5, 3, 1)
            .with_ability("bloodbolt")
            .with_ability("strike"),
        CardDefinition::unit("hex-warden", "Hex Warden", School::Hex, 6, 3, 1)
            .with_ability("hex-bolt")
            .with_ability("rally"),
    ]
}

fn spell(slug: &str, name: &str, school: School, kind: CardKind, cost: i32) -> CardDefinition {
    CardDefinition::new(slug, name, school, kind).with_cost(cost)
}

fn spells() -> Vec<CardDefinition> {
    let mut cards = Vec::with_capacity(30);
    cards.extend(blood());
    cards.extend(shadow());
    cards.extend(flame());
    cards.extend(grave());
    cards.extend(hexes());
    cards
}

fn blood() -> Vec<CardDefinition> {
    vec![
        spell("bloodlash", "Bloodlash", School::Blood, Attack, 2)
            .with_effect(Effect::damage(3, Vitality, AnyWizard))
            .with_effect(Effect::cost_payment(1, Vitality))
            .with_effect(Effect::drain(1))
            .with_text("Deal 3 damage to any wizard. You lose 1 Vitality. DRAIN 1."),
        spell("sanguine-bargain", "Sanguine Bargain", School::Blood, Attack, 1)
            .with_effect(Effect::cost_payment(2, Vitality))
            .with_effect(Effect::channel(2))
            .with_effect(Effect::draw(1))
            .with_text("Lose 2 Vitality. CHANNEL 2. Draw 1 card."),
        spell("blood-ward", "Blood Ward", School::Blood, Attack, 2)
            .with_effect(Effect::ward(3, AnyWizard, Some(Vitality)))
            .with_effect(Effect::conditional(
                Condition::HasWard { target: Controller },
                vec![Effect::drain(1)],
            ))
            .with_text("Choose a wizard. That wizard has WARD 3 this turn. If you chose yourself, DRAIN 1."),
        spell("crimson-rite", "Crimson Rite", School::Blood, Ritual, 3)
            .with_effect(Effect::damage(3, Vitality, AnyTarget))
            .with_ritual(
                RitualCost::Resource {
                    resource: Vitality,
                    amount: 3,
                },
                vec![Effect::damage(5, Vitality, AnyTarget), Effect::drain(2)],
            )
            .with_text("Deal 3 damage to any target. RITUAL (lose 3 Vitality): deal 5 instead, DRAIN 2."),
        spell("crimson-cut", "Crimson Cut", School::Blood, Attack, 1)
            .with_effect(Effect::damage(2, Vitality, AnyWizard))
            .with_effect(Effect::cost_payment(1, Vitality))
            .with_text("Deal 2 damage to any wizard. You lose 1 Vitality."),
        spell("blood-tithe", "Blood Tithe", School::Blood, Attack, 2)
            .with_effect(Effect::damage(2, Vitality, AnyWizard))
            .with_effect(Effect::cost_payment(1, Vitality))
            .with_effect(Effect::drain(2))
            .with_text("Deal 2 damage to any wizard. You lose 1 Vitality. DRAIN 2."),
    ]
}

fn shadow() -> Vec<CardDefinition> {
    vec![
        spell("mind-fracture", "Mind Fracture", School::Shadow, Attack, 2)
            .with_effect(Effect::damage(2, Will, AnyWizard))
            .with_effect(Effect::conditional(
                Condition::will_at_most(5, EnemyWizard),
                vec![Effect::discard(1, EnemyWizard)],
            ))
            .with_text("Target wizard loses 2 Will. TORMENT: at 5 or less Will they also discard 1."),
        spell("whispered-secrets", "Whispered Secrets", School::Shadow, Attack, 1)
            .with_effect(Effect::insight(3))
            .with_effect(Effect::draw(1))
            .with_effect(Effect::cost_payment(1, Will))
            .with_text("INSIGHT 3. Then draw 1 card and lose 1 Will."),
        spell("lingering-fear", "Lingering Fear", School::Shadow, Hex, 3)
            .with_effect(Effect::attach_hex(
                EnemyWizard,
                vec![OngoingEffect::at_start(Effect::damage(1, Will, AttachedWizard))],
            ))
            .with_haunt(Effect::damage(1, Will, AnyWizard))
            .with_text("Attach to an enemy wizard: they lose 1 Will each start. HAUNT: target wizard loses 1 Will."),
        spell("dark-channeling", "Dark Channeling", School::Shadow, Attack, 1)
            .with_effect(Effect::cost_payment(1, Will))
            .with_effect(Effect::channel(2))
            .with_effect(Effect::conditional(
                Condition::will_at_most(5, Controller),
                vec![Effect::channel(3)],
            ))
            .with_text("Lose 1 Will. CHANNEL 2. TORMENT: CHANNEL 3 instead."),
        spell("veil-severance", "Veil Severance", School::Shadow, Attack, 2)
            .with_effect(Effect::dispel(2, AnyWizard))
            .with_effect(Effect::damage(1, Will, HexController))
            .with_text("Dispel up to 2 hexes. Their controller loses 1 Will."),
        spell("night-whisper", "Night Whisper", School::Shadow, Attack, 1)
            .with_effect(Effect::discard(1, EnemyWizard))
            .with_effect(Effect::cost_payment(1, Will))
            .with_text("Target wizard discards 1 card. You lose 1 Will."),
    ]
}

fn flame() -> Vec<CardDefinition> {
    vec![
        spell("scorch", "Scorch", School::Flame, Attack, 1)
            .with_effect(Effect::damage(2, Vitality, AnyTarget))
            .with_effect(Effect::burn(1, AnyWizard))
            .with_text("Deal 2 damage to any target. BURN 1."),
        spell("wildfire-surge", "Wildfire Surge", School::Flame, Attack, 3)
            .with_effect(Effect::damage(3, Vitality, EnemyWizard))
            .with_effect(Effect::burn(2, EnemyWizard))
            .with_effect(Effect::channel(1))
            .with_text("Deal 3 damage to target wizard. BURN 2. CHANNEL 1."),
        spell("overload-pyre", "Overload Pyre", School::Flame, Ritual, 4)
            .with_effect(Effect::damage(4, Vitality, EnemyWizard))
            .with_ritual(
                RitualCost::Discard(1),
                vec![Effect::damage(4, Vitality, EnemyWizard), Effect::burn(3, EnemyWizard)],
            )
            .with_text("Deal 4 damage to target wizard. RITUAL (discard 1): also BURN 3."),
        spell("blazing-focus", "Blazing Focus", School::Flame, Attack, 1)
            .with_effect(Effect::insight(2))
            .with_effect(Effect::cost_payment(1, Vitality))
            .with_text("INSIGHT 2. Then lose 1 Vitality."),
        spell("firebolt", "Firebolt", School::Flame, Attack, 2)
            .with_effect(Effect::damage(3, Vitality, AnyTarget))
            .with_text("Deal 3 damage to any target."),
        spell("purging-flame", "Purging Flame", School::Flame, Attack, 2)
            .with_effect(Effect::dispel(1, AnyWizard))
            .with_effect(Effect::damage(2, Vitality, HexController))
            .with_text("Dispel a hex. Deal 2 damage to its controller."),
    ]
}

fn grave() -> Vec<CardDefinition> {
    vec![
        spell("grave-echo", "Grave Echo", School::Grave, Attack, 1)
            .with_effect(Effect::damage(1, Will, AnyWizard))
            .with_haunt(Effect::damage(1, Will, AnyWizard))
            .with_text("Target wizard loses 1 Will. HAUNT: target wizard loses 1 Will."),
        spell("unearthed-secrets", "Unearthed Secrets", School::Grave, Attack, 2)
            .with_effect(Effect::insight(3))
            .with_effect(Effect::ReturnFromVoid {
                slug: None,
                target: None,
            })
            .with_effect(Effect::cost_payment(1, Will))
            .with_text("INSIGHT 3. Return a spell from your void to the top of your deck. Lose 1 Will."),
        spell("ghastly-drain", "Ghastly Drain", School::Grave, Attack, 2)
            .with_effect(Effect::damage(2, Vitality, AnyWizard))
            .with_effect(Effect::drain(1))
            .with_effect(Effect::conditional(
                Condition::VoidSizeAtLeast {
                    count: 3,
                    target: EnemyWizard,
                },
                vec![Effect::drain(2)],
            ))
            .with_text("Target wizard loses 2 Vitality. DRAIN 1, or DRAIN 2 if their void holds 3+ cards."),
        spell("funeral-rite", "Funeral Rite", School::Grave, Ritual, 3)
            .with_effect(Effect::discard(1, AnyWizard))
            .with_effect(Effect::damage(1, Will, AnyWizard))
            .with_ritual(
                RitualCost::ExileFromVoid(1),
                vec![Effect::discard(1, EnemyWizard), Effect::damage(2, Will, EnemyWizard)],
            )
            .with_text("A wizard discards 1 and loses 1 Will. RITUAL (exile 1 from void): 2 Will instead."),
        spell("grave-purge", "Grave Purge", School::Grave, Attack, 1)
            .with_effect(Effect::dispel(1, AnyWizard))
            .with_effect(Effect::damage(1, Will, HexController))
            .with_text("Dispel a hex. Its controller loses 1 Will."),
        spell("bone-chill", "Bone Chill", School::Grave, Attack, 1)
            .with_effect(Effect::damage(1, Will, AnyWizard))
            .with_effect(Effect::conditional(
                Condition::VoidSizeAtLeast {
                    count: 3,
                    target: AnyWizard,
                },
                vec![Effect::damage(1, Will, AnyWizard)],
            ))
            .with_text("Target wizard loses 1 Will, or 2 if their void holds 3+ cards."),
    ]
}

fn hexes() -> Vec<CardDefinition> {
    vec![
        spell("chains-of-obligation", "Chains of Obligation", School::Hex, Hex, 2)
            .with_effect(Effect::attach_hex(
                EnemyWizard,
                vec![
                    OngoingEffect::at_start(Effect::CostIncrease {
                        amount: 1,
                        target: Some(AttachedWizard),
                    }),
                    OngoingEffect::at_start(Effect::conditional(
                        Condition::will_at_most(5, AttachedWizard),
                        vec![Effect::CostIncrease {
                            amount: 1,
                            target: Some(AttachedWizard),
                        }],
                    )),
                ],
            ))
            .with_text("Attach to an enemy wizard: their spells cost 1 more, 2 more at 5 or less Will."),
        spell("misfortune-mark", "Misfortune Mark", School::Hex, Hex, 2)
            .with_effect(Effect::attach_hex(
                AnyWizard,
                vec![OngoingEffect::on_burn(Effect::damage(1, Will, AttachedWizard))],
            ))
            .with_haunt(Effect::burn(1, AnyWizard))
            .with_text("Attach to a wizard: burn damage also costs them 1 Will. HAUNT: BURN 1."),
        spell("cursed-insight", "Cursed Insight", School::Hex, Attack, 1)
            .with_effect(Effect::insight(2))
            .with_effect(Effect::damage(1, Will, Controller))
            .with_effect(Effect::damage(1, Will, EnemyWizard))
            .with_text("INSIGHT 2. Each wizard loses 1 Will."),
        spell("hexbound-ward", "Hexbound Ward", School::Hex, Attack, 2)
            .with_effect(Effect::ward(3, AnyWizard, Some(Vitality)))
            .with_effect(Effect::conditional(
                Condition::will_at_most(5, AnyWizard),
                vec![Effect::ward(1, AnyWizard, Some(Will))],
            ))
            .with_text("Choose a wizard: WARD 3 against Vitality this turn."),
        spell("hexbreak-edict", "Hexbreak Edict", School::Hex, Attack, 2)
            .with_effect(Effect::dispel(2, AnyWizard))
            .with_effect(Effect::ward(2, AnyWizard, None))
            .with_text("Choose a wizard. Dispel up to 2 hexes on them. They gain WARD 2."),
        spell("hex-of-weariness", "Hex of Weariness", School::Hex, Hex, 1)
            .with_effect(Effect::attach_hex(
                EnemyWizard,
                vec![OngoingEffect::at_end(Effect::damage(1, Will, AttachedWizard)).gated(HexGate::NoSpellCast)],
            ))
            .with_text("Attach to an enemy wizard: they lose 1 Will at end of any turn they cast nothing."),
    ]
}
