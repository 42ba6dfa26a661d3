//! Effect definitions.
//!
//! Every card is a list of `Effect`s. The set of kinds is closed, and the
//! resolver matches on it exhaustively, so adding a kind forces every
//! consumer to handle it.

use serde::{Deserialize, Serialize};

use super::targeting::TargetLabel;
use crate::core::resources::Resource;

/// An atomic card effect.
///
/// ## Resource effects
///
/// - `Damage`: ward-absorbed loss, may trigger an armed drain
/// - `CostPayment`: direct loss, ignores ward and drain
/// - `Drain`: arms a one-shot heal for the next vitality damage
/// - `Channel`, `CostIncrease`, `CostReduction`: spell cost adjustments
/// - `Burn`, `Ward`: delayed damage and single-use shields
///
/// ## Card effects
///
/// - `Draw`, `Discard`, `Insight`, `ReturnFromVoid`
///
/// ## Hexes
///
/// - `AttachHex`, `Dispel`
///
/// ## Composite
///
/// - `Conditional`: resolve `then` only if the condition holds
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    Damage {
        amount: i32,
        resource: Resource,
        target: TargetLabel,
    },
    CostPayment {
        amount: i32,
        resource: Resource,
        target: TargetLabel,
    },
    Drain {
        amount: i32,
        resource: Resource,
    },
    Channel {
        amount: i32,
    },
    Burn {
        amount: i32,
        target: TargetLabel,
    },
    Ward {
        amount: i32,
        target: TargetLabel,
        focus: Option<Resource>,
    },
    Draw {
        amount: u32,
        target: Option<TargetLabel>,
    },
    Discard {
        amount: u32,
        target: Option<TargetLabel>,
    },
    Insight {
        amount: u32,
    },
    /// Move a card from void to the top of the deck. Without a slug, the
    /// most recently voided spell is returned.
    ReturnFromVoid {
        slug: Option<String>,
        target: Option<TargetLabel>,
    },
    AttachHex {
        target: TargetLabel,
        ongoing: Vec<OngoingEffect>,
    },
    /// Remove up to `amount` hexes from the target side; 0 removes them all.
    Dispel {
        amount: u32,
        target: TargetLabel,
    },
    CostIncrease {
        amount: i32,
        target: Option<TargetLabel>,
    },
    CostReduction {
        amount: i32,
        target: Option<TargetLabel>,
    },
    Conditional {
        condition: Condition,
        then: Vec<Effect>,
    },
}

impl Effect {
    pub fn damage(amount: i32, resource: Resource, target: TargetLabel) -> Self {
        Self::Damage {
            amount,
            resource,
            target,
        }
    }

    pub fn cost_payment(amount: i32, resource: Resource) -> Self {
        Self::CostPayment {
            amount,
            resource,
            target: TargetLabel::Controller,
        }
    }

    pub fn drain(amount: i32) -> Self {
        Self::Drain {
            amount,
            resource: Resource::Vitality,
        }
    }

    pub fn channel(amount: i32) -> Self {
        Self::Channel { amount }
    }

    pub fn burn(amount: i32, target: TargetLabel) -> Self {
        Self::Burn { amount, target }
    }

    pub fn ward(amount: i32, target: TargetLabel, focus: Option<Resource>) -> Self {
        Self::Ward {
            amount,
            target,
            focus,
        }
    }

    pub fn draw(amount: u32) -> Self {
        Self::Draw {
            amount,
            target: None,
        }
    }

    pub fn discard(amount: u32, target: TargetLabel) -> Self {
        Self::Discard {
            amount,
            target: Some(target),
        }
    }

    pub fn insight(amount: u32) -> Self {
        Self::Insight { amount }
    }

    pub fn attach_hex(target: TargetLabel, ongoing: Vec<OngoingEffect>) -> Self {
        Self::AttachHex { target, ongoing }
    }

    pub fn dispel(amount: u32, target: TargetLabel) -> Self {
        Self::Dispel { amount, target }
    }

    pub fn conditional(condition: Condition, then: Vec<Effect>) -> Self {
        Self::Conditional { condition, then }
    }

    /// Offensive kinds default an unchosen `any-*` target to the opposing
    /// side; everything else defaults to the controller.
    #[must_use]
    pub fn is_offensive(&self) -> bool {
        matches!(
            self,
            Effect::Damage { .. } | Effect::Burn { .. } | Effect::Discard { .. } | Effect::AttachHex { .. }
        )
    }

    /// Short kind name for logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Effect::Damage { .. } => "DAMAGE",
            Effect::CostPayment { .. } => "COST_PAYMENT",
            Effect::Drain { .. } => "DRAIN",
            Effect::Channel { .. } => "CHANNEL",
            Effect::Burn { .. } => "BURN",
            Effect::Ward { .. } => "WARD",
            Effect::Draw { .. } => "DRAW",
            Effect::Discard { .. } => "DISCARD",
            Effect::Insight { .. } => "INSIGHT",
            Effect::ReturnFromVoid { .. } => "RETURN_FROM_VOID",
            Effect::AttachHex { .. } => "ATTACH_HEX",
            Effect::Dispel { .. } => "DISPEL",
            Effect::CostIncrease { .. } => "COST_INCREASE",
            Effect::CostReduction { .. } => "COST_REDUCTION",
            Effect::Conditional { .. } => "CONDITIONAL",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Comparison {
    OrLess,
    OrMore,
}

impl Comparison {
    #[must_use]
    pub fn holds(self, value: i32, threshold: i32) -> bool {
        match self {
            Comparison::OrLess => value <= threshold,
            Comparison::OrMore => value >= threshold,
        }
    }
}

/// Condition checked by `Effect::Conditional`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Threshold {
        resource: Resource,
        threshold: i32,
        comparison: Comparison,
        target: TargetLabel,
    },
    HasWard {
        target: TargetLabel,
    },
    VoidSizeAtLeast {
        count: usize,
        target: TargetLabel,
    },
}

impl Condition {
    pub fn will_at_most(threshold: i32, target: TargetLabel) -> Self {
        Self::Threshold {
            resource: Resource::Will,
            threshold,
            comparison: Comparison::OrLess,
            target,
        }
    }

    #[must_use]
    pub fn target(&self) -> &TargetLabel {
        match self {
            Condition::Threshold { target, .. }
            | Condition::HasWard { target }
            | Condition::VoidSizeAtLeast { target, .. } => target,
        }
    }
}

/// When a hex's ongoing effect fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HexTiming {
    #[default]
    StartOfTurn,
    EndOfTurn,
    /// Each time a burn stack damages the attached side.
    OnBurn,
}

/// Extra requirement for a hex effect to fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HexGate {
    #[default]
    Always,
    /// Only if the attached side cast no spell this turn.
    NoSpellCast,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OngoingEffect {
    #[serde(default)]
    pub timing: HexTiming,
    #[serde(default)]
    pub gate: HexGate,
    pub effect: Effect,
}

impl OngoingEffect {
    pub fn at_start(effect: Effect) -> Self {
        Self {
            timing: HexTiming::StartOfTurn,
            gate: HexGate::Always,
            effect,
        }
    }

    pub fn at_end(effect: Effect) -> Self {
        Self {
            timing: HexTiming::EndOfTurn,
            ..Self::at_start(effect)
        }
    }

    pub fn on_burn(effect: Effect) -> Self {
        Self {
            timing: HexTiming::OnBurn,
            ..Self::at_start(effect)
        }
    }

    #[must_use]
    pub fn gated(mut self, gate: HexGate) -> Self {
        self.gate = gate;
        self
    }
}
