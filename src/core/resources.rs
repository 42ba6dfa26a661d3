//! Per-side resource pool.
//!
//! Vitality and will are clamped to `[0, max]`; soulfire never goes below
//! zero. A side is granted at most one ward per turn; the ward and the burn
//! stacks both run out at the bearer's next start phase.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A wizard resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Vitality,
    Will,
    Soulfire,
}

impl Resource {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Resource::Vitality => "vitality",
            Resource::Will => "will",
            Resource::Soulfire => "soulfire",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Single-slot damage shield.
///
/// Active until it first prevents damage or until the bearer's next start
/// phase clears it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    pub amount: i32,
    /// Resource the ward protects. `None` protects every resource.
    pub focus: Option<Resource>,
    /// Turn number the ward was granted in.
    pub turn: u32,
    pub spent: bool,
}

impl Ward {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.spent && self.amount > 0
    }

    fn covers(&self, resource: Resource) -> bool {
        self.focus.map_or(true, |focus| focus == resource)
    }
}

/// One pending burn stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnStack {
    pub value: i32,
}

/// Standing adjustments to spell costs, cleared at the side's start phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostModifiers {
    pub increase: i32,
    pub reduction: i32,
}

/// Outcome of applying damage through a ward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Damage the ward absorbed.
    pub prevented: i32,
    /// Amount actually removed from the resource (after clamping).
    pub lost: i32,
}

/// Resources and modifiers for one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub vitality: i32,
    pub max_vitality: i32,
    pub will: i32,
    pub max_will: i32,
    pub soulfire: i32,
    pub max_soulfire: i32,
    /// Ceiling for `max_soulfire` growth.
    pub soulfire_cap: i32,
    /// Pending channel, consumed by the next spell cost payment.
    pub channel: i32,
    pub cost_modifiers: CostModifiers,
    pub ward: Ward,
    pub burn: SmallVec<[BurnStack; 4]>,
}

impl ResourcePool {
    /// A full pool. Soulfire starts at `starting_soulfire` and grows by one
    /// every start phase up to `soulfire_cap`.
    #[must_use]
    pub fn new(max_vitality: i32, max_will: i32, starting_soulfire: i32, soulfire_cap: i32) -> Self {
        Self {
            vitality: max_vitality,
            max_vitality,
            will: max_will,
            max_will,
            soulfire: starting_soulfire,
            max_soulfire: starting_soulfire,
            soulfire_cap,
            channel: 0,
            cost_modifiers: CostModifiers::default(),
            ward: Ward::default(),
            burn: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, resource: Resource) -> i32 {
        match resource {
            Resource::Vitality => self.vitality,
            Resource::Will => self.will,
            Resource::Soulfire => self.soulfire,
        }
    }

    /// Lose up to `amount` of a resource, clamped at 0. Returns the amount
    /// actually lost. Bypasses the ward.
    pub fn lose(&mut self, resource: Resource, amount: i32) -> i32 {
        let amount = amount.max(0);
        let slot = match resource {
            Resource::Vitality => &mut self.vitality,
            Resource::Will => &mut self.will,
            Resource::Soulfire => &mut self.soulfire,
        };
        let lost = amount.min(*slot);
        *slot -= lost;
        lost
    }

    /// Restore up to `amount` of a resource, clamped at its max. Returns the
    /// amount actually restored.
    pub fn restore(&mut self, resource: Resource, amount: i32) -> i32 {
        let amount = amount.max(0);
        let (slot, max) = match resource {
            Resource::Vitality => (&mut self.vitality, self.max_vitality),
            Resource::Will => (&mut self.will, self.max_will),
            Resource::Soulfire => (&mut self.soulfire, self.max_soulfire),
        };
        let restored = amount.min((max - *slot).max(0));
        *slot += restored;
        restored
    }

    /// Grant a ward. Returns `false` (and changes nothing) if a ward was
    /// already granted this turn.
    pub fn grant_ward(&mut self, amount: i32, focus: Option<Resource>, turn: u32) -> bool {
        if self.ward.turn == turn && self.ward.amount > 0 {
            return false;
        }
        self.ward = Ward {
            amount,
            focus,
            turn,
            spent: false,
        };
        true
    }

    #[must_use]
    pub fn has_ward(&self) -> bool {
        self.ward.is_active()
    }

    /// Apply damage: the active ward absorbs first and is spent, the excess
    /// reduces the resource clamped at 0.
    pub fn absorb(&mut self, resource: Resource, amount: i32) -> DamageOutcome {
        let amount = amount.max(0);
        let mut prevented = 0;
        if amount > 0 && self.ward.is_active() && self.ward.covers(resource) {
            prevented = amount.min(self.ward.amount);
            self.ward.spent = true;
        }
        let lost = self.lose(resource, amount - prevented);
        DamageOutcome { prevented, lost }
    }

    /// Add a burn stack, merging into an existing stack of equal value.
    pub fn add_burn(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        match self.burn.iter_mut().find(|stack| stack.value == amount) {
            Some(stack) => stack.value += amount,
            None => self.burn.push(BurnStack { value: amount }),
        }
    }

    /// Remove and return every burn stack.
    pub fn take_burn(&mut self) -> SmallVec<[BurnStack; 4]> {
        std::mem::take(&mut self.burn)
    }

    #[must_use]
    pub fn total_burn(&self) -> i32 {
        self.burn.iter().map(|stack| stack.value).sum()
    }

    /// Start-of-turn refresh: max soulfire +1 (capped), current refilled.
    pub fn refresh_soulfire(&mut self) {
        self.max_soulfire = (self.max_soulfire + 1).min(self.soulfire_cap);
        self.soulfire = self.max_soulfire;
    }

    /// Clear per-turn modifiers and any ward still standing.
    pub fn reset_turn(&mut self) {
        self.channel = 0;
        self.cost_modifiers = CostModifiers::default();
        self.ward = Ward::default();
    }

    /// Raise pending channel to at least `amount`.
    pub fn channel(&mut self, amount: i32) {
        self.channel = self.channel.max(amount);
    }

    /// Effective soulfire cost of a spell with the given base cost.
    ///
    /// ```
    /// use soulfire_engine::core::ResourcePool;
    ///
    /// let mut pool = ResourcePool::new(20, 10, 3, 10);
    /// pool.channel(3);
    /// assert_eq!(pool.spell_cost(2), 1);
    /// pool.cost_modifiers.increase = 2;
    /// assert_eq!(pool.spell_cost(2), 3);
    /// ```
    #[must_use]
    pub fn spell_cost(&self, base: i32) -> i32 {
        let channelled = (base - self.channel).max(1);
        (channelled + self.cost_modifiers.increase - self.cost_modifiers.reduction).max(1)
    }
}
