//! Resource pools - skill currencies.
//!
//! A combatant has up to three typed pools (mana, stamina, energy). A pool with
//! a maximum of zero is absent: nothing can be paid from it.

// ============================================================================
// Resource Kind (for costs and references)
// ============================================================================

/// Enum representing individual resource types.
///
/// Used in skill costs and observation encoding to reference specific pools.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString, strum::Display,
)]
#[strum(serialize_all = "UPPERCASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ResourceKind {
    /// Spell resource.
    Mana,
    /// Martial resource.
    Stamina,
    /// Finesse resource.
    Energy,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [Self::Mana, Self::Stamina, Self::Energy];

    const fn index(self) -> usize {
        match self {
            Self::Mana => 0,
            Self::Stamina => 1,
            Self::Energy => 2,
        }
    }
}

/// A single bounded pool. Invariant: `current <= max`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    current: u32,
    max: u32,
}

impl ResourcePool {
    /// Create a pool filled to its maximum.
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub const fn current(&self) -> u32 {
        self.current
    }

    pub const fn max(&self) -> u32 {
        self.max
    }

    pub const fn is_present(&self) -> bool {
        self.max > 0
    }

    pub const fn can_spend(&self, amount: u32) -> bool {
        self.current >= amount
    }

    /// Spend `amount`, returning false (and changing nothing) if unaffordable.
    pub fn spend(&mut self, amount: u32) -> bool {
        if !self.can_spend(amount) {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Restore up to `amount`, returning the amount actually restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max - self.current);
        self.current += restored;
        restored
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Current value as a fraction of the maximum (0 for absent pools).
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

/// Resource maximums as declared by a template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourceMaximums {
    pub mana: u32,
    pub stamina: u32,
    pub energy: u32,
}

impl ResourceMaximums {
    /// Get the max value for a specific resource.
    pub const fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Mana => self.mana,
            ResourceKind::Stamina => self.stamina,
            ResourceKind::Energy => self.energy,
        }
    }
}

/// The three typed pools of a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePools {
    pools: [ResourcePool; 3],
}

impl ResourcePools {
    /// Create pools filled to the given maximums.
    pub fn at_max(max: &ResourceMaximums) -> Self {
        Self {
            pools: ResourceKind::ALL.map(|kind| ResourcePool::full(max.get(kind))),
        }
    }

    pub fn get(&self, kind: ResourceKind) -> &ResourcePool {
        &self.pools[kind.index()]
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut ResourcePool {
        &mut self.pools[kind.index()]
    }

    pub fn refill_all(&mut self) {
        self.pools.iter_mut().for_each(ResourcePool::refill);
    }

    /// First present pool in canonical order.
    pub fn first_present(&self) -> Option<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| self.get(*kind).is_present())
    }
}
