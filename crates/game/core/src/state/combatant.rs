//! Runtime state of a single combatant.

use crate::combat::DamageType;
use crate::env::TablesOracle;
use crate::stats::{self, Attribute, Attributes, ResourceKind, ResourcePools};

use super::status::{StatusEffectKind, StatusEffects, TickReport};

/// Index of a combatant inside its [`Roster`](super::Roster).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Team {
    Heroes,
    Opponents,
}

impl Team {
    pub const fn opposing(self) -> Self {
        match self {
            Self::Heroes => Self::Opponents,
            Self::Opponents => Self::Heroes,
        }
    }
}

/// Health bookkeeping. Invariant: `hp <= max_hp`, and `max_hp >= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    hp: u32,
    max_hp: u32,
}

impl Vitals {
    pub fn full(max_hp: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self { hp: max_hp, max_hp }
    }

    pub const fn hp(&self) -> u32 {
        self.hp
    }

    pub const fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub const fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Remove up to `amount` health, returning the health actually lost.
    pub fn lose(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restore up to `amount` health. The defeated stay defeated.
    pub fn restore(&mut self, amount: u32) -> u32 {
        if self.is_defeated() {
            return 0;
        }
        let restored = amount.min(self.max_hp - self.hp);
        self.hp += restored;
        restored
    }

    /// Replace the maximum and refill to it.
    pub fn reset_to(&mut self, max_hp: u32) {
        *self = Self::full(max_hp);
    }

    pub fn fraction(&self) -> f32 {
        self.hp as f32 / self.max_hp as f32
    }
}

/// Split of incoming damage between shield and health.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageReceipt {
    pub absorbed: u32,
    pub dealt: u32,
}

/// Runtime instance of a combatant (player or NPC).
///
/// Created from a [`CombatantTemplate`](crate::env::CombatantTemplate) at
/// episode start, mutated by combat resolution and status ticks, discarded at
/// episode end.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub id: CombatantId,
    pub name: String,
    /// Template this instance was spawned from.
    pub template_id: String,
    pub team: Team,

    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    /// Experience granted to whoever defeats this combatant.
    pub xp_reward: u32,

    pub attributes: Attributes,
    /// Template health before constitution, kept for re-deriving the maximum.
    pub base_health: i32,
    pub vitals: Vitals,
    pub resources: ResourcePools,
    pub primary_resource: Option<ResourceKind>,
    pub armor: i32,
    pub magic_resist: i32,

    /// Known skills in slot order.
    pub skills: Vec<String>,
    pub tags: Vec<String>,
    /// NPC decision strategy identifier (`None` for agent-controlled combatants).
    pub strategy: Option<String>,

    pub status: StatusEffects,
}

impl CombatantState {
    pub fn is_defeated(&self) -> bool {
        self.vitals.is_defeated()
    }

    pub fn is_alive(&self) -> bool {
        !self.is_defeated()
    }

    /// False if defeated or under an action-preventing effect.
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.status.prevents_action()
    }

    pub fn hp(&self) -> u32 {
        self.vitals.hp()
    }

    pub fn max_hp(&self) -> u32 {
        self.vitals.max_hp()
    }

    pub fn health_fraction(&self) -> f32 {
        self.vitals.fraction()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    // ========================================================================
    // Resources
    // ========================================================================

    pub fn can_afford(&self, kind: ResourceKind, amount: u32) -> bool {
        self.is_alive() && self.resources.get(kind).can_spend(amount)
    }

    /// Pay a resource cost. Returns false (changing nothing) when unaffordable.
    pub fn pay(&mut self, kind: ResourceKind, amount: u32) -> bool {
        if !self.can_afford(kind, amount) {
            return false;
        }
        self.resources.get_mut(kind).spend(amount)
    }

    /// Restore a resource, returning the amount actually restored.
    pub fn restore(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        if self.is_defeated() {
            return 0;
        }
        self.resources.get_mut(kind).restore(amount)
    }

    /// Primary pool: the declared one, else the first present pool.
    pub fn primary_pool(&self) -> Option<ResourceKind> {
        self.primary_resource
            .or_else(|| self.resources.first_present())
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Apply damage: shields absorb first, health clamps at zero.
    pub fn take_damage(&mut self, amount: u32) -> DamageReceipt {
        if self.is_defeated() {
            return DamageReceipt::default();
        }
        let absorbed = self.status.absorb(amount);
        let dealt = self.vitals.lose(amount - absorbed);
        DamageReceipt { absorbed, dealt }
    }

    /// Heal up to the maximum. Healing the defeated does nothing.
    pub fn heal(&mut self, amount: u32) -> u32 {
        self.vitals.restore(amount)
    }

    /// Run one round of status effect processing.
    pub fn tick_status_effects(&mut self) -> TickReport {
        if self.is_defeated() {
            return TickReport::default();
        }
        self.status.tick(&mut self.vitals)
    }

    pub fn has_status(&self, kind: StatusEffectKind) -> bool {
        self.status.has(kind)
    }

    // ========================================================================
    // Derived combat values
    // ========================================================================

    /// Attribute score after status modifiers.
    pub fn effective_attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.get(attribute) + self.status.attribute_modifier(attribute)
    }

    pub fn attribute_bonus(&self, attribute: Attribute) -> i32 {
        stats::attribute_bonus(self.effective_attribute(attribute))
    }

    pub fn accuracy(&self) -> i32 {
        stats::accuracy(
            self.effective_attribute(Attribute::Dex),
            self.status.accuracy_modifier(),
        )
    }

    pub fn evasion(&self) -> i32 {
        stats::evasion(
            self.effective_attribute(Attribute::Dex),
            self.status.evasion_modifier(),
        )
    }

    pub fn initiative(&self) -> i32 {
        stats::initiative(
            self.effective_attribute(Attribute::Dex),
            self.status.initiative_modifier(),
        )
    }

    pub fn effective_armor(&self) -> i32 {
        (self.armor + self.status.armor_modifier()).max(0)
    }

    pub fn effective_magic_resist(&self) -> i32 {
        (self.magic_resist + self.status.magic_resist_modifier()).max(0)
    }

    /// Defense that applies to the given damage type.
    pub fn defense_against(&self, damage_type: DamageType) -> i32 {
        if damage_type.uses_armor() {
            self.effective_armor()
        } else {
            self.effective_magic_resist()
        }
    }

    // ========================================================================
    // Progression
    // ========================================================================

    /// Add experience, levelling up as many times as the total allows.
    ///
    /// Each level-up carries the remainder over, recomputes the threshold and
    /// fully restores health and all resources. Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u32, tables: &(impl TablesOracle + ?Sized)) -> u32 {
        if self.is_defeated() {
            return 0;
        }

        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        while self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level_up(tables);
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self, tables: &(impl TablesOracle + ?Sized)) {
        self.level += 1;
        self.xp_to_next = stats::xp_to_next_level(self.level, tables);

        let max_hp = stats::max_health(self.base_health, self.attributes.con, tables);
        self.vitals.reset_to(max_hp);
        self.resources.refill_all();

        tracing::debug!(
            "{} reached level {} (next at {} xp)",
            self.name,
            self.level,
            self.xp_to_next
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BalanceTables, CombatantTemplate};
    use crate::stats::ResourceMaximums;

    fn fighter() -> CombatantState {
        CombatantTemplate::builder("fighter")
            .attributes(Attributes::new(14, 12, 8, 12, 10))
            .base_health(40)
            .resources(ResourceMaximums {
                mana: 0,
                stamina: 30,
                energy: 0,
            })
            .armor(2)
            .build()
            .spawn(CombatantId(0), Team::Heroes, None, &BalanceTables::default())
    }

    #[test]
    fn health_stays_within_bounds() {
        let mut unit = fighter();
        // 40 + 12 × 5 = 100
        assert_eq!(unit.max_hp(), 100);

        for amount in [0, 7, 1_000, 3, u32::MAX] {
            unit.heal(amount);
            assert!(unit.hp() <= unit.max_hp());
            unit.take_damage(amount);
            assert!(unit.hp() <= unit.max_hp());
        }
        assert!(unit.is_defeated());
        assert_eq!(unit.heal(50), 0);
        assert_eq!(unit.hp(), 0);
    }

    #[test]
    fn defeated_combatant_cannot_pay_or_act() {
        let mut unit = fighter();
        assert!(unit.can_afford(ResourceKind::Stamina, 10));
        unit.take_damage(1_000);
        assert!(!unit.can_act());
        assert!(!unit.can_afford(ResourceKind::Stamina, 10));
        assert!(!unit.pay(ResourceKind::Stamina, 10));
        assert_eq!(unit.resources.get(ResourceKind::Stamina).current(), 30);
    }

    #[test]
    fn pay_fails_without_mutation_when_unaffordable() {
        let mut unit = fighter();
        assert!(unit.pay(ResourceKind::Stamina, 25));
        assert!(!unit.pay(ResourceKind::Stamina, 10));
        assert_eq!(unit.resources.get(ResourceKind::Stamina).current(), 5);
        // No mana pool at all
        assert!(!unit.can_afford(ResourceKind::Mana, 1));
    }

    #[test]
    fn stun_prevents_action() {
        let mut unit = fighter();
        unit.status.apply(StatusEffectKind::Stunned, 1, 1, None);
        assert!(!unit.can_act());
        unit.tick_status_effects();
        assert!(unit.can_act());
    }

    #[test]
    fn shield_absorbs_before_health() {
        let mut unit = fighter();
        unit.status.apply(StatusEffectKind::Shielded, 2, 8, None);
        let receipt = unit.take_damage(10);
        assert_eq!(receipt, DamageReceipt { absorbed: 8, dealt: 2 });
        assert_eq!(unit.hp(), 98);
    }

    #[test]
    fn level_up_carries_over_xp_and_restores_everything() {
        let tables = BalanceTables::default();
        let mut unit = fighter();
        unit.take_damage(60);
        unit.pay(ResourceKind::Stamina, 20);
        unit.xp = 120;
        assert_eq!(unit.xp_to_next, 100);

        // 120 ≥ 100: level 2, 20 left over, next threshold ceil(100 × 1.5) = 150
        assert_eq!(unit.gain_experience(0, &tables), 1);
        assert_eq!(unit.level, 2);
        assert_eq!(unit.xp, 20);
        assert_eq!(unit.xp_to_next, 150);
        assert_eq!(unit.hp(), unit.max_hp());
        assert_eq!(unit.resources.get(ResourceKind::Stamina).current(), 30);
    }

    #[test]
    fn large_xp_award_triggers_sequential_level_ups() {
        let tables = BalanceTables::default();
        let mut unit = fighter();
        // 100 (1→2) + 150 (2→3) = 250, 10 left over
        assert_eq!(unit.gain_experience(260, &tables), 2);
        assert_eq!(unit.level, 3);
        assert_eq!(unit.xp, 10);
        assert_eq!(unit.xp_to_next, 225);
    }

    #[test]
    fn weakened_lowers_effective_strength_bonus() {
        let mut unit = fighter();
        assert_eq!(unit.attribute_bonus(Attribute::Str), 2);
        unit.status.apply(StatusEffectKind::Weakened, 2, 4, None);
        assert_eq!(unit.effective_attribute(Attribute::Str), 10);
        assert_eq!(unit.attribute_bonus(Attribute::Str), 0);
    }

    #[test]
    fn defense_depends_on_damage_type() {
        let mut unit = fighter();
        unit.magic_resist = 5;
        unit.status.apply(StatusEffectKind::DefenseUp, 2, 1, None);
        assert_eq!(unit.defense_against(DamageType::Physical), 3);
        assert_eq!(unit.defense_against(DamageType::Holy), 6);
    }
}
