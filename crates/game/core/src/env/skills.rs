//! Skill definitions and classification.
//!
//! Skills are immutable content data. The resolver and the NPC strategies only
//! read them; nothing at runtime mutates a definition.

use crate::combat::DamageType;
use crate::state::{CombatantState, StatusEffectKind};
use crate::stats::{Attribute, ResourceKind, scale_floor};

use super::TablesOracle;

#[cfg(feature = "serde")]
fn one() -> f64 {
    1.0
}

#[cfg(feature = "serde")]
fn always() -> u32 {
    100
}

// ============================================================================
// Cost & targeting
// ============================================================================

/// Resource price of one use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillCost {
    /// `None` means the skill is free regardless of `amount`.
    pub resource: Option<ResourceKind>,
    pub amount: u32,
}

impl SkillCost {
    pub const FREE: Self = Self {
        resource: None,
        amount: 0,
    };

    pub const fn new(resource: ResourceKind, amount: u32) -> Self {
        Self {
            resource: Some(resource),
            amount,
        }
    }

    /// The pool and amount to pay, or `None` for free skills.
    pub const fn requirement(&self) -> Option<(ResourceKind, u32)> {
        match self.resource {
            Some(kind) if self.amount > 0 => Some((kind, self.amount)),
            _ => None,
        }
    }

    pub const fn is_free(&self) -> bool {
        self.requirement().is_none()
    }
}

/// Who a skill may be aimed at, and whether it spreads to the whole side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetType {
    #[strum(serialize = "SELF")]
    #[cfg_attr(feature = "serde", serde(rename = "SELF"))]
    SelfOnly,
    #[strum(serialize = "ALLY_SINGLE")]
    #[cfg_attr(feature = "serde", serde(rename = "ALLY_SINGLE"))]
    AllySingle,
    #[strum(serialize = "ALLY_ALL")]
    #[cfg_attr(feature = "serde", serde(rename = "ALLY_ALL"))]
    AllyAll,
    #[strum(serialize = "ENEMY_SINGLE")]
    #[cfg_attr(feature = "serde", serde(rename = "ENEMY_SINGLE"))]
    EnemySingle,
    #[strum(serialize = "ENEMY_ALL")]
    #[cfg_attr(feature = "serde", serde(rename = "ENEMY_ALL"))]
    EnemyAll,
}

impl TargetType {
    /// Aimed at the opposing team.
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::EnemySingle | Self::EnemyAll)
    }

    pub const fn is_area(self) -> bool {
        matches!(self, Self::AllyAll | Self::EnemyAll)
    }

    pub const fn is_self_only(self) -> bool {
        matches!(self, Self::SelfOnly)
    }
}

// ============================================================================
// Effects
// ============================================================================

/// Extra multiplier against targets carrying a tag (e.g., holy versus undead).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagBonus {
    pub tag: String,
    pub multiplier: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEffect {
    pub damage_type: DamageType,
    /// `None` falls back to the configured weapon damage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_damage: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling_attribute: Option<Attribute>,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub multiplier: f64,
    /// Percent of the target's defense ignored.
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor_penetration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonus_vs_tag: Option<TagBonus>,
    /// Percent chance of a critical hit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub crit_chance: u32,
}

impl DamageEffect {
    pub fn new(damage_type: DamageType, base_damage: Option<i32>) -> Self {
        Self {
            damage_type,
            base_damage,
            scaling_attribute: None,
            multiplier: 1.0,
            armor_penetration: 0,
            bonus_vs_tag: None,
            crit_chance: 0,
        }
    }

    pub fn scaling(mut self, attribute: Attribute, multiplier: f64) -> Self {
        self.scaling_attribute = Some(attribute);
        self.multiplier = multiplier;
        self
    }

    pub fn with_crit_chance(mut self, percent: u32) -> Self {
        self.crit_chance = percent;
        self
    }

    pub fn with_armor_penetration(mut self, percent: u32) -> Self {
        self.armor_penetration = percent;
        self
    }

    pub fn with_bonus_vs(mut self, tag: impl Into<String>, multiplier: f64) -> Self {
        self.bonus_vs_tag = Some(TagBonus {
            tag: tag.into(),
            multiplier,
        });
        self
    }

    /// Damage before defenses, criticals and tag bonuses.
    ///
    /// ```text
    /// raw = floor((base + attribute_bonus(scaling)) × multiplier)
    /// ```
    pub fn raw_damage(&self, actor: &CombatantState, tables: &(impl TablesOracle + ?Sized)) -> i32 {
        let base = self
            .base_damage
            .unwrap_or(tables.combat().damage.default_weapon_damage);
        let bonus = self
            .scaling_attribute
            .map_or(0, |attribute| actor.attribute_bonus(attribute));
        scale_floor(base + bonus, self.multiplier)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealEffect {
    pub base_heal: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling_attribute: Option<Attribute>,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub multiplier: f64,
}

impl HealEffect {
    pub fn new(base_heal: i32) -> Self {
        Self {
            base_heal,
            scaling_attribute: None,
            multiplier: 1.0,
        }
    }

    pub fn scaling(mut self, attribute: Attribute, multiplier: f64) -> Self {
        self.scaling_attribute = Some(attribute);
        self.multiplier = multiplier;
        self
    }

    /// `max(0, floor((base_heal + attribute_bonus(scaling)) × multiplier))`
    pub fn amount(&self, actor: &CombatantState) -> u32 {
        let bonus = self
            .scaling_attribute
            .map_or(0, |attribute| actor.attribute_bonus(attribute));
        scale_floor(self.base_heal + bonus, self.multiplier).max(0) as u32
    }
}

/// Direct effect of a skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    Damage(DamageEffect),
    Heal(HealEffect),
}

/// Status effect a skill applies on a successful use.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedEffect {
    pub effect: StatusEffectKind,
    pub duration: u32,
    pub potency: i32,
    /// Percent chance to apply.
    #[cfg_attr(feature = "serde", serde(default = "always"))]
    pub chance: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling_attribute: Option<Attribute>,
    /// Potency added per point of the caster's scaling attribute bonus.
    #[cfg_attr(feature = "serde", serde(default))]
    pub potency_per_bonus: f64,
}

impl AppliedEffect {
    pub fn new(effect: StatusEffectKind, duration: u32, potency: i32) -> Self {
        Self {
            effect,
            duration,
            potency,
            chance: 100,
            scaling_attribute: None,
            potency_per_bonus: 0.0,
        }
    }

    pub fn with_chance(mut self, percent: u32) -> Self {
        self.chance = percent;
        self
    }

    pub fn scaling(mut self, attribute: Attribute, potency_per_bonus: f64) -> Self {
        self.scaling_attribute = Some(attribute);
        self.potency_per_bonus = potency_per_bonus;
        self
    }

    /// Potency after caster scaling, never negative.
    pub fn scaled_potency(&self, actor: &CombatantState) -> i32 {
        let bonus = self
            .scaling_attribute
            .map_or(0, |attribute| actor.attribute_bonus(attribute));
        (self.potency + scale_floor(bonus, self.potency_per_bonus)).max(0)
    }
}

// ============================================================================
// Skill definition
// ============================================================================

bitflags::bitflags! {
    /// Coarse classification used by NPC strategies.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SkillTraits: u8 {
        /// Deals damage to enemies.
        const OFFENSIVE = 1 << 0;
        /// Restores health.
        const HEAL = 1 << 1;
        /// Applies a beneficial effect to self or allies.
        const BUFF = 1 << 2;
        /// Applies a harmful effect to enemies.
        const DEBUFF = 1 << 3;
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: SkillCost,
    pub target_type: TargetType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<SkillEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub applies: Vec<AppliedEffect>,
    /// Fixed hit chance in percent, replacing the accuracy/evasion formula.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hit_chance: Option<u32>,
}

impl SkillDefinition {
    pub fn new(id: impl Into<String>, target_type: TargetType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            cost: SkillCost::FREE,
            target_type,
            effects: Vec::new(),
            applies: Vec::new(),
            hit_chance: None,
        }
    }

    pub fn with_cost(mut self, resource: ResourceKind, amount: u32) -> Self {
        self.cost = SkillCost::new(resource, amount);
        self
    }

    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn applying(mut self, effect: AppliedEffect) -> Self {
        self.applies.push(effect);
        self
    }

    pub fn with_hit_chance(mut self, percent: u32) -> Self {
        self.hit_chance = Some(percent);
        self
    }

    /// First effect classified as damage.
    pub fn damage_effect(&self) -> Option<&DamageEffect> {
        self.effects.iter().find_map(|effect| match effect {
            SkillEffect::Damage(damage) => Some(damage),
            SkillEffect::Heal(_) => None,
        })
    }

    /// First effect classified as healing.
    pub fn heal_effect(&self) -> Option<&HealEffect> {
        self.effects.iter().find_map(|effect| match effect {
            SkillEffect::Heal(heal) => Some(heal),
            SkillEffect::Damage(_) => None,
        })
    }

    /// True when the skill would do nothing at all.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.applies.is_empty()
    }

    pub fn harmful_effects(&self) -> impl Iterator<Item = StatusEffectKind> + '_ {
        self.applies
            .iter()
            .map(|applied| applied.effect)
            .filter(|kind| kind.is_harmful())
    }

    pub fn traits(&self) -> SkillTraits {
        let hostile = self.target_type.is_hostile();
        let mut traits = SkillTraits::empty();

        if hostile && self.damage_effect().is_some() {
            traits |= SkillTraits::OFFENSIVE;
        }
        if self.heal_effect().is_some() {
            traits |= SkillTraits::HEAL;
        }
        if hostile && self.harmful_effects().next().is_some() {
            traits |= SkillTraits::DEBUFF;
        }
        if !hostile && self.applies.iter().any(|a| !a.effect.is_harmful()) {
            traits |= SkillTraits::BUFF;
        }
        traits
    }

    /// Whether `actor` can pay for one use right now.
    pub fn is_affordable_by(&self, actor: &CombatantState) -> bool {
        match self.cost.requirement() {
            Some((kind, amount)) => actor.can_afford(kind, amount),
            None => actor.is_alive(),
        }
    }

    /// Damage this skill would deal before defenses (0 for non-damaging skills).
    pub fn expected_damage(
        &self,
        actor: &CombatantState,
        tables: &(impl TablesOracle + ?Sized),
    ) -> i32 {
        self.damage_effect()
            .map_or(0, |damage| damage.raw_damage(actor, tables))
    }
}
