//! Status effect system for combatants.
//!
//! Status effects are timed conditions that deal periodic damage, shift derived
//! stats, absorb damage or prevent action. Each kind maps to exactly one
//! [`EffectDescriptor`], so adding a kind means adding one match arm here.
//!
//! # Round-based Duration
//!
//! Effects store the number of whole rounds they have left. [`StatusEffects::tick`]
//! runs once per round after every participant has acted; an effect whose
//! duration reaches zero is removed by that same tick.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::stats::Attribute;

use super::{CombatantId, Vitals};

/// Types of status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString, strum::Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StatusEffectKind {
    // ========================================================================
    // Damage over time (ignores armor)
    // ========================================================================
    Burning,
    Poisoned,

    // ========================================================================
    // Crowd control
    // ========================================================================
    /// Cannot act at all.
    Stunned,
    /// Initiative and evasion reduced.
    Slowed,

    // ========================================================================
    // Debuffs
    // ========================================================================
    /// Strength reduced.
    Weakened,
    AccuracyDown,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// Absorbs damage before health.
    Shielded,
    InitiativeUp,
    /// Armor and magic resist increased.
    DefenseUp,
}

/// Stat a modifier effect shifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifiedStat {
    Attribute(Attribute),
    Armor,
    MagicResist,
    Accuracy,
    Evasion,
    Initiative,
}

/// Signed change to one stat per point of potency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatShift {
    pub stat: ModifiedStat,
    pub per_potency: i32,
}

impl StatShift {
    pub const fn new(stat: ModifiedStat, per_potency: i32) -> Self {
        Self { stat, per_potency }
    }
}

/// What an effect kind does, one variant per behavior family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectDescriptor {
    /// Deals `potency` damage to its owner each tick, ignoring defenses.
    DamageOverTime,
    /// Shifts derived stats while active.
    AttributeModifier { shifts: &'static [StatShift] },
    /// Owner cannot act while active.
    ActionPreventing,
    /// Absorbs up to `potency` damage before health is touched.
    ResourceShield,
}

const SLOWED_SHIFTS: &[StatShift] = &[
    StatShift::new(ModifiedStat::Initiative, -5),
    StatShift::new(ModifiedStat::Evasion, -1),
];
const WEAKENED_SHIFTS: &[StatShift] = &[StatShift::new(ModifiedStat::Attribute(Attribute::Str), -1)];
const ACCURACY_DOWN_SHIFTS: &[StatShift] = &[StatShift::new(ModifiedStat::Accuracy, -1)];
const INITIATIVE_UP_SHIFTS: &[StatShift] = &[StatShift::new(ModifiedStat::Initiative, 1)];
const DEFENSE_UP_SHIFTS: &[StatShift] = &[
    StatShift::new(ModifiedStat::Armor, 1),
    StatShift::new(ModifiedStat::MagicResist, 1),
];

impl StatusEffectKind {
    /// All kinds in canonical encoding order.
    pub const ALL: [StatusEffectKind; 9] = [
        Self::Burning,
        Self::Poisoned,
        Self::Stunned,
        Self::Slowed,
        Self::Weakened,
        Self::AccuracyDown,
        Self::Shielded,
        Self::InitiativeUp,
        Self::DefenseUp,
    ];

    pub const fn descriptor(self) -> EffectDescriptor {
        match self {
            Self::Burning | Self::Poisoned => EffectDescriptor::DamageOverTime,
            Self::Stunned => EffectDescriptor::ActionPreventing,
            Self::Shielded => EffectDescriptor::ResourceShield,
            Self::Slowed => EffectDescriptor::AttributeModifier {
                shifts: SLOWED_SHIFTS,
            },
            Self::Weakened => EffectDescriptor::AttributeModifier {
                shifts: WEAKENED_SHIFTS,
            },
            Self::AccuracyDown => EffectDescriptor::AttributeModifier {
                shifts: ACCURACY_DOWN_SHIFTS,
            },
            Self::InitiativeUp => EffectDescriptor::AttributeModifier {
                shifts: INITIATIVE_UP_SHIFTS,
            },
            Self::DefenseUp => EffectDescriptor::AttributeModifier {
                shifts: DEFENSE_UP_SHIFTS,
            },
        }
    }

    /// Harmful effects are debuffs when applied to enemies.
    pub const fn is_harmful(self) -> bool {
        matches!(
            self,
            Self::Burning
                | Self::Poisoned
                | Self::Stunned
                | Self::Slowed
                | Self::Weakened
                | Self::AccuracyDown
        )
    }
}

/// A single active status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    /// Whole rounds left. Always at least 1 while the effect is stored.
    pub remaining: u32,
    pub potency: i32,
    /// Combatant that applied the effect (attribution only).
    pub source: Option<CombatantId>,
}

/// Result of [`StatusEffects::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Inserted,
    /// Existing effect kept, duration extended to the longer one, potency overwritten.
    Refreshed,
    /// Zero duration: nothing stored.
    Ignored,
}

/// What a tick did to its owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub damage: u32,
    pub absorbed: u32,
    pub expired: Vec<StatusEffectKind>,
    /// Owner was reduced to zero health during this tick.
    pub defeated: bool,
}

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Applies an effect with refresh-or-insert semantics.
    ///
    /// Negative potency is stored as zero.
    pub fn apply(
        &mut self,
        kind: StatusEffectKind,
        duration: u32,
        potency: i32,
        source: Option<CombatantId>,
    ) -> ApplyOutcome {
        if duration == 0 {
            return ApplyOutcome::Ignored;
        }
        let potency = potency.max(0);

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining = existing.remaining.max(duration);
            existing.potency = potency;
            existing.source = source;
            return ApplyOutcome::Refreshed;
        }

        match self.effects.try_push(StatusEffect {
            kind,
            remaining: duration,
            potency,
            source,
        }) {
            Ok(()) => ApplyOutcome::Inserted,
            Err(_) => ApplyOutcome::Ignored,
        }
    }

    /// Removes a status effect immediately. Returns true if it was active.
    pub fn remove(&mut self, kind: StatusEffectKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Runs one round of effect processing against the owner's vitals.
    ///
    /// Effects are processed in application order. Periodic damage is applied
    /// first (shield absorbs it), then the duration drops by one. Processing
    /// stops as soon as the owner is defeated. Effects at zero duration are
    /// removed before returning.
    pub fn tick(&mut self, vitals: &mut Vitals) -> TickReport {
        let mut report = TickReport::default();

        for index in 0..self.effects.len() {
            let effect = self.effects[index];

            if let EffectDescriptor::DamageOverTime = effect.kind.descriptor() {
                let amount = effect.potency.max(0) as u32;
                let absorbed = self.absorb_without_pruning(amount);
                report.absorbed += absorbed;
                report.damage += vitals.lose(amount - absorbed);

                if vitals.is_defeated() {
                    report.defeated = true;
                    break;
                }
            }

            let remaining = &mut self.effects[index].remaining;
            *remaining = remaining.saturating_sub(1);
        }

        self.effects.retain(|e| {
            if e.remaining == 0 {
                report.expired.push(e.kind);
                false
            } else {
                true
            }
        });
        self.prune_depleted_shields(&mut report.expired);

        report
    }

    /// Absorbs incoming damage with an active shield. Returns the absorbed amount.
    ///
    /// A shield drained to zero is removed.
    pub fn absorb(&mut self, damage: u32) -> u32 {
        let absorbed = self.absorb_without_pruning(damage);
        let mut removed = Vec::new();
        self.prune_depleted_shields(&mut removed);
        absorbed
    }

    fn absorb_without_pruning(&mut self, damage: u32) -> u32 {
        let Some(shield) = self
            .effects
            .iter_mut()
            .find(|e| matches!(e.kind.descriptor(), EffectDescriptor::ResourceShield))
        else {
            return 0;
        };

        let absorbed = damage.min(shield.potency.max(0) as u32);
        shield.potency -= absorbed as i32;
        absorbed
    }

    fn prune_depleted_shields(&mut self, removed: &mut Vec<StatusEffectKind>) {
        self.effects.retain(|e| {
            let depleted = matches!(e.kind.descriptor(), EffectDescriptor::ResourceShield)
                && e.potency <= 0;
            if depleted {
                removed.push(e.kind);
            }
            !depleted
        });
    }

    // ========================================================================
    // Modifier queries
    // ========================================================================

    /// Sum of all active shifts to `stat`.
    pub fn modifier(&self, stat: ModifiedStat) -> i32 {
        self.effects
            .iter()
            .filter_map(|e| match e.kind.descriptor() {
                EffectDescriptor::AttributeModifier { shifts } => Some((shifts, e.potency)),
                _ => None,
            })
            .flat_map(|(shifts, potency)| {
                shifts
                    .iter()
                    .filter(move |shift| shift.stat == stat)
                    .map(move |shift| shift.per_potency * potency)
            })
            .sum()
    }

    pub fn attribute_modifier(&self, attribute: Attribute) -> i32 {
        self.modifier(ModifiedStat::Attribute(attribute))
    }

    pub fn armor_modifier(&self) -> i32 {
        self.modifier(ModifiedStat::Armor)
    }

    pub fn magic_resist_modifier(&self) -> i32 {
        self.modifier(ModifiedStat::MagicResist)
    }

    pub fn accuracy_modifier(&self) -> i32 {
        self.modifier(ModifiedStat::Accuracy)
    }

    pub fn evasion_modifier(&self) -> i32 {
        self.modifier(ModifiedStat::Evasion)
    }

    pub fn initiative_modifier(&self) -> i32 {
        self.modifier(ModifiedStat::Initiative)
    }

    /// True while any action-preventing effect is active.
    pub fn prevents_action(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.kind.descriptor(), EffectDescriptor::ActionPreventing))
    }

    /// Remaining shield capacity.
    pub fn shield_points(&self) -> u32 {
        self.effects
            .iter()
            .filter(|e| matches!(e.kind.descriptor(), EffectDescriptor::ResourceShield))
            .map(|e| e.potency.max(0) as u32)
            .sum()
    }

    /// Returns an iterator over all active effects.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
