//! Attribute model - pure formulas from raw values to combat numbers.
//!
//! Every function here is side-effect free. Rounding direction is part of the
//! contract: bonuses and damage round toward negative infinity, the experience
//! curve rounds up.
//!
//! # Formulas
//!
//! ```text
//! attribute_bonus  = floor((value - 10) / 2)
//! max_health       = max(1, base_health + CON × con_hp_factor)
//! damage_reduction = max(minimum, raw_damage - defense)
//! hit_chance       = clamp(base + acc × acc_factor - eva × eva_factor, min, max)
//! xp_to_next_level = max(1, ceil(xp_base × xp_factor^(level - 1)))
//! initiative       = attribute_bonus(DEX) + modifiers
//! ```

use crate::env::TablesOracle;

/// Bonus (or penalty) granted by an attribute score.
///
/// Uses floor division, so odd scores below 10 round down: 9 → -1, 8 → -1, 7 → -2.
pub const fn attribute_bonus(value: i32) -> i32 {
    (value - 10).div_euclid(2)
}

/// Maximum health from template base health and constitution. Never below 1.
pub fn max_health(
    base_health: i32,
    constitution: i32,
    tables: &(impl TablesOracle + ?Sized),
) -> u32 {
    let factor = tables.progression().con_hp_factor;
    (base_health + constitution * factor).max(1) as u32
}

/// Damage left after flat subtraction of armor or magic resist.
///
/// The configured minimum applies even when defense exceeds the raw damage.
pub fn damage_reduction(raw_damage: i32, defense: i32, tables: &(impl TablesOracle + ?Sized)) -> u32 {
    let minimum = tables.combat().damage.minimum as i32;
    (raw_damage - defense).max(minimum).max(0) as u32
}

/// Hit chance in percent from attacker accuracy and defender evasion modifiers.
pub fn hit_chance(
    accuracy: i32,
    evasion: i32,
    tables: &(impl TablesOracle + ?Sized),
) -> u32 {
    let params = tables.combat().hit_chance;

    let chance =
        params.base + accuracy * params.accuracy_factor - evasion * params.evasion_factor;

    chance.clamp(params.min as i32, params.max as i32) as u32
}

/// Fixed hit chance declared by a skill, still bounded by the configured range.
pub fn hit_chance_override(chance: u32, tables: &(impl TablesOracle + ?Sized)) -> u32 {
    let params = tables.combat().hit_chance;
    chance.clamp(params.min, params.max)
}

/// Experience required to advance from `level` to `level + 1`.
pub fn xp_to_next_level(level: u32, tables: &(impl TablesOracle + ?Sized)) -> u32 {
    let params = tables.progression();
    let exponent = level.max(1) - 1;
    let required = params.xp_base as f64 * params.xp_factor.powi(exponent as i32);
    (required.ceil() as u32).max(1)
}

/// Accuracy modifier: dexterity bonus plus status adjustments.
pub const fn accuracy(dexterity: i32, modifier: i32) -> i32 {
    attribute_bonus(dexterity) + modifier
}

/// Evasion modifier: dexterity bonus plus status adjustments.
pub const fn evasion(dexterity: i32, modifier: i32) -> i32 {
    attribute_bonus(dexterity) + modifier
}

/// Initiative used for turn order: dexterity bonus plus status adjustments.
pub const fn initiative(dexterity: i32, modifier: i32) -> i32 {
    attribute_bonus(dexterity) + modifier
}

/// Apply a fractional multiplier and floor the result.
pub fn scale_floor(value: i32, multiplier: f64) -> i32 {
    (value as f64 * multiplier).floor() as i32
}
