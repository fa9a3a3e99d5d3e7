//! Damage typing and mitigation.

use crate::env::TablesOracle;
use crate::stats::{damage_reduction, scale_floor};

// ============================================================================
// Damage Type
// ============================================================================

/// Damage type, deciding which defensive stat applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum DamageType {
    /// Weapons and claws. Reduced by armor.
    Physical,
    /// Spells. Reduced by magic resist.
    Magical,
    Holy,
    Dark,
}

impl DamageType {
    /// Only physical damage is reduced by armor; every other type uses magic resist.
    pub const fn uses_armor(self) -> bool {
        matches!(self, Self::Physical)
    }
}

// ============================================================================
// Mitigation
// ============================================================================

/// Final damage after penetration and flat defense subtraction.
///
/// # Formula
///
/// ```text
/// effective_defense = defense - floor(defense × penetration% / 100)
/// final             = max(minimum, raw - effective_defense)
/// ```
pub fn mitigate(
    raw_damage: i32,
    defense: i32,
    armor_penetration: u32,
    tables: &(impl TablesOracle + ?Sized),
) -> u32 {
    let defense = defense.max(0);
    let ignored = defense * armor_penetration.min(100) as i32 / 100;
    damage_reduction(raw_damage, defense - ignored, tables)
}

/// Raw damage scaled by the configured critical multiplier, floored.
pub fn critical_damage(raw_damage: i32, tables: &(impl TablesOracle + ?Sized)) -> i32 {
    scale_floor(raw_damage, tables.combat().damage.crit_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::BalanceTables;

    #[test]
    fn only_physical_uses_armor() {
        assert!(DamageType::Physical.uses_armor());
        assert!(!DamageType::Magical.uses_armor());
        assert!(!DamageType::Holy.uses_armor());
        assert!(!DamageType::Dark.uses_armor());
        assert_eq!("HOLY".parse::<DamageType>(), Ok(DamageType::Holy));
    }

    #[test]
    fn penetration_ignores_part_of_defense() {
        let tables = BalanceTables::default();
        // 12 - 6 = 6
        assert_eq!(mitigate(12, 6, 0, &tables), 6);
        // 6 × 50% = 3 ignored → 12 - 3 = 9
        assert_eq!(mitigate(12, 6, 50, &tables), 9);
        // penetration above 100% behaves like 100%
        assert_eq!(mitigate(12, 6, 250, &tables), 12);
        // floor still applies
        assert_eq!(mitigate(2, 10, 0, &tables), 1);
    }

    #[test]
    fn critical_uses_table_multiplier() {
        let tables = BalanceTables::default();
        // 7 × 1.5 = 10.5 → 10
        assert_eq!(critical_damage(7, &tables), 10);
    }
}
