//! Hit chance and accuracy checks.

use crate::env::{SkillDefinition, TablesOracle};
use crate::state::CombatantState;
use crate::stats;

/// Hit chance for `skill` from `attacker` against `defender`, in percent.
///
/// A skill-declared chance replaces the accuracy/evasion formula but is still
/// clamped to the configured bounds.
pub fn skill_hit_chance(
    skill: &SkillDefinition,
    attacker: &CombatantState,
    defender: &CombatantState,
    tables: &(impl TablesOracle + ?Sized),
) -> u32 {
    match skill.hit_chance {
        Some(chance) => stats::hit_chance_override(chance, tables),
        None => stats::hit_chance(attacker.accuracy(), defender.evasion(), tables),
    }
}

/// `true` if a d100 `roll` (1-100) lands within `hit_chance`.
pub const fn check_hit(roll: u32, hit_chance: u32) -> bool {
    roll <= hit_chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BalanceTables, CombatantTemplate, TargetType};
    use crate::state::{CombatantId, Team};
    use crate::stats::Attributes;

    fn unit(dex: i32) -> CombatantState {
        CombatantTemplate::builder("unit")
            .attributes(Attributes::new(10, dex, 10, 10, 10))
            .build()
            .spawn(CombatantId(0), Team::Heroes, None, &BalanceTables::default())
    }

    #[test]
    fn formula_and_override() {
        let tables = BalanceTables::default();
        let skill = SkillDefinition::new("jab", TargetType::EnemySingle);
        // 90 + 2×3 - 0×2 = 96 → clamped 95
        assert_eq!(skill_hit_chance(&skill, &unit(14), &unit(10), &tables), 95);
        // 90 + 0 - 3×2 = 84
        assert_eq!(skill_hit_chance(&skill, &unit(10), &unit(16), &tables), 84);

        let sure = skill.clone().with_hit_chance(100);
        assert_eq!(skill_hit_chance(&sure, &unit(10), &unit(20), &tables), 95);
    }

    #[test]
    fn roll_at_chance_hits() {
        assert!(check_hit(84, 84));
        assert!(!check_hit(85, 84));
    }
}
