//! Round-based turn order.

use crate::state::{CombatantId, Roster};

/// Living combatants sorted by current initiative, highest first.
///
/// Recomputed every round, so status effects applied last round already
/// count. Ties keep roster order.
pub fn initiative_order(roster: &Roster) -> Vec<CombatantId> {
    let mut order: Vec<(i32, CombatantId)> = roster
        .living()
        .map(|combatant| (combatant.initiative(), combatant.id))
        .collect();
    // stable sort: equal initiative keeps insertion order
    order.sort_by(|a, b| b.0.cmp(&a.0));
    order.into_iter().map(|(_, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BalanceTables, CombatantTemplate};
    use crate::state::{StatusEffectKind, Team};
    use crate::stats::Attributes;

    fn add(roster: &mut Roster, dex: i32) -> CombatantId {
        let unit = CombatantTemplate::builder("unit")
            .attributes(Attributes::new(10, dex, 10, 10, 10))
            .build()
            .spawn(roster.next_id(), Team::Heroes, None, &BalanceTables::default());
        roster.push(unit)
    }

    #[test]
    fn highest_initiative_first_ties_stable() {
        let mut roster = Roster::new();
        let slow = add(&mut roster, 8);
        let first_tie = add(&mut roster, 12);
        let fast = add(&mut roster, 16);
        let second_tie = add(&mut roster, 13);

        // bonuses: -1, 1, 3, 1
        assert_eq!(
            initiative_order(&roster),
            vec![fast, first_tie, second_tie, slow]
        );
    }

    #[test]
    fn defeated_are_skipped_and_effects_count() {
        let mut roster = Roster::new();
        let a = add(&mut roster, 10);
        let b = add(&mut roster, 10);
        let c = add(&mut roster, 10);
        roster.get_mut(a).unwrap().take_damage(10_000);
        roster
            .get_mut(c)
            .unwrap()
            .status
            .apply(StatusEffectKind::InitiativeUp, 2, 3, None);

        assert_eq!(initiative_order(&roster), vec![c, b]);
    }
}
