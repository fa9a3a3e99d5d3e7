//! Human-readable combat log lines.
use std::fmt::Write;

use combat_core::{ActionFailure, AttackOutcome, CombatActionResult, CombatantId, Roster};

fn name(roster: &Roster, id: CombatantId) -> &str {
    roster.get(id).map_or("someone", |unit| unit.name.as_str())
}

/// One line per skill use, e.g. `Warrior uses power_strike: Goblin takes 9 (critical), defeated`.
pub fn describe(result: &CombatActionResult, roster: &Roster) -> String {
    let actor = name(roster, result.actor);

    if let Some(failure) = result.failure {
        let reason = match failure {
            ActionFailure::ActorDefeated => "is down".to_owned(),
            ActionFailure::TargetDefeated => {
                format!("has no target, {} is already down", name(roster, result.target))
            }
            ActionFailure::InsufficientResource {
                kind,
                required,
                available,
            } => format!("lacks {kind} ({available}/{required})"),
        };
        return format!("{actor} tries {} but {reason}", result.skill_id);
    }

    let mut line = format!("{actor} uses {}", result.skill_id);
    for (i, outcome) in result.targets.iter().enumerate() {
        line.push_str(if i == 0 { ": " } else { "; " });
        let target = name(roster, outcome.target);
        if outcome.outcome == AttackOutcome::Miss {
            let _ = write!(line, "misses {target}");
            continue;
        }

        let _ = write!(line, "{target}");
        if outcome.damage > 0 || outcome.absorbed > 0 {
            let _ = write!(line, " takes {}", outcome.damage);
            if outcome.absorbed > 0 {
                let _ = write!(line, " ({} absorbed)", outcome.absorbed);
            }
        }
        if outcome.healing > 0 {
            let _ = write!(line, " heals {}", outcome.healing);
        }
        if outcome.outcome == AttackOutcome::Critical {
            line.push_str(" (critical)");
        }
        for effect in &outcome.applied_effects {
            let _ = write!(line, " +{effect}");
        }
        if outcome.defeated {
            line.push_str(", defeated");
        }
    }

    if result.levels_gained > 0 {
        let _ = write!(line, " [{actor} +{} level]", result.levels_gained);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        BalanceTables, CombatantTemplate, ResourceKind, StatusEffectKind, TargetOutcome, Team,
    };

    fn roster() -> Roster {
        let mut roster = Roster::new();
        for (id, team) in [("Warrior", Team::Heroes), ("Goblin", Team::Opponents)] {
            let unit = CombatantTemplate::builder(id)
                .name(id)
                .build()
                .spawn(roster.next_id(), team, None, &BalanceTables::default());
            roster.push(unit);
        }
        roster
    }

    #[test]
    fn hits_list_damage_effects_and_kills() {
        let roster = roster();
        let mut result = CombatActionResult::new(CombatantId(0), CombatantId(1), "shield_bash");
        result.targets.push(TargetOutcome {
            outcome: AttackOutcome::Critical,
            damage: 9,
            applied_effects: vec![StatusEffectKind::Stunned],
            defeated: true,
            ..TargetOutcome::missed(CombatantId(1))
        });

        assert_eq!(
            describe(&result, &roster),
            "Warrior uses shield_bash: Goblin takes 9 (critical) +STUNNED, defeated"
        );
    }

    #[test]
    fn misses_and_failures_are_spelled_out() {
        let roster = roster();
        let mut missed = CombatActionResult::new(CombatantId(1), CombatantId(0), "basic_attack_free");
        missed.targets.push(TargetOutcome::missed(CombatantId(0)));
        assert_eq!(
            describe(&missed, &roster),
            "Goblin uses basic_attack_free: misses Warrior"
        );

        let broke = CombatActionResult::failed(
            CombatantId(0),
            CombatantId(1),
            "power_strike",
            ActionFailure::InsufficientResource {
                kind: ResourceKind::Stamina,
                required: 10,
                available: 4,
            },
        );
        assert_eq!(
            describe(&broke, &roster),
            "Warrior tries power_strike but lacks STAMINA (4/10)"
        );
    }
}
