//! Melee brawler: hit the weakest enemy with the hardest-hitting skill.

use combat_core::{RngOracle, RollContext, SkillTraits, TablesOracle};

use super::{DecisionContext, NpcDecision};

pub(super) fn decide<T, R>(ctx: &DecisionContext<'_, T, R>) -> Option<NpcDecision>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let enemies = ctx.enemies();
    let target = ctx.biased_target(&enemies)?;

    let offensive = ctx.skills_with(SkillTraits::OFFENSIVE);
    let skill = if offensive.is_empty() {
        ctx.pick(&ctx.skills, RollContext::NpcSkill)?
    } else if ctx.chance(ctx.config.best_skill_percent) {
        ctx.best_damage(&offensive)?
    } else {
        ctx.pick(&offensive, RollContext::NpcSkill)?
    };

    ctx.decision(skill, Some(target))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use combat_core::{
        BalanceTables, CombatantId, CombatantTemplate, DamageEffect, DamageType, PcgRng,
        RollSeed, Roster, SkillDefinition, SkillEffect, TargetType, Team,
    };

    use super::*;
    use crate::ai::AiConfig;

    fn skill(id: &str, base: i32) -> SkillDefinition {
        SkillDefinition::new(id, TargetType::EnemySingle)
            .with_effect(SkillEffect::Damage(DamageEffect::new(DamageType::Physical, Some(base))))
    }

    fn add(roster: &mut Roster, team: Team, base_health: i32) -> CombatantId {
        let unit = CombatantTemplate::builder("unit")
            .base_health(base_health)
            .build()
            .spawn(roster.next_id(), team, None, &BalanceTables::default());
        roster.push(unit)
    }

    #[test]
    fn always_weakest_and_best_when_certain() {
        let tables = BalanceTables::default();
        let mut roster = Roster::new();
        let me = add(&mut roster, Team::Opponents, 50);
        let healthy = add(&mut roster, Team::Heroes, 50);
        let hurt = add(&mut roster, Team::Heroes, 50);
        if let Some(unit) = roster.get_mut(hurt) {
            unit.take_damage(60);
        }

        let jab = skill("jab", 2);
        let smash = skill("smash", 9);
        let config = AiConfig {
            weakest_target_percent: 100,
            best_skill_percent: 100,
            ..AiConfig::default()
        };

        for game_seed in 0..20 {
            let ctx = DecisionContext {
                actor: roster.get(me).unwrap(),
                roster: &roster,
                skills: vec![&jab, &smash],
                tables: &tables,
                rng: &PcgRng,
                seed: RollSeed::new(game_seed, 0),
                config: &config,
                rolls: Cell::new(0),
            };
            let decision = decide(&ctx).unwrap();
            assert_eq!(decision.target, hurt);
            assert_eq!(decision.skill_id, "smash");
            assert_ne!(decision.target, healthy);
        }
    }

    #[test]
    fn no_enemies_means_no_action() {
        let tables = BalanceTables::default();
        let mut roster = Roster::new();
        let me = add(&mut roster, Team::Opponents, 50);
        let jab = skill("jab", 2);
        let config = AiConfig::default();

        let ctx = DecisionContext {
            actor: roster.get(me).unwrap(),
            roster: &roster,
            skills: vec![&jab],
            tables: &tables,
            rng: &PcgRng,
            seed: RollSeed::new(1, 0),
            config: &config,
            rolls: Cell::new(0),
        };
        assert_eq!(decide(&ctx), None);
    }

    #[test]
    fn falls_back_to_any_usable_skill() {
        let tables = BalanceTables::default();
        let mut roster = Roster::new();
        let me = add(&mut roster, Team::Opponents, 50);
        add(&mut roster, Team::Heroes, 50);
        let guard = SkillDefinition::new("guard", TargetType::SelfOnly).applying(
            combat_core::AppliedEffect::new(combat_core::StatusEffectKind::DefenseUp, 2, 3),
        );
        let config = AiConfig::default();

        let ctx = DecisionContext {
            actor: roster.get(me).unwrap(),
            roster: &roster,
            skills: vec![&guard],
            tables: &tables,
            rng: &PcgRng,
            seed: RollSeed::new(5, 0),
            config: &config,
            rolls: Cell::new(0),
        };
        let decision = decide(&ctx).unwrap();
        assert_eq!(decision.skill_id, "guard");
        assert_eq!(decision.target, me);
    }
}
