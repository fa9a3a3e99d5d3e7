//! Support caster: strict priority of heal, buff, debuff, attack.
//!
//! ```text
//! 1. ally at or below the heal threshold  → best heal on the most injured ally
//! 2. any buff affordable                   → random buff on a random ally
//! 3. debuff with an enemy not yet affected → that debuff on a random such enemy
//! 4. offensive skill affordable            → highest damage on a random enemy
//! 5. otherwise                             → pass
//! ```

use combat_core::{CombatantState, RngOracle, RollContext, SkillTraits, TablesOracle};

use super::{DecisionContext, NpcDecision};

pub(super) fn decide<T, R>(ctx: &DecisionContext<'_, T, R>) -> Option<NpcDecision>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    heal(ctx)
        .or_else(|| buff(ctx))
        .or_else(|| debuff(ctx))
        .or_else(|| attack(ctx))
}

fn heal<T, R>(ctx: &DecisionContext<'_, T, R>) -> Option<NpcDecision>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let threshold = ctx.config.heal_threshold_percent as f32 / 100.0;
    let injured: Vec<_> = ctx
        .allies()
        .into_iter()
        .filter(|ally| ally.health_fraction() <= threshold)
        .collect();
    let patient = ctx.weakest(&injured)?;

    let mut best: Option<(&str, u32)> = None;
    for skill in ctx.skills_with(SkillTraits::HEAL) {
        if skill.target_type.is_hostile()
            || (skill.target_type.is_self_only() && patient.id != ctx.actor.id)
        {
            continue;
        }
        let amount = skill.heal_effect().map_or(0, |heal| heal.amount(ctx.actor));
        if best.is_none_or(|(_, top)| amount > top) {
            best = Some((skill.id.as_str(), amount));
        }
    }

    let (skill_id, _) = best?;
    tracing::debug!(
        "{} heals {} at {:.0}% health",
        ctx.actor.name,
        patient.name,
        patient.health_fraction() * 100.0
    );
    Some(NpcDecision {
        skill_id: skill_id.to_owned(),
        target: patient.id,
    })
}

fn buff<T, R>(ctx: &DecisionContext<'_, T, R>) -> Option<NpcDecision>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let skill = ctx.pick(&ctx.skills_with(SkillTraits::BUFF), RollContext::NpcSkill)?;
    ctx.decision(skill, None)
}

fn debuff<T, R>(ctx: &DecisionContext<'_, T, R>) -> Option<NpcDecision>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let enemies = ctx.enemies();
    for skill in ctx.skills_with(SkillTraits::DEBUFF) {
        let unaffected: Vec<&CombatantState> = enemies
            .iter()
            .copied()
            .filter(|enemy| skill.harmful_effects().any(|kind| !enemy.has_status(kind)))
            .collect();
        if let Some(target) = ctx.pick(&unaffected, RollContext::NpcTarget) {
            return ctx.decision(skill, Some(target));
        }
    }
    None
}

fn attack<T, R>(ctx: &DecisionContext<'_, T, R>) -> Option<NpcDecision>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let skill = ctx.best_damage(&ctx.skills_with(SkillTraits::OFFENSIVE))?;
    ctx.decision(skill, None)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use combat_core::{
        AppliedEffect, BalanceTables, CombatantId, CombatantTemplate, DamageEffect, DamageType,
        HealEffect, PcgRng, RollSeed, Roster, SkillDefinition, SkillEffect, StatusEffectKind,
        TargetType, Team,
    };

    use super::*;
    use crate::ai::AiConfig;

    fn add(roster: &mut Roster, team: Team) -> CombatantId {
        let unit = CombatantTemplate::builder("unit")
            .base_health(50)
            .build()
            .spawn(roster.next_id(), team, None, &BalanceTables::default());
        roster.push(unit)
    }

    fn mend() -> SkillDefinition {
        SkillDefinition::new("mend", TargetType::AllySingle)
            .with_effect(SkillEffect::Heal(HealEffect::new(12)))
    }

    fn bolt() -> SkillDefinition {
        SkillDefinition::new("bolt", TargetType::EnemySingle)
            .with_effect(SkillEffect::Damage(DamageEffect::new(DamageType::Magical, Some(8))))
    }

    fn hex() -> SkillDefinition {
        SkillDefinition::new("hex", TargetType::EnemySingle)
            .applying(AppliedEffect::new(StatusEffectKind::Weakened, 3, 2))
    }

    fn context<'a>(
        roster: &'a Roster,
        me: CombatantId,
        skills: Vec<&'a SkillDefinition>,
        tables: &'a BalanceTables,
        config: &'a AiConfig,
    ) -> DecisionContext<'a, BalanceTables, PcgRng> {
        DecisionContext {
            actor: roster.get(me).unwrap(),
            roster,
            skills,
            tables,
            rng: &PcgRng,
            seed: RollSeed::new(9, 4),
            config,
            rolls: Cell::new(0),
        }
    }

    #[test]
    fn heals_most_injured_ally_first() {
        let tables = BalanceTables::default();
        let config = AiConfig::default();
        let mut roster = Roster::new();
        let me = add(&mut roster, Team::Opponents);
        let scratched = add(&mut roster, Team::Opponents);
        let bleeding = add(&mut roster, Team::Opponents);
        add(&mut roster, Team::Heroes);
        // max hp 100: 55% and 30%
        roster.get_mut(scratched).unwrap().take_damage(45);
        roster.get_mut(bleeding).unwrap().take_damage(70);

        let (mend, bolt, hex) = (mend(), bolt(), hex());
        let ctx = context(&roster, me, vec![&bolt, &hex, &mend], &tables, &config);
        let decision = decide(&ctx).unwrap();
        assert_eq!(decision.skill_id, "mend");
        assert_eq!(decision.target, bleeding);
    }

    #[test]
    fn debuffs_only_unaffected_enemies() {
        let tables = BalanceTables::default();
        let config = AiConfig::default();
        let mut roster = Roster::new();
        let me = add(&mut roster, Team::Opponents);
        let cursed = add(&mut roster, Team::Heroes);
        let fresh = add(&mut roster, Team::Heroes);
        roster
            .get_mut(cursed)
            .unwrap()
            .status
            .apply(StatusEffectKind::Weakened, 2, 2, Some(me));

        let (mend, bolt, hex) = (mend(), bolt(), hex());
        let ctx = context(&roster, me, vec![&mend, &bolt, &hex], &tables, &config);
        let decision = decide(&ctx).unwrap();
        assert_eq!(decision.skill_id, "hex");
        assert_eq!(decision.target, fresh);
    }

    #[test]
    fn attacks_when_every_enemy_is_debuffed() {
        let tables = BalanceTables::default();
        let config = AiConfig::default();
        let mut roster = Roster::new();
        let me = add(&mut roster, Team::Opponents);
        let enemy = add(&mut roster, Team::Heroes);
        roster
            .get_mut(enemy)
            .unwrap()
            .status
            .apply(StatusEffectKind::Weakened, 2, 2, Some(me));

        let (bolt, hex) = (bolt(), hex());
        let ctx = context(&roster, me, vec![&hex, &bolt], &tables, &config);
        let decision = decide(&ctx).unwrap();
        assert_eq!(decision.skill_id, "bolt");
        assert_eq!(decision.target, enemy);
    }

    #[test]
    fn nothing_usable_passes() {
        let tables = BalanceTables::default();
        let config = AiConfig::default();
        let mut roster = Roster::new();
        let me = add(&mut roster, Team::Opponents);
        add(&mut roster, Team::Heroes);

        let mend = mend();
        // everyone healthy and the only skill is a heal
        let ctx = context(&roster, me, vec![&mend], &tables, &config);
        assert_eq!(decide(&ctx), None);
    }
}
