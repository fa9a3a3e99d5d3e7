//! Ranged skirmisher: picks off casters, opens with debuffs.

use combat_core::{RngOracle, RollContext, SkillTraits, TablesOracle};

use super::{DecisionContext, NpcDecision, is_caster};

pub(super) fn decide<T, R>(ctx: &DecisionContext<'_, T, R>) -> Option<NpcDecision>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let enemies = ctx.enemies();
    let casters: Vec<_> = enemies.iter().copied().filter(|e| is_caster(e)).collect();
    let pool = if !casters.is_empty() && ctx.chance(ctx.config.caster_target_percent) {
        casters
    } else {
        enemies
    };
    let target = ctx.biased_target(&pool)?;

    let debuffs = ctx.skills_with(SkillTraits::DEBUFF);
    let skill = if !debuffs.is_empty() && ctx.chance(ctx.config.debuff_percent) {
        ctx.pick(&debuffs, RollContext::NpcSkill)?
    } else if let Some(best) = ctx.best_damage(&ctx.skills_with(SkillTraits::OFFENSIVE)) {
        best
    } else {
        ctx.pick(&ctx.skills, RollContext::NpcSkill)?
    };

    ctx.decision(skill, Some(target))
}
