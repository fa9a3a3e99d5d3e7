//! Skill resolution pipeline.
//!
//! One call resolves one skill use, in order:
//!
//! 1. Liveness gate (actor, then chosen target).
//! 2. Cost gate and payment.
//! 3. Target expansion for area skills.
//! 4. Per target: hit roll (hostile skills only), damage, healing, status effects.
//! 5. Experience for every opponent defeated by this use.
//!
//! Nothing is mutated before the cost gate passes.

use crate::env::{
    DamageEffect, DefinitionsOracle, Env, RngOracle, RollContext, RollSeed, SkillDefinition,
    TablesOracle, TargetType,
};
use crate::state::{ApplyOutcome, CombatantId, CombatantState, Roster};
use crate::stats::scale_floor;

use super::damage::{critical_damage, mitigate};
use super::error::CombatError;
use super::hit::{check_hit, skill_hit_chance};
use super::result::{ActionFailure, AttackOutcome, CombatActionResult, TargetOutcome};

/// Resolve `skill` used by `actor` on `target`.
///
/// `round` is only used for error context.
///
/// # Errors
///
/// * [`CombatError::UnknownCombatant`] if either id is not in the roster.
/// * [`CombatError::EmptySkill`] if the skill declares no effects at all.
/// * [`CombatError::Oracle`] if the environment lacks tables or randomness.
pub fn resolve_skill<D, T, R>(
    roster: &mut Roster,
    actor_id: CombatantId,
    target_id: CombatantId,
    skill: &SkillDefinition,
    env: &Env<'_, D, T, R>,
    seed: RollSeed,
    round: u32,
) -> Result<CombatActionResult, CombatError>
where
    D: DefinitionsOracle + ?Sized,
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let tables = env.tables()?;
    let rng = env.rng()?;

    let actor = roster
        .get(actor_id)
        .ok_or_else(|| CombatError::unknown_combatant(actor_id, round))?;
    let target = roster
        .get(target_id)
        .ok_or_else(|| CombatError::unknown_combatant(target_id, round))?;

    if skill.is_empty() {
        return Err(CombatError::empty_skill(&skill.id, actor_id, round));
    }

    // ------------------------------------------------------------------------
    // Gates
    // ------------------------------------------------------------------------

    let anchor = if skill.target_type.is_self_only() {
        actor_id
    } else {
        target_id
    };

    if actor.is_defeated() {
        return Ok(CombatActionResult::failed(
            actor_id,
            anchor,
            &skill.id,
            ActionFailure::ActorDefeated,
        ));
    }
    if !skill.target_type.is_self_only() && target.is_defeated() {
        return Ok(CombatActionResult::failed(
            actor_id,
            anchor,
            &skill.id,
            ActionFailure::TargetDefeated,
        ));
    }

    if let Some((kind, amount)) = skill.cost.requirement() {
        if !actor.can_afford(kind, amount) {
            tracing::debug!(
                "{} cannot afford '{}' ({} {} needed)",
                actor.name,
                skill.id,
                amount,
                kind
            );
            return Ok(CombatActionResult::failed(
                actor_id,
                anchor,
                &skill.id,
                ActionFailure::InsufficientResource {
                    kind,
                    required: amount,
                    available: actor.resources.get(kind).current(),
                },
            ));
        }
    }

    let affected = affected_targets(roster, actor, anchor, skill.target_type);

    let mut result = CombatActionResult::new(actor_id, anchor, &skill.id);
    if let Some((kind, amount)) = skill.cost.requirement() {
        if let Some(actor) = roster.get_mut(actor_id) {
            actor.pay(kind, amount);
        }
        result.paid = Some((kind, amount));
    }

    // Stats of the actor as of payment, used for every target.
    let attacker = roster
        .get(actor_id)
        .cloned()
        .ok_or_else(|| CombatError::unknown_combatant(actor_id, round))?;

    // ------------------------------------------------------------------------
    // Per-target effects
    // ------------------------------------------------------------------------

    for (index, defender_id) in affected.into_iter().enumerate() {
        let index = index as u32;
        let Some(defender) = roster.get_mut(defender_id) else {
            continue;
        };

        if skill.target_type.is_hostile() {
            let chance = skill_hit_chance(skill, &attacker, defender, tables);
            let roll = rng.roll_d100(seed.derive(actor_id.0, RollContext::Hit, index));
            if !check_hit(roll, chance) {
                tracing::debug!(
                    "{} misses {} with '{}' (roll {} > {}%)",
                    attacker.name,
                    defender.name,
                    skill.id,
                    roll,
                    chance
                );
                result.targets.push(TargetOutcome::missed(defender_id));
                continue;
            }
        }

        let mut entry = TargetOutcome {
            outcome: AttackOutcome::Hit,
            ..TargetOutcome::missed(defender_id)
        };

        if let Some(effect) = skill.damage_effect() {
            let critical = effect.crit_chance > 0
                && rng.chance(
                    seed.derive(actor_id.0, RollContext::Critical, index),
                    effect.crit_chance,
                );
            if critical {
                entry.outcome = AttackOutcome::Critical;
            }

            let amount = damage_against(effect, &attacker, defender, critical, tables);
            let receipt = defender.take_damage(amount);
            entry.damage = receipt.dealt;
            entry.absorbed = receipt.absorbed;
        }

        if let Some(heal) = skill.heal_effect() {
            entry.healing = defender.heal(heal.amount(&attacker));
        }

        for (effect_index, applied) in skill.applies.iter().enumerate() {
            if defender.is_defeated() {
                break;
            }
            if applied.chance < 100 {
                let roll_index = (index << 8) | effect_index as u32;
                let seed = seed.derive(actor_id.0, RollContext::EffectChance, roll_index);
                if !rng.chance(seed, applied.chance) {
                    tracing::debug!(
                        "{} resisted {} from '{}'",
                        defender.name,
                        applied.effect,
                        skill.id
                    );
                    continue;
                }
            }

            let potency = applied.scaled_potency(&attacker);
            let applied_outcome =
                defender
                    .status
                    .apply(applied.effect, applied.duration, potency, Some(actor_id));
            if applied_outcome != ApplyOutcome::Ignored {
                entry.applied_effects.push(applied.effect);
            }
        }

        entry.defeated = defender.is_defeated();
        tracing::debug!(
            "{} uses '{}' on {}: {:?}, {} damage, {} healing",
            attacker.name,
            skill.id,
            defender.name,
            entry.outcome,
            entry.damage,
            entry.healing
        );
        result.targets.push(entry);
    }

    // ------------------------------------------------------------------------
    // Experience
    // ------------------------------------------------------------------------

    let xp: u32 = result
        .targets
        .iter()
        .filter(|t| t.defeated && t.target != actor_id)
        .filter_map(|t| roster.get(t.target))
        .filter(|defeated| defeated.team != attacker.team)
        .map(|defeated| defeated.xp_reward)
        .sum();

    if xp > 0 {
        if let Some(actor) = roster.get_mut(actor_id) {
            if actor.is_alive() {
                result.levels_gained = actor.gain_experience(xp, tables);
                result.xp_awarded = xp;
            }
        }
    }

    Ok(result)
}

/// Targets the skill actually touches, in roster order for area skills.
fn affected_targets(
    roster: &Roster,
    actor: &CombatantState,
    anchor: CombatantId,
    target_type: TargetType,
) -> Vec<CombatantId> {
    if target_type.is_self_only() {
        return vec![actor.id];
    }
    if !target_type.is_area() {
        return vec![anchor];
    }

    let team = roster
        .get(anchor)
        .map_or(actor.team, |combatant| combatant.team);
    roster.living_on(team).map(|combatant| combatant.id).collect()
}

/// Damage one target receives before shields.
///
/// ```text
/// raw   = floor((base + bonus(scaling)) × multiplier)
/// raw   = floor(raw × tag_multiplier)      if the target carries the tag
/// raw   = floor(raw × crit_multiplier)     on a critical hit
/// final = max(minimum, raw - defense after penetration)
/// ```
fn damage_against(
    effect: &DamageEffect,
    attacker: &CombatantState,
    defender: &CombatantState,
    critical: bool,
    tables: &(impl TablesOracle + ?Sized),
) -> u32 {
    let mut raw = effect.raw_damage(attacker, tables);

    if let Some(bonus) = &effect.bonus_vs_tag {
        if defender.has_tag(&bonus.tag) {
            raw = scale_floor(raw, bonus.multiplier);
        }
    }
    if critical {
        raw = critical_damage(raw, tables);
    }

    mitigate(
        raw,
        defender.defense_against(effect.damage_type),
        effect.armor_penetration,
        tables,
    )
}
