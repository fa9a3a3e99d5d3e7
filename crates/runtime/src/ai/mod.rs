//! Rule-based decision making for NPC combatants.
//!
//! Each NPC carries a strategy tag from its template. The tag selects one of a
//! closed set of [`Strategy`] variants; each variant is a plain function over a
//! [`DecisionContext`]. A missing or unknown tag, a stunned actor and a
//! strategy without a viable option all produce `None`, which the session
//! treats as a passed turn.
mod melee;
mod ranged;
mod support;

use std::cell::Cell;

use combat_core::{
    CombatantId, CombatantState, DefinitionsOracle, Env, ResourceKind, RngOracle, RollContext,
    RollSeed, Roster, SkillDefinition, SkillTraits, TablesOracle,
};
use serde::{Deserialize, Serialize};

/// NPC behavior variants, parsed from template strategy tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    BasicMelee,
    BasicRanged,
    SupportCaster,
}

/// Percentages steering the strategies. Whole numbers, 80 = 80%.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Chance to attack the enemy with the lowest health fraction.
    pub weakest_target_percent: u32,
    /// Chance to use the highest-damage offensive skill.
    pub best_skill_percent: u32,
    /// Chance for ranged NPCs to single out caster-type enemies.
    pub caster_target_percent: u32,
    /// Chance for ranged NPCs to open with a debuff.
    pub debuff_percent: u32,
    /// Support casters heal allies at or below this health percentage.
    pub heal_threshold_percent: u32,
}

impl AiConfig {
    pub const DEFAULT_WEAKEST_TARGET_PERCENT: u32 = 80;
    pub const DEFAULT_BEST_SKILL_PERCENT: u32 = 70;
    pub const DEFAULT_CASTER_TARGET_PERCENT: u32 = 70;
    pub const DEFAULT_DEBUFF_PERCENT: u32 = 60;
    pub const DEFAULT_HEAL_THRESHOLD_PERCENT: u32 = 50;
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            weakest_target_percent: Self::DEFAULT_WEAKEST_TARGET_PERCENT,
            best_skill_percent: Self::DEFAULT_BEST_SKILL_PERCENT,
            caster_target_percent: Self::DEFAULT_CASTER_TARGET_PERCENT,
            debuff_percent: Self::DEFAULT_DEBUFF_PERCENT,
            heal_threshold_percent: Self::DEFAULT_HEAL_THRESHOLD_PERCENT,
        }
    }
}

/// Skill and target chosen for one NPC turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcDecision {
    pub skill_id: String,
    pub target: CombatantId,
}

/// Maps each NPC's strategy tag to its decision function.
#[derive(Clone, Debug, Default)]
pub struct NpcDispatcher {
    config: AiConfig,
}

impl NpcDispatcher {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Choose a skill and target for `actor_id`, or `None` to pass the turn.
    pub fn decide<D, T, R>(
        &self,
        actor_id: CombatantId,
        roster: &Roster,
        env: &Env<'_, D, T, R>,
        seed: RollSeed,
    ) -> Option<NpcDecision>
    where
        D: DefinitionsOracle + ?Sized,
        T: TablesOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        let actor = roster.get(actor_id)?;
        if !actor.can_act() {
            tracing::debug!("NPC {} cannot act this turn", actor.name);
            return None;
        }

        let Some(tag) = actor.strategy.as_deref() else {
            tracing::warn!("NPC {} has no strategy, passing", actor.name);
            return None;
        };
        let Ok(strategy) = tag.parse::<Strategy>() else {
            tracing::warn!("NPC {} has unknown strategy '{}', passing", actor.name, tag);
            return None;
        };

        let (Ok(definitions), Ok(tables), Ok(rng)) = (env.definitions(), env.tables(), env.rng())
        else {
            tracing::warn!("NPC {} has no complete environment, passing", actor.name);
            return None;
        };

        let ctx = DecisionContext {
            actor,
            roster,
            skills: usable_skills(actor, definitions),
            tables,
            rng,
            seed,
            config: &self.config,
            rolls: Cell::new(0),
        };

        tracing::debug!(
            "NPC {} selected strategy {} with {} usable skills",
            actor.name,
            strategy,
            ctx.skills.len()
        );

        let decision = match strategy {
            Strategy::BasicMelee => melee::decide(&ctx),
            Strategy::BasicRanged => ranged::decide(&ctx),
            Strategy::SupportCaster => support::decide(&ctx),
        };

        match &decision {
            Some(decision) => tracing::debug!(
                "NPC {} selected '{}' on {}",
                actor.name,
                decision.skill_id,
                decision.target
            ),
            None => tracing::debug!("NPC {} found no viable action, passing", actor.name),
        }
        decision
    }
}

/// Known skills that are defined, non-empty and affordable right now.
fn usable_skills<'a, D>(actor: &CombatantState, definitions: &'a D) -> Vec<&'a SkillDefinition>
where
    D: DefinitionsOracle + ?Sized,
{
    actor
        .skills
        .iter()
        .filter_map(|id| {
            let skill = definitions.skill(id);
            if skill.is_none() {
                tracing::warn!("NPC {} knows undefined skill '{}', skipping it", actor.name, id);
            }
            skill
        })
        .filter(|skill| !skill.is_empty() && skill.is_affordable_by(actor))
        .collect()
}

/// Caster-type: mana is the primary pool, or tagged `CASTER`.
pub fn is_caster(combatant: &CombatantState) -> bool {
    combatant.primary_pool() == Some(ResourceKind::Mana) || combatant.has_tag("CASTER")
}

// ============================================================================
// Decision context
// ============================================================================

/// Everything a strategy looks at for one decision.
pub(crate) struct DecisionContext<'a, T: ?Sized, R: ?Sized> {
    pub actor: &'a CombatantState,
    pub roster: &'a Roster,
    pub skills: Vec<&'a SkillDefinition>,
    pub tables: &'a T,
    pub rng: &'a R,
    pub seed: RollSeed,
    pub config: &'a AiConfig,
    rolls: Cell<u32>,
}

impl<'a, T, R> DecisionContext<'a, T, R>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    /// Next seed; every roll within one decision gets its own index.
    fn next_seed(&self, context: RollContext) -> u64 {
        let index = self.rolls.get();
        self.rolls.set(index + 1);
        self.seed.derive(self.actor.id.0, context, index)
    }

    pub fn chance(&self, percent: u32) -> bool {
        self.rng.chance(self.next_seed(RollContext::NpcBranch), percent)
    }

    pub fn pick<X: Copy>(&self, items: &[X], context: RollContext) -> Option<X> {
        if items.is_empty() {
            return None;
        }
        let index = self.rng.pick_index(self.next_seed(context), items.len());
        items.get(index).copied()
    }

    pub fn enemies(&self) -> Vec<&'a CombatantState> {
        self.roster.living_enemies_of(self.actor.id)
    }

    /// Living teammates, the actor included.
    pub fn allies(&self) -> Vec<&'a CombatantState> {
        self.roster.living_allies_of(self.actor.id)
    }

    pub fn skills_with(&self, traits: SkillTraits) -> Vec<&'a SkillDefinition> {
        self.skills
            .iter()
            .copied()
            .filter(|skill| skill.traits().contains(traits))
            .collect()
    }

    /// Lowest health fraction wins, ties keep roster order.
    pub fn weakest(&self, pool: &[&'a CombatantState]) -> Option<&'a CombatantState> {
        pool.iter()
            .copied()
            .min_by(|a, b| a.health_fraction().total_cmp(&b.health_fraction()))
    }

    /// Weakest member of `pool` most of the time, otherwise a random one.
    pub fn biased_target(&self, pool: &[&'a CombatantState]) -> Option<&'a CombatantState> {
        if self.chance(self.config.weakest_target_percent) {
            self.weakest(pool)
        } else {
            self.pick(pool, RollContext::NpcTarget)
        }
    }

    /// Highest expected damage, first listed on ties.
    pub fn best_damage(&self, skills: &[&'a SkillDefinition]) -> Option<&'a SkillDefinition> {
        let mut best: Option<(&'a SkillDefinition, i32)> = None;
        for &skill in skills {
            let damage = skill.expected_damage(self.actor, self.tables);
            if best.is_none_or(|(_, top)| damage > top) {
                best = Some((skill, damage));
            }
        }
        best.map(|(skill, _)| skill)
    }

    /// Target for `skill`: the actor for self skills, `enemy` (or a random
    /// enemy) for hostile skills, a random ally otherwise.
    pub fn target_for(
        &self,
        skill: &SkillDefinition,
        enemy: Option<&'a CombatantState>,
    ) -> Option<CombatantId> {
        let target = if skill.target_type.is_self_only() {
            Some(self.actor)
        } else if skill.target_type.is_hostile() {
            enemy.or_else(|| self.pick(&self.enemies(), RollContext::NpcTarget))
        } else {
            self.pick(&self.allies(), RollContext::NpcTarget)
        };
        target.map(|combatant| combatant.id)
    }

    pub fn decision(
        &self,
        skill: &SkillDefinition,
        enemy: Option<&'a CombatantState>,
    ) -> Option<NpcDecision> {
        Some(NpcDecision {
            skill_id: skill.id.clone(),
            target: self.target_for(skill, enemy)?,
        })
    }
}
