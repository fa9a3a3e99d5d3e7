//! One encounter from spawn to outcome.
//!
//! [`EncounterSession`] owns the roster of a single episode. Each call to
//! [`play_round`](EncounterSession::play_round) runs a full round:
//!
//! 1. Turn order from current initiative (living combatants, ties by roster order).
//! 2. Each combatant in order acts once: the agent uses the supplied action,
//!    NPCs ask the [`NpcDispatcher`]. Stunned combatants skip. Once one side
//!    has lost, the remaining turns are skipped.
//! 3. If no side has lost yet, status effects tick in the same turn order.
//! 4. The round counter advances and the outcome is settled: defeat when the
//!    agent is down, victory when every opponent is down, truncation at the
//!    round limit.
use combat_core::state::TickReport;
use combat_core::{
    ActionFailure, CombatActionResult, CombatantId, CombatantState, DefinitionsOracle,
    EncounterSpec, Env, GameConfig, OracleError, RngOracle, RollSeed, Roster, TablesOracle, Team,
    initiative_order, resolve_skill,
};
use serde::{Deserialize, Serialize};

use crate::ai::NpcDispatcher;
use crate::codec::{ActionCodec, DecodedAction, SlotLayout};
use crate::error::{Result, RuntimeError};

/// How an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    Victory,
    Defeat,
    /// Round limit reached with both sides standing.
    Truncated,
}

impl EpisodeOutcome {
    /// Victory or defeat, as opposed to truncation.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Truncated)
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Victory)
    }
}

/// Everything that happened in one round.
#[derive(Clone, Debug, Default)]
pub struct RoundReport {
    /// 1-based number of the round just played.
    pub round: u32,
    /// Every resolved skill use, in turn order.
    pub results: Vec<CombatActionResult>,
    /// The agent's own result, also present in `results`.
    pub agent_result: Option<CombatActionResult>,
    /// The agent had a turn and could act.
    pub agent_acted: bool,
    /// The agent's action could not be resolved (missing, or unaffordable).
    pub invalid_action: bool,
    /// Status effect ticks that changed something.
    pub ticks: Vec<(CombatantId, TickReport)>,
    pub outcome: Option<EpisodeOutcome>,
}

#[derive(Clone, Debug)]
pub struct EncounterSession {
    encounter_id: String,
    roster: Roster,
    agent: CombatantId,
    layout: SlotLayout,
    round: u32,
    max_rounds: u32,
    game_seed: u64,
    nonce: u64,
    outcome: Option<EpisodeOutcome>,
}

impl EncounterSession {
    /// Spawn the agent, its allies and the opponents of `encounter`.
    ///
    /// Missing ally or opponent templates are skipped with a warning, as are
    /// combatants beyond the codec's slot capacity.
    ///
    /// # Errors
    ///
    /// * [`RuntimeError::TemplateNotFound`] when the hero template is missing.
    /// * [`RuntimeError::NoOpponents`] when no opponent could be spawned.
    /// * [`RuntimeError::Oracle`] when the environment lacks definitions or tables.
    pub fn start<D, T, R>(
        encounter: &EncounterSpec,
        env: &Env<'_, D, T, R>,
        config: &GameConfig,
        codec: &ActionCodec,
        max_rounds: u32,
        seed: u64,
    ) -> Result<Self>
    where
        D: DefinitionsOracle + ?Sized,
        T: TablesOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        let definitions = env.definitions()?;
        let tables = env.tables()?;
        let basic = config.basic_attack();
        let mut roster = Roster::new();

        let hero = definitions
            .character(&encounter.hero)
            .ok_or_else(|| RuntimeError::TemplateNotFound(encounter.hero.clone()))?;
        let unit = hero.spawn(roster.next_id(), Team::Heroes, basic, tables);
        let agent = roster.push(unit);

        let sides = [
            (Team::Heroes, &encounter.allies, codec.max_allies),
            (Team::Opponents, &encounter.opponents, codec.max_enemies),
        ];
        for (team, templates, capacity) in sides {
            let mut spawned = 0;
            for template_id in templates {
                if spawned == capacity {
                    tracing::warn!(
                        "encounter '{}' lists more than {} {} slots, dropping '{}'",
                        encounter.id,
                        capacity,
                        team,
                        template_id
                    );
                    continue;
                }
                let Some(template) = definitions.combatant(template_id) else {
                    tracing::warn!(
                        "encounter '{}' references unknown template '{}', skipping it",
                        encounter.id,
                        template_id
                    );
                    continue;
                };
                let unit = template.spawn(roster.next_id(), team, basic, tables);
                roster.push(unit);
                spawned += 1;
            }
        }

        if roster.is_wiped_out(Team::Opponents) {
            return Err(RuntimeError::NoOpponents(encounter.id.clone()));
        }

        let layout = SlotLayout::from_roster(&roster, agent, codec);
        tracing::info!(
            "episode started: encounter '{}', {} allies, {} opponents, seed {}",
            encounter.id,
            layout.allies().len(),
            layout.enemies().len(),
            seed
        );

        Ok(Self {
            encounter_id: encounter.id.clone(),
            roster,
            agent,
            layout,
            round: 0,
            max_rounds,
            game_seed: seed,
            nonce: 0,
            outcome: None,
        })
    }

    pub fn encounter_id(&self) -> &str {
        &self.encounter_id
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn agent(&self) -> CombatantId {
        self.agent
    }

    pub fn agent_state(&self) -> Option<&CombatantState> {
        self.roster.get(self.agent)
    }

    pub fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    /// Rounds completed so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn outcome(&self) -> Option<EpisodeOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Play one round. `agent_action` is `None` when the agent's choice did
    /// not decode; its turn is then lost and flagged invalid.
    ///
    /// # Errors
    ///
    /// * [`RuntimeError::EpisodeFinished`] once an outcome is settled.
    /// * [`RuntimeError::Combat`] / [`RuntimeError::Oracle`] on resolver defects.
    pub fn play_round<D, T, R>(
        &mut self,
        agent_action: Option<&DecodedAction>,
        dispatcher: &NpcDispatcher,
        env: &Env<'_, D, T, R>,
    ) -> Result<RoundReport>
    where
        D: DefinitionsOracle + ?Sized,
        T: TablesOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        if self.is_finished() {
            return Err(RuntimeError::EpisodeFinished);
        }

        let round = self.round + 1;
        let order = initiative_order(&self.roster);
        let mut report = RoundReport {
            round,
            ..RoundReport::default()
        };

        for &id in &order {
            if self.decided().is_some() {
                tracing::debug!("round {}: outcome decided, remaining turns skipped", round);
                break;
            }
            let Some(combatant) = self.roster.get(id) else {
                continue;
            };
            if !combatant.can_act() {
                if combatant.is_alive() {
                    tracing::debug!("{} cannot act and skips the turn", combatant.name);
                }
                continue;
            }

            let seed = self.next_seed();
            if id == self.agent {
                report.agent_acted = true;
                let Some(action) = agent_action else {
                    report.invalid_action = true;
                    continue;
                };
                match self.resolve(id, &action.skill_id, action.target, env, seed, round)? {
                    Some(result) => {
                        if matches!(
                            result.failure,
                            Some(ActionFailure::InsufficientResource { .. })
                        ) {
                            report.invalid_action = true;
                        }
                        report.agent_result = Some(result.clone());
                        report.results.push(result);
                    }
                    None => report.invalid_action = true,
                }
            } else {
                let Some(decision) = dispatcher.decide(id, &self.roster, env, seed) else {
                    continue;
                };
                if let Some(result) =
                    self.resolve(id, &decision.skill_id, decision.target, env, seed, round)?
                {
                    report.results.push(result);
                }
            }
        }

        if self.decided().is_none() {
            for &id in &order {
                let Some(combatant) = self.roster.get_mut(id) else {
                    continue;
                };
                let tick = combatant.tick_status_effects();
                if tick.defeated {
                    tracing::debug!("{} succumbs to status effects", combatant.name);
                }
                if tick.damage > 0 || tick.absorbed > 0 || !tick.expired.is_empty() {
                    report.ticks.push((id, tick));
                }
            }
        }

        self.round = round;
        self.outcome = self
            .decided()
            .or_else(|| (self.round >= self.max_rounds).then_some(EpisodeOutcome::Truncated));
        report.outcome = self.outcome;

        if let Some(outcome) = self.outcome {
            tracing::info!(
                "episode finished: encounter '{}', {} after {} rounds",
                self.encounter_id,
                outcome,
                self.round
            );
        }
        Ok(report)
    }

    /// Victory or defeat if either is already settled.
    fn decided(&self) -> Option<EpisodeOutcome> {
        let agent_down = self
            .roster
            .get(self.agent)
            .is_none_or(|agent| agent.is_defeated());
        if agent_down {
            Some(EpisodeOutcome::Defeat)
        } else if self.roster.is_wiped_out(Team::Opponents) {
            Some(EpisodeOutcome::Victory)
        } else {
            None
        }
    }

    fn next_seed(&mut self) -> RollSeed {
        let seed = RollSeed::new(self.game_seed, self.nonce);
        self.nonce += 1;
        seed
    }

    fn resolve<D, T, R>(
        &mut self,
        actor: CombatantId,
        skill_id: &str,
        target: CombatantId,
        env: &Env<'_, D, T, R>,
        seed: RollSeed,
        round: u32,
    ) -> Result<Option<CombatActionResult>>
    where
        D: DefinitionsOracle + ?Sized,
        T: TablesOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        let skill = match env.skill(skill_id) {
            Ok(skill) => skill,
            Err(OracleError::SkillNotFound(id)) => {
                tracing::warn!("skill '{}' is not defined, turn of {} passes", id, actor);
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let result = resolve_skill(&mut self.roster, actor, target, skill, env, seed, round)?;
        tracing::debug!(
            "round {}: {} used '{}' on {}: hit={} damage={} healing={}",
            round,
            actor,
            skill.id,
            target,
            result.hit(),
            result.total_damage(),
            result.total_healing()
        );
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        BalanceTables, CombatantTemplate, DamageEffect, DamageType, DefinitionCatalog, PcgRng,
        SkillDefinition, SkillEffect, StatusEffectKind, TargetType,
    };

    fn catalog() -> DefinitionCatalog {
        DefinitionCatalog::new()
            .with_skill(
                SkillDefinition::new("basic_attack_free", TargetType::EnemySingle).with_effect(
                    SkillEffect::Damage(DamageEffect::new(DamageType::Physical, None)),
                ),
            )
            .with_character(CombatantTemplate::builder("hero").base_health(30).build())
            .with_opponent(
                CombatantTemplate::builder("rat")
                    .base_health(1)
                    .strategy("basic_melee")
                    .build(),
            )
    }

    #[test]
    fn start_spawns_and_skips_unknown_templates() {
        let catalog = catalog();
        let tables = BalanceTables::default();
        let env = Env::with_all(&catalog, &tables, &PcgRng);
        let encounter = EncounterSpec::new("nest", "hero")
            .with_ally("ghost")
            .with_opponent("rat")
            .with_opponent("dragon");

        let session = EncounterSession::start(
            &encounter,
            &env,
            &GameConfig::default(),
            &ActionCodec::default(),
            10,
            7,
        )
        .unwrap();

        assert_eq!(session.roster().len(), 2);
        assert_eq!(session.layout().enemies(), &[CombatantId(1)]);
        assert!(session.layout().allies().is_empty());
        let hero = session.agent_state().unwrap();
        assert_eq!(hero.skills, vec!["basic_attack_free".to_owned()]);
    }

    #[test]
    fn start_requires_hero_and_opponents() {
        let catalog = catalog();
        let tables = BalanceTables::default();
        let env = Env::with_all(&catalog, &tables, &PcgRng);
        let config = GameConfig::default();
        let codec = ActionCodec::default();

        let missing_hero = EncounterSpec::new("a", "paladin").with_opponent("rat");
        assert!(matches!(
            EncounterSession::start(&missing_hero, &env, &config, &codec, 10, 0),
            Err(RuntimeError::TemplateNotFound(id)) if id == "paladin"
        ));

        let nobody = EncounterSpec::new("b", "hero").with_opponent("dragon");
        assert!(matches!(
            EncounterSession::start(&nobody, &env, &config, &codec, 10, 0),
            Err(RuntimeError::NoOpponents(_))
        ));
    }

    #[test]
    fn round_limit_truncates_and_finished_session_refuses_rounds() {
        let catalog = catalog();
        let tables = BalanceTables::default();
        let env = Env::with_all(&catalog, &tables, &PcgRng);
        let encounter = EncounterSpec::new("nest", "hero").with_opponent("rat");
        let mut session = EncounterSession::start(
            &encounter,
            &env,
            &GameConfig::default(),
            &ActionCodec::default(),
            1,
            3,
        )
        .unwrap();

        // The agent passes; a 1-round limit ends the episode unless someone dies.
        let report = session
            .play_round(None, &NpcDispatcher::default(), &env)
            .unwrap();
        assert!(report.invalid_action);
        assert!(session.is_finished());
        assert!(matches!(
            session.play_round(None, &NpcDispatcher::default(), &env),
            Err(RuntimeError::EpisodeFinished)
        ));
    }

    fn nest<'a>(
        catalog: &'a DefinitionCatalog,
        tables: &'a BalanceTables,
    ) -> (EncounterSession, Env<'a, DefinitionCatalog, BalanceTables, PcgRng>) {
        let env = Env::with_all(catalog, tables, &PcgRng);
        let encounter = EncounterSpec::new("nest", "hero").with_opponent("rat");
        let session = EncounterSession::start(
            &encounter,
            &env,
            &GameConfig::default(),
            &ActionCodec::default(),
            10,
            5,
        )
        .unwrap();
        (session, env)
    }

    #[test]
    fn burning_ticks_after_every_turn_and_can_win_the_round() {
        let catalog = catalog();
        let tables = BalanceTables::default();
        let (mut session, env) = nest(&catalog, &tables);
        let rat = CombatantId(1);
        let agent = session.agent();
        let hp = session.roster().get(rat).unwrap().hp();
        session
            .roster
            .get_mut(rat)
            .unwrap()
            .status
            .apply(StatusEffectKind::Burning, 3, hp as i32, Some(agent));

        // The agent passes, so only the burn can bring the rat down.
        let report = session
            .play_round(None, &NpcDispatcher::default(), &env)
            .unwrap();

        // The rat still took its turn before the tick killed it.
        assert!(report.results.iter().any(|result| result.actor == rat));
        let (id, tick) = &report.ticks[0];
        assert_eq!(*id, rat);
        assert!(tick.defeated);
        assert_eq!(session.roster().get(rat).unwrap().hp(), 0);

        assert_eq!(report.outcome, Some(EpisodeOutcome::Victory));
        assert!(EpisodeOutcome::Victory.is_terminal());
        assert!(session.is_finished());
    }

    #[test]
    fn ticks_are_skipped_once_the_round_is_decided() {
        let catalog = catalog();
        let tables = BalanceTables::default();
        let (mut session, env) = nest(&catalog, &tables);
        let rat = CombatantId(1);
        let agent = session.agent();
        session
            .roster
            .get_mut(rat)
            .unwrap()
            .status
            .apply(StatusEffectKind::Burning, 3, 4, Some(agent));
        session.roster.get_mut(agent).unwrap().take_damage(999);
        let rat_hp = session.roster().get(rat).unwrap().hp();

        let report = session
            .play_round(None, &NpcDispatcher::default(), &env)
            .unwrap();

        assert_eq!(report.outcome, Some(EpisodeOutcome::Defeat));
        assert!(report.results.is_empty());
        assert!(report.ticks.is_empty());
        assert_eq!(session.roster().get(rat).unwrap().hp(), rat_hp);
        assert!(session.roster().get(rat).unwrap().has_status(StatusEffectKind::Burning));
    }
}
