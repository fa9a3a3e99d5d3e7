//! Reinforcement-learning episode protocol.
//!
//! [`ArenaEnv`] follows the usual `reset`/`step` contract:
//!
//! * `reset(seed)` starts a fresh [`EncounterSession`] for the current
//!   curriculum level and returns the first observation.
//! * `step(action)` decodes the action integer, plays one full round (agent,
//!   NPCs, status ticks), scores it and reports termination and truncation.
//!
//! The environment owns its session, so environments built from clones of
//! the same [`OracleManager`] can run in parallel without sharing state.
use combat_core::{
    CombatActionResult, DefinitionsOracle, GameConfig, HealthSnapshot, OracleError,
};
use serde::{Deserialize, Serialize};

use crate::ai::{AiConfig, NpcDispatcher};
use crate::codec::ActionCodec;
use crate::config::EnvConfig;
use crate::error::{Result, RuntimeError};
use crate::observation::{Observation, ObservationConfig, ObservationEncoder};
use crate::oracle::OracleManager;
use crate::reward::{RewardConfig, RewardModel, StepSummary};
use crate::session::{EncounterSession, EpisodeOutcome};

/// Side information returned with every observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub encounter: String,
    pub health: Vec<HealthSnapshot>,
    pub action_mask: Vec<bool>,
    /// Rounds completed.
    pub round: u32,
    /// Steps taken in this episode.
    pub episode_step: u64,
    pub curriculum_level: usize,
    pub is_success: bool,
    pub invalid_action: bool,
    /// Every skill use of the round, in turn order.
    pub results: Vec<CombatActionResult>,
}

impl StepInfo {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f32,
    /// Victory or defeat.
    pub terminated: bool,
    /// Round limit reached.
    pub truncated: bool,
    pub info: StepInfo,
}

pub struct ArenaEnvBuilder {
    oracles: OracleManager,
    game: GameConfig,
    config: EnvConfig,
    reward: RewardConfig,
    ai: AiConfig,
    observation: ObservationConfig,
}

impl ArenaEnvBuilder {
    pub fn game_config(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    pub fn env_config(mut self, config: EnvConfig) -> Self {
        self.config = config;
        self
    }

    pub fn reward_config(mut self, reward: RewardConfig) -> Self {
        self.reward = reward;
        self
    }

    pub fn ai_config(mut self, ai: AiConfig) -> Self {
        self.ai = ai;
        self
    }

    pub fn observation_config(mut self, observation: ObservationConfig) -> Self {
        self.observation = observation;
        self
    }

    /// # Errors
    ///
    /// [`RuntimeError::EmptyCurriculum`] when neither the configuration nor
    /// the definitions name any encounter.
    pub fn build(self) -> Result<ArenaEnv> {
        let curriculum = if self.config.curriculum.is_empty() {
            self.oracles
                .definitions()
                .encounters()
                .map(|encounter| encounter.id.clone())
                .collect()
        } else {
            self.config.curriculum.clone()
        };
        if curriculum.is_empty() {
            return Err(RuntimeError::EmptyCurriculum);
        }

        let codec = self.config.codec();
        let mut env = ArenaEnv {
            codec,
            observer: ObservationEncoder::new(codec, self.observation),
            rewards: RewardModel::new(self.reward),
            dispatcher: NpcDispatcher::new(self.ai),
            oracles: self.oracles,
            game: self.game,
            curriculum,
            level: 0,
            session: None,
            episode_step: 0,
            config: self.config,
        };
        env.set_curriculum_level(env.config.curriculum_level);
        Ok(env)
    }
}

pub struct ArenaEnv {
    oracles: OracleManager,
    game: GameConfig,
    config: EnvConfig,
    codec: ActionCodec,
    observer: ObservationEncoder,
    rewards: RewardModel,
    dispatcher: NpcDispatcher,
    curriculum: Vec<String>,
    level: usize,
    session: Option<EncounterSession>,
    episode_step: u64,
}

impl ArenaEnv {
    pub fn builder(oracles: OracleManager) -> ArenaEnvBuilder {
        ArenaEnvBuilder {
            oracles,
            game: GameConfig::default(),
            config: EnvConfig::default(),
            reward: RewardConfig::default(),
            ai: AiConfig::default(),
            observation: ObservationConfig::default(),
        }
    }

    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    pub fn action_space_size(&self) -> usize {
        self.codec.action_space_size()
    }

    pub fn observation_size(&self) -> usize {
        self.observer.observation_size()
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn curriculum(&self) -> &[String] {
        &self.curriculum
    }

    pub fn curriculum_level(&self) -> usize {
        self.level
    }

    /// Select the encounter used by the next reset.
    ///
    /// Out-of-range levels fall back to level 0.
    pub fn set_curriculum_level(&mut self, level: usize) {
        if level < self.curriculum.len() {
            self.level = level;
        } else {
            tracing::warn!(
                "curriculum level {} out of range (0..{}), falling back to level 0",
                level,
                self.curriculum.len()
            );
            self.level = 0;
        }
    }

    pub fn session(&self) -> Option<&EncounterSession> {
        self.session.as_ref()
    }

    /// Start a new episode.
    ///
    /// # Errors
    ///
    /// * [`RuntimeError::Oracle`] when the curriculum names an unknown encounter.
    /// * [`RuntimeError::TemplateNotFound`] / [`RuntimeError::NoOpponents`]
    ///   from [`EncounterSession::start`].
    pub fn reset(&mut self, seed: u64) -> Result<(Observation, StepInfo)> {
        let env = self.oracles.as_env();
        let id = self
            .curriculum
            .get(self.level)
            .ok_or(RuntimeError::EmptyCurriculum)?;
        let encounter = self
            .oracles
            .definitions()
            .encounter(id)
            .ok_or_else(|| OracleError::EncounterNotFound(id.clone()))?;

        let session = EncounterSession::start(
            encounter,
            &env,
            &self.game,
            &self.codec,
            self.config.max_rounds,
            seed,
        )?;

        self.episode_step = 0;
        let observation = self.observe(&session);
        let info = self.info(&session, Vec::new(), false);
        self.session = Some(session);
        Ok((observation, info))
    }

    /// Play one round with the agent's `action`.
    ///
    /// Undecodable or unaffordable actions are not errors: the turn is lost,
    /// `info.invalid_action` is set and the reward carries the penalty.
    ///
    /// # Errors
    ///
    /// * [`RuntimeError::EpisodeFinished`] without a running episode.
    /// * [`RuntimeError::Codec`] when `action` is outside the action space.
    pub fn step(&mut self, action: usize) -> Result<StepOutcome> {
        let (before, report, invalid_action) = {
            let env = self.oracles.as_env();
            let session = self
                .session
                .as_mut()
                .ok_or(RuntimeError::EpisodeFinished)?;
            if session.is_finished() {
                return Err(RuntimeError::EpisodeFinished);
            }

            let before = session.roster().health_snapshot();
            let decoded = self.codec.decode(
                action,
                session.roster(),
                session.layout(),
                self.oracles.definitions(),
            )?;
            if decoded.is_none() {
                tracing::warn!("action {} is not executable, the agent loses its turn", action);
            }

            let report = session.play_round(decoded.as_ref(), &self.dispatcher, &env)?;
            let invalid_action = decoded.is_none() || report.invalid_action;
            (before, report, invalid_action)
        };

        self.episode_step += 1;
        let session = self
            .session
            .as_ref()
            .ok_or(RuntimeError::EpisodeFinished)?;

        let after = session.roster().health_snapshot();
        let reward = self.rewards.evaluate(&StepSummary {
            agent: session.agent(),
            before: &before,
            after: &after,
            agent_result: report.agent_result.as_ref(),
            invalid_action,
            outcome: report.outcome,
            round: session.round(),
            max_rounds: session.max_rounds(),
        });

        let observation = self.observe(session);
        let outcome = report.outcome;
        let info = self.info(session, report.results, invalid_action);

        if let Some(outcome) = outcome {
            tracing::info!(
                "encounter '{}' ended in {} after {} steps",
                session.encounter_id(),
                outcome,
                self.episode_step
            );
        }

        Ok(StepOutcome {
            observation,
            reward,
            terminated: outcome.is_some_and(EpisodeOutcome::is_terminal),
            truncated: outcome == Some(EpisodeOutcome::Truncated),
            info,
        })
    }

    /// Legality mask for the current episode; all `false` but action 0
    /// without one.
    pub fn action_mask(&self) -> Vec<bool> {
        match &self.session {
            Some(session) => self.mask(session),
            None => {
                let mut mask = vec![false; self.action_space_size()];
                if let Some(first) = mask.first_mut() {
                    *first = true;
                }
                mask
            }
        }
    }

    fn mask(&self, session: &EncounterSession) -> Vec<bool> {
        self.codec.legality_mask(
            session.roster(),
            session.layout(),
            self.oracles.definitions(),
        )
    }

    fn observe(&self, session: &EncounterSession) -> Observation {
        self.observer.encode(
            session.roster(),
            session.layout(),
            self.oracles.definitions(),
            session.round(),
            session.max_rounds(),
        )
    }

    fn info(
        &self,
        session: &EncounterSession,
        results: Vec<CombatActionResult>,
        invalid_action: bool,
    ) -> StepInfo {
        StepInfo {
            encounter: session.encounter_id().to_owned(),
            health: session.roster().health_snapshot(),
            action_mask: self.mask(session),
            round: session.round(),
            episode_step: self.episode_step,
            curriculum_level: self.level,
            is_success: session.outcome().is_some_and(EpisodeOutcome::is_success),
            invalid_action,
            results,
        }
    }
}
