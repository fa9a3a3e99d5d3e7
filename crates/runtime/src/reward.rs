//! Reward shaping for one agent step.
//!
//! ```text
//! reward = time_penalty
//!        + invalid_action                          (invalid step)
//!        + damage_factor  × damage to opponents    ┐
//!        + healing_factor × healing on teammates   │ dropped on
//!        + kill_bonus     × opponents defeated     │ invalid steps
//!        + effect_applied × effects applied        │
//!        + resource_efficiency                     │
//!              × (damage + 2 × healing) / cost     ┘
//!        + ally_death     × teammates lost this step
//!        + victory + surviving_ally_bonus × living teammates
//!                  + round_efficiency_bonus × unused round fraction
//!        | defeat + defeated_enemy_bonus × opponents down
//!        | truncation
//! ```
//!
//! The damage, healing, kill and effect terms only count the agent's own action.
use combat_core::{CombatActionResult, CombatantId, HealthSnapshot};
use serde::{Deserialize, Serialize};

use crate::session::EpisodeOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub time_penalty: f32,
    pub invalid_action: f32,
    pub damage_factor: f32,
    pub healing_factor: f32,
    pub kill_bonus: f32,
    pub ally_death: f32,
    pub effect_applied: f32,
    /// Scales impact per resource point spent; free skills earn nothing here.
    pub resource_efficiency: f32,
    pub victory: f32,
    pub defeat: f32,
    pub truncation: f32,
    pub surviving_ally_bonus: f32,
    pub round_efficiency_bonus: f32,
    /// Consolation per defeated opponent when the episode is lost.
    pub defeated_enemy_bonus: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            time_penalty: -0.01,
            invalid_action: -1.0,
            damage_factor: 0.1,
            healing_factor: 0.2,
            kill_bonus: 1.0,
            ally_death: -1.0,
            effect_applied: 0.5,
            resource_efficiency: 0.05,
            victory: 10.0,
            defeat: -10.0,
            truncation: -5.0,
            surviving_ally_bonus: 0.5,
            round_efficiency_bonus: 5.0,
            defeated_enemy_bonus: 0.3,
        }
    }
}

/// What happened during one step, as seen by the reward.
#[derive(Clone, Copy, Debug)]
pub struct StepSummary<'a> {
    pub agent: CombatantId,
    /// Health of every combatant before the step.
    pub before: &'a [HealthSnapshot],
    /// Health of every combatant after the step (including ticks).
    pub after: &'a [HealthSnapshot],
    /// The agent's resolved action, if it acted.
    pub agent_result: Option<&'a CombatActionResult>,
    pub invalid_action: bool,
    pub outcome: Option<EpisodeOutcome>,
    /// Rounds completed so far.
    pub round: u32,
    pub max_rounds: u32,
}

#[derive(Clone, Debug, Default)]
pub struct RewardModel {
    config: RewardConfig,
}

impl RewardModel {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn evaluate(&self, step: &StepSummary<'_>) -> f32 {
        let cfg = &self.config;
        let mut reward = cfg.time_penalty;

        let Some(team) = step
            .before
            .iter()
            .find(|snapshot| snapshot.id == step.agent)
            .map(|snapshot| snapshot.team)
        else {
            return reward;
        };

        if step.invalid_action {
            reward += cfg.invalid_action;
        } else if let Some(result) = step.agent_result {
            let team_of = |id: CombatantId| {
                step.before
                    .iter()
                    .find(|snapshot| snapshot.id == id)
                    .map(|snapshot| snapshot.team)
            };

            let mut damage = 0;
            let mut healing = 0;
            let mut kills = 0;
            for outcome in &result.targets {
                if team_of(outcome.target) == Some(team) {
                    healing += outcome.healing;
                } else {
                    damage += outcome.damage;
                    kills += u32::from(outcome.defeated);
                }
            }

            reward += cfg.damage_factor * damage as f32;
            reward += cfg.healing_factor * healing as f32;
            reward += cfg.kill_bonus * kills as f32;
            reward += cfg.effect_applied * result.effects_applied() as f32;

            let impact = damage + 2 * healing;
            if let Some((_, cost)) = result.paid.filter(|&(_, cost)| cost > 0 && impact > 0) {
                reward += cfg.resource_efficiency * impact as f32 / cost as f32;
            }
        }

        let allies_lost = step
            .before
            .iter()
            .filter(|before| before.team == team && before.id != step.agent && before.is_alive())
            .filter(|before| {
                step.after
                    .iter()
                    .any(|after| after.id == before.id && !after.is_alive())
            })
            .count();
        reward += cfg.ally_death * allies_lost as f32;

        match step.outcome {
            Some(EpisodeOutcome::Victory) if !step.invalid_action => {
                let survivors = step
                    .after
                    .iter()
                    .filter(|after| after.team == team && after.id != step.agent && after.is_alive())
                    .count();
                let unused = if step.max_rounds == 0 {
                    0.0
                } else {
                    step.max_rounds.saturating_sub(step.round) as f32 / step.max_rounds as f32
                };
                reward += cfg.victory
                    + cfg.surviving_ally_bonus * survivors as f32
                    + cfg.round_efficiency_bonus * unused;
            }
            Some(EpisodeOutcome::Victory) | None => {}
            Some(EpisodeOutcome::Defeat) => {
                let opponents_down = step
                    .after
                    .iter()
                    .filter(|after| after.team != team && !after.is_alive())
                    .count();
                reward += cfg.defeat + cfg.defeated_enemy_bonus * opponents_down as f32;
            }
            Some(EpisodeOutcome::Truncated) => reward += cfg.truncation,
        }

        reward
    }
}
