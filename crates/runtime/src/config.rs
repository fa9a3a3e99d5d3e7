//! Episode-level settings for [`ArenaEnv`](crate::ArenaEnv).
use combat_core::GameConfig;
use serde::{Deserialize, Serialize};

use crate::codec::ActionCodec;

/// Episode limits, curriculum and slot capacities.
///
/// Loaded from the `[env]` section of `config.toml`; every field falls back to
/// its default when absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Rounds after which an undecided episode is truncated.
    pub max_rounds: u32,
    /// Index into `curriculum` used by the next reset.
    pub curriculum_level: usize,
    /// Encounter ids by curriculum level. Empty means every encounter in the
    /// definitions repository, in id order.
    pub curriculum: Vec<String>,
    /// Base seed; drivers derive per-episode seeds from it.
    pub seed: u64,
    pub max_skills: usize,
    pub max_allies: usize,
    pub max_opponents: usize,
}

impl EnvConfig {
    pub const DEFAULT_MAX_ROUNDS: u32 = 100;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_curriculum<I, S>(mut self, encounters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.curriculum = encounters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_curriculum_level(mut self, level: usize) -> Self {
        self.curriculum_level = level;
        self
    }

    pub fn codec(&self) -> ActionCodec {
        ActionCodec::new(self.max_skills, self.max_allies, self.max_opponents)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
            curriculum_level: 0,
            curriculum: Vec::new(),
            seed: 0,
            max_skills: GameConfig::MAX_SKILLS,
            max_allies: GameConfig::MAX_ALLIES,
            max_opponents: GameConfig::MAX_OPPONENTS,
        }
    }
}
