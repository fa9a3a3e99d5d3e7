//! Driver configuration read from the environment.
use std::env;
use std::path::PathBuf;

use crate::policy::PolicyKind;

/// Settings for a batch of episodes.
///
/// Values left unset keep the `[env]` section of `config.toml` in charge.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub episodes: u32,
    pub seed: Option<u64>,
    pub max_rounds: Option<u32>,
    pub curriculum_level: Option<usize>,
    pub policy: PolicyKind,
    /// Print every step's info as JSON lines on stdout.
    pub json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: combat_content::default_data_dir(),
            episodes: 1,
            seed: None,
            max_rounds: None,
            curriculum_level: None,
            policy: PolicyKind::Random,
            json: false,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_DATA_DIR` - Directory with the content files (default: bundled data)
    /// - `ARENA_EPISODES` - Episodes to play (default: 1)
    /// - `ARENA_SEED` - Base seed; episode `n` uses `seed + n`
    /// - `ARENA_MAX_ROUNDS` - Round limit per episode
    /// - `ARENA_CURRICULUM_LEVEL` - Encounter index in the curriculum
    /// - `ARENA_POLICY` - `random` or `greedy` (default: random)
    /// - `ARENA_JSON` - `true` to emit step info as JSON lines
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("ARENA_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(episodes) = read_env::<u32>("ARENA_EPISODES") {
            config.episodes = episodes.max(1);
        }
        config.seed = read_env("ARENA_SEED");
        config.max_rounds = read_env("ARENA_MAX_ROUNDS");
        config.curriculum_level = read_env("ARENA_CURRICULUM_LEVEL");
        if let Ok(name) = env::var("ARENA_POLICY") {
            match name.parse() {
                Ok(policy) => config.policy = policy,
                Err(_) => tracing::warn!("unknown policy '{}', falling back to random", name),
            }
        }
        config.json = read_env("ARENA_JSON").unwrap_or(false);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
