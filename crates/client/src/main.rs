//! Arena client binary.
//!
//! Loads content from the data directory, builds an [`ArenaEnv`] and plays a
//! batch of episodes with a baseline policy, narrating every round.
//!
//! ```bash
//! ARENA_EPISODES=20 ARENA_POLICY=greedy RUST_LOG=arena_runtime=debug cargo run -p arena-client
//! ```
mod config;
mod narrate;
mod policy;

use anyhow::{Context, Result};
use arena_runtime::{AiConfig, ArenaEnv, EnvConfig, ObservationConfig, OracleManager, RewardConfig};
use combat_content::ContentFactory;

use config::ClientConfig;
use policy::Policy;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::info!("Loading content from {}", config.data_dir.display());

    let factory = ContentFactory::new(&config.data_dir);
    let game = factory.load_config().context("loading [game] config")?;
    let catalog = factory.load_catalog(&game).context("loading definitions")?;
    let tables = factory.load_tables().context("loading balance tables")?;

    let mut env_config: EnvConfig = factory.load_config_section("env")?;
    let rewards: RewardConfig = factory.load_config_section("reward")?;
    let ai: AiConfig = factory.load_config_section("ai")?;
    let observation: ObservationConfig = factory.load_config_section("observation")?;

    if env_config.curriculum.is_empty() {
        env_config.curriculum = factory
            .load_encounters()?
            .into_iter()
            .map(|encounter| encounter.id)
            .collect();
    }
    if let Some(max_rounds) = config.max_rounds {
        env_config.max_rounds = max_rounds;
    }
    if let Some(level) = config.curriculum_level {
        env_config.curriculum_level = level;
    }
    let base_seed = config.seed.unwrap_or(env_config.seed);

    let basic_attack = game.basic_attack().map(str::to_owned);
    let mut env = ArenaEnv::builder(OracleManager::from((catalog, tables)))
        .game_config(game)
        .env_config(env_config)
        .reward_config(rewards)
        .ai_config(ai)
        .observation_config(observation)
        .build()?;

    tracing::info!(
        "Arena ready: {} actions, {} observation features, curriculum {:?} at level {}",
        env.action_space_size(),
        env.observation_size(),
        env.curriculum(),
        env.curriculum_level()
    );

    let mut victories = 0;
    for episode in 0..config.episodes {
        let seed = base_seed.wrapping_add(u64::from(episode));
        let mut policy = Policy::new(config.policy, seed, basic_attack.as_deref());
        let (_, mut info) = env.reset(seed)?;
        println!("== episode {} ({}, seed {}) ==", episode + 1, info.encounter, seed);

        let mut total = 0.0;
        loop {
            let action = policy.act(&env, &info.action_mask);
            let step = env.step(action)?;
            total += step.reward;

            if let Some(session) = env.session() {
                for result in &step.info.results {
                    println!("  [{}] {}", step.info.round, narrate::describe(result, session.roster()));
                }
            }
            if config.json {
                println!("{}", step.info.to_json()?);
            }

            if step.terminated || step.truncated {
                let outcome = env
                    .session()
                    .and_then(|session| session.outcome())
                    .map_or_else(|| "unknown".to_owned(), |outcome| outcome.to_string());
                victories += u32::from(step.info.is_success);
                println!(
                    "== {} after {} rounds, return {:.2} ==",
                    outcome, step.info.round, total
                );
                break;
            }
            info = step.info;
        }
    }

    tracing::info!(
        "{} of {} episodes won with the {} policy",
        victories,
        config.episodes,
        config.policy
    );
    Ok(())
}
