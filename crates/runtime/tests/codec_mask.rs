mod common;

use arena_runtime::{ArenaEnv, EnvConfig};
use combat_core::DefinitionsOracle;
use common::bundled;

#[test]
fn every_legal_action_decodes_to_an_affordable_skill() {
    let content = bundled();
    let definitions = content.oracles.clone();
    let mut env = ArenaEnv::builder(content.oracles)
        .game_config(content.game)
        .env_config(
            EnvConfig::new()
                .with_curriculum(content.curriculum)
                .with_max_rounds(12),
        )
        .build()
        .unwrap();

    for level in 0..env.curriculum().len() {
        env.set_curriculum_level(level);
        env.reset(100 + level as u64).unwrap();

        // Cycle through the legal actions so costly skills get spent.
        for turn in 0.. {
            let session = env.session().unwrap();
            let mask = env.action_mask();
            assert_eq!(mask.len(), env.action_space_size());

            let legal: Vec<usize> = (0..mask.len()).filter(|&action| mask[action]).collect();
            assert!(!legal.is_empty(), "mask is never empty");

            let agent = session.agent_state().unwrap();
            for &action in &legal {
                let decoded = env
                    .codec()
                    .decode(action, session.roster(), session.layout(), definitions.definitions())
                    .unwrap()
                    .unwrap_or_else(|| panic!("legal action {action} must decode"));
                let skill = definitions.definitions().skill(&decoded.skill_id).unwrap();
                assert!(skill.is_affordable_by(agent), "{} unaffordable", decoded.skill_id);
                assert!(session.roster().get(decoded.target).unwrap().is_alive());
            }

            let step = env.step(legal[turn % legal.len()]).unwrap();
            if step.terminated || step.truncated {
                break;
            }
        }
    }
}
