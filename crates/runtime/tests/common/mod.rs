#![allow(dead_code)]

use arena_runtime::{ArenaEnv, EnvConfig, OracleManager, RewardConfig};
use combat_content::ContentFactory;
use combat_core::{
    AppliedEffect, BalanceTables, CombatantTemplate, DamageEffect, DamageType, DefinitionCatalog,
    EncounterSpec, GameConfig, HealEffect, ResourceKind, ResourceMaximums, SkillDefinition,
    SkillEffect, StatusEffectKind, TargetType,
};

/// Small hand-built catalog:
///
/// * `stalemate`: two 500 HP brawlers that cannot finish each other quickly.
/// * `rat_hole`: the hero against a single fragile rat.
/// * `bonfire`: a pyromancer whose only skill sets the rat on fire.
pub fn arena_catalog() -> DefinitionCatalog {
    DefinitionCatalog::new()
        .with_skill(
            SkillDefinition::new("basic_attack_free", TargetType::EnemySingle).with_effect(
                SkillEffect::Damage(DamageEffect::new(DamageType::Physical, None)),
            ),
        )
        .with_skill(
            SkillDefinition::new("mend", TargetType::AllySingle)
                .with_cost(ResourceKind::Mana, 20)
                .with_effect(SkillEffect::Heal(HealEffect::new(10))),
        )
        .with_skill(
            SkillDefinition::new("ignite", TargetType::EnemySingle)
                .applying(AppliedEffect::new(StatusEffectKind::Burning, 2, 1000)),
        )
        .with_character(
            CombatantTemplate::builder("pyro")
                .base_health(500)
                .skill("ignite")
                .build(),
        )
        .with_character(
            CombatantTemplate::builder("hero")
                .base_health(500)
                .resources(ResourceMaximums {
                    mana: 30,
                    ..ResourceMaximums::default()
                })
                .primary_resource(ResourceKind::Mana)
                .skill("mend")
                .build(),
        )
        .with_opponent(
            CombatantTemplate::builder("dummy")
                .base_health(500)
                .strategy("basic_melee")
                .build(),
        )
        .with_opponent(
            CombatantTemplate::builder("rat")
                .base_health(1)
                .strategy("basic_melee")
                .build(),
        )
        .with_encounter(EncounterSpec::new("stalemate", "hero").with_opponent("dummy"))
        .with_encounter(EncounterSpec::new("rat_hole", "hero").with_opponent("rat"))
        .with_encounter(EncounterSpec::new("bonfire", "pyro").with_opponent("rat"))
}

pub fn arena_oracles() -> OracleManager {
    OracleManager::from((arena_catalog(), BalanceTables::default()))
}

/// Every reward term off except the ones a test switches back on.
pub fn silent_rewards() -> RewardConfig {
    RewardConfig {
        time_penalty: 0.0,
        invalid_action: 0.0,
        damage_factor: 0.0,
        healing_factor: 0.0,
        kill_bonus: 0.0,
        ally_death: 0.0,
        effect_applied: 0.0,
        resource_efficiency: 0.0,
        victory: 0.0,
        defeat: 0.0,
        truncation: 0.0,
        surviving_ally_bonus: 0.0,
        round_efficiency_bonus: 0.0,
        defeated_enemy_bonus: 0.0,
    }
}

pub fn arena_env(config: EnvConfig, rewards: RewardConfig) -> ArenaEnv {
    ArenaEnv::builder(arena_oracles())
        .env_config(config)
        .reward_config(rewards)
        .build()
        .expect("hand-built catalog has encounters")
}

/// Content shipped with `combat-content`.
pub struct Bundled {
    pub oracles: OracleManager,
    pub game: GameConfig,
    pub curriculum: Vec<String>,
}

pub fn bundled() -> Bundled {
    let factory = ContentFactory::new(combat_content::default_data_dir());
    let game = factory.load_config().expect("bundled config loads");
    let catalog = factory.load_catalog(&game).expect("bundled catalog loads");
    let tables = factory.load_tables().expect("bundled tables load");
    let curriculum = factory
        .load_encounters()
        .expect("bundled encounters load")
        .into_iter()
        .map(|encounter| encounter.id)
        .collect();

    Bundled {
        oracles: OracleManager::from((catalog, tables)),
        game,
        curriculum,
    }
}

/// Index of the first legal action in `mask`.
pub fn first_legal(mask: &[bool]) -> usize {
    mask.iter().position(|&legal| legal).unwrap_or(0)
}
