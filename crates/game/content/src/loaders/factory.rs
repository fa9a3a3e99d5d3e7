//! Content factory for building the definitions repository from data files.

use std::path::{Path, PathBuf};

use combat_core::{
    BalanceTables, CombatantTemplate, DefinitionCatalog, DefinitionsOracle, EncounterSpec,
    GameConfig, SkillDefinition,
};
use serde::de::DeserializeOwned;

use crate::loaders::{
    CombatantLoader, ConfigLoader, EncounterLoader, LoadResult, SkillLoader, TablesLoader,
};

/// Content factory that loads all arena content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── tables.toml
/// ├── skills.ron
/// ├── characters.ron
/// ├── opponents.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from the `[game]` section of `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load any other section of `config.toml` (runtime settings).
    pub fn load_config_section<T>(&self, section: &str) -> LoadResult<T>
    where
        T: DeserializeOwned + Default,
    {
        ConfigLoader::load_section(&self.data_dir.join("config.toml"), section)
    }

    /// Load balance tables from `tables.toml`.
    pub fn load_tables(&self) -> LoadResult<BalanceTables> {
        TablesLoader::load(&self.data_dir.join("tables.toml"))
    }

    /// Load the skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillDefinition>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load player character templates from `characters.ron`.
    pub fn load_characters(&self) -> LoadResult<Vec<CombatantTemplate>> {
        CombatantLoader::load(&self.data_dir.join("characters.ron"))
    }

    /// Load opponent templates from `opponents.ron`.
    pub fn load_opponents(&self) -> LoadResult<Vec<CombatantTemplate>> {
        CombatantLoader::load(&self.data_dir.join("opponents.ron"))
    }

    /// Load curriculum encounters from `encounters.ron`, in curriculum order.
    pub fn load_encounters(&self) -> LoadResult<Vec<EncounterSpec>> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Load every definition into one validated catalog.
    ///
    /// # Errors
    ///
    /// Fails if any file fails to load, an id is defined twice within one
    /// kind, or [`validate_catalog`] finds a dangling reference.
    pub fn load_catalog(&self, config: &GameConfig) -> LoadResult<DefinitionCatalog> {
        let mut catalog = DefinitionCatalog::new();

        for skill in self.load_skills()? {
            catalog.insert_skill(skill);
        }
        for template in self.load_characters()? {
            let id = template.id.clone();
            if catalog.insert_character(template).is_some() {
                anyhow::bail!("Duplicate character template '{}'", id);
            }
        }
        for template in self.load_opponents()? {
            let id = template.id.clone();
            if catalog.insert_opponent(template).is_some() {
                anyhow::bail!("Duplicate opponent template '{}'", id);
            }
        }
        for encounter in self.load_encounters()? {
            let id = encounter.id.clone();
            if catalog.insert_encounter(encounter).is_some() {
                anyhow::bail!("Duplicate encounter '{}'", id);
            }
        }

        validate_catalog(&catalog, config)?;

        tracing::info!(
            "loaded {} skills, {} characters, {} opponents, {} encounters from {}",
            catalog.skills().count(),
            catalog.characters().count(),
            catalog.opponents().count(),
            catalog.encounters().count(),
            self.data_dir.display()
        );

        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Check cross references inside a catalog.
///
/// * The configured basic attack exists.
/// * Every skill a template lists exists.
/// * Every encounter references an existing character as hero, and existing
///   templates as allies and opponents.
pub fn validate_catalog(catalog: &DefinitionCatalog, config: &GameConfig) -> LoadResult<()> {
    if let Some(basic) = config.basic_attack() {
        if catalog.skill(basic).is_none() {
            anyhow::bail!("Basic attack skill '{}' is not defined", basic);
        }
    }

    for template in catalog.characters().chain(catalog.opponents()) {
        if let Some(missing) = template
            .skills
            .iter()
            .find(|skill| catalog.skill(skill).is_none())
        {
            anyhow::bail!(
                "Template '{}' references unknown skill '{}'",
                template.id,
                missing
            );
        }
    }

    for encounter in catalog.encounters() {
        if catalog.character(&encounter.hero).is_none() {
            anyhow::bail!(
                "Encounter '{}' uses unknown hero '{}'",
                encounter.id,
                encounter.hero
            );
        }
        if let Some(missing) = encounter
            .allies
            .iter()
            .chain(&encounter.opponents)
            .find(|id| catalog.combatant(id).is_none())
        {
            anyhow::bail!(
                "Encounter '{}' references unknown template '{}'",
                encounter.id,
                missing
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    const SKILLS: &str = r#"(skills: [
        (id: "basic_attack_free", name: "Attack", target_type: ENEMY_SINGLE,
         effects: [Damage((damage_type: PHYSICAL, base_damage: None, scaling_attribute: Some(STR)))]),
    ])"#;

    const CHARACTERS: &str = r#"(templates: [
        (id: "hero", name: "Hero", base_health: 30, skills: []),
    ])"#;

    const OPPONENTS: &str = r#"(templates: [
        (id: "rat", name: "Rat", base_health: 5, skills: [], strategy: Some("basic_melee")),
    ])"#;

    fn write_data(dir: &Path, encounters: &str) {
        fs::write(dir.join("skills.ron"), SKILLS).unwrap();
        fs::write(dir.join("characters.ron"), CHARACTERS).unwrap();
        fs::write(dir.join("opponents.ron"), OPPONENTS).unwrap();
        fs::write(dir.join("encounters.ron"), encounters).unwrap();
        fs::write(dir.join("tables.toml"), "").unwrap();
        fs::write(dir.join("config.toml"), "[game]\n").unwrap();
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_valid_directory() {
        let dir = TempDir::new().unwrap();
        write_data(
            dir.path(),
            r#"(encounters: [(id: "intro", hero: "hero", opponents: ["rat", "rat"])])"#,
        );

        let factory = ContentFactory::new(dir.path());
        let config = factory.load_config().unwrap();
        let catalog = factory.load_catalog(&config).unwrap();

        assert!(catalog.character("hero").is_some());
        assert_eq!(catalog.encounter("intro").unwrap().opponents.len(), 2);
        assert_eq!(factory.load_tables().unwrap(), BalanceTables::default());
    }

    #[test]
    fn dangling_encounter_reference_fails() {
        let dir = TempDir::new().unwrap();
        write_data(
            dir.path(),
            r#"(encounters: [(id: "intro", hero: "hero", opponents: ["dragon"])])"#,
        );

        let factory = ContentFactory::new(dir.path());
        let err = factory.load_catalog(&GameConfig::default()).unwrap_err();
        assert!(err.to_string().contains("dragon"));
    }

    #[test]
    fn missing_basic_attack_fails() {
        let catalog = DefinitionCatalog::new();
        let config = GameConfig::with_basic_attack_skill("kick");
        assert!(validate_catalog(&catalog, &config).is_err());
        assert!(validate_catalog(&catalog, &GameConfig::with_basic_attack_skill("")).is_ok());
    }

    #[test]
    fn bundled_data_loads() {
        let factory = ContentFactory::new(crate::default_data_dir());
        let config = factory.load_config().unwrap();
        let catalog = factory.load_catalog(&config).unwrap();
        assert!(catalog.encounters().count() >= 3);
        factory.load_tables().unwrap();
    }
}
