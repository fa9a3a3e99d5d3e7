//! Game configuration loader.
//!
//! `config.toml` is split into sections. `[game]` holds the core
//! [`GameConfig`]; other sections (`[env]`, `[reward]`, `[ai]`) belong to the
//! runtime and are read with [`ConfigLoader::load_section`].

use std::path::Path;

use combat_core::GameConfig;
use serde::de::DeserializeOwned;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the `[game]` section. A missing section yields the defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        Self::load_section(path, "game")
    }

    /// Load one named section of a TOML file into `T`.
    ///
    /// A missing section yields `T::default()`.
    pub fn load_section<T>(path: &Path, section: &str) -> LoadResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let content = read_file(path)?;
        Self::parse_section(&content, section)
    }

    pub fn parse_section<T>(content: &str, section: &str) -> LoadResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let mut table: toml::Table = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        match table.remove(section) {
            Some(value) => value.try_into().map_err(|e| {
                anyhow::anyhow!("Failed to parse config section [{}]: {}", section, e)
            }),
            None => Ok(T::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_section_and_missing_section() {
        let content = r#"
            [game]
            basic_attack_skill = "punch"

            [env]
            max_rounds = 20
        "#;
        let game: GameConfig = ConfigLoader::parse_section(content, "game").unwrap();
        assert_eq!(game.basic_attack(), Some("punch"));

        let missing: GameConfig = ConfigLoader::parse_section("", "game").unwrap();
        assert_eq!(missing, GameConfig::default());
    }

    #[test]
    fn malformed_section_reports_its_name() {
        let err = ConfigLoader::parse_section::<GameConfig>("[game]\nbasic_attack_skill = 3", "game")
            .unwrap_err();
        assert!(err.to_string().contains("[game]"));
    }
}
