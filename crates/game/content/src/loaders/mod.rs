//! Content loaders for reading game data from files.
//!
//! Each loader turns one RON/TOML file into combat-core types. Parse errors
//! carry the file kind in their message; unknown enum tags (resource kinds,
//! status effect ids, target types) fail the load.

pub mod combatants;
pub mod config;
pub mod encounters;
pub mod factory;
pub mod skills;
pub mod tables;

pub use combatants::CombatantLoader;
pub use config::ConfigLoader;
pub use encounters::EncounterLoader;
pub use factory::{ContentFactory, validate_catalog};
pub use skills::SkillLoader;
pub use tables::TablesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
