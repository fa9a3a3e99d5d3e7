//! Data-driven content definitions and loaders.
//!
//! This crate reads the arena's static content from RON/TOML data files:
//! - Skill catalog (`skills.ron`)
//! - Character and opponent templates (`characters.ron`, `opponents.ron`)
//! - Curriculum encounters (`encounters.ron`)
//! - Balance tables (`tables.toml`)
//! - Game and runtime configuration (`config.toml`)
//!
//! Everything lands in a validated [`DefinitionCatalog`](combat_core::DefinitionCatalog)
//! that encounters borrow read-only. Content never appears in combat state.
//!
//! The default data set ships in this crate's `data/` directory; see
//! [`default_data_dir`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CombatantLoader, ConfigLoader, ContentFactory, EncounterLoader, LoadResult, SkillLoader,
    TablesLoader, validate_catalog,
};

/// Directory holding the bundled data files.
pub fn default_data_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
