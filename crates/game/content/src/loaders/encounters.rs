//! Curriculum encounter loader.

use std::path::Path;

use combat_core::EncounterSpec;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Encounter list for RON files. Order is curriculum order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterCatalog {
    pub encounters: Vec<EncounterSpec>,
}

/// Loader for curriculum encounters.
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EncounterSpec>> {
        let content = read_file(path)?;
        let catalog: EncounterCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter list RON: {}", e))?;

        if let Some(empty) = catalog.encounters.iter().find(|e| e.opponents.is_empty()) {
            anyhow::bail!("Encounter '{}' has no opponents", empty.id);
        }

        Ok(catalog.encounters)
    }
}
