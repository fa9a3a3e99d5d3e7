//! Balance tables loader.

use std::path::Path;

use combat_core::BalanceTables;

use crate::loaders::{LoadResult, read_file};

/// Loader for `tables.toml`.
///
/// Every key is optional; missing sections fall back to the built-in defaults.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<BalanceTables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BalanceTables> {
        let tables: BalanceTables = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables TOML: {}", e))?;

        let hit = tables.combat.hit_chance;
        if hit.min > hit.max {
            anyhow::bail!(
                "Hit chance bounds are inverted (min {} > max {})",
                hit.min,
                hit.max
            );
        }

        Ok(tables)
    }
}
