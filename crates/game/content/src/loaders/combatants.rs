//! Character and opponent template loader.
//!
//! Characters and opponents share one file format; the factory decides which
//! side of the definitions repository a file feeds.

use std::path::Path;

use combat_core::CombatantTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Template catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub templates: Vec<CombatantTemplate>,
}

/// Loader for combatant templates from RON files.
pub struct CombatantLoader;

impl CombatantLoader {
    /// Load templates from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a TemplateCatalog
    pub fn load(path: &Path) -> LoadResult<Vec<CombatantTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<CombatantTemplate>> {
        let catalog: TemplateCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse template catalog RON: {}", e))?;

        for template in &catalog.templates {
            if template.base_health <= 0 && template.attributes.con <= 0 {
                tracing::warn!(
                    "template '{}' has no health source, it will spawn with 1 HP",
                    template.id
                );
            }
        }

        Ok(catalog.templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::ResourceKind;

    #[test]
    fn defaults_fill_optional_fields() {
        let templates = CombatantLoader::parse(
            r#"(templates: [
                (
                    id: "goblin",
                    name: "Goblin",
                    attributes: (STR: 12, DEX: 13, INT: 6, CON: 10, WIS: 8),
                    base_health: 15,
                    resources: (mana: 0, stamina: 20, energy: 0),
                    skills: ["stab"],
                    strategy: Some("basic_melee"),
                ),
            ])"#,
        )
        .unwrap();

        let goblin = &templates[0];
        assert_eq!(goblin.level, 1);
        assert_eq!(goblin.armor, 0);
        assert_eq!(goblin.resources.get(ResourceKind::Stamina), 20);
        assert_eq!(goblin.strategy.as_deref(), Some("basic_melee"));
        assert!(goblin.tags.is_empty());
    }
}
