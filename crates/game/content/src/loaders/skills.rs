//! Skill catalog loader.

use std::collections::HashSet;
use std::path::Path;

use combat_core::SkillDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillDefinition>,
}

/// Loader for the skill catalog.
pub struct SkillLoader;

impl SkillLoader {
    /// Load skills from a RON file.
    ///
    /// Fails on duplicate ids and on skills that declare no effects at all.
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillDefinition>> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for skill in &catalog.skills {
            if !seen.insert(skill.id.as_str()) {
                anyhow::bail!("Duplicate skill id '{}'", skill.id);
            }
            if skill.is_empty() {
                anyhow::bail!("Skill '{}' declares no effects", skill.id);
            }
        }

        Ok(catalog.skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{ResourceKind, SkillEffect, StatusEffectKind, TargetType};

    #[test]
    fn parses_damage_and_applied_effects() {
        let skills = SkillLoader::parse(
            r#"(
                skills: [
                    (
                        id: "ember",
                        name: "Ember",
                        cost: (resource: Some(MANA), amount: 4),
                        target_type: ENEMY_SINGLE,
                        effects: [Damage((damage_type: MAGICAL, base_damage: Some(6), scaling_attribute: Some(INT)))],
                        applies: [(effect: BURNING, duration: 2, potency: 2, chance: 50)],
                    ),
                ],
            )"#,
        )
        .unwrap();

        let ember = &skills[0];
        assert_eq!(ember.cost.requirement(), Some((ResourceKind::Mana, 4)));
        assert_eq!(ember.target_type, TargetType::EnemySingle);
        assert!(matches!(&ember.effects[0], SkillEffect::Damage(d) if d.multiplier == 1.0));
        assert_eq!(ember.applies[0].effect, StatusEffectKind::Burning);
        assert_eq!(ember.applies[0].chance, 50);
    }

    #[test]
    fn unknown_status_effect_fails() {
        let err = SkillLoader::parse(
            r#"(skills: [(id: "x", name: "X", target_type: ENEMY_SINGLE,
                applies: [(effect: FROZEN, duration: 1, potency: 1)])])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to parse skill catalog RON"));
    }

    #[test]
    fn unknown_resource_type_fails() {
        let result = SkillLoader::parse(
            r#"(skills: [(id: "x", name: "X", target_type: SELF,
                cost: (resource: Some(RAGE), amount: 3),
                effects: [Heal((base_heal: 3))])])"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_and_empty_skills_fail() {
        let duplicate = SkillLoader::parse(
            r#"(skills: [
                (id: "a", name: "A", target_type: SELF, effects: [Heal((base_heal: 1))]),
                (id: "a", name: "A", target_type: SELF, effects: [Heal((base_heal: 1))]),
            ])"#,
        );
        assert!(duplicate.unwrap_err().to_string().contains("Duplicate"));

        let empty = SkillLoader::parse(r#"(skills: [(id: "a", name: "A", target_type: SELF)])"#);
        assert!(empty.unwrap_err().to_string().contains("no effects"));
    }
}
