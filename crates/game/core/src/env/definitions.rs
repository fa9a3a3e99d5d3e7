//! Definitions repository oracle.
//!
//! The repository is handed to every encounter explicitly; there is no
//! process-wide template cache. Lookups return `Option` because a missing
//! definition is a content problem the caller degrades around, not a crash.

use std::collections::BTreeMap;

use super::{CombatantTemplate, EncounterSpec, SkillDefinition};

/// Read-only lookup of skills, characters, opponents and encounters by id.
pub trait DefinitionsOracle: Send + Sync {
    fn skill(&self, id: &str) -> Option<&SkillDefinition>;

    /// Player character template.
    fn character(&self, id: &str) -> Option<&CombatantTemplate>;

    fn opponent(&self, id: &str) -> Option<&CombatantTemplate>;

    fn encounter(&self, id: &str) -> Option<&EncounterSpec>;

    /// Character first, then opponent.
    fn combatant(&self, id: &str) -> Option<&CombatantTemplate> {
        self.character(id).or_else(|| self.opponent(id))
    }
}

/// In-memory [`DefinitionsOracle`] backed by ordered maps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefinitionCatalog {
    skills: BTreeMap<String, SkillDefinition>,
    characters: BTreeMap<String, CombatantTemplate>,
    opponents: BTreeMap<String, CombatantTemplate>,
    encounters: BTreeMap<String, EncounterSpec>,
}

impl DefinitionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_skill(&mut self, skill: SkillDefinition) -> Option<SkillDefinition> {
        self.skills.insert(skill.id.clone(), skill)
    }

    pub fn insert_character(&mut self, template: CombatantTemplate) -> Option<CombatantTemplate> {
        self.characters.insert(template.id.clone(), template)
    }

    pub fn insert_opponent(&mut self, template: CombatantTemplate) -> Option<CombatantTemplate> {
        self.opponents.insert(template.id.clone(), template)
    }

    pub fn insert_encounter(&mut self, encounter: EncounterSpec) -> Option<EncounterSpec> {
        self.encounters.insert(encounter.id.clone(), encounter)
    }

    pub fn with_skill(mut self, skill: SkillDefinition) -> Self {
        self.insert_skill(skill);
        self
    }

    pub fn with_character(mut self, template: CombatantTemplate) -> Self {
        self.insert_character(template);
        self
    }

    pub fn with_opponent(mut self, template: CombatantTemplate) -> Self {
        self.insert_opponent(template);
        self
    }

    pub fn with_encounter(mut self, encounter: EncounterSpec) -> Self {
        self.insert_encounter(encounter);
        self
    }

    pub fn skills(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }

    pub fn characters(&self) -> impl Iterator<Item = &CombatantTemplate> {
        self.characters.values()
    }

    pub fn opponents(&self) -> impl Iterator<Item = &CombatantTemplate> {
        self.opponents.values()
    }

    pub fn encounters(&self) -> impl Iterator<Item = &EncounterSpec> {
        self.encounters.values()
    }
}

impl DefinitionsOracle for DefinitionCatalog {
    fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    fn character(&self, id: &str) -> Option<&CombatantTemplate> {
        self.characters.get(id)
    }

    fn opponent(&self, id: &str) -> Option<&CombatantTemplate> {
        self.opponents.get(id)
    }

    fn encounter(&self, id: &str) -> Option<&EncounterSpec> {
        self.encounters.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TargetType;

    #[test]
    fn lookups_miss_gracefully() {
        let catalog = DefinitionCatalog::new()
            .with_skill(SkillDefinition::new("jab", TargetType::EnemySingle))
            .with_opponent(CombatantTemplate::builder("goblin").build());

        assert!(catalog.skill("jab").is_some());
        assert!(catalog.skill("missing").is_none());
        assert!(catalog.character("goblin").is_none());
        assert!(catalog.opponent("goblin").is_some());
        assert_eq!(catalog.combatant("goblin").map(|t| t.id.as_str()), Some("goblin"));
    }
}
