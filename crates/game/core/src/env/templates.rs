//! Combatant templates and encounter definitions.
//!
//! This module provides `CombatantTemplate` for defining every participant
//! (player characters and opponents) in a data-driven way. Templates are
//! deserialized from RON files and spawned into `CombatantState` instances.

use crate::config::GameConfig;
use crate::state::{CombatantId, CombatantState, StatusEffects, Team, Vitals};
use crate::stats::{self, Attributes, ResourceKind, ResourceMaximums, ResourcePools};

use super::TablesOracle;

#[cfg(feature = "serde")]
fn first_level() -> u32 {
    1
}

/// Immutable description of a combatant.
///
/// The same shape serves player characters (looked up with
/// [`DefinitionsOracle::character`](super::DefinitionsOracle::character)) and
/// opponents ([`DefinitionsOracle::opponent`](super::DefinitionsOracle::opponent)).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantTemplate {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "first_level"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
    /// Health before the constitution contribution.
    pub base_health: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resources: ResourceMaximums,
    #[cfg_attr(feature = "serde", serde(default))]
    pub primary_resource: Option<ResourceKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub magic_resist: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp_reward: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    /// NPC strategy identifier (e.g., `"basic_melee"`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: Option<String>,
}

impl CombatantTemplate {
    /// Create a combatant from this template at full health and resources.
    ///
    /// `basic_attack` is appended to the skill list when not already known.
    /// Skills beyond [`GameConfig::MAX_SKILLS`] are dropped.
    pub fn spawn(
        &self,
        id: CombatantId,
        team: Team,
        basic_attack: Option<&str>,
        tables: &(impl TablesOracle + ?Sized),
    ) -> CombatantState {
        let mut skills = self.skills.clone();
        if let Some(basic) = basic_attack {
            if !skills.iter().any(|skill| skill == basic) {
                skills.push(basic.to_owned());
            }
        }
        if skills.len() > GameConfig::MAX_SKILLS {
            tracing::warn!(
                "template '{}' knows {} skills, keeping the first {}",
                self.id,
                skills.len(),
                GameConfig::MAX_SKILLS
            );
            skills.truncate(GameConfig::MAX_SKILLS);
        }

        let level = self.level.max(1);
        let max_hp = stats::max_health(self.base_health, self.attributes.con, tables);

        CombatantState {
            id,
            name: self.name.clone(),
            template_id: self.id.clone(),
            team,
            level,
            xp: 0,
            xp_to_next: stats::xp_to_next_level(level, tables),
            xp_reward: self.xp_reward,
            attributes: self.attributes,
            base_health: self.base_health,
            vitals: Vitals::full(max_hp),
            resources: ResourcePools::at_max(&self.resources),
            primary_resource: self.primary_resource,
            armor: self.armor,
            magic_resist: self.magic_resist,
            skills,
            tags: self.tags.clone(),
            strategy: self.strategy.clone(),
            status: StatusEffects::empty(),
        }
    }

    /// Create a builder for constructing templates
    pub fn builder(id: impl Into<String>) -> CombatantTemplateBuilder {
        CombatantTemplateBuilder::new(id)
    }
}

/// Builder for constructing combatant templates.
#[derive(Clone, Debug)]
pub struct CombatantTemplateBuilder {
    template: CombatantTemplate,
}

impl CombatantTemplateBuilder {
    fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            template: CombatantTemplate {
                name: id.clone(),
                id,
                level: 1,
                attributes: Attributes::default(),
                base_health: 50,
                resources: ResourceMaximums::default(),
                primary_resource: None,
                armor: 0,
                magic_resist: 0,
                skills: Vec::new(),
                xp_reward: 0,
                tags: Vec::new(),
                strategy: None,
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.template.name = name.into();
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.template.level = level;
        self
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.template.attributes = attributes;
        self
    }

    pub fn base_health(mut self, base_health: i32) -> Self {
        self.template.base_health = base_health;
        self
    }

    pub fn resources(mut self, resources: ResourceMaximums) -> Self {
        self.template.resources = resources;
        self
    }

    pub fn primary_resource(mut self, kind: ResourceKind) -> Self {
        self.template.primary_resource = Some(kind);
        self
    }

    pub fn armor(mut self, armor: i32) -> Self {
        self.template.armor = armor;
        self
    }

    pub fn magic_resist(mut self, magic_resist: i32) -> Self {
        self.template.magic_resist = magic_resist;
        self
    }

    pub fn skill(mut self, skill: impl Into<String>) -> Self {
        self.template.skills.push(skill.into());
        self
    }

    pub fn xp_reward(mut self, xp_reward: u32) -> Self {
        self.template.xp_reward = xp_reward;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.template.tags.push(tag.into());
        self
    }

    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.template.strategy = Some(strategy.into());
        self
    }

    pub fn build(self) -> CombatantTemplate {
        self.template
    }
}

/// One curriculum level: who fights on each side.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSpec {
    pub id: String,
    /// Character template controlled by the agent.
    pub hero: String,
    /// NPC-controlled character or opponent templates fighting with the hero.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allies: Vec<String>,
    pub opponents: Vec<String>,
}

impl EncounterSpec {
    pub fn new(id: impl Into<String>, hero: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hero: hero.into(),
            allies: Vec::new(),
            opponents: Vec::new(),
        }
    }

    pub fn with_ally(mut self, template: impl Into<String>) -> Self {
        self.allies.push(template.into());
        self
    }

    pub fn with_opponent(mut self, template: impl Into<String>) -> Self {
        self.opponents.push(template.into());
        self
    }
}
