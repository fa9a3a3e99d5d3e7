//! Fixed-length observation vector for the learning agent.
//!
//! # Layout
//!
//! ```text
//! [ self block | ally blocks × max_allies | enemy blocks × max_enemies
//!   | skill blocks × max_skills | round progress ]
//!
//! combatant block (20 features):
//!   health fraction, primary resource fraction, level, alive,
//!   STR DEX INT CON WIS, armor, magic resist,
//!   one flag per status effect kind (9)
//!
//! skill block (2 features):
//!   usable, cost
//! ```
//!
//! Every feature is clamped to `[0, 1]`. Empty slots are zero blocks.
use combat_core::{Attribute, CombatantState, DefinitionsOracle, Roster, StatusEffectKind};
use serde::{Deserialize, Serialize};

use crate::codec::{ActionCodec, SlotLayout};

pub type Observation = Vec<f32>;

/// Reference maxima used for normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationConfig {
    pub max_level: u32,
    pub max_attribute: u32,
    pub max_defense: u32,
    pub max_cost: u32,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            max_level: 20,
            max_attribute: 30,
            max_defense: 20,
            max_cost: 50,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ObservationEncoder {
    codec: ActionCodec,
    config: ObservationConfig,
}

impl ObservationEncoder {
    pub const COMBATANT_FEATURES: usize = 11 + StatusEffectKind::ALL.len();
    pub const SKILL_FEATURES: usize = 2;
    pub const GLOBAL_FEATURES: usize = 1;

    pub fn new(codec: ActionCodec, config: ObservationConfig) -> Self {
        Self { codec, config }
    }

    /// Length of every vector this encoder produces.
    pub fn observation_size(&self) -> usize {
        self.codec.target_slots() * Self::COMBATANT_FEATURES
            + self.codec.max_skills * Self::SKILL_FEATURES
            + Self::GLOBAL_FEATURES
    }

    pub fn encode(
        &self,
        roster: &Roster,
        layout: &SlotLayout,
        definitions: &(impl DefinitionsOracle + ?Sized),
        round: u32,
        max_rounds: u32,
    ) -> Observation {
        let mut features = Vec::with_capacity(self.observation_size());
        let agent = roster.get(layout.agent());

        self.push_combatant(&mut features, agent);
        for index in 0..self.codec.max_allies {
            let ally = layout.allies().get(index).and_then(|id| roster.get(*id));
            self.push_combatant(&mut features, ally);
        }
        for index in 0..self.codec.max_enemies {
            let enemy = layout.enemies().get(index).and_then(|id| roster.get(*id));
            self.push_combatant(&mut features, enemy);
        }

        for index in 0..self.codec.max_skills {
            let skill = agent
                .and_then(|agent| agent.skills.get(index))
                .and_then(|id| definitions.skill(id));
            match (agent, skill) {
                (Some(agent), Some(skill)) => {
                    let usable = !skill.is_empty() && skill.is_affordable_by(agent);
                    features.push(flag(usable));
                    features.push(normalize(skill.cost.amount, self.config.max_cost));
                }
                _ => features.extend([0.0; Self::SKILL_FEATURES]),
            }
        }

        features.push(normalize(round, max_rounds));

        debug_assert_eq!(features.len(), self.observation_size());
        features
    }

    fn push_combatant(&self, features: &mut Vec<f32>, combatant: Option<&CombatantState>) {
        let Some(c) = combatant else {
            features.extend([0.0; Self::COMBATANT_FEATURES]);
            return;
        };

        features.push(c.health_fraction().clamp(0.0, 1.0));
        features.push(
            c.primary_pool()
                .map_or(0.0, |kind| c.resources.get(kind).fraction().clamp(0.0, 1.0)),
        );
        features.push(normalize(c.level, self.config.max_level));
        features.push(flag(c.is_alive()));

        for attribute in Attribute::ALL {
            features.push(normalize_signed(
                c.effective_attribute(attribute),
                self.config.max_attribute,
            ));
        }
        features.push(normalize_signed(c.effective_armor(), self.config.max_defense));
        features.push(normalize_signed(
            c.effective_magic_resist(),
            self.config.max_defense,
        ));

        for kind in StatusEffectKind::ALL {
            features.push(flag(c.has_status(kind)));
        }
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

/// `value / max` clamped to `[0, 1]`; 0 when `max` is 0.
fn normalize(value: u32, max: u32) -> f32 {
    if max == 0 {
        return 0.0;
    }
    (value as f32 / max as f32).clamp(0.0, 1.0)
}

fn normalize_signed(value: i32, max: u32) -> f32 {
    normalize(value.max(0) as u32, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        Attributes, BalanceTables, CombatantTemplate, DamageEffect, DamageType, DefinitionCatalog,
        ResourceKind, ResourceMaximums, SkillDefinition, SkillEffect, TargetType, Team,
    };

    fn setup() -> (Roster, DefinitionCatalog, SlotLayout, ActionCodec) {
        let codec = ActionCodec::new(2, 1, 2);
        let catalog = DefinitionCatalog::new().with_skill(
            SkillDefinition::new("bolt", TargetType::EnemySingle)
                .with_cost(ResourceKind::Mana, 25)
                .with_effect(SkillEffect::Damage(DamageEffect::new(DamageType::Magical, Some(5)))),
        );
        let tables = BalanceTables::default();
        let mut roster = Roster::new();
        let hero = CombatantTemplate::builder("hero")
            .attributes(Attributes::new(15, 12, 60, 10, 10))
            .resources(ResourceMaximums {
                mana: 50,
                ..ResourceMaximums::default()
            })
            .primary_resource(ResourceKind::Mana)
            .armor(5)
            .skill("bolt")
            .build()
            .spawn(roster.next_id(), Team::Heroes, None, &tables);
        let hero = roster.push(hero);
        let rat = CombatantTemplate::builder("rat")
            .build()
            .spawn(roster.next_id(), Team::Opponents, None, &tables);
        roster.push(rat);

        let layout = SlotLayout::from_roster(&roster, hero, &codec);
        (roster, catalog, layout, codec)
    }

    #[test]
    fn length_is_fixed() {
        let (roster, catalog, layout, codec) = setup();
        let encoder = ObservationEncoder::new(codec, ObservationConfig::default());
        // 4 slots × 20 + 2 skills × 2 + 1
        assert_eq!(encoder.observation_size(), 85);
        assert_eq!(encoder.encode(&roster, &layout, &catalog, 0, 100).len(), 85);
    }

    #[test]
    fn features_are_normalized_and_padded() {
        let (mut roster, catalog, layout, codec) = setup();
        let encoder = ObservationEncoder::new(codec, ObservationConfig::default());
        roster
            .get_mut(layout.agent())
            .unwrap()
            .pay(ResourceKind::Mana, 25);

        let obs = encoder.encode(&roster, &layout, &catalog, 25, 100);
        let block = ObservationEncoder::COMBATANT_FEATURES;

        assert_eq!(obs[0], 1.0); // health
        assert_eq!(obs[1], 0.5); // mana 25/50
        assert_eq!(obs[2], 0.05); // level 1/20
        assert_eq!(obs[3], 1.0); // alive
        assert_eq!(obs[4], 0.5); // STR 15/30
        assert_eq!(obs[6], 1.0); // INT 60/30 clamped
        assert_eq!(obs[9], 0.25); // armor 5/20

        // empty ally slot
        assert!(obs[block..2 * block].iter().all(|f| *f == 0.0));
        // first enemy is alive
        assert_eq!(obs[2 * block + 3], 1.0);

        let skills = 4 * block;
        assert_eq!(obs[skills], 1.0); // 25 mana left, bolt costs 25
        assert_eq!(obs[skills + 1], 0.5);
        assert_eq!(&obs[skills + 2..skills + 4], &[0.0, 0.0]);

        assert_eq!(obs[obs.len() - 1], 0.25);
        assert!(obs.iter().all(|f| (0.0..=1.0).contains(f)));
    }

    #[test]
    fn zero_maximum_never_divides() {
        assert_eq!(normalize(7, 0), 0.0);
        assert_eq!(normalize_signed(-3, 10), 0.0);
    }
}
