//! Discrete action space for the learning agent.
//!
//! An action integer is split with a fixed radix:
//!
//! ```text
//! target_slots = 1 + max_allies + max_enemies
//! skill_index  = action / target_slots
//! target_slot  = action % target_slots
//!
//! slot 0                      → the agent itself
//! slot 1 ..= max_allies       → ally slots
//! slot max_allies + 1 ..      → enemy slots
//! ```
//!
//! Slots are bound to combatants once per episode by [`SlotLayout`], in roster
//! order, so an index keeps pointing at the same combatant while others die.
use combat_core::{
    CombatantId, CombatantState, DefinitionsOracle, ErrorSeverity, GameConfig, GameError, Roster,
    SkillDefinition,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("action {action} is outside the action space of size {size}")]
    ActionOutOfRange { action: usize, size: usize },
}

impl GameError for CodecError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActionOutOfRange { .. } => "CODEC_ACTION_OUT_OF_RANGE",
        }
    }
}

/// Target half of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSlot {
    Itself,
    Ally(usize),
    Enemy(usize),
}

/// A decoded, executable action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedAction {
    pub skill_index: usize,
    pub skill_id: String,
    pub target: CombatantId,
}

/// Binding of target slots to combatants for one episode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotLayout {
    agent: CombatantId,
    allies: Vec<CombatantId>,
    enemies: Vec<CombatantId>,
}

impl SlotLayout {
    /// Teammates and opponents of `agent` in roster order, capped at the
    /// codec capacities. Extra combatants get no slot.
    pub fn from_roster(roster: &Roster, agent: CombatantId, codec: &ActionCodec) -> Self {
        let Some(me) = roster.get(agent) else {
            return Self {
                agent,
                allies: Vec::new(),
                enemies: Vec::new(),
            };
        };

        let allies: Vec<_> = roster
            .team(me.team)
            .filter(|c| c.id != agent)
            .map(|c| c.id)
            .collect();
        let enemies: Vec<_> = roster.team(me.team.opposing()).map(|c| c.id).collect();

        if allies.len() > codec.max_allies || enemies.len() > codec.max_enemies {
            tracing::warn!(
                "{} allies and {} enemies exceed slot capacity {}/{}, extras are not targetable",
                allies.len(),
                enemies.len(),
                codec.max_allies,
                codec.max_enemies
            );
        }

        Self {
            agent,
            allies: allies.into_iter().take(codec.max_allies).collect(),
            enemies: enemies.into_iter().take(codec.max_enemies).collect(),
        }
    }

    pub fn agent(&self) -> CombatantId {
        self.agent
    }

    pub fn allies(&self) -> &[CombatantId] {
        &self.allies
    }

    pub fn enemies(&self) -> &[CombatantId] {
        &self.enemies
    }

    /// Combatant bound to `slot`, if any.
    pub fn resolve(&self, slot: TargetSlot) -> Option<CombatantId> {
        match slot {
            TargetSlot::Itself => Some(self.agent),
            TargetSlot::Ally(index) => self.allies.get(index).copied(),
            TargetSlot::Enemy(index) => self.enemies.get(index).copied(),
        }
    }
}

/// Fixed-radix mapping between action integers and (skill, target slot) pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCodec {
    pub max_skills: usize,
    pub max_allies: usize,
    pub max_enemies: usize,
}

impl Default for ActionCodec {
    fn default() -> Self {
        Self::new(
            GameConfig::MAX_SKILLS,
            GameConfig::MAX_ALLIES,
            GameConfig::MAX_OPPONENTS,
        )
    }
}

impl ActionCodec {
    pub const fn new(max_skills: usize, max_allies: usize, max_enemies: usize) -> Self {
        Self {
            max_skills,
            max_allies,
            max_enemies,
        }
    }

    pub const fn target_slots(&self) -> usize {
        1 + self.max_allies + self.max_enemies
    }

    pub const fn action_space_size(&self) -> usize {
        self.max_skills * self.target_slots()
    }

    /// Split an action into its skill index and target slot.
    ///
    /// # Errors
    ///
    /// [`CodecError::ActionOutOfRange`] when `action` is not in the action space.
    pub fn split(&self, action: usize) -> Result<(usize, TargetSlot), CodecError> {
        let size = self.action_space_size();
        if action >= size {
            return Err(CodecError::ActionOutOfRange { action, size });
        }

        let slots = self.target_slots();
        let skill_index = action / slots;
        let slot = action % slots;
        let target = if slot == 0 {
            TargetSlot::Itself
        } else if slot <= self.max_allies {
            TargetSlot::Ally(slot - 1)
        } else {
            TargetSlot::Enemy(slot - 1 - self.max_allies)
        };
        Ok((skill_index, target))
    }

    /// Inverse of [`split`](Self::split); `None` if either half is out of range.
    pub fn encode(&self, skill_index: usize, target: TargetSlot) -> Option<usize> {
        if skill_index >= self.max_skills {
            return None;
        }
        let slot = match target {
            TargetSlot::Itself => 0,
            TargetSlot::Ally(index) if index < self.max_allies => 1 + index,
            TargetSlot::Enemy(index) if index < self.max_enemies => 1 + self.max_allies + index,
            _ => return None,
        };
        Some(skill_index * self.target_slots() + slot)
    }

    /// Decode `action` for the agent into a concrete skill and target.
    ///
    /// `Ok(None)` means the action is not executable right now: empty skill
    /// slot, undefined skill, absent or defeated target, or a target slot the
    /// skill's target type does not allow. Affordability is left to the
    /// resolver and to [`legality_mask`](Self::legality_mask).
    ///
    /// # Errors
    ///
    /// [`CodecError::ActionOutOfRange`] when `action` is not in the action space.
    pub fn decode(
        &self,
        action: usize,
        roster: &Roster,
        layout: &SlotLayout,
        definitions: &(impl DefinitionsOracle + ?Sized),
    ) -> Result<Option<DecodedAction>, CodecError> {
        let (skill_index, slot) = self.split(action)?;

        let Some(agent) = roster.get(layout.agent()) else {
            return Ok(None);
        };
        let Some(skill_id) = agent.skills.get(skill_index) else {
            return Ok(None);
        };
        let Some(skill) = definitions.skill(skill_id) else {
            tracing::warn!("agent knows undefined skill '{}'", skill_id);
            return Ok(None);
        };

        Ok(self
            .target_for(agent, skill, slot, roster, layout)
            .map(|target| DecodedAction {
                skill_index,
                skill_id: skill.id.clone(),
                target,
            }))
    }

    /// Legality of every action integer for the agent.
    ///
    /// An action is legal when it decodes and the agent can pay for the skill.
    /// If nothing is legal, action 0 is marked legal so a policy always has a
    /// choice; stepping it is then penalized as invalid.
    pub fn legality_mask(
        &self,
        roster: &Roster,
        layout: &SlotLayout,
        definitions: &(impl DefinitionsOracle + ?Sized),
    ) -> Vec<bool> {
        let mut mask = vec![false; self.action_space_size()];

        if let Some(agent) = roster.get(layout.agent()) {
            for (skill_index, skill_id) in agent.skills.iter().take(self.max_skills).enumerate() {
                let Some(skill) = definitions.skill(skill_id) else {
                    continue;
                };
                if skill.is_empty() || !skill.is_affordable_by(agent) {
                    continue;
                }
                for slot in 0..self.target_slots() {
                    let action = skill_index * self.target_slots() + slot;
                    let Ok((_, target)) = self.split(action) else {
                        continue;
                    };
                    mask[action] = self
                        .target_for(agent, skill, target, roster, layout)
                        .is_some();
                }
            }
        }

        if !mask.iter().any(|legal| *legal) {
            if let Some(first) = mask.first_mut() {
                *first = true;
            }
        }
        mask
    }

    fn target_for(
        &self,
        agent: &CombatantState,
        skill: &SkillDefinition,
        slot: TargetSlot,
        roster: &Roster,
        layout: &SlotLayout,
    ) -> Option<CombatantId> {
        let allowed = match slot {
            TargetSlot::Itself => !skill.target_type.is_hostile(),
            TargetSlot::Ally(_) => {
                !skill.target_type.is_hostile() && !skill.target_type.is_self_only()
            }
            TargetSlot::Enemy(_) => skill.target_type.is_hostile(),
        };
        if !allowed || agent.is_defeated() {
            return None;
        }

        let target = layout.resolve(slot)?;
        roster
            .get(target)
            .filter(|combatant| combatant.is_alive())
            .map(|combatant| combatant.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        BalanceTables, CombatantTemplate, DamageEffect, DamageType, DefinitionCatalog, HealEffect,
        ResourceKind, ResourceMaximums, SkillEffect, TargetType, Team,
    };

    fn codec() -> ActionCodec {
        ActionCodec::new(3, 1, 2)
    }

    #[test]
    fn split_uses_fixed_radix() {
        let codec = codec();
        assert_eq!(codec.target_slots(), 4);
        assert_eq!(codec.action_space_size(), 12);

        assert_eq!(codec.split(0), Ok((0, TargetSlot::Itself)));
        assert_eq!(codec.split(1), Ok((0, TargetSlot::Ally(0))));
        assert_eq!(codec.split(3), Ok((0, TargetSlot::Enemy(1))));
        // 7 = 1 × 4 + 3
        assert_eq!(codec.split(7), Ok((1, TargetSlot::Enemy(1))));
        assert_eq!(
            codec.split(12),
            Err(CodecError::ActionOutOfRange { action: 12, size: 12 })
        );
    }

    #[test]
    fn encode_inverts_split() {
        let codec = codec();
        for action in 0..codec.action_space_size() {
            let (skill, slot) = codec.split(action).unwrap();
            assert_eq!(codec.encode(skill, slot), Some(action));
        }
        assert_eq!(codec.encode(3, TargetSlot::Itself), None);
        assert_eq!(codec.encode(0, TargetSlot::Ally(1)), None);
    }

    fn fixture() -> (Roster, DefinitionCatalog, CombatantId, CombatantId) {
        let catalog = DefinitionCatalog::new()
            .with_skill(
                SkillDefinition::new("strike", TargetType::EnemySingle).with_effect(
                    SkillEffect::Damage(DamageEffect::new(DamageType::Physical, Some(3))),
                ),
            )
            .with_skill(
                SkillDefinition::new("mend", TargetType::AllySingle)
                    .with_cost(ResourceKind::Mana, 10)
                    .with_effect(SkillEffect::Heal(HealEffect::new(5))),
            );
        let tables = BalanceTables::default();
        let mut roster = Roster::new();
        let hero = CombatantTemplate::builder("hero")
            .skill("strike")
            .skill("mend")
            .resources(ResourceMaximums {
                mana: 10,
                ..ResourceMaximums::default()
            })
            .build()
            .spawn(roster.next_id(), Team::Heroes, None, &tables);
        let hero = roster.push(hero);
        for _ in 0..2 {
            let rat = CombatantTemplate::builder("rat")
                .build()
                .spawn(roster.next_id(), Team::Opponents, None, &tables);
            roster.push(rat);
        }
        (roster, catalog, hero, CombatantId(2))
    }

    #[test]
    fn decode_checks_target_type_and_liveness() {
        let codec = codec();
        let (mut roster, catalog, hero, second_rat) = fixture();
        let layout = SlotLayout::from_roster(&roster, hero, &codec);
        assert_eq!(layout.enemies(), &[CombatantId(1), CombatantId(2)]);
        assert!(layout.allies().is_empty());

        // strike on enemy slot 1
        let decoded = codec.decode(3, &roster, &layout, &catalog).unwrap().unwrap();
        assert_eq!(decoded.skill_id, "strike");
        assert_eq!(decoded.target, second_rat);

        // strike on self, mend on an enemy, empty ally slot, empty skill slot
        assert_eq!(codec.decode(0, &roster, &layout, &catalog), Ok(None));
        assert_eq!(codec.decode(6, &roster, &layout, &catalog), Ok(None));
        assert_eq!(codec.decode(5, &roster, &layout, &catalog), Ok(None));
        assert_eq!(codec.decode(8, &roster, &layout, &catalog), Ok(None));

        // mend on self
        assert!(codec.decode(4, &roster, &layout, &catalog).unwrap().is_some());

        roster.get_mut(second_rat).unwrap().take_damage(999);
        assert_eq!(codec.decode(3, &roster, &layout, &catalog), Ok(None));
    }

    #[test]
    fn mask_tracks_affordability() {
        let codec = codec();
        let (mut roster, catalog, hero, _) = fixture();
        let layout = SlotLayout::from_roster(&roster, hero, &codec);

        let mask = codec.legality_mask(&roster, &layout, &catalog);
        assert_eq!(
            mask,
            vec![false, false, true, true, true, false, false, false, false, false, false, false]
        );

        roster.get_mut(hero).unwrap().pay(ResourceKind::Mana, 10);
        let mask = codec.legality_mask(&roster, &layout, &catalog);
        assert!(!mask[4]);
        assert!(mask[2] && mask[3]);
    }

    #[test]
    fn empty_mask_forces_first_action() {
        let codec = codec();
        let (mut roster, catalog, hero, _) = fixture();
        let layout = SlotLayout::from_roster(&roster, hero, &codec);
        roster.get_mut(hero).unwrap().take_damage(999);

        let mask = codec.legality_mask(&roster, &layout, &catalog);
        assert_eq!(mask.iter().filter(|legal| **legal).count(), 1);
        assert!(mask[0]);
    }

    #[test]
    fn unknown_agent_gets_an_empty_layout() {
        let codec = codec();
        let (roster, catalog, _, _) = fixture();
        let layout = SlotLayout::from_roster(&roster, CombatantId(9), &codec);
        assert_eq!(layout.agent(), CombatantId(9));
        assert!(layout.allies().is_empty());
        assert!(layout.enemies().is_empty());

        let mask = codec.legality_mask(&roster, &layout, &catalog);
        assert_eq!(mask.iter().filter(|legal| **legal).count(), 1);
    }
}
