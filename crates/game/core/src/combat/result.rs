//! Combat result types.

use crate::state::{CombatantId, StatusEffectKind};
use crate::stats::ResourceKind;

/// Outcome of one hit roll against one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    Hit,
    Critical,
}

impl AttackOutcome {
    pub const fn landed(self) -> bool {
        !matches!(self, Self::Miss)
    }
}

/// Why a skill use changed nothing.
///
/// These are ordinary game conditions, reported inside the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionFailure {
    ActorDefeated,
    TargetDefeated,
    InsufficientResource {
        kind: ResourceKind,
        required: u32,
        available: u32,
    },
}

/// Effect of the skill on a single target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: CombatantId,
    pub outcome: AttackOutcome,
    /// Health actually lost.
    pub damage: u32,
    /// Damage soaked by a shield.
    pub absorbed: u32,
    /// Health actually restored.
    pub healing: u32,
    /// Effects inserted or refreshed on the target.
    pub applied_effects: Vec<StatusEffectKind>,
    /// Target went from alive to defeated during this resolution.
    pub defeated: bool,
}

impl TargetOutcome {
    pub fn missed(target: CombatantId) -> Self {
        Self {
            target,
            outcome: AttackOutcome::Miss,
            damage: 0,
            absorbed: 0,
            healing: 0,
            applied_effects: Vec::new(),
            defeated: false,
        }
    }
}

/// Result of one skill use, consumed by the reward model and the session log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatActionResult {
    pub actor: CombatantId,
    /// Chosen target (the anchor for area skills).
    pub target: CombatantId,
    pub skill_id: String,
    /// Cost actually paid.
    pub paid: Option<(ResourceKind, u32)>,
    pub failure: Option<ActionFailure>,
    pub targets: Vec<TargetOutcome>,
    pub xp_awarded: u32,
    pub levels_gained: u32,
}

impl CombatActionResult {
    pub fn new(actor: CombatantId, target: CombatantId, skill_id: impl Into<String>) -> Self {
        Self {
            actor,
            target,
            skill_id: skill_id.into(),
            paid: None,
            failure: None,
            targets: Vec::new(),
            xp_awarded: 0,
            levels_gained: 0,
        }
    }

    pub fn failed(
        actor: CombatantId,
        target: CombatantId,
        skill_id: impl Into<String>,
        failure: ActionFailure,
    ) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new(actor, target, skill_id)
        }
    }

    /// The skill got past the liveness and cost gates.
    pub fn attempted(&self) -> bool {
        self.failure.is_none()
    }

    /// At least one target was hit.
    pub fn hit(&self) -> bool {
        self.targets.iter().any(|t| t.outcome.landed())
    }

    pub fn critical(&self) -> bool {
        self.targets
            .iter()
            .any(|t| t.outcome == AttackOutcome::Critical)
    }

    pub fn total_damage(&self) -> u32 {
        self.targets.iter().map(|t| t.damage).sum()
    }

    pub fn total_healing(&self) -> u32 {
        self.targets.iter().map(|t| t.healing).sum()
    }

    pub fn effects_applied(&self) -> usize {
        self.targets.iter().map(|t| t.applied_effects.len()).sum()
    }

    pub fn defeated_targets(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.targets.iter().filter(|t| t.defeated).map(|t| t.target)
    }
}
