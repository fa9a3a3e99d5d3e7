use crate::state::StatusEffectKind;

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Skill every spawned combatant knows, appended after its template skills.
    /// An empty string disables the implicit skill.
    pub basic_attack_skill: String,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of skills a combatant can carry (and the codec's skill slots).
    pub const MAX_SKILLS: usize = 10;
    /// Allies besides the agent itself.
    pub const MAX_ALLIES: usize = 3;
    pub const MAX_OPPONENTS: usize = 6;
    /// One slot per effect kind: effects never stack, so the tracker never overflows.
    pub const MAX_STATUS_EFFECTS: usize = StatusEffectKind::ALL.len();

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASIC_ATTACK_SKILL: &'static str = "basic_attack_free";

    pub fn new() -> Self {
        Self {
            basic_attack_skill: Self::DEFAULT_BASIC_ATTACK_SKILL.to_owned(),
        }
    }

    pub fn with_basic_attack_skill(basic_attack_skill: impl Into<String>) -> Self {
        Self {
            basic_attack_skill: basic_attack_skill.into(),
        }
    }

    /// Returns the implicit basic attack, if enabled.
    pub fn basic_attack(&self) -> Option<&str> {
        (!self.basic_attack_skill.is_empty()).then_some(self.basic_attack_skill.as_str())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
