//! Combat resolution errors.
//!
//! Only defects end up here. Misses, dead targets and unaffordable costs are
//! reported through [`ActionFailure`](super::ActionFailure).

use crate::env::OracleError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::CombatantId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("combatant {id} is not part of this encounter")]
    UnknownCombatant {
        id: CombatantId,
        context: ErrorContext,
    },

    #[error("skill '{skill}' has no effects to resolve")]
    EmptySkill {
        skill: String,
        context: ErrorContext,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CombatError {
    pub fn unknown_combatant(id: CombatantId, round: u32) -> Self {
        Self::UnknownCombatant {
            id,
            context: ErrorContext::new(round).with_actor(id),
        }
    }

    pub fn empty_skill(skill: impl Into<String>, actor: CombatantId, round: u32) -> Self {
        Self::EmptySkill {
            skill: skill.into(),
            context: ErrorContext::new(round)
                .with_actor(actor)
                .with_message("skill definition declares no effects"),
        }
    }
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCombatant { .. } => ErrorSeverity::Internal,
            Self::EmptySkill { .. } => ErrorSeverity::Validation,
            Self::Oracle(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::UnknownCombatant { context, .. } | Self::EmptySkill { context, .. } => {
                Some(context)
            }
            Self::Oracle(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCombatant { .. } => "COMBAT_UNKNOWN_COMBATANT",
            Self::EmptySkill { .. } => "COMBAT_EMPTY_SKILL",
            Self::Oracle(err) => err.error_code(),
        }
    }
}
