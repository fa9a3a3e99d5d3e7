//! Oracle access errors.
//!
//! Errors related to oracle availability and definition lookups.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when accessing oracle data.
///
/// A missing oracle is fatal: the resolver cannot run without tables or
/// randomness. A missing definition is a content problem the caller may
/// choose to recover from.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("DefinitionsOracle not available")]
    DefinitionsNotAvailable,

    #[error("TablesOracle not available")]
    TablesNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("skill '{0}' not found")]
    SkillNotFound(String),

    #[error("character template '{0}' not found")]
    CharacterNotFound(String),

    #[error("opponent template '{0}' not found")]
    OpponentNotFound(String),

    #[error("encounter '{0}' not found")]
    EncounterNotFound(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            DefinitionsNotAvailable | TablesNotAvailable | RngNotAvailable => {
                ErrorSeverity::Fatal
            }
            SkillNotFound(_) | CharacterNotFound(_) | OpponentNotFound(_)
            | EncounterNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            DefinitionsNotAvailable => "ORACLE_DEFINITIONS_NOT_AVAILABLE",
            TablesNotAvailable => "ORACLE_TABLES_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            SkillNotFound(_) => "ORACLE_SKILL_NOT_FOUND",
            CharacterNotFound(_) => "ORACLE_CHARACTER_NOT_FOUND",
            OpponentNotFound(_) => "ORACLE_OPPONENT_NOT_FOUND",
            EncounterNotFound(_) => "ORACLE_ENCOUNTER_NOT_FOUND",
        }
    }
}
