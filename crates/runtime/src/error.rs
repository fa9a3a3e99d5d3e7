//! Errors surfaced by the arena runtime.
//!
//! Expected game conditions (misses, invalid agent actions, NPCs with nothing
//! to do, truncation) never show up here; they are reported through
//! [`StepInfo`](crate::StepInfo) and the reward. What remains are content
//! misses the caller may recover from and contract violations.
use combat_core::{CombatError, ErrorSeverity, GameError, OracleError};
use thiserror::Error;

use crate::codec::CodecError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("character template '{0}' for the agent is not defined")]
    TemplateNotFound(String),

    #[error("encounter '{0}' has no opponent that could be spawned")]
    NoOpponents(String),

    #[error("no encounters are available for the curriculum")]
    EmptyCurriculum,

    #[error("episode is finished, call reset before stepping again")]
    EpisodeFinished,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TemplateNotFound(_) => ErrorSeverity::Recoverable,
            Self::NoOpponents(_) | Self::EmptyCurriculum | Self::EpisodeFinished => {
                ErrorSeverity::Validation
            }
            Self::Codec(err) => err.severity(),
            Self::Combat(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TemplateNotFound(_) => "RUNTIME_TEMPLATE_NOT_FOUND",
            Self::NoOpponents(_) => "RUNTIME_NO_OPPONENTS",
            Self::EmptyCurriculum => "RUNTIME_EMPTY_CURRICULUM",
            Self::EpisodeFinished => "RUNTIME_EPISODE_FINISHED",
            Self::Codec(err) => err.error_code(),
            Self::Combat(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
        }
    }
}
