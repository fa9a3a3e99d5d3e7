//! Common error infrastructure for combat-core.
//!
//! This module provides shared types and traits used across all error types in the
//! workspace. Domain-specific errors (e.g., `CombatError`, `OracleError`) are defined
//! in their respective modules alongside the operations they guard.
//!
//! # Design Principles
//!
//! - **Values for game conditions**: misses, unaffordable costs and dead targets are
//!   reported inside results, never as errors
//! - **Errors for defects**: unknown combatants, malformed skills and missing oracles
//!   are returned as `Err` and propagate to the caller
//! - **Severity Classification**: Errors are categorized for recovery strategies

use crate::state::CombatantId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: Conditions the caller can work around (e.g., pick another template)
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors indicating corrupted episode state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with alternative input.
    ///
    /// Examples: template missing from the definitions repository
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: action integer outside the action space
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: combatant id not present in the roster
    Internal,

    /// Fatal error - episode state corrupted, cannot continue.
    ///
    /// Examples: missing required oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Combatant that triggered the error (if applicable).
    pub actor: Option<CombatantId>,

    /// Round in which the error occurred.
    pub round: u32,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context for the given round.
    #[must_use]
    pub const fn new(round: u32) -> Self {
        Self {
            actor: None,
            round,
            message: None,
        }
    }

    /// Attaches an actor to this context (builder pattern).
    #[must_use]
    pub const fn with_actor(mut self, actor: CombatantId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Common trait for all workspace errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }

    #[test]
    fn context_builder_attaches_fields() {
        let ctx = ErrorContext::new(3)
            .with_actor(CombatantId(2))
            .with_message("turn order");
        assert_eq!(ctx.round, 3);
        assert_eq!(ctx.actor, Some(CombatantId(2)));
        assert_eq!(ctx.message, Some("turn order"));
    }
}
