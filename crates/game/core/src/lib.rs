//! Deterministic combat rules shared by the runtime, the content loaders and
//! offline tools.
//!
//! `combat-core` defines the canonical rules (attribute formulas, status
//! effects, skill resolution, turn order) and exposes pure APIs over an owned
//! [`Roster`]. Read-only data reaches the rules through the oracle traits in
//! [`env`]; no function here touches the filesystem or global state.
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod state;
pub mod stats;

pub use combat::{
    ActionFailure, AttackOutcome, CombatActionResult, CombatError, DamageType, TargetOutcome,
    initiative_order, resolve_skill,
};
pub use config::GameConfig;
pub use env::{
    AppliedEffect, BalanceTables, CombatEnv, CombatantTemplate, DamageEffect, DefinitionCatalog,
    DefinitionsOracle, EncounterSpec, Env, HealEffect, OracleError, PcgRng, RngOracle,
    RollContext, RollSeed, SkillCost, SkillDefinition, SkillEffect, SkillTraits, TablesOracle,
    TargetType,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use state::{
    CombatantId, CombatantState, HealthSnapshot, Roster, StatusEffect, StatusEffectKind,
    StatusEffects, Team,
};
pub use stats::{Attribute, Attributes, ResourceKind, ResourceMaximums};
