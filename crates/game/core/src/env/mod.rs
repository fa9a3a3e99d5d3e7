//! Traits describing read-only encounter data.
//!
//! Oracles expose content definitions, balance tables and randomness. The
//! [`Env`] aggregate bundles them so the resolver and the decision layer can
//! access everything they need without hard coupling to concrete
//! implementations.
mod definitions;
mod error;
mod rng;
mod skills;
mod tables;
mod templates;

pub use definitions::{DefinitionCatalog, DefinitionsOracle};
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, RollContext, RollSeed, compute_seed};
pub use skills::{
    AppliedEffect, DamageEffect, HealEffect, SkillCost, SkillDefinition, SkillEffect, SkillTraits,
    TagBonus, TargetType,
};
pub use tables::{
    BalanceTables, CombatParams, DamageParams, HitChanceParams, ProgressionParams, TablesOracle,
};
pub use templates::{CombatantTemplate, CombatantTemplateBuilder, EncounterSpec};

/// Aggregates read-only oracles required by combat resolution.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, D, T, R>
where
    D: DefinitionsOracle + ?Sized,
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    definitions: Option<&'a D>,
    tables: Option<&'a T>,
    rng: Option<&'a R>,
}

pub type CombatEnv<'a> =
    Env<'a, dyn DefinitionsOracle + 'a, dyn TablesOracle + 'a, dyn RngOracle + 'a>;

impl<'a, D, T, R> Env<'a, D, T, R>
where
    D: DefinitionsOracle + ?Sized,
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(definitions: Option<&'a D>, tables: Option<&'a T>, rng: Option<&'a R>) -> Self {
        Self {
            definitions,
            tables,
            rng,
        }
    }

    pub fn with_all(definitions: &'a D, tables: &'a T, rng: &'a R) -> Self {
        Self::new(Some(definitions), Some(tables), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            definitions: None,
            tables: None,
            rng: None,
        }
    }

    /// Returns the DefinitionsOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::DefinitionsNotAvailable` if no definitions oracle was provided.
    pub fn definitions(&self) -> Result<&'a D, OracleError> {
        self.definitions.ok_or(OracleError::DefinitionsNotAvailable)
    }

    /// Returns the TablesOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TablesNotAvailable` if no tables oracle was provided.
    pub fn tables(&self) -> Result<&'a T, OracleError> {
        self.tables.ok_or(OracleError::TablesNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Looks up a skill definition.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SkillNotFound` when the repository has no such id.
    pub fn skill(&self, id: &str) -> Result<&'a SkillDefinition, OracleError> {
        self.definitions()?
            .skill(id)
            .ok_or_else(|| OracleError::SkillNotFound(id.to_owned()))
    }
}

impl<'a, D, T, R> Env<'a, D, T, R>
where
    D: DefinitionsOracle + 'a,
    T: TablesOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `CombatEnv` (borrows self).
    pub fn as_combat_env(&self) -> CombatEnv<'a> {
        let definitions: Option<&'a dyn DefinitionsOracle> =
            self.definitions.map(|definitions| definitions as _);
        let tables: Option<&'a dyn TablesOracle> = self.tables.map(|tables| tables as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(definitions, tables, rng)
    }
}
