//! Shared read-only content for arena episodes.
//!
//! [`OracleManager`] bundles the definitions repository, the balance tables
//! and the RNG so the runtime can build [`combat_core::Env`] views on demand.
//! Content is immutable; cloning the manager shares it between environments
//! running side by side.
use std::sync::Arc;

use combat_core::{BalanceTables, DefinitionCatalog, Env, PcgRng};

pub type ArenaOracles<'a> = Env<'a, DefinitionCatalog, BalanceTables, PcgRng>;

#[derive(Clone, Debug)]
pub struct OracleManager {
    definitions: Arc<DefinitionCatalog>,
    tables: Arc<BalanceTables>,
    rng: PcgRng,
}

impl OracleManager {
    pub fn new(definitions: Arc<DefinitionCatalog>, tables: Arc<BalanceTables>) -> Self {
        Self {
            definitions,
            tables,
            rng: PcgRng,
        }
    }

    pub fn as_env(&self) -> ArenaOracles<'_> {
        Env::with_all(self.definitions.as_ref(), self.tables.as_ref(), &self.rng)
    }

    pub fn definitions(&self) -> &DefinitionCatalog {
        &self.definitions
    }

    pub fn tables(&self) -> &BalanceTables {
        &self.tables
    }
}

impl From<(DefinitionCatalog, BalanceTables)> for OracleManager {
    fn from((definitions, tables): (DefinitionCatalog, BalanceTables)) -> Self {
        Self::new(Arc::new(definitions), Arc::new(tables))
    }
}
