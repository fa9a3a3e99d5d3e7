//! Combat resolution system.
//!
//! This module resolves skill uses against a [`Roster`](crate::state::Roster).
//! Randomness comes only from the [`RngOracle`](crate::env::RngOracle) in the
//! environment, keyed by a [`RollSeed`](crate::env::RollSeed), so resolution
//! is reproducible.
//!
//! # Core Functions
//!
//! - `resolve_skill`: cost gate, hit roll, damage, healing, effects, experience
//! - `initiative_order`: per-round turn order
//! - `mitigate`: defense subtraction with penetration

pub mod damage;
pub mod error;
pub mod hit;
pub mod resolve;
pub mod result;
pub mod turns;

pub use damage::{DamageType, critical_damage, mitigate};
pub use error::CombatError;
pub use hit::{check_hit, skill_hit_chance};
pub use resolve::resolve_skill;
pub use result::{ActionFailure, AttackOutcome, CombatActionResult, TargetOutcome};
pub use turns::initiative_order;
