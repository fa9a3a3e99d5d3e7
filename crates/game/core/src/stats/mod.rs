//! Stat system for combatants.
//!
//! # Layers
//!
//! ```text
//! Attributes (stored)  ──►  model (pure formulas)  ──►  derived combat numbers
//!        │                         ▲
//!        └── status modifiers ─────┘
//! ResourcePools (stored current, template maximum)
//! ```
//!
//! Only attribute scores, current resources and current health are stored on a
//! combatant; everything else is recomputed from them when needed.

pub mod attributes;
pub mod model;
pub mod resources;

pub use attributes::{Attribute, Attributes};
pub use model::{
    accuracy, attribute_bonus, damage_reduction, evasion, hit_chance, hit_chance_override,
    initiative, max_health, scale_floor, xp_to_next_level,
};
pub use resources::{ResourceKind, ResourceMaximums, ResourcePool, ResourcePools};
