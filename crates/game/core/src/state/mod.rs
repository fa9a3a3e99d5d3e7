//! Mutable encounter state.
//!
//! A [`Roster`] owns every [`CombatantState`]; each combatant owns its
//! [`StatusEffects`]. Nothing here is shared between encounters.

mod combatant;
mod roster;
mod status;

pub use combatant::{CombatantId, CombatantState, DamageReceipt, Team, Vitals};
pub use roster::{HealthSnapshot, Roster};
pub use status::{
    ApplyOutcome, EffectDescriptor, ModifiedStat, StatShift, StatusEffect, StatusEffectKind,
    StatusEffects, TickReport,
};
