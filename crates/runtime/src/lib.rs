//! Reinforcement-learning runtime for arena encounters.
//!
//! The crate turns the deterministic rules in `combat-core` into an episodic
//! environment an agent can be trained against.
//!
//! Modules are organized by responsibility:
//! - [`env`] hosts [`ArenaEnv`] and its `reset`/`step` protocol
//! - [`session`] plays rounds of a single encounter
//! - [`ai`] decides NPC turns by strategy
//! - [`codec`] maps action integers to skill/target pairs and builds masks
//! - [`observation`] and [`reward`] shape what the agent sees and earns
//! - [`oracle`] shares immutable content between environments
pub mod ai;
pub mod codec;
pub mod config;
pub mod env;
pub mod error;
pub mod observation;
pub mod oracle;
pub mod reward;
pub mod session;

pub use ai::{AiConfig, NpcDecision, NpcDispatcher, Strategy};
pub use codec::{ActionCodec, CodecError, DecodedAction, SlotLayout, TargetSlot};
pub use config::EnvConfig;
pub use env::{ArenaEnv, ArenaEnvBuilder, StepInfo, StepOutcome};
pub use error::{Result, RuntimeError};
pub use observation::{Observation, ObservationConfig, ObservationEncoder};
pub use oracle::{ArenaOracles, OracleManager};
pub use reward::{RewardConfig, RewardModel, StepSummary};
pub use session::{EncounterSession, EpisodeOutcome, RoundReport};
