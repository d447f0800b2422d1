//! Core types and traits for BJJSim
//!
//! This crate provides the pieces every BJJSim environment is built from:
//! bounded continuous spaces, the physics adapter contract that stands in
//! for a real physics backend, reward decomposition, and the synchronous
//! multi-agent environment trait.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod environment;
pub mod error;
pub mod physics;
pub mod reward;
pub mod space;

// Re-export core traits and types
pub use environment::{
    AgentMap, Actions, MultiAgentEnvironment, MultiStep, Observation, ResetInfo, ResetOptions,
    StepInfo,
};
pub use error::{BjjError, Result};
pub use physics::{DeterministicCounterAdapter, PhysicsAdapter};
pub use reward::{Reward, RewardComponents};
pub use space::{bounds_are_finite, ContinuousSpace, DictSpace};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Actions, AgentMap, BjjError, ContinuousSpace, DictSpace, MultiAgentEnvironment, MultiStep,
        Observation, PhysicsAdapter, Result, Reward,
    };
}
