//! Multi-agent environments for BJJSim
//!
//! This crate provides:
//! - [`EnvConfig`], the validated environment configuration
//! - [`BjjMultiAgentEnv`], the two-agent episodic environment scaffold
//! - [`TrackedEnvironment`], a wrapper recording episodes and run metrics

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod multi_agent;
pub mod tracking;

pub use config::{EnvConfig, EnvConfigBuilder};
pub use multi_agent::BjjMultiAgentEnv;
pub use tracking::{EpisodeRecord, RunMetrics, TrackedEnvironment};

// Re-export core types
pub use bjjsim_core::{
    Actions, AgentMap, BjjError, ContinuousSpace, DeterministicCounterAdapter, DictSpace,
    MultiAgentEnvironment, MultiStep, Observation, PhysicsAdapter, ResetInfo, ResetOptions,
    Result, Reward, RewardComponents, StepInfo,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{BjjMultiAgentEnv, EnvConfig, TrackedEnvironment};
    pub use bjjsim_core::prelude::*;
}
