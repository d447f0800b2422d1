//! Multi-agent environment trait and step types

use indexmap::IndexMap;
use ndarray::Array1;
use serde::Serialize;

use crate::{DictSpace, Result, Reward, RewardComponents};

/// Per-agent values, kept in the environment's agent order
pub type AgentMap<T> = IndexMap<String, T>;

/// Observation vector for one agent
pub type Observation = Array1<f64>;

/// Raw per-agent action vectors as supplied by a caller
pub type Actions = AgentMap<Vec<f64>>;

/// Opaque options accepted by `reset`
pub type ResetOptions = serde_json::Map<String, serde_json::Value>;

/// Information returned for each agent by `reset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetInfo {
    /// Episode step (always zero after a reset)
    pub step: u64,
    /// Seed the episode was started with
    pub seed: u64,
    /// Physics adapter step count
    pub physics_step: u64,
}

/// Information returned for each agent by `step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepInfo {
    /// How the reward was assembled
    pub reward_components: RewardComponents,
    /// Episode step after this step
    pub step: u64,
    /// Physics adapter step count after this step
    pub physics_step: u64,
}

/// Result of a single multi-agent environment step
#[derive(Debug, Clone, Serialize)]
pub struct MultiStep {
    /// Observation for each agent
    pub observations: AgentMap<Observation>,
    /// Reward for each agent
    pub rewards: AgentMap<Reward>,
    /// Whether each agent reached a terminal condition
    pub terminated: AgentMap<bool>,
    /// Whether each agent's episode was cut off by the step limit
    pub truncated: AgentMap<bool>,
    /// Additional info for each agent
    pub infos: AgentMap<StepInfo>,
}

impl MultiStep {
    /// Whether the episode ended for every agent
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.terminated
            .values()
            .zip(self.truncated.values())
            .all(|(terminated, truncated)| *terminated || *truncated)
    }
}

/// Core synchronous multi-agent environment trait
pub trait MultiAgentEnvironment {
    /// Agent identifiers in their fixed order
    fn agents(&self) -> &[String];

    /// Per-agent observation spaces
    fn observation_space(&self) -> &DictSpace;

    /// Per-agent action spaces
    fn action_space(&self) -> &DictSpace;

    /// Start a new episode, ending any episode in progress
    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> (AgentMap<Observation>, AgentMap<ResetInfo>);

    /// Apply one action per agent and advance the episode
    fn step(&mut self, actions: &Actions) -> Result<MultiStep>;

    /// Stop any running episode
    fn close(&mut self);
}
