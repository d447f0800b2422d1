//! Environment configuration
//!
//! [`EnvConfig`] is immutable once built. Every construction path, including
//! deserialization, goes through [`EnvConfigBuilder::build`], so an invalid
//! configuration never exists as a value.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use bjjsim_core::{bounds_are_finite, BjjError, ContinuousSpace, Result};

/// Validated configuration for [`crate::BjjMultiAgentEnv`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnvConfigBuilder", into = "EnvConfigBuilder")]
pub struct EnvConfig {
    agent_names: Vec<String>,
    observation_dim: usize,
    observation_low: f64,
    observation_high: f64,
    action_dim: usize,
    action_low: f64,
    action_high: f64,
    max_episode_steps: u64,
    step_reward: f64,
    energy_penalty_scale: f64,
    physics_steps_per_action: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        let defaults = EnvConfigBuilder::default();
        Self {
            agent_names: defaults.agent_names,
            observation_dim: defaults.observation_dim,
            observation_low: defaults.observation_low,
            observation_high: defaults.observation_high,
            action_dim: defaults.action_dim,
            action_low: defaults.action_low,
            action_high: defaults.action_high,
            max_episode_steps: defaults.max_episode_steps,
            step_reward: defaults.step_reward,
            energy_penalty_scale: defaults.energy_penalty_scale,
            physics_steps_per_action: defaults.physics_steps_per_action,
        }
    }
}

impl EnvConfig {
    /// Start from the default configuration
    #[must_use]
    pub fn builder() -> EnvConfigBuilder {
        EnvConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration; omitted fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let builder: EnvConfigBuilder = serde_json::from_str(json)?;
        builder.build()
    }

    /// Load and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Agent identifiers in their fixed order
    #[must_use]
    pub fn agent_names(&self) -> &[String] {
        &self.agent_names
    }

    /// Length of each observation vector
    #[must_use]
    pub fn observation_dim(&self) -> usize {
        self.observation_dim
    }

    /// Lower observation bound
    #[must_use]
    pub fn observation_low(&self) -> f64 {
        self.observation_low
    }

    /// Upper observation bound
    #[must_use]
    pub fn observation_high(&self) -> f64 {
        self.observation_high
    }

    /// Length of each action vector
    #[must_use]
    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    /// Lower action bound
    #[must_use]
    pub fn action_low(&self) -> f64 {
        self.action_low
    }

    /// Upper action bound
    #[must_use]
    pub fn action_high(&self) -> f64 {
        self.action_high
    }

    /// Steps after which an episode is truncated
    #[must_use]
    pub fn max_episode_steps(&self) -> u64 {
        self.max_episode_steps
    }

    /// Constant reward granted per step
    #[must_use]
    pub fn step_reward(&self) -> f64 {
        self.step_reward
    }

    /// Multiplier applied to the action norm
    #[must_use]
    pub fn energy_penalty_scale(&self) -> f64 {
        self.energy_penalty_scale
    }

    /// Physics sub-steps per environment step
    #[must_use]
    pub fn physics_steps_per_action(&self) -> u64 {
        self.physics_steps_per_action
    }

    /// The space every agent's observations are drawn from
    pub fn observation_space(&self) -> Result<ContinuousSpace> {
        ContinuousSpace::new(self.observation_dim, self.observation_low, self.observation_high)
    }

    /// The space every agent's actions are clipped into
    pub fn action_space(&self) -> Result<ContinuousSpace> {
        ContinuousSpace::new(self.action_dim, self.action_low, self.action_high)
    }
}

/// Mutable staging area for an [`EnvConfig`]
///
/// Also the on-disk JSON shape: omitted fields take their defaults and
/// unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct EnvConfigBuilder {
    pub agent_names: Vec<String>,
    pub observation_dim: usize,
    pub observation_low: f64,
    pub observation_high: f64,
    pub action_dim: usize,
    pub action_low: f64,
    pub action_high: f64,
    pub max_episode_steps: u64,
    pub step_reward: f64,
    pub energy_penalty_scale: f64,
    pub physics_steps_per_action: u64,
}

impl Default for EnvConfigBuilder {
    fn default() -> Self {
        Self {
            agent_names: vec!["agent1".to_string(), "agent2".to_string()],
            observation_dim: 12,
            observation_low: -1000.0,
            observation_high: 1000.0,
            action_dim: 6,
            action_low: -1.0,
            action_high: 1.0,
            max_episode_steps: 200,
            step_reward: 0.1,
            energy_penalty_scale: 0.05,
            physics_steps_per_action: 1,
        }
    }
}

impl EnvConfigBuilder {
    /// Set the agent identifiers
    #[must_use]
    pub fn agent_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.agent_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the observation length and bounds
    #[must_use]
    pub fn observation(mut self, dim: usize, low: f64, high: f64) -> Self {
        self.observation_dim = dim;
        self.observation_low = low;
        self.observation_high = high;
        self
    }

    /// Set the action length and bounds
    #[must_use]
    pub fn action(mut self, dim: usize, low: f64, high: f64) -> Self {
        self.action_dim = dim;
        self.action_low = low;
        self.action_high = high;
        self
    }

    /// Set the episode step cap
    #[must_use]
    pub fn max_episode_steps(mut self, steps: u64) -> Self {
        self.max_episode_steps = steps;
        self
    }

    /// Set the constant per-step reward
    #[must_use]
    pub fn step_reward(mut self, reward: f64) -> Self {
        self.step_reward = reward;
        self
    }

    /// Set the energy penalty multiplier
    #[must_use]
    pub fn energy_penalty_scale(mut self, scale: f64) -> Self {
        self.energy_penalty_scale = scale;
        self
    }

    /// Set the physics sub-steps per environment step
    #[must_use]
    pub fn physics_steps_per_action(mut self, steps: u64) -> Self {
        self.physics_steps_per_action = steps;
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> Result<EnvConfig> {
        if self.agent_names.is_empty() {
            return Err(config_error("agent_names must contain at least one agent"));
        }
        if self.agent_names.iter().any(String::is_empty) {
            return Err(config_error("agent_names must not contain empty identifiers"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.agent_names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(BjjError::Configuration(format!(
                "agent_names must be unique, '{dup}' appears more than once"
            )));
        }
        if self.observation_dim == 0 {
            return Err(config_error("observation_dim must be positive"));
        }
        if self.action_dim == 0 {
            return Err(config_error("action_dim must be positive"));
        }
        if !(self.observation_low < self.observation_high) {
            return Err(config_error(
                "observation_low must be strictly less than observation_high",
            ));
        }
        if !(self.action_low < self.action_high) {
            return Err(config_error("action_low must be strictly less than action_high"));
        }
        if !bounds_are_finite(self.observation_low, self.observation_high) {
            return Err(config_error("observation bounds and their width must be finite"));
        }
        if !bounds_are_finite(self.action_low, self.action_high) {
            return Err(config_error("action bounds and their width must be finite"));
        }
        if self.max_episode_steps == 0 {
            return Err(config_error("max_episode_steps must be positive"));
        }
        if self.physics_steps_per_action == 0 {
            return Err(config_error("physics_steps_per_action must be positive"));
        }

        Ok(EnvConfig {
            agent_names: self.agent_names,
            observation_dim: self.observation_dim,
            observation_low: self.observation_low,
            observation_high: self.observation_high,
            action_dim: self.action_dim,
            action_low: self.action_low,
            action_high: self.action_high,
            max_episode_steps: self.max_episode_steps,
            step_reward: self.step_reward,
            energy_penalty_scale: self.energy_penalty_scale,
            physics_steps_per_action: self.physics_steps_per_action,
        })
    }
}

fn config_error(msg: &str) -> BjjError {
    BjjError::Configuration(msg.to_string())
}

impl TryFrom<EnvConfigBuilder> for EnvConfig {
    type Error = BjjError;

    fn try_from(builder: EnvConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

impl From<EnvConfig> for EnvConfigBuilder {
    fn from(config: EnvConfig) -> Self {
        Self {
            agent_names: config.agent_names,
            observation_dim: config.observation_dim,
            observation_low: config.observation_low,
            observation_high: config.observation_high,
            action_dim: config.action_dim,
            action_low: config.action_low,
            action_high: config.action_high,
            max_episode_steps: config.max_episode_steps,
            step_reward: config.step_reward,
            energy_penalty_scale: config.energy_penalty_scale,
            physics_steps_per_action: config.physics_steps_per_action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = EnvConfig::default();
        assert_eq!(EnvConfig::builder().build().unwrap(), config);
        assert_eq!(config.agent_names(), ["agent1", "agent2"]);
        assert_eq!(config.observation_dim(), 12);
        assert_eq!(config.action_dim(), 6);
        assert_eq!(config.max_episode_steps(), 200);
        assert_eq!(config.physics_steps_per_action(), 1);
    }

    #[test]
    fn test_rejects_invalid_fields() {
        let cases = [
            EnvConfig::builder().agent_names(Vec::<String>::new()),
            EnvConfig::builder().agent_names(["a", ""]),
            EnvConfig::builder().agent_names(["a", "a"]),
            EnvConfig::builder().observation(0, -1.0, 1.0),
            EnvConfig::builder().observation(4, 1.0, 1.0),
            EnvConfig::builder().action(0, -1.0, 1.0),
            EnvConfig::builder().action(2, 1.0, -1.0),
            EnvConfig::builder().action(2, f64::NAN, 1.0),
            EnvConfig::builder().action(2, -1.0, f64::INFINITY),
            EnvConfig::builder().observation(3, f64::NEG_INFINITY, f64::INFINITY),
            EnvConfig::builder().observation(12, -1e308, 1e308),
            EnvConfig::builder().max_episode_steps(0),
            EnvConfig::builder().physics_steps_per_action(0),
        ];
        for builder in cases {
            let err = builder.clone().build().unwrap_err();
            assert!(err.is_configuration(), "{builder:?} gave {err}");
        }
    }

    #[test]
    fn test_json_applies_defaults() {
        let config =
            EnvConfig::from_json_str(r#"{"max_episode_steps": 3, "physics_steps_per_action": 2}"#)
                .unwrap();
        let expected = EnvConfig::builder()
            .max_episode_steps(3)
            .physics_steps_per_action(2)
            .build()
            .unwrap();
        assert_eq!(config, expected);
    }

    #[test]
    fn test_json_rejects_unknown_and_invalid() {
        assert!(matches!(
            EnvConfig::from_json_str(r#"{"gravity": 9.8}"#),
            Err(BjjError::Serialization(_))
        ));
        assert!(EnvConfig::from_json_str(r#"{"action_dim": 0}"#)
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_serde_validates_through_builder() {
        let config = EnvConfig::builder().agent_names(["red", "blue"]).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EnvConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        assert!(serde_json::from_str::<EnvConfig>(r#"{"max_episode_steps": 0}"#).is_err());
    }
}
