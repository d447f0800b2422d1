//! Two-agent episodic environment scaffold
//!
//! [`BjjMultiAgentEnv`] exposes symmetric agents driven by a
//! [`PhysicsAdapter`]. Observations encode the episode and physics step
//! counts plus seeded noise, and each agent is rewarded with a constant
//! step reward minus an energy penalty proportional to the L2 norm of its
//! clipped action.

use ndarray::Array1;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::{debug, info, trace};

use bjjsim_core::{
    Actions, AgentMap, BjjError, DeterministicCounterAdapter, DictSpace, MultiAgentEnvironment,
    MultiStep, Observation, PhysicsAdapter, ResetInfo, ResetOptions, Result, RewardComponents,
    StepInfo,
};

use crate::EnvConfig;

/// Auto-drawn seeds lie in `[0, 2^32)`
const AUTO_SEED_BOUND: u64 = 1 << 32;

/// Number of leading observation elements that carry step/agent structure
const STRUCTURED_OBS_DIMS: usize = 3;

/// Deterministic multi-agent environment over a pluggable physics adapter
#[derive(Debug)]
pub struct BjjMultiAgentEnv<P = DeterministicCounterAdapter> {
    config: EnvConfig,
    physics: P,
    agents: Vec<String>,
    observation_space: DictSpace,
    action_space: DictSpace,
    /// Draws seeds for resets without an explicit one; never reseeded
    seed_source: StdRng,
    /// Per-episode generator for observation noise
    rng: StdRng,
    last_seed: Option<u64>,
    episode_step: u64,
    total_steps: u64,
    episode_running: bool,
    last_actions: AgentMap<Array1<f64>>,
}

impl BjjMultiAgentEnv {
    /// Create an environment backed by the counter adapter
    pub fn new(config: EnvConfig) -> Result<Self> {
        Self::with_physics(config, DeterministicCounterAdapter::new())
    }
}

impl Default for BjjMultiAgentEnv {
    /// The default configuration with the counter adapter
    fn default() -> Self {
        Self::new(EnvConfig::default()).expect("default configuration is valid")
    }
}

impl<P: PhysicsAdapter> BjjMultiAgentEnv<P> {
    /// Create an environment backed by `physics`
    pub fn with_physics(config: EnvConfig, physics: P) -> Result<Self> {
        Self::with_seed_source(config, physics, StdRng::from_entropy())
    }

    /// Create an environment with an explicit generator for auto-drawn seeds
    pub fn with_seed_source(config: EnvConfig, physics: P, seed_source: StdRng) -> Result<Self> {
        let agents = config.agent_names().to_vec();
        let observation_space = DictSpace::uniform(agents.iter().cloned(), &config.observation_space()?)?;
        let action_space = DictSpace::uniform(agents.iter().cloned(), &config.action_space()?)?;
        let last_actions = zero_actions(&agents, config.action_dim());

        Ok(Self {
            config,
            physics,
            agents,
            observation_space,
            action_space,
            seed_source,
            rng: StdRng::seed_from_u64(0),
            last_seed: None,
            episode_step: 0,
            total_steps: 0,
            episode_running: false,
            last_actions,
        })
    }

    /// The configuration this environment was built from
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// The physics adapter used by the environment
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// The last seed applied via `reset`
    pub fn last_seed(&self) -> Option<u64> {
        self.last_seed
    }

    /// Number of steps taken in the current episode
    pub fn episode_step_count(&self) -> u64 {
        self.episode_step
    }

    /// Total steps executed across all episodes since construction
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Whether an episode is active and `step` may be called
    pub fn is_episode_running(&self) -> bool {
        self.episode_running
    }

    /// Clipped actions applied by the most recent step
    pub fn last_actions(&self) -> &AgentMap<Array1<f64>> {
        &self.last_actions
    }

    /// Start a new episode.
    ///
    /// Without a seed one is drawn from the instance's seed source, so
    /// consecutive unseeded resets get distinct seeds; reproducing an
    /// episode requires passing the seed explicitly.
    pub fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> (AgentMap<Observation>, AgentMap<ResetInfo>) {
        if let Some(options) = options {
            trace!(?options, "ignoring reset options");
        }
        let seed = seed.unwrap_or_else(|| self.seed_source.gen_range(0..AUTO_SEED_BOUND));

        self.rng = StdRng::seed_from_u64(seed);
        self.last_seed = Some(seed);
        self.episode_step = 0;
        self.episode_running = true;
        self.last_actions = zero_actions(&self.agents, self.config.action_dim());

        self.physics.reset(Some(seed));
        self.physics.start(Some(seed));
        debug!(seed, "episode reset");

        let observations = self.build_observations();
        let info = ResetInfo {
            step: self.episode_step,
            seed,
            physics_step: self.physics.step_count(),
        };
        let infos = self.agents.iter().map(|agent| (agent.clone(), info)).collect();
        (observations, infos)
    }

    /// Apply one action per agent and advance the episode.
    ///
    /// Fails with a usage error when no episode is running, and with a
    /// validation error when the actions do not cover exactly the configured
    /// agents or a vector has the wrong length. A failed call leaves the
    /// environment untouched.
    pub fn step(&mut self, actions: &Actions) -> Result<MultiStep> {
        if !self.episode_running {
            return Err(BjjError::Usage(
                "reset() must be called before step() and episode must be active".into(),
            ));
        }

        let processed = self.process_actions(actions)?;

        self.physics.step(self.config.physics_steps_per_action());
        self.episode_step += 1;
        self.total_steps += 1;

        let observations = self.build_observations();
        let physics_step = self.physics.step_count();

        let mut rewards = AgentMap::with_capacity(self.agents.len());
        let mut infos = AgentMap::with_capacity(self.agents.len());
        for (agent, action) in &processed {
            let components = RewardComponents::for_action(
                self.config.step_reward(),
                self.config.energy_penalty_scale(),
                action.view(),
            );
            rewards.insert(agent.clone(), components.total());
            infos.insert(
                agent.clone(),
                StepInfo {
                    reward_components: components,
                    step: self.episode_step,
                    physics_step,
                },
            );
        }
        self.last_actions = processed;

        let truncate = self.episode_step >= self.config.max_episode_steps();
        if truncate {
            self.episode_running = false;
            self.physics.stop();
            info!(
                steps = self.episode_step,
                seed = ?self.last_seed,
                "episode truncated at step limit"
            );
        } else {
            trace!(step = self.episode_step, physics_step, "environment stepped");
        }

        Ok(MultiStep {
            observations,
            rewards,
            terminated: self.agent_flags(false),
            truncated: self.agent_flags(truncate),
            infos,
        })
    }

    /// Step with actions encoded as a JSON object of agent id to number array.
    ///
    /// A payload that is not an object, or an agent entry that is not an
    /// array of numbers, is rejected as a validation error.
    pub fn step_json(&mut self, actions: &Value) -> Result<MultiStep> {
        let actions = parse_actions(actions)?;
        self.step(&actions)
    }

    /// Stop the physics adapter and end any running episode
    pub fn close(&mut self) {
        self.physics.stop();
        self.episode_running = false;
        debug!("environment closed");
    }

    fn process_actions(&self, actions: &Actions) -> Result<AgentMap<Array1<f64>>> {
        let same_agents = actions.len() == self.agents.len()
            && self.agents.iter().all(|agent| actions.contains_key(agent));
        if !same_agents {
            return Err(BjjError::Validation(
                "actions must provide exactly one entry per agent".into(),
            ));
        }

        self.agents
            .iter()
            .map(|agent| {
                let clipped = self.action_space[agent.as_str()]
                    .clip(&actions[agent])
                    .map_err(|err| {
                        BjjError::Validation(format!("invalid action for {agent}: {err}"))
                    })?;
                Ok::<_, BjjError>((agent.clone(), clipped))
            })
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn build_observations(&mut self) -> AgentMap<Observation> {
        let dim = self.config.observation_dim();
        let (base_step, physics_step) = (self.episode_step as f64, self.physics.step_count() as f64);
        let noise = (dim > STRUCTURED_OBS_DIMS).then(|| {
            Uniform::new_inclusive(self.config.observation_low(), self.config.observation_high())
        });

        let mut observations = AgentMap::with_capacity(self.agents.len());
        for (idx, agent) in self.agents.iter().enumerate() {
            let mut obs = Array1::zeros(dim);
            obs[0] = base_step;
            if dim > 1 {
                obs[1] = physics_step;
            }
            if dim > 2 {
                obs[2] = idx as f64;
            }
            if let Some(noise) = &noise {
                for value in obs.iter_mut().skip(STRUCTURED_OBS_DIMS) {
                    *value = noise.sample(&mut self.rng);
                }
            }
            observations.insert(agent.clone(), obs);
        }
        observations
    }

    fn agent_flags(&self, value: bool) -> AgentMap<bool> {
        self.agents.iter().map(|agent| (agent.clone(), value)).collect()
    }
}

impl<P: PhysicsAdapter> MultiAgentEnvironment for BjjMultiAgentEnv<P> {
    fn agents(&self) -> &[String] {
        &self.agents
    }

    fn observation_space(&self) -> &DictSpace {
        &self.observation_space
    }

    fn action_space(&self) -> &DictSpace {
        &self.action_space
    }

    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> (AgentMap<Observation>, AgentMap<ResetInfo>) {
        Self::reset(self, seed, options)
    }

    fn step(&mut self, actions: &Actions) -> Result<MultiStep> {
        Self::step(self, actions)
    }

    fn close(&mut self) {
        Self::close(self);
    }
}

fn zero_actions(agents: &[String], action_dim: usize) -> AgentMap<Array1<f64>> {
    agents
        .iter()
        .map(|agent| (agent.clone(), Array1::zeros(action_dim)))
        .collect()
}

/// Decode a JSON action payload into per-agent vectors
fn parse_actions(value: &Value) -> Result<Actions> {
    let Some(entries) = value.as_object() else {
        return Err(BjjError::Validation(
            "actions must be an object mapping agent ids to number arrays".into(),
        ));
    };

    entries
        .iter()
        .map(|(agent, action)| {
            let values = action
                .as_array()
                .and_then(|items| items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>())
                .ok_or_else(|| {
                    BjjError::Validation(format!("action for {agent} must be a sequence of numbers"))
                })?;
            Ok::<_, BjjError>((agent.clone(), values))
        })
        .collect()
}
