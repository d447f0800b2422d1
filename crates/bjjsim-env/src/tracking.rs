//! Episode bookkeeping and run metrics
//!
//! [`TrackedEnvironment`] wraps any [`MultiAgentEnvironment`] and records one
//! [`EpisodeRecord`] per reset plus run-wide [`RunMetrics`] (episodes started,
//! total steps and a smoothed steps-per-second rate).

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use bjjsim_core::{
    Actions, AgentMap, DictSpace, MultiAgentEnvironment, MultiStep, Observation, ResetInfo,
    ResetOptions, Result,
};

/// Smoothing factor for the steps-per-second moving average
const RATE_EMA_ALPHA: f64 = 0.5;

/// Time deltas at or below this many seconds only refresh the timestamp
const MIN_RATE_DELTA_SECS: f64 = 1e-9;

/// Summary of one episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRecord {
    /// Episode ID
    pub id: String,
    /// Seed the episode was started with
    pub seed: Option<u64>,
    /// Number of steps
    pub steps: u64,
    /// Sum of rewards per agent
    pub returns: AgentMap<f64>,
    /// Whether episode was truncated
    pub truncated: bool,
    /// Start time
    pub start_time: DateTime<Utc>,
    /// End time
    pub end_time: Option<DateTime<Utc>>,
}

impl EpisodeRecord {
    fn start(seed: Option<u64>, agents: &[String]) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            seed,
            steps: 0,
            returns: agents.iter().map(|agent| (agent.clone(), 0.0)).collect(),
            truncated: false,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    /// Whether the episode has ended
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Run-wide counters across all episodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Number of resets performed
    pub episodes_started: u64,
    /// Successful steps across all episodes
    pub total_steps: u64,
    /// Exponential moving average of the step rate in the current episode
    pub steps_per_second: f64,
}

/// Wrapper for environments that tracks episodes and run metrics
pub struct TrackedEnvironment<E> {
    env: E,
    episode: Option<EpisodeRecord>,
    history: Vec<EpisodeRecord>,
    metrics: RunMetrics,
    last_step_at: Option<Instant>,
}

impl<E: MultiAgentEnvironment> TrackedEnvironment<E> {
    /// Create a new tracked environment
    pub fn new(env: E) -> Self {
        Self {
            env,
            episode: None,
            history: Vec::new(),
            metrics: RunMetrics::default(),
            last_step_at: None,
        }
    }

    /// The wrapped environment
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Unwrap, discarding the recorded history
    pub fn into_inner(self) -> E {
        self.env
    }

    /// The episode currently being recorded, finished or not
    pub fn current_episode(&self) -> Option<&EpisodeRecord> {
        self.episode.as_ref()
    }

    /// Episodes that have ended, oldest first
    pub fn history(&self) -> &[EpisodeRecord] {
        &self.history
    }

    /// Run-wide counters
    pub fn metrics(&self) -> RunMetrics {
        self.metrics
    }

    /// Take the finished episodes recorded so far, leaving the history empty
    pub fn drain_history(&mut self) -> Vec<EpisodeRecord> {
        std::mem::take(&mut self.history)
    }

    fn finish_episode(&mut self) {
        if let Some(mut episode) = self.episode.take() {
            if episode.end_time.is_none() {
                episode.end_time = Some(Utc::now());
            }
            debug!(id = %episode.id, steps = episode.steps, "episode finished");
            self.history.push(episode.clone());
            // Finished episodes stay visible until the next reset
            self.episode = Some(episode);
        }
    }

    fn record_step_rate(&mut self, now: Instant) {
        let Some(previous) = self.last_step_at.replace(now) else {
            return;
        };
        let dt = now.duration_since(previous).as_secs_f64();
        if dt <= MIN_RATE_DELTA_SECS {
            return;
        }
        let instantaneous = 1.0 / dt;
        self.metrics.steps_per_second =
            (1.0 - RATE_EMA_ALPHA) * self.metrics.steps_per_second + RATE_EMA_ALPHA * instantaneous;
    }
}

impl<E: MultiAgentEnvironment> MultiAgentEnvironment for TrackedEnvironment<E> {
    fn agents(&self) -> &[String] {
        self.env.agents()
    }

    fn observation_space(&self) -> &DictSpace {
        self.env.observation_space()
    }

    fn action_space(&self) -> &DictSpace {
        self.env.action_space()
    }

    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> (AgentMap<Observation>, AgentMap<ResetInfo>) {
        if self.episode.as_ref().is_some_and(|episode| !episode.is_finished()) {
            self.finish_episode();
        }

        let (observations, infos) = self.env.reset(seed, options);

        let applied_seed = infos.values().next().map(|info| info.seed);
        self.episode = Some(EpisodeRecord::start(applied_seed, self.env.agents()));
        self.metrics.episodes_started += 1;
        self.metrics.steps_per_second = 0.0;
        self.last_step_at = None;

        (observations, infos)
    }

    fn step(&mut self, actions: &Actions) -> Result<MultiStep> {
        let step = self.env.step(actions)?;

        self.metrics.total_steps += 1;
        self.record_step_rate(Instant::now());

        let done = step.is_done();
        if let Some(episode) = self.episode.as_mut() {
            episode.steps += 1;
            for (agent, reward) in &step.rewards {
                *episode.returns.entry(agent.clone()).or_insert(0.0) += reward.value();
            }
            if done {
                episode.truncated = step.truncated.values().any(|truncated| *truncated);
            }
        }
        if done {
            self.finish_episode();
        }

        Ok(step)
    }

    fn close(&mut self) {
        self.env.close();
        if self.episode.as_ref().is_some_and(|episode| !episode.is_finished()) {
            self.finish_episode();
        }
    }
}
