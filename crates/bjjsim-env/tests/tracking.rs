//! Tests for episode records and run metrics

use approx::assert_abs_diff_eq;

use bjjsim_env::{Actions, BjjMultiAgentEnv, EnvConfig, MultiAgentEnvironment, TrackedEnvironment};

fn tracked(max_steps: u64) -> TrackedEnvironment<BjjMultiAgentEnv> {
    let config = EnvConfig::builder().max_episode_steps(max_steps).build().unwrap();
    TrackedEnvironment::new(BjjMultiAgentEnv::new(config).unwrap())
}

fn zero_actions(env: &impl MultiAgentEnvironment) -> Actions {
    env.agents()
        .iter()
        .map(|agent| (agent.clone(), vec![0.0; 6]))
        .collect()
}

#[test]
fn test_truncation_closes_record() {
    let mut env = tracked(2);
    env.reset(Some(3), None);
    let zeros = zero_actions(&env);

    env.step(&zeros).unwrap();
    let episode = env.current_episode().unwrap();
    assert_eq!(episode.steps, 1);
    assert_eq!(episode.seed, Some(3));
    assert!(!episode.is_finished());

    let last = env.step(&zeros).unwrap();
    assert!(last.is_done());

    let episode = env.current_episode().unwrap();
    assert!(episode.is_finished());
    assert!(episode.truncated);
    assert_eq!(episode.steps, 2);
    assert_abs_diff_eq!(episode.returns["agent1"], 0.2, epsilon = 1e-12);
    assert_eq!(env.history().len(), 1);
    assert_eq!(env.history()[0].id, episode.id);
}

#[test]
fn test_reset_closes_unfinished_record() {
    let mut env = tracked(10);
    env.reset(Some(1), None);
    env.step(&zero_actions(&env)).unwrap();
    let first_id = env.current_episode().unwrap().id.clone();

    env.reset(Some(2), None);
    assert_eq!(env.history().len(), 1);
    assert_eq!(env.history()[0].id, first_id);
    assert!(env.history()[0].is_finished());
    assert!(!env.history()[0].truncated);

    let current = env.current_episode().unwrap();
    assert_ne!(current.id, first_id);
    assert_eq!(current.steps, 0);
    assert_eq!(current.seed, Some(2));
}

#[test]
fn test_reset_after_truncation_does_not_duplicate_history() {
    let mut env = tracked(1);
    env.reset(Some(1), None);
    env.step(&zero_actions(&env)).unwrap();
    env.reset(Some(2), None);
    assert_eq!(env.history().len(), 1);
}

#[test]
fn test_metrics_count_episodes_and_steps() {
    let mut env = tracked(3);
    for seed in 0..2 {
        env.reset(Some(seed), None);
        let zeros = zero_actions(&env);
        for _ in 0..3 {
            env.step(&zeros).unwrap();
        }
    }

    let metrics = env.metrics();
    assert_eq!(metrics.episodes_started, 2);
    assert_eq!(metrics.total_steps, 6);
    assert!(metrics.steps_per_second >= 0.0);
    assert_eq!(env.inner().total_steps(), 6);
}

#[test]
fn test_failed_steps_are_not_recorded() {
    let mut env = tracked(3);
    let zeros = zero_actions(&env);
    assert!(env.step(&zeros).unwrap_err().is_usage());

    env.reset(Some(4), None);
    let mut missing = zeros.clone();
    missing.pop();
    assert!(env.step(&missing).unwrap_err().is_validation());

    assert_eq!(env.metrics().total_steps, 0);
    assert_eq!(env.current_episode().unwrap().steps, 0);
}

#[test]
fn test_close_finishes_open_record() {
    let mut env = tracked(10);
    env.reset(Some(5), None);
    env.step(&zero_actions(&env)).unwrap();
    env.close();

    let episode = env.current_episode().unwrap();
    assert!(episode.is_finished());
    assert!(!episode.truncated);
    assert_eq!(env.history().len(), 1);

    // Closing again or resetting does not record the episode twice
    env.close();
    env.reset(Some(6), None);
    assert_eq!(env.history().len(), 1);
}

#[test]
fn test_drain_history() {
    let mut env = tracked(1);
    for seed in 0..3 {
        env.reset(Some(seed), None);
        env.step(&zero_actions(&env)).unwrap();
    }

    let drained = env.drain_history();
    assert_eq!(drained.len(), 3);
    assert_eq!(drained[2].seed, Some(2));
    assert!(env.history().is_empty());
    assert_eq!(env.metrics().episodes_started, 3);
}
