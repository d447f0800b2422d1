// Rollout and config command implementations for bjjsim-ctl

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use bjjsim_core::MultiAgentEnvironment;
use bjjsim_env::{BjjMultiAgentEnv, EnvConfig, EpisodeRecord, TrackedEnvironment};

use crate::policy::{ActionPolicy, PolicyKind};

pub struct RolloutArgs {
    pub config: Option<PathBuf>,
    pub episodes: u64,
    pub seed: Option<u64>,
    pub policy: PolicyKind,
    pub sigma: f64,
    pub json: bool,
}

pub fn run_rollout(args: &RolloutArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let env = BjjMultiAgentEnv::new(config).context("Failed to build environment")?;
    let mut env = TrackedEnvironment::new(env);

    let policy = ActionPolicy::new(args.policy, args.sigma)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(episodes = args.episodes, policy = ?args.policy, "starting rollout");
    let records = rollout(&mut env, &policy, &mut rng, args.episodes, args.seed)?;

    for (index, record) in records.iter().enumerate() {
        if args.json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            print_episode(index + 1, record);
        }
    }

    let metrics = env.metrics();
    if args.json {
        println!("{}", serde_json::to_string(&metrics)?);
    } else {
        println!(
            "\nEpisodes: {}, Total steps: {}, Steps/s: {:.1}",
            metrics.episodes_started, metrics.total_steps, metrics.steps_per_second
        );
    }

    env.close();
    Ok(())
}

pub fn show_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EnvConfig> {
    match path {
        Some(path) => EnvConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EnvConfig::default()),
    }
}

/// Run `episodes` full episodes and return their records
fn rollout<E, R>(
    env: &mut TrackedEnvironment<E>,
    policy: &ActionPolicy,
    rng: &mut R,
    episodes: u64,
    first_seed: Option<u64>,
) -> Result<Vec<EpisodeRecord>>
where
    E: MultiAgentEnvironment,
    R: Rng + ?Sized,
{
    let mut records = Vec::new();
    for episode in 0..episodes {
        env.reset(first_seed.map(|seed| seed.wrapping_add(episode)), None);
        loop {
            let actions = policy.act(env.action_space(), rng);
            let step = env.step(&actions)?;
            if step.is_done() {
                break;
            }
        }
        if let Some(record) = env.current_episode() {
            records.push(record.clone());
        }
    }
    Ok(records)
}

fn print_episode(number: usize, record: &EpisodeRecord) {
    println!("Episode {number}: {}", record.id);
    if let Some(seed) = record.seed {
        println!("   Seed: {seed}");
    }
    println!("   Steps: {}", record.steps);
    println!("   Truncated: {}", record.truncated);
    for (agent, total) in &record.returns {
        println!("   Return [{agent}]: {total:.3}");
    }
}
