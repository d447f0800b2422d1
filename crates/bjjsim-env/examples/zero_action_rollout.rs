//! Example: both agents hold still until the episode is truncated

use bjjsim_env::{Actions, BjjMultiAgentEnv, EnvConfig, MultiAgentEnvironment, TrackedEnvironment};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = EnvConfig::builder().max_episode_steps(50).build()?;
    let action_dim = config.action_dim();
    let mut env = TrackedEnvironment::new(BjjMultiAgentEnv::new(config)?);

    let actions: Actions = env
        .agents()
        .iter()
        .map(|agent| (agent.clone(), vec![0.0; action_dim]))
        .collect();

    for episode in 0..3 {
        env.reset(Some(episode), None);
        loop {
            let step = env.step(&actions)?;
            if step.is_done() {
                break;
            }
        }

        if let Some(record) = env.current_episode() {
            println!(
                "Episode {}: steps = {}, returns = {:?}",
                episode + 1,
                record.steps,
                record.returns
            );
        }
    }

    let metrics = env.metrics();
    println!(
        "\n{} episodes, {} steps, {:.1} steps/s",
        metrics.episodes_started, metrics.total_steps, metrics.steps_per_second
    );

    env.close();
    Ok(())
}
