//! Benchmarks for environment reset and step throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bjjsim_env::{Actions, BjjMultiAgentEnv, EnvConfig, MultiAgentEnvironment};

fn zero_actions(env: &BjjMultiAgentEnv) -> Actions {
    env.agents()
        .iter()
        .map(|agent| (agent.clone(), vec![0.0; env.config().action_dim()]))
        .collect()
}

fn bench_reset(c: &mut Criterion) {
    let mut env = BjjMultiAgentEnv::new(EnvConfig::default()).unwrap();

    c.bench_function("env_reset", |b| {
        b.iter(|| {
            let out = env.reset(black_box(Some(42)), None);
            black_box(out)
        })
    });
}

fn bench_step(c: &mut Criterion) {
    let config = EnvConfig::builder().max_episode_steps(u64::MAX).build().unwrap();
    let mut env = BjjMultiAgentEnv::new(config).unwrap();
    env.reset(Some(42), None);
    let actions = zero_actions(&env);

    c.bench_function("env_step", |b| {
        b.iter(|| {
            let step = env.step(black_box(&actions)).unwrap();
            black_box(step)
        })
    });
}

criterion_group!(benches, bench_reset, bench_step);
criterion_main!(benches);
