// BJJSim Control CLI
// Drives the multi-agent environment from the command line

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod policy;
mod rollout_commands;

use policy::PolicyKind;

#[derive(Parser)]
#[command(name = "bjjsim-ctl")]
#[command(about = "BJJSim environment control CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run episodes with a fixed action policy
    Rollout {
        /// JSON environment configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of episodes to run
        #[arg(short, long, default_value = "1")]
        episodes: u64,

        /// Seed of the first episode; episode i uses seed + i
        #[arg(short, long)]
        seed: Option<u64>,

        /// Action policy (zero, uniform, gaussian)
        #[arg(short, long, value_enum, default_value = "zero")]
        policy: PolicyKind,

        /// Standard deviation for the gaussian policy
        #[arg(long, default_value = "0.5")]
        sigma: f64,

        /// Print one JSON object per episode
        #[arg(long)]
        json: bool,
    },

    /// Print the validated environment configuration
    Config {
        /// JSON environment configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rollout {
            config,
            episodes,
            seed,
            policy,
            sigma,
            json,
        } => {
            rollout_commands::run_rollout(&rollout_commands::RolloutArgs {
                config,
                episodes,
                seed,
                policy,
                sigma,
                json,
            })?;
        }

        Commands::Config { config } => {
            rollout_commands::show_config(config.as_deref())?;
        }
    }

    Ok(())
}
