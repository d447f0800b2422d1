// Fixed action policies used to drive rollouts

use anyhow::{Context, Result};
use clap::ValueEnum;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use bjjsim_core::{Actions, DictSpace};

/// Policy selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// All-zero actions
    Zero,
    /// Uniform samples from the action space
    Uniform,
    /// Zero-mean gaussian noise, clipped by the environment
    Gaussian,
}

/// Produces one action per agent for every step
#[derive(Debug, Clone)]
pub enum ActionPolicy {
    Zero,
    Uniform,
    Gaussian(Normal<f64>),
}

impl ActionPolicy {
    pub fn new(kind: PolicyKind, sigma: f64) -> Result<Self> {
        if kind == PolicyKind::Gaussian {
            anyhow::ensure!(
                sigma.is_finite() && sigma > 0.0,
                "gaussian sigma must be positive and finite, got {sigma}"
            );
        }
        Ok(match kind {
            PolicyKind::Zero => Self::Zero,
            PolicyKind::Uniform => Self::Uniform,
            PolicyKind::Gaussian => Self::Gaussian(
                Normal::new(0.0, sigma)
                    .with_context(|| format!("invalid gaussian sigma {sigma}"))?,
            ),
        })
    }

    pub fn act<R: Rng + ?Sized>(&self, space: &DictSpace, rng: &mut R) -> Actions {
        space
            .iter()
            .map(|(agent, agent_space)| {
                let action = match self {
                    Self::Zero => vec![0.0; agent_space.size()],
                    Self::Uniform => agent_space.sample(rng).to_vec(),
                    Self::Gaussian(normal) => {
                        (0..agent_space.size()).map(|_| normal.sample(rng)).collect()
                    }
                };
                (agent.to_string(), action)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bjjsim_core::ContinuousSpace;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn space() -> DictSpace {
        let action = ContinuousSpace::new(4, -1.0, 1.0).unwrap();
        DictSpace::uniform(["agent1", "agent2"], &action).unwrap()
    }

    #[test]
    fn test_zero_policy() {
        let mut rng = StdRng::seed_from_u64(0);
        let actions = ActionPolicy::new(PolicyKind::Zero, 0.5).unwrap().act(&space(), &mut rng);
        assert_eq!(actions.len(), 2);
        assert!(actions.values().all(|a| a == &vec![0.0; 4]));
    }

    #[test]
    fn test_uniform_policy_in_bounds() {
        let space = space();
        let mut rng = StdRng::seed_from_u64(1);
        let policy = ActionPolicy::new(PolicyKind::Uniform, 0.5).unwrap();
        for _ in 0..16 {
            let actions = policy.act(&space, &mut rng);
            assert!(actions.iter().all(|(agent, a)| space[agent.as_str()].contains(a)));
        }
    }

    #[test]
    fn test_gaussian_rejects_bad_sigma() {
        assert!(ActionPolicy::new(PolicyKind::Gaussian, -1.0).is_err());
        assert!(ActionPolicy::new(PolicyKind::Gaussian, 0.0).is_err());
        assert!(ActionPolicy::new(PolicyKind::Gaussian, f64::NAN).is_err());
        // Sigma only matters for the gaussian policy
        assert!(ActionPolicy::new(PolicyKind::Zero, -1.0).is_ok());
        assert!(ActionPolicy::new(PolicyKind::Gaussian, 0.5).is_ok());
    }
}
