//! Reward signals and reward decomposition

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Reward signal for one agent
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reward(pub f64);

impl Reward {
    /// Create a new reward
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the reward value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Reward {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Reward> for f64 {
    fn from(reward: Reward) -> Self {
        reward.0
    }
}

impl std::ops::Add for Reward {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

/// The terms a per-step reward is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardComponents {
    /// Constant reward granted for every step
    pub step_reward: f64,
    /// Signed energy term, `-scale * ||action||`
    pub energy_penalty: f64,
}

impl RewardComponents {
    /// Decompose the reward for a clipped action vector
    #[must_use]
    pub fn for_action(step_reward: f64, energy_penalty_scale: f64, action: ArrayView1<'_, f64>) -> Self {
        Self {
            step_reward,
            energy_penalty: -energy_penalty_scale * l2_norm(action),
        }
    }

    /// Sum of all components
    #[must_use]
    pub fn total(&self) -> Reward {
        Reward(self.step_reward + self.energy_penalty)
    }
}

/// Euclidean norm of a vector
#[must_use]
pub fn l2_norm(values: ArrayView1<'_, f64>) -> f64 {
    values.dot(&values).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, Array1};

    #[test]
    fn test_zero_action_has_no_penalty() {
        let action = Array1::<f64>::zeros(6);
        let components = RewardComponents::for_action(0.1, 0.05, action.view());
        assert_eq!(components.energy_penalty, 0.0);
        assert_eq!(components.total(), Reward(0.1));
    }

    #[test]
    fn test_unit_action_penalty() {
        let action = arr1(&[1.0, 0.0, 0.0]);
        let components = RewardComponents::for_action(0.1, 0.05, action.view());
        assert_relative_eq!(components.energy_penalty, -0.05);
        assert_relative_eq!(components.total().value(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_l2_norm() {
        assert_relative_eq!(l2_norm(arr1(&[3.0, 4.0]).view()), 5.0);
    }
}
