//! Bounded continuous spaces and per-agent space dictionaries

use indexmap::IndexMap;
use ndarray::Array1;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::Serialize;

use crate::{BjjError, Result};

/// Continuous box space with uniform bounds on every dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuousSpace {
    size: usize,
    low: f64,
    high: f64,
}

impl ContinuousSpace {
    /// Create a new continuous space of `size` dimensions bounded by `[low, high]`
    pub fn new(size: usize, low: f64, high: f64) -> Result<Self> {
        if size == 0 {
            return Err(BjjError::Configuration("size must be positive".into()));
        }
        // Written as a negation so NaN bounds are rejected too.
        if !(low < high) {
            return Err(BjjError::Configuration(
                "low must be strictly less than high".into(),
            ));
        }
        if !bounds_are_finite(low, high) {
            return Err(BjjError::Configuration(
                "bounds and their width must be finite".into(),
            ));
        }
        Ok(Self { size, low, high })
    }

    /// Number of dimensions
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Lower bound shared by every dimension
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound shared by every dimension
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Shape of vectors in this space
    #[must_use]
    pub fn shape(&self) -> [usize; 1] {
        [self.size]
    }

    /// Clamp `values` element-wise into the space bounds.
    ///
    /// Fails with [`BjjError::DimensionMismatch`] when the input length does
    /// not match the space size.
    pub fn clip(&self, values: &[f64]) -> Result<Array1<f64>> {
        if values.len() != self.size {
            return Err(BjjError::DimensionMismatch {
                expected: self.size,
                actual: values.len(),
            });
        }
        Ok(values
            .iter()
            .map(|v| v.clamp(self.low, self.high))
            .collect())
    }

    /// Check if a vector has the right length and lies within the bounds
    #[must_use]
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.size && values.iter().all(|v| *v >= self.low && *v <= self.high)
    }

    /// Sample a vector uniformly from the space
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        let dist = Uniform::new_inclusive(self.low, self.high);
        (0..self.size).map(|_| dist.sample(rng)).collect()
    }
}

/// Whether `low`, `high` and the width `high - low` are all finite
///
/// Uniform sampling over `[low, high]` is only defined for such bounds.
#[must_use]
pub fn bounds_are_finite(low: f64, high: f64) -> bool {
    low.is_finite() && high.is_finite() && (high - low).is_finite()
}

/// Mapping of agent identifiers to [`ContinuousSpace`] definitions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictSpace {
    spaces: IndexMap<String, ContinuousSpace>,
}

impl DictSpace {
    /// Create a dictionary space; it must contain at least one entry
    pub fn new(spaces: IndexMap<String, ContinuousSpace>) -> Result<Self> {
        if spaces.is_empty() {
            return Err(BjjError::Configuration(
                "spaces must contain at least one entry".into(),
            ));
        }
        Ok(Self { spaces })
    }

    /// Build a dictionary where every agent shares the same space
    pub fn uniform<I, S>(agents: I, space: &ContinuousSpace) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            agents
                .into_iter()
                .map(|agent| (agent.into(), space.clone()))
                .collect(),
        )
    }

    /// Look up the space of one agent
    #[must_use]
    pub fn get(&self, agent: &str) -> Option<&ContinuousSpace> {
        self.spaces.get(agent)
    }

    /// Agent identifiers in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.spaces.keys().map(String::as_str)
    }

    /// Iterate over `(agent, space)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContinuousSpace)> {
        self.spaces.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// Always false for a constructed space; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}

impl std::ops::Index<&str> for DictSpace {
    type Output = ContinuousSpace;

    fn index(&self, agent: &str) -> &Self::Output {
        &self.spaces[agent]
    }
}
