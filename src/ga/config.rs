//! Population and evolution parameters.
//!
//! [`PopulationConfig`] fixes what a population is made of;
//! [`EvolveConfig`] controls one call to
//! [`Population::evolve`](super::Population::evolve).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{GaError, Result};

/// Parameters fixed when a population is created.
///
/// # Defaults
///
/// ```
/// use genepool::ga::PopulationConfig;
///
/// let config = PopulationConfig::default();
/// assert_eq!(config.size, 100);
/// assert_eq!(config.mutation_rate_start, 0.1);
/// assert_eq!(config.mutation_rate_stop, 0.01);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PopulationConfig {
    /// Number of individuals seeded from the species template.
    pub size: usize,

    /// Mutation chance used for seeding and for the first generation.
    pub mutation_rate_start: f64,

    /// Mutation chance reached after the last generation of a bounded run.
    pub mutation_rate_stop: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 100,
            mutation_rate_start: 0.1,
            mutation_rate_stop: 0.01,
            seed: None,
        }
    }
}

impl PopulationConfig {
    /// Sets the population size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the annealing range `start → stop`.
    pub fn with_mutation_rates(mut self, start: f64, stop: f64) -> Self {
        self.mutation_rate_start = start;
        self.mutation_rate_stop = stop;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(GaError::InvalidConfig("size must be at least 2".into()));
        }
        let (start, stop) = (self.mutation_rate_start, self.mutation_rate_stop);
        if !start.is_finite() || !stop.is_finite() || start <= 0.0 || stop <= 0.0 {
            return Err(GaError::InvalidConfig(
                "mutation rates must be finite and positive".into(),
            ));
        }
        if start < stop {
            return Err(GaError::InvalidConfig(format!(
                "mutation_rate_start ({start}) must not be below mutation_rate_stop ({stop})"
            )));
        }
        Ok(())
    }

    /// Per-generation divisor applied to the mutation chance.
    ///
    /// With a budget of `generations` the chance reaches
    /// `mutation_rate_stop` exactly after the last generation; an unbounded
    /// run (`0`) uses a fixed exponent of `0.1`.
    pub fn decay(&self, generations: usize) -> f64 {
        let ratio = self.mutation_rate_start / self.mutation_rate_stop;
        if generations == 0 {
            ratio.powf(0.1)
        } else {
            ratio.powf(1.0 / generations as f64)
        }
    }
}

/// Termination and reproduction options for one evolution run.
///
/// Every stop condition defaults to "off". Calling `evolve` with no
/// generation budget, no timeout and no stagnation limit never returns.
///
/// # Builder Pattern
///
/// ```
/// use genepool::ga::EvolveConfig;
///
/// let config = EvolveConfig::default()
///     .with_generations(100)
///     .with_stagnation_limit(10)
///     .with_timeout_secs(1.5)
///     .with_verbose(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvolveConfig {
    /// Whether survivors are recombined pairwise.
    ///
    /// When disabled, each pair contributes two mutated copies of random
    /// survivors instead.
    pub allow_crossover: bool,

    /// Wall-clock cutoff, checked once per generation.
    pub timeout: Option<Duration>,

    /// Generation budget; `0` means unbounded.
    pub generations: usize,

    /// Consecutive non-improving generations before stopping; `0` disables.
    pub stagnation_limit: usize,

    /// Improvement of the best score at or below this value counts as
    /// stagnation.
    pub change_threshold: f64,

    /// Logs every generation at `info` level instead of `debug`.
    pub verbose: bool,
}

impl Default for EvolveConfig {
    fn default() -> Self {
        Self {
            allow_crossover: true,
            timeout: None,
            generations: 0,
            stagnation_limit: 0,
            change_threshold: 0.0,
            verbose: false,
        }
    }
}

impl EvolveConfig {
    /// Enables or disables pairwise crossover.
    pub fn with_crossover(mut self, allow: bool) -> Self {
        self.allow_crossover = allow;
        self
    }

    /// Sets the wall-clock timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in (fractional) seconds.
    ///
    /// Non-positive or non-finite values clear the timeout.
    pub fn with_timeout_secs(mut self, secs: f64) -> Self {
        self.timeout = Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|d| !d.is_zero());
        self
    }

    /// Sets the generation budget; `0` means unbounded.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets how many non-improving generations end the run.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the minimum improvement that resets the stagnation counter.
    ///
    /// Must be finite and non-negative; [`validate`](Self::validate) rejects
    /// anything else.
    pub fn with_change_threshold(mut self, threshold: f64) -> Self {
        self.change_threshold = threshold;
        self
    }

    /// Logs each generation at `info` level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// `true` if at least one stop condition is armed.
    pub fn is_bounded(&self) -> bool {
        self.generations > 0 || self.timeout.is_some() || self.stagnation_limit > 0
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.change_threshold.is_finite() || self.change_threshold < 0.0 {
            return Err(GaError::InvalidConfig(format!(
                "change_threshold must be finite and non-negative, got {}",
                self.change_threshold
            )));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(GaError::InvalidConfig(
                "timeout must be positive or None".into(),
            ));
        }
        Ok(())
    }
}
