//! The evolving population and its generation loop.
//!
//! [`Population::evolve`] runs a fixed cycle per generation:
//! truncation → reproduction → annealing → re-scoring → termination checks.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Instant;

use super::config::{EvolveConfig, PopulationConfig};
use super::individual::Individual;
use super::types::Fitness;
use crate::error::{GaError, Result};
use crate::random::rng_from;

/// Why an evolution run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The generation budget was exhausted.
    GenerationLimit,
    /// The best score failed to improve for `stagnation_limit` generations.
    Stagnation,
    /// The wall-clock timeout elapsed.
    Timeout,
}

/// Summary of one [`Population::evolve`] call.
#[derive(Debug, Clone)]
pub struct EvolveReport {
    /// Number of generations executed.
    pub generations: usize,

    /// Which stop condition ended the run.
    pub stop_reason: StopReason,

    /// Score of the fittest individual when the run stopped.
    pub best_score: f64,

    /// Mutation chance after the last annealing step.
    pub final_mutation_chance: f64,

    /// Best score before the first generation and after each generation.
    pub score_history: Vec<f64>,
}

/// A population of individuals sharing the schema of one species template.
///
/// The sequence is kept sorted ascending by score, so the fittest
/// individual is always last.
///
/// # Usage
///
/// ```
/// use genepool::ga::{EvolveConfig, Gene, Individual, Population, PopulationConfig};
///
/// let species = Individual::new()
///     .with_gene(Gene::real("x", 0.0, -10.0, 10.0)?)?;
/// let fitness = |ind: &Individual| -ind.number("x").unwrap_or_default().powi(2);
///
/// let mut population = Population::new(
///     species,
///     fitness,
///     PopulationConfig::default().with_size(20).with_seed(42),
/// )?;
/// let report = population.evolve(&EvolveConfig::default().with_generations(10))?;
///
/// assert_eq!(report.generations, 10);
/// assert!(population.fittest().score() <= 0.0);
/// # Ok::<(), genepool::GaError>(())
/// ```
pub struct Population<F: Fitness> {
    species: Individual,
    fitness: F,
    config: PopulationConfig,
    individuals: Vec<Individual>,
    rng: StdRng,
}

impl<F: Fitness> Population<F> {
    /// Seeds `config.size` individuals by mutating `species` at
    /// `mutation_rate_start`, scores them and sorts them.
    ///
    /// # Errors
    /// [`GaError::EmptySpecies`], [`GaError::InvalidConfig`], or
    /// [`GaError::InvalidScore`] if the evaluator returns NaN.
    pub fn new(species: Individual, fitness: F, config: PopulationConfig) -> Result<Self> {
        if species.is_empty() {
            return Err(GaError::EmptySpecies);
        }
        config.validate()?;

        let mut rng = rng_from(config.seed);
        let individuals = (0..config.size)
            .map(|_| species.mutate_all(config.mutation_rate_start, &mut rng))
            .collect();

        debug!(
            "seeded population: size={}, genes={}, mutation {} -> {}, seed={:?}",
            config.size,
            species.len(),
            config.mutation_rate_start,
            config.mutation_rate_stop,
            config.seed
        );

        let mut population = Self {
            species,
            fitness,
            config,
            individuals,
            rng,
        };
        population.score_all(0)?;
        population.order();
        Ok(population)
    }

    /// The template every individual was derived from.
    pub fn species(&self) -> &Individual {
        &self.species
    }

    /// Parameters the population was created with.
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// The fitness evaluator.
    pub fn fitness(&self) -> &F {
        &self.fitness
    }

    /// Individuals in ascending score order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Iterates from weakest to fittest.
    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    /// Current number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// `true` if no individuals remain.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The highest-scoring individual (last in sort order).
    pub fn fittest(&self) -> &Individual {
        &self.individuals[self.individuals.len() - 1]
    }

    /// The lowest-scoring individual (first in sort order).
    pub fn weakest(&self) -> &Individual {
        &self.individuals[0]
    }

    /// Runs the evolution loop until a stop condition fires.
    ///
    /// Annealing restarts from `mutation_rate_start` on every call.
    ///
    /// # Errors
    /// [`GaError::InvalidConfig`] if `config` is invalid, or
    /// [`GaError::InvalidScore`] if the evaluator returns NaN. In that case
    /// the failed generation's offspring are discarded and only its sorted,
    /// correctly scored survivors remain.
    pub fn evolve(&mut self, config: &EvolveConfig) -> Result<EvolveReport> {
        config.validate()?;
        if !config.is_bounded() {
            warn!("evolve called without generations, timeout or stagnation limit; it will not stop");
        }

        let start = Instant::now();
        let decay = self.config.decay(config.generations);
        let mut chance = self.config.mutation_rate_start;
        let mut stagnant = 0usize;
        let mut generation = 0usize;
        let mut score_history = vec![self.fittest().score()];

        let stop_reason = loop {
            if config.generations > 0 && generation >= config.generations {
                break StopReason::GenerationLimit;
            }

            let previous_best = self.fittest().score();

            self.truncate();
            let survivors = self.individuals.len();
            self.reproduce(chance, config.allow_crossover)?;
            chance /= decay;

            generation += 1;
            if let Err(err) = self.score_all(generation) {
                self.individuals.truncate(survivors);
                return Err(err);
            }
            self.order();

            let best = self.fittest().score();
            score_history.push(best);
            if config.verbose {
                info!("top score in generation {generation} is {best}");
            } else {
                debug!(
                    "generation {generation}: best={best}, size={}, chance={chance}",
                    self.individuals.len()
                );
            }
            self.fitness.on_generation(generation, best);

            if best - previous_best <= config.change_threshold {
                stagnant += 1;
            } else {
                stagnant = 0;
            }
            if config.stagnation_limit > 0 && stagnant >= config.stagnation_limit {
                break StopReason::Stagnation;
            }
            if config.timeout.is_some_and(|limit| start.elapsed() > limit) {
                break StopReason::Timeout;
            }
        };

        let report = EvolveReport {
            generations: generation,
            stop_reason,
            best_score: self.fittest().score(),
            final_mutation_chance: chance,
            score_history,
        };
        info!(
            "evolution stopped after {} generations ({:?}), best score {}",
            report.generations, report.stop_reason, report.best_score
        );
        Ok(report)
    }

    /// Drops the worst `floor(n / 2)` individuals.
    fn truncate(&mut self) {
        let cut = self.individuals.len() / 2;
        self.individuals.drain(..cut);
    }

    /// Appends two offspring per consecutive survivor pair.
    ///
    /// An odd last survivor has no partner and contributes nothing.
    fn reproduce(&mut self, chance: f64, allow_crossover: bool) -> Result<()> {
        let survivors = self.individuals.len();
        let mut offspring = Vec::with_capacity(survivors);

        for pair in self.individuals.chunks_exact(2) {
            if allow_crossover {
                let child = pair[0].combine(&pair[1], &mut self.rng)?;
                offspring.push(child.mutate_all(chance, &mut self.rng));
            } else {
                let pick = self.rng.random_range(0..survivors);
                offspring.push(self.individuals[pick].mutate_all(chance, &mut self.rng));
            }
            let pick = self.rng.random_range(0..survivors);
            offspring.push(self.individuals[pick].mutate_all(chance, &mut self.rng));
        }

        self.individuals.extend(offspring);
        Ok(())
    }

    /// Scores every individual; no score is written unless all are valid.
    fn score_all(&mut self, generation: usize) -> Result<()> {
        let mut scores = Vec::with_capacity(self.individuals.len());
        for individual in &self.individuals {
            let score = self.fitness.evaluate(individual);
            if score.is_nan() {
                return Err(GaError::InvalidScore { generation });
            }
            scores.push(score);
        }
        for (individual, score) in self.individuals.iter_mut().zip(scores) {
            individual.set_score(score);
        }
        Ok(())
    }

    /// Stable ascending sort by score.
    fn order(&mut self) {
        self.individuals.sort_by(|a, b| a.score().total_cmp(&b.score()));
    }
}

impl<'a, F: Fitness> IntoIterator for &'a Population<F> {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}
