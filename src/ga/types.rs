//! The contract between the engine and the caller's objective.

use super::individual::Individual;

/// Scores an individual. Higher is fitter.
///
/// The population sorts ascending by score, so the fittest individual ends
/// up last. Evaluation should be a pure function of the gene values; any
/// panic raised here aborts the run.
///
/// Closures `Fn(&Individual) -> f64` implement this trait directly.
///
/// # Implementing
///
/// ```
/// use genepool::ga::{Fitness, Individual};
///
/// struct Polynom;
///
/// impl Fitness for Polynom {
///     fn evaluate(&self, ind: &Individual) -> f64 {
///         let x = ind.number("x").unwrap_or_default();
///         x + 3.0 * x.powi(2) - x.powi(4)
///     }
/// }
/// ```
pub trait Fitness {
    /// Computes the score of `individual`.
    fn evaluate(&self, individual: &Individual) -> f64;

    /// Called once per generation after re-scoring with the current best
    /// score. The default implementation is a no-op.
    fn on_generation(&self, _generation: usize, _best_score: f64) {}
}

impl<F> Fitness for F
where
    F: Fn(&Individual) -> f64,
{
    fn evaluate(&self, individual: &Individual) -> f64 {
        self(individual)
    }
}
