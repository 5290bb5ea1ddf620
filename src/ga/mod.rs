//! Schema-driven genetic algorithm.
//!
//! The caller declares a species template — an [`Individual`] built from
//! typed [`Gene`]s — and a [`Fitness`] function. A [`Population`] seeds
//! itself from the template and [`Population::evolve`] improves it by
//! truncation selection, dominance-aware uniform crossover and annealed
//! per-gene mutation.
//!
//! # Key Types
//!
//! - [`Gene`] / [`Allele`]: a named parameter and its kind-specific domain
//! - [`Individual`]: ordered genes plus a score
//! - [`Fitness`]: the objective, higher is fitter
//! - [`PopulationConfig`] / [`EvolveConfig`]: run parameters
//! - [`Population`]: the sorted population and the generation loop
//! - [`EvolveReport`]: what a run did and why it stopped
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"
//! - Mühlenbein & Schlierkamp-Voosen (1993), "Predictive Models for the
//!   Breeder Genetic Algorithm" (truncation selection)

mod config;
mod gene;
mod individual;
mod population;
mod types;

pub use config::{EvolveConfig, PopulationConfig};
pub use gene::{Allele, Gene, GeneKind};
pub use individual::Individual;
pub use population::{EvolveReport, Population, StopReason};
pub use types::Fitness;
