//! Schema-driven evolutionary search.
//!
//! Candidate solutions are collections of named, typed genes (categorical,
//! natural, integer or real). A population derived from one template is
//! improved generation by generation against a caller-supplied fitness
//! function:
//!
//! - **Selection**: truncation, the worse half is discarded
//! - **Crossover**: uniform, biased by per-gene dominance flags
//! - **Mutation**: range-scaled symmetric shifts with mirrored bound handling
//! - **Annealing**: geometric decay of the mutation chance
//! - **Termination**: generation budget, stagnation, or wall-clock timeout
//!
//! Runs are single-threaded and fully reproducible from a seed.
//!
//! ```
//! use genepool::ga::{EvolveConfig, Gene, Individual, Population, PopulationConfig};
//!
//! let species = Individual::new()
//!     .with_gene(Gene::real("x", 0.0, -10.0, 10.0)?)?
//!     .with_gene(Gene::value_set("color", "red", ["red", "green", "blue"])?)?;
//!
//! let fitness = |ind: &Individual| {
//!     let x = ind.number("x").unwrap_or_default();
//!     let bonus = if ind.choice("color") == Some("green") { 1.0 } else { 0.0 };
//!     bonus - (x - 2.0).powi(2)
//! };
//!
//! let mut population = Population::new(
//!     species,
//!     fitness,
//!     PopulationConfig::default().with_size(50).with_seed(7),
//! )?;
//! population.evolve(&EvolveConfig::default().with_generations(30))?;
//! println!("{}", population.fittest());
//! # Ok::<(), genepool::GaError>(())
//! ```

pub mod error;
pub mod ga;
pub mod random;

pub use error::{GaError, Result};
