//! Error types shared by the GA engine.

use thiserror::Error;

/// Configuration and runtime errors raised by the engine.
///
/// Every variant is a caller error detected at call time; the engine never
/// retries. Panics raised by a fitness evaluator are not caught.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaError {
    #[error("gene '{gene}': invalid bounds [{min}, {max}]")]
    InvalidBounds { gene: String, min: f64, max: f64 },

    #[error("gene '{gene}': value set has no options")]
    EmptyOptions { gene: String },

    #[error("gene '{gene}': initial value lies outside its domain")]
    ValueOutOfDomain { gene: String },

    #[error("gene '{gene}': mutation rate must be finite and non-negative, got {rate}")]
    InvalidMutationRate { gene: String, rate: f64 },

    #[error("duplicate gene name '{name}'")]
    DuplicateGene { name: String },

    #[error("genome schema mismatch: gene '{missing}' is not present in both individuals")]
    SchemaMismatch { missing: String },

    #[error("species template has no genes")]
    EmptySpecies,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("fitness evaluator returned NaN in generation {generation}")]
    InvalidScore { generation: usize },
}

pub type Result<T> = std::result::Result<T, GaError>;
