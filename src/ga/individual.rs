//! Genomes: ordered gene collections with a cached score.

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

use super::gene::Gene;
use crate::error::{GaError, Result};

/// A candidate solution: genes in declaration order plus a fitness score.
///
/// Gene names are unique. The score is written only by the population's
/// scoring pass; offspring start at `0.0`.
///
/// # Examples
///
/// ```
/// use genepool::ga::{Gene, Individual};
///
/// let species = Individual::new()
///     .with_gene(Gene::real("x", 0.0, -10.0, 10.0)?)?
///     .with_gene(Gene::real("y", 0.0, -10.0, 10.0)?)?;
///
/// assert_eq!(species.names().collect::<Vec<_>>(), ["x", "y"]);
/// assert_eq!(species.number("y"), Some(0.0));
/// # Ok::<(), genepool::GaError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Individual {
    genes: Vec<Gene>,
    score: f64,
}

impl Individual {
    /// Creates an individual with no genes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a gene.
    ///
    /// # Errors
    /// [`GaError::DuplicateGene`] if a gene with the same name exists.
    pub fn add_gene(&mut self, gene: Gene) -> Result<()> {
        if self.gene(gene.name()).is_some() {
            return Err(GaError::DuplicateGene {
                name: gene.name().to_string(),
            });
        }
        self.genes.push(gene);
        Ok(())
    }

    /// Builder form of [`add_gene`](Self::add_gene).
    pub fn with_gene(mut self, gene: Gene) -> Result<Self> {
        self.add_gene(gene)?;
        Ok(self)
    }

    /// Looks up a gene by name.
    pub fn gene(&self, name: &str) -> Option<&Gene> {
        self.genes.iter().find(|g| g.name() == name)
    }

    /// Numeric value of the named gene.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.gene(name).and_then(Gene::number)
    }

    /// Categorical value of the named gene.
    pub fn choice(&self, name: &str) -> Option<&str> {
        self.gene(name).and_then(Gene::choice)
    }

    /// Genes in insertion order.
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.iter()
    }

    /// Gene names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(Gene::name)
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// `true` if the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Last fitness score; `0.0` until the individual is evaluated.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub(crate) fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    /// `true` if both individuals declare exactly the same gene names.
    pub fn same_schema(&self, other: &Individual) -> bool {
        self.first_mismatch(other).is_none()
    }

    fn first_mismatch<'a>(&'a self, other: &'a Individual) -> Option<&'a str> {
        self.names()
            .find(|name| other.gene(name).is_none())
            .or_else(|| other.names().find(|name| self.gene(name).is_none()))
    }

    /// Uniform crossover with `other`.
    ///
    /// For each gene, a strictly dominant parent gene wins; on equal rank one
    /// of the two is picked with probability 1/2. Offspring genes are
    /// independent copies and the offspring score is `0.0`.
    ///
    /// # Errors
    /// [`GaError::SchemaMismatch`] if the gene-name sets differ. Genes that
    /// share a name but differ in options or bounds are still combined.
    pub fn combine<R: Rng>(&self, other: &Individual, rng: &mut R) -> Result<Individual> {
        if let Some(missing) = self.first_mismatch(other) {
            return Err(GaError::SchemaMismatch {
                missing: missing.to_string(),
            });
        }

        let genes = self
            .genes
            .iter()
            .map(|mine| {
                let theirs = other.gene(mine.name()).ok_or_else(|| GaError::SchemaMismatch {
                    missing: mine.name().to_string(),
                })?;
                let chosen = if mine.rank_equals(theirs) {
                    if rng.random_bool(0.5) {
                        mine
                    } else {
                        theirs
                    }
                } else if mine.dominates(theirs) {
                    mine
                } else {
                    theirs
                };
                Ok(chosen.clone())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Individual { genes, score: 0.0 })
    }

    /// Returns a copy with every gene mutated at `chance`.
    ///
    /// The receiver is left untouched. The copy keeps the receiver's score
    /// until the next scoring pass.
    pub fn mutate_all<R: Rng>(&self, chance: f64, rng: &mut R) -> Individual {
        let mut mutated = self.clone();
        for gene in &mut mutated.genes {
            gene.mutate(chance, rng);
        }
        mutated
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score: {}", self.score)?;
        for gene in &self.genes {
            write!(f, "; {gene}")?;
        }
        Ok(())
    }
}
