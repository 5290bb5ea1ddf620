//! Typed, mutable parameters.
//!
//! A [`Gene`] is one named parameter of a candidate solution. Its
//! [`Allele`] carries the current value together with the only bound data
//! that makes sense for its kind, so a categorical gene can never hold
//! numeric bounds and vice versa.
//!
//! # Mutation model
//!
//! Every call to [`Gene::mutate`] draws exactly one uniform `r ∈ [0, 1)`.
//! With `p = chance * mutation_rate`:
//!
//! - **ValueSet**: if `r ≤ p`, a uniformly random option replaces the value
//!   (the incumbent may be drawn again).
//! - **Numeric**: `delta = (max - min) * (2r - 1) * p` is added. A result
//!   outside `[min, max]` is mirrored to `value - delta`; Natural and Integer
//!   values are then truncated toward zero.

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GaError, Result};

/// Discriminant of an [`Allele`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeneKind {
    /// Categorical value drawn from a finite option list.
    ValueSet,
    /// Whole number in `[0, max]`.
    Natural,
    /// Whole number in `[min, max]`.
    Integer,
    /// Floating point number in `[min, max]`.
    Real,
}

/// Current value of a gene plus its kind-specific domain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Allele {
    ValueSet { value: String, options: Vec<String> },
    Natural { value: u64, max: u64 },
    Integer { value: i64, min: i64, max: i64 },
    Real { value: f64, min: f64, max: f64 },
}

impl Allele {
    /// Returns the kind of this allele.
    pub fn kind(&self) -> GeneKind {
        match self {
            Allele::ValueSet { .. } => GeneKind::ValueSet,
            Allele::Natural { .. } => GeneKind::Natural,
            Allele::Integer { .. } => GeneKind::Integer,
            Allele::Real { .. } => GeneKind::Real,
        }
    }
}

/// A single named parameter of an [`Individual`](super::Individual).
///
/// Genes are plain values: cloning produces an independent deep copy, and
/// individuals never share genes by reference.
///
/// # Examples
///
/// ```
/// use genepool::ga::Gene;
///
/// let x = Gene::real("x", 0.5, -10.0, 10.0).unwrap();
/// let color = Gene::value_set("color", "green", ["brown", "green", "blue"])
///     .unwrap()
///     .dominant(true);
///
/// assert!(color.dominates(&x));
/// assert_eq!(x.number(), Some(0.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gene {
    name: String,
    allele: Allele,
    dominant: bool,
    mutation_rate: f64,
}

impl Gene {
    /// Declares a categorical gene.
    ///
    /// # Errors
    /// [`GaError::EmptyOptions`] if `options` is empty,
    /// [`GaError::ValueOutOfDomain`] if `value` is not one of the options.
    pub fn value_set<I, S>(name: impl Into<String>, value: impl Into<String>, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let value = value.into();
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(GaError::EmptyOptions { gene: name });
        }
        if !options.contains(&value) {
            return Err(GaError::ValueOutOfDomain { gene: name });
        }
        Ok(Self::from_allele(name, Allele::ValueSet { value, options }))
    }

    /// Declares a natural-number gene with domain `[0, max]`.
    ///
    /// # Errors
    /// [`GaError::ValueOutOfDomain`] if `value > max`.
    pub fn natural(name: impl Into<String>, value: u64, max: u64) -> Result<Self> {
        let name = name.into();
        if value > max {
            return Err(GaError::ValueOutOfDomain { gene: name });
        }
        Ok(Self::from_allele(name, Allele::Natural { value, max }))
    }

    /// Declares a bounded integer gene.
    ///
    /// # Errors
    /// [`GaError::InvalidBounds`] if `min > max`,
    /// [`GaError::ValueOutOfDomain`] if `value` lies outside them.
    pub fn integer(name: impl Into<String>, value: i64, min: i64, max: i64) -> Result<Self> {
        let name = name.into();
        if min > max {
            return Err(GaError::InvalidBounds {
                gene: name,
                min: min as f64,
                max: max as f64,
            });
        }
        if !(min..=max).contains(&value) {
            return Err(GaError::ValueOutOfDomain { gene: name });
        }
        Ok(Self::from_allele(name, Allele::Integer { value, min, max }))
    }

    /// Declares a bounded real gene.
    ///
    /// # Errors
    /// [`GaError::InvalidBounds`] if either bound is not finite or
    /// `min > max`.
    pub fn real(name: impl Into<String>, value: f64, min: f64, max: f64) -> Result<Self> {
        let name = name.into();
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(GaError::InvalidBounds { gene: name, min, max });
        }
        if !(min..=max).contains(&value) {
            return Err(GaError::ValueOutOfDomain { gene: name });
        }
        Ok(Self::from_allele(name, Allele::Real { value, min, max }))
    }

    fn from_allele(name: String, allele: Allele) -> Self {
        Self {
            name,
            allele,
            dominant: false,
            mutation_rate: 1.0,
        }
    }

    /// Sets the dominance flag used during recombination.
    pub fn dominant(mut self, dominant: bool) -> Self {
        self.dominant = dominant;
        self
    }

    /// Sets the per-gene multiplier applied to the mutation chance.
    ///
    /// # Errors
    /// [`GaError::InvalidMutationRate`] if `rate` is negative or not finite.
    pub fn with_mutation_rate(mut self, rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(GaError::InvalidMutationRate {
                gene: self.name,
                rate,
            });
        }
        self.mutation_rate = rate;
        Ok(self)
    }

    /// Unique name of the gene within its genome.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the gene's allele.
    pub fn kind(&self) -> GeneKind {
        self.allele.kind()
    }

    /// Current value together with its domain.
    pub fn allele(&self) -> &Allele {
        &self.allele
    }

    /// Dominance flag consulted by recombination.
    pub fn is_dominant(&self) -> bool {
        self.dominant
    }

    /// Per-gene multiplier applied to the mutation chance.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Numeric value as `f64`; `None` for a ValueSet gene.
    pub fn number(&self) -> Option<f64> {
        match self.allele {
            Allele::ValueSet { .. } => None,
            Allele::Natural { value, .. } => Some(value as f64),
            Allele::Integer { value, .. } => Some(value as f64),
            Allele::Real { value, .. } => Some(value),
        }
    }

    /// Whole-number value; `None` unless the gene is Natural or Integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self.allele {
            Allele::Natural { value, .. } => i64::try_from(value).ok(),
            Allele::Integer { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Categorical value; `None` unless the gene is a ValueSet.
    pub fn choice(&self) -> Option<&str> {
        match &self.allele {
            Allele::ValueSet { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Inclusive numeric bounds; `None` for a ValueSet gene.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self.allele {
            Allele::ValueSet { .. } => None,
            Allele::Natural { max, .. } => Some((0.0, max as f64)),
            Allele::Integer { min, max, .. } => Some((min as f64, max as f64)),
            Allele::Real { min, max, .. } => Some((min, max)),
        }
    }

    /// Allowed options; `None` unless the gene is a ValueSet.
    pub fn options(&self) -> Option<&[String]> {
        match &self.allele {
            Allele::ValueSet { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Mutates the gene in place with probability/scale `chance`.
    ///
    /// Consumes one uniform draw for the decision or shift value, plus one
    /// index draw when a ValueSet gene is re-drawn.
    pub fn mutate<R: Rng>(&mut self, chance: f64, rng: &mut R) -> &mut Self {
        let chance = chance * self.mutation_rate;
        let r: f64 = rng.random();

        match &mut self.allele {
            Allele::ValueSet { value, options } => {
                if r <= chance {
                    let idx = rng.random_range(0..options.len());
                    *value = options[idx].clone();
                }
            }
            Allele::Natural { value, max } => {
                let shifted = shift_whole(*value as i128, 0, *max as i128, r, chance);
                *value = shifted.clamp(0, *max as i128) as u64;
            }
            Allele::Integer { value, min, max } => {
                let shifted = shift_whole(*value as i128, *min as i128, *max as i128, r, chance);
                *value = shifted.clamp(*min as i128, *max as i128) as i64;
            }
            Allele::Real { value, min, max } => {
                *value = shift(*value, *min, *max, r, chance);
            }
        }
        self
    }

    /// `true` if this gene wins recombination against `other` outright.
    pub fn dominates(&self, other: &Gene) -> bool {
        self.dominant && !other.dominant
    }

    /// `true` if `other` wins recombination against this gene outright.
    pub fn recessive_to(&self, other: &Gene) -> bool {
        !self.dominant && other.dominant
    }

    /// `true` if neither gene dominates; values are not compared.
    pub fn rank_equals(&self, other: &Gene) -> bool {
        self.dominant == other.dominant
    }
}

/// Perturbs `value` by a symmetric, range-scaled delta.
///
/// A first bound violation mirrors the shift to the other side of `value`.
/// Should the mirrored point also leave the range (possible once
/// `|delta|` exceeds half the range) it is clamped to the violated bound.
fn shift(value: f64, min: f64, max: f64, r: f64, chance: f64) -> f64 {
    let delta = (max - min) * (2.0 * r - 1.0) * chance;
    let mut shifted = value + delta;
    if shifted < min || shifted > max {
        shifted = value - delta;
    }
    shifted.clamp(min, max)
}

/// Whole-number form of [`shift`], exact over the full `i64`/`u64` range.
///
/// The shifted point is tracked as `base + frac` with `frac ∈ (-1, 1)`, so
/// bound checks and truncation toward zero never round through `f64`.
fn shift_whole(value: i128, min: i128, max: i128, r: f64, chance: f64) -> i128 {
    let delta = (max - min) as f64 * (2.0 * r - 1.0) * chance;
    let whole = delta.trunc();
    let frac = delta - whole;
    let whole = whole as i128;

    let above = |base: i128, frac: f64| base > max || (base == max && frac > 0.0);
    let below = |base: i128, frac: f64| base < min || (base == min && frac < 0.0);

    let (mut base, mut frac) = (value.saturating_add(whole), frac);
    if above(base, frac) || below(base, frac) {
        base = value.saturating_sub(whole);
        frac = -frac;
    }
    if above(base, frac) {
        max
    } else if below(base, frac) {
        min
    } else {
        truncate_toward_zero(base, frac)
    }
}

/// Truncates `base + frac` toward zero, where `base` is whole and
/// `|frac| < 1`.
fn truncate_toward_zero(base: i128, frac: f64) -> i128 {
    if base > 0 && frac < 0.0 {
        base - 1
    } else if base < 0 && frac > 0.0 {
        base + 1
    } else {
        base
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.allele {
            Allele::ValueSet { value, options } => {
                write!(f, "{}='{}' of {:?}", self.name, value, options)?
            }
            Allele::Natural { value, max } => write!(f, "{}={} in [0, {}]", self.name, value, max)?,
            Allele::Integer { value, min, max } => {
                write!(f, "{}={} in [{}, {}]", self.name, value, min, max)?
            }
            Allele::Real { value, min, max } => {
                write!(f, "{}={} in [{}, {}]", self.name, value, min, max)?
            }
        }
        if self.dominant {
            write!(f, " (dominant)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;
    use rand::Rng;

    const COLORS: [&str; 5] = ["brown", "green", "grey", "blue", "chocolate"];

    // ---- Construction ----

    #[test]
    fn test_real_rejects_inverted_bounds() {
        let err = Gene::real("x", 0.0, 1.0, -1.0).unwrap_err();
        assert!(matches!(err, GaError::InvalidBounds { .. }));
    }

    #[test]
    fn test_real_rejects_infinite_bounds() {
        let err = Gene::real("x", 0.0, f64::NEG_INFINITY, 1.0).unwrap_err();
        assert!(matches!(err, GaError::InvalidBounds { .. }));
    }

    #[test]
    fn test_integer_rejects_inverted_bounds() {
        assert!(matches!(
            Gene::integer("n", 0, 5, -5),
            Err(GaError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_value_out_of_domain() {
        assert!(matches!(
            Gene::real("x", 11.0, -10.0, 10.0),
            Err(GaError::ValueOutOfDomain { .. })
        ));
        assert!(matches!(
            Gene::natural("n", 4, 3),
            Err(GaError::ValueOutOfDomain { .. })
        ));
        assert!(matches!(
            Gene::value_set("c", "purple", COLORS),
            Err(GaError::ValueOutOfDomain { .. })
        ));
    }

    #[test]
    fn test_empty_options() {
        let none: [&str; 0] = [];
        assert_eq!(
            Gene::value_set("c", "x", none),
            Err(GaError::EmptyOptions {
                gene: "c".to_string()
            })
        );
    }

    #[test]
    fn test_negative_mutation_rate() {
        let gene = Gene::real("x", 0.0, -1.0, 1.0).unwrap();
        assert!(matches!(
            gene.with_mutation_rate(-0.1),
            Err(GaError::InvalidMutationRate { .. })
        ));
    }

    #[test]
    fn test_defaults() {
        let gene = Gene::natural("n", 2, 10).unwrap();
        assert!(!gene.is_dominant());
        assert!((gene.mutation_rate() - 1.0).abs() < 1e-15);
        assert_eq!(gene.kind(), GeneKind::Natural);
        assert_eq!(gene.bounds(), Some((0.0, 10.0)));
        assert_eq!(gene.as_integer(), Some(2));
        assert!(gene.choice().is_none());
    }

    // ---- Dominance ----

    #[test]
    fn test_dominance_ordering() {
        let strong = Gene::real("a", 0.0, -1.0, 1.0).unwrap().dominant(true);
        let weak = Gene::real("a", 0.5, -1.0, 1.0).unwrap();

        assert!(strong.dominates(&weak));
        assert!(!weak.dominates(&strong));
        assert!(weak.recessive_to(&strong));
        assert!(!strong.recessive_to(&weak));
        assert!(!strong.rank_equals(&weak));
    }

    #[test]
    fn test_rank_equals_ignores_value() {
        let a = Gene::real("a", 0.0, -1.0, 1.0).unwrap();
        let b = Gene::real("a", 0.9, -1.0, 1.0).unwrap();
        assert!(a.rank_equals(&b));
        assert!(!a.dominates(&b));
        assert!(!a.recessive_to(&b));
    }

    // ---- Mutation ----

    #[test]
    fn test_zero_chance_keeps_numeric_value() {
        let mut rng = create_rng(42);
        let mut gene = Gene::real("x", 3.25, -10.0, 10.0).unwrap();
        for _ in 0..100 {
            gene.mutate(0.0, &mut rng);
        }
        assert_eq!(gene.number(), Some(3.25));
    }

    #[test]
    fn test_zero_mutation_rate_freezes_gene() {
        let mut rng = create_rng(42);
        let mut gene = Gene::value_set("c", "grey", COLORS)
            .unwrap()
            .with_mutation_rate(0.0)
            .unwrap();
        for _ in 0..200 {
            gene.mutate(1.0, &mut rng);
        }
        assert_eq!(gene.choice(), Some("grey"));
    }

    #[test]
    fn test_full_chance_value_set_eventually_changes() {
        let mut rng = create_rng(3);
        let mut gene = Gene::value_set("c", "brown", COLORS).unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            gene.mutate(1.0, &mut rng);
            seen.insert(gene.choice().unwrap().to_string());
        }
        assert_eq!(seen.len(), COLORS.len());
    }

    #[test]
    fn test_numeric_mutation_moves_value() {
        let mut rng = create_rng(11);
        let mut gene = Gene::real("x", 0.0, -10.0, 10.0).unwrap();
        gene.mutate(0.5, &mut rng);
        assert_ne!(gene.number(), Some(0.0));
    }

    #[test]
    fn test_shift_reflects_instead_of_clamping() {
        // value 9, range 20, r = 0.75, chance 0.2 -> delta = 2.0
        // 9 + 2 = 11 > 10, so the mirrored point 9 - 2 = 7 is taken
        let shifted = shift(9.0, -10.0, 10.0, 0.75, 0.2);
        assert!((shifted - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_shift_in_range_is_plain_add() {
        let shifted = shift(0.0, -10.0, 10.0, 0.75, 0.2);
        assert!((shifted - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_shift_clamps_double_violation() {
        // delta = 20 * 0.98 * 1.0 = 19.6; both 5 + 19.6 and 5 - 19.6 leave the range
        let shifted = shift(5.0, -10.0, 10.0, 0.99, 1.0);
        assert!((-10.0..=10.0).contains(&shifted));
        assert!((shifted - -10.0).abs() < 1e-12);
    }

    #[test]
    fn test_truncate_toward_zero() {
        // -3 - 0.5 = -3.5 -> -3, and -3 + 0.5 = -2.5 -> -2
        assert_eq!(truncate_toward_zero(-3, -0.5), -3);
        assert_eq!(truncate_toward_zero(-3, 0.5), -2);
        // 3 + 0.5 = 3.5 -> 3, and 3 - 0.5 = 2.5 -> 2
        assert_eq!(truncate_toward_zero(3, 0.5), 3);
        assert_eq!(truncate_toward_zero(3, -0.5), 2);
        assert_eq!(truncate_toward_zero(0, -0.5), 0);
        assert_eq!(truncate_toward_zero(0, 0.5), 0);
    }

    #[test]
    fn test_shift_whole_truncates_fractional_results() {
        // range 20, r = 0.75 -> delta = 10 * 0.035 = +0.35
        assert_eq!(shift_whole(-3, -10, 10, 0.75, 0.035), -2);
        assert_eq!(shift_whole(3, -10, 10, 0.75, 0.035), 3);
        // r = 0.25 -> delta = -0.35
        assert_eq!(shift_whole(-3, -10, 10, 0.25, 0.035), -3);
        assert_eq!(shift_whole(3, -10, 10, 0.25, 0.035), 2);
    }

    #[test]
    fn test_shift_whole_reflects_then_clamps() {
        // delta = 20 * 0.5 * 0.2 = 2: 9 + 2 leaves the range, 9 - 2 = 7
        assert_eq!(shift_whole(9, -10, 10, 0.75, 0.2), 7);
        // delta = 19.6: both directions leave the range
        assert_eq!(shift_whole(5, -10, 10, 0.99, 1.0), -10);
    }

    #[test]
    fn test_zero_chance_keeps_large_whole_values() {
        let mut rng = create_rng(42);
        let top = (1u64 << 60) + 255;
        let mut natural = Gene::natural("n", top, top).unwrap();
        let odd = (1i64 << 53) + 1;
        let mut integer = Gene::integer("i", odd, 0, i64::MAX).unwrap();
        for _ in 0..20 {
            natural.mutate(0.0, &mut rng);
            integer.mutate(0.0, &mut rng);
        }
        assert_eq!(natural.allele(), &Allele::Natural { value: top, max: top });
        assert_eq!(integer.as_integer(), Some(odd));
    }

    #[test]
    fn test_large_whole_bounds_hold_under_mutation() {
        let mut rng = create_rng(8);
        let top = (1u64 << 60) + 255;
        let mut natural = Gene::natural("n", top, top).unwrap();
        let lo = i64::MAX - 1000;
        let mut near_max = Gene::integer("i", i64::MAX, lo, i64::MAX).unwrap();
        let mut full = Gene::integer("f", 0, i64::MIN, i64::MAX).unwrap();
        for _ in 0..500 {
            natural.mutate(1.0, &mut rng);
            near_max.mutate(1.0, &mut rng);
            full.mutate(1.0, &mut rng);
            assert!(matches!(natural.allele(), Allele::Natural { value, .. } if *value <= top));
            assert!(near_max.as_integer().unwrap() >= lo);
            assert!(full.as_integer().is_some());
        }
    }

    #[test]
    fn test_integer_stays_in_small_range() {
        let mut rng = create_rng(5);
        let mut gene = Gene::integer("k", 0, -7, 7).unwrap();
        for _ in 0..500 {
            gene.mutate(0.3, &mut rng);
            let v = gene.as_integer().unwrap();
            assert!((-7..=7).contains(&v));
        }
    }

    #[test]
    fn test_mutate_consumes_one_draw_for_numeric() {
        let mut rng = create_rng(77);
        let mut replay = create_rng(77);
        let mut gene = Gene::real("x", 0.0, -1.0, 1.0).unwrap();
        gene.mutate(0.1, &mut rng);
        let _: f64 = replay.random();
        assert_eq!(rng.random::<u64>(), replay.random::<u64>());
    }

    #[test]
    fn test_display() {
        let gene = Gene::integer("k", 3, 0, 9).unwrap().dominant(true);
        assert_eq!(gene.to_string(), "k=3 in [0, 9] (dominant)");
    }

    // ---- Invariants ----

    proptest! {
        #[test]
        fn prop_real_stays_in_bounds(
            seed in any::<u64>(),
            lo in -1e3f64..0.0,
            span in 0.0f64..1e3,
            chance in 0.0f64..4.0,
            steps in 1usize..64,
        ) {
            let mut rng = create_rng(seed);
            let hi = lo + span;
            let mut gene = Gene::real("x", lo, lo, hi).unwrap();
            for _ in 0..steps {
                gene.mutate(chance, &mut rng);
                let v = gene.number().unwrap();
                prop_assert!(lo <= v && v <= hi, "{} not in [{}, {}]", v, lo, hi);
            }
        }

        #[test]
        fn prop_integer_and_natural_stay_in_bounds(
            seed in any::<u64>(),
            lo in -500i64..0,
            span in 0i64..500,
            chance in 0.0f64..4.0,
        ) {
            let mut rng = create_rng(seed);
            let mut int_gene = Gene::integer("i", lo, lo, lo + span).unwrap();
            let mut nat_gene = Gene::natural("n", 0, span as u64).unwrap();
            for _ in 0..32 {
                int_gene.mutate(chance, &mut rng);
                nat_gene.mutate(chance, &mut rng);
                let i = int_gene.as_integer().unwrap();
                let n = nat_gene.as_integer().unwrap();
                prop_assert!(lo <= i && i <= lo + span);
                prop_assert!(0 <= n && n <= span);
            }
        }

        #[test]
        fn prop_value_set_stays_in_options(seed in any::<u64>(), chance in 0.0f64..2.0) {
            let mut rng = create_rng(seed);
            let mut gene = Gene::value_set("c", "blue", COLORS).unwrap();
            for _ in 0..32 {
                gene.mutate(chance, &mut rng);
                prop_assert!(COLORS.contains(&gene.choice().unwrap()));
            }
        }
    }
}
