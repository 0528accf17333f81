//! Latin hypercube sampler.
//!
//! [`LatinHypercube`] splits the unit interval of every parameter into
//! `num_simulations` equal strata and draws exactly one point per stratum,
//! pairing strata across parameters through independent random
//! permutations. Each point is then pushed through the parameter's
//! percent-point function.
//!
//! With a seed the design is reproducible; without one it is drawn from
//! entropy on every call.

use crate::error::Result;
use crate::rng_util;
use crate::schema::{GeneratorKind, ParameterSchema};

use super::{SampleTable, Sampler, apply_distributions};

/// Stratified random sampler over named distributions.
///
/// # Examples
///
/// ```
/// use parameter_study::sampler::{LatinHypercube, Sampler};
/// use parameter_study::schema::{GeneratorKind, ParameterSchema};
///
/// let schema = ParameterSchema::from_yaml_str(
///     "{num_simulations: 4, width: {distribution: uniform, loc: 1, scale: 2}}",
///     GeneratorKind::LatinHypercube,
/// )
/// .unwrap();
/// let table = LatinHypercube::with_seed(42).sample(&schema).unwrap();
/// assert_eq!(table.len(), 4);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct LatinHypercube {
    seed: Option<u64>,
}

impl LatinHypercube {
    /// Creates a sampler seeded from entropy.
    #[must_use]
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Creates a sampler with a fixed seed for reproducibility.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// The configured seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Sampler for LatinHypercube {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::LatinHypercube
    }

    fn sample(&self, schema: &ParameterSchema) -> Result<SampleTable> {
        super::ensure_kind(self.kind(), schema)?;
        let n = schema.num_simulations().unwrap_or_default();
        let dimensions = schema.parameters().len();

        let mut rng = rng_util::rng(self.seed);
        let columns: Vec<Vec<f64>> = (0..dimensions)
            .map(|_| rng_util::stratified_column(&mut rng, n))
            .collect();
        let design = (0..n)
            .map(|row| columns.iter().map(|column| column[row]).collect())
            .collect();

        let table = apply_distributions(schema, design)?;
        trace_debug!(
            rows = table.len(),
            columns = dimensions,
            seed = ?self.seed,
            "latin hypercube sampled"
        );
        Ok(table)
    }
}
