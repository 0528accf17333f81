//! Quasi-random sampler using Sobol low-discrepancy sequences.
//!
//! [`SobolSequence`] draws points from a Sobol sequence scrambled with the
//! Burley 2020 algorithm. Row `i` uses sequence index `i` and parameter `j`
//! uses Sobol dimension `j`, so the design is fully determined by the seed
//! and the declaration order. The resulting point in \[0, 1) is mapped
//! through each parameter's percent-point function.
//!
//! At most [`sobol_burley::NUM_DIMENSIONS`] parameters can be sampled.

use sobol_burley::{NUM_DIMENSIONS, sample};

use crate::error::{Error, Result};
use crate::schema::{GeneratorKind, ParameterSchema};

use super::{SampleTable, Sampler, apply_distributions};

/// Scrambled Sobol sampler over named distributions.
///
/// Without an explicit seed a random scramble seed is drawn once at
/// construction, so repeated calls on the same sampler agree.
///
/// # Examples
///
/// ```
/// use parameter_study::sampler::{SobolSequence, Sampler};
/// use parameter_study::schema::{GeneratorKind, ParameterSchema};
///
/// let schema = ParameterSchema::from_yaml_str(
///     "{num_simulations: 8, x: {distribution: norm}, y: {distribution: expon}}",
///     GeneratorKind::SobolSequence,
/// )
/// .unwrap();
/// let sampler = SobolSequence::with_seed(7);
/// assert_eq!(sampler.sample(&schema).unwrap().rows, sampler.sample(&schema).unwrap().rows);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SobolSequence {
    seed: u32,
}

impl SobolSequence {
    /// Creates a sampler with a random scramble seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seed: fastrand::u32(..),
        }
    }

    /// Creates a sampler with the given scramble seed.
    ///
    /// Different seeds produce statistically independent sequences.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: (seed ^ (seed >> 32)) as u32,
        }
    }
}

impl Default for SobolSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for SobolSequence {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::SobolSequence
    }

    fn check(&self, schema: &ParameterSchema) -> Result<()> {
        super::ensure_kind(self.kind(), schema)?;
        let dimensions = schema.parameters().len();
        if dimensions > NUM_DIMENSIONS as usize {
            return Err(Error::schema_type(
                "parameter schema",
                format!(
                    "sobol sequences support at most {NUM_DIMENSIONS} parameters, found {dimensions}"
                ),
            ));
        }
        let rows = schema.num_simulations().unwrap_or_default();
        if u32::try_from(rows).is_err() {
            return Err(Error::schema_type(
                "parameter schema",
                format!("sobol sequences support at most {} points, requested {rows}", u32::MAX),
            ));
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn sample(&self, schema: &ParameterSchema) -> Result<SampleTable> {
        self.check(schema)?;
        let n = schema.num_simulations().unwrap_or_default();
        let dimensions = schema.parameters().len();

        // Bounds on both casts are enforced by `check`.
        let design = (0..n)
            .map(|index| {
                (0..dimensions)
                    .map(|dim| f64::from(sample(index as u32, dim as u32, self.seed)))
                    .collect()
            })
            .collect();

        let table = apply_distributions(schema, design)?;
        trace_debug!(
            rows = table.len(),
            columns = dimensions,
            seed = self.seed,
            "sobol sequence sampled"
        );
        Ok(table)
    }
}
