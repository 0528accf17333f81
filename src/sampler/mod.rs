//! Sampler trait and the four parameter study generation strategies.
//!
//! A [`Sampler`] turns a validated [`ParameterSchema`] into a
//! [`SampleTable`]: one row per parameter set, one column per parameter,
//! in schema declaration order. Set names, identifiers and hashes are
//! attached later by the study layer.

pub mod cartesian;
pub mod custom;
pub mod latin_hypercube;
pub mod sobol;

use crate::error::{Error, Result};
use crate::schema::{GeneratorKind, ParameterSchema, ParameterSpec};
use crate::value::Value;

pub use cartesian::CartesianProduct;
pub use custom::CustomStudy;
pub use latin_hypercube::LatinHypercube;
pub use sobol::SobolSequence;

/// Raw sampler output before identity is assigned.
#[derive(Clone, Debug, Default)]
pub struct SampleTable {
    /// Column names, in schema declaration order.
    pub parameter_names: Vec<String>,
    /// One row of values per parameter set.
    pub rows: Vec<Vec<Value>>,
    /// Uniform `[0, 1)` quantiles behind each sampled value, for the
    /// distribution-based strategies.
    pub quantiles: Option<Vec<Vec<f64>>>,
}

impl SampleTable {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Strategy that produces the rows of a parameter study.
///
/// Implementations hold only their own knobs (seed, custom rows); the
/// schema is passed to every call.
pub trait Sampler: Send + Sync {
    /// The generator this sampler implements.
    fn kind(&self) -> GeneratorKind;

    /// Checks strategy-specific constraints before any sampling happens.
    ///
    /// The default accepts every schema validated for [`kind`](Self::kind).
    ///
    /// # Errors
    ///
    /// Returns a schema error when the schema cannot be sampled.
    fn check(&self, schema: &ParameterSchema) -> Result<()> {
        ensure_kind(self.kind(), schema)
    }

    /// Produces the sample table for `schema`.
    ///
    /// # Errors
    ///
    /// Returns a schema error when the schema cannot be sampled.
    fn sample(&self, schema: &ParameterSchema) -> Result<SampleTable>;
}

/// Fails if `schema` was validated for a different generator.
pub(crate) fn ensure_kind(kind: GeneratorKind, schema: &ParameterSchema) -> Result<()> {
    if schema.kind() == kind {
        Ok(())
    } else {
        Err(Error::schema_type(
            "parameter schema",
            format!(
                "validated for '{}' but used with '{}'",
                schema.kind().as_str(),
                kind.as_str()
            ),
        ))
    }
}

/// Maps a unit-hypercube design onto each parameter's distribution.
///
/// `design[row][column]` is the quantile for the column's parameter.
pub(crate) fn apply_distributions(schema: &ParameterSchema, design: Vec<Vec<f64>>) -> Result<SampleTable> {
    let distributions = schema
        .parameters()
        .iter()
        .map(|parameter| match &parameter.spec {
            ParameterSpec::Distribution(distribution) => Ok(distribution),
            ParameterSpec::Values(_) | ParameterSpec::Tabulated => Err(Error::schema_type(
                format!("parameter '{}'", parameter.name),
                "expected a distribution definition",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    let rows = design
        .iter()
        .map(|quantiles| {
            distributions
                .iter()
                .zip(quantiles)
                .map(|(distribution, &q)| distribution.ppf(q))
                .collect()
        })
        .collect();

    Ok(SampleTable {
        parameter_names: schema.parameter_names(),
        rows,
        quantiles: Some(design),
    })
}

/// Builds the sampler for a generator with default knobs.
#[must_use]
pub fn for_kind(kind: GeneratorKind, seed: Option<u64>) -> Box<dyn Sampler> {
    match kind {
        GeneratorKind::CartesianProduct => Box::new(CartesianProduct::new()),
        GeneratorKind::CustomStudy => Box::new(CustomStudy::new()),
        GeneratorKind::LatinHypercube => Box::new(match seed {
            Some(seed) => LatinHypercube::with_seed(seed),
            None => LatinHypercube::new(),
        }),
        GeneratorKind::SobolSequence => Box::new(match seed {
            Some(seed) => SobolSequence::with_seed(seed),
            None => SobolSequence::new(),
        }),
    }
}
