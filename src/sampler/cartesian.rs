//! Full factorial sampler over explicit value lists.

use crate::error::{Error, Result};
use crate::schema::{GeneratorKind, ParameterSchema, ParameterSpec};
use crate::value::Value;

use super::{SampleTable, Sampler};

/// Cartesian product of every parameter's value list.
///
/// Rows follow odometer order: the last declared parameter varies fastest.
/// The row count is the product of the list lengths, so any empty list (or
/// a schema without parameters) yields an empty table.
///
/// # Examples
///
/// ```
/// use parameter_study::sampler::{CartesianProduct, Sampler};
/// use parameter_study::schema::{GeneratorKind, ParameterSchema};
///
/// let schema = ParameterSchema::from_yaml_str(
///     "{a: [1, 2], b: [x, y, z]}",
///     GeneratorKind::CartesianProduct,
/// )
/// .unwrap();
/// let table = CartesianProduct::new().sample(&schema).unwrap();
/// assert_eq!(table.len(), 6);
/// assert_eq!(table.rows[1][1], "y".into());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CartesianProduct;

impl CartesianProduct {
    /// Creates the sampler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Sampler for CartesianProduct {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::CartesianProduct
    }

    fn sample(&self, schema: &ParameterSchema) -> Result<SampleTable> {
        super::ensure_kind(self.kind(), schema)?;
        let lists = schema
            .parameters()
            .iter()
            .map(|parameter| match &parameter.spec {
                ParameterSpec::Values(values) => Ok(values.as_slice()),
                ParameterSpec::Distribution(_) | ParameterSpec::Tabulated => {
                    Err(Error::schema_type(
                        format!("parameter '{}'", parameter.name),
                        "expected a list of values",
                    ))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SampleTable {
            parameter_names: schema.parameter_names(),
            rows: product(&lists),
            quantiles: None,
        })
    }
}

/// Odometer enumeration of `lists`, last list fastest.
pub(crate) fn product(lists: &[&[Value]]) -> Vec<Vec<Value>> {
    if lists.is_empty() || lists.iter().any(|list| list.is_empty()) {
        return Vec::new();
    }
    let total: usize = lists.iter().map(|list| list.len()).product();
    let mut rows = Vec::with_capacity(total);
    let mut digits = vec![0_usize; lists.len()];
    for _ in 0..total {
        rows.push(
            lists
                .iter()
                .zip(&digits)
                .map(|(list, &i)| list[i].clone())
                .collect(),
        );
        for (digit, list) in digits.iter_mut().zip(lists).rev() {
            *digit += 1;
            if *digit < list.len() {
                break;
            }
            *digit = 0;
        }
    }
    rows
}
