//! Passthrough sampler for caller-supplied tables.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::schema::{GeneratorKind, PARAMETER_SAMPLES_KEY, ParameterSchema};
use crate::value::Value;

use super::{SampleTable, Sampler};

/// Explicit table of parameter sets.
///
/// Rows come either from the schema's own `parameter_samples` table or
/// from [`with_rows`](Self::with_rows), which takes precedence. Every row
/// must carry exactly the declared parameters. No randomness is involved.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use parameter_study::Value;
/// use parameter_study::sampler::{CustomStudy, Sampler};
/// use parameter_study::schema::{GeneratorKind, ParameterSchema};
///
/// let schema = ParameterSchema::from_yaml_str(
///     "{num_simulations: 1, parameter_1: [1, 2]}",
///     GeneratorKind::CustomStudy,
/// )
/// .unwrap();
/// let row = BTreeMap::from([("parameter_1".to_owned(), Value::Int(1))]);
/// let table = CustomStudy::new().with_rows(vec![row]).sample(&schema).unwrap();
/// assert_eq!(table.rows, vec![vec![Value::Int(1)]]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CustomStudy {
    rows: Option<Vec<BTreeMap<String, Value>>>,
}

impl CustomStudy {
    /// Creates a sampler that reads rows from the schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the rows explicitly, keyed by parameter name.
    #[must_use]
    pub fn with_rows(mut self, rows: Vec<BTreeMap<String, Value>>) -> Self {
        self.rows = Some(rows);
        self
    }

    fn explicit_rows(&self, names: &[String]) -> Option<Result<Vec<Vec<Value>>>> {
        let rows = self.rows.as_ref()?;
        Some(
            rows.iter()
                .enumerate()
                .map(|(index, row)| order_row(index, row, names))
                .collect(),
        )
    }
}

fn order_row(index: usize, row: &BTreeMap<String, Value>, names: &[String]) -> Result<Vec<Value>> {
    let context = format!("custom study row {index}");
    if let Some(extra) = row.keys().find(|key| !names.contains(key)) {
        return Err(Error::schema_type(
            context,
            format!("'{extra}' is not a declared parameter"),
        ));
    }
    names
        .iter()
        .map(|name| {
            row.get(name)
                .cloned()
                .ok_or_else(|| Error::missing(&context, name))
        })
        .collect()
}

impl Sampler for CustomStudy {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::CustomStudy
    }

    fn check(&self, schema: &ParameterSchema) -> Result<()> {
        self.sample(schema).map(|_| ())
    }

    fn sample(&self, schema: &ParameterSchema) -> Result<SampleTable> {
        super::ensure_kind(self.kind(), schema)?;
        let names = schema.parameter_names();
        let rows = match (self.explicit_rows(&names), schema.samples()) {
            (Some(rows), _) => rows?,
            (None, Some(samples)) => samples.to_vec(),
            (None, None) => return Err(Error::missing("custom study", PARAMETER_SAMPLES_KEY)),
        };
        trace_debug!(rows = rows.len(), columns = names.len(), "custom study table accepted");
        Ok(SampleTable {
            parameter_names: names,
            rows,
            quantiles: None,
        })
    }
}
