//! Parameter sets and the studies that collect them.

use std::collections::{BTreeMap, HashSet};

use crate::error::{Error, Result};
use crate::sampler::SampleTable;
use crate::template::NameTemplate;
use crate::value::Value;

mod export;
mod hash;
mod merge;
mod persistence;

pub use export::{OutputTarget, WriteOptions, WriteReport, WriteStatus, write_study};
pub use merge::{MergeOutcome, merge};
pub use persistence::{BINARY_MAGIC, read_study, study_from_bytes, study_to_bytes};

/// One concrete assignment of values to parameters.
///
/// A set is identified by its numeric `set_id`; its `set_name` is rendered
/// from the set name template and its `set_hash` is derived from its
/// values.
#[derive(Clone, Debug)]
pub struct ParameterSet {
    set_id: u64,
    set_name: String,
    set_hash: String,
    values: BTreeMap<String, Value>,
    quantiles: Option<BTreeMap<String, f64>>,
}

impl ParameterSet {
    /// Creates a set and computes its content hash.
    #[must_use]
    pub fn new(set_id: u64, set_name: impl Into<String>, values: BTreeMap<String, Value>) -> Self {
        let set_hash = hash::set_hash(&values);
        Self {
            set_id,
            set_name: set_name.into(),
            set_hash,
            values,
            quantiles: None,
        }
    }

    /// Attaches the unit-interval quantiles behind the values.
    #[must_use]
    pub fn with_quantiles(mut self, quantiles: BTreeMap<String, f64>) -> Self {
        self.quantiles = Some(quantiles);
        self
    }

    /// The numeric identifier.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.set_id
    }

    /// The rendered set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.set_name
    }

    /// SHA-256 hex digest of the set's non-missing values.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.set_hash
    }

    /// Values keyed by parameter name.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Looks up one value.
    #[must_use]
    pub fn get(&self, parameter: &str) -> Option<&Value> {
        self.values.get(parameter)
    }

    /// Quantiles keyed by parameter name, for sampled sets.
    #[must_use]
    pub fn quantiles(&self) -> Option<&BTreeMap<String, f64>> {
        self.quantiles.as_ref()
    }

    pub(crate) fn renamed(mut self, set_id: u64, template: &NameTemplate) -> Self {
        self.set_id = set_id;
        self.set_name = template.render(set_id);
        self
    }
}

/// An ordered collection of parameter sets over a common set of columns.
///
/// Every set has a value for every column; columns a set does not carry
/// hold [`Value::MISSING`]. Set names and identifiers are unique.
#[derive(Clone, Debug, Default)]
pub struct ParameterStudy {
    parameter_names: Vec<String>,
    sets: Vec<ParameterSet>,
}

impl ParameterStudy {
    /// Builds a study, padding every set to the union of columns.
    ///
    /// Columns keep the order of `parameter_names`; names only found in
    /// sets are appended in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptStudy`] if two sets share a name or an
    /// identifier.
    pub fn new(parameter_names: Vec<String>, sets: Vec<ParameterSet>) -> Result<Self> {
        let mut columns = parameter_names;
        let known: HashSet<&String> = columns.iter().collect();
        let mut extra: Vec<String> = sets
            .iter()
            .flat_map(|set| set.values.keys())
            .filter(|name| !known.contains(name))
            .cloned()
            .collect();
        extra.sort();
        extra.dedup();
        columns.extend(extra);

        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        let mut padded = Vec::with_capacity(sets.len());
        for mut set in sets {
            if !names.insert(set.set_name.clone()) {
                return Err(Error::CorruptStudy(format!(
                    "duplicate set name '{}'",
                    set.set_name
                )));
            }
            if !ids.insert(set.set_id) {
                return Err(Error::CorruptStudy(format!(
                    "duplicate set identifier {}",
                    set.set_id
                )));
            }
            for column in &columns {
                set.values
                    .entry(column.clone())
                    .or_insert(Value::MISSING);
            }
            padded.push(set);
        }

        Ok(Self {
            parameter_names: columns,
            sets: padded,
        })
    }

    /// Names sets `0..n` in row order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptStudy`] if the template renders two rows to
    /// the same name.
    pub fn from_table(table: SampleTable, template: &NameTemplate) -> Result<Self> {
        let SampleTable {
            parameter_names,
            rows,
            quantiles,
        } = table;
        let mut quantiles = quantiles.map(Vec::into_iter);

        let sets = (0_u64..)
            .zip(rows)
            .map(|(set_id, row)| {
                let values = parameter_names.iter().cloned().zip(row).collect();
                let set = ParameterSet::new(set_id, template.render(set_id), values);
                match quantiles.as_mut().and_then(Iterator::next) {
                    Some(q) => set.with_quantiles(parameter_names.iter().cloned().zip(q).collect()),
                    None => set,
                }
            })
            .collect();
        Self::new(parameter_names, sets)
    }

    /// Column names.
    #[must_use]
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Sets in study order.
    #[must_use]
    pub fn sets(&self) -> &[ParameterSet] {
        &self.sets
    }

    /// Number of sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if the study has no sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Finds a set by name.
    #[must_use]
    pub fn get(&self, set_name: &str) -> Option<&ParameterSet> {
        self.sets.iter().find(|set| set.set_name == set_name)
    }

    /// Set names in study order.
    #[must_use]
    pub fn set_names(&self) -> Vec<&str> {
        self.sets.iter().map(ParameterSet::name).collect()
    }

    /// Largest identifier in the study.
    #[must_use]
    pub fn max_set_id(&self) -> Option<u64> {
        self.sets.iter().map(ParameterSet::id).max()
    }

    /// Returns `true` if any set carries quantiles.
    #[must_use]
    pub fn has_quantiles(&self) -> bool {
        self.sets.iter().any(|set| set.quantiles.is_some())
    }

    /// The parameter values of one set, in column order, as a YAML mapping.
    pub(crate) fn set_mapping(&self, set: &ParameterSet) -> serde_yaml::Mapping {
        self.parameter_names
            .iter()
            .filter_map(|name| {
                let value = set.values.get(name)?;
                Some((
                    serde_yaml::Value::String(name.clone()),
                    value_to_yaml(value),
                ))
            })
            .collect()
    }
}

pub(crate) fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Bool(v) => serde_yaml::Value::Bool(*v),
        Value::Int(v) => serde_yaml::Value::Number((*v).into()),
        Value::Float(v) => serde_yaml::Value::Number((*v).into()),
        Value::Str(v) => serde_yaml::Value::String(v.clone()),
    }
}
