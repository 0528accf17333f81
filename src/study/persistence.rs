//! Aggregate study formats.
//!
//! Two formats hold a whole study:
//!
//! - **YAML**: a `parameter_names` list plus one `parameter_sets` entry per
//!   set with its name, identifier, hash and values.
//! - **Binary**: a column-major table encoded with `bincode`, prefixed by
//!   [`BINARY_MAGIC`]. It additionally keeps the sampling quantiles.
//!
//! Readers detect the format from the leading bytes, so a previous study
//! can be given in either. Per-set files use the same two formats.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::settings::OutputFormat;
use crate::value::Value;

use super::{ParameterSet, ParameterStudy};

/// Leading bytes of the binary study format.
pub const BINARY_MAGIC: [u8; 4] = *b"PSTB";
const BINARY_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct YamlStudy {
    parameter_names: Vec<String>,
    parameter_sets: Vec<YamlSet>,
}

#[derive(Serialize, Deserialize)]
struct YamlSet {
    set_name: String,
    set_id: u64,
    set_hash: String,
    parameters: serde_yaml::Mapping,
}

/// Column-major table; `columns[c][s]` is parameter `c` of set `s`.
#[derive(Serialize, Deserialize)]
struct TabularStudy {
    version: u32,
    parameter_names: Vec<String>,
    set_names: Vec<String>,
    set_ids: Vec<u64>,
    set_hashes: Vec<String>,
    columns: Vec<Vec<Cell>>,
    quantiles: Option<Vec<Vec<f64>>>,
}

/// Externally tagged mirror of [`Value`] for formats that are not
/// self-describing.
#[derive(Serialize, Deserialize)]
enum Cell {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(v) => Self::Bool(*v),
            Value::Int(v) => Self::Int(*v),
            Value::Float(v) => Self::Float(*v),
            Value::Str(v) => Self::Str(v.clone()),
        }
    }
}

impl From<Cell> for Value {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Bool(v) => Self::Bool(v),
            Cell::Int(v) => Self::Int(v),
            Cell::Float(v) => Self::Float(v),
            Cell::Str(v) => Self::Str(v),
        }
    }
}

/// Reads an aggregate study from disk, in either format.
///
/// # Errors
///
/// Returns [`Error::InputNotFound`] if `path` is not a file, and
/// [`Error::CorruptStudy`] / [`Error::Yaml`] / [`Error::Binary`] if its
/// contents cannot be decoded.
pub fn read_study(path: &Path) -> Result<ParameterStudy> {
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    let study = study_from_bytes(&bytes)?;
    trace_debug!(path = %path.display(), sets = study.len(), "read parameter study");
    Ok(study)
}

/// Encodes a study in the given aggregate format.
///
/// # Errors
///
/// Returns [`Error::Yaml`] or [`Error::Binary`] if encoding fails.
pub fn study_to_bytes(study: &ParameterStudy, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Yaml => Ok(to_yaml(study)?.into_bytes()),
        OutputFormat::Binary => to_binary(study),
    }
}

/// Decodes a study, detecting the format from the leading bytes.
///
/// # Errors
///
/// Returns [`Error::CorruptStudy`] for inconsistent contents and
/// [`Error::Yaml`] / [`Error::Binary`] for undecodable input.
pub fn study_from_bytes(bytes: &[u8]) -> Result<ParameterStudy> {
    match bytes.strip_prefix(&BINARY_MAGIC) {
        Some(payload) => from_binary(payload),
        None => {
            let text = core::str::from_utf8(bytes)
                .map_err(|err| Error::CorruptStudy(format!("not a binary study and not UTF-8 text: {err}")))?;
            from_yaml(text)
        }
    }
}

/// Per-set file contents.
///
/// YAML holds the set's values as a plain mapping. Binary holds a one-set
/// table, so a per-set file reads back with [`study_from_bytes`].
pub(crate) fn set_to_bytes(study: &ParameterStudy, set: &ParameterSet, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&study.set_mapping(set))?.into_bytes()),
        OutputFormat::Binary => to_binary(&ParameterStudy {
            parameter_names: study.parameter_names.clone(),
            sets: vec![set.clone()],
        }),
    }
}

fn to_yaml(study: &ParameterStudy) -> Result<String> {
    let document = YamlStudy {
        parameter_names: study.parameter_names.clone(),
        parameter_sets: study
            .sets
            .iter()
            .map(|set| YamlSet {
                set_name: set.set_name.clone(),
                set_id: set.set_id,
                set_hash: set.set_hash.clone(),
                parameters: study.set_mapping(set),
            })
            .collect(),
    };
    Ok(serde_yaml::to_string(&document)?)
}

fn from_yaml(text: &str) -> Result<ParameterStudy> {
    let document: YamlStudy = serde_yaml::from_str(text)?;
    let sets = document
        .parameter_sets
        .into_iter()
        .map(|entry| {
            let values = entry
                .parameters
                .iter()
                .map(|(key, value)| {
                    let name = key.as_str().ok_or_else(|| {
                        Error::CorruptStudy(format!("set '{}' has a non-string parameter name", entry.set_name))
                    })?;
                    let value = Value::from_yaml(value).ok_or_else(|| {
                        Error::CorruptStudy(format!(
                            "set '{}' parameter '{name}' is not a scalar",
                            entry.set_name
                        ))
                    })?;
                    Ok((name.to_owned(), value))
                })
                .collect::<Result<BTreeMap<_, _>>>()?;
            verified(ParameterSet::new(entry.set_id, entry.set_name, values), &entry.set_hash)
        })
        .collect::<Result<Vec<_>>>()?;
    ParameterStudy::new(document.parameter_names, sets)
}

fn to_binary(study: &ParameterStudy) -> Result<Vec<u8>> {
    let columns: Vec<Vec<Cell>> = study
        .parameter_names
        .iter()
        .map(|name| {
            study
                .sets
                .iter()
                .map(|set| set.values.get(name).unwrap_or(&Value::MISSING).into())
                .collect()
        })
        .collect();
    let quantiles: Option<Vec<Vec<f64>>> = study.has_quantiles().then(|| {
        study
            .parameter_names
            .iter()
            .map(|name| {
                study
                    .sets
                    .iter()
                    .map(|set| {
                        set.quantiles
                            .as_ref()
                            .and_then(|q| q.get(name).copied())
                            .unwrap_or(f64::NAN)
                    })
                    .collect()
            })
            .collect()
    });

    let table = TabularStudy {
        version: BINARY_VERSION,
        parameter_names: study.parameter_names.clone(),
        set_names: study.sets.iter().map(|s| s.set_name.clone()).collect(),
        set_ids: study.sets.iter().map(|s| s.set_id).collect(),
        set_hashes: study.sets.iter().map(|s| s.set_hash.clone()).collect(),
        columns,
        quantiles,
    };
    let mut bytes = BINARY_MAGIC.to_vec();
    bincode::serialize_into(&mut bytes, &table)?;
    Ok(bytes)
}

fn from_binary(payload: &[u8]) -> Result<ParameterStudy> {
    let table: TabularStudy = bincode::deserialize(payload)?;
    if table.version != BINARY_VERSION {
        return Err(Error::CorruptStudy(format!(
            "unsupported binary study version {}",
            table.version
        )));
    }
    let n = table.set_names.len();
    let width = table.parameter_names.len();
    let consistent = table.set_ids.len() == n
        && table.set_hashes.len() == n
        && table.columns.len() == width
        && table.columns.iter().all(|column| column.len() == n)
        && table
            .quantiles
            .as_ref()
            .is_none_or(|q| q.len() == width && q.iter().all(|column| column.len() == n));
    if !consistent {
        return Err(Error::CorruptStudy(
            "binary study columns have mismatched lengths".to_owned(),
        ));
    }

    let mut rows: Vec<BTreeMap<String, Value>> = vec![BTreeMap::new(); n];
    for (name, column) in table.parameter_names.iter().zip(table.columns) {
        for (row, cell) in rows.iter_mut().zip(column) {
            row.insert(name.clone(), cell.into());
        }
    }
    let mut quantile_rows: Option<Vec<BTreeMap<String, f64>>> = table.quantiles.map(|columns| {
        let mut rows = vec![BTreeMap::new(); n];
        for (name, column) in table.parameter_names.iter().zip(columns) {
            for (row, q) in rows.iter_mut().zip(column) {
                if !q.is_nan() {
                    row.insert(name.clone(), q);
                }
            }
        }
        rows
    });

    let sets = table
        .set_ids
        .into_iter()
        .zip(table.set_names)
        .zip(table.set_hashes)
        .zip(rows)
        .enumerate()
        .map(|(index, (((set_id, set_name), set_hash), values))| {
            let set = verified(ParameterSet::new(set_id, set_name, values), &set_hash)?;
            let quantiles = quantile_rows
                .as_mut()
                .map(|rows| core::mem::take(&mut rows[index]))
                .filter(|q| !q.is_empty());
            Ok(match quantiles {
                Some(q) => set.with_quantiles(q),
                None => set,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    ParameterStudy::new(table.parameter_names, sets)
}

/// Checks a recomputed hash against the stored one.
fn verified(set: ParameterSet, stored: &str) -> Result<ParameterSet> {
    if set.set_hash == stored {
        Ok(set)
    } else {
        Err(Error::CorruptStudy(format!(
            "set '{}' hash does not match its values",
            set.set_name
        )))
    }
}
