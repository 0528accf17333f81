//! Parameter schemas and their validation.
//!
//! A raw schema is a YAML mapping from parameter name to its definition.
//! Validation turns it into a typed [`ParameterSchema`] once, before any
//! sampling happens, and fails with:
//!
//! - [`Error::MissingKey`] when a required key is absent,
//! - [`Error::SchemaType`] when a value has the wrong type or a key is not
//!   a valid identifier,
//! - [`Error::UnknownDistribution`] / [`Error::InvalidDistribution`] when a
//!   distribution cannot be resolved from the catalog.
//!
//! The key `num_simulations` is reserved for every generator. The sampling
//! generators require it; the others ignore it.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde_yaml::{Mapping, Value as Yaml};

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::value::Value;

/// Reserved key holding the number of sets to sample.
pub const NUM_SIMULATIONS_KEY: &str = "num_simulations";
/// Reserved key holding a distribution name.
pub const DISTRIBUTION_KEY: &str = "distribution";
/// Custom study key holding the parameter names of an explicit table.
pub const PARAMETER_NAMES_KEY: &str = "parameter_names";
/// Custom study key holding the rows of an explicit table.
pub const PARAMETER_SAMPLES_KEY: &str = "parameter_samples";

const SCHEMA_CONTEXT: &str = "parameter schema";

/// The four parameter study generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Full factorial over explicit value lists.
    CartesianProduct,
    /// Caller-supplied table of sets.
    CustomStudy,
    /// Latin hypercube sampling of named distributions.
    LatinHypercube,
    /// Sobol sequence sampling of named distributions.
    SobolSequence,
}

impl GeneratorKind {
    /// Every generator, in command-line order.
    pub const ALL: [Self; 4] = [
        Self::CartesianProduct,
        Self::CustomStudy,
        Self::LatinHypercube,
        Self::SobolSequence,
    ];

    /// The subcommand name of this generator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CartesianProduct => "cartesian_product",
            Self::CustomStudy => "custom_study",
            Self::LatinHypercube => "latin_hypercube",
            Self::SobolSequence => "sobol_sequence",
        }
    }

    /// Returns `true` for generators that sample distributions.
    #[must_use]
    pub fn is_sampling(self) -> bool {
        matches!(self, Self::LatinHypercube | Self::SobolSequence)
    }
}

/// How one parameter gets its values.
#[derive(Clone, Debug)]
pub enum ParameterSpec {
    /// An explicit list of discrete values.
    Values(Vec<Value>),
    /// A named distribution sampled through its percent-point function.
    Distribution(Distribution),
    /// A column of the schema's explicit sample table.
    Tabulated,
}

/// A named parameter and its specification.
#[derive(Clone, Debug)]
pub struct ParameterDefinition {
    /// The parameter name, a valid identifier.
    pub name: String,
    /// How the parameter is generated.
    pub spec: ParameterSpec,
}

/// A validated parameter schema.
///
/// Parameters keep their declaration order, which fixes column order and
/// the Cartesian product row order.
#[derive(Clone, Debug)]
pub struct ParameterSchema {
    kind: GeneratorKind,
    num_simulations: Option<usize>,
    parameters: Vec<ParameterDefinition>,
    samples: Option<Vec<Vec<Value>>>,
}

impl ParameterSchema {
    /// Validates a raw YAML schema for the given generator.
    ///
    /// # Errors
    ///
    /// Returns the schema error family described in the [module docs](self).
    ///
    /// # Examples
    ///
    /// ```
    /// use parameter_study::schema::{GeneratorKind, ParameterSchema};
    ///
    /// let raw = serde_yaml::from_str("{parameter_1: {distribution: norm, kwarg1: 1}}").unwrap();
    /// let err = ParameterSchema::validate(&raw, GeneratorKind::LatinHypercube).unwrap_err();
    /// assert!(err.to_string().contains("num_simulations"));
    /// ```
    pub fn validate(raw: &Yaml, kind: GeneratorKind) -> Result<Self> {
        let Yaml::Mapping(mapping) = raw else {
            return Err(Error::schema_type(
                SCHEMA_CONTEXT,
                format!("expected a mapping, found {}", yaml_type_name(raw)),
            ));
        };
        let schema = match kind {
            GeneratorKind::CartesianProduct => validate_value_lists(mapping, kind)?,
            GeneratorKind::CustomStudy => validate_custom(mapping)?,
            GeneratorKind::LatinHypercube | GeneratorKind::SobolSequence => {
                validate_distributions(mapping, kind)?
            }
        };
        trace_debug!(
            generator = kind.as_str(),
            parameters = schema.parameters.len(),
            "parameter schema validated"
        );
        Ok(schema)
    }

    /// Parses YAML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] for malformed YAML, otherwise as [`validate`](Self::validate).
    pub fn from_yaml_str(text: &str, kind: GeneratorKind) -> Result<Self> {
        let raw: Yaml = serde_yaml::from_str(text)?;
        Self::validate(&raw, kind)
    }

    /// The generator this schema was validated for.
    #[must_use]
    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    /// Number of sets to sample, present for the sampling generators.
    #[must_use]
    pub fn num_simulations(&self) -> Option<usize> {
        self.num_simulations
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDefinition] {
        &self.parameters
    }

    /// Parameter names in declaration order.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }

    /// The explicit sample table of a custom study file, if any.
    #[must_use]
    pub fn samples(&self) -> Option<&[Vec<Value>]> {
        self.samples.as_deref()
    }
}

/// Reads a raw schema from a file, or from stdin when `path` is `None` or `-`.
///
/// # Errors
///
/// Returns [`Error::InputNotFound`] if the file does not exist, and
/// [`Error::Io`] / [`Error::Yaml`] if it cannot be read or parsed.
pub fn read_raw_schema(path: Option<&Path>) -> Result<Yaml> {
    read_raw_schema_from(path, std::io::stdin().lock())
}

/// As [`read_raw_schema`], with `stdin` standing in for the process stdin.
///
/// ```
/// use std::path::Path;
///
/// use parameter_study::schema::read_raw_schema_from;
///
/// let raw = read_raw_schema_from(Some(Path::new("-")), "{a: [1]}".as_bytes()).unwrap();
/// assert!(raw.get("a").is_some());
/// ```
///
/// # Errors
///
/// As [`read_raw_schema`].
pub fn read_raw_schema_from(path: Option<&Path>, mut stdin: impl Read) -> Result<Yaml> {
    let text = match path {
        Some(path) if path != Path::new("-") => {
            if !path.is_file() {
                return Err(Error::InputNotFound(path.to_path_buf()));
            }
            std::fs::read_to_string(path)?
        }
        _ => {
            let mut text = String::new();
            stdin.read_to_string(&mut text)?;
            text
        }
    };
    Ok(serde_yaml::from_str(&text)?)
}

/// Returns `true` if `name` can be used as a template or identifier token.
///
/// ```
/// use parameter_study::schema::is_identifier;
///
/// assert!(is_identifier("parameter_1"));
/// assert!(is_identifier("_private"));
/// assert!(!is_identifier("1st"));
/// assert!(!is_identifier("with-dash"));
/// assert!(!is_identifier(""));
/// ```
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

fn yaml_type_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "a boolean",
        Yaml::Number(_) => "a number",
        Yaml::String(_) => "a string",
        Yaml::Sequence(_) => "a sequence",
        Yaml::Mapping(_) => "a mapping",
        Yaml::Tagged(_) => "a tagged value",
    }
}

/// Checks that a mapping key is an identifier string and returns it.
fn identifier_key<'a>(key: &'a Yaml, context: &str) -> Result<&'a str> {
    match key {
        Yaml::String(name) if is_identifier(name) => Ok(name),
        Yaml::String(name) => Err(Error::schema_type(
            context,
            format!("key '{name}' is not a valid identifier"),
        )),
        other => Err(Error::schema_type(
            context,
            format!("keys must be strings, found {}", yaml_type_name(other)),
        )),
    }
}

fn scalar(value: &Yaml, context: &str) -> Result<Value> {
    Value::from_yaml(value).ok_or_else(|| {
        Error::schema_type(
            context,
            format!("values must be scalars, found {}", yaml_type_name(value)),
        )
    })
}

fn scalar_list(value: &Yaml, context: &str) -> Result<Vec<Value>> {
    let Yaml::Sequence(items) = value else {
        return Err(Error::schema_type(
            context,
            format!("expected a list of values, found {}", yaml_type_name(value)),
        ));
    };
    items.iter().map(|item| scalar(item, context)).collect()
}

fn parse_num_simulations(mapping: &Mapping) -> Result<usize> {
    let value = mapping
        .get(NUM_SIMULATIONS_KEY)
        .ok_or_else(|| Error::missing(SCHEMA_CONTEXT, NUM_SIMULATIONS_KEY))?;
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            Error::schema_type(
                SCHEMA_CONTEXT,
                format!("'{NUM_SIMULATIONS_KEY}' must be a non-negative integer, found {value:?}"),
            )
        })
}

fn is_reserved(key: &Yaml) -> bool {
    key.as_str() == Some(NUM_SIMULATIONS_KEY)
}

fn validate_value_lists(mapping: &Mapping, kind: GeneratorKind) -> Result<ParameterSchema> {
    let mut parameters = Vec::new();
    for (key, value) in mapping.iter().filter(|(key, _)| !is_reserved(key)) {
        let name = identifier_key(key, SCHEMA_CONTEXT)?;
        let values = scalar_list(value, &format!("parameter '{name}'"))?;
        parameters.push(ParameterDefinition {
            name: name.to_owned(),
            spec: ParameterSpec::Values(values),
        });
    }
    Ok(ParameterSchema {
        kind,
        num_simulations: None,
        parameters,
        samples: None,
    })
}

fn validate_custom(mapping: &Mapping) -> Result<ParameterSchema> {
    let has_names = mapping.contains_key(PARAMETER_NAMES_KEY);
    let has_samples = mapping.contains_key(PARAMETER_SAMPLES_KEY);
    if !has_names && !has_samples {
        return validate_value_lists(mapping, GeneratorKind::CustomStudy);
    }

    let names = mapping
        .get(PARAMETER_NAMES_KEY)
        .ok_or_else(|| Error::missing(SCHEMA_CONTEXT, PARAMETER_NAMES_KEY))?;
    let samples = mapping
        .get(PARAMETER_SAMPLES_KEY)
        .ok_or_else(|| Error::missing(SCHEMA_CONTEXT, PARAMETER_SAMPLES_KEY))?;

    for key in mapping.keys() {
        let known = [NUM_SIMULATIONS_KEY, PARAMETER_NAMES_KEY, PARAMETER_SAMPLES_KEY];
        if !key.as_str().is_some_and(|k| known.contains(&k)) {
            return Err(Error::schema_type(
                SCHEMA_CONTEXT,
                format!("unexpected key {key:?} next to '{PARAMETER_SAMPLES_KEY}'"),
            ));
        }
    }

    let Yaml::Sequence(names) = names else {
        return Err(Error::schema_type(
            PARAMETER_NAMES_KEY,
            format!("expected a list of names, found {}", yaml_type_name(names)),
        ));
    };
    let mut seen = HashSet::new();
    let mut parameters = Vec::with_capacity(names.len());
    for name in names {
        let name = identifier_key(name, PARAMETER_NAMES_KEY)?;
        if !seen.insert(name) {
            return Err(Error::schema_type(
                PARAMETER_NAMES_KEY,
                format!("duplicate parameter name '{name}'"),
            ));
        }
        parameters.push(ParameterDefinition {
            name: name.to_owned(),
            spec: ParameterSpec::Tabulated,
        });
    }

    let Yaml::Sequence(rows) = samples else {
        return Err(Error::schema_type(
            PARAMETER_SAMPLES_KEY,
            format!("expected a list of rows, found {}", yaml_type_name(samples)),
        ));
    };
    let mut table = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let context = format!("{PARAMETER_SAMPLES_KEY} row {index}");
        let row = scalar_list(row, &context)?;
        if row.len() != parameters.len() {
            return Err(Error::schema_type(
                context,
                format!(
                    "expected {} values (one per parameter name), found {}",
                    parameters.len(),
                    row.len()
                ),
            ));
        }
        table.push(row);
    }

    Ok(ParameterSchema {
        kind: GeneratorKind::CustomStudy,
        num_simulations: None,
        parameters,
        samples: Some(table),
    })
}

fn validate_distributions(mapping: &Mapping, kind: GeneratorKind) -> Result<ParameterSchema> {
    let num_simulations = parse_num_simulations(mapping)?;

    // Shape checks for every parameter first, so type errors win over
    // catalog lookups.
    let mut declared = Vec::new();
    for (key, value) in mapping.iter().filter(|(key, _)| !is_reserved(key)) {
        let name = identifier_key(key, SCHEMA_CONTEXT)?;
        let context = format!("parameter '{name}'");
        let Yaml::Mapping(definition) = value else {
            return Err(Error::schema_type(
                context,
                format!(
                    "expected a distribution mapping, found {}",
                    yaml_type_name(value)
                ),
            ));
        };
        let distribution = definition
            .get(DISTRIBUTION_KEY)
            .ok_or_else(|| Error::missing(&context, DISTRIBUTION_KEY))?;
        let distribution = match distribution {
            Yaml::String(d) if is_identifier(d) => d.as_str(),
            other => {
                return Err(Error::schema_type(
                    context,
                    format!("distribution {other:?} is not a valid identifier"),
                ));
            }
        };
        let mut kwargs = BTreeMap::new();
        for (kwarg, kwarg_value) in definition {
            let kwarg = identifier_key(kwarg, &context)?;
            if kwarg == DISTRIBUTION_KEY {
                continue;
            }
            let number = kwarg_value.as_f64().ok_or_else(|| {
                Error::schema_type(
                    &context,
                    format!(
                        "keyword argument '{kwarg}' must be a number, found {}",
                        yaml_type_name(kwarg_value)
                    ),
                )
            })?;
            kwargs.insert(kwarg.to_owned(), number);
        }
        declared.push((name, distribution, kwargs));
    }

    let parameters = declared
        .into_iter()
        .map(|(name, distribution, kwargs)| {
            Ok(ParameterDefinition {
                name: name.to_owned(),
                spec: ParameterSpec::Distribution(Distribution::from_kwargs(
                    name,
                    distribution,
                    &kwargs,
                )?),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParameterSchema {
        kind,
        num_simulations: Some(num_simulations),
        parameters,
        samples: None,
    })
}
