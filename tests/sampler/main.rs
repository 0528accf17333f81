#![allow(
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

mod cartesian;
mod custom;
mod latin_hypercube;
mod sobol;

use parameter_study::schema::{GeneratorKind, ParameterSchema};

/// Validates a YAML schema for `kind`, panicking on errors.
pub fn schema(kind: GeneratorKind, text: &str) -> ParameterSchema {
    ParameterSchema::from_yaml_str(text, kind).unwrap()
}
