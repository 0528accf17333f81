#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Parameter study generation: turn a declarative YAML schema into a
//! reproducible, named collection of parameter sets, and regenerate it
//! later without disturbing the sets that did not change.
//!
//! # Getting Started
//!
//! ```
//! use parameter_study::prelude::*;
//!
//! let raw = serde_yaml::from_str(
//!     "{num_simulations: 5, width: {distribution: uniform, loc: 1, scale: 2}}",
//! )
//! .unwrap();
//! let generator = ParameterGenerator::builder(GeneratorKind::LatinHypercube)
//!     .seed(42)
//!     .build(&raw)
//!     .unwrap();
//!
//! let study = generator.generate(None).unwrap();
//! assert_eq!(study.len(), 5);
//!
//! // Regenerating against the first run keeps every identifier.
//! let again = generator.generate(Some(&study)).unwrap();
//! assert_eq!(again.set_names(), study.set_names());
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`ParameterSchema`](schema::ParameterSchema) | A validated schema: parameter names with value lists or distributions. |
//! | [`Sampler`](sampler::Sampler) | Strategy that turns a schema into a table of rows. |
//! | [`ParameterStudy`](study::ParameterStudy) | Named, identified and hashed parameter sets. |
//! | [`ParameterGenerator`](generator::ParameterGenerator) | Validate, sample, merge against a previous study and write. |
//! | [`Settings`](settings::Settings) | Name template, placeholder, manifest name and default format. |
//!
//! # Generators
//!
//! | Generator | Sampler | Input |
//! |-----------|---------|-------|
//! | `cartesian_product` | [`CartesianProduct`](sampler::CartesianProduct) | value lists |
//! | `custom_study` | [`CustomStudy`](sampler::CustomStudy) | explicit rows |
//! | `latin_hypercube` | [`LatinHypercube`](sampler::LatinHypercube) | distributions + `num_simulations` |
//! | `sobol_sequence` | [`SobolSequence`](sampler::SobolSequence) | distributions + `num_simulations` |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `cli` | The `parameter-study` binary and the [`cli`] module | on |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) | with `cli` |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "cli")]
pub mod cli;
pub mod distribution;
mod error;
pub mod generator;
mod rng_util;
pub mod sampler;
pub mod schema;
pub mod settings;
pub mod study;
pub mod template;
mod value;

pub use error::{Error, Result};
pub use generator::{GeneratorBuilder, ParameterGenerator};
pub use study::{ParameterSet, ParameterStudy};
pub use value::Value;

/// Convenient wildcard import for the most common types.
///
/// ```
/// use parameter_study::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::generator::{GeneratorBuilder, ParameterGenerator};
    pub use crate::sampler::{CartesianProduct, CustomStudy, LatinHypercube, Sampler, SobolSequence};
    pub use crate::schema::{GeneratorKind, ParameterSchema};
    pub use crate::settings::{OutputFormat, Settings};
    pub use crate::study::{
        OutputTarget, ParameterSet, ParameterStudy, WriteOptions, WriteReport, WriteStatus,
    };
    pub use crate::template::NameTemplate;
    pub use crate::value::Value;
}
