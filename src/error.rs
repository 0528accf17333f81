use std::path::PathBuf;

/// Errors produced while validating, generating, reading or writing a
/// parameter study.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a required schema key is absent.
    #[error("{context} is missing the required '{key}' key")]
    MissingKey {
        /// Where the key was expected (e.g. "parameter schema", "parameter 'width'").
        context: String,
        /// The missing key.
        key: String,
    },

    /// Returned when a schema value has the wrong type or an invalid identifier shape.
    #[error("{context}: {reason}")]
    SchemaType {
        /// Where the offending value was found.
        context: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Returned when a distribution name is not in the catalog.
    #[error("parameter '{parameter}': unknown distribution '{name}'")]
    UnknownDistribution {
        /// The parameter declaring the distribution.
        parameter: String,
        /// The unresolved distribution name.
        name: String,
    },

    /// Returned when a known distribution cannot be built from its keyword arguments.
    #[error("parameter '{parameter}': invalid '{distribution}' distribution: {reason}")]
    InvalidDistribution {
        /// The parameter declaring the distribution.
        parameter: String,
        /// The distribution name.
        distribution: String,
        /// Why the keyword arguments were rejected.
        reason: String,
    },

    /// Returned when an existing output file would have to change and overwrite is off.
    #[error("refusing to overwrite '{}': contents differ and overwrite is disabled", path.display())]
    WriteConflict {
        /// The conflicting output path.
        path: PathBuf,
    },

    /// Returned when a required input file does not exist.
    #[error("input file '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    /// Returned when a name or output template cannot be used.
    #[error("invalid template '{template}': {reason}")]
    InvalidTemplate {
        /// The rejected template.
        template: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Returned when a persisted study is structurally inconsistent.
    #[error("corrupt parameter study: {0}")]
    CorruptStudy(String),

    /// Returned when a file system operation fails.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Returned when YAML input or output fails.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Returned when the binary tabular format cannot be encoded or decoded.
    #[error("binary study error: {0}")]
    Binary(#[from] bincode::Error),
}

impl Error {
    pub(crate) fn missing(context: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingKey {
            context: context.into(),
            key: key.into(),
        }
    }

    pub(crate) fn schema_type(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaType {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for the fatal schema family (missing key, wrong type,
    /// unknown or invalid distribution).
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingKey { .. }
                | Self::SchemaType { .. }
                | Self::UnknownDistribution { .. }
                | Self::InvalidDistribution { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, Error>;
