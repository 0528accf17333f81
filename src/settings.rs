//! Immutable generator configuration.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;
use crate::template::NameTemplate;

/// Default set name template.
pub const DEFAULT_SET_NAME_TEMPLATE: &str = "parameter_set@number";
/// Default numeric placeholder token.
pub const DEFAULT_PLACEHOLDER: &str = "@number";
/// Default manifest file name.
pub const DEFAULT_META_FILE: &str = "parameter_study_meta.txt";

/// On-disk format of study output files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML text.
    #[default]
    Yaml,
    /// Column-major binary table (the `h5` output type).
    Binary,
}

impl OutputFormat {
    /// Every accepted format.
    pub const ALL: [Self; 2] = [Self::Yaml, Self::Binary];

    /// The command-line spelling of this format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Binary => "h5",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(Self::Yaml),
            "h5" | "binary" => Ok(Self::Binary),
            other => Err(Error::schema_type(
                "output file type",
                format!("unsupported '{other}', expected one of: yaml, h5"),
            )),
        }
    }
}

/// Immutable configuration shared by every stage of a generator run.
///
/// Replaces process-wide defaults: the set name template, the placeholder
/// token, the manifest file name and the default output format all travel
/// with the generator. `with_*` methods return modified copies.
///
/// # Examples
///
/// ```
/// use parameter_study::settings::Settings;
///
/// let settings = Settings::default().with_set_name_template("case@number");
/// assert_eq!(settings.set_name_template().render(2), "case2");
/// assert_eq!(settings.meta_file_name(), "parameter_study_meta.txt");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    set_name_template: String,
    placeholder: String,
    meta_file_name: String,
    output_format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            set_name_template: DEFAULT_SET_NAME_TEMPLATE.to_owned(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            meta_file_name: DEFAULT_META_FILE.to_owned(),
            output_format: OutputFormat::Yaml,
        }
    }
}

impl Settings {
    /// Sets the set name template.
    #[must_use]
    pub fn with_set_name_template(mut self, template: impl Into<String>) -> Self {
        self.set_name_template = template.into();
        self
    }

    /// Sets the numeric placeholder token.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets the manifest file name.
    #[must_use]
    pub fn with_meta_file_name(mut self, name: impl Into<String>) -> Self {
        self.meta_file_name = name.into();
        self
    }

    /// Sets the default output format.
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// The set name template, placeholder guaranteed.
    #[must_use]
    pub fn set_name_template(&self) -> NameTemplate {
        NameTemplate::new(self.set_name_template.clone(), self.placeholder.clone())
    }

    /// The numeric placeholder token.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The manifest file name.
    #[must_use]
    pub fn meta_file_name(&self) -> &str {
        &self.meta_file_name
    }

    /// The default output format.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }
}
