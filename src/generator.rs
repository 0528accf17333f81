//! The parameter study generator.
//!
//! [`ParameterGenerator`] ties the pipeline together: a validated schema, a
//! sampler, the naming template and the write options. It is assembled by
//! [`GeneratorBuilder`], which validates everything up front so that
//! [`generate`](ParameterGenerator::generate) only fails on I/O.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sampler::{self, Sampler};
use crate::schema::{GeneratorKind, ParameterSchema};
use crate::settings::{OutputFormat, Settings};
use crate::study::{self, OutputTarget, ParameterStudy, WriteOptions, WriteReport};
use crate::template::NameTemplate;

/// A configured, validated parameter study generator.
///
/// # Examples
///
/// ```
/// use parameter_study::generator::ParameterGenerator;
/// use parameter_study::schema::GeneratorKind;
///
/// let raw = serde_yaml::from_str("{width: [1, 2], height: [0.5]}").unwrap();
/// let generator = ParameterGenerator::builder(GeneratorKind::CartesianProduct)
///     .build(&raw)
///     .unwrap();
/// let study = generator.generate(None).unwrap();
/// assert_eq!(study.set_names(), ["parameter_set0", "parameter_set1"]);
/// ```
pub struct ParameterGenerator {
    schema: ParameterSchema,
    sampler: Box<dyn Sampler>,
    settings: Settings,
    set_name_template: NameTemplate,
    options: WriteOptions,
    previous: Option<PathBuf>,
    require_previous: bool,
}

impl ParameterGenerator {
    /// Starts a builder for the given generator.
    #[must_use]
    pub fn builder(kind: GeneratorKind) -> GeneratorBuilder {
        GeneratorBuilder::new(kind)
    }

    /// The validated schema.
    #[must_use]
    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// The configuration in effect.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The template set names are rendered from.
    #[must_use]
    pub fn set_name_template(&self) -> &NameTemplate {
        &self.set_name_template
    }

    /// The write options in effect.
    #[must_use]
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Samples the schema and names the sets, merging against `previous`.
    ///
    /// Without a previous study the sets are numbered `0..n` in row order.
    /// With one, unchanged sets keep their identifiers and new sets continue
    /// after the largest previous identifier.
    ///
    /// # Errors
    ///
    /// Returns sampler errors, or [`Error::CorruptStudy`] if the set name
    /// template does not render unique names.
    pub fn generate(&self, previous: Option<&ParameterStudy>) -> Result<ParameterStudy> {
        let table = self.sampler.sample(&self.schema)?;
        trace_info!(
            generator = self.schema.kind().as_str(),
            rows = table.len(),
            columns = table.parameter_names.len(),
            "sampled parameter table"
        );
        let fresh = ParameterStudy::from_table(table, &self.set_name_template)?;
        match previous {
            Some(previous) => Ok(study::merge(previous, fresh, &self.set_name_template)?.study),
            None => Ok(fresh),
        }
    }

    /// Loads the configured previous study, if any.
    ///
    /// A missing previous study file is an error only when the generator
    /// requires it; otherwise it is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputNotFound`] for a required but missing file, and
    /// decoding errors for an unreadable one.
    pub fn load_previous(&self) -> Result<Option<ParameterStudy>> {
        let Some(path) = &self.previous else {
            return Ok(None);
        };
        match study::read_study(path) {
            Ok(previous) => Ok(Some(previous)),
            Err(Error::InputNotFound(_)) if !self.require_previous => {
                trace_warn!(
                    path = %path.display(),
                    "previous parameter study not found; generating without merge"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Loads the previous study, then generates against it.
    ///
    /// # Errors
    ///
    /// As [`load_previous`](Self::load_previous) and [`generate`](Self::generate).
    pub fn run(&self) -> Result<ParameterStudy> {
        let previous = self.load_previous()?;
        self.generate(previous.as_ref())
    }

    /// Writes `study`, sending stdout output to the process stdout.
    ///
    /// # Errors
    ///
    /// As [`write_to`](Self::write_to).
    pub fn write(&self, study: &ParameterStudy) -> Result<WriteReport> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.write_to(study, &mut lock)
    }

    /// Writes `study`, sending stdout output to `out`.
    ///
    /// # Errors
    ///
    /// Returns I/O and encoding errors. Per-set conflicts are reported in
    /// the [`WriteReport`], not raised.
    pub fn write_to(&self, study: &ParameterStudy, out: &mut dyn Write) -> Result<WriteReport> {
        let report = study::write_study(study, &self.options, &self.settings, out)?;
        trace_info!(
            files = report.files.len(),
            conflicts = report.conflicts().count(),
            dry_run = self.options.dry_run,
            "parameter study written"
        );
        Ok(report)
    }
}

/// Builder for [`ParameterGenerator`].
///
/// # Defaults
///
/// - Sampler: the default sampler for the generator kind
/// - Output: the aggregate study on stdout, in the settings' format
/// - Set names: `parameter_set@number`
/// - No previous study, no overwrite, no dry run, no manifest
#[must_use]
pub struct GeneratorBuilder {
    kind: GeneratorKind,
    sampler: Option<Box<dyn Sampler>>,
    seed: Option<u64>,
    settings: Settings,
    output_file_template: Option<String>,
    output_file: Option<PathBuf>,
    output_format: Option<OutputFormat>,
    set_name_template: Option<String>,
    previous: Option<PathBuf>,
    require_previous: bool,
    overwrite: bool,
    dry_run: bool,
    write_meta: bool,
}

impl GeneratorBuilder {
    /// Creates a builder with default options.
    pub fn new(kind: GeneratorKind) -> Self {
        Self {
            kind,
            sampler: None,
            seed: None,
            settings: Settings::default(),
            output_file_template: None,
            output_file: None,
            output_format: None,
            set_name_template: None,
            previous: None,
            require_previous: false,
            overwrite: false,
            dry_run: false,
            write_meta: false,
        }
    }

    /// Uses a specific sampler instead of the kind's default.
    pub fn sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.sampler = Some(Box::new(sampler));
        self
    }

    /// Seeds the default sampler of a sampling generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the configuration.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Writes one file per set; the template also becomes the set name template.
    pub fn output_file_template(mut self, template: impl Into<String>) -> Self {
        self.output_file_template = Some(template.into());
        self
    }

    /// Writes one aggregate file.
    pub fn output_file(mut self, path: impl AsRef<Path>) -> Self {
        self.output_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Output format of the aggregate file or of every per-set file.
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Set name template, ignored when an output file template is given.
    pub fn set_name_template(mut self, template: impl Into<String>) -> Self {
        self.set_name_template = Some(template.into());
        self
    }

    /// Merges against the study stored at `path`.
    pub fn previous_study(mut self, path: impl AsRef<Path>) -> Self {
        self.previous = Some(path.as_ref().to_path_buf());
        self
    }

    /// Fails instead of warning when the previous study file is missing.
    pub fn require_previous_study(mut self, require: bool) -> Self {
        self.require_previous = require;
        self
    }

    /// Writes every output file, even when its contents are unchanged.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Reports what would be written without writing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Writes the manifest of output paths.
    pub fn write_meta(mut self, write_meta: bool) -> Self {
        self.write_meta = write_meta;
        self
    }

    /// Validates `raw` and the options, then builds the generator.
    ///
    /// # Errors
    ///
    /// Returns schema errors from validation and the sampler's own checks,
    /// and [`Error::InvalidTemplate`] for an unusable output template or
    /// when both an output file and an output template are given.
    pub fn build(self, raw: &serde_yaml::Value) -> Result<ParameterGenerator> {
        let schema = ParameterSchema::validate(raw, self.kind)?;
        let sampler = self
            .sampler
            .unwrap_or_else(|| sampler::for_kind(self.kind, self.seed));
        sampler::ensure_kind(sampler.kind(), &schema)?;
        sampler.check(&schema)?;

        let mut settings = self.settings;
        if let Some(template) = self.set_name_template {
            settings = settings.with_set_name_template(template);
        }

        let (target, set_name_template) = match (self.output_file_template, self.output_file) {
            (Some(template), Some(file)) => {
                return Err(Error::InvalidTemplate {
                    template,
                    reason: format!(
                        "an output file template conflicts with the output file '{}'",
                        file.display()
                    ),
                });
            }
            (Some(template), None) => {
                let template = NameTemplate::for_output_path(template, settings.placeholder())?;
                (OutputTarget::Template(template.clone()), template)
            }
            (None, Some(file)) => (OutputTarget::File(file), settings.set_name_template()),
            (None, None) => (OutputTarget::Stdout, settings.set_name_template()),
        };

        let options = WriteOptions {
            target,
            format: self.output_format.unwrap_or_else(|| settings.output_format()),
            overwrite: self.overwrite,
            dry_run: self.dry_run,
            write_meta: self.write_meta,
        };

        Ok(ParameterGenerator {
            schema,
            sampler,
            settings,
            set_name_template,
            options,
            previous: self.previous,
            require_previous: self.require_previous,
        })
    }
}
