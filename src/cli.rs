//! Command-line front end.
//!
//! One subcommand per generator. Every subcommand reads a YAML schema from
//! a file (or stdin) and writes the study to stdout, an aggregate file or
//! one file per set.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::generator::ParameterGenerator;
use crate::schema::{GeneratorKind, read_raw_schema};
use crate::settings::{DEFAULT_SET_NAME_TEMPLATE, OutputFormat};
use crate::study::WriteStatus;

/// Initialize logging to stderr.
///
/// `RUST_LOG` overrides the default filter, which shows this crate's info
/// events and warnings from everything else.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,parameter_study=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Generate parameter studies from YAML schemas.
#[derive(Debug, Parser)]
#[command(name = "parameter-study", version)]
#[command(about = "Generate parameter studies from YAML schemas")]
pub struct Cli {
    /// Generator to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Generator subcommands.
#[derive(Debug, Subcommand)]
#[command(rename_all = "snake_case")]
pub enum Command {
    /// Full factorial over explicit value lists.
    CartesianProduct(CommonArgs),
    /// Explicit table of parameter sets.
    CustomStudy(CommonArgs),
    /// Latin hypercube sampling of named distributions.
    LatinHypercube(SamplingArgs),
    /// Sobol sequence sampling of named distributions.
    SobolSequence(SamplingArgs),
}

impl Command {
    fn into_parts(self) -> (GeneratorKind, CommonArgs, Option<u64>) {
        match self {
            Self::CartesianProduct(args) => (GeneratorKind::CartesianProduct, args, None),
            Self::CustomStudy(args) => (GeneratorKind::CustomStudy, args, None),
            Self::LatinHypercube(args) => (GeneratorKind::LatinHypercube, args.common, args.seed),
            Self::SobolSequence(args) => (GeneratorKind::SobolSequence, args.common, args.seed),
        }
    }
}

/// Options shared by every generator.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Parameter schema file; stdin when omitted or "-".
    #[arg(value_name = "INPUT_FILE")]
    pub input_file: Option<PathBuf>,

    /// Write one file per set at the rendered template path.
    #[arg(short = 'o', long, conflicts_with = "output_file")]
    pub output_file_template: Option<String>,

    /// Write the whole study to one file.
    #[arg(short = 'f', long)]
    pub output_file: Option<PathBuf>,

    /// Output format (yaml or h5), for aggregate and per-set files.
    #[arg(short = 't', long, default_value_t = OutputFormat::Yaml)]
    pub output_file_type: OutputFormat,

    /// Set name template; ignored with --output-file-template.
    #[arg(short = 's', long, default_value = DEFAULT_SET_NAME_TEMPLATE)]
    pub set_name_template: String,

    /// Previously generated aggregate study to merge against.
    #[arg(short = 'p', long)]
    pub previous_parameter_study: Option<PathBuf>,

    /// Fail if the previous study file does not exist.
    #[arg(short = 'R', long, default_value_t = false)]
    pub require_previous_parameter_study: bool,

    /// Write every output file, replacing existing ones unconditionally.
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Print the files that would be written and write nothing.
    ///
    /// A dry run never fails on conflicts; they are only logged.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Write a manifest listing every output file.
    #[arg(long, default_value_t = false)]
    pub write_meta: bool,
}

/// Options of the sampling generators.
#[derive(Debug, Args)]
pub struct SamplingArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Seed for reproducible sampling.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// How a successful run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every output is up to date.
    Success,
    /// At least one per-set file was left untouched because it differs.
    Conflicts,
}

/// Runs one command, writing study and dry-run output to `out`.
///
/// # Errors
///
/// Returns any validation, read or write failure with context.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<RunStatus> {
    let (kind, args, seed) = cli.command.into_parts();

    let raw = read_raw_schema(args.input_file.as_deref()).with_context(|| match &args.input_file {
        Some(path) => format!("failed to read parameter schema '{}'", path.display()),
        None => "failed to read parameter schema from stdin".to_owned(),
    })?;

    let mut builder = ParameterGenerator::builder(kind)
        .set_name_template(args.set_name_template)
        .output_format(args.output_file_type)
        .require_previous_study(args.require_previous_parameter_study)
        .overwrite(args.overwrite)
        .dry_run(args.dry_run)
        .write_meta(args.write_meta);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    if let Some(template) = args.output_file_template {
        builder = builder.output_file_template(template);
    }
    if let Some(file) = args.output_file {
        builder = builder.output_file(file);
    }
    if let Some(previous) = args.previous_parameter_study {
        builder = builder.previous_study(previous);
    }

    let generator = builder
        .build(&raw)
        .with_context(|| format!("invalid {} schema", kind.as_str()))?;
    let study = generator.run()?;
    let report = generator.write_to(&study, out)?;

    for path in report.with_status(WriteStatus::WouldWrite) {
        writeln!(out, "{}", path.display())?;
    }
    for path in report.with_status(WriteStatus::WouldConflict) {
        tracing::warn!(
            path = %path.display(),
            "existing file differs and would be left untouched"
        );
    }
    for path in report.conflicts() {
        tracing::error!(
            path = %path.display(),
            "existing file differs; rerun with --overwrite to replace it"
        );
    }

    Ok(if report.has_conflicts() {
        RunStatus::Conflicts
    } else {
        RunStatus::Success
    })
}
