use core::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::settings::{OutputFormat, Settings};
use crate::template::NameTemplate;

use super::ParameterStudy;
use super::persistence::{set_to_bytes, study_to_bytes};

/// Where a study is written.
#[derive(Clone, Debug, Default)]
pub enum OutputTarget {
    /// The aggregate study on the caller's stdout writer.
    #[default]
    Stdout,
    /// One aggregate file.
    File(PathBuf),
    /// One file per set, at the path its template renders to.
    Template(NameTemplate),
}

/// Per-run write options.
#[derive(Clone, Debug, Default)]
pub struct WriteOptions {
    /// Destination.
    pub target: OutputTarget,
    /// File format, for the aggregate file and for every per-set file.
    pub format: OutputFormat,
    /// Write every output file without comparing it to what is on disk.
    pub overwrite: bool,
    /// Decide every outcome but touch nothing on disk.
    pub dry_run: bool,
    /// Write the manifest next to the outputs.
    pub write_meta: bool,
}

/// Outcome for one output path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteStatus {
    /// The file was created or replaced.
    Written,
    /// The file already held exactly these contents.
    Unchanged,
    /// Dry run: the file would be created or replaced.
    WouldWrite,
    /// The file holds different contents and overwrite is off.
    Conflict,
    /// Dry run: the file differs and would be left alone as a conflict.
    WouldConflict,
}

impl fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Written => "written",
            Self::Unchanged => "unchanged",
            Self::WouldWrite => "would write",
            Self::Conflict => "conflict",
            Self::WouldConflict => "would conflict",
        })
    }
}

/// Everything a write did, path by path.
#[derive(Clone, Debug, Default)]
pub struct WriteReport {
    /// Every output path with its outcome, in set order.
    pub files: Vec<(PathBuf, WriteStatus)>,
    /// The manifest path, when one was written.
    pub meta_file: Option<PathBuf>,
}

impl WriteReport {
    /// Paths whose existing contents blocked the write.
    pub fn conflicts(&self) -> impl Iterator<Item = &Path> {
        self.with_status(WriteStatus::Conflict)
    }

    /// Returns `true` if any path conflicted.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        self.conflicts().next().is_some()
    }

    /// Paths with the given outcome.
    pub fn with_status(&self, status: WriteStatus) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(move |(_, s)| *s == status)
            .map(|(path, _)| path.as_path())
    }

    /// The first conflict as an error, for callers that treat conflicts as fatal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WriteConflict`] naming the first conflicting path.
    pub fn ensure_no_conflicts(&self) -> Result<()> {
        match self.conflicts().next() {
            Some(path) => Err(Error::WriteConflict {
                path: path.to_path_buf(),
            }),
            None => Ok(()),
        }
    }
}

/// Writes `study` according to `options`.
///
/// With `overwrite` every output file is written unconditionally.
/// Otherwise an aggregate file is replaced whenever its contents differ,
/// and a differing per-set file is reported as [`WriteStatus::Conflict`]
/// and left alone. With `dry_run` nothing is written, the manifest is
/// skipped and conflicts are only reported as
/// [`WriteStatus::WouldConflict`].
///
/// # Errors
///
/// Returns [`Error::Io`] if a file cannot be read or written, and encoding
/// errors from the chosen format.
pub fn write_study(
    study: &ParameterStudy,
    options: &WriteOptions,
    settings: &Settings,
    stdout: &mut dyn Write,
) -> Result<WriteReport> {
    let (mut report, directory) = match &options.target {
        OutputTarget::Stdout => {
            stdout.write_all(&study_to_bytes(study, options.format)?)?;
            stdout.flush()?;
            return Ok(WriteReport::default());
        }
        OutputTarget::File(path) => {
            let contents = study_to_bytes(study, options.format)?;
            let policy = if options.overwrite {
                WritePolicy::Always
            } else {
                WritePolicy::Changed
            };
            let status = write_output(path, &contents, policy, options.dry_run)?;
            let report = WriteReport {
                files: vec![(path.clone(), status)],
                meta_file: None,
            };
            (report, parent_directory(path))
        }
        OutputTarget::Template(template) => {
            let policy = if options.overwrite {
                WritePolicy::Always
            } else {
                WritePolicy::Missing
            };
            let mut files = Vec::with_capacity(study.len());
            for set in study.sets() {
                let path = PathBuf::from(template.render(set.id()));
                let contents = set_to_bytes(study, set, options.format)?;
                let status = write_output(&path, &contents, policy, options.dry_run)?;
                files.push((path, status));
            }
            let report = WriteReport {
                files,
                meta_file: None,
            };
            (report, template.directory().to_path_buf())
        }
    };

    if options.write_meta && !options.dry_run {
        let meta = directory.join(settings.meta_file_name());
        write_manifest(&meta, &report)?;
        report.meta_file = Some(meta);
    }
    Ok(report)
}

fn parent_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// When an output file is (re)written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WritePolicy {
    /// Always, without reading the existing file.
    Always,
    /// When missing or different.
    Changed,
    /// When missing; a different file is a conflict.
    Missing,
}

fn write_output(path: &Path, contents: &[u8], policy: WritePolicy, dry_run: bool) -> Result<WriteStatus> {
    let status = if policy == WritePolicy::Always {
        WriteStatus::Written
    } else {
        match std::fs::read(path) {
            Ok(existing) if existing == contents => WriteStatus::Unchanged,
            Ok(_) if policy == WritePolicy::Missing => WriteStatus::Conflict,
            Ok(_) => WriteStatus::Written,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => WriteStatus::Written,
            Err(err) => return Err(err.into()),
        }
    };
    match status {
        WriteStatus::Written if dry_run => Ok(WriteStatus::WouldWrite),
        WriteStatus::Conflict if dry_run => Ok(WriteStatus::WouldConflict),
        WriteStatus::Written => {
            write_atomic(path, contents)?;
            trace_debug!(path = %path.display(), "wrote output file");
            Ok(WriteStatus::Written)
        }
        WriteStatus::Conflict => {
            trace_warn!(
                path = %path.display(),
                "output file differs and overwrite is off; leaving it untouched"
            );
            Ok(WriteStatus::Conflict)
        }
        other => Ok(other),
    }
}

/// Writes to a temp file in the same directory, then renames it over `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = parent_directory(path);
    std::fs::create_dir_all(&parent)?;
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// One absolute output path per line.
fn write_manifest(meta: &Path, report: &WriteReport) -> Result<()> {
    let mut text = String::new();
    for (path, _) in &report.files {
        text.push_str(&std::path::absolute(path)?.to_string_lossy());
        text.push('\n');
    }
    write_atomic(meta, text.as_bytes())
}
