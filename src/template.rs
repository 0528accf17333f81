//! `@number` placeholder templates for set names and output paths.

use std::path::Path;

use crate::error::{Error, Result};

/// A set name or output path template with a numeric placeholder.
///
/// The placeholder (`@number` by default) is written either bare or braced
/// (`@{number}`). A template without a placeholder gets one appended, so
/// every rendered name stays unique per set identifier.
///
/// # Examples
///
/// ```
/// use parameter_study::template::NameTemplate;
///
/// let template = NameTemplate::new("parameter_set@number", "@number");
/// assert_eq!(template.render(3), "parameter_set3");
///
/// let appended = NameTemplate::new("run_", "@number");
/// assert_eq!(appended.as_str(), "run_@number");
/// assert_eq!(appended.render(0), "run_0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameTemplate {
    template: String,
    placeholder: String,
}

impl NameTemplate {
    /// Builds a template, appending the placeholder if it is absent.
    #[must_use]
    pub fn new(template: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let mut template = template.into();
        let placeholder = placeholder.into();
        if !contains_placeholder(&template, &placeholder) {
            template.push_str(&placeholder);
        }
        Self {
            template,
            placeholder,
        }
    }

    /// Builds an output path template.
    ///
    /// Like [`new`](Self::new), but the placeholder may only appear in the
    /// file name, never in the directory part.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTemplate`] if a parent directory component
    /// contains the placeholder, or if the template is empty.
    pub fn for_output_path(template: impl Into<String>, placeholder: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let placeholder = placeholder.into();
        if template.is_empty() {
            return Err(Error::InvalidTemplate {
                template,
                reason: "output file template is empty".to_owned(),
            });
        }
        if let Some(parent) = Path::new(&template).parent() {
            if contains_placeholder(&parent.to_string_lossy(), &placeholder) {
                return Err(Error::InvalidTemplate {
                    template,
                    reason: format!("'{placeholder}' may only appear in the file name"),
                });
            }
        }
        Ok(Self::new(template, placeholder))
    }

    /// Substitutes `number` for every placeholder occurrence.
    #[must_use]
    pub fn render(&self, number: u64) -> String {
        let number = number.to_string();
        self.template
            .replace(&braced(&self.placeholder), &number)
            .replace(&self.placeholder, &number)
    }

    /// The template text, placeholder included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// The directory rendered paths land in (`.` for bare file names).
    #[must_use]
    pub fn directory(&self) -> &Path {
        match Path::new(&self.template).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// `@number` -> `@{number}`.
fn braced(placeholder: &str) -> String {
    let mut chars = placeholder.chars();
    match chars.next() {
        Some(sigil) => format!("{sigil}{{{}}}", chars.as_str()),
        None => String::new(),
    }
}

fn contains_placeholder(text: &str, placeholder: &str) -> bool {
    text.contains(placeholder) || text.contains(&braced(placeholder))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bare_and_braced_placeholders() {
        let bare = NameTemplate::new("set@number.yaml", "@number");
        assert_eq!(bare.render(12), "set12.yaml");

        let braced = NameTemplate::new("set@{number}_x", "@number");
        assert_eq!(braced.as_str(), "set@{number}_x");
        assert_eq!(braced.render(7), "set7_x");
    }

    #[test]
    fn appends_missing_placeholder() {
        let template = NameTemplate::new("out/params", "@number");
        assert_eq!(template.render(4), "out/params4");
    }

    #[test]
    fn custom_placeholder() {
        let template = NameTemplate::new("case_%id", "%id");
        assert_eq!(template.render(9), "case_9");
    }

    #[test]
    fn output_path_rejects_placeholder_in_directory() {
        let err = NameTemplate::for_output_path("run@number/set.yaml", "@number").unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate { .. }));
        assert!(NameTemplate::for_output_path("", "@number").is_err());
    }

    #[test]
    fn directory_defaults_to_current() {
        assert_eq!(NameTemplate::new("set@number", "@number").directory(), Path::new("."));
        assert_eq!(
            NameTemplate::new("build/sets/set@number", "@number").directory(),
            Path::new("build/sets")
        );
    }
}
