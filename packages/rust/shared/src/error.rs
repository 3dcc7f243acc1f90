//! Error types for spherexsphinx.
//!
//! Library crates use [`SpherexSphinxError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::fmt;
use std::path::PathBuf;

/// A single schema violation found while validating the declarative file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted field path, e.g. `project.title` or `sphinx.extensions[1]`.
    pub path: String,
    /// Why the value at `path` was rejected.
    pub reason: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Top-level error type for configuration loading, derivation, and assets.
///
/// Every variant is fatal for the documentation build; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum SpherexSphinxError {
    /// The declarative configuration file is not in the working directory.
    #[error("configuration file not found: {}", path.display())]
    ConfigurationNotFound { path: PathBuf },

    /// The declarative file is not well-formed TOML.
    #[error("configuration syntax error: {message}")]
    ConfigurationSyntax { message: String },

    /// The declarative file parsed but violates the schema.
    #[error(
        "configuration validation failed ({} violation(s)):\n{}",
        violations.len(),
        format_violations(violations)
    )]
    ConfigurationValidation { violations: Vec<Violation> },

    /// A semantic failure after validation (unusable repository URL, etc.).
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A named static asset is missing from the bundle.
    #[error("asset {name:?} does not exist (tried {})", path.display())]
    AssetNotFound { name: String, path: PathBuf },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpherexSphinxError>;

impl SpherexSphinxError {
    /// Create a post-validation configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create a syntax error from the parser's diagnostic.
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::ConfigurationSyntax {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Violations carried by a validation error, empty for other variants.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::ConfigurationValidation { violations } => violations,
            _ => &[],
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
