//! Query generation errors.

use camino::Utf8PathBuf;
use sqlgen_params::{MalformedInputError, UnsupportedDialectError};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Error Handling Types
// ============================================================================

/// Any failure of a generation run. None of these are recovered from.
#[derive(Debug, Error)]
pub enum Error {
    /// A query file has an unterminated string, identifier or comment.
    #[error("{0}")]
    Malformed(#[from] SqlError),

    /// The requested placeholder dialect does not exist.
    #[error(transparent)]
    UnsupportedDialect(#[from] UnsupportedDialectError),

    /// The root or one of the query files could not be read or named.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The generated code could not be delivered.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

pub struct SourceFile {
    /// The raw SQL (for rendering diagnostics)
    pub source: String,

    /// Path to the source file
    pub source_path: Utf8PathBuf,
}

/// A scan failure inside a specific query file.
/// Carries the file so it renders as a proper diagnostic.
#[derive(Clone)]
pub struct SqlError {
    /// Source
    pub source: Arc<SourceFile>,

    /// What was left open, and where
    pub error: MalformedInputError,
}

impl fmt::Debug for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};

        let message = self.error.to_string();
        let path = self.source.source_path.as_str();
        // Only the opening delimiter is labelled; the span runs to end of input.
        let start = self.error.span.offset;
        let end = start + 1;

        let mut output = Vec::new();

        let report = Report::build(ReportKind::Error, (path, start..end))
            .with_message(&message)
            .with_config(
                Config::default()
                    .with_color(false)
                    .with_index_type(IndexType::Byte),
            )
            .with_label(
                Label::new((path, start..end))
                    .with_message(format!("this {} is never closed", self.error.kind)),
            )
            .finish();

        report
            .write((path, Source::from(&self.source.source)), &mut output)
            .ok();

        if output.is_empty() {
            return write!(f, "{path}: {message}");
        }
        write!(f, "{}", String::from_utf8_lossy(&output))
    }
}

impl std::error::Error for SqlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Problems finding, naming or reading query files.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot resolve root directory {path}: {source}")]
    Root {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("root {path} is not a directory")]
    NotADirectory { path: Utf8PathBuf },

    #[error("cannot walk {path}: {source}")]
    Walk {
        path: Utf8PathBuf,
        source: walkdir::Error,
    },

    #[error("path is not valid UTF-8: {}", .path.display())]
    NonUtf8Path { path: std::path::PathBuf },

    #[error("cannot read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// Query files must live at least one directory below the root.
    #[error(
        "{path}: query files must be laid out as <namespace>/<name>.{suffix}, \
         but this one sits directly in the root"
    )]
    Shallow { path: Utf8PathBuf, suffix: String },

    #[error("{path}: segment '{segment}' does not produce a valid identifier")]
    InvalidIdentifier { path: Utf8PathBuf, segment: String },

    #[error("{path} and {other} both generate {namespace}::{accessor}")]
    DuplicateAccessor {
        path: Utf8PathBuf,
        other: Utf8PathBuf,
        namespace: String,
        accessor: String,
    },
}

/// Problems delivering the generated code.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid permission format '{0}': expected an octal string such as 0644")]
    InvalidPermissions(String),

    #[error("unable to open {path} for writing: {source}")]
    Open {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("unable to write to {target}: {source}")]
    Write {
        target: String,
        source: std::io::Error,
    },
}
