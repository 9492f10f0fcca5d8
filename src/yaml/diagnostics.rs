//! YAML error types with source-annotated diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors raised while loading YAML documents
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error("Failed to read YAML file {path}: {source}")]
    #[diagnostic(code(turnplan::yaml::io))]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),
}

/// A YAML syntax or schema error pointing into the offending source
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {filename}: {message}")]
#[diagnostic(
    code(turnplan::yaml::syntax),
    help("Check indentation and field types against a known-good digest")
)]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,
    /// 1-based line of the error, when known
    pub line: Option<usize>,
    /// 1-based column of the error, when known
    pub column: Option<usize>,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error and the text it was parsing
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let location = err.location();
        let span = location.as_ref().map(|loc| {
            let offset = loc.index().min(content.len());
            let len = usize::from(offset < content.len());
            SourceSpan::from((offset, len))
        });

        Self {
            filename: filename.to_string(),
            message: err.to_string(),
            line: location.as_ref().map(|loc| loc.line()),
            column: location.as_ref().map(|loc| loc.column()),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}
