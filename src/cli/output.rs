//! Output formatting utilities

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Determine the effective output format based on context
///
/// `auto` follows the extension of the output file when there is one and
/// falls back to the text report.
pub fn effective_format(format: OutputFormat, output: Option<&Path>) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            let ext = output
                .and_then(|p| p.extension())
                .map(|e| e.to_string_lossy().to_lowercase());
            match ext.as_deref() {
                Some("json") => OutputFormat::Json,
                Some("yaml") | Some("yml") => OutputFormat::Yaml,
                _ => OutputFormat::Text,
            }
        }
        other => other,
    }
}

/// Serialize a value in a machine-readable format
pub fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).into_diagnostic(),
        _ => serde_yml::to_string(value).into_diagnostic(),
    }
}

/// Write rendered output to a file, or to stdout when no file is given
pub fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).into_diagnostic()?;
            tracing::info!(path = %path.display(), "report written");
            Ok(())
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_follows_extension() {
        let json = Path::new("plan.json");
        let yaml = Path::new("plan.YML");
        assert_eq!(effective_format(OutputFormat::Auto, Some(json)), OutputFormat::Json);
        assert_eq!(effective_format(OutputFormat::Auto, Some(yaml)), OutputFormat::Yaml);
        assert_eq!(effective_format(OutputFormat::Auto, None), OutputFormat::Text);
    }

    #[test]
    fn test_explicit_format_wins() {
        let json = Path::new("plan.json");
        assert_eq!(effective_format(OutputFormat::Yaml, Some(json)), OutputFormat::Yaml);
    }
}
