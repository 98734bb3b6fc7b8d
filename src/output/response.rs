//! Rendering split results for stdout and stderr.

use serde::Serialize;

use crate::input::OutputFormat;
use crate::shell::{LexError, join};

/// JSON body written to stderr when lexing fails.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

/// Render split words in the requested format.
pub fn format_words(words: &[String], format: OutputFormat) -> Result<String, serde_json::Error> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(words)?,
        OutputFormat::Lines => words.join("\n"),
        OutputFormat::Quoted => join(words),
    })
}

/// Render a lexing error as a JSON object.
pub fn format_error(err: &LexError) -> String {
    let response = ErrorResponse {
        error: err.to_string(),
        kind: error_kind(err),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| response.error.clone())
}

fn error_kind(err: &LexError) -> &'static str {
    match err {
        LexError::UnterminatedQuotation { .. } => "unterminated_quotation",
        LexError::DanglingEscape { .. } => "dangling_escape",
        LexError::MissingSourceTarget { .. } => "missing_source_target",
        LexError::SourceResolution { .. } => "source_resolution",
        LexError::Io(_) => "io",
    }
}
