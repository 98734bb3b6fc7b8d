//! Request parsing for the command-line entry point.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::config::Config;

/// Errors that can occur when parsing a request.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the split words are written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A JSON array of strings.
    #[default]
    Json,
    /// One word per line.
    Lines,
    /// Words re-quoted and joined with spaces.
    Quoted,
}

/// A split request read from stdin.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitRequest {
    /// The text to split.
    pub input: String,

    /// Override the configured posix mode.
    #[serde(default)]
    pub posix: Option<bool>,

    /// Override whether comments are honored.
    #[serde(default)]
    pub comments: Option<bool>,

    /// Override the punctuation characters.
    #[serde(default)]
    pub punctuation_chars: Option<String>,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Logical name of the input, used in errors and to resolve includes.
    #[serde(default)]
    pub name: Option<String>,

    /// Working directory (optional).
    #[serde(default)]
    pub cwd: Option<String>,
}

impl SplitRequest {
    /// Parse from JSON string.
    pub fn parse(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the per-request overrides on top of loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if self.posix.is_some() {
            config.posix = self.posix;
        }
        if self.comments.is_some() {
            config.comments = self.comments;
        }
        if let Some(punctuation_chars) = &self.punctuation_chars {
            config.punctuation_chars = punctuation_chars.clone();
        }
    }

    /// Logical source name; relative names are placed under `cwd`.
    pub fn source_name(&self) -> String {
        let name = self.name.as_deref().unwrap_or("<stdin>");
        match &self.cwd {
            Some(cwd) if !Path::new(name).is_absolute() => {
                Path::new(cwd).join(name).to_string_lossy().into_owned()
            }
            _ => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_request() {
        let req = SplitRequest::parse(r#"{"input":"ls -la"}"#).unwrap();
        assert_eq!(req.input, "ls -la");
        assert_eq!(req.format, OutputFormat::Json);
        assert!(req.posix.is_none());
        assert_eq!(req.source_name(), "<stdin>");
    }

    #[test]
    fn test_parse_full_request() {
        let req = SplitRequest::parse(
            r#"{"input":"a|b","posix":false,"comments":false,"punctuation_chars":"|","format":"lines","name":"cmd.txt","cwd":"/work"}"#,
        )
        .unwrap();
        assert_eq!(req.format, OutputFormat::Lines);
        assert_eq!(req.source_name(), "/work/cmd.txt");
    }

    #[test]
    fn test_apply_overrides() {
        let req = SplitRequest::parse(
            r#"{"input":"x","posix":false,"punctuation_chars":";"}"#,
        )
        .unwrap();
        let mut config = Config {
            comments: Some(false),
            ..Default::default()
        };
        req.apply_to(&mut config);
        assert_eq!(config.posix, Some(false));
        assert_eq!(config.comments, Some(false));
        assert_eq!(config.punctuation_chars, ";");
    }

    #[test]
    fn test_missing_input() {
        assert!(SplitRequest::parse(r#"{"posix":true}"#).is_err());
    }

    #[test]
    fn test_unknown_format() {
        assert!(SplitRequest::parse(r#"{"input":"x","format":"xml"}"#).is_err());
    }
}
