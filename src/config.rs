//! Configuration loading and merging.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shell::Syntax;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("character {ch:?} is in both {first} and {second}")]
    Overlap {
        ch: char,
        first: &'static str,
        second: &'static str,
    },
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Remove quotes and interpret escapes (default: true).
    pub posix: Option<bool>,

    /// Honor `#` comments (default: true).
    pub comments: Option<bool>,

    /// Split only on whitespace (default: true).
    pub whitespace_split: Option<bool>,

    /// Characters that form their own punctuation tokens.
    pub punctuation_chars: String,

    /// Overrides for the default character sets.
    pub wordchars: Option<String>,
    pub whitespace: Option<String>,
    pub quotes: Option<String>,
    pub escape: Option<String>,
    pub escaped_quotes: Option<String>,
    pub commenters: Option<String>,

    /// Token that includes another file, e.g. "source".
    pub source: Option<String>,

    /// Lexer diagnostic level (0-3). Needs `RUST_LOG` at debug to show.
    pub debug: u8,

    /// Audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging.
    pub enabled: bool,
    /// Path to audit log file.
    pub path: Option<String>,
}

impl Config {
    /// Load configuration, merging user and project configs.
    pub fn load(cwd: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // User config (~/.config/shellwords-lex.toml)
        if let Some(user_config) = Self::load_user_config()? {
            config = user_config;
        }

        // Project config (.shellwords-lex.toml in cwd)
        if let Some(cwd) = cwd {
            if let Some(project_config) = Self::load_project_config(cwd)? {
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    fn load_user_config() -> Result<Option<Self>, ConfigError> {
        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                return Ok(Some(toml::from_str(&content)?));
            }
        }
        Ok(None)
    }

    fn load_project_config(cwd: &Path) -> Result<Option<Self>, ConfigError> {
        let path = cwd.join(".shellwords-lex.toml");
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            return Ok(Some(toml::from_str(&content)?));
        }
        Ok(None)
    }

    /// Get user config path.
    /// Respects SHELLWORDS_LEX_CONFIG env var for testing.
    fn user_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SHELLWORDS_LEX_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("shellwords-lex.toml"))
    }

    /// Merge another config into this one (other takes precedence when set).
    fn merge(&mut self, other: Config) {
        self.posix = other.posix.or(self.posix);
        self.comments = other.comments.or(self.comments);
        self.whitespace_split = other.whitespace_split.or(self.whitespace_split);
        if !other.punctuation_chars.is_empty() {
            self.punctuation_chars = other.punctuation_chars;
        }

        self.wordchars = other.wordchars.or(self.wordchars.take());
        self.whitespace = other.whitespace.or(self.whitespace.take());
        self.quotes = other.quotes.or(self.quotes.take());
        self.escape = other.escape.or(self.escape.take());
        self.escaped_quotes = other.escaped_quotes.or(self.escaped_quotes.take());
        self.commenters = other.commenters.or(self.commenters.take());
        self.source = other.source.or(self.source.take());
        self.debug = self.debug.max(other.debug);

        if other.audit.enabled {
            self.audit.enabled = true;
            if other.audit.path.is_some() {
                self.audit.path = other.audit.path;
            }
        }
    }

    /// Build and validate the lexer configuration.
    pub fn compile(&self) -> Result<Syntax, ConfigError> {
        let mut syntax = Syntax::new(self.posix.unwrap_or(true), &self.punctuation_chars)
            .with_whitespace_split(self.whitespace_split.unwrap_or(true))
            .with_debug(self.debug);

        if let Some(wordchars) = &self.wordchars {
            syntax.wordchars = wordchars.clone();
            syntax
                .wordchars
                .retain(|c| !self.punctuation_chars.contains(c));
        }
        if let Some(whitespace) = &self.whitespace {
            syntax.whitespace = whitespace.clone();
        }
        if let Some(quotes) = &self.quotes {
            syntax.quotes = quotes.clone();
        }
        if let Some(escape) = &self.escape {
            syntax.escape = escape.clone();
        }
        if let Some(escaped_quotes) = &self.escaped_quotes {
            syntax.escaped_quotes = escaped_quotes.clone();
        }
        if let Some(commenters) = &self.commenters {
            syntax.commenters = commenters.clone();
        }
        if !self.comments.unwrap_or(true) {
            syntax.commenters.clear();
        }
        syntax.source = self.source.clone();

        check_disjoint(&syntax)?;
        Ok(syntax)
    }
}

/// Reject character sets that would make classification ambiguous.
fn check_disjoint(syntax: &Syntax) -> Result<(), ConfigError> {
    let sets: [(&'static str, &str); 4] = [
        ("whitespace", syntax.whitespace.as_str()),
        ("quotes", syntax.quotes.as_str()),
        ("escape", syntax.escape.as_str()),
        ("commenters", syntax.commenters.as_str()),
    ];
    for (i, (first, a)) in sets.iter().enumerate() {
        for (second, b) in &sets[i + 1..] {
            if let Some(ch) = a.chars().find(|c| b.contains(*c)) {
                return Err(ConfigError::Overlap {
                    ch,
                    first: *first,
                    second: *second,
                });
            }
        }
    }
    Ok(())
}
