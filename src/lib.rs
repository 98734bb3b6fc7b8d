//! shellwords-lex - shell-style word splitting.
//!
//! Splits command-like strings into argument vectors the way a POSIX
//! shell would, honoring quotes, escapes, comments, punctuation runs,
//! and `source`-style inclusion, without running a shell.

pub mod audit;
pub mod config;
pub mod input;
pub mod output;
pub mod shell;

pub use config::{Config, ConfigError};
pub use input::{OutputFormat, SplitRequest};
pub use shell::{LexError, Lexer, Syntax, join, quote, split};
