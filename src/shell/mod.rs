//! Shell word lexing.

mod lexer;
mod quote;
mod source;
mod split;
mod syntax;

pub use lexer::{LexError, Lexer};
pub use quote::{is_safe, join, quote};
pub use source::{FileSourceHook, ResolvedSource, SourceHook, resolve_path, strip_quotes};
pub use split::{split, split_reader, split_with};
pub use syntax::{
    CharClass, DEFAULT_COMMENTERS, DEFAULT_ESCAPE, DEFAULT_ESCAPED_QUOTES, DEFAULT_QUOTES,
    DEFAULT_WHITESPACE, DEFAULT_WORDCHARS, POSIX_EXTRA_WORDCHARS, PUNCTUATION_WORDCHARS,
    SHELL_PUNCTUATION, Syntax,
};
