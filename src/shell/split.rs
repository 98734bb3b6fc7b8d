//! Split a whole input into words.

use std::io::Read;

use super::lexer::{LexError, Lexer};
use super::syntax::Syntax;

/// Split a string into shell words.
///
/// Whitespace splitting is always on. `comments` controls whether `#`
/// starts a comment; `posix` selects quote and escape removal.
pub fn split(input: &str, comments: bool, posix: bool) -> Result<Vec<String>, LexError> {
    split_reader(input.as_bytes(), comments, posix)
}

/// Split everything readable from `reader` into shell words.
pub fn split_reader<R: Read>(
    reader: R,
    comments: bool,
    posix: bool,
) -> Result<Vec<String>, LexError> {
    let mut syntax = Syntax::new(posix, "").with_whitespace_split(true);
    if !comments {
        syntax.commenters.clear();
    }
    split_with(reader, syntax)
}

/// Split with an explicit configuration.
pub fn split_with<R: Read>(reader: R, syntax: Syntax) -> Result<Vec<String>, LexError> {
    Lexer::with_syntax(reader, "", syntax).collect()
}
