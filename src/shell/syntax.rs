//! Character-set configuration and classification.

/// Characters that start a comment running to end of line.
pub const DEFAULT_COMMENTERS: &str = "#";

/// ASCII word characters recognized in both modes.
pub const DEFAULT_WORDCHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Latin-1 letters added to the word characters in posix mode.
pub const POSIX_EXTRA_WORDCHARS: &str =
    "ßàáâãäåæçèéêëìíîïðñòóôõöøùúûüýþÿÀÁÂÃÄÅÆÇÈÉÊËÌÍÎÏÐÑÒÓÔÕÖØÙÚÛÜÝÞ";

/// Characters re-added to the word characters when punctuation splitting is on.
pub const PUNCTUATION_WORDCHARS: &str = "~-./*?=";

/// Punctuation set that splits on common shell operators.
pub const SHELL_PUNCTUATION: &str = "();<>|&";

pub const DEFAULT_WHITESPACE: &str = " \t\r\n";
pub const DEFAULT_QUOTES: &str = "'\"";
pub const DEFAULT_ESCAPE: &str = "\\";
pub const DEFAULT_ESCAPED_QUOTES: &str = "\"";

/// Class of a single input character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    CommentStart,
    /// Only reported in posix mode.
    EscapeChar,
    WordChar,
    PunctuationChar,
    QuoteChar,
    Other,
}

/// Immutable lexing configuration.
///
/// Built once and handed to the lexer; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    /// Interpret quotes and escapes instead of keeping them verbatim.
    pub posix: bool,
    pub commenters: String,
    pub wordchars: String,
    pub whitespace: String,
    pub quotes: String,
    pub escape: String,
    /// Quote characters inside which the escape character is honored.
    pub escaped_quotes: String,
    /// Split only on whitespace; other characters continue the word.
    pub whitespace_split: bool,
    pub punctuation_chars: String,
    /// Token that triggers inclusion of another source.
    pub source: Option<String>,
    /// Diagnostic verbosity (0 to 3).
    ///
    /// Selects which lexer events are emitted as `tracing` debug events. They
    /// only reach the output when the subscriber's filter also lets them
    /// through, e.g. `RUST_LOG=shellwords_lex=debug`.
    pub debug: u8,
}

impl Default for Syntax {
    fn default() -> Self {
        Self::new(false, "")
    }
}

impl Syntax {
    /// Build the default configuration for the given mode and punctuation set.
    ///
    /// Punctuation characters are removed from the word characters, and
    /// `~-./*?=` are added back unless they are punctuation themselves.
    pub fn new(posix: bool, punctuation_chars: &str) -> Self {
        let mut wordchars = DEFAULT_WORDCHARS.to_string();
        if posix {
            wordchars.push_str(POSIX_EXTRA_WORDCHARS);
        }
        if !punctuation_chars.is_empty() {
            wordchars.push_str(PUNCTUATION_WORDCHARS);
            wordchars.retain(|c| !punctuation_chars.contains(c));
        }

        Self {
            posix,
            commenters: DEFAULT_COMMENTERS.to_string(),
            wordchars,
            whitespace: DEFAULT_WHITESPACE.to_string(),
            quotes: DEFAULT_QUOTES.to_string(),
            escape: DEFAULT_ESCAPE.to_string(),
            escaped_quotes: DEFAULT_ESCAPED_QUOTES.to_string(),
            whitespace_split: false,
            punctuation_chars: punctuation_chars.to_string(),
            source: None,
            debug: 0,
        }
    }

    pub fn with_whitespace_split(mut self, on: bool) -> Self {
        self.whitespace_split = on;
        self
    }

    /// Replace the comment characters; an empty string disables comments.
    pub fn with_commenters(mut self, commenters: impl Into<String>) -> Self {
        self.commenters = commenters.into();
        self
    }

    pub fn with_source(mut self, trigger: impl Into<String>) -> Self {
        self.source = Some(trigger.into());
        self
    }

    pub fn with_debug(mut self, level: u8) -> Self {
        self.debug = level;
        self
    }

    /// Whether punctuation splitting is configured.
    pub fn splits_punctuation(&self) -> bool {
        !self.punctuation_chars.is_empty()
    }

    pub fn is_whitespace(&self, c: char) -> bool {
        self.whitespace.contains(c)
    }

    pub fn is_commenter(&self, c: char) -> bool {
        self.commenters.contains(c)
    }

    pub fn is_quote(&self, c: char) -> bool {
        self.quotes.contains(c)
    }

    pub fn is_escape(&self, c: char) -> bool {
        self.escape.contains(c)
    }

    pub fn is_escaped_quote(&self, c: char) -> bool {
        self.escaped_quotes.contains(c)
    }

    pub fn is_wordchar(&self, c: char) -> bool {
        self.wordchars.contains(c)
    }

    pub fn is_punctuation(&self, c: char) -> bool {
        self.punctuation_chars.contains(c)
    }

    /// Classify a character.
    ///
    /// Checks run in a fixed order: whitespace, comment, escape (posix
    /// only), word, punctuation, quote. Anything else is `Other`.
    pub fn classify(&self, c: char) -> CharClass {
        if self.is_whitespace(c) {
            CharClass::Whitespace
        } else if self.is_commenter(c) {
            CharClass::CommentStart
        } else if self.posix && self.is_escape(c) {
            CharClass::EscapeChar
        } else if self.is_wordchar(c) {
            CharClass::WordChar
        } else if self.is_punctuation(c) {
            CharClass::PunctuationChar
        } else if self.is_quote(c) {
            CharClass::QuoteChar
        } else {
            CharClass::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sets() {
        let syntax = Syntax::new(false, "");
        assert_eq!(syntax.wordchars, DEFAULT_WORDCHARS);
        assert_eq!(syntax.commenters, "#");
        assert!(!syntax.whitespace_split);
        assert!(syntax.source.is_none());
    }

    #[test]
    fn test_posix_adds_latin1_letters() {
        let syntax = Syntax::new(true, "");
        assert!(syntax.is_wordchar('é'));
        assert!(syntax.is_wordchar('ß'));
        assert!(!Syntax::new(false, "").is_wordchar('é'));
    }

    #[test]
    fn test_punctuation_removed_from_wordchars() {
        let syntax = Syntax::new(false, "_");
        assert!(!syntax.wordchars.contains('_'));
        assert!(syntax.is_wordchar('~'));
        assert!(syntax.is_wordchar('='));
    }

    #[test]
    fn test_punctuation_overlap_not_readded() {
        let syntax = Syntax::new(true, "();<>|&-");
        assert!(!syntax.is_wordchar('-'));
        assert!(syntax.is_wordchar('.'));
        assert!(syntax.is_punctuation('|'));
    }

    #[test]
    fn test_classify_order() {
        let posix = Syntax::new(true, "();");
        assert_eq!(posix.classify(' '), CharClass::Whitespace);
        assert_eq!(posix.classify('#'), CharClass::CommentStart);
        assert_eq!(posix.classify('\\'), CharClass::EscapeChar);
        assert_eq!(posix.classify('a'), CharClass::WordChar);
        assert_eq!(posix.classify(';'), CharClass::PunctuationChar);
        assert_eq!(posix.classify('"'), CharClass::QuoteChar);
        assert_eq!(posix.classify('!'), CharClass::Other);
    }

    #[test]
    fn test_escape_is_other_outside_posix() {
        let syntax = Syntax::new(false, "");
        assert_eq!(syntax.classify('\\'), CharClass::Other);
    }

    #[test]
    fn test_disable_comments() {
        let syntax = Syntax::new(true, "").with_commenters("");
        assert_eq!(syntax.classify('#'), CharClass::Other);
    }
}
