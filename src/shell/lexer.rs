//! Shell-style lexer (shlex-like).
//!
//! Reads characters one at a time and groups them into words, honoring
//! quotes, escapes, comments, punctuation runs, and source inclusion.

use std::io::{self, BufRead, BufReader, Read};

use thiserror::Error;
use tracing::{debug, trace};

use super::source::{FileSourceHook, SourceHook};
use super::syntax::{CharClass, Syntax};

/// Errors that can occur while lexing.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("\"{name}\", line {line}: no closing quotation")]
    UnterminatedQuotation { name: String, line: usize },

    #[error("\"{name}\", line {line}: no escaped character")]
    DanglingEscape { name: String, line: usize },

    #[error("\"{name}\", line {line}: source directive without a target")]
    MissingSourceTarget { name: String, line: usize },

    #[error("failed to open source '{requested}': {source}")]
    SourceResolution {
        requested: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Where an escape sequence returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    Word,
    Quote(char),
}

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Whitespace,
    Word,
    Punctuation,
    Quote(char),
    Escape { escape: char, resume: Resume },
    /// Input exhausted.
    Done,
}

impl From<Resume> for Mode {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::Word => Mode::Word,
            Resume::Quote(q) => Mode::Quote(q),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Emit,
}

/// An input stream with its logical name and line counter.
struct Input<'a> {
    name: String,
    reader: Box<dyn BufRead + 'a>,
    line: usize,
}

impl<'a> Input<'a> {
    fn new<R: Read + 'a>(reader: R, name: String) -> Self {
        Self {
            name,
            reader: Box::new(BufReader::new(reader)),
            line: 1,
        }
    }
}

/// A pull-based shell word lexer.
pub struct Lexer<'a> {
    syntax: Syntax,
    input: Input<'a>,
    /// Suspended parents of the current input, innermost last.
    stack: Vec<Input<'a>>,
    mode: Mode,
    token: String,
    /// Whole tokens awaiting redelivery (LIFO).
    token_pushback: Vec<String>,
    /// Characters overread while splitting punctuation.
    char_pushback: Vec<char>,
    hook: Box<dyn SourceHook + 'a>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer with the default character sets.
    pub fn new<R: Read + 'a>(
        reader: R,
        name: impl Into<String>,
        posix: bool,
        punctuation_chars: &str,
    ) -> Self {
        Self::with_syntax(reader, name, Syntax::new(posix, punctuation_chars))
    }

    /// Create a lexer with an explicit configuration.
    pub fn with_syntax<R: Read + 'a>(reader: R, name: impl Into<String>, syntax: Syntax) -> Self {
        Self {
            syntax,
            input: Input::new(reader, name.into()),
            stack: Vec::new(),
            mode: Mode::Whitespace,
            token: String::new(),
            token_pushback: Vec::new(),
            char_pushback: Vec::new(),
            hook: Box::new(FileSourceHook),
        }
    }

    /// Replace the hook used to open included sources.
    pub fn set_source_hook(&mut self, hook: impl SourceHook + 'a) {
        self.hook = Box::new(hook);
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Logical name of the current input.
    pub fn name(&self) -> &str {
        &self.input.name
    }

    /// Current line number of the current input (1-based).
    pub fn line(&self) -> usize {
        self.input.line
    }

    /// Number of suspended inputs below the current one.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the current input has been exhausted.
    pub fn is_done(&self) -> bool {
        self.mode == Mode::Done
    }

    /// Push a token back; it is returned by the next `get_token`.
    pub fn push_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        if self.syntax.debug >= 1 {
            debug!(token = %token, "pushing token");
        }
        self.token_pushback.push(token);
    }

    /// Suspend the current input and continue from `reader`.
    ///
    /// Scanning starts afresh on the new input even if the parent is exhausted.
    pub fn push_source<R: Read + 'a>(&mut self, reader: R, name: impl Into<String>) {
        let parent = std::mem::replace(&mut self.input, Input::new(reader, name.into()));
        self.stack.push(parent);
        self.mode = Mode::Whitespace;
        if self.syntax.debug >= 1 {
            debug!(name = %self.input.name, depth = self.stack.len(), "pushing to source");
        }
    }

    /// Drop the current input and resume its parent.
    ///
    /// Returns `false` if there is no parent to resume.
    pub fn pop_source(&mut self) -> bool {
        let Some(parent) = self.stack.pop() else {
            return false;
        };
        drop(std::mem::replace(&mut self.input, parent));
        self.mode = Mode::Whitespace;
        if self.syntax.debug >= 1 {
            debug!(name = %self.input.name, line = self.input.line, "popping to source");
        }
        true
    }

    /// Close every included source and stop lexing.
    ///
    /// The outermost input becomes current again.
    pub fn abort(&mut self) {
        while self.pop_source() {}
        self.token.clear();
        self.token_pushback.clear();
        self.char_pushback.clear();
        self.mode = Mode::Done;
    }

    /// Start over on a fresh input, discarding all state.
    pub fn reset<R: Read + 'a>(&mut self, reader: R, name: impl Into<String>) {
        self.abort();
        self.input = Input::new(reader, name.into());
        self.mode = Mode::Whitespace;
    }

    /// Format a `"name", line N: ` prefix for messages.
    pub fn error_leader(&self, name: Option<&str>, line: Option<usize>) -> String {
        format!(
            "\"{}\", line {}: ",
            name.unwrap_or(&self.input.name),
            line.unwrap_or(self.input.line)
        )
    }

    /// Get the next token, following source directives.
    ///
    /// Returns `Ok(None)` at the end of the outermost input.
    pub fn get_token(&mut self) -> Result<Option<String>, LexError> {
        if let Some(token) = self.token_pushback.pop() {
            if self.syntax.debug >= 1 {
                debug!(token = %token, "popping token");
            }
            return Ok(Some(token));
        }

        let mut raw = self.read_token()?;

        if let Some(trigger) = self.syntax.source.clone() {
            while raw.as_deref() == Some(trigger.as_str()) {
                let Some(requested) = self.read_token()? else {
                    return Err(LexError::MissingSourceTarget {
                        name: self.input.name.clone(),
                        line: self.input.line,
                    });
                };
                let (name, stream) = self
                    .hook
                    .resolve(&requested, &self.input.name)
                    .map_err(|source| LexError::SourceResolution {
                        requested: requested.clone(),
                        source,
                    })?;
                self.push_source(stream, name);
                raw = self.get_token()?;
            }
        }

        while raw.is_none() {
            if !self.pop_source() {
                if self.syntax.debug >= 1 {
                    debug!("token=EOF");
                }
                return Ok(None);
            }
            raw = self.get_token()?;
        }

        if self.syntax.debug >= 1
            && let Some(token) = &raw
        {
            debug!(token = %token, "token");
        }
        Ok(raw)
    }

    /// Read one raw token, without interpreting source directives.
    ///
    /// Returns `Ok(None)` at the end of the current input.
    pub fn read_token(&mut self) -> Result<Option<String>, LexError> {
        let mut quoted = false;
        let scanned = self.scan(&mut quoted);
        let token = std::mem::take(&mut self.token);
        scanned?;

        let result = if token.is_empty() && !(self.syntax.posix && quoted) {
            None
        } else {
            Some(token)
        };
        if self.syntax.debug >= 2 {
            match &result {
                Some(token) => debug!(token = %token, "raw token"),
                None => debug!("raw token=EOF"),
            }
        }
        Ok(result)
    }

    fn scan(&mut self, quoted: &mut bool) -> Result<(), LexError> {
        while self.mode != Mode::Done {
            let next = self.next_char()?;
            if self.syntax.debug >= 3 {
                trace!(mode = ?self.mode, next = ?next, "scanning");
            }
            let step = match self.mode {
                Mode::Whitespace => self.on_whitespace(next, *quoted)?,
                Mode::Quote(q) => {
                    *quoted = true;
                    self.on_quote(q, next)?
                }
                Mode::Escape { escape, resume } => self.on_escape(escape, resume, next)?,
                Mode::Word | Mode::Punctuation => self.on_word(next, *quoted)?,
                Mode::Done => Step::Emit,
            };
            if step == Step::Emit {
                break;
            }
        }
        Ok(())
    }

    fn on_whitespace(&mut self, next: Option<char>, quoted: bool) -> Result<Step, LexError> {
        let Some(c) = next else {
            self.mode = Mode::Done;
            return Ok(Step::Emit);
        };

        match self.syntax.classify(c) {
            CharClass::Whitespace => {
                if self.syntax.debug >= 2 {
                    debug!("whitespace in whitespace state");
                }
                return Ok(self.boundary(quoted));
            }
            CharClass::CommentStart => self.skip_comment()?,
            CharClass::EscapeChar => {
                self.mode = Mode::Escape {
                    escape: c,
                    resume: Resume::Word,
                };
            }
            CharClass::WordChar => {
                self.token.push(c);
                self.mode = Mode::Word;
            }
            CharClass::PunctuationChar => {
                self.token.push(c);
                self.mode = Mode::Punctuation;
            }
            CharClass::QuoteChar => {
                if !self.syntax.posix {
                    self.token.push(c);
                }
                self.mode = Mode::Quote(c);
            }
            CharClass::Other if self.syntax.whitespace_split => {
                self.token.push(c);
                self.mode = Mode::Word;
            }
            CharClass::Other => {
                self.token.push(c);
                return Ok(self.boundary(quoted));
            }
        }
        Ok(Step::Continue)
    }

    fn on_quote(&mut self, quote: char, next: Option<char>) -> Result<Step, LexError> {
        let Some(c) = next else {
            if self.syntax.debug >= 2 {
                debug!("EOF in quotes state");
            }
            self.mode = Mode::Done;
            return Err(LexError::UnterminatedQuotation {
                name: self.input.name.clone(),
                line: self.input.line,
            });
        };

        if c == quote {
            if !self.syntax.posix {
                self.token.push(c);
                self.mode = Mode::Whitespace;
                return Ok(Step::Emit);
            }
            self.mode = Mode::Word;
        } else if self.syntax.posix && self.syntax.is_escape(c) && self.syntax.is_escaped_quote(quote)
        {
            self.mode = Mode::Escape {
                escape: c,
                resume: Resume::Quote(quote),
            };
        } else {
            self.token.push(c);
        }
        Ok(Step::Continue)
    }

    fn on_escape(
        &mut self,
        escape: char,
        resume: Resume,
        next: Option<char>,
    ) -> Result<Step, LexError> {
        let Some(c) = next else {
            if self.syntax.debug >= 2 {
                debug!("EOF in escape state");
            }
            self.mode = Mode::Done;
            return Err(LexError::DanglingEscape {
                name: self.input.name.clone(),
                line: self.input.line,
            });
        };

        // Inside quotes only the quote and the escape itself are escapable.
        if let Resume::Quote(q) = resume
            && c != q
            && c != escape
        {
            self.token.push(escape);
        }
        self.token.push(c);
        self.mode = resume.into();
        Ok(Step::Continue)
    }

    fn on_word(&mut self, next: Option<char>, quoted: bool) -> Result<Step, LexError> {
        let Some(c) = next else {
            self.mode = Mode::Done;
            return Ok(Step::Emit);
        };

        match self.syntax.classify(c) {
            CharClass::Whitespace => {
                if self.syntax.debug >= 2 {
                    debug!("whitespace in word state");
                }
                self.mode = Mode::Whitespace;
                return Ok(self.boundary(quoted));
            }
            CharClass::CommentStart => {
                self.skip_comment()?;
                if self.syntax.posix {
                    self.mode = Mode::Whitespace;
                    return Ok(self.boundary(quoted));
                }
                return Ok(Step::Continue);
            }
            _ => {}
        }

        let syntax = &self.syntax;
        if self.mode == Mode::Punctuation {
            if syntax.is_punctuation(c) {
                self.token.push(c);
                return Ok(Step::Continue);
            }
            self.char_pushback.push(c);
            self.mode = Mode::Whitespace;
            return Ok(Step::Emit);
        }

        if syntax.posix && syntax.is_quote(c) {
            self.mode = Mode::Quote(c);
        } else if syntax.posix && syntax.is_escape(c) {
            self.mode = Mode::Escape {
                escape: c,
                resume: Resume::Word,
            };
        } else if syntax.is_wordchar(c)
            || syntax.is_quote(c)
            || (syntax.whitespace_split && !syntax.is_punctuation(c))
        {
            self.token.push(c);
        } else {
            if syntax.splits_punctuation() {
                self.char_pushback.push(c);
            } else {
                self.token_pushback.push(c.to_string());
            }
            if self.syntax.debug >= 2 {
                debug!("punctuation in word state");
            }
            self.mode = Mode::Whitespace;
            return Ok(self.boundary(quoted));
        }
        Ok(Step::Continue)
    }

    /// Emit if anything was accumulated, or an empty quoted word in posix mode.
    fn boundary(&self, quoted: bool) -> Step {
        if !self.token.is_empty() || (self.syntax.posix && quoted) {
            Step::Emit
        } else {
            Step::Continue
        }
    }

    fn next_char(&mut self) -> Result<Option<char>, LexError> {
        let next = if self.syntax.splits_punctuation() && !self.char_pushback.is_empty() {
            self.char_pushback.pop()
        } else {
            read_char(self.input.reader.as_mut())?
        };
        if next == Some('\n') {
            self.input.line += 1;
        }
        Ok(next)
    }

    /// Discard the rest of the current line, bypassing pushed-back characters.
    fn skip_comment(&mut self) -> Result<(), LexError> {
        while let Some(c) = read_char(self.input.reader.as_mut())? {
            if c == '\n' {
                self.input.line += 1;
                break;
            }
        }
        Ok(())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<String, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.get_token().transpose()
    }
}

/// Decode one UTF-8 character from the reader.
fn read_char(reader: &mut dyn BufRead) -> io::Result<Option<char>> {
    let mut buf = [0u8; 4];
    let first = loop {
        match reader.read(&mut buf[..1]) {
            Ok(0) => return Ok(None),
            Ok(_) => break buf[0],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    };

    let width = match first {
        0x00..=0x7F => return Ok(Some(char::from(first))),
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Err(invalid_utf8()),
    };
    reader.read_exact(&mut buf[1..width]).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            invalid_utf8()
        } else {
            e
        }
    })?;

    std::str::from_utf8(&buf[..width])
        .ok()
        .and_then(|s| s.chars().next())
        .map(Some)
        .ok_or_else(invalid_utf8)
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "invalid UTF-8 in input")
}
