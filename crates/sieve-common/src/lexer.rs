//! Delimiter-driven lexer shared by the HTML and CSS grammars.
//!
//! A grammar supplies an ordered list of delimiter patterns and a classifier.
//! The lexer repeatedly finds the earliest delimiter in the unscanned input;
//! the text before it becomes a text token and the delimiter itself is
//! classified. Patterns are tried in the order given, so a grammar must list
//! multi-character delimiters before their single-character prefixes
//! (`/>` before `>`, `~=` before `~`).
//!
//! Tokens are computed lazily as the cursor advances. Every token that was
//! ever produced is kept, which makes [`Lexer::mark`] and [`Lexer::reset`]
//! plain index saves.

use core::fmt;

use regex::Regex;

/// A lexical grammar: delimiter patterns plus token classification.
pub trait Grammar {
    /// The token kinds this grammar produces.
    type Kind: Copy + Eq + fmt::Debug;

    /// Kind assigned to runs of input between delimiters.
    const TEXT: Self::Kind;

    /// The delimiter alternation, in priority order.
    ///
    /// Build it with [`compile_delimiters`].
    fn delimiters() -> &'static Regex;

    /// Classify the text of a matched delimiter.
    fn classify(raw: &str) -> Self::Kind;
}

/// Join delimiter patterns into one alternation that prefers earlier entries.
///
/// The regex engine uses leftmost-first semantics, so among matches starting
/// at the same position the first listed pattern wins.
///
/// # Errors
///
/// Returns the regex error if any pattern is invalid.
pub fn compile_delimiters(patterns: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = patterns
        .iter()
        .map(|pattern| format!("(?:{pattern})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation)
}

/// One lexical unit: its kind, its text and where it starts in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a, K> {
    /// Classification of the token.
    pub kind: K,
    /// The exact input text covered by the token.
    pub text: &'a str,
    /// Byte offset of the token in the input.
    pub offset: usize,
}

impl<K> Token<'_, K> {
    /// Byte offset just past the token.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Opaque cursor snapshot produced by [`Lexer::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

/// A lazily tokenizing cursor over an input string.
pub struct Lexer<'a, G: Grammar> {
    input: &'a str,
    /// Byte offset of the first input byte not yet turned into tokens.
    scanned: usize,
    tokens: Vec<Token<'a, G::Kind>>,
    cursor: usize,
}

impl<'a, G: Grammar> Lexer<'a, G> {
    /// Create a lexer over `input`. No tokens are computed yet.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            scanned: 0,
            tokens: Vec::new(),
            cursor: 0,
        }
    }

    /// The whole input string.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// The token at the cursor, or `None` at end of input.
    pub fn current(&mut self) -> Option<Token<'a, G::Kind>> {
        self.peek(0)
    }

    /// The token `ahead` positions past the cursor.
    pub fn peek(&mut self, ahead: usize) -> Option<Token<'a, G::Kind>> {
        let index = self.cursor + ahead;
        while self.tokens.len() <= index {
            if !self.scan() {
                return None;
            }
        }
        self.tokens.get(index).copied()
    }

    /// Whether the cursor token has the given kind.
    pub fn at(&mut self, kind: G::Kind) -> bool {
        self.current().is_some_and(|token| token.kind == kind)
    }

    /// Move the cursor forward one token. Does nothing at end of input.
    pub fn advance(&mut self) {
        if self.current().is_some() {
            self.cursor += 1;
        }
    }

    /// Consume the cursor token if it has the given kind.
    pub fn eat(&mut self, kind: G::Kind) -> Option<Token<'a, G::Kind>> {
        let token = self.current().filter(|token| token.kind == kind)?;
        self.cursor += 1;
        Some(token)
    }

    /// Whether every input token has been consumed.
    pub fn is_at_end(&mut self) -> bool {
        self.current().is_none()
    }

    /// Snapshot the cursor.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        Mark(self.cursor)
    }

    /// Rewind (or fast-forward) the cursor to a snapshot.
    pub fn reset(&mut self, mark: Mark) {
        self.cursor = mark.0;
    }

    /// Byte offset of the cursor token, or the input length at end.
    pub fn offset(&mut self) -> usize {
        self.current()
            .map_or(self.input.len(), |token| token.offset)
    }

    /// All input from the cursor token onwards.
    pub fn rest(&mut self) -> &'a str {
        let offset = self.offset();
        &self.input[offset..]
    }

    /// Input text between two byte offsets.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Move the cursor to the end of input.
    pub fn finish(&mut self) {
        while self.current().is_some() {
            self.cursor += 1;
        }
    }

    /// Turn the next stretch of unscanned input into one or two tokens.
    ///
    /// Returns `false` once the whole input has been scanned.
    fn scan(&mut self) -> bool {
        let rest = &self.input[self.scanned..];
        if rest.is_empty() {
            return false;
        }

        let found = G::delimiters()
            .find_iter(rest)
            .find(|found| !found.is_empty());

        match found {
            Some(found) => {
                if found.start() > 0 {
                    self.tokens.push(Token {
                        kind: G::TEXT,
                        text: &rest[..found.start()],
                        offset: self.scanned,
                    });
                }
                let text = found.as_str();
                self.tokens.push(Token {
                    kind: G::classify(text),
                    text,
                    offset: self.scanned + found.start(),
                });
                self.scanned += found.end();
            }
            None => {
                self.tokens.push(Token {
                    kind: G::TEXT,
                    text: rest,
                    offset: self.scanned,
                });
                self.scanned = self.input.len();
            }
        }
        true
    }
}

impl<G: Grammar> fmt::Debug for Lexer<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("scanned", &self.scanned)
            .field("tokens", &self.tokens.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
