//! CSS selector tokenizer module.
//!
//! The selector grammar for the shared delimiter lexer. Two-character
//! operators come first so that `~=` is never read as `~` followed by `=`,
//! and `..` is never read as two class dots.

/// Token kinds produced by the selector grammar.
pub mod token;

use std::sync::LazyLock;

use regex::Regex;
use sieve_common::{Grammar, Lexer, compile_delimiters};

pub use token::CssTokenKind;

/// Delimiter patterns in priority order.
const DELIMITERS: &[&str] = &[
    r"\.\.",
    "~=",
    r"\^=",
    r"\$=",
    r"\*=",
    r"\|=",
    "/=",
    r"\s+",
    r"\[",
    r"\]",
    r"\(",
    r"\)",
    ":",
    r"\|",
    r"\*",
    r"\.",
    "#",
    ">",
    r"\+",
    "~",
    "<",
    "%",
    ",",
    "\"",
    "'",
    r"\\",
    "=",
];

static DELIMITER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    compile_delimiters(DELIMITERS).expect("selector delimiter patterns are valid regexes")
});

/// The selector lexical grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssGrammar;

impl Grammar for CssGrammar {
    type Kind = CssTokenKind;
    const TEXT: CssTokenKind = CssTokenKind::Text;

    fn delimiters() -> &'static Regex {
        &DELIMITER_REGEX
    }

    fn classify(raw: &str) -> CssTokenKind {
        match raw {
            ".." => CssTokenKind::DoubleDot,
            "=" => CssTokenKind::Equals,
            "~=" => CssTokenKind::Includes,
            "^=" => CssTokenKind::BeginsWith,
            "$=" => CssTokenKind::EndsWith,
            "*=" => CssTokenKind::Contains,
            "|=" => CssTokenKind::DashMatch,
            "/=" => CssTokenKind::RegexMatch,
            "[" => CssTokenKind::OpenBracket,
            "]" => CssTokenKind::CloseBracket,
            "(" => CssTokenKind::OpenParen,
            ")" => CssTokenKind::CloseParen,
            ":" => CssTokenKind::Colon,
            "|" => CssTokenKind::Pipe,
            "*" => CssTokenKind::Star,
            "." => CssTokenKind::Dot,
            "#" => CssTokenKind::Hash,
            ">" => CssTokenKind::Greater,
            "+" => CssTokenKind::Plus,
            "~" => CssTokenKind::Tilde,
            "<" => CssTokenKind::Less,
            "%" => CssTokenKind::Percent,
            "," => CssTokenKind::Comma,
            "\"" => CssTokenKind::DoubleQuote,
            "'" => CssTokenKind::SingleQuote,
            "\\" => CssTokenKind::Escape,
            _ => CssTokenKind::Whitespace,
        }
    }
}

/// A lexer over selector text.
pub type CssLexer<'a> = Lexer<'a, CssGrammar>;

/// Tokenize a whole selector eagerly. Mostly useful for debugging and tests.
#[must_use]
pub fn tokenize(input: &str) -> Vec<(CssTokenKind, &str)> {
    let mut lexer = CssLexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.current() {
        tokens.push((token.kind, token.text));
        lexer.advance();
    }
    tokens
}
