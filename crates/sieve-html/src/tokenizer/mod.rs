//! HTML tokenizer module.
//!
//! The HTML grammar for the shared delimiter lexer. Multi-character
//! delimiters are listed ahead of their prefixes: `<!--` and `<![CDATA[`
//! before `<!`, `</` before `<`, `/>` before `>`.

/// Token kinds produced by the HTML grammar.
pub mod token;

use std::sync::LazyLock;

use regex::Regex;
use sieve_common::{Grammar, Lexer, compile_delimiters};

pub use token::HtmlTokenKind;

/// Delimiter patterns in priority order.
const DELIMITERS: &[&str] = &[
    "<!--",
    "-->",
    r"<!\[CDATA\[",
    r"\]\]>",
    "<!",
    r"<\?",
    r"\?>",
    "</",
    "/>",
    "<",
    ">",
    "=",
    "\"",
    "'",
    r"\\",
    ":",
    r"\s+",
];

static DELIMITER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    compile_delimiters(DELIMITERS).expect("HTML delimiter patterns are valid regexes")
});

/// The HTML lexical grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlGrammar;

impl Grammar for HtmlGrammar {
    type Kind = HtmlTokenKind;
    const TEXT: HtmlTokenKind = HtmlTokenKind::Text;

    fn delimiters() -> &'static Regex {
        &DELIMITER_REGEX
    }

    fn classify(raw: &str) -> HtmlTokenKind {
        match raw {
            "<!--" => HtmlTokenKind::CommentOpen,
            "-->" => HtmlTokenKind::CommentClose,
            "<![CDATA[" => HtmlTokenKind::CdataOpen,
            "]]>" => HtmlTokenKind::CdataClose,
            "<!" => HtmlTokenKind::DeclarationOpen,
            "<?" => HtmlTokenKind::InstructionOpen,
            "?>" => HtmlTokenKind::InstructionClose,
            "</" => HtmlTokenKind::EndTagOpen,
            "/>" => HtmlTokenKind::SelfClose,
            "<" => HtmlTokenKind::TagOpen,
            ">" => HtmlTokenKind::TagClose,
            "=" => HtmlTokenKind::Equals,
            "\"" => HtmlTokenKind::DoubleQuote,
            "'" => HtmlTokenKind::SingleQuote,
            "\\" => HtmlTokenKind::Escape,
            ":" => HtmlTokenKind::Colon,
            _ => HtmlTokenKind::Whitespace,
        }
    }
}

/// A lexer over HTML input.
pub type HtmlLexer<'a> = Lexer<'a, HtmlGrammar>;

/// Tokenize a whole string eagerly. Mostly useful for debugging and tests.
#[must_use]
pub fn tokenize(input: &str) -> Vec<(HtmlTokenKind, &str)> {
    let mut lexer = HtmlLexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.current() {
        tokens.push((token.kind, token.text));
        lexer.advance();
    }
    tokens
}
