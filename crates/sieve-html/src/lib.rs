//! HTML parser and tree builder for Sieve.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - the HTML delimiter grammar over the shared lexer
//! - **Parser** - a pull-based stream of [`Finding`]s with backtracking and
//!   missing end tag recovery
//! - **Tree Builder** - folds findings into a [`DomTree`]
//!
//! The parser is deliberately lenient. It never fails: input it cannot
//! interpret ends up in a final [`Finding::Tail`].
//!
//! # Not Implemented
//!
//! - Character reference decoding (`&amp;` stays as written)
//! - HTML5 insertion modes and implied elements (`<html>`, `<body>`)
//! - Encoding detection

/// Folding findings into a document tree.
pub mod builder;
/// HTML parser producing findings.
pub mod parser;
/// HTML tokenizer over the shared delimiter lexer.
pub mod tokenizer;

pub use builder::{ParseIssue, TreeBuilder};
pub use parser::{Finding, HtmlParser, ParserOptions, QualifiedName};
pub use sieve_dom::DomTree;
pub use tokenizer::{HtmlLexer, HtmlTokenKind};

/// Parse a document with default options.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    TreeBuilder::new(HtmlParser::new(html)).run()
}

/// Parse a document with explicit options, returning recovery issues too.
#[must_use]
pub fn parse_document_with(html: &str, options: ParserOptions) -> (DomTree, Vec<ParseIssue>) {
    TreeBuilder::new(HtmlParser::with_options(html, options)).run_with_issues()
}
