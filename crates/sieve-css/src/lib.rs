//! CSS selector parser and selector engine for Sieve.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - the selector delimiter grammar over the shared lexer
//! - **Parser** - a pull-based stream of [`SelectorFinding`]s with
//!   backtracking and a furthest-failure diagnostic
//! - **Selector Engine** - findings compiled into chains of lazy walk steps
//! - **Query** - matching a [`Selector`] against a [`sieve_dom::DomTree`]
//!
//! Beyond CSS3 the grammar accepts `..` (move to the parent), `<` (previous
//! element sibling), `%` (any earlier element sibling), `/=` (regex match),
//! `:only-text` and `:eps(...)`.
//!
//! # Not Implemented
//!
//! - Pseudo-elements (`::before`)
//! - Dynamic pseudo-classes (`:hover`, `:checked`)
//! - Specificity and the cascade

/// Selector parser producing findings.
pub mod parser;
/// Running compiled selectors against a tree.
pub mod query;
/// Compiling findings into selectors.
pub mod selector;
/// Selector tokenizer over the shared delimiter lexer.
pub mod tokenizer;

pub use parser::{
    AttrOp, AttributeTest, Combinator, Failure, NameMatch, Nth, PseudoClass, Rule,
    SelectorFinding, SelectorParser,
};
pub use query::{Matches, Query};
pub use selector::{Selector, SelectorError};
pub use tokenizer::{CssLexer, CssTokenKind};
