//! Common utilities for the Sieve parsers.
//!
//! This crate provides shared infrastructure used by the HTML and CSS crates:
//! - **Lexer** - a delimiter-driven tokenizer with mark/reset backtracking
//! - **Case folding** - the name case policy shared by both grammars
//! - **Warning System** - colored terminal output for recovered input problems

pub mod case;
pub mod lexer;
pub mod warning;

pub use case::CaseMode;
pub use lexer::{Grammar, Lexer, Mark, Token, compile_delimiters};
