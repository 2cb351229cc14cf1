//! HTML parser module: the resumable finding stream.

mod finding;
mod machine;
mod options;

pub use finding::{Finding, QualifiedName};
pub use machine::HtmlParser;
pub use options::{ParserOptions, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};
