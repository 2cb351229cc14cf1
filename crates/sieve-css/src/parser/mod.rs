//! Selector parser module: the resumable finding stream.

mod finding;
mod machine;
mod nth;

pub use finding::{
    AttrOp, AttributeTest, Combinator, NameMatch, PseudoClass, SelectorFinding,
};
pub use machine::{Failure, Rule, SelectorParser};
pub use nth::Nth;
