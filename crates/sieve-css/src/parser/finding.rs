use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::nth::Nth;

/// A name in a type, namespace or attribute position: `*` or an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NameMatch {
    /// `*`
    Any,
    /// An identifier, already folded per the case policy.
    Named(String),
}

/// Attribute value operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum AttrOp {
    /// `=`, exact value
    #[strum(to_string = "=")]
    Equals,
    /// `~=`, one of the whitespace-separated words
    #[strum(to_string = "~=")]
    Includes,
    /// `^=`, prefix
    #[strum(to_string = "^=")]
    BeginsWith,
    /// `$=`, suffix
    #[strum(to_string = "$=")]
    EndsWith,
    /// `*=`, substring
    #[strum(to_string = "*=")]
    Contains,
    /// `|=`, exact or followed by `-`
    #[strum(to_string = "|=")]
    DashMatch,
    /// `/=`, regular expression search
    #[strum(to_string = "/=")]
    Matches,
}

/// One attribute condition, from `[...]`, `#id` or `.class`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeTest {
    /// `ns|` prefix inside the brackets. `None` matches any namespace.
    pub namespace: Option<NameMatch>,
    /// The attribute name.
    pub name: String,
    /// Operator and value. `None` is a plain existence test.
    pub value: Option<(AttrOp, String)>,
}

impl AttributeTest {
    /// `[name]`
    #[must_use]
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            value: None,
        }
    }

    /// `[name op value]`
    #[must_use]
    pub fn compare(name: impl Into<String>, op: AttrOp, value: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            value: Some((op, value.into())),
        }
    }
}

/// The pseudo-class names the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum PseudoName {
    Root,
    NthChild,
    NthLastChild,
    NthOfType,
    NthLastOfType,
    FirstChild,
    LastChild,
    FirstOfType,
    LastOfType,
    OnlyChild,
    OnlyOfType,
    Empty,
    OnlyText,
    Not,
    Eps,
}

/// A parsed pseudo-class with its argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PseudoClass {
    /// `:root`, an element directly under the document root
    Root,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:only-child`
    OnlyChild,
    /// `:only-of-type`
    OnlyOfType,
    /// `:empty`, no element children and no non-whitespace text
    Empty,
    /// `:only-text`, at least one child and every child is text
    OnlyText,
    /// `:nth-child(an+b)`
    NthChild(Nth),
    /// `:nth-last-child(an+b)`
    NthLastChild(Nth),
    /// `:nth-of-type(an+b)`
    NthOfType(Nth),
    /// `:nth-last-of-type(an+b)`
    NthLastOfType(Nth),
    /// `:not(selector)`, the findings of the nested selector
    Not(Vec<SelectorFinding>),
    /// `:eps(selector)`, the positive counterpart of `:not`
    Eps(Vec<SelectorFinding>),
}

/// Selector combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Combinator {
    /// Whitespace: any descendant
    Descendant,
    /// `>`: direct child
    Child,
    /// `+`: the next element sibling
    Neighbour,
    /// `~`: any following element sibling
    Follower,
    /// `<`: the previous element sibling
    ReverseNeighbour,
    /// `%`: any preceding element sibling
    Predecessor,
}

/// One unit of selector parser output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SelectorFinding {
    /// `ns|` before a type selector.
    Namespace(NameMatch),
    /// A type selector or `*`.
    Element(NameMatch),
    /// An attribute condition.
    Attribute(AttributeTest),
    /// A pseudo-class.
    Pseudo(PseudoClass),
    /// Move from each candidate to its parent (`..`).
    Parent,
    /// A combinator between two compound selectors.
    Combinator(Combinator),
    /// `,` between two alternative selectors.
    Alternative,
    /// Input that could not be parsed, verbatim. Always last.
    Tail(String),
}
