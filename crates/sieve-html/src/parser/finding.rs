use core::fmt;

use serde::Serialize;
use strum_macros::Display;

/// A possibly namespaced name, from `tag` or `ns:tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QualifiedName {
    /// The part before the colon, if there was one.
    pub namespace: Option<String>,
    /// The part after the colon, or the whole name.
    pub local: String,
}

impl QualifiedName {
    /// A name without a namespace.
    #[must_use]
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// A name with a namespace prefix.
    #[must_use]
    pub fn prefixed(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// One unit of parser output.
///
/// Findings arrive in document order. Every `ElementStart` is balanced by
/// exactly one `ElementEnd` or `MissingEnd` before the stream ends, unless
/// the stream ends with a `Tail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Finding {
    /// `<tag` was read; attributes follow.
    ElementStart(QualifiedName),
    /// One attribute of the most recent start tag. `value` is `None` for a
    /// bare attribute.
    Attribute {
        /// The attribute name.
        name: QualifiedName,
        /// The unescaped value.
        value: Option<String>,
    },
    /// The element was closed by its own end tag, by `/>`, or by being void.
    ElementEnd(QualifiedName),
    /// The element's children ended without its end tag. The input that
    /// stopped it has not been consumed.
    MissingEnd(QualifiedName),
    /// Character data outside tags.
    Data(String),
    /// The verbatim body of a `<![CDATA[...]]>` section.
    Cdata(String),
    /// The body of a `<!--...-->` comment.
    Comment(String),
    /// The body of a `<!...>` declaration such as `DOCTYPE html`.
    Declaration(String),
    /// The body of a `<?...?>` processing instruction.
    Instruction(String),
    /// Input the parser could not make sense of, verbatim. Always last.
    Tail(String),
}
