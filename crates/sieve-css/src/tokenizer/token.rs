use strum_macros::Display;

/// Lexical units of the selector grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum CssTokenKind {
    /// Any run of input between delimiters.
    Text,
    /// One or more whitespace characters.
    Whitespace,
    /// `..`, the parent axis
    DoubleDot,
    /// `=`
    Equals,
    /// `~=`
    Includes,
    /// `^=`
    BeginsWith,
    /// `$=`
    EndsWith,
    /// `*=`
    Contains,
    /// `|=`
    DashMatch,
    /// `/=`
    RegexMatch,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `:`
    Colon,
    /// `|`, the namespace separator
    Pipe,
    /// `*`
    Star,
    /// `.`
    Dot,
    /// `#`
    Hash,
    /// `>`
    Greater,
    /// `+`
    Plus,
    /// `~`
    Tilde,
    /// `<`
    Less,
    /// `%`
    Percent,
    /// `,`
    Comma,
    /// `"`
    DoubleQuote,
    /// `'`
    SingleQuote,
    /// `\`
    Escape,
}

impl CssTokenKind {
    /// The character a quote token stands for.
    #[must_use]
    pub const fn quote_char(self) -> Option<char> {
        match self {
            Self::DoubleQuote => Some('"'),
            Self::SingleQuote => Some('\''),
            _ => None,
        }
    }
}
