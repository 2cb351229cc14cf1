use strum_macros::Display;

/// Lexical units of the HTML grammar.
///
/// The lexer only splits on these delimiters; whether a `<` actually opens a
/// tag, or an `=` separates an attribute value, is decided by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum HtmlTokenKind {
    /// Any run of input between delimiters.
    Text,
    /// One or more whitespace characters.
    Whitespace,
    /// `<!--`
    CommentOpen,
    /// `-->`
    CommentClose,
    /// `<![CDATA[`
    CdataOpen,
    /// `]]>`
    CdataClose,
    /// `<!` not followed by `--` or `[CDATA[`
    DeclarationOpen,
    /// `<?`
    InstructionOpen,
    /// `?>`
    InstructionClose,
    /// `</`
    EndTagOpen,
    /// `<`
    TagOpen,
    /// `/>`
    SelfClose,
    /// `>`
    TagClose,
    /// `=`
    Equals,
    /// `"`
    DoubleQuote,
    /// `'`
    SingleQuote,
    /// `\`
    Escape,
    /// `:` between a namespace prefix and a name
    Colon,
}

impl HtmlTokenKind {
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
