use sieve_common::Mark;

use super::finding::{Finding, QualifiedName};
use super::options::ParserOptions;
use crate::tokenizer::{HtmlLexer, HtmlTokenKind};

/// Where the parser stopped when it produced its last finding.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// At a child position of the innermost open element (or top level).
    Content,
    /// Inside a start tag, after its name. Attributes or `>`/`/>` follow.
    StartTag(QualifiedName),
    /// Directly after the start tag of a raw-text element.
    RawText(QualifiedName),
    /// The stream is exhausted.
    Done,
}

/// A pull-based HTML parser.
///
/// Each call to [`Iterator::next`] resumes exactly where the previous
/// finding was produced. The grammar's recursion lives in an explicit stack
/// of open element names, so arbitrarily deep input never grows the call
/// stack.
///
/// Productions are tried in order at every child position: element, comment,
/// CDATA, declaration, processing instruction, character data. Each attempt
/// takes a lexer mark and resets to it on failure.
///
/// When an element's children run out, its end tag is expected next. A
/// mismatched end tag is left unconsumed and the inner element gets
/// [`Finding::MissingEnd`], so an outer element can claim it on a later
/// call. Whatever is left once no element is open becomes one
/// [`Finding::Tail`].
#[derive(Debug)]
pub struct HtmlParser<'a> {
    lexer: HtmlLexer<'a>,
    options: ParserOptions,
    open: Vec<QualifiedName>,
    state: State,
}

impl<'a> HtmlParser<'a> {
    /// Create a parser with default options.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    /// Create a parser with explicit options.
    #[must_use]
    pub const fn with_options(input: &'a str, options: ParserOptions) -> Self {
        Self {
            lexer: HtmlLexer::new(input),
            options,
            open: Vec::new(),
            state: State::Content,
        }
    }

    /// The options this parser runs with.
    #[must_use]
    pub const fn options(&self) -> ParserOptions {
        self.options
    }

    /// Byte offset of the next unconsumed input.
    pub fn offset(&mut self) -> usize {
        self.lexer.offset()
    }

    /// Names of the elements currently open, outermost first.
    #[must_use]
    pub fn open_elements(&self) -> &[QualifiedName] {
        &self.open
    }

    // ===== states =====

    fn content(&mut self) -> Option<Finding> {
        if let Some(name) = self.element_start() {
            self.state = State::StartTag(name.clone());
            return Some(Finding::ElementStart(name));
        }

        let leaf = self
            .enclosed(HtmlTokenKind::CommentOpen, HtmlTokenKind::CommentClose)
            .map(|text| Finding::Comment(text.to_string()))
            .or_else(|| {
                self.enclosed(HtmlTokenKind::CdataOpen, HtmlTokenKind::CdataClose)
                    .map(|text| Finding::Cdata(text.to_string()))
            })
            .or_else(|| {
                self.enclosed(HtmlTokenKind::DeclarationOpen, HtmlTokenKind::TagClose)
                    .map(|text| Finding::Declaration(text.to_string()))
            })
            .or_else(|| {
                self.enclosed(
                    HtmlTokenKind::InstructionOpen,
                    HtmlTokenKind::InstructionClose,
                )
                .map(|text| Finding::Instruction(text.to_string()))
            })
            .or_else(|| self.data().map(|text| Finding::Data(text.to_string())));

        if leaf.is_some() {
            self.state = State::Content;
            return leaf;
        }

        self.end_of_children()
    }

    fn start_tag(&mut self, name: QualifiedName) -> Option<Finding> {
        self.skip_whitespace();

        let Some(token) = self.lexer.current() else {
            self.state = State::Content;
            return Some(Finding::MissingEnd(name));
        };

        match token.kind {
            HtmlTokenKind::SelfClose => {
                self.lexer.advance();
                self.state = State::Content;
                Some(Finding::ElementEnd(name))
            }
            HtmlTokenKind::TagClose => {
                self.lexer.advance();
                let plain = name.namespace.is_none();
                if plain && self.options.is_void(&name.local) {
                    self.state = State::Content;
                    return Some(Finding::ElementEnd(name));
                }
                self.open.push(name.clone());
                self.state = if plain && self.options.is_raw_text(&name.local) {
                    State::RawText(name)
                } else {
                    State::Content
                };
                None
            }
            _ => match self.attribute() {
                Some(finding) => {
                    self.state = State::StartTag(name);
                    Some(finding)
                }
                None => self.tail(),
            },
        }
    }

    fn raw_text(&mut self, name: &QualifiedName) -> Option<Finding> {
        self.state = State::Content;
        let start = self.lexer.offset();
        while let Some(token) = self.lexer.current() {
            if token.kind == HtmlTokenKind::EndTagOpen
                && self.lexer.peek(1).is_some_and(|next| {
                    next.kind == HtmlTokenKind::Text && next.text.eq_ignore_ascii_case(&name.local)
                })
            {
                break;
            }
            self.lexer.advance();
        }
        let end = self.lexer.offset();
        (end > start).then(|| Finding::Data(self.lexer.slice(start, end).to_string()))
    }

    /// Children are exhausted: match an end tag, recover, or flush the tail.
    fn end_of_children(&mut self) -> Option<Finding> {
        let mark = self.lexer.mark();
        let close = self.end_tag();
        self.state = State::Content;

        match close {
            Some(name) if self.open.last() == Some(&name) => {
                let _ = self.open.pop();
                Some(Finding::ElementEnd(name))
            }
            _ => {
                self.lexer.reset(mark);
                match self.open.pop() {
                    Some(unclosed) => Some(Finding::MissingEnd(unclosed)),
                    None => self.tail(),
                }
            }
        }
    }

    /// Emit whatever input remains, once, and stop.
    fn tail(&mut self) -> Option<Finding> {
        self.state = State::Done;
        let rest = self.lexer.rest();
        self.lexer.finish();
        (!rest.is_empty()).then(|| Finding::Tail(rest.to_string()))
    }

    // ===== productions =====

    /// `'<' qualified-name`
    fn element_start(&mut self) -> Option<QualifiedName> {
        let mark = self.lexer.mark();
        if self.lexer.eat(HtmlTokenKind::TagOpen).is_none() {
            return None;
        }
        self.qualified_name().or_else(|| self.backtrack(mark))
    }

    /// `'</' qualified-name (anything but '<')* '>'`
    fn end_tag(&mut self) -> Option<QualifiedName> {
        let mark = self.lexer.mark();
        if self.lexer.eat(HtmlTokenKind::EndTagOpen).is_none() {
            return None;
        }
        let Some(name) = self.qualified_name() else {
            return self.backtrack(mark);
        };
        while let Some(token) = self.lexer.current() {
            match token.kind {
                HtmlTokenKind::TagClose => {
                    self.lexer.advance();
                    return Some(name);
                }
                HtmlTokenKind::TagOpen
                | HtmlTokenKind::EndTagOpen
                | HtmlTokenKind::CommentOpen
                | HtmlTokenKind::CdataOpen
                | HtmlTokenKind::DeclarationOpen
                | HtmlTokenKind::InstructionOpen => break,
                _ => self.lexer.advance(),
            }
        }
        self.backtrack(mark)
    }

    /// `name (':' name)?`, folded per the case policy.
    fn qualified_name(&mut self) -> Option<QualifiedName> {
        let mark = self.lexer.mark();
        let first = self.lexer.eat(HtmlTokenKind::Text)?;
        if !is_name_start(first.text) {
            return self.backtrack(mark);
        }
        let case = self.options.case;

        if self.lexer.eat(HtmlTokenKind::Colon).is_none() {
            return Some(QualifiedName::local(case.apply(first.text)));
        }
        match self.lexer.eat(HtmlTokenKind::Text) {
            Some(second) => Some(QualifiedName::prefixed(
                case.apply(first.text),
                case.apply(second.text),
            )),
            None => self.backtrack(mark),
        }
    }

    /// `name (ws? '=' ws? value)?`
    fn attribute(&mut self) -> Option<Finding> {
        let mark = self.lexer.mark();
        let Some(name) = self.attribute_name() else {
            return self.backtrack(mark);
        };

        let before_equals = self.lexer.mark();
        self.skip_whitespace();
        if self.lexer.eat(HtmlTokenKind::Equals).is_none() {
            self.lexer.reset(before_equals);
            return Some(Finding::Attribute { name, value: None });
        }
        self.skip_whitespace();

        match self.attribute_value() {
            Some(value) => Some(Finding::Attribute {
                name,
                value: Some(value),
            }),
            None => self.backtrack(mark),
        }
    }

    /// Attribute names are any text token, optionally namespaced.
    fn attribute_name(&mut self) -> Option<QualifiedName> {
        let first = self.lexer.eat(HtmlTokenKind::Text)?;
        let case = self.options.case;
        let after_first = self.lexer.mark();
        if self.lexer.eat(HtmlTokenKind::Colon).is_some() {
            if let Some(second) = self.lexer.eat(HtmlTokenKind::Text) {
                return Some(QualifiedName::prefixed(
                    case.apply(first.text),
                    case.apply(second.text),
                ));
            }
            self.lexer.reset(after_first);
        }
        Some(QualifiedName::local(case.apply(first.text)))
    }

    fn attribute_value(&mut self) -> Option<String> {
        let token = self.lexer.current()?;
        match token.kind.quote_char() {
            Some(quote) => self.quoted_value(token.kind, quote),
            None => Some(self.unquoted_value()),
        }
    }

    /// A quoted value. Only the quote character itself can be escaped.
    fn quoted_value(&mut self, kind: HtmlTokenKind, quote: char) -> Option<String> {
        let mark = self.lexer.mark();
        self.lexer.advance();
        let mut value = String::new();

        loop {
            let Some(token) = self.lexer.current() else {
                return self.backtrack(mark);
            };
            self.lexer.advance();
            if token.kind == kind {
                return Some(value);
            }
            if token.kind == HtmlTokenKind::Escape && self.lexer.eat(kind).is_some() {
                value.push(quote);
            } else {
                value.push_str(token.text);
            }
        }
    }

    /// An unquoted value runs until whitespace, `>` or `/>`.
    fn unquoted_value(&mut self) -> String {
        let start = self.lexer.offset();
        while let Some(token) = self.lexer.current() {
            if matches!(
                token.kind,
                HtmlTokenKind::Whitespace | HtmlTokenKind::TagClose | HtmlTokenKind::SelfClose
            ) {
                break;
            }
            self.lexer.advance();
        }
        let end = self.lexer.offset();
        self.lexer.slice(start, end).to_string()
    }

    /// `open (anything)* (close | end of input)`, returning the body.
    fn enclosed(&mut self, open: HtmlTokenKind, close: HtmlTokenKind) -> Option<&'a str> {
        if self.lexer.eat(open).is_none() {
            return None;
        }
        let start = self.lexer.offset();
        while let Some(token) = self.lexer.current() {
            if token.kind == close {
                self.lexer.advance();
                return Some(self.lexer.slice(start, token.offset));
            }
            self.lexer.advance();
        }
        Some(self.lexer.slice(start, self.lexer.input().len()))
    }

    /// Character data up to the next markup.
    ///
    /// The first token is taken unconditionally (every markup production has
    /// already failed here) unless it is a well-formed end tag, which belongs
    /// to [`Self::end_of_children`].
    fn data(&mut self) -> Option<&'a str> {
        let first = self.lexer.current()?;
        if first.kind == HtmlTokenKind::EndTagOpen {
            let mark = self.lexer.mark();
            let is_end_tag = self.end_tag().is_some();
            self.lexer.reset(mark);
            if is_end_tag {
                return None;
            }
        }

        let start = first.offset;
        self.lexer.advance();
        while self.lexer.current().is_some() && !self.starts_markup() {
            self.lexer.advance();
        }
        let end = self.lexer.offset();
        Some(self.lexer.slice(start, end))
    }

    /// Whether the cursor token could begin a markup production.
    fn starts_markup(&mut self) -> bool {
        let Some(token) = self.lexer.current() else {
            return false;
        };
        match token.kind {
            HtmlTokenKind::TagOpen | HtmlTokenKind::EndTagOpen => self
                .lexer
                .peek(1)
                .is_some_and(|next| next.kind == HtmlTokenKind::Text && is_name_start(next.text)),
            HtmlTokenKind::CommentOpen
            | HtmlTokenKind::CdataOpen
            | HtmlTokenKind::DeclarationOpen
            | HtmlTokenKind::InstructionOpen => true,
            _ => false,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.lexer.eat(HtmlTokenKind::Whitespace).is_some() {}
    }

    /// Rewind to `mark` and report the attempt as failed.
    fn backtrack<T>(&mut self, mark: Mark) -> Option<T> {
        self.lexer.reset(mark);
        None
    }
}

impl Iterator for HtmlParser<'_> {
    type Item = Finding;

    fn next(&mut self) -> Option<Finding> {
        loop {
            let found = match std::mem::replace(&mut self.state, State::Done) {
                State::Done => return None,
                State::Content => self.content(),
                State::StartTag(name) => self.start_tag(name),
                State::RawText(name) => self.raw_text(&name),
            };
            if found.is_some() || self.state == State::Done {
                return found;
            }
        }
    }
}

/// Tag names start with a letter or underscore.
fn is_name_start(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
}
