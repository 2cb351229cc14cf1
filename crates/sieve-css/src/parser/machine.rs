use core::fmt;

use sieve_common::{CaseMode, Mark};
use strum_macros::Display;

use super::finding::{
    AttrOp, AttributeTest, Combinator, NameMatch, PseudoClass, PseudoName, SelectorFinding,
};
use super::nth::Nth;
use crate::tokenizer::{CssLexer, CssTokenKind};

/// The grammar rule a failed parse attempt was working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Rule {
    /// A compound selector was required but none started here.
    Compound,
    /// `[ ... ]`
    Attribute,
    /// A quoted or bare attribute value.
    AttributeValue,
    /// `#id`
    Id,
    /// `.class`
    Class,
    /// `:name`, with an unknown or misplaced name.
    Pseudo,
    /// The `(an+b)` argument of an `nth-*` pseudo-class.
    NthArgument,
    /// The selector argument of `:not` or `:eps`.
    NestedSelector,
    /// A combinator, or its right-hand selector.
    Combinator,
    /// The end of the selector.
    End,
}

/// Diagnostic for the failed attempt that got furthest into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    /// What was being parsed.
    pub rule: Rule,
    /// Byte offset where the attempt stopped.
    pub offset: usize,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse {} at offset {}", self.rule, self.offset)
    }
}

/// Position within the selector grammar between findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// A compound selector must start here.
    Compound,
    /// After `ns|`: an optional type selector.
    AfterNamespace,
    /// Inside a compound: more attribute, pseudo or parent steps.
    Additional,
    /// A compound ended: combinator, `,` or the end.
    AfterCompound,
    /// Nothing more to report.
    Done,
}

/// A pull-based selector parser.
///
/// Each call to [`Iterator::next`] resumes where the previous finding was
/// produced. Every sub-rule takes a lexer mark and rewinds on failure, so a
/// failed attempt never leaves a partial finding behind. When nothing
/// applies, the rest of the input is reported as [`SelectorFinding::Tail`].
///
/// `:not(...)` and `:eps(...)` arguments are parsed by running the same
/// machine one level deeper, where a `)` ends the selector instead of the
/// end of input.
#[derive(Debug)]
pub struct SelectorParser<'a> {
    lexer: CssLexer<'a>,
    case: CaseMode,
    phase: Phase,
    depth: usize,
    failure: Option<Failure>,
}

impl<'a> SelectorParser<'a> {
    /// Create a parser that folds names to lowercase.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self::with_case(input, CaseMode::Fold)
    }

    /// Create a parser with an explicit case policy.
    #[must_use]
    pub const fn with_case(input: &'a str, case: CaseMode) -> Self {
        Self {
            lexer: CssLexer::new(input),
            case,
            phase: Phase::Compound,
            depth: 0,
            failure: None,
        }
    }

    /// The failed attempt that got furthest, if any attempt failed.
    #[must_use]
    pub const fn last_failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Byte offset of the next unconsumed input.
    pub fn offset(&mut self) -> usize {
        self.lexer.offset()
    }

    fn step(&mut self) -> Option<SelectorFinding> {
        loop {
            let found = match self.phase {
                Phase::Done => return None,
                Phase::Compound => self.compound_start(),
                Phase::AfterNamespace => self.after_namespace(),
                Phase::Additional => self.more_additional(),
                Phase::AfterCompound => self.after_compound(),
            };
            if found.is_some() || self.phase == Phase::Done {
                return found;
            }
        }
    }

    // ===== phases =====

    fn compound_start(&mut self) -> Option<SelectorFinding> {
        let _ = self.skip_whitespace();

        if let Some(namespace) = self.namespace() {
            self.phase = Phase::AfterNamespace;
            return Some(SelectorFinding::Namespace(namespace));
        }
        if let Some(element) = self.name_or_star() {
            self.phase = Phase::Additional;
            return Some(SelectorFinding::Element(element));
        }
        if let Some(additional) = self.additional() {
            self.phase = Phase::Additional;
            return Some(additional);
        }

        let offset = self.lexer.offset();
        self.record(Rule::Compound, offset);
        self.tail()
    }

    fn after_namespace(&mut self) -> Option<SelectorFinding> {
        self.phase = Phase::Additional;
        self.name_or_star().map(SelectorFinding::Element)
    }

    fn more_additional(&mut self) -> Option<SelectorFinding> {
        let found = self.additional();
        if found.is_none() {
            self.phase = Phase::AfterCompound;
        }
        found
    }

    fn after_compound(&mut self) -> Option<SelectorFinding> {
        if let Some(combinator) = self.combinator() {
            self.phase = Phase::Compound;
            return Some(SelectorFinding::Combinator(combinator));
        }

        let mark = self.lexer.mark();
        let _ = self.skip_whitespace();
        if self.lexer.eat(CssTokenKind::Comma).is_some() {
            self.phase = Phase::Compound;
            return Some(SelectorFinding::Alternative);
        }
        if self.lexer.is_at_end() || (self.depth > 0 && self.lexer.at(CssTokenKind::CloseParen)) {
            self.phase = Phase::Done;
            return None;
        }

        let offset = self.lexer.offset();
        self.record(Rule::End, offset);
        self.lexer.reset(mark);
        self.tail()
    }

    /// Report the remaining input and stop.
    fn tail(&mut self) -> Option<SelectorFinding> {
        self.phase = Phase::Done;
        let rest = self.lexer.rest();
        self.lexer.finish();
        Some(SelectorFinding::Tail(rest.to_string()))
    }

    // ===== compound parts =====

    /// `(name | '*') '|'`
    fn namespace(&mut self) -> Option<NameMatch> {
        let mark = self.lexer.mark();
        let name = self.name_or_star()?;
        if self.lexer.eat(CssTokenKind::Pipe).is_some() {
            return Some(name);
        }
        self.backtrack(mark)
    }

    /// An identifier or `*`.
    fn name_or_star(&mut self) -> Option<NameMatch> {
        let token = self.lexer.current()?;
        let name = match token.kind {
            CssTokenKind::Star => NameMatch::Any,
            CssTokenKind::Text if is_ident(token.text) => {
                NameMatch::Named(self.case.apply(token.text))
            }
            _ => return None,
        };
        self.lexer.advance();
        Some(name)
    }

    /// `parent | id | class | attribute | pseudo`
    fn additional(&mut self) -> Option<SelectorFinding> {
        if self.lexer.eat(CssTokenKind::DoubleDot).is_some() {
            return Some(SelectorFinding::Parent);
        }
        self.shorthand(CssTokenKind::Hash, "id", AttrOp::Equals, Rule::Id)
            .or_else(|| self.shorthand(CssTokenKind::Dot, "class", AttrOp::Includes, Rule::Class))
            .map(SelectorFinding::Attribute)
            .or_else(|| self.attribute().map(SelectorFinding::Attribute))
            .or_else(|| self.pseudo().map(SelectorFinding::Pseudo))
    }

    /// `#text` or `.text`, sugar for an attribute test.
    fn shorthand(
        &mut self,
        sigil: CssTokenKind,
        name: &str,
        op: AttrOp,
        rule: Rule,
    ) -> Option<AttributeTest> {
        let mark = self.lexer.mark();
        if self.lexer.eat(sigil).is_none() {
            return None;
        }
        match self.lexer.eat(CssTokenKind::Text) {
            Some(value) => Some(AttributeTest::compare(name, op, value.text)),
            None => self.fail(rule, mark),
        }
    }

    /// `'[' ws? (ns '|')? name ws? (op ws? value ws?)? ']'`
    fn attribute(&mut self) -> Option<AttributeTest> {
        let mark = self.lexer.mark();
        if self.lexer.eat(CssTokenKind::OpenBracket).is_none() {
            return None;
        }
        let _ = self.skip_whitespace();

        let namespace = self.attribute_namespace();
        let Some(name) = self.lexer.eat(CssTokenKind::Text) else {
            return self.fail(Rule::Attribute, mark);
        };
        let _ = self.skip_whitespace();

        let value = match self.attribute_operator() {
            Some(op) => {
                let _ = self.skip_whitespace();
                let Some(value) = self.attribute_value() else {
                    return self.fail(Rule::AttributeValue, mark);
                };
                let _ = self.skip_whitespace();
                Some((op, value))
            }
            None => None,
        };

        if self.lexer.eat(CssTokenKind::CloseBracket).is_none() {
            return self.fail(Rule::Attribute, mark);
        }
        Some(AttributeTest {
            namespace,
            name: self.case.apply(name.text),
            value,
        })
    }

    /// `ns|` inside brackets, only when an attribute name follows.
    fn attribute_namespace(&mut self) -> Option<NameMatch> {
        let mark = self.lexer.mark();
        let namespace = self.namespace()?;
        if self.lexer.at(CssTokenKind::Text) {
            return Some(namespace);
        }
        self.backtrack(mark)
    }

    fn attribute_operator(&mut self) -> Option<AttrOp> {
        let op = match self.lexer.current()?.kind {
            CssTokenKind::Equals => AttrOp::Equals,
            CssTokenKind::Includes => AttrOp::Includes,
            CssTokenKind::BeginsWith => AttrOp::BeginsWith,
            CssTokenKind::EndsWith => AttrOp::EndsWith,
            CssTokenKind::Contains => AttrOp::Contains,
            CssTokenKind::DashMatch => AttrOp::DashMatch,
            CssTokenKind::RegexMatch => AttrOp::Matches,
            _ => return None,
        };
        self.lexer.advance();
        Some(op)
    }

    /// A quoted value, or a bare run up to whitespace or `]`.
    fn attribute_value(&mut self) -> Option<String> {
        let token = self.lexer.current()?;
        if let Some(quote) = token.kind.quote_char() {
            return self.quoted_value(token.kind, quote);
        }

        let start = token.offset;
        while let Some(token) = self.lexer.current() {
            if matches!(
                token.kind,
                CssTokenKind::Whitespace
                    | CssTokenKind::CloseBracket
                    | CssTokenKind::DoubleQuote
                    | CssTokenKind::SingleQuote
            ) {
                break;
            }
            self.lexer.advance();
        }
        let end = self.lexer.offset();
        (end > start).then(|| self.lexer.slice(start, end).to_string())
    }

    /// Only the quote character itself can be escaped.
    fn quoted_value(&mut self, kind: CssTokenKind, quote: char) -> Option<String> {
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
            if token.kind == CssTokenKind::Escape && self.lexer.eat(kind).is_some() {
                value.push(quote);
            } else {
                value.push_str(token.text);
            }
        }
    }

    /// `':' name ('(' argument ')')?` for the accepted names.
    fn pseudo(&mut self) -> Option<PseudoClass> {
        let mark = self.lexer.mark();
        if self.lexer.eat(CssTokenKind::Colon).is_none() {
            return None;
        }
        let Some(name) = self
            .lexer
            .eat(CssTokenKind::Text)
            .and_then(|token| token.text.to_ascii_lowercase().parse::<PseudoName>().ok())
        else {
            return self.fail(Rule::Pseudo, mark);
        };

        let class = match name {
            PseudoName::Root => PseudoClass::Root,
            PseudoName::FirstChild => PseudoClass::FirstChild,
            PseudoName::LastChild => PseudoClass::LastChild,
            PseudoName::FirstOfType => PseudoClass::FirstOfType,
            PseudoName::LastOfType => PseudoClass::LastOfType,
            PseudoName::OnlyChild => PseudoClass::OnlyChild,
            PseudoName::OnlyOfType => PseudoClass::OnlyOfType,
            PseudoName::Empty => PseudoClass::Empty,
            PseudoName::OnlyText => PseudoClass::OnlyText,
            PseudoName::NthChild => PseudoClass::NthChild(self.nth_argument(mark)?),
            PseudoName::NthLastChild => PseudoClass::NthLastChild(self.nth_argument(mark)?),
            PseudoName::NthOfType => PseudoClass::NthOfType(self.nth_argument(mark)?),
            PseudoName::NthLastOfType => PseudoClass::NthLastOfType(self.nth_argument(mark)?),
            PseudoName::Not => PseudoClass::Not(self.nested_argument(mark)?),
            PseudoName::Eps => PseudoClass::Eps(self.nested_argument(mark)?),
        };
        Some(class)
    }

    /// `'(' an+b ')'`. On failure rewinds to `mark`, before the colon.
    fn nth_argument(&mut self, mark: Mark) -> Option<Nth> {
        if self.lexer.eat(CssTokenKind::OpenParen).is_none() {
            return self.fail(Rule::NthArgument, mark);
        }
        let start = self.lexer.offset();
        while let Some(token) = self.lexer.current() {
            if token.kind == CssTokenKind::CloseParen {
                let raw = self.lexer.slice(start, token.offset);
                self.lexer.advance();
                if let Some(nth) = Nth::parse(raw) {
                    return Some(nth);
                }
                break;
            }
            self.lexer.advance();
        }
        self.fail(Rule::NthArgument, mark)
    }

    /// `'(' selector ')'`, collected by running the machine one level down.
    fn nested_argument(&mut self, mark: Mark) -> Option<Vec<SelectorFinding>> {
        if self.lexer.eat(CssTokenKind::OpenParen).is_none() {
            return self.fail(Rule::NestedSelector, mark);
        }

        let outer = self.phase;
        self.phase = Phase::Compound;
        self.depth += 1;

        let mut findings = Vec::new();
        let mut complete = true;
        while let Some(finding) = self.step() {
            if matches!(finding, SelectorFinding::Tail(_)) {
                complete = false;
                break;
            }
            findings.push(finding);
        }

        self.depth -= 1;
        self.phase = outer;

        if complete && self.lexer.eat(CssTokenKind::CloseParen).is_some() {
            return Some(findings);
        }
        self.fail(Rule::NestedSelector, mark)
    }

    // ===== combinators =====

    /// `ws? op ws? | ws`, only when another compound follows.
    fn combinator(&mut self) -> Option<Combinator> {
        let mark = self.lexer.mark();
        let spaced = self.skip_whitespace();

        let explicit = match self.lexer.current().map(|token| token.kind) {
            Some(CssTokenKind::Greater) => Some(Combinator::Child),
            Some(CssTokenKind::Plus) => Some(Combinator::Neighbour),
            Some(CssTokenKind::Tilde) => Some(Combinator::Follower),
            Some(CssTokenKind::Less) => Some(Combinator::ReverseNeighbour),
            Some(CssTokenKind::Percent) => Some(Combinator::Predecessor),
            _ => None,
        };

        let combinator = match explicit {
            Some(combinator) => {
                self.lexer.advance();
                let _ = self.skip_whitespace();
                if !self.starts_compound() {
                    return self.fail(Rule::Combinator, mark);
                }
                combinator
            }
            None if spaced && self.starts_compound() => Combinator::Descendant,
            None => return self.backtrack(mark),
        };
        Some(combinator)
    }

    /// Whether the cursor token can begin a compound selector.
    fn starts_compound(&mut self) -> bool {
        self.lexer.current().is_some_and(|token| match token.kind {
            CssTokenKind::Text => is_ident(token.text),
            CssTokenKind::Star
            | CssTokenKind::Dot
            | CssTokenKind::Hash
            | CssTokenKind::OpenBracket
            | CssTokenKind::Colon
            | CssTokenKind::DoubleDot => true,
            _ => false,
        })
    }

    // ===== helpers =====

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.lexer.eat(CssTokenKind::Whitespace).is_some() {
            skipped = true;
        }
        skipped
    }

    /// Remember a failure if it got at least as far as the last one.
    fn record(&mut self, rule: Rule, offset: usize) {
        if self.failure.is_none_or(|failure| offset >= failure.offset) {
            self.failure = Some(Failure { rule, offset });
        }
    }

    /// Record a failed attempt at the cursor, then rewind to `mark`.
    fn fail<T>(&mut self, rule: Rule, mark: Mark) -> Option<T> {
        let offset = self.lexer.offset();
        self.record(rule, offset);
        self.backtrack(mark)
    }

    fn backtrack<T>(&mut self, mark: Mark) -> Option<T> {
        self.lexer.reset(mark);
        None
    }
}

impl Iterator for SelectorParser<'_> {
    type Item = SelectorFinding;

    fn next(&mut self) -> Option<SelectorFinding> {
        self.step()
    }
}

/// Identifiers start with a letter, `_`, `-` or any non-ASCII character.
fn is_ident(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii())
}
