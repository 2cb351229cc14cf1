//! Compiled selectors.
//!
//! A [`Selector`] is a list of alternative chains. Each chain is the
//! sequence of [`SelectorFinding`]s between two `,` separators, compiled
//! into walk steps (see the `step` module). A chain matches from a start
//! node when walking all of its steps yields at least one node.

mod step;

use regex::Regex;
use sieve_common::CaseMode;
use sieve_dom::{DomTree, NodeId};
use thiserror::Error;

use crate::parser::{
    AttrOp, AttributeTest, Failure, PseudoClass, SelectorFinding, SelectorParser,
};
use step::{AttributeMatcher, Filter, Pseudo, Step, ValueTest, walk_chain};

pub(crate) use step::Walk;

/// Why selector text could not be compiled.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// The parser stopped before the end of the input.
    #[error("selector did not fully parse, remaining {remainder:?}")]
    Syntax {
        /// The unparsed input, verbatim.
        remainder: String,
        /// The furthest failed attempt, when the parser recorded one.
        failure: Option<Failure>,
    },

    /// A `/=` operand is not a valid regular expression.
    #[error("invalid pattern {pattern:?} in attribute selector")]
    Pattern {
        /// The operand as written.
        pattern: String,
        /// The regex compile error.
        #[source]
        source: regex::Error,
    },

    /// The findings do not form a selector. Never caused by parsed text.
    #[error("malformed selector findings: {0}")]
    Findings(String),
}

/// Where the next finding may go within a compound selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Nothing yet; a namespace, type or additional step may follow.
    Start,
    /// After `ns|`; a type selector may still follow.
    AfterNamespace,
    /// Only additional steps, a combinator or `,` may follow.
    InCompound,
}

/// A compiled selector, ready to run against any [`DomTree`].
#[derive(Debug, Clone)]
pub struct Selector {
    chains: Vec<Vec<Step>>,
    case: CaseMode,
}

impl Selector {
    /// Compile selector text, folding names to lowercase.
    ///
    /// # Errors
    ///
    /// See [`Selector::parse_with`].
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        Self::parse_with(text, CaseMode::Fold)
    }

    /// Compile selector text with an explicit case policy.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Syntax`] if any input is left unparsed and
    /// [`SelectorError::Pattern`] if a `/=` operand is not a valid regex.
    pub fn parse_with(text: &str, case: CaseMode) -> Result<Self, SelectorError> {
        let mut parser = SelectorParser::with_case(text, case);
        let mut findings = Vec::new();
        while let Some(finding) = parser.next() {
            if let SelectorFinding::Tail(remainder) = finding {
                return Err(SelectorError::Syntax {
                    remainder,
                    failure: parser.last_failure().copied(),
                });
            }
            findings.push(finding);
        }
        Self::from_findings(findings, case)
    }

    /// Compile an already parsed finding sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Syntax`] for a [`SelectorFinding::Tail`],
    /// [`SelectorError::Findings`] when the order of findings is impossible
    /// (for example a combinator with nothing on its left) and
    /// [`SelectorError::Pattern`] for an invalid `/=` operand.
    pub fn from_findings(
        findings: Vec<SelectorFinding>,
        case: CaseMode,
    ) -> Result<Self, SelectorError> {
        let mut chains = Vec::new();
        let mut chain = Vec::new();
        let mut slot = Slot::Start;

        for finding in findings {
            match finding {
                SelectorFinding::Namespace(namespace) => {
                    if slot != Slot::Start {
                        return Err(misplaced("namespace"));
                    }
                    chain.push(Step::Filter(Filter::Namespace(namespace)));
                    slot = Slot::AfterNamespace;
                }
                SelectorFinding::Element(tag) => {
                    if slot == Slot::InCompound {
                        return Err(misplaced("element"));
                    }
                    chain.push(Step::Filter(Filter::Element(tag)));
                    slot = Slot::InCompound;
                }
                SelectorFinding::Attribute(test) => {
                    chain.push(Step::Filter(Filter::Attribute(compile_attribute(test)?)));
                    slot = Slot::InCompound;
                }
                SelectorFinding::Pseudo(class) => {
                    chain.push(Step::Filter(Filter::Pseudo(compile_pseudo(class, case)?)));
                    slot = Slot::InCompound;
                }
                SelectorFinding::Parent => {
                    chain.push(Step::Parent);
                    slot = Slot::InCompound;
                }
                SelectorFinding::Combinator(combinator) => {
                    if slot == Slot::Start {
                        return Err(misplaced("combinator"));
                    }
                    chain.push(Step::Combinator(combinator));
                    slot = Slot::Start;
                }
                SelectorFinding::Alternative => {
                    if slot == Slot::Start {
                        return Err(misplaced("alternative"));
                    }
                    chains.push(std::mem::take(&mut chain));
                    slot = Slot::Start;
                }
                SelectorFinding::Tail(remainder) => {
                    return Err(SelectorError::Syntax {
                        remainder,
                        failure: None,
                    });
                }
            }
        }

        if slot == Slot::Start {
            return Err(SelectorError::Findings(
                "selector ends where a compound selector is required".to_string(),
            ));
        }
        chains.push(chain);
        Ok(Self { chains, case })
    }

    /// The case policy names are compared with.
    #[must_use]
    pub const fn case(&self) -> CaseMode {
        self.case
    }

    /// Number of `,`-separated alternatives.
    #[must_use]
    pub fn alternatives(&self) -> usize {
        self.chains.len()
    }

    /// Whether any alternative matches starting from `node`.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.walk_from(tree, node).next().is_some()
    }

    /// Every node reached by every alternative from `start`. May repeat.
    pub(crate) fn walk_from<'t>(&'t self, tree: &'t DomTree, start: NodeId) -> Walk<'t> {
        let case = self.case;
        Box::new(
            self.chains
                .iter()
                .flat_map(move |chain| walk_chain(chain, tree, start, case)),
        )
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(text: &str) -> Result<Self, SelectorError> {
        Self::parse(text)
    }
}

fn misplaced(what: &str) -> SelectorError {
    SelectorError::Findings(format!("{what} finding in an invalid position"))
}

fn compile_attribute(test: AttributeTest) -> Result<AttributeMatcher, SelectorError> {
    let value_test = match test.value {
        None => None,
        Some((AttrOp::Matches, pattern)) => match Regex::new(&pattern) {
            Ok(regex) => Some(ValueTest::Pattern(regex)),
            Err(source) => return Err(SelectorError::Pattern { pattern, source }),
        },
        Some((op, value)) => Some(ValueTest::Compare(op, value)),
    };
    Ok(AttributeMatcher {
        namespace: test.namespace,
        name: test.name,
        test: value_test,
    })
}

fn compile_pseudo(class: PseudoClass, case: CaseMode) -> Result<Pseudo, SelectorError> {
    let nth = |nth, of_type, from_end| Pseudo::Nth {
        nth,
        of_type,
        from_end,
    };
    let pseudo = match class {
        PseudoClass::Root => Pseudo::Root,
        PseudoClass::FirstChild => Pseudo::FirstChild,
        PseudoClass::LastChild => Pseudo::LastChild,
        PseudoClass::FirstOfType => Pseudo::FirstOfType,
        PseudoClass::LastOfType => Pseudo::LastOfType,
        PseudoClass::OnlyChild => Pseudo::OnlyChild,
        PseudoClass::OnlyOfType => Pseudo::OnlyOfType,
        PseudoClass::Empty => Pseudo::Empty,
        PseudoClass::OnlyText => Pseudo::OnlyText,
        PseudoClass::NthChild(sequence) => nth(sequence, false, false),
        PseudoClass::NthLastChild(sequence) => nth(sequence, false, true),
        PseudoClass::NthOfType(sequence) => nth(sequence, true, false),
        PseudoClass::NthLastOfType(sequence) => nth(sequence, true, true),
        PseudoClass::Not(inner) => Pseudo::Not(Selector::from_findings(inner, case)?),
        PseudoClass::Eps(inner) => Pseudo::Eps(Selector::from_findings(inner, case)?),
    };
    Ok(pseudo)
}
