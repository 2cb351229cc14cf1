//! The walk contract.
//!
//! Every compiled unit maps one context node to a lazy sequence of nodes.
//! Filters yield the node itself or nothing; combinators and the parent
//! step yield the nodes they reach. A chain is the left-to-right
//! composition of its units, so a chain matches from a start node when the
//! composed sequence is non-empty.

use std::iter;

use regex::Regex;
use sieve_common::CaseMode;
use sieve_dom::{DomTree, ElementData, NodeId, NodeType};

use super::Selector;
use crate::parser::{AttrOp, Combinator, NameMatch, Nth};

/// Lazily produced candidate nodes.
pub(crate) type Walk<'t> = Box<dyn Iterator<Item = NodeId> + 't>;

/// One compiled unit of a selector chain.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    /// Keep the node if it satisfies the predicate.
    Filter(Filter),
    /// Move to related nodes.
    Combinator(Combinator),
    /// Move to the parent.
    Parent,
}

/// Predicates on a single node. All of them reject non-elements.
#[derive(Debug, Clone)]
pub(crate) enum Filter {
    Namespace(NameMatch),
    Element(NameMatch),
    Attribute(AttributeMatcher),
    Pseudo(Pseudo),
}

#[derive(Debug, Clone)]
pub(crate) struct AttributeMatcher {
    pub(crate) namespace: Option<NameMatch>,
    pub(crate) name: String,
    pub(crate) test: Option<ValueTest>,
}

#[derive(Debug, Clone)]
pub(crate) enum ValueTest {
    Compare(AttrOp, String),
    Pattern(Regex),
}

/// Compiled pseudo-classes. The four `nth-*` forms share one variant.
#[derive(Debug, Clone)]
pub(crate) enum Pseudo {
    Root,
    FirstChild,
    LastChild,
    FirstOfType,
    LastOfType,
    OnlyChild,
    OnlyOfType,
    Empty,
    OnlyText,
    Nth {
        nth: Nth,
        of_type: bool,
        from_end: bool,
    },
    Not(Selector),
    Eps(Selector),
}

impl Step {
    pub(crate) fn walk<'t>(&'t self, tree: &'t DomTree, node: NodeId, case: CaseMode) -> Walk<'t> {
        match self {
            Self::Filter(filter) => {
                Box::new(filter.accepts(tree, node, case).then_some(node).into_iter())
            }
            Self::Parent => Box::new(tree.parent(node).into_iter()),
            Self::Combinator(combinator) => match combinator {
                Combinator::Descendant => Box::new(tree.descendants(node)),
                Combinator::Child => Box::new(tree.children(node).iter().copied()),
                Combinator::Neighbour => Box::new(
                    tree.following_siblings(node)
                        .find(|&sibling| tree.is_element(sibling))
                        .into_iter(),
                ),
                Combinator::Follower => Box::new(
                    tree.following_siblings(node)
                        .filter(move |&sibling| tree.is_element(sibling)),
                ),
                Combinator::ReverseNeighbour => Box::new(
                    tree.preceding_siblings(node)
                        .find(|&sibling| tree.is_element(sibling))
                        .into_iter(),
                ),
                Combinator::Predecessor => Box::new(
                    tree.preceding_siblings(node)
                        .filter(move |&sibling| tree.is_element(sibling)),
                ),
            },
        }
    }
}

/// Compose a chain's units starting from `start`.
pub(crate) fn walk_chain<'t>(
    steps: &'t [Step],
    tree: &'t DomTree,
    start: NodeId,
    case: CaseMode,
) -> Walk<'t> {
    let seed: Walk<'t> = Box::new(iter::once(start));
    steps.iter().fold(seed, |candidates, step| -> Walk<'t> {
        Box::new(candidates.flat_map(move |node| step.walk(tree, node, case)))
    })
}

impl Filter {
    fn accepts(&self, tree: &DomTree, node: NodeId, case: CaseMode) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };
        match self {
            Self::Namespace(namespace) => match namespace {
                NameMatch::Any => true,
                NameMatch::Named(name) => element
                    .namespace
                    .as_deref()
                    .is_some_and(|ns| case.names_equal(ns, name)),
            },
            // An unprefixed type selector ignores the element's namespace.
            Self::Element(tag) => match tag {
                NameMatch::Any => true,
                NameMatch::Named(name) => case.names_equal(&element.tag_name, name),
            },
            Self::Attribute(matcher) => matcher.matches(element, case),
            Self::Pseudo(pseudo) => pseudo.matches(tree, node, element, case),
        }
    }
}

impl AttributeMatcher {
    /// Tests the first attribute with a matching name.
    fn matches(&self, element: &ElementData, case: CaseMode) -> bool {
        let found = element.attrs.iter().find(|attr| {
            case.names_equal(&attr.name, &self.name)
                && match &self.namespace {
                    None | Some(NameMatch::Any) => true,
                    Some(NameMatch::Named(ns)) => attr
                        .namespace
                        .as_deref()
                        .is_some_and(|attr_ns| case.names_equal(attr_ns, ns)),
                }
        });
        let Some(attr) = found else {
            return false;
        };

        let Some(test) = &self.test else {
            return true;
        };
        // A bare attribute only satisfies the existence test.
        let Some(value) = attr.value.as_deref() else {
            return false;
        };
        match test {
            ValueTest::Pattern(regex) => regex.is_match(value),
            ValueTest::Compare(op, expected) => compare(*op, value, expected),
        }
    }
}

fn compare(op: AttrOp, value: &str, expected: &str) -> bool {
    match op {
        AttrOp::Equals => value == expected,
        AttrOp::Includes => value.split_ascii_whitespace().any(|word| word == expected),
        AttrOp::BeginsWith => value.starts_with(expected),
        AttrOp::EndsWith => value.ends_with(expected),
        AttrOp::Contains => value.contains(expected),
        AttrOp::DashMatch => {
            value == expected
                || value
                    .strip_prefix(expected)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        // Compiled into `ValueTest::Pattern`.
        AttrOp::Matches => false,
    }
}

impl Pseudo {
    fn matches(&self, tree: &DomTree, node: NodeId, element: &ElementData, case: CaseMode) -> bool {
        match self {
            Self::Root => tree.parent(node) == Some(NodeId::ROOT),
            Self::FirstChild => position(tree, node, None, false) == Some(1),
            Self::LastChild => position(tree, node, None, true) == Some(1),
            Self::FirstOfType => position(tree, node, Some((element, case)), false) == Some(1),
            Self::LastOfType => position(tree, node, Some((element, case)), true) == Some(1),
            Self::OnlyChild => sibling_count(tree, node, None) == 1,
            Self::OnlyOfType => sibling_count(tree, node, Some((element, case))) == 1,
            Self::Empty => tree.children(node).iter().all(|&child| {
                match tree.get(child).map(|n| &n.node_type) {
                    Some(NodeType::Element(_)) => false,
                    Some(NodeType::Data(data)) => data.value.trim().is_empty(),
                    _ => true,
                }
            }),
            Self::OnlyText => {
                let children = tree.children(node);
                !children.is_empty() && children.iter().all(|&child| tree.as_data(child).is_some())
            }
            Self::Nth {
                nth,
                of_type,
                from_end,
            } => {
                let kind = of_type.then_some((element, case));
                position(tree, node, kind, *from_end)
                    .and_then(|pos| i64::try_from(pos).ok())
                    .is_some_and(|pos| nth.matches(pos))
            }
            Self::Not(inner) => !inner.matches(tree, node),
            Self::Eps(inner) => inner.matches(tree, node),
        }
    }
}

/// Element siblings of `node` including itself, optionally of the same type.
fn siblings<'t>(
    tree: &'t DomTree,
    node: NodeId,
    kind: Option<(&'t ElementData, CaseMode)>,
) -> impl DoubleEndedIterator<Item = NodeId> + 't {
    let parent_children = tree.parent(node).map_or(&[][..], |parent| tree.children(parent));
    parent_children.iter().copied().filter(move |&sibling| {
        tree.as_element(sibling).is_some_and(|candidate| match kind {
            None => true,
            Some((element, case)) => same_type(candidate, element, case),
        })
    })
}

/// 1-based position among qualifying siblings, counted from either end.
fn position(
    tree: &DomTree,
    node: NodeId,
    kind: Option<(&ElementData, CaseMode)>,
    from_end: bool,
) -> Option<usize> {
    let index = if from_end {
        siblings(tree, node, kind).rev().position(|id| id == node)
    } else {
        siblings(tree, node, kind).position(|id| id == node)
    };
    index.map(|i| i + 1)
}

fn sibling_count(tree: &DomTree, node: NodeId, kind: Option<(&ElementData, CaseMode)>) -> usize {
    siblings(tree, node, kind).count()
}

fn same_type(left: &ElementData, right: &ElementData, case: CaseMode) -> bool {
    case.names_equal(&left.tag_name, &right.tag_name)
        && match (&left.namespace, &right.namespace) {
            (None, None) => true,
            (Some(a), Some(b)) => case.names_equal(a, b),
            _ => false,
        }
}
