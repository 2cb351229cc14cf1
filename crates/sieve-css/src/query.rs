//! Running selectors against a tree.
//!
//! Every element of the searched subtree is tried as a start node for every
//! alternative. Results are elements only and never repeat.
//!
//! ```
//! use sieve_css::{Query, Selector};
//! use sieve_html::parse_document;
//!
//! let tree = parse_document("<ul><li>a</li><li class=x>b</li></ul>");
//! let selector = Selector::parse("li.x").unwrap();
//! assert_eq!(tree.select(&selector).len(), 1);
//! assert!((&tree % &selector).is_some());
//! ```

use std::collections::HashSet;
use std::iter;
use std::ops::{Div, Rem};

use sieve_dom::{DomTree, NodeId};

use crate::selector::{Selector, Walk};

/// Lazily produced matches, in discovery order.
pub struct Matches<'t> {
    found: Walk<'t>,
    seen: HashSet<NodeId>,
}

impl Iterator for Matches<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let id = self.found.next()?;
            if self.seen.insert(id) {
                return Some(id);
            }
        }
    }
}

impl Selector {
    /// Stream matches over the whole document.
    #[must_use]
    pub fn iter<'t>(&'t self, tree: &'t DomTree) -> Matches<'t> {
        self.iter_within(tree, NodeId::ROOT)
    }

    /// Stream matches whose start node is `scope` or one of its descendants.
    #[must_use]
    pub fn iter_within<'t>(&'t self, tree: &'t DomTree, scope: NodeId) -> Matches<'t> {
        let found = iter::once(scope)
            .chain(tree.descendants(scope))
            .flat_map(move |start| self.walk_from(tree, start))
            .filter(move |&id| tree.is_element(id));
        Matches {
            found: Box::new(found),
            seen: HashSet::new(),
        }
    }

    /// All matches in document order.
    #[must_use]
    pub fn select(&self, tree: &DomTree) -> Vec<NodeId> {
        self.select_within(tree, NodeId::ROOT)
    }

    /// All matches reached from `scope`, in document order.
    ///
    /// Matches can lie outside `scope` when the selector walks up or
    /// sideways (`..`, `<`, `%`).
    #[must_use]
    pub fn select_within(&self, tree: &DomTree, scope: NodeId) -> Vec<NodeId> {
        let found: HashSet<NodeId> = self.iter_within(tree, scope).collect();
        if found.is_empty() {
            return Vec::new();
        }
        iter::once(NodeId::ROOT)
            .chain(tree.descendants(NodeId::ROOT))
            .filter(|id| found.contains(id))
            .collect()
    }

    /// The first match in document order.
    #[must_use]
    pub fn select_first(&self, tree: &DomTree) -> Option<NodeId> {
        self.select(tree).first().copied()
    }

    /// Call `callback` for each match as it is found.
    pub fn each(&self, tree: &DomTree, mut callback: impl FnMut(NodeId)) {
        for id in self.iter(tree) {
            callback(id);
        }
    }
}

/// Query methods on the tree itself.
pub trait Query {
    /// See [`Selector::select`].
    fn select(&self, selector: &Selector) -> Vec<NodeId>;

    /// See [`Selector::select_first`].
    fn select_first(&self, selector: &Selector) -> Option<NodeId>;

    /// See [`Selector::each`].
    fn each(&self, selector: &Selector, callback: impl FnMut(NodeId));
}

impl Query for DomTree {
    fn select(&self, selector: &Selector) -> Vec<NodeId> {
        selector.select(self)
    }

    fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        selector.select_first(self)
    }

    fn each(&self, selector: &Selector, callback: impl FnMut(NodeId)) {
        selector.each(self, callback);
    }
}

/// `&tree / &selector`: every match in document order.
impl Div<&Selector> for &DomTree {
    type Output = Vec<NodeId>;

    fn div(self, selector: &Selector) -> Vec<NodeId> {
        selector.select(self)
    }
}

/// `&tree % &selector`: the first match, if any.
impl Rem<&Selector> for &DomTree {
    type Output = Option<NodeId>;

    fn rem(self, selector: &Selector) -> Option<NodeId> {
        selector.select_first(self)
    }
}
