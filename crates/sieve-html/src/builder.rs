use sieve_common::warning::warn_once;
use sieve_dom::{Attribute, DataNode, DomTree, ElementData, NodeId, NodeType};

use crate::parser::{Finding, QualifiedName};

/// Something the tree builder had to recover from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index of the finding that caused the issue.
    pub finding_index: usize,
    /// `true` when input was dropped, `false` when it was only reinterpreted.
    pub is_error: bool,
}

/// Builds a [`DomTree`] from a stream of findings.
///
/// Keeps a stack of open elements. Starts push, ends pop, everything else is
/// appended under the top of the stack (or the root when nothing is open).
/// Whatever is still open when the stream ends is closed implicitly, so the
/// tree is well formed for any input.
#[derive(Debug)]
pub struct TreeBuilder<I> {
    findings: I,
}

impl<I: Iterator<Item = Finding>> TreeBuilder<I> {
    /// Create a builder over a finding stream.
    #[must_use]
    pub const fn new(findings: I) -> Self {
        Self { findings }
    }

    /// Consume every finding and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Consume every finding and return the tree with recovery issues.
    #[must_use]
    pub fn run_with_issues(self) -> (DomTree, Vec<ParseIssue>) {
        let mut assembly = Assembly::default();
        for (index, finding) in self.findings.enumerate() {
            assembly.index = index;
            assembly.process(finding);
        }
        assembly.open.clear();
        (assembly.tree, assembly.issues)
    }
}

/// Mutable state of one build.
#[derive(Debug, Default)]
struct Assembly {
    tree: DomTree,
    open: Vec<NodeId>,
    issues: Vec<ParseIssue>,
    index: usize,
}

impl Assembly {
    fn process(&mut self, finding: Finding) {
        match finding {
            Finding::ElementStart(name) => {
                let mut element = ElementData::new(name.local);
                element.namespace = name.namespace;
                let id = self.append(NodeType::Element(element));
                self.open.push(id);
            }
            Finding::Attribute { name, value } => self.add_attribute(name, value),
            Finding::ElementEnd(_) => {
                let _ = self.open.pop();
            }
            Finding::MissingEnd(name) => {
                let _ = self.open.pop();
                self.issue(&format!("implicitly closed <{name}>"), false);
            }
            Finding::Data(text) => {
                let _ = self.append(NodeType::Data(DataNode::text(text)));
            }
            Finding::Cdata(text) => {
                let _ = self.append(NodeType::Data(DataNode::cdata(text)));
            }
            Finding::Comment(text) => {
                let _ = self.append(NodeType::Comment(text));
            }
            Finding::Declaration(text) => {
                let _ = self.append(NodeType::Declaration(text));
            }
            Finding::Instruction(text) => {
                let _ = self.append(NodeType::Instruction(text));
            }
            Finding::Tail(text) => {
                let preview: String = text.chars().take(40).collect();
                self.issue(&format!("dropped unparsed input: {preview:?}"), true);
            }
        }
    }

    fn append(&mut self, node_type: NodeType) -> NodeId {
        let parent = self.open.last().copied().unwrap_or(NodeId::ROOT);
        let id = self.tree.alloc(node_type);
        self.tree.append_child(parent, id);
        id
    }

    fn add_attribute(&mut self, name: QualifiedName, value: Option<String>) {
        let Some(&element) = self.open.last() else {
            return;
        };
        if let Some(data) = self.tree.as_element_mut(element) {
            data.attrs.push(Attribute {
                namespace: name.namespace,
                name: name.local,
                value,
            });
        }
    }

    fn issue(&mut self, message: &str, is_error: bool) {
        warn_once("HTML Builder", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            finding_index: self.index,
            is_error,
        });
    }
}
