//! Markup serialization.
//!
//! - Element: `<tag a b="v">children</tag>`, or `<tag a b="v"/>` with no children
//! - Attribute with value: `name="value"`, `"` escaped as `\"`; bare: `name`
//! - Data: raw text, or `<![CDATA[text]]>` when the CDATA flag is set
//! - Comment: `<!--text-->`

use crate::{Attribute, DomTree, ElementData, NodeId, NodeType};

enum Visit {
    Open(NodeId),
    Close(NodeId),
}

impl DomTree {
    /// Serialize a node and its subtree back to markup.
    ///
    /// For the root this is the whole document.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_subtree(id, &mut out);
        out
    }

    /// Serialize the children of a node, without the node itself.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_subtree(child, &mut out);
        }
        out
    }

    /// Iterative walk so deeply nested documents cannot exhaust the stack.
    fn write_subtree(&self, id: NodeId, out: &mut String) {
        let mut pending = vec![Visit::Open(id)];

        while let Some(visit) = pending.pop() {
            match visit {
                Visit::Open(node_id) => {
                    let Some(node) = self.get(node_id) else {
                        continue;
                    };
                    match &node.node_type {
                        NodeType::Root => {
                            pending.extend(node.children.iter().rev().map(|&c| Visit::Open(c)));
                        }
                        NodeType::Element(element) => {
                            write_start_tag(element, out);
                            if node.children.is_empty() {
                                out.push_str("/>");
                            } else {
                                out.push('>');
                                pending.push(Visit::Close(node_id));
                                pending
                                    .extend(node.children.iter().rev().map(|&c| Visit::Open(c)));
                            }
                        }
                        NodeType::Data(data) if data.is_cdata => {
                            out.push_str("<![CDATA[");
                            out.push_str(&data.value);
                            out.push_str("]]>");
                        }
                        NodeType::Data(data) => out.push_str(&data.value),
                        NodeType::Comment(text) => {
                            out.push_str("<!--");
                            out.push_str(text);
                            out.push_str("-->");
                        }
                        NodeType::Declaration(text) => {
                            out.push_str("<!");
                            out.push_str(text);
                            out.push('>');
                        }
                        NodeType::Instruction(text) => {
                            out.push_str("<?");
                            out.push_str(text);
                            out.push_str("?>");
                        }
                    }
                }
                Visit::Close(node_id) => {
                    if let Some(element) = self.as_element(node_id) {
                        out.push_str("</");
                        out.push_str(&element.qualified_name());
                        out.push('>');
                    }
                }
            }
        }
    }
}

/// Everything up to, but not including, the closing `>` or `/>`.
fn write_start_tag(element: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&element.qualified_name());
    for attr in &element.attrs {
        out.push(' ');
        write_attribute(attr, out);
    }
}

/// Values are always double quoted and only `"` is escaped. The quoted
/// value syntax has no escape for a backslash, so a value that ends in `\`
/// is written as `y="a\"` and does not parse back to the same attribute.
fn write_attribute(attr: &Attribute, out: &mut String) {
    if let Some(ns) = &attr.namespace {
        out.push_str(ns);
        out.push(':');
    }
    out.push_str(&attr.name);
    if let Some(value) = &attr.value {
        out.push_str("=\"");
        out.push_str(&value.replace('"', "\\\""));
        out.push('"');
    }
}
