use mailcraft_document::{Mark, Node, NodeType};
use std::collections::BTreeMap;

/// Visitor pattern for traversing document trees immutably
///
/// Default implementations walk the entire tree. Override specific visit_*
/// methods to act on particular nodes.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_text(&mut self, _text: &str, _marks: &[Mark]) {}

    fn visit_mark(&mut self, _mark: &Mark) {}
}

/// Mutable visitor for in-place transforms
pub trait VisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_text_mut(&mut self, _text: &mut String) {}

    fn visit_mark_mut(&mut self, _mark: &mut Mark) {}
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    for mark in &node.marks {
        visitor.visit_mark(mark);
    }
    if let Some(text) = &node.text {
        visitor.visit_text(text, &node.marks);
    }
    for child in &node.content {
        visitor.visit_node(child);
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    for mark in &mut node.marks {
        visitor.visit_mark_mut(mark);
    }
    if let Some(text) = &mut node.text {
        visitor.visit_text_mut(text);
    }
    for child in &mut node.content {
        visitor.visit_node_mut(child);
    }
}

/// Per-type node counts plus the unknown types encountered
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NodeStats {
    pub counts: BTreeMap<String, usize>,
    pub unknown_types: Vec<String>,
    pub missing_uids: usize,
}

impl NodeStats {
    pub fn collect(root: &Node) -> Self {
        let mut stats = Self::default();
        stats.visit_node(root);
        stats
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Visitor for NodeStats {
    fn visit_node(&mut self, node: &Node) {
        *self
            .counts
            .entry(node.node_type.to_string())
            .or_insert(0) += 1;

        if let NodeType::Unknown(name) = &node.node_type {
            if !self.unknown_types.contains(name) {
                self.unknown_types.push(name.clone());
            }
        }
        if node.node_type.carries_uid() && node.uid().is_none() {
            self.missing_uids += 1;
        }

        walk_node(self, node);
    }
}

/// Names referenced as `{{name}}` in text runs and link targets
#[derive(Debug, Default)]
pub struct VariableReferences {
    pub names: Vec<String>,
}

impl VariableReferences {
    pub fn collect(root: &Node) -> Vec<String> {
        let mut refs = Self::default();
        refs.visit_node(root);
        refs.names
    }

    fn scan(&mut self, source: &str) {
        let mut rest = source;
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                break;
            };
            let name = after[..end].trim();
            if !name.is_empty() && !self.names.iter().any(|n| n == name) {
                self.names.push(name.to_string());
            }
            rest = &after[end + 2..];
        }
    }
}

impl Visitor for VariableReferences {
    fn visit_node(&mut self, node: &Node) {
        for key in ["href", "url", "src"] {
            if let Some(value) = node.attr_str(key) {
                self.scan(value);
            }
        }
        walk_node(self, node);
    }

    fn visit_text(&mut self, text: &str, _marks: &[Mark]) {
        self.scan(text);
    }

    fn visit_mark(&mut self, mark: &Mark) {
        if let Some(href) = mark.attr_str("href") {
            self.scan(href);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::doc(vec![
            Node::paragraph("Hi {{first_name}}").with_uid("p1"),
            Node::new(NodeType::Paragraph).with_child(
                Node::text("unsubscribe").with_mark(Mark::link("{{unsubscribe_url}}")),
            ),
            Node::new("mystery"),
        ])
    }

    #[test]
    fn test_node_stats() {
        let stats = NodeStats::collect(&sample());
        assert_eq!(stats.counts.get("paragraph"), Some(&2));
        assert_eq!(stats.counts.get("text"), Some(&2));
        assert_eq!(stats.unknown_types, vec!["mystery".to_string()]);
        assert_eq!(stats.missing_uids, 1);
        assert_eq!(stats.total(), 6);
    }

    #[test]
    fn test_variable_references() {
        assert_eq!(
            VariableReferences::collect(&sample()),
            vec!["first_name".to_string(), "unsubscribe_url".to_string()]
        );
    }

    struct Upper;

    impl VisitorMut for Upper {
        fn visit_text_mut(&mut self, text: &mut String) {
            *text = text.to_uppercase();
        }
    }

    #[test]
    fn test_mutable_walk_reaches_text() {
        let mut doc = sample();
        Upper.visit_node_mut(&mut doc);
        assert_eq!(doc.content[0].text_content(), "HI {{FIRST_NAME}}");
    }
}
