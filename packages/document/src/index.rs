//! # Block Identity Index (serialized trees)
//!
//! Resolves a `uid` to its node in a plain document tree. The locator is the
//! index path through successive `content` arrays, starting at the root.
//!
//! Lookups are depth-first, pre-order. If the uniqueness invariant has been
//! broken the first match in pre-order wins.

use crate::ast::Node;
use std::collections::HashMap;

/// A node together with its index path from the root
#[derive(Debug, Clone, PartialEq)]
pub struct NodeWithPath<'a> {
    pub node: &'a Node,
    pub path: Vec<usize>,
}

/// Find a node by its `uid`
pub fn find_by_uid<'a>(root: &'a Node, uid: &str) -> Option<NodeWithPath<'a>> {
    if uid.is_empty() {
        return None;
    }
    let mut path = Vec::new();
    find_recursive(root, uid, &mut path).map(|node| NodeWithPath { node, path })
}

fn find_recursive<'a>(node: &'a Node, uid: &str, path: &mut Vec<usize>) -> Option<&'a Node> {
    if node.uid() == Some(uid) {
        return Some(node);
    }

    for (index, child) in node.content.iter().enumerate() {
        path.push(index);
        if let Some(found) = find_recursive(child, uid, path) {
            return Some(found);
        }
        path.pop();
    }

    None
}

/// Follow an index path
pub fn node_at_path<'a>(root: &'a Node, path: &[usize]) -> Option<&'a Node> {
    path.iter()
        .try_fold(root, |node, &index| node.content.get(index))
}

/// Follow an index path, mutably
pub fn node_at_path_mut<'a>(root: &'a mut Node, path: &[usize]) -> Option<&'a mut Node> {
    path.iter()
        .try_fold(root, |node, &index| node.content.get_mut(index))
}

/// Every `uid` in the tree, in pre-order
pub fn collect_uids(root: &Node) -> Vec<String> {
    let mut uids = Vec::new();
    collect_recursive(root, &mut uids);
    uids
}

fn collect_recursive(node: &Node, uids: &mut Vec<String>) {
    if let Some(uid) = node.uid() {
        uids.push(uid.to_string());
    }
    for child in &node.content {
        collect_recursive(child, uids);
    }
}

/// Identifiers that appear more than once, in order of first repetition
pub fn duplicate_uids(root: &Node) -> Vec<String> {
    let mut seen = HashMap::new();
    let mut duplicates = Vec::new();

    for uid in collect_uids(root) {
        let count = seen.entry(uid.clone()).or_insert(0usize);
        *count += 1;
        if *count == 2 {
            duplicates.push(uid);
        }
    }

    duplicates
}

/// Prebuilt uid → path index for repeated lookups against one snapshot
#[derive(Debug, Clone, Default)]
pub struct UidIndex {
    paths: HashMap<String, Vec<usize>>,
}

impl UidIndex {
    pub fn build(root: &Node) -> Self {
        let mut index = Self::default();
        let mut path = Vec::new();
        index.insert_recursive(root, &mut path);
        index
    }

    fn insert_recursive(&mut self, node: &Node, path: &mut Vec<usize>) {
        if let Some(uid) = node.uid() {
            // First occurrence in pre-order wins
            self.paths
                .entry(uid.to_string())
                .or_insert_with(|| path.clone());
        }
        for (index, child) in node.content.iter().enumerate() {
            path.push(index);
            self.insert_recursive(child, path);
            path.pop();
        }
    }

    pub fn path(&self, uid: &str) -> Option<&[usize]> {
        self.paths.get(uid).map(Vec::as_slice)
    }

    pub fn resolve<'a>(&self, root: &'a Node, uid: &str) -> Option<NodeWithPath<'a>> {
        let path = self.path(uid)?;
        node_at_path(root, path).map(|node| NodeWithPath {
            node,
            path: path.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
