//! # Live Document
//!
//! The editable form of a template's content tree.
//!
//! Nodes are addressed by integer positions, counted the way the editing
//! surface counts them:
//!
//! ```text
//! <doc> <p> H i </p> <img> </doc>
//!       0   1 2 3    4     5
//! ```
//!
//! - text occupies one position per character
//! - leaf blocks (image, button, ...) occupy exactly one position
//! - every other node occupies its content plus an opening and a closing
//!   token
//!
//! Positions of the root's children start at 0. A node's position is the
//! offset just before it.

use crate::EditorError;
use mailcraft_document::index::{node_at_path, node_at_path_mut};
use mailcraft_document::{Node, NodeType};
use serde_json::Value;

/// Size of a node in positions
pub fn node_size(node: &Node) -> usize {
    if node.is_text() {
        node.text.as_deref().map_or(0, |text| text.chars().count())
    } else if node.node_type.is_leaf() {
        1
    } else {
        content_size(node) + 2
    }
}

/// Combined size of a node's children
pub fn content_size(node: &Node) -> usize {
    node.content.iter().map(node_size).sum()
}

fn has_content_hole(node: &Node) -> bool {
    !node.is_text() && !node.node_type.is_leaf()
}

/// A node reached during traversal
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode<'a> {
    pub node: &'a Node,
    pub pos: usize,
    pub path: Vec<usize>,
}

/// Editable document with a position index
#[derive(Debug, Clone, PartialEq)]
pub struct LiveDocument {
    root: Node,
    version: u64,
}

impl LiveDocument {
    pub fn new(root: Node) -> Result<Self, EditorError> {
        if root.node_type != NodeType::Doc {
            return Err(EditorError::NotADocument(root.node_type.to_string()));
        }
        Ok(Self { root, version: 0 })
    }

    pub fn from_json(value: Value) -> Result<Self, EditorError> {
        Self::new(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<Value, EditorError> {
        Ok(serde_json::to_value(&self.root)?)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Incremented by every applied mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn content_size(&self) -> usize {
        content_size(&self.root)
    }

    pub(crate) fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        node_at_path_mut(&mut self.root, path)
    }

    pub(crate) fn replace_root(&mut self, root: Node) {
        self.root = root;
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Every node below the root with its position, in pre-order
    pub fn descendants(&self) -> Vec<PositionedNode<'_>> {
        let mut nodes = Vec::new();
        walk(&self.root, 0, &mut Vec::new(), &mut |node, pos, path| {
            nodes.push(PositionedNode {
                node,
                pos,
                path: path.to_vec(),
            });
            true
        });
        nodes
    }

    /// First node in pre-order whose `uid` matches
    pub fn find_by_uid(&self, uid: &str) -> Option<PositionedNode<'_>> {
        if uid.is_empty() {
            return None;
        }
        let mut found = None;
        walk(&self.root, 0, &mut Vec::new(), &mut |node, pos, path| {
            if node.uid() == Some(uid) {
                found = Some(PositionedNode {
                    node,
                    pos,
                    path: path.to_vec(),
                });
                return false;
            }
            true
        });
        found
    }

    /// Index path of the node that starts at `pos`
    pub fn path_at(&self, pos: usize) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut node = &self.root;
        let mut start = 0;

        loop {
            let mut offset = start;
            let mut next = None;
            for (index, child) in node.content.iter().enumerate() {
                let size = node_size(child);
                if offset == pos {
                    path.push(index);
                    return Some(path);
                }
                if pos < offset + size {
                    next = Some((index, child, offset));
                    break;
                }
                offset += size;
            }

            let (index, child, child_pos) = next?;
            if !has_content_hole(child) {
                return None;
            }
            path.push(index);
            node = child;
            start = child_pos + 1;
        }
    }

    /// Node that starts at `pos`
    pub fn node_at(&self, pos: usize) -> Option<&Node> {
        let path = self.path_at(pos)?;
        node_at_path(&self.root, &path)
    }

    /// Position of the node at `path`. An index one past the last child
    /// gives the position where a new last child would start.
    pub fn pos_of_path(&self, path: &[usize]) -> Option<usize> {
        let mut node = &self.root;
        let mut pos = 0;

        for (depth, &index) in path.iter().enumerate() {
            if index > node.content.len() {
                return None;
            }
            pos += node.content[..index].iter().map(node_size).sum::<usize>();

            if depth + 1 < path.len() {
                node = node.content.get(index)?;
                if !has_content_hole(node) {
                    return None;
                }
                pos += 1;
            }
        }

        Some(pos)
    }
}

/// Pre-order walk. The visitor returns `false` to stop.
fn walk<'a, F>(node: &'a Node, start: usize, path: &mut Vec<usize>, visit: &mut F) -> bool
where
    F: FnMut(&'a Node, usize, &[usize]) -> bool,
{
    let mut pos = start;
    for (index, child) in node.content.iter().enumerate() {
        path.push(index);
        if !visit(child, pos, path) {
            return false;
        }
        if has_content_hole(child) && !walk(child, pos + 1, path, visit) {
            return false;
        }
        path.pop();
        pos += node_size(child);
    }
    true
}
