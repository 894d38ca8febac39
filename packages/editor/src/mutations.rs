//! # Live-tree Mutations
//!
//! Structural edits on a [`LiveDocument`].
//!
//! Every mutation validates against the current tree before touching it and
//! can produce its inverse, computed against the tree *before* it is applied.
//! Inverses may address nodes by position: they are only ever applied to
//! the exact state the original mutation produced.

use crate::document::LiveDocument;
use mailcraft_document::{collect_uids, Attrs, Node, NodeType, UID_ATTR};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where a mutation finds its node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRef {
    /// The document itself
    Root,
    /// A node by its `uid`
    Uid(String),
    /// The node starting at a position
    Pos(usize),
}

impl NodeRef {
    fn resolve(&self, doc: &LiveDocument) -> Option<Vec<usize>> {
        match self {
            NodeRef::Root => Some(Vec::new()),
            NodeRef::Uid(uid) => doc.find_by_uid(uid).map(|found| found.path),
            NodeRef::Pos(pos) => doc.path_at(*pos),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Root => f.write_str("root"),
            NodeRef::Uid(uid) => write!(f, "uid {}", uid),
            NodeRef::Pos(pos) => write!(f, "position {}", pos),
        }
    }
}

/// Structural edits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Replace the attributes of the node at `pos` (type and content untouched)
    SetNodeAttrs { pos: usize, attrs: Attrs },

    /// Insert `node` as child `index` of `parent`
    InsertNode {
        parent: NodeRef,
        index: usize,
        node: Node,
    },

    /// Remove a node and its subtree
    RemoveNode { target: NodeRef },

    /// Swap in a whole new document
    ReplaceDocument { doc: Node },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Uid already in use: {0}")]
    DuplicateUid(String),

    #[error("Cannot remove the document root")]
    CannotRemoveRoot,
}

impl Mutation {
    /// Remove the node with `uid`
    pub fn remove(uid: impl Into<String>) -> Self {
        Mutation::RemoveNode {
            target: NodeRef::Uid(uid.into()),
        }
    }

    /// Insert at the top level of the document
    pub fn insert_top_level(index: usize, node: Node) -> Self {
        Mutation::InsertNode {
            parent: NodeRef::Root,
            index,
            node,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetNodeAttrs { .. } => "set_node_attrs",
            Mutation::InsertNode { .. } => "insert_node",
            Mutation::RemoveNode { .. } => "remove_node",
            Mutation::ReplaceDocument { .. } => "replace_document",
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &LiveDocument) -> Result<(), MutationError> {
        match self {
            Mutation::SetNodeAttrs { pos, attrs } => {
                let node = doc
                    .node_at(*pos)
                    .ok_or_else(|| MutationError::NodeNotFound(NodeRef::Pos(*pos).to_string()))?;

                if node.is_text() {
                    return Err(MutationError::InvalidStructure(
                        "text nodes carry marks, not attributes".to_string(),
                    ));
                }

                if let Some(uid) = attrs.get(UID_ATTR).and_then(|v| v.as_str()) {
                    if node.uid() != Some(uid) && doc.find_by_uid(uid).is_some() {
                        return Err(MutationError::DuplicateUid(uid.to_string()));
                    }
                }

                Ok(())
            }

            Mutation::InsertNode {
                parent,
                index,
                node,
            } => {
                let path = parent
                    .resolve(doc)
                    .ok_or_else(|| MutationError::ParentNotFound(parent.to_string()))?;
                let parent_node = mailcraft_document::index::node_at_path(doc.root(), &path)
                    .ok_or_else(|| MutationError::ParentNotFound(parent.to_string()))?;

                if parent_node.is_text() || parent_node.node_type.is_leaf() {
                    return Err(MutationError::InvalidStructure(format!(
                        "{} cannot have children",
                        parent_node.node_type
                    )));
                }
                if node.node_type == NodeType::Doc {
                    return Err(MutationError::InvalidStructure(
                        "a doc cannot be nested".to_string(),
                    ));
                }
                if *index > parent_node.content.len() {
                    return Err(MutationError::IndexOutOfBounds {
                        index: *index,
                        len: parent_node.content.len(),
                    });
                }

                if let Some(uid) = collect_uids(node)
                    .into_iter()
                    .find(|uid| doc.find_by_uid(uid).is_some())
                {
                    return Err(MutationError::DuplicateUid(uid));
                }

                Ok(())
            }

            Mutation::RemoveNode { target } => {
                if *target == NodeRef::Root {
                    return Err(MutationError::CannotRemoveRoot);
                }
                target
                    .resolve(doc)
                    .ok_or_else(|| MutationError::NodeNotFound(target.to_string()))?;
                Ok(())
            }

            Mutation::ReplaceDocument { doc: replacement } => {
                if replacement.node_type != NodeType::Doc {
                    return Err(MutationError::InvalidStructure(format!(
                        "replacement root must be a doc, found {}",
                        replacement.node_type
                    )));
                }
                Ok(())
            }
        }
    }

    /// Apply mutation with validation
    pub fn apply(&self, doc: &mut LiveDocument) -> Result<(), MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::SetNodeAttrs { pos, attrs } => {
                let path = doc
                    .path_at(*pos)
                    .ok_or_else(|| MutationError::NodeNotFound(NodeRef::Pos(*pos).to_string()))?;
                let node = doc
                    .node_mut(&path)
                    .ok_or_else(|| MutationError::NodeNotFound(NodeRef::Pos(*pos).to_string()))?;
                node.attrs = attrs.clone();
            }

            Mutation::InsertNode {
                parent,
                index,
                node,
            } => {
                let path = parent
                    .resolve(doc)
                    .ok_or_else(|| MutationError::ParentNotFound(parent.to_string()))?;
                let parent_node = doc
                    .node_mut(&path)
                    .ok_or_else(|| MutationError::ParentNotFound(parent.to_string()))?;
                parent_node.content.insert(*index, node.clone());
            }

            Mutation::RemoveNode { target } => {
                let path = target
                    .resolve(doc)
                    .ok_or_else(|| MutationError::NodeNotFound(target.to_string()))?;
                let (index, parent_path) = path
                    .split_last()
                    .ok_or(MutationError::CannotRemoveRoot)?;
                let parent_node = doc
                    .node_mut(parent_path)
                    .ok_or_else(|| MutationError::NodeNotFound(target.to_string()))?;
                parent_node.content.remove(*index);
            }

            Mutation::ReplaceDocument { doc: replacement } => {
                doc.replace_root(replacement.clone());
            }
        }

        doc.bump_version();
        Ok(())
    }

    /// The mutation that undoes this one. Must be called before applying.
    pub fn to_inverse(&self, doc: &LiveDocument) -> Result<Mutation, MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::SetNodeAttrs { pos, .. } => {
                let node = doc
                    .node_at(*pos)
                    .ok_or_else(|| MutationError::NodeNotFound(NodeRef::Pos(*pos).to_string()))?;
                Ok(Mutation::SetNodeAttrs {
                    pos: *pos,
                    attrs: node.attrs.clone(),
                })
            }

            Mutation::InsertNode {
                parent,
                index,
                node,
            } => {
                let target = match node.uid() {
                    Some(uid) => NodeRef::Uid(uid.to_string()),
                    None => {
                        let mut path = parent
                            .resolve(doc)
                            .ok_or_else(|| MutationError::ParentNotFound(parent.to_string()))?;
                        path.push(*index);
                        let pos = doc
                            .pos_of_path(&path)
                            .ok_or_else(|| MutationError::ParentNotFound(parent.to_string()))?;
                        NodeRef::Pos(pos)
                    }
                };
                Ok(Mutation::RemoveNode { target })
            }

            Mutation::RemoveNode { target } => {
                let path = target
                    .resolve(doc)
                    .ok_or_else(|| MutationError::NodeNotFound(target.to_string()))?;
                let (index, parent_path) = path
                    .split_last()
                    .ok_or(MutationError::CannotRemoveRoot)?;
                let removed = mailcraft_document::index::node_at_path(doc.root(), &path)
                    .ok_or_else(|| MutationError::NodeNotFound(target.to_string()))?;

                Ok(Mutation::InsertNode {
                    parent: parent_ref(doc, parent_path)?,
                    index: *index,
                    node: removed.clone(),
                })
            }

            Mutation::ReplaceDocument { .. } => Ok(Mutation::ReplaceDocument {
                doc: doc.root().clone(),
            }),
        }
    }
}

/// Most readable stable reference to the node at `path`
fn parent_ref(doc: &LiveDocument, path: &[usize]) -> Result<NodeRef, MutationError> {
    if path.is_empty() {
        return Ok(NodeRef::Root);
    }

    let parent = mailcraft_document::index::node_at_path(doc.root(), path)
        .ok_or_else(|| MutationError::ParentNotFound(format!("path {:?}", path)))?;
    if let Some(uid) = parent.uid() {
        return Ok(NodeRef::Uid(uid.to_string()));
    }

    doc.pos_of_path(path)
        .map(NodeRef::Pos)
        .ok_or_else(|| MutationError::ParentNotFound(format!("path {:?}", path)))
}
