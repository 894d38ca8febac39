//! # Edit Session
//!
//! A live document plus its history. All edits go through here so that
//! block identity holds after every step: uid-bearing nodes always have a
//! `uid`, an existing `uid` is never replaced, and an inserted node whose
//! `uid` is already taken gets a fresh one.

use crate::document::{LiveDocument, PositionedNode};
use crate::mutations::Mutation;
use crate::undo_stack::UndoStack;
use crate::EditorError;
use mailcraft_document::{collect_uids, Attrs, Node, RandomUidGenerator, UidGenerator, UID_ATTR};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, instrument};

pub struct EditSession<G: UidGenerator = RandomUidGenerator> {
    document: LiveDocument,
    history: UndoStack,
    uids: G,
}

impl EditSession<RandomUidGenerator> {
    pub fn new(root: Node) -> Result<Self, EditorError> {
        Self::with_generator(root, RandomUidGenerator)
    }
}

impl<G: UidGenerator> EditSession<G> {
    pub fn with_generator(mut root: Node, mut uids: G) -> Result<Self, EditorError> {
        let assigned = normalize_uids(&mut root, &mut HashSet::new(), &mut uids);
        if assigned > 0 {
            debug!(assigned, "assigned uids on load");
        }

        Ok(Self {
            document: LiveDocument::new(root)?,
            history: UndoStack::new(),
            uids,
        })
    }

    pub fn document(&self) -> &LiveDocument {
        &self.document
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn into_document(self) -> Node {
        self.document.into_root()
    }

    pub fn find_by_uid(&self, uid: &str) -> Option<PositionedNode<'_>> {
        self.document.find_by_uid(uid)
    }

    /// Apply one mutation as its own undo step
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        let mutation = self.prepare(mutation);
        self.history.apply(&mutation, &mut self.document)?;
        Ok(())
    }

    /// Group several mutations into a single undo step. If `edit` fails,
    /// everything it applied is reverted.
    pub fn transaction<T, F>(&mut self, description: &str, edit: F) -> Result<T, EditorError>
    where
        F: FnOnce(&mut Transaction<'_, G>) -> Result<T, EditorError>,
    {
        self.history.begin_batch(Some(description.to_string()));

        match edit(&mut Transaction { session: self }) {
            Ok(value) => {
                self.history.end_batch();
                Ok(value)
            }
            Err(err) => {
                self.history.abort_batch(&mut self.document)?;
                Err(err)
            }
        }
    }

    /// Shallow-merge `attrs` into the node's attributes as one undo step.
    /// Returns `false`, without touching anything, when no node has `uid`.
    #[instrument(skip(self, attrs), fields(keys = attrs.len()))]
    pub fn update_attrs_by_uid(&mut self, uid: &str, attrs: &Attrs) -> Result<bool, EditorError> {
        let Some(found) = self.document.find_by_uid(uid) else {
            debug!("uid not found");
            return Ok(false);
        };

        let pos = found.pos;
        let mut merged = found.node.attrs.clone();
        merged.extend(attrs.iter().map(|(key, value)| (key.clone(), value.clone())));

        if merged == found.node.attrs {
            return Ok(true);
        }

        self.apply(Mutation::SetNodeAttrs { pos, attrs: merged })?;
        Ok(true)
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        Ok(self.history.undo(&mut self.document)?)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        Ok(self.history.redo(&mut self.document)?)
    }

    /// Fill in identity before a mutation reaches the tree
    fn prepare(&mut self, mutation: Mutation) -> Mutation {
        match mutation {
            Mutation::InsertNode {
                parent,
                index,
                mut node,
            } => {
                let mut taken: HashSet<String> =
                    collect_uids(self.document.root()).into_iter().collect();
                normalize_uids(&mut node, &mut taken, &mut self.uids);
                Mutation::InsertNode {
                    parent,
                    index,
                    node,
                }
            }

            Mutation::ReplaceDocument { mut doc } => {
                normalize_uids(&mut doc, &mut HashSet::new(), &mut self.uids);
                Mutation::ReplaceDocument { doc }
            }

            Mutation::SetNodeAttrs { pos, mut attrs } => {
                if let Some(node) = self.document.node_at(pos) {
                    let keeps_uid = attrs
                        .get(UID_ATTR)
                        .and_then(Value::as_str)
                        .is_some_and(|uid| !uid.is_empty());
                    if node.node_type.carries_uid() && !keeps_uid {
                        let uid = match node.uid() {
                            Some(existing) => existing.to_string(),
                            None => self.uids.next_uid(),
                        };
                        attrs.insert(UID_ATTR.to_string(), uid.into());
                    }
                }
                Mutation::SetNodeAttrs { pos, attrs }
            }

            other => other,
        }
    }
}

/// Handle for applying mutations inside [`EditSession::transaction`]
pub struct Transaction<'a, G: UidGenerator> {
    session: &'a mut EditSession<G>,
}

impl<G: UidGenerator> Transaction<'_, G> {
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        self.session.apply(mutation)
    }

    pub fn update_attrs_by_uid(&mut self, uid: &str, attrs: &Attrs) -> Result<bool, EditorError> {
        self.session.update_attrs_by_uid(uid, attrs)
    }

    pub fn document(&self) -> &LiveDocument {
        self.session.document()
    }
}

/// Pre-order pass giving every uid-bearing node a `uid` not in `taken`.
/// Missing and already-taken uids are replaced; returns how many were.
fn normalize_uids<G: UidGenerator + ?Sized>(
    node: &mut Node,
    taken: &mut HashSet<String>,
    uids: &mut G,
) -> usize {
    let mut assigned = 0;

    if node.node_type.carries_uid() {
        let current = node.uid().map(str::to_string);
        match current {
            Some(uid) if !taken.contains(&uid) => {
                taken.insert(uid);
            }
            _ => {
                let fresh = loop {
                    let candidate = uids.next_uid();
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                };
                taken.insert(fresh.clone());
                node.attrs.insert(UID_ATTR.to_string(), fresh.into());
                assigned += 1;
            }
        }
    }

    for child in &mut node.content {
        assigned += normalize_uids(child, taken, uids);
    }

    assigned
}
