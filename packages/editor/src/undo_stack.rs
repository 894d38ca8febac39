//! # History
//!
//! Bounded undo/redo over [`MutationBatch`]es. A batch is one user-visible
//! step: undo replays its inverses newest-first, redo replays the forward
//! mutations oldest-first. Recording a new step discards the redo side.

use crate::document::LiveDocument;
use crate::mutations::{Mutation, MutationError};
use std::collections::VecDeque;
use tracing::debug;

/// Default number of undo steps kept
pub const DEFAULT_MAX_LEVELS: usize = 100;

/// Mutations recorded as one undo step
#[derive(Debug, Clone, Default)]
pub struct MutationBatch {
    /// Forward mutations, oldest first
    pub mutations: Vec<Mutation>,
    /// Inverses, newest first
    pub inverses: Vec<Mutation>,
    pub description: Option<String>,
}

impl MutationBatch {
    pub fn single(mutation: Mutation, inverse: Mutation) -> Self {
        let mut batch = Self::default();
        batch.push(mutation, inverse);
        batch
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    fn push(&mut self, mutation: Mutation, inverse: Mutation) {
        self.mutations.push(mutation);
        self.inverses.insert(0, inverse);
    }

    fn revert(&self, doc: &mut LiveDocument) -> Result<(), MutationError> {
        self.inverses.iter().try_for_each(|inverse| inverse.apply(doc))
    }

    fn replay(&self, doc: &mut LiveDocument) -> Result<(), MutationError> {
        self.mutations.iter().try_for_each(|mutation| mutation.apply(doc))
    }
}

#[derive(Debug)]
pub struct UndoStack {
    done: VecDeque<MutationBatch>,
    undone: Vec<MutationBatch>,
    /// 0 keeps every step
    limit: usize,
    open: Option<MutationBatch>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(limit: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            limit,
            open: None,
        }
    }

    /// Apply `mutation` to `doc` and record it. Nothing is recorded when
    /// validation or application fails.
    pub fn apply(&mut self, mutation: &Mutation, doc: &mut LiveDocument) -> Result<(), MutationError> {
        let inverse = mutation.to_inverse(doc)?;
        mutation.apply(doc)?;
        debug!(mutation = mutation.name(), version = doc.version(), "applied");

        match &mut self.open {
            Some(batch) => batch.push(mutation.clone(), inverse),
            None => self.record(MutationBatch::single(mutation.clone(), inverse)),
        }
        Ok(())
    }

    /// Collect subsequent mutations into one step until [`end_batch`](Self::end_batch)
    pub fn begin_batch(&mut self, description: Option<String>) {
        self.open = Some(MutationBatch {
            description,
            ..MutationBatch::default()
        });
    }

    pub fn in_batch(&self) -> bool {
        self.open.is_some()
    }

    /// Close the open batch; an empty batch leaves no step behind
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.open.take().filter(|batch| !batch.is_empty()) {
            self.record(batch);
        }
    }

    /// Close the open batch and revert what it applied
    pub fn abort_batch(&mut self, doc: &mut LiveDocument) -> Result<(), MutationError> {
        match self.open.take() {
            Some(batch) => {
                debug!(mutations = batch.len(), "aborting batch");
                batch.revert(doc)
            }
            None => Ok(()),
        }
    }

    fn record(&mut self, batch: MutationBatch) {
        self.done.push_back(batch);
        if self.limit > 0 {
            while self.done.len() > self.limit {
                self.done.pop_front();
            }
        }
        self.undone.clear();
    }

    /// Revert the newest step. `Ok(false)` when there is none; on error the
    /// step stays on the undo side.
    pub fn undo(&mut self, doc: &mut LiveDocument) -> Result<bool, MutationError> {
        let Some(batch) = self.done.pop_back() else {
            return Ok(false);
        };
        if let Err(err) = batch.revert(doc) {
            self.done.push_back(batch);
            return Err(err);
        }
        self.undone.push(batch);
        Ok(true)
    }

    /// Reapply the most recently undone step
    pub fn redo(&mut self, doc: &mut LiveDocument) -> Result<bool, MutationError> {
        let Some(batch) = self.undone.pop() else {
            return Ok(false);
        };
        if let Err(err) = batch.replay(doc) {
            self.undone.push(batch);
            return Err(err);
        }
        self.done.push_back(batch);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.done.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.undone.len()
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
        self.open = None;
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.done.back()?.description.as_deref()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.undone.last()?.description.as_deref()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
