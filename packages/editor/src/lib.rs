//! # Mailcraft Editor
//!
//! The live half of the block identity index: an editable content tree with
//! integer positions, validated mutations with inverses, and an undo stack.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ EditSession                                 │
//! │  - assigns uids to new blocks               │
//! │  - find / update attrs by uid               │
//! │  - transactions = one undo step             │
//! └─────────────────────────────────────────────┘
//!            ↓ Mutation            ↑ inverse
//! ┌─────────────────────────────────────────────┐
//! │ LiveDocument: Node tree + positions         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailcraft_editor::{EditSession, Mutation};
//!
//! let mut session = EditSession::new(template.content.clone())?;
//! session.update_attrs_by_uid(&uid, &attrs)?;
//! session.transaction("Add footer", |tx| {
//!     tx.apply(Mutation::insert_top_level(2, footer))
//! })?;
//! session.undo()?;
//! ```

mod document;
mod errors;
mod mutations;
mod session;
mod undo_stack;

pub use document::{content_size, node_size, LiveDocument, PositionedNode};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError, NodeRef};
pub use session::{EditSession, Transaction};
pub use undo_stack::{MutationBatch, UndoStack, DEFAULT_MAX_LEVELS};
