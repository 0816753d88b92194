//! # Pagecraft Editor
//!
//! The document editing engine: pure tree mutations, bounded undo/redo, and
//! the session layer that ties them to one open document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Tree / Node data shape + queries     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: mutations + history + session       │
//! │  - Pure (&Tree, ...) -> Tree operations     │
//! │  - Bounded snapshot history (undo/redo)     │
//! │  - Collaborator traits (store, registry)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-vue: Tree → component document     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Mutations are pure**: every operation maps a tree to a new tree,
//!    sharing unchanged subtrees by reference. The input is never touched.
//! 2. **History stores snapshots**: whole-tree entries, opaque to the
//!    history manager, cheap because of the structural sharing.
//! 3. **Collaborators are pulled**: persistence and the module registry sit
//!    behind traits; the core never subscribes to ambient events.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{DropTarget, EditSession};
//! use pagecraft_model::NodeKind;
//!
//! let mut session = EditSession::new("home");
//! let node = session.new_node(NodeKind::Container);
//! session.insert(&DropTarget::Root, node, None)?;
//! session.undo();
//! ```

mod errors;
mod history;
mod mutations;
mod session;
mod store;

pub use errors::EditorError;
pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use mutations::{
    clone_subtree, clone_subtree_with_module, insert_child, insert_copy_after, move_node,
    remove_node, update_node, DropTarget, MutationError, NodePatch,
};
pub use session::EditSession;
pub use store::{DocumentStore, FileStore, MemoryRegistry, ModuleRegistry};
