//! # Edit Session
//!
//! One open document: the current tree, its snapshot history, and the id
//! generator seeded from the document name. Each successful mutation pushes
//! the new tree into the history; undo/redo restore adjacent snapshots.

use crate::history::History;
use crate::mutations::{self, DropTarget, MutationError, NodePatch};
use crate::store::ModuleRegistry;
use crate::EditorError;
use pagecraft_model::{IdGenerator, Node, NodeKind, Tree};

pub struct EditSession {
    name: String,
    tree: Tree,
    history: History<Tree>,
    ids: IdGenerator,
}

impl EditSession {
    /// Fresh session over an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self::open(name, Tree::new())
    }

    /// Session over an existing tree. The history is reset to the loaded
    /// snapshot so undo never crosses document boundaries.
    pub fn open(name: impl Into<String>, tree: Tree) -> Self {
        let name = name.into();
        let ids = IdGenerator::new(&name);
        let mut history = History::new();
        history.reset(tree.clone());
        Self {
            name,
            tree,
            history,
            ids,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mint a node with a fresh id from the session generator.
    pub fn new_node(&mut self, kind: NodeKind) -> Node {
        Node::new(self.ids.new_id(), kind)
    }

    pub fn insert(
        &mut self,
        target: &DropTarget,
        node: Node,
        position: Option<usize>,
    ) -> Result<(), EditorError> {
        let next = mutations::insert_child(&self.tree, target, node, position)?;
        self.commit(next);
        Ok(())
    }

    pub fn move_to(&mut self, node_id: &str, target: &DropTarget) {
        let next = mutations::move_node(&self.tree, node_id, target);
        self.commit(next);
    }

    pub fn remove(&mut self, node_id: &str) {
        let next = mutations::remove_node(&self.tree, node_id);
        self.commit(next);
    }

    pub fn update(&mut self, node_id: &str, patch: &NodePatch) {
        let next = mutations::update_node(&self.tree, node_id, patch);
        self.commit(next);
    }

    /// Clone the subtree at `node_id` with fresh ids and insert the copy
    /// right after the original. Returns the copy's root id.
    pub fn duplicate(&mut self, node_id: &str) -> Result<String, EditorError> {
        let source = self
            .tree
            .find_by_id(node_id)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
        let copy = mutations::clone_subtree(source, &mut self.ids);
        let copy_id = copy.id.clone();

        let next = mutations::insert_copy_after(&self.tree, node_id, copy)?;
        self.commit(next);
        Ok(copy_id)
    }

    /// Pull a snippet from the registry, clone it with fresh ids and the
    /// module back-reference, and insert it at `target`.
    pub fn insert_module(
        &mut self,
        registry: &dyn ModuleRegistry,
        module_id: &str,
        target: &DropTarget,
    ) -> Result<String, EditorError> {
        let snippet = registry
            .resolve(module_id)
            .ok_or_else(|| EditorError::UnknownModule(module_id.to_string()))?;
        let copy = mutations::clone_subtree_with_module(&snippet, module_id, &mut self.ids);
        let copy_id = copy.id.clone();

        let next = mutations::insert_child(&self.tree, target, copy, None)?;
        self.commit(next);
        Ok(copy_id)
    }

    /// Restore the previous snapshot. Returns false at the boundary.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.tree = snapshot.clone();
                true
            }
            None => {
                tracing::debug!("Undo at history floor for {}", self.name);
                false
            }
        }
    }

    /// Restore the next snapshot. Returns false at the boundary.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.tree = snapshot.clone();
                true
            }
            None => {
                tracing::debug!("Redo at history ceiling for {}", self.name);
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Mutations that resolve to a no-op leave no history entry, so every
    // undo step changes the tree.
    fn commit(&mut self, next: Tree) {
        if next == self.tree {
            return;
        }
        self.tree = next;
        self.history.push(self.tree.clone());
    }
}
