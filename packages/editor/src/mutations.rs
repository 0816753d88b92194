//! # Tree Mutations
//!
//! Pure structural operations over a document tree.
//!
//! ## Design Principles
//!
//! 1. **Pure**: every operation is `(&Tree, ...) -> Tree`; inputs are never
//!    mutated.
//! 2. **Shared**: output trees reuse unchanged subtrees by `Rc` reference and
//!    allocate new nodes only along the root-to-target path.
//! 3. **Validated**: operations that need an existing anchor fail with
//!    [`MutationError`]; operations where a no-op is safe return the input
//!    tree unchanged.
//!
//! ## Mutation Semantics
//!
//! ### Move
//! - Detach-then-append; the moved subtree keeps its ids.
//! - Dropping a node into itself or its own subtree is a no-op, not an
//!   error.
//! - An unresolvable destination drops the edit silently.
//!
//! ### Remove
//! - Removes the node and all descendants.
//! - Refused (no-op) when anything in the doomed subtree is undeletable.
//!   The check lives here, not in the shared detach routine, which move
//!   also uses.
//!
//! ### Update
//! - Top-level fields replace; `properties` and `style` merge key-by-key.

use pagecraft_model::{IdGenerator, Node, NodeKind, Slot, StyleValue, Tree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

/// Where an insert or move lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DropTarget {
    /// Append to the top-level root sequence.
    Root,

    /// Append to a node's standard children.
    #[serde(rename_all = "camelCase")]
    Children { parent_id: String },

    /// Append into a named slot of a composite-slot container.
    #[serde(rename_all = "camelCase")]
    Slot { parent_id: String, slot_key: String },
}

impl DropTarget {
    pub fn children(parent_id: impl Into<String>) -> Self {
        DropTarget::Children {
            parent_id: parent_id.into(),
        }
    }

    pub fn slot(parent_id: impl Into<String>, slot_key: impl Into<String>) -> Self {
        DropTarget::Slot {
            parent_id: parent_id.into(),
            slot_key: slot_key.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Slot not found: {0} in {1}")]
    SlotNotFound(String, String),
}

/// Partial node update. Present top-level fields replace the node's;
/// `properties` and `style` entries merge into the existing maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub undeletable: Option<bool>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, StyleValue>,
}

/// Insert a new node under `target`, appended or at a clamped `position`.
///
/// The root sentinel always succeeds. A missing parent is
/// [`MutationError::ParentNotFound`]; an existing parent without the named
/// slot is [`MutationError::SlotNotFound`].
pub fn insert_child(
    tree: &Tree,
    target: &DropTarget,
    node: Node,
    position: Option<usize>,
) -> Result<Tree, MutationError> {
    attach(tree, target, Rc::new(node), position)
}

/// Move the subtree rooted at `node_id` to `target`, appended at the end.
///
/// Silent no-op when the destination is the node itself or one of its
/// descendants, when the destination cannot be resolved, or when the node
/// does not exist. Callers must not assume an error was raised.
pub fn move_node(tree: &Tree, node_id: &str, target: &DropTarget) -> Tree {
    let dest_parent = match target {
        DropTarget::Root => None,
        DropTarget::Children { parent_id } | DropTarget::Slot { parent_id, .. } => {
            Some(parent_id.as_str())
        }
    };

    if let Some(parent_id) = dest_parent {
        if parent_id == node_id || tree.is_descendant(node_id, parent_id) {
            tracing::debug!("Move rejected: {} into its own subtree at {}", node_id, parent_id);
            return tree.clone();
        }
    }

    if !target_resolves(tree, target) {
        tracing::debug!("Move dropped: unresolved target for {}", node_id);
        return tree.clone();
    }

    let Some((roots, detached)) = detach_node(&tree.roots, node_id) else {
        tracing::debug!("Move dropped: unknown node {}", node_id);
        return tree.clone();
    };
    let pruned = Tree { roots };

    // The destination survived the detach: it is outside the moved subtree.
    match attach(&pruned, target, detached, None) {
        Ok(next) => next,
        Err(_) => tree.clone(),
    }
}

/// Deep-copy a subtree, assigning a fresh id to every node in the copy.
/// `module_id` back-references are preserved.
pub fn clone_subtree(node: &Node, ids: &mut IdGenerator) -> Node {
    duplicate(node, ids)
}

/// Like [`clone_subtree`], but the copy's root gets `module_id` instead of
/// whatever the original carried.
pub fn clone_subtree_with_module(
    node: &Node,
    module_id: impl Into<String>,
    ids: &mut IdGenerator,
) -> Node {
    let mut copy = duplicate(node, ids);
    copy.module_id = Some(module_id.into());
    copy
}

/// Insert a pre-cloned node immediately after `sibling_id` in whichever
/// list (root, children, or slot) currently holds that sibling.
pub fn insert_copy_after(tree: &Tree, sibling_id: &str, node: Node) -> Result<Tree, MutationError> {
    let node = Rc::new(node);
    match insert_after(&tree.roots, sibling_id, &node) {
        Some(roots) => Ok(Tree { roots }),
        None => Err(MutationError::NodeNotFound(sibling_id.to_string())),
    }
}

/// Remove the subtree rooted at `node_id` from wherever it sits.
///
/// No-op when the node does not exist. Refused (no-op) when the node or any
/// descendant removed along with it is undeletable.
pub fn remove_node(tree: &Tree, node_id: &str) -> Tree {
    let Some(node) = tree.find_by_id(node_id) else {
        return tree.clone();
    };

    if node.subtree_any(&|n| n.undeletable) {
        tracing::debug!("Delete refused: {} holds an undeletable node", node_id);
        return tree.clone();
    }

    match detach_node(&tree.roots, node_id) {
        Some((roots, _)) => Tree { roots },
        None => tree.clone(),
    }
}

/// Merge `patch` into the node with `node_id`. Silent no-op when absent.
pub fn update_node(tree: &Tree, node_id: &str, patch: &NodePatch) -> Tree {
    match rewrite_node(&tree.roots, node_id, &mut |node| apply_patch(node, patch)) {
        Some(roots) => Tree { roots },
        None => tree.clone(),
    }
}

fn apply_patch(node: &Node, patch: &NodePatch) -> Node {
    let mut updated = node.clone();

    if let Some(kind) = &patch.kind {
        updated.kind = kind.clone();
    }
    if let Some(class_name) = &patch.class_name {
        updated.class_name = Some(class_name.clone());
    }
    if let Some(module_id) = &patch.module_id {
        updated.module_id = Some(module_id.clone());
    }
    if let Some(undeletable) = patch.undeletable {
        updated.undeletable = undeletable;
    }
    for (key, value) in &patch.properties {
        updated.properties.insert(key.clone(), value.clone());
    }
    for (key, value) in &patch.style {
        updated.style.insert(key.clone(), value.clone());
    }

    updated
}

fn duplicate(node: &Node, ids: &mut IdGenerator) -> Node {
    let mut copy = node.clone();
    copy.id = ids.new_id();
    copy.children = node
        .children
        .iter()
        .map(|child| Rc::new(duplicate(child, ids)))
        .collect();
    copy.items = node
        .items
        .iter()
        .map(|slot| Slot {
            children: slot
                .children
                .iter()
                .map(|child| Rc::new(duplicate(child, ids)))
                .collect(),
            ..slot.clone()
        })
        .collect();
    copy
}

fn target_resolves(tree: &Tree, target: &DropTarget) -> bool {
    match target {
        DropTarget::Root => true,
        DropTarget::Children { parent_id } => tree.contains(parent_id),
        DropTarget::Slot {
            parent_id,
            slot_key,
        } => tree
            .find_by_id(parent_id)
            .map(|parent| parent.items.iter().any(|slot| slot.slot_key == *slot_key))
            .unwrap_or(false),
    }
}

fn attach(
    tree: &Tree,
    target: &DropTarget,
    node: Rc<Node>,
    position: Option<usize>,
) -> Result<Tree, MutationError> {
    match target {
        DropTarget::Root => {
            let mut roots = tree.roots.clone();
            let pos = position.unwrap_or(roots.len()).min(roots.len());
            roots.insert(pos, node);
            Ok(Tree { roots })
        }

        DropTarget::Children { parent_id } => {
            let roots = rewrite_node(&tree.roots, parent_id, &mut |parent| {
                let mut replaced = parent.clone();
                let pos = position
                    .unwrap_or(replaced.children.len())
                    .min(replaced.children.len());
                replaced.children.insert(pos, Rc::clone(&node));
                replaced
            })
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
            Ok(Tree { roots })
        }

        DropTarget::Slot {
            parent_id,
            slot_key,
        } => {
            let parent = tree
                .find_by_id(parent_id)
                .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
            if !parent.items.iter().any(|slot| slot.slot_key == *slot_key) {
                return Err(MutationError::SlotNotFound(
                    slot_key.clone(),
                    parent_id.clone(),
                ));
            }

            let roots = rewrite_node(&tree.roots, parent_id, &mut |parent| {
                let mut replaced = parent.clone();
                if let Some(slot) = replaced
                    .items
                    .iter_mut()
                    .find(|slot| slot.slot_key == *slot_key)
                {
                    let pos = position.unwrap_or(slot.children.len()).min(slot.children.len());
                    slot.children.insert(pos, Rc::clone(&node));
                }
                replaced
            })
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
            Ok(Tree { roots })
        }
    }
}

/// Rebuild the forest along the path to `id`, applying `rewrite` to the
/// located node. Untouched siblings are shared, not copied.
fn rewrite_node<F>(nodes: &[Rc<Node>], id: &str, rewrite: &mut F) -> Option<Vec<Rc<Node>>>
where
    F: FnMut(&Node) -> Node,
{
    if let Some(pos) = nodes.iter().position(|node| node.id == id) {
        let mut out = nodes.to_vec();
        out[pos] = Rc::new(rewrite(&nodes[pos]));
        return Some(out);
    }

    for (pos, node) in nodes.iter().enumerate() {
        if let Some(children) = rewrite_node(&node.children, id, rewrite) {
            let mut replaced = (**node).clone();
            replaced.children = children;
            let mut out = nodes.to_vec();
            out[pos] = Rc::new(replaced);
            return Some(out);
        }

        for (slot_pos, slot) in node.items.iter().enumerate() {
            if let Some(children) = rewrite_node(&slot.children, id, rewrite) {
                let mut replaced = (**node).clone();
                replaced.items[slot_pos] = Slot {
                    children,
                    ..slot.clone()
                };
                let mut out = nodes.to_vec();
                out[pos] = Rc::new(replaced);
                return Some(out);
            }
        }
    }

    None
}

/// Remove the subtree rooted at `id`, returning the rebuilt forest and the
/// detached subtree intact.
fn detach_node(nodes: &[Rc<Node>], id: &str) -> Option<(Vec<Rc<Node>>, Rc<Node>)> {
    if let Some(pos) = nodes.iter().position(|node| node.id == id) {
        let mut out = nodes.to_vec();
        let removed = out.remove(pos);
        return Some((out, removed));
    }

    for (pos, node) in nodes.iter().enumerate() {
        if let Some((children, removed)) = detach_node(&node.children, id) {
            let mut replaced = (**node).clone();
            replaced.children = children;
            let mut out = nodes.to_vec();
            out[pos] = Rc::new(replaced);
            return Some((out, removed));
        }

        for (slot_pos, slot) in node.items.iter().enumerate() {
            if let Some((children, removed)) = detach_node(&slot.children, id) {
                let mut replaced = (**node).clone();
                replaced.items[slot_pos] = Slot {
                    children,
                    ..slot.clone()
                };
                let mut out = nodes.to_vec();
                out[pos] = Rc::new(replaced);
                return Some((out, removed));
            }
        }
    }

    None
}

fn insert_after(nodes: &[Rc<Node>], sibling_id: &str, node: &Rc<Node>) -> Option<Vec<Rc<Node>>> {
    if let Some(pos) = nodes.iter().position(|n| n.id == sibling_id) {
        let mut out = nodes.to_vec();
        out.insert(pos + 1, Rc::clone(node));
        return Some(out);
    }

    for (pos, candidate) in nodes.iter().enumerate() {
        if let Some(children) = insert_after(&candidate.children, sibling_id, node) {
            let mut replaced = (**candidate).clone();
            replaced.children = children;
            let mut out = nodes.to_vec();
            out[pos] = Rc::new(replaced);
            return Some(out);
        }

        for (slot_pos, slot) in candidate.items.iter().enumerate() {
            if let Some(children) = insert_after(&slot.children, sibling_id, node) {
                let mut replaced = (**candidate).clone();
                replaced.items[slot_pos] = Slot {
                    children,
                    ..slot.clone()
                };
                let mut out = nodes.to_vec();
                out[pos] = Rc::new(replaced);
                return Some(out);
            }
        }
    }

    None
}
