//! Comprehensive mutation tests

use pagecraft_editor::{
    clone_subtree, clone_subtree_with_module, insert_child, insert_copy_after, move_node,
    remove_node, update_node, DropTarget, MutationError, NodePatch,
};
use pagecraft_model::{IdGenerator, Node, NodeKind, Slot, StyleValue, Tree};
use serde_json::json;
use std::rc::Rc;

fn with_children(mut node: Node, children: Vec<Node>) -> Node {
    node.children = children.into_iter().map(Rc::new).collect();
    node
}

/// [a [b [c]], d]
fn nested_tree() -> Tree {
    let c = Node::new("c", NodeKind::Text);
    let b = with_children(Node::new("b", NodeKind::Container), vec![c]);
    let a = with_children(Node::new("a", NodeKind::Container), vec![b]);
    Tree::from_roots(vec![a, Node::new("d", NodeKind::Text)])
}

fn tabs_tree() -> Tree {
    let mut first = Slot::new("tab-1", "First");
    first.children = vec![Rc::new(Node::new("inner", NodeKind::Text))];
    let second = Slot::new("tab-2", "Second");

    let mut tabs = Node::new("tabs", NodeKind::Tabs);
    tabs.items = vec![first, second];
    Tree::from_roots(vec![tabs])
}

#[test]
fn test_insert_at_root() {
    let tree = nested_tree();

    let next = insert_child(&tree, &DropTarget::Root, Node::new("e", NodeKind::Button), None)
        .unwrap();

    let ids: Vec<&str> = next.roots.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d", "e"]);
}

#[test]
fn test_insert_into_children_at_position() {
    let tree = nested_tree();

    let next = insert_child(
        &tree,
        &DropTarget::children("a"),
        Node::new("e", NodeKind::Text),
        Some(0),
    )
    .unwrap();

    let a = next.find_by_id("a").unwrap();
    let ids: Vec<&str> = a.children.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["e", "b"]);
}

#[test]
fn test_insert_position_is_clamped() {
    let tree = nested_tree();

    let next = insert_child(
        &tree,
        &DropTarget::children("a"),
        Node::new("e", NodeKind::Text),
        Some(99),
    )
    .unwrap();

    let a = next.find_by_id("a").unwrap();
    assert_eq!(a.children.last().unwrap().id, "e");
}

#[test]
fn test_insert_into_slot() {
    let tree = tabs_tree();

    let next = insert_child(
        &tree,
        &DropTarget::slot("tabs", "tab-2"),
        Node::new("fresh", NodeKind::Text),
        None,
    )
    .unwrap();

    let tabs = next.find_by_id("tabs").unwrap();
    assert_eq!(tabs.items[1].children[0].id, "fresh");
    // The sibling slot is untouched.
    assert_eq!(tabs.items[0].children[0].id, "inner");
}

#[test]
fn test_insert_unknown_parent_fails() {
    let tree = nested_tree();

    let result = insert_child(
        &tree,
        &DropTarget::children("missing"),
        Node::new("e", NodeKind::Text),
        None,
    );

    assert_eq!(
        result.unwrap_err(),
        MutationError::ParentNotFound("missing".to_string())
    );
}

#[test]
fn test_insert_unknown_slot_fails() {
    let tree = tabs_tree();

    let result = insert_child(
        &tree,
        &DropTarget::slot("tabs", "tab-9"),
        Node::new("e", NodeKind::Text),
        None,
    );

    assert_eq!(
        result.unwrap_err(),
        MutationError::SlotNotFound("tab-9".to_string(), "tabs".to_string())
    );
}

#[test]
fn test_insert_never_mutates_input() {
    let tree = nested_tree();

    let _ = insert_child(&tree, &DropTarget::Root, Node::new("e", NodeKind::Text), None).unwrap();

    assert!(tree.find_by_id("e").is_none());
    assert_eq!(tree, nested_tree());
}

#[test]
fn test_move_nested_node_to_root() {
    // b sits under a; after the move a no longer contains b and b
    // (subtree intact) is the last root.
    let tree = nested_tree();

    let next = move_node(&tree, "b", &DropTarget::Root);

    assert!(!next.is_descendant("a", "b"));
    assert_eq!(next.roots.last().unwrap().id, "b");
    let b = next.find_by_id("b").unwrap();
    assert_eq!(b.children[0].id, "c");
}

#[test]
fn test_move_into_own_subtree_is_noop() {
    let tree = nested_tree();

    let into_self = move_node(&tree, "a", &DropTarget::children("a"));
    assert_eq!(into_self, tree);

    let into_descendant = move_node(&tree, "a", &DropTarget::children("c"));
    assert_eq!(into_descendant, tree);
}

#[test]
fn test_move_to_unresolved_target_is_noop() {
    let tree = tabs_tree();

    let unknown_parent = move_node(&tree, "inner", &DropTarget::children("missing"));
    assert_eq!(unknown_parent, tree);

    let unknown_slot = move_node(&tree, "inner", &DropTarget::slot("tabs", "tab-9"));
    assert_eq!(unknown_slot, tree);

    let unknown_node = move_node(&tree, "missing", &DropTarget::Root);
    assert_eq!(unknown_node, tree);
}

#[test]
fn test_move_between_slots() {
    let tree = tabs_tree();

    let next = move_node(&tree, "inner", &DropTarget::slot("tabs", "tab-2"));

    let tabs = next.find_by_id("tabs").unwrap();
    assert!(tabs.items[0].children.is_empty());
    assert_eq!(tabs.items[1].children[0].id, "inner");
}

#[test]
fn test_remove_subtree() {
    let tree = nested_tree();

    let next = remove_node(&tree, "b");

    assert!(next.find_by_id("b").is_none());
    assert!(next.find_by_id("c").is_none());
    assert!(next.find_by_id("a").is_some());
}

#[test]
fn test_remove_missing_is_noop() {
    let tree = nested_tree();
    assert_eq!(remove_node(&tree, "missing"), tree);
}

#[test]
fn test_remove_refuses_undeletable() {
    let mut root = Node::new("root", NodeKind::Container);
    root.undeletable = true;
    let tree = Tree::from_roots(vec![root]);

    assert_eq!(remove_node(&tree, "root"), tree);
}

#[test]
fn test_remove_refuses_undeletable_descendant() {
    let mut pinned = Node::new("pinned", NodeKind::Text);
    pinned.undeletable = true;
    let parent = with_children(Node::new("parent", NodeKind::Container), vec![pinned]);
    let tree = Tree::from_roots(vec![parent]);

    assert_eq!(remove_node(&tree, "parent"), tree);
}

#[test]
fn test_insert_then_remove_is_identity() {
    let tree = nested_tree();

    let inserted = insert_child(
        &tree,
        &DropTarget::children("b"),
        Node::new("fresh", NodeKind::Text),
        None,
    )
    .unwrap();
    let restored = remove_node(&inserted, "fresh");

    assert_eq!(restored, tree);
}

#[test]
fn test_clone_assigns_fresh_unique_ids() {
    let tree = tabs_tree();
    let tabs = tree.find_by_id("tabs").unwrap();
    let original_ids = tree.collect_ids();

    let mut ids = IdGenerator::new("clone-test");
    let copy = clone_subtree(tabs, &mut ids);

    let copy_tree = Tree::from_roots(vec![copy]);
    let copy_ids = copy_tree.collect_ids();

    assert_eq!(copy_ids.len(), original_ids.len());
    assert!(copy_ids.is_disjoint(&original_ids));

    // Structure carried over: both slots, one child in the first.
    let root = &copy_tree.roots[0];
    assert_eq!(root.items.len(), 2);
    assert_eq!(root.items[0].children.len(), 1);
}

#[test]
fn test_clone_preserves_module_references() {
    let mut child = Node::new("child", NodeKind::Text);
    child.module_id = Some("mod-7".to_string());
    let parent = with_children(Node::new("parent", NodeKind::Container), vec![child]);

    let mut ids = IdGenerator::new("clone-test");
    let copy = clone_subtree(&parent, &mut ids);
    assert_eq!(copy.module_id, None);
    assert_eq!(copy.children[0].module_id, Some("mod-7".to_string()));

    let tagged = clone_subtree_with_module(&parent, "mod-9", &mut ids);
    assert_eq!(tagged.module_id, Some("mod-9".to_string()));
    assert_eq!(tagged.children[0].module_id, Some("mod-7".to_string()));
}

#[test]
fn test_insert_copy_after_sibling() {
    let tree = nested_tree();

    let next = insert_copy_after(&tree, "a", Node::new("copy", NodeKind::Container)).unwrap();

    let ids: Vec<&str> = next.roots.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "copy", "d"]);
}

#[test]
fn test_insert_copy_after_inside_slot() {
    let tree = tabs_tree();

    let next = insert_copy_after(&tree, "inner", Node::new("copy", NodeKind::Text)).unwrap();

    let tabs = next.find_by_id("tabs").unwrap();
    let ids: Vec<&str> = tabs.items[0]
        .children
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(ids, vec!["inner", "copy"]);
}

#[test]
fn test_insert_copy_after_missing_sibling_fails() {
    let tree = nested_tree();

    let result = insert_copy_after(&tree, "missing", Node::new("copy", NodeKind::Text));

    assert_eq!(
        result.unwrap_err(),
        MutationError::NodeNotFound("missing".to_string())
    );
}

#[test]
fn test_update_merges_properties_and_style() {
    let mut node = Node::new("n", NodeKind::Button);
    node.properties.insert("text".to_string(), json!("Old"));
    node.properties.insert("size".to_string(), json!("small"));
    node.style
        .insert("color".to_string(), StyleValue::from("red"));
    let tree = Tree::from_roots(vec![node]);

    let mut patch = NodePatch::default();
    patch.properties.insert("text".to_string(), json!("New"));
    patch
        .style
        .insert("marginTop".to_string(), StyleValue::from(4));

    let next = update_node(&tree, "n", &patch);
    let updated = next.find_by_id("n").unwrap();

    // Provided keys overwrite, omitted keys survive.
    assert_eq!(updated.properties["text"], json!("New"));
    assert_eq!(updated.properties["size"], json!("small"));
    assert_eq!(updated.style["color"], StyleValue::from("red"));
    assert_eq!(updated.style["marginTop"], StyleValue::from(4));
}

#[test]
fn test_update_replaces_top_level_fields() {
    let tree = Tree::from_roots(vec![Node::new("n", NodeKind::Text)]);

    let patch = NodePatch {
        kind: Some(NodeKind::Heading),
        class_name: Some("hero".to_string()),
        undeletable: Some(true),
        ..NodePatch::default()
    };

    let next = update_node(&tree, "n", &patch);
    let updated = next.find_by_id("n").unwrap();

    assert_eq!(updated.kind, NodeKind::Heading);
    assert_eq!(updated.class_name, Some("hero".to_string()));
    assert!(updated.undeletable);
}

#[test]
fn test_update_missing_is_noop() {
    let tree = nested_tree();
    let patch = NodePatch {
        class_name: Some("x".to_string()),
        ..NodePatch::default()
    };

    assert_eq!(update_node(&tree, "missing", &patch), tree);
}
