//! Read-only traversal over trees and subtrees.
//!
//! Search order is document order everywhere: a node first, then its
//! standard children, then each slot's children in slot order.

use crate::node::{Node, Tree};
use std::collections::HashSet;
use std::rc::Rc;

impl Tree {
    /// Depth-first search across both standard children and slot children.
    /// Returns the first match in document order.
    pub fn find_by_id(&self, id: &str) -> Option<&Rc<Node>> {
        find_in(&self.roots, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Whether `candidate_id` sits strictly below `ancestor_id`.
    pub fn is_descendant(&self, ancestor_id: &str, candidate_id: &str) -> bool {
        match self.find_by_id(ancestor_id) {
            Some(ancestor) => ancestor
                .all_children()
                .any(|child| subtree_contains(child, candidate_id)),
            None => false,
        }
    }

    /// Every id in the tree, slots included.
    pub fn collect_ids(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        for root in &self.roots {
            root.collect_ids(&mut ids);
        }
        ids
    }
}

impl Node {
    /// The node's content as one ordered sequence regardless of container
    /// kind: standard children, then every slot's children in slot order.
    pub fn all_children(&self) -> impl Iterator<Item = &Rc<Node>> {
        self.children
            .iter()
            .chain(self.items.iter().flat_map(|slot| slot.children.iter()))
    }

    pub fn collect_ids(&self, ids: &mut HashSet<String>) {
        ids.insert(self.id.clone());
        for child in self.all_children() {
            child.collect_ids(ids);
        }
    }

    /// Whether any node in this subtree (self included) matches.
    pub fn subtree_any(&self, predicate: &impl Fn(&Node) -> bool) -> bool {
        if predicate(self) {
            return true;
        }
        self.all_children()
            .any(|child| child.subtree_any(predicate))
    }
}

/// Document-order search through a forest.
pub fn find_in<'a>(nodes: &'a [Rc<Node>], id: &str) -> Option<&'a Rc<Node>> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, id) {
            return Some(found);
        }
        for slot in &node.items {
            if let Some(found) = find_in(&slot.children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn subtree_contains(node: &Node, id: &str) -> bool {
    node.id == id || node.all_children().any(|child| subtree_contains(child, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, Slot};

    fn sample_tree() -> Tree {
        // root
        // └─ section
        //    ├─ intro (text)
        //    └─ tabs
        //       ├─ slot "one": [label-a]
        //       └─ slot "two": [label-b]
        let label_a = Node::new("label-a", NodeKind::Text);
        let label_b = Node::new("label-b", NodeKind::Text);

        let mut slot_one = Slot::new("one", "One");
        slot_one.children = vec![Rc::new(label_a)];
        let mut slot_two = Slot::new("two", "Two");
        slot_two.children = vec![Rc::new(label_b)];

        let mut tabs = Node::new("tabs", NodeKind::Tabs);
        tabs.items = vec![slot_one, slot_two];

        let mut section = Node::new("section", NodeKind::Container);
        section.children = vec![
            Rc::new(Node::new("intro", NodeKind::Text)),
            Rc::new(tabs),
        ];

        let mut root = Node::new("root", NodeKind::Container);
        root.children = vec![Rc::new(section)];

        Tree::from_roots(vec![root])
    }

    #[test]
    fn test_find_by_id_reaches_slot_children() {
        let tree = sample_tree();

        assert!(tree.find_by_id("intro").is_some());
        assert!(tree.find_by_id("label-b").is_some());
        assert!(tree.find_by_id("missing").is_none());
    }

    #[test]
    fn test_is_descendant_crosses_slot_boundaries() {
        let tree = sample_tree();

        assert!(tree.is_descendant("root", "label-a"));
        assert!(tree.is_descendant("tabs", "label-b"));
        assert!(!tree.is_descendant("tabs", "intro"));
        // A node is not its own descendant.
        assert!(!tree.is_descendant("tabs", "tabs"));
        assert!(!tree.is_descendant("missing", "intro"));
    }

    #[test]
    fn test_all_children_orders_slots_after_children() {
        let tree = sample_tree();
        let section = tree.find_by_id("section").unwrap();

        let order: Vec<&str> = section.all_children().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["intro", "tabs"]);

        let tabs = tree.find_by_id("tabs").unwrap();
        let order: Vec<&str> = tabs.all_children().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["label-a", "label-b"]);
    }

    #[test]
    fn test_collect_ids_covers_whole_tree() {
        let tree = sample_tree();
        let ids = tree.collect_ids();

        for id in ["root", "section", "intro", "tabs", "label-a", "label-b"] {
            assert!(ids.contains(id), "missing {}", id);
        }
        assert_eq!(ids.len(), 6);
    }
}
