// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host implementation for Understory Node Tree.
//!
//! ## Feature
//!
//! Enable with `node_tree_adapter`.
//!
//! ## Notes
//!
//! Every node kind can carry range endpoints, text and comments included, so no
//! placeholder wrapping is needed. Moving a [`NodeKind::Fragment`]'s children uses the
//! tree's own fragment insertion, which splices the whole run in one call.

use understory_node_tree::{NodeId, NodeKind, Tree};

use crate::host::Host;

impl Host for Tree {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        Self::first_child(self, node)
    }

    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        Self::last_child(self, node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        Self::next_sibling(self, node)
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        Self::prev_sibling(self, node)
    }

    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        Self::insert_before(self, parent, node, reference);
    }

    fn remove_child(&mut self, parent: NodeId, node: NodeId) {
        Self::remove_child(self, parent, node);
    }

    fn create_fragment(&mut self) -> NodeId {
        Self::create_fragment(self)
    }

    fn move_children_before(&mut self, from: NodeId, parent: NodeId, reference: Option<NodeId>) {
        if self.kind(from).is_some_and(NodeKind::is_fragment) {
            Self::insert_before(self, parent, from, reference);
            return;
        }
        while let Some(child) = Self::first_child(self, from) {
            Self::remove_child(self, from, child);
            Self::insert_before(self, parent, child, reference);
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        Self::is_inclusive_ancestor(self, ancestor, node)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use understory_node_tree::Tree;

    use crate::Host;

    #[test]
    fn fragment_children_move_as_a_run() {
        let mut tree = Tree::new();
        let root = tree.create_element("root");
        let last = tree.create_element("last");
        tree.append_child(root, last);
        let frag = tree.create_fragment();
        let a = tree.create_text("a");
        let b = tree.create_comment("b");
        tree.append_child(frag, a);
        tree.append_child(frag, b);

        Host::move_children_before(&mut tree, frag, root, Some(last));
        assert_eq!(tree.children_of(root).collect::<Vec<_>>(), [a, b, last]);
        assert_eq!(Host::first_child(&tree, frag), None);
        assert!(tree.siblings_in_order(a, last));
        assert!(!tree.siblings_in_order(last, a));
    }

    #[test]
    fn plain_containers_are_emptied_one_child_at_a_time() {
        let mut tree = Tree::new();
        let root = tree.create_element("root");
        let holder = tree.create_element("holder");
        let a = tree.create_element("a");
        tree.append_child(holder, a);

        Host::move_children_before(&mut tree, holder, root, None);
        assert_eq!(Host::parent(&tree, a), Some(root));
        assert_eq!(Host::first_child(&tree, holder), None);
    }

    #[test]
    fn ancestry_is_inclusive() {
        let mut tree = Tree::new();
        let root = tree.create_element("root");
        let a = tree.create_element("a");
        tree.append_child(root, a);
        assert!(Host::is_inclusive_ancestor(&tree, root, a));
        assert!(Host::is_inclusive_ancestor(&tree, a, a));
        assert!(!Host::is_inclusive_ancestor(&tree, a, root));
    }
}
