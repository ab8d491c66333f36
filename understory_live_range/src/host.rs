// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host tree seam.

use core::fmt::Debug;
use core::hash::Hash;

/// An ordered, mutable tree that ranges are defined over.
///
/// Implementations only provide navigation and a couple of mutation
/// primitives. All range bookkeeping lives in [`LiveRanges`](crate::LiveRanges),
/// keyed by [`Host::Node`], so a host never needs to store anything extra on
/// its nodes.
///
/// Navigation on a node that is not part of the tree should return `None`.
pub trait Host {
    /// Node handle. Must stay stable while the node is alive.
    type Node: Copy + Eq + Hash + Debug;

    /// Parent of `node`, or `None` for a root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// First child of `node`.
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Last child of `node`.
    fn last_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Sibling after `node`.
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Sibling before `node`.
    fn prev_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Insert the detached `node` under `parent` before `reference`, or at the
    /// end when `reference` is `None`.
    fn insert_before(
        &mut self,
        parent: Self::Node,
        node: Self::Node,
        reference: Option<Self::Node>,
    );

    /// Detach `node` from `parent`, keeping it (and its subtree) alive.
    fn remove_child(&mut self, parent: Self::Node, node: Self::Node);

    /// Create an empty detached container for moving runs of siblings.
    fn create_fragment(&mut self) -> Self::Node;

    /// Move every child of `from`, in order, under `parent` before `reference`.
    fn move_children_before(
        &mut self,
        from: Self::Node,
        parent: Self::Node,
        reference: Option<Self::Node>,
    ) {
        while let Some(child) = self.first_child(from) {
            self.remove_child(from, child);
            self.insert_before(parent, child, reference);
        }
    }

    /// Returns true if `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Returns true if `end` is `start` or one of the siblings following it.
    fn siblings_in_order(&self, start: Self::Node, end: Self::Node) -> bool {
        let mut current = Some(start);
        while let Some(node) = current {
            if node == end {
                return true;
            }
            current = self.next_sibling(node);
        }
        false
    }
}
