// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: allocation, linking, navigation.

use alloc::{string::String, vec, vec::Vec};

use crate::types::{NodeId, NodeKind};

/// An ordered, mutable tree of nodes.
///
/// Nodes are allocated in an arena and addressed by generational [`NodeId`]s.
/// A node is created detached; it becomes part of a hierarchy through
/// [`Tree::append_child`] or [`Tree::insert_before`]. Any number of detached
/// roots may coexist, so fragments and removed subtrees are ordinary nodes.
///
/// Sibling order is a doubly linked list, so every navigation primitive
/// (`parent_of`, `first_child`, `last_child`, `next_sibling`, `prev_sibling`)
/// is O(1).
///
/// ## Example
///
/// ```rust
/// use understory_node_tree::Tree;
///
/// let mut tree = Tree::new();
/// let body = tree.create_element("body");
/// let a = tree.create_element("a");
/// let b = tree.create_element("b");
/// tree.append_child(body, b);
/// tree.insert_before(body, a, Some(b));
///
/// assert_eq!(tree.first_child(body), Some(a));
/// assert_eq!(tree.next_sibling(a), Some(b));
/// assert_eq!(tree.parent_of(b), Some(body));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    fn new(generation: u32, kind: NodeKind) -> Self {
        Self {
            generation,
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// Iterator over the children of a node, in sibling order.
///
/// Returned by [`Tree::children_of`].
#[derive(Clone, Debug)]
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Allocate a detached node of the given kind.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create(NodeKind::Element(String::from(name)))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.create(NodeKind::Text(String::from(content)))
    }

    /// Allocate a detached comment node.
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.create(NodeKind::Comment(String::from(content)))
    }

    /// Allocate an empty fragment.
    pub fn create_fragment(&mut self) -> NodeId {
        self.create(NodeKind::Fragment)
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Same semantics as [`Tree::insert_before`] with no reference node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` under `parent`, immediately before `reference`
    /// (or at the end when `reference` is `None`).
    ///
    /// - If `child` is a fragment, its children are moved in order and the
    ///   fragment is left empty.
    /// - If `child` already has a parent, it is detached first.
    ///
    /// # Panics
    ///
    /// Panics if any identifier is stale, if `reference` is not a child of
    /// `parent`, or if `child` is `parent` or one of its ancestors.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        assert!(self.is_alive(parent), "dangling parent NodeId");
        assert!(self.is_alive(child), "dangling child NodeId");
        if let Some(r) = reference {
            assert_eq!(
                self.parent_of(r),
                Some(parent),
                "reference node is not a child of parent"
            );
        }

        assert!(
            !self.is_inclusive_ancestor(child, parent),
            "cannot insert a node into its own subtree"
        );

        if self.node(child).kind.is_fragment() {
            while let Some(c) = self.node(child).first_child {
                self.insert_before(parent, c, reference);
            }
            return;
        }

        // Inserting a node before itself keeps its position.
        let reference = if reference == Some(child) {
            self.node(child).next_sibling
        } else {
            reference
        };

        self.unlink(child);
        self.link(parent, child, reference);
    }

    /// Detach `child` from `parent`. The child (and its subtree) stays alive
    /// as a detached root.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        assert_eq!(
            self.parent_of(child),
            Some(parent),
            "node is not a child of parent"
        );
        self.unlink(child);
    }

    /// Remove a node and free it together with its whole subtree.
    ///
    /// Identifiers into the subtree become stale immediately.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend(self.children_of(current));
            self.nodes[current.idx()] = None;
            self.free_list.push(current.idx());
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Returns true if the tree holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the kind of a node if the identifier is live.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Returns the first child of a node.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child)
    }

    /// Returns the last child of a node.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child)
    }

    /// Returns the sibling following a node.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Returns the sibling preceding a node.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Iterate the children of a node; empty if the node is stale.
    pub fn children_of(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Get the next node in depth-first traversal order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(first_child) = self.first_child(current) {
            return Some(first_child);
        }
        let mut node = current;
        loop {
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            node = self.parent_of(node)?;
        }
    }

    /// Get the previous node in reverse depth-first traversal order.
    ///
    /// Returns `None` if no previous node exists or if the current node is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        let Some(mut node) = self.prev_sibling(current) else {
            return self.parent_of(current);
        };
        while let Some(last) = self.last_child(node) {
            node = last;
        }
        Some(node)
    }

    /// Returns true if `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent_of(n);
        }
        false
    }

    // --- internals ---

    fn get(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let n = self.node(id);
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        let Some(parent) = parent else {
            return;
        };
        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }
        let n = self.node_mut(id);
        n.parent = None;
        n.prev_sibling = None;
        n.next_sibling = None;
    }

    fn link(&mut self, parent: NodeId, id: NodeId, reference: Option<NodeId>) {
        let prev = match reference {
            Some(r) => self.node(r).prev_sibling,
            None => self.node(parent).last_child,
        };
        {
            let n = self.node_mut(id);
            n.parent = Some(parent);
            n.prev_sibling = prev;
            n.next_sibling = reference;
        }
        match prev {
            Some(p) => self.node_mut(p).next_sibling = Some(id),
            None => self.node_mut(parent).first_child = Some(id),
        }
        match reference {
            Some(r) => self.node_mut(r).prev_sibling = Some(id),
            None => self.node_mut(parent).last_child = Some(id),
        }
    }
}
