// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test harness: a node tree with labeled ranges, a textual dump of the
//! nesting, a pattern builder, and an index integrity checker.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;
use understory_node_tree::{NodeId, NodeKind, Tree};

use crate::host::Host;
use crate::types::Edge;
use crate::{Flow, LiveRanges, Nesting, RangeId, Tag, VisitEvent};

pub(crate) struct Fixture {
    pub(crate) tree: Tree,
    pub(crate) ranges: LiveRanges<NodeId>,
    pub(crate) root: NodeId,
    pub(crate) tag: Tag,
    labels: HashMap<RangeId, String>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let mut tree = Tree::new();
        let root = tree.create_element("root");
        Self {
            tree,
            ranges: LiveRanges::new(),
            root,
            tag: Tag(1),
            labels: HashMap::new(),
        }
    }

    /// Append one element per name to the root.
    pub(crate) fn children(&mut self, names: &[&str]) -> Vec<NodeId> {
        names
            .iter()
            .map(|name| {
                let n = self.tree.create_element(name);
                self.tree.append_child(self.root, n);
                n
            })
            .collect()
    }

    /// A detached fragment holding one element per name.
    pub(crate) fn fragment(&mut self, names: &[&str]) -> NodeId {
        let frag = self.tree.create_fragment();
        for name in names {
            let n = self.tree.create_element(name);
            self.tree.append_child(frag, n);
        }
        frag
    }

    pub(crate) fn create(
        &mut self,
        label: &str,
        start: NodeId,
        end: NodeId,
        nesting: Nesting,
    ) -> RangeId {
        let id = self
            .ranges
            .create(&self.tree, self.tag, start, end, nesting)
            .unwrap();
        self.labels.insert(id, label.to_string());
        id
    }

    pub(crate) fn create_over_root(&mut self, label: &str, nesting: Nesting) -> RangeId {
        let id = self
            .ranges
            .create_over_children(&self.tree, self.tag, self.root, nesting)
            .unwrap();
        self.labels.insert(id, label.to_string());
        id
    }

    /// `<label>...</label>` for a range and its contents.
    pub(crate) fn dump(&self, id: RangeId) -> String {
        let label = &self.labels[&id];
        format!("<{label}>{}</{label}>", self.render(id))
    }

    pub(crate) fn dump_root(&mut self) -> String {
        self.dump_children(self.root)
    }

    pub(crate) fn dump_fragment(&mut self, frag: NodeId) -> String {
        self.dump_children(frag)
    }

    /// Render the children of `container` through a throwaway range.
    fn dump_children(&mut self, container: NodeId) -> String {
        let Ok(temp) =
            self.ranges
                .create_over_children(&self.tree, self.tag, container, Nesting::Outer)
        else {
            return String::new();
        };
        let out = self.render(temp);
        self.ranges.destroy(&self.tree, temp, false);
        out
    }

    fn render(&self, id: RangeId) -> String {
        let mut out = String::new();
        self.ranges.visit(&self.tree, id, |event| {
            match event {
                VisitEvent::EnterRange(r) => out.push_str(&format!("<{}>", self.labels[&r])),
                VisitEvent::LeaveRange(r) => out.push_str(&format!("</{}>", self.labels[&r])),
                VisitEvent::EnterNode(n) => out.push_str(&format!("<{}>", self.node_name(n))),
                VisitEvent::LeaveNode(n) => out.push_str(&format!("</{}>", self.node_name(n))),
            }
            Flow::Continue
        });
        out
    }

    fn node_name(&self, n: NodeId) -> &str {
        match self.tree.kind(n) {
            Some(NodeKind::Element(s) | NodeKind::Text(s) | NodeKind::Comment(s)) => s.as_str(),
            Some(NodeKind::Fragment) => "#fragment",
            None => "#dead",
        }
    }

    /// Build a tree from a pattern string.
    ///
    /// `[`/`]` open and close an element, `*` is an empty element, an
    /// uppercase letter opens a range at the next child and the matching
    /// lowercase letter closes it after the last one.
    pub(crate) fn pattern(src: &str) -> Self {
        let mut fx = Self::new();
        let src = src.replace('*', "[]");
        let mut current = fx.root;
        let mut opened: Vec<(NodeId, usize)> = Vec::new();
        for c in src.chars() {
            match c {
                'A'..='Z' => opened.push((current, fx.tree.children_of(current).count())),
                'a'..='z' => {
                    let (parent, index) = opened.pop().unwrap();
                    let start = fx.tree.children_of(parent).nth(index).unwrap();
                    let end = fx.tree.last_child(parent).unwrap();
                    fx.create(&c.to_ascii_uppercase().to_string(), start, end, Nesting::Outer);
                }
                '[' => {
                    let n = fx.tree.create_element("div");
                    fx.tree.append_child(current, n);
                    current = n;
                }
                ']' => current = fx.tree.parent_of(current).unwrap(),
                _ => panic!("unexpected pattern character {c:?}"),
            }
        }
        fx
    }

    /// The current tree and ranges written back as a pattern string.
    pub(crate) fn pattern_string(&mut self) -> String {
        let temp = self
            .ranges
            .create_over_children(&self.tree, self.tag, self.root, Nesting::Outer)
            .unwrap();
        let mut out = String::new();
        self.ranges.visit(&self.tree, temp, |event| {
            match event {
                VisitEvent::EnterRange(r) => out.push_str(&self.labels[&r].to_ascii_uppercase()),
                VisitEvent::LeaveRange(r) => out.push_str(&self.labels[&r].to_ascii_lowercase()),
                VisitEvent::EnterNode(_) => out.push('['),
                VisitEvent::LeaveNode(_) => out.push(']'),
            }
            Flow::Continue
        });
        self.ranges.destroy(&self.tree, temp, false);
        out.replace("[]", "*")
    }

    pub(crate) fn letter(&self, c: char) -> RangeId {
        let label = c.to_string();
        self.labels
            .iter()
            .find(|(id, l)| **l == label && self.ranges.is_alive(**id))
            .map(|(id, _)| *id)
            .unwrap()
    }

    pub(crate) fn letter_of(&self, id: RangeId) -> char {
        self.labels[&id].chars().next().unwrap()
    }

    pub(crate) fn destroy_letter(&mut self, c: char, recursive: bool) {
        let id = self.letter(c);
        self.ranges.destroy(&self.tree, id, recursive);
    }

    /// Node at a child-index path from the root.
    pub(crate) fn path(&self, path: &[usize]) -> NodeId {
        path.iter().fold(self.root, |node, &i| {
            self.tree.children_of(node).nth(i).unwrap()
        })
    }

    /// Assert that the index and the range records agree.
    ///
    /// - Every live range is found at its cached positions.
    /// - Every listed entry is live and points back at the node and position
    ///   it is listed under.
    /// - No slot is empty.
    /// - Start lists run outside-in and end lists inside-out.
    pub(crate) fn check(&self) {
        let ranges = &self.ranges;
        for id in ranges.live_ids() {
            let r = ranges.rec(id);
            assert_eq!(
                ranges.slots.list(r.start, r.tag, Edge::Start).get(r.start_index),
                Some(&id),
                "{id:?} missing from its start list"
            );
            assert_eq!(
                ranges.slots.list(r.end, r.tag, Edge::End).get(r.end_index),
                Some(&id),
                "{id:?} missing from its end list"
            );
            assert!(
                self.tree.siblings_in_order(r.start, r.end),
                "{id:?} endpoints are not siblings in order"
            );
        }

        for (node, tag, slot) in ranges.slots.iter() {
            assert!(!slot.is_empty(), "empty slot left on {node:?}");
            for (i, &id) in slot.list(Edge::Start).iter().enumerate() {
                let r = ranges.record(id).expect("listed range is live");
                assert_eq!((r.tag, r.start, r.start_index), (tag, node, i));
            }
            for (i, &id) in slot.list(Edge::End).iter().enumerate() {
                let r = ranges.record(id).expect("listed range is live");
                assert_eq!((r.tag, r.end, r.end_index), (tag, node, i));
            }
            for pair in slot.list(Edge::Start).windows(2) {
                let (outer, inner) = (ranges.rec(pair[0]), ranges.rec(pair[1]));
                assert!(
                    self.tree.siblings_in_order(inner.end, outer.end),
                    "start list on {node:?} is not ordered outside-in"
                );
            }
            for pair in slot.list(Edge::End).windows(2) {
                let (inner, outer) = (ranges.rec(pair[0]), ranges.rec(pair[1]));
                assert!(
                    self.tree.siblings_in_order(outer.start, inner.start),
                    "end list on {node:?} is not ordered inside-out"
                );
            }
        }
    }
}
