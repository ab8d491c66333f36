// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Endpoint index: per-node, per-tag lists of ranges starting and ending there.
//!
//! A node only has an entry while at least one range of some tag starts or
//! ends at it. Slots are created on demand and dropped as soon as both of
//! their lists are empty; an empty slot left behind is a bug, since callers
//! treat "has a slot" as "has ranges".

use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::{Edge, RangeId, Tag};

/// Ordered range list of one endpoint kind at one node.
pub(crate) type EntryList = SmallVec<[RangeId; 2]>;

/// Start and end lists of one tag at one node.
#[derive(Clone, Debug, Default)]
pub(crate) struct TagSlot {
    lists: [EntryList; 2],
}

impl TagSlot {
    pub(crate) fn list(&self, edge: Edge) -> &[RangeId] {
        &self.lists[edge.idx()]
    }

    pub(crate) fn list_mut(&mut self, edge: Edge) -> &mut EntryList {
        &mut self.lists[edge.idx()]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lists.iter().all(|l| l.is_empty())
    }
}

/// Tag slots of one node. Nodes rarely carry more than one tag.
type NodeSlots = SmallVec<[(Tag, TagSlot); 1]>;

/// `node -> (tag -> slot)`.
#[derive(Clone, Debug)]
pub(crate) struct SlotMap<N> {
    nodes: HashMap<N, NodeSlots>,
}

impl<N> Default for SlotMap<N> {
    fn default() -> Self {
        Self {
            nodes: HashMap::default(),
        }
    }
}

impl<N: Copy + Eq + Hash> SlotMap<N> {
    pub(crate) fn get(&self, node: N, tag: Tag) -> Option<&TagSlot> {
        self.nodes
            .get(&node)?
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, slot)| slot)
    }

    pub(crate) fn get_mut(&mut self, node: N, tag: Tag) -> Option<&mut TagSlot> {
        self.nodes
            .get_mut(&node)?
            .iter_mut()
            .find(|(t, _)| *t == tag)
            .map(|(_, slot)| slot)
    }

    /// The list for `edge`, or an empty slice when the node has no slot.
    pub(crate) fn list(&self, node: N, tag: Tag, edge: Edge) -> &[RangeId] {
        self.get(node, tag).map_or(&[], |slot| slot.list(edge))
    }

    pub(crate) fn ensure(&mut self, node: N, tag: Tag) -> &mut TagSlot {
        let tags = self.nodes.entry(node).or_default();
        let pos = match tags.iter().position(|(t, _)| *t == tag) {
            Some(pos) => pos,
            None => {
                tags.push((tag, TagSlot::default()));
                tags.len() - 1
            }
        };
        &mut tags[pos].1
    }

    /// Drop the slot if it is empty, or unconditionally when `force` is set.
    ///
    /// Returns true if a slot was dropped.
    pub(crate) fn clean(&mut self, node: N, tag: Tag, force: bool) -> bool {
        let Some(tags) = self.nodes.get_mut(&node) else {
            return false;
        };
        let Some(pos) = tags.iter().position(|(t, _)| *t == tag) else {
            return false;
        };
        if !force && !tags[pos].1.is_empty() {
            return false;
        }
        tags.remove(pos);
        if tags.is_empty() {
            self.nodes.remove(&node);
        }
        true
    }

    pub(crate) fn take(&mut self, node: N, tag: Tag) -> Option<TagSlot> {
        let tags = self.nodes.get_mut(&node)?;
        let pos = tags.iter().position(|(t, _)| *t == tag)?;
        let (_, slot) = tags.remove(pos);
        if tags.is_empty() {
            self.nodes.remove(&node);
        }
        Some(slot)
    }

    /// Install `slot`, replacing whatever `node` held for `tag`.
    pub(crate) fn put(&mut self, node: N, tag: Tag, slot: TagSlot) {
        if slot.is_empty() {
            self.clean(node, tag, true);
            return;
        }
        *self.ensure(node, tag) = slot;
    }

    /// Every tag slot on `node`.
    pub(crate) fn tags_at(&self, node: N) -> impl Iterator<Item = (Tag, &TagSlot)> + '_ {
        self.nodes
            .get(&node)
            .into_iter()
            .flat_map(|tags| tags.iter().map(|(tag, slot)| (*tag, slot)))
    }

    /// Drop every slot on `node`.
    pub(crate) fn remove_node(&mut self, node: N) {
        self.nodes.remove(&node);
    }

    #[cfg(test)]
    pub(crate) fn has_node(&self, node: N) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Number of `(node, tag)` slots.
    pub(crate) fn len(&self) -> usize {
        self.nodes.values().map(|tags| tags.len()).sum()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (N, Tag, &TagSlot)> + '_ {
        self.nodes
            .iter()
            .flat_map(|(node, tags)| tags.iter().map(move |(tag, slot)| (*node, *tag, slot)))
    }
}
