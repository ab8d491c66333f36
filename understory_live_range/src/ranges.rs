// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range arena, endpoint bookkeeping, construction, and destruction.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use core::ops::{Bound, RangeBounds};

use smallvec::SmallVec;

use crate::error::Error;
use crate::host::Host;
use crate::index::{EntryList, SlotMap};
use crate::position::find_position;
use crate::types::{Edge, Flow, Nesting, RangeId, Tag, VisitEvent};

/// A set of live ranges over a host tree.
///
/// Each range covers a contiguous run of siblings `start..=end` (and all of
/// their descendants) and belongs to a [`Tag`]. Ranges of one tag always nest
/// properly: two ranges are either disjoint or one contains the other.
///
/// Ranges are not notified of host edits. Instead, each range is recorded in
/// the endpoint lists of its first and last node, so it keeps identifying the
/// same span as long as those two nodes stay siblings. Bulk edits that replace
/// or move endpoint nodes go through [`LiveRanges::operate`] and friends,
/// which move the bookkeeping along with the content.
///
/// The host is passed to every operation that needs to look at or edit the
/// tree; this type holds no reference to it.
///
/// ## Example
///
/// ```rust
/// use understory_live_range::{LiveRanges, Nesting, Tag, VisitEvent};
/// use understory_node_tree::Tree;
///
/// const REGIONS: Tag = Tag(1);
///
/// let mut tree = Tree::new();
/// let root = tree.create_element("root");
/// let [a, b, c] = ["a", "b", "c"].map(|name| {
///     let n = tree.create_element(name);
///     tree.append_child(root, n);
///     n
/// });
///
/// let mut ranges = LiveRanges::new();
/// let outer = ranges.create(&tree, REGIONS, a, c, Nesting::Outer).unwrap();
/// let inner = ranges.create(&tree, REGIONS, b, c, Nesting::Outer).unwrap();
///
/// assert_eq!(ranges.find_parent(&tree, inner, false), Some(outer));
/// assert_eq!(ranges.children(&tree, outer), vec![inner]);
///
/// // `b` and `c` move into a fragment; `outer` now only covers `a`.
/// let removed = ranges.extract(&mut tree, inner).unwrap();
/// assert_eq!(tree.first_child(removed), Some(b));
/// assert_eq!(ranges.last_node(outer), Some(a));
/// ```
#[derive(Clone, Debug)]
pub struct LiveRanges<N> {
    /// slots
    ranges: Vec<Option<Record<N>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    pub(crate) slots: SlotMap<N>,
}

impl<N> Default for LiveRanges<N> {
    fn default() -> Self {
        Self {
            ranges: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            slots: SlotMap::default(),
        }
    }
}

/// Cached location of a live range.
///
/// `start`/`end` are back-references into the host; the range owns only the
/// positions in the two endpoint lists.
#[derive(Clone, Debug)]
pub(crate) struct Record<N> {
    generation: u32,
    pub(crate) tag: Tag,
    pub(crate) start: N,
    pub(crate) end: N,
    pub(crate) start_index: usize,
    pub(crate) end_index: usize,
}

/// Set `node` and list position on every entry of `list` from `from` on.
fn adopt<N: Copy>(
    ranges: &mut [Option<Record<N>>],
    list: &[RangeId],
    from: usize,
    node: N,
    edge: Edge,
) {
    for (i, id) in list.iter().enumerate().skip(from) {
        let r = ranges[id.idx()].as_mut().expect("dangling RangeId");
        match edge {
            Edge::Start => {
                r.start = node;
                r.start_index = i;
            }
            Edge::End => {
                r.end = node;
                r.end_index = i;
            }
        }
    }
}

impl<N: Copy + Eq + Hash + Debug> LiveRanges<N> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with room for `n` ranges.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(n),
            generations: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    /// Create a range of `tag` spanning `start`, `end`, every sibling between
    /// them, and all of their descendants.
    ///
    /// `start` and `end` may be the same node. If other ranges of `tag`
    /// already cover exactly this span, `nesting` decides whether the new
    /// range wraps them or sits inside them.
    ///
    /// # Errors
    ///
    /// - [`Error::Detached`] if `start` has no parent.
    /// - [`Error::NotSiblings`] if `end` is not `start` or a later sibling.
    pub fn create<H>(
        &mut self,
        host: &H,
        tag: Tag,
        start: N,
        end: N,
        nesting: Nesting,
    ) -> Result<RangeId, Error>
    where
        H: Host<Node = N>,
    {
        if host.parent(start).is_none() {
            return Err(Error::Detached);
        }
        if !host.siblings_in_order(start, end) {
            return Err(Error::NotSiblings);
        }

        // Both positions are computed before either list changes.
        let start_index = find_position(
            host,
            &self.far_edges(start, tag, Edge::Start),
            Edge::Start,
            start,
            end,
            nesting,
        );
        let end_index = find_position(
            host,
            &self.far_edges(end, tag, Edge::End),
            Edge::End,
            end,
            start,
            nesting,
        );

        let id = self.alloc(tag, start, end);
        self.insert_entries(start, tag, Edge::Start, start_index, &[id]);
        self.insert_entries(end, tag, Edge::End, end_index, &[id]);
        log::trace!("created {id:?} ({tag:?}) over {start:?}..={end:?}");
        Ok(id)
    }

    /// Create a range of `tag` spanning every child of `container`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyContainer`] if `container` has no children.
    pub fn create_over_children<H>(
        &mut self,
        host: &H,
        tag: Tag,
        container: N,
        nesting: Nesting,
    ) -> Result<RangeId, Error>
    where
        H: Host<Node = N>,
    {
        let (Some(start), Some(end)) = (host.first_child(container), host.last_child(container))
        else {
            return Err(Error::EmptyContainer);
        };
        self.create(host, tag, start, end, nesting)
    }

    /// Remove a range.
    ///
    /// Without `recursive`, ranges nested inside are untouched and become
    /// children of whatever now encloses them. With `recursive`, every range
    /// of the same tag nested inside is destroyed too, and all range data of
    /// that tag on nodes strictly inside the span is dropped.
    ///
    /// The id (and, when recursive, the nested ids) become stale. Destroying a
    /// stale id does nothing.
    pub fn destroy<H>(&mut self, host: &H, id: RangeId, recursive: bool)
    where
        H: Host<Node = N>,
    {
        let Some(r) = self.record(id) else {
            return;
        };
        let (tag, start, end, start_index, end_index) =
            (r.tag, r.start, r.end, r.start_index, r.end_index);

        if !recursive {
            self.remove_entries(start, tag, Edge::Start, start_index..=start_index);
            self.remove_entries(end, tag, Edge::End, end_index..=end_index);
            self.free(id);
            log::trace!("destroyed {id:?}");
            return;
        }

        let mut nested = Vec::new();
        let mut containers = Vec::new();
        self.visit(host, id, |event| {
            match event {
                VisitEvent::EnterRange(r) => nested.push(r),
                VisitEvent::LeaveNode(n) => containers.push(n),
                _ => {}
            }
            Flow::Continue
        });

        for &r in &nested {
            self.free(r);
        }
        for parent in containers {
            let mut child = host.first_child(parent);
            while let Some(c) = child {
                self.slots.clean(c, tag, true);
                child = host.next_sibling(c);
            }
        }

        // Our own entry plus the inner ones at each end.
        self.remove_entries(start, tag, Edge::Start, start_index..);
        self.remove_entries(end, tag, Edge::End, ..=end_index);

        if start != end {
            let mut n = host.next_sibling(start);
            while let Some(node) = n {
                if node == end {
                    break;
                }
                self.slots.clean(node, tag, true);
                n = host.next_sibling(node);
            }
            // Anything ending at `start` or starting at `end` was nested.
            self.remove_entries(start, tag, Edge::End, ..);
            self.remove_entries(end, tag, Edge::Start, ..);
        }

        self.free(id);
        log::trace!("destroyed {id:?} and {} nested ranges", nested.len());
    }

    /// Returns true if `id` refers to a live range.
    pub fn is_alive(&self, id: RangeId) -> bool {
        self.record(id).is_some()
    }

    /// Number of live ranges, across all tags.
    pub fn len(&self) -> usize {
        self.ranges.len() - self.free_list.len()
    }

    /// Returns true if there are no live ranges.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tag of a live range.
    pub fn tag(&self, id: RangeId) -> Option<Tag> {
        self.record(id).map(|r| r.tag)
    }

    /// First node of a live range (in preorder).
    pub fn first_node(&self, id: RangeId) -> Option<N> {
        self.record(id).map(|r| r.start)
    }

    /// Last node of a live range (in postorder).
    pub fn last_node(&self, id: RangeId) -> Option<N> {
        self.record(id).map(|r| r.end)
    }

    /// The parent of the range's first and last nodes.
    pub fn container_node<H>(&self, host: &H, id: RangeId) -> Option<N>
    where
        H: Host<Node = N>,
    {
        host.parent(self.record(id)?.start)
    }

    /// Returns true if any range of `tag` starts or ends at `node`.
    pub fn has_slot(&self, node: N, tag: Tag) -> bool {
        self.slots.get(node, tag).is_some()
    }

    /// Ranges of `tag` starting at `node`, outermost first.
    pub fn ranges_starting_at(&self, node: N, tag: Tag) -> &[RangeId] {
        self.slots.list(node, tag, Edge::Start)
    }

    /// Ranges of `tag` ending at `node`, innermost first.
    pub fn ranges_ending_at(&self, node: N, tag: Tag) -> &[RangeId] {
        self.slots.list(node, tag, Edge::End)
    }

    // --- internals ---

    pub(crate) fn record(&self, id: RangeId) -> Option<&Record<N>> {
        let r = self.ranges.get(id.idx())?.as_ref()?;
        (r.generation == id.generation()).then_some(r)
    }

    /// Access a range listed in the index; panics if `id` is stale.
    pub(crate) fn rec(&self, id: RangeId) -> &Record<N> {
        self.ranges[id.idx()].as_ref().expect("dangling RangeId")
    }

    pub(crate) fn rec_mut(&mut self, id: RangeId) -> &mut Record<N> {
        self.ranges[id.idx()].as_mut().expect("dangling RangeId")
    }

    fn alloc(&mut self, tag: Tag, start: N, end: N) -> RangeId {
        let record = |generation| Record {
            generation,
            tag,
            start,
            end,
            start_index: 0,
            end_index: 0,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.ranges[idx] = Some(record(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.ranges.push(Some(record(generation)));
            self.generations.push(generation);
            (self.ranges.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "RangeId uses 32-bit indices."
        )]
        RangeId::new(idx as u32, generation)
    }

    pub(crate) fn free(&mut self, id: RangeId) {
        if self.record(id).is_some() {
            self.ranges[id.idx()] = None;
            self.free_list.push(id.idx());
        }
    }

    /// Opposite endpoints of the ranges in one endpoint list.
    fn far_edges(&self, node: N, tag: Tag, edge: Edge) -> SmallVec<[N; 4]> {
        self.slots
            .list(node, tag, edge)
            .iter()
            .map(|&id| {
                let r = self.rec(id);
                match edge {
                    Edge::Start => r.end,
                    Edge::End => r.start,
                }
            })
            .collect()
    }

    /// Splice `ids` into an endpoint list at `at` and make them (and the
    /// entries they pushed back) point at `node` with fresh indices.
    pub(crate) fn insert_entries(
        &mut self,
        node: N,
        tag: Tag,
        edge: Edge,
        at: usize,
        ids: &[RangeId],
    ) {
        if ids.is_empty() {
            return;
        }
        let list = self.slots.ensure(node, tag).list_mut(edge);
        list.insert_many(at, ids.iter().copied());
        adopt(&mut self.ranges, list, at, node, edge);
    }

    /// Cut `span` out of an endpoint list, renumber what follows, and drop
    /// the slot if it ends up empty. Returns the removed entries.
    pub(crate) fn remove_entries(
        &mut self,
        node: N,
        tag: Tag,
        edge: Edge,
        span: impl RangeBounds<usize>,
    ) -> EntryList {
        let from = match span.start_bound() {
            Bound::Included(&i) => i,
            Bound::Excluded(&i) => i + 1,
            Bound::Unbounded => 0,
        };
        let Some(slot) = self.slots.get_mut(node, tag) else {
            return EntryList::new();
        };
        let list = slot.list_mut(edge);
        let removed: EntryList = list.drain(span).collect();
        adopt(&mut self.ranges, list, from, node, edge);
        if slot.is_empty() {
            self.slots.clean(node, tag, false);
        }
        removed
    }

    #[cfg(test)]
    pub(crate) fn live_ids(&self) -> impl Iterator<Item = RangeId> + '_ {
        self.ranges.iter().enumerate().filter_map(|(i, r)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "RangeId uses 32-bit indices."
            )]
            r.as_ref().map(|r| RangeId::new(i as u32, r.generation))
        })
    }
}
