// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content surgery that keeps the endpoint index in step with the host.
//!
//! Every operation here edits the host around a range's boundary nodes, so
//! the entries of *other* ranges sharing those boundary nodes have to move to
//! whichever nodes now sit at the corresponding edge.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;

use crate::error::Error;
use crate::host::Host;
use crate::index::EntryList;
use crate::ranges::LiveRanges;
use crate::types::{Edge, RangeId, Tag};

impl<N: Copy + Eq + Hash + Debug> LiveRanges<N> {
    /// Run an arbitrary host edit over the contents of `id`.
    ///
    /// `func` receives the host and the range's current first and last
    /// node. It may rearrange, replace, or remove anything between (and
    /// including) those nodes, and it may touch ranges nested inside. When it
    /// returns, the range is re-anchored on whatever now lies between the
    /// siblings that used to precede and follow it, and enclosing ranges that
    /// shared its boundary nodes follow along.
    ///
    /// Returns whatever `func` returns.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleRange`] if `id` has been destroyed.
    /// - [`Error::Detached`] if the range's nodes have been removed from
    ///   their parent behind our back.
    ///
    /// # Panics
    ///
    /// If `func` leaves no nodes between the old neighbors. A range can never
    /// be empty, and the enclosing bookkeeping has already been detached at
    /// that point.
    pub fn operate<H, F, R>(&mut self, host: &mut H, id: RangeId, func: F) -> Result<R, Error>
    where
        H: Host<Node = N>,
        F: FnOnce(&mut H, N, N) -> R,
    {
        let r = self.record(id).ok_or(Error::StaleRange)?;
        let (tag, old_start, old_end, start_index, end_index) =
            (r.tag, r.start, r.end, r.start_index, r.end_index);
        let container = host.parent(old_start).ok_or(Error::Detached)?;
        let before = host.prev_sibling(old_start);
        let after = host.next_sibling(old_end);

        // Our own entries and everything outside them.
        let outer_starts = self.remove_entries(old_start, tag, Edge::Start, ..=start_index);
        let outer_ends = self.remove_entries(old_end, tag, Edge::End, end_index..);

        let ret = func(host, old_start, old_end);

        let new_start = match before {
            Some(b) => host.next_sibling(b),
            None => host.first_child(container),
        };
        let new_end = match after {
            Some(a) => host.prev_sibling(a),
            None => host.last_child(container),
        };
        let (Some(new_start), Some(new_end)) = (new_start, new_end) else {
            panic!("ranges must contain at least one node");
        };
        assert!(
            Some(new_start) != after,
            "ranges must contain at least one node"
        );

        self.insert_entries(new_start, tag, Edge::Start, 0, &outer_starts);
        let at = self.slots.list(new_end, tag, Edge::End).len();
        self.insert_entries(new_end, tag, Edge::End, at, &outer_ends);
        log::debug!(
            "operated on {id:?}: {old_start:?}..={old_end:?} is now {new_start:?}..={new_end:?}"
        );
        Ok(ret)
    }

    /// Replace the contents of `id` with the children of `fragment`.
    ///
    /// Ranges already inside `fragment` become children of `id`. The old
    /// contents, including the ranges nested in them, are moved into a new
    /// fragment, which is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleRange`] if `id` has been destroyed.
    /// - [`Error::EmptyFragment`] if `fragment` has no children.
    /// - [`Error::Detached`] if the range's nodes have no parent.
    /// - [`Error::InsertIntoSelf`] if the range lies inside `fragment`.
    pub fn replace_contents<H>(&mut self, host: &mut H, id: RangeId, fragment: N) -> Result<N, Error>
    where
        H: Host<Node = N>,
    {
        if !self.is_alive(id) {
            return Err(Error::StaleRange);
        }
        if host.first_child(fragment).is_none() {
            return Err(Error::EmptyFragment);
        }
        let parent = self.container_node(host, id).ok_or(Error::Detached)?;
        if host.is_inclusive_ancestor(fragment, parent) {
            return Err(Error::InsertIntoSelf);
        }

        self.operate(host, id, |host, old_start, old_end| {
            host.move_children_before(fragment, parent, Some(old_start));
            let old = host.create_fragment();
            let mut walk = Some(old_start);
            while let Some(n) = walk {
                let next = host.next_sibling(n);
                host.remove_child(parent, n);
                host.insert_before(old, n, None);
                if n == old_end {
                    break;
                }
                walk = next;
            }
            old
        })
    }

    /// Insert the children of `fragment` immediately before `id`.
    ///
    /// The new nodes end up outside `id` but inside every range enclosing
    /// it, including enclosing ranges that used to start at the same node.
    /// An empty fragment is a no-op.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleRange`] if `id` has been destroyed.
    /// - [`Error::Detached`] if the range's nodes have no parent.
    /// - [`Error::InsertIntoSelf`] if the range lies inside `fragment`.
    pub fn insert_before<H>(&mut self, host: &mut H, id: RangeId, fragment: N) -> Result<(), Error>
    where
        H: Host<Node = N>,
    {
        let r = self.record(id).ok_or(Error::StaleRange)?;
        let (tag, start, start_index) = (r.tag, r.start, r.start_index);
        let Some(frag_start) = host.first_child(fragment) else {
            return Ok(());
        };
        let parent = host.parent(start).ok_or(Error::Detached)?;
        if host.is_inclusive_ancestor(fragment, parent) {
            return Err(Error::InsertIntoSelf);
        }

        host.move_children_before(fragment, parent, Some(start));
        let moved = self.remove_entries(start, tag, Edge::Start, ..start_index);
        self.insert_entries(frag_start, tag, Edge::Start, 0, &moved);
        log::trace!("inserted before {id:?}, moved {} starts", moved.len());
        Ok(())
    }

    /// Insert the children of `fragment` immediately after `id`.
    ///
    /// Mirror image of [`insert_before`](Self::insert_before).
    ///
    /// # Errors
    ///
    /// - [`Error::StaleRange`] if `id` has been destroyed.
    /// - [`Error::Detached`] if the range's nodes have no parent.
    /// - [`Error::InsertIntoSelf`] if the range lies inside `fragment`.
    pub fn insert_after<H>(&mut self, host: &mut H, id: RangeId, fragment: N) -> Result<(), Error>
    where
        H: Host<Node = N>,
    {
        let r = self.record(id).ok_or(Error::StaleRange)?;
        let (tag, end, end_index) = (r.tag, r.end, r.end_index);
        let Some(frag_end) = host.last_child(fragment) else {
            return Ok(());
        };
        let parent = host.parent(end).ok_or(Error::Detached)?;
        if host.is_inclusive_ancestor(fragment, parent) {
            return Err(Error::InsertIntoSelf);
        }

        let after = host.next_sibling(end);
        host.move_children_before(fragment, parent, after);
        let moved = self.remove_entries(end, tag, Edge::End, end_index + 1..);
        let at = self.slots.list(frag_end, tag, Edge::End).len();
        self.insert_entries(frag_end, tag, Edge::End, at, &moved);
        log::trace!("inserted after {id:?}, moved {} ends", moved.len());
        Ok(())
    }

    /// Move `id` and its contents out of the host into a new fragment.
    ///
    /// Enclosing ranges that started or ended at the range's boundary nodes
    /// are re-anchored on the neighboring siblings.
    ///
    /// Returns `None`, without touching anything, if the immediately
    /// enclosing range covers exactly the same nodes (it would be left
    /// empty). `None` is also returned when `id` is stale or its nodes have
    /// no parent; check [`is_alive`](Self::is_alive) and
    /// [`container_node`](Self::container_node) to tell those apart.
    pub fn extract<H>(&mut self, host: &mut H, id: RangeId) -> Option<N>
    where
        H: Host<Node = N>,
    {
        let r = self.record(id)?;
        let (tag, start, end, start_index, end_index) =
            (r.tag, r.start, r.end, r.start_index, r.end_index);
        let Some(parent) = host.parent(start) else {
            log::debug!("cannot extract {id:?}: its nodes have no parent");
            return None;
        };

        if start_index > 0 {
            let enclosing = self.slots.list(start, tag, Edge::Start)[start_index - 1];
            if self.rec(enclosing).end == end {
                log::debug!("refusing to extract {id:?}: {enclosing:?} would be left empty");
                return None;
            }
        }

        let before = host.prev_sibling(start);
        let after = host.next_sibling(end);

        if start_index > 0 {
            // Ranges starting here outside us end on a later sibling.
            let Some(after) = after else {
                unreachable!("an enclosing range starting at {start:?} must end after {end:?}");
            };
            let moved = self.remove_entries(start, tag, Edge::Start, ..start_index);
            self.insert_entries(after, tag, Edge::Start, 0, &moved);
        }
        if end_index + 1 < self.slots.list(end, tag, Edge::End).len() {
            // Likewise, ranges ending here outside us start earlier.
            let Some(before) = before else {
                unreachable!("an enclosing range ending at {end:?} must start before {start:?}");
            };
            let moved = self.remove_entries(end, tag, Edge::End, end_index + 1..);
            let at = self.slots.list(before, tag, Edge::End).len();
            self.insert_entries(before, tag, Edge::End, at, &moved);
        }

        let result = host.create_fragment();
        loop {
            let next = match before {
                Some(b) => host.next_sibling(b),
                None => host.first_child(parent),
            };
            match next {
                Some(n) if Some(n) != after => {
                    host.remove_child(parent, n);
                    host.insert_before(result, n, None);
                }
                _ => break,
            }
        }
        log::debug!("extracted {id:?} into {result:?}");
        Some(result)
    }

    /// Move every range of `tag` starting or ending at `source` over to
    /// `target`.
    ///
    /// For swapping a node for an equivalent one, one pair at a time, when a
    /// whole tracked subtree is rebuilt.
    ///
    /// # Panics
    ///
    /// If `target` already carries ranges of `tag`.
    pub fn transplant_tag(&mut self, tag: Tag, target: N, source: N) {
        let Some(slot) = self.slots.take(source, tag) else {
            return;
        };
        assert!(
            self.slots.get(target, tag).is_none(),
            "transplant target already holds ranges of {tag:?}"
        );
        for &id in slot.list(Edge::Start) {
            self.rec_mut(id).start = target;
        }
        for &id in slot.list(Edge::End) {
            self.rec_mut(id).end = target;
        }
        log::debug!(
            "transplanted {tag:?} from {source:?} to {target:?} ({} starts, {} ends)",
            slot.list(Edge::Start).len(),
            slot.list(Edge::End).len()
        );
        self.slots.put(target, tag, slot);
    }

    /// Re-home `id` onto the siblings `target_start..=target_end`, typically
    /// in another tree.
    ///
    /// The ranges enclosing `id` at its current boundary nodes are re-homed
    /// along with it. The entries on the old boundary nodes are copied, not
    /// moved: the old nodes are expected to be discarded, after which
    /// [`release_subtree`](Self::release_subtree) drops what is left there.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleRange`] if `id` has been destroyed.
    /// - [`Error::Detached`] if `target_start` has no parent.
    /// - [`Error::NotSiblings`] if `target_end` does not follow `target_start`.
    pub fn transplant_range<H>(
        &mut self,
        host: &H,
        target_start: N,
        target_end: N,
        id: RangeId,
    ) -> Result<(), Error>
    where
        H: Host<Node = N>,
    {
        let r = self.record(id).ok_or(Error::StaleRange)?;
        let (tag, start, end, start_index, end_index) =
            (r.tag, r.start, r.end, r.start_index, r.end_index);
        if host.parent(target_start).is_none() {
            return Err(Error::Detached);
        }
        if !host.siblings_in_order(target_start, target_end) {
            return Err(Error::NotSiblings);
        }

        let starts: EntryList = self.slots.list(start, tag, Edge::Start)[..=start_index].into();
        let ends: EntryList = self.slots.list(end, tag, Edge::End)[end_index..].into();
        self.insert_entries(target_start, tag, Edge::Start, 0, &starts);
        self.insert_entries(target_end, tag, Edge::End, 0, &ends);
        log::debug!("transplanted {id:?} to {target_start:?}..={target_end:?}");
        Ok(())
    }

    /// Forget `root` and all of its descendants.
    ///
    /// Every slot on those nodes is dropped and every range still anchored
    /// there is destroyed. Entries such a range has on nodes outside the
    /// subtree (possible only when `root` is itself a boundary node) are
    /// removed as well. Call this before discarding a host subtree, or after
    /// [`transplant_range`](Self::transplant_range) to drop the copied
    /// entries left on the source.
    pub fn release_subtree<H>(&mut self, host: &H, root: N)
    where
        H: Host<Node = N>,
    {
        let mut nodes = HashSet::new();
        let mut stack = alloc::vec![root];
        while let Some(n) = stack.pop() {
            nodes.insert(n);
            let mut child = host.first_child(n);
            while let Some(c) = child {
                stack.push(c);
                child = host.next_sibling(c);
            }
        }

        let mut doomed = Vec::new();
        for &n in &nodes {
            for (_, slot) in self.slots.tags_at(n) {
                for &id in slot.list(Edge::Start) {
                    if self.record(id).is_some_and(|r| r.start == n) {
                        doomed.push(id);
                    }
                }
                for &id in slot.list(Edge::End) {
                    if self.record(id).is_some_and(|r| r.end == n) {
                        doomed.push(id);
                    }
                }
            }
        }
        for &n in &nodes {
            self.slots.remove_node(n);
        }

        let mut released = 0_usize;
        for id in doomed {
            let Some(r) = self.record(id) else {
                continue;
            };
            let (tag, start, end, start_index, end_index) =
                (r.tag, r.start, r.end, r.start_index, r.end_index);
            if !nodes.contains(&start) {
                self.remove_entries(start, tag, Edge::Start, start_index..=start_index);
            }
            if !nodes.contains(&end) {
                self.remove_entries(end, tag, Edge::End, end_index..=end_index);
            }
            self.free(id);
            released += 1;
        }
        log::debug!(
            "released subtree {root:?}: {} nodes, {released} ranges",
            nodes.len()
        );
    }
}
