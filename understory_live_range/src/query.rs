// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enclosing-range lookups.
//!
//! Both queries scan forward through the endpoint index instead of walking
//! the tree: an enclosing range must end at or after the point we start from,
//! and any range that *starts* on the way is a sibling of ours that can be
//! jumped over in one step.

use core::fmt::Debug;
use core::hash::Hash;

use crate::host::Host;
use crate::ranges::LiveRanges;
use crate::types::{Edge, RangeId, Tag};

impl<N: Copy + Eq + Hash + Debug> LiveRanges<N> {
    /// The range immediately enclosing `id`.
    ///
    /// With `within_container`, only ranges over siblings of `id`'s nodes
    /// are considered. Otherwise the search continues with the ranges
    /// enclosing `id`'s container node, and so on up the tree.
    ///
    /// Returns `None` for a stale id or when nothing encloses `id`.
    pub fn find_parent<H>(&self, host: &H, id: RangeId, within_container: bool) -> Option<RangeId>
    where
        H: Host<Node = N>,
    {
        let r = self.record(id)?;
        if let Some(found) = self.enclosing(host, r.tag, r.end, r.end_index + 1) {
            return Some(found);
        }
        if within_container {
            return None;
        }
        self.find_range(host, r.tag, host.parent(r.start)?)
    }

    /// The innermost range of `tag` containing `node`.
    pub fn find_range<H>(&self, host: &H, tag: Tag, node: N) -> Option<RangeId>
    where
        H: Host<Node = N>,
    {
        let mut current = node;
        loop {
            if let Some(found) = self.enclosing(host, tag, current, 0) {
                return Some(found);
            }
            current = host.parent(current)?;
        }
    }

    /// First range ending at `end` from position `end_index` on, or else at
    /// a following sibling, skipping over sibling ranges.
    fn enclosing<H>(&self, host: &H, tag: Tag, end: N, end_index: usize) -> Option<RangeId>
    where
        H: Host<Node = N>,
    {
        if let Some(&found) = self.slots.list(end, tag, Edge::End).get(end_index) {
            return Some(found);
        }
        let mut next = host.next_sibling(end);
        while let Some(mut node) = next {
            let mut index = 0;
            if let Some(&sibling) = self.slots.list(node, tag, Edge::Start).first() {
                let r = self.rec(sibling);
                node = r.end;
                index = r.end_index + 1;
            }
            if let Some(&found) = self.slots.list(node, tag, Edge::End).get(index) {
                return Some(found);
            }
            next = host.next_sibling(node);
        }
        None
    }
}
