// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first traversal of a range's contents.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use crate::host::Host;
use crate::ranges::LiveRanges;
use crate::types::{Edge, Flow, RangeId, Tag, VisitEvent};

impl<N: Copy + Eq + Hash + Debug> LiveRanges<N> {
    /// Walk the contents of `id` in document order.
    ///
    /// Ranges of the same tag nested inside are reported with
    /// [`VisitEvent::EnterRange`]/[`VisitEvent::LeaveRange`]; nodes outside
    /// any nested range (at the current level) with
    /// [`VisitEvent::EnterNode`]/[`VisitEvent::LeaveNode`]. The range itself
    /// is not reported. Returning [`Flow::Skip`] from an enter event skips the
    /// contents; the matching leave event is still delivered.
    ///
    /// Nothing happens for a stale id.
    pub fn visit<H, F>(&self, host: &H, id: RangeId, mut f: F)
    where
        H: Host<Node = N>,
        F: FnMut(VisitEvent<N>) -> Flow,
    {
        let Some(r) = self.record(id) else {
            return;
        };
        self.walk(host, r.tag, r.start, r.end, r.start_index + 1, &mut f);
    }

    /// Ranges of the same tag directly inside `id`, in document order.
    pub fn children<H>(&self, host: &H, id: RangeId) -> Vec<RangeId>
    where
        H: Host<Node = N>,
    {
        let mut out = Vec::new();
        self.visit(host, id, |event| match event {
            VisitEvent::EnterRange(r) => {
                out.push(r);
                Flow::Skip
            }
            _ => Flow::Continue,
        });
        out
    }

    /// Visit the siblings `start..=end`, where the first `skip` ranges
    /// starting at `start` enclose the walk and are not reported.
    fn walk<H, F>(&self, host: &H, tag: Tag, start: N, end: N, skip: usize, f: &mut F)
    where
        H: Host<Node = N>,
        F: FnMut(VisitEvent<N>) -> Flow,
    {
        let after = host.next_sibling(end);
        let mut skip = skip;
        let mut current = Some(start);
        while let Some(n) = current {
            if Some(n) == after {
                break;
            }
            let starts = self.slots.list(n, tag, Edge::Start);
            let resume = if let Some(&child) = starts.get(skip) {
                // A nested range begins here; it covers `n` and owns the run
                // up to its own end.
                let r = self.rec(child);
                let (child_start, child_end) = (r.start, r.end);
                if f(VisitEvent::EnterRange(child)) == Flow::Continue {
                    self.walk(host, tag, child_start, child_end, skip + 1, f);
                }
                f(VisitEvent::LeaveRange(child));
                child_end
            } else {
                if f(VisitEvent::EnterNode(n)) == Flow::Continue
                    && let (Some(first), Some(last)) = (host.first_child(n), host.last_child(n))
                {
                    self.walk(host, tag, first, last, 0, f);
                }
                f(VisitEvent::LeaveNode(n));
                n
            };
            skip = 0;
            current = host.next_sibling(resume);
        }
    }
}

#[cfg(all(test, feature = "node_tree_adapter"))]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::testing::Fixture;
    use crate::{Flow, Nesting, VisitEvent};

    #[test]
    fn events_are_balanced_and_ordered() {
        let mut fx = Fixture::new();
        let k = fx.children(&["1", "2"]);
        let inner = fx.tree.create_element("x");
        fx.tree.append_child(k[1], inner);
        let outer = fx.create("a", k[0], k[1], Nesting::Outer);
        let nested = fx.create("b", inner, inner, Nesting::Outer);

        let mut events = Vec::new();
        fx.ranges.visit(&fx.tree, outer, |e| {
            events.push(e);
            Flow::Continue
        });
        assert_eq!(
            events,
            vec![
                VisitEvent::EnterNode(k[0]),
                VisitEvent::LeaveNode(k[0]),
                VisitEvent::EnterNode(k[1]),
                VisitEvent::EnterRange(nested),
                VisitEvent::EnterNode(inner),
                VisitEvent::LeaveNode(inner),
                VisitEvent::LeaveRange(nested),
                VisitEvent::LeaveNode(k[1]),
            ]
        );
    }

    #[test]
    fn skip_still_delivers_the_leave_event() {
        let mut fx = Fixture::new();
        let k = fx.children(&["1"]);
        let inner = fx.tree.create_element("x");
        fx.tree.append_child(k[0], inner);
        let outer = fx.create_over_root("a", Nesting::Outer);

        let mut events = Vec::new();
        fx.ranges.visit(&fx.tree, outer, |e| {
            events.push(e);
            Flow::Skip
        });
        assert_eq!(
            events,
            vec![VisitEvent::EnterNode(k[0]), VisitEvent::LeaveNode(k[0])]
        );
    }

    #[test]
    fn same_span_ranges_are_reported_inside_out() {
        let mut fx = Fixture::new();
        let k = fx.children(&["1"]);
        let ids: Vec<_> = ["5", "4", "3", "2", "1"]
            .iter()
            .map(|n| fx.create(n, k[0], k[0], Nesting::Outer))
            .collect();
        let mut seen = Vec::new();
        fx.ranges.visit(&fx.tree, ids[3], |e| {
            match e {
                VisitEvent::EnterRange(r) => seen.push((true, r)),
                VisitEvent::LeaveRange(r) => seen.push((false, r)),
                _ => {}
            }
            Flow::Continue
        });
        assert_eq!(
            seen,
            vec![
                (true, ids[2]),
                (true, ids[1]),
                (true, ids[0]),
                (false, ids[0]),
                (false, ids[1]),
                (false, ids[2]),
            ]
        );
    }

    #[test]
    fn stale_ranges_visit_nothing() {
        let mut fx = Fixture::new();
        fx.children(&["1"]);
        let a = fx.create_over_root("a", Nesting::Outer);
        fx.ranges.destroy(&fx.tree, a, false);
        let mut called = false;
        fx.ranges.visit(&fx.tree, a, |_| {
            called = true;
            Flow::Continue
        });
        assert!(!called);
        assert!(fx.ranges.children(&fx.tree, a).is_empty());
    }
}
