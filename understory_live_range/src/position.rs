// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion position of a new range within an endpoint list.
//!
//! A start list is ordered outside-in: ranges ending at later siblings come
//! first, then ranges ending at the same sibling as ours, then ranges ending
//! earlier. An end list is ordered inside-out, mirrored on start siblings.
//! The new range must land inside the ones reaching further and outside the
//! ones reaching less far; ties (identical span) are broken by [`Nesting`].
//!
//! We cannot compare sibling positions directly, so a sibling pointer walks
//! backwards from the far side while the list is scanned from the front.
//! Because both move in the same direction, one joint pass suffices: the
//! worst case is a single walk over the siblings between the two candidates.

use crate::host::Host;
use crate::types::{Edge, Nesting};

/// Index at which a range spanning `near..=far` (or `far..=near` for an end
/// list) goes in the `list` endpoint list at `near`.
///
/// `far_edges[i]` is the opposite endpoint of the `i`-th range already in the
/// list: its end for a start list, its start for an end list.
pub(crate) fn find_position<H: Host>(
    host: &H,
    far_edges: &[H::Node],
    list: Edge,
    near: H::Node,
    far: H::Node,
    nesting: Nesting,
) -> usize {
    // Invariant: `n` is `far` or a sibling after it.
    let (mut n, take_first) = match list {
        Edge::Start => (
            host.parent(far)
                .and_then(|p| host.last_child(p))
                .unwrap_or(far),
            nesting == Nesting::Outer,
        ),
        Edge::End => (near, nesting == Nesting::Inner),
    };

    let mut index = far_edges.len();
    for i in 0..=far_edges.len() {
        let current = far_edges.get(i).copied();
        while Some(n) != current && n != far {
            let Some(prev) = host.prev_sibling(n) else {
                unreachable!("sibling walk ran past the edge of the new range");
            };
            n = prev;
        }
        if current == Some(far) {
            // Same span: a candidate. Outer takes the first, inner the last.
            index = i;
            if take_first {
                break;
            }
        } else if n == far {
            // Everything from here on reaches less far than we do.
            index = i;
            break;
        }
    }
    index
}
