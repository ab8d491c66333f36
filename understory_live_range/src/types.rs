// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: range handles, tags, nesting preference, and traversal events.

/// Identifier for a live range (generational).
///
/// A `RangeId` becomes stale once its range is destroyed; queries on a stale
/// id return `None`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RangeId(u32, u32);

impl RangeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Namespace for a family of ranges.
///
/// Ranges only nest with (and only see) ranges of the same tag. Different
/// tags over the same nodes are fully independent. The value is opaque;
/// pick distinct constants per family.
///
/// ```rust
/// use understory_live_range::Tag;
///
/// const TEMPLATES: Tag = Tag(1);
/// const SELECTIONS: Tag = Tag(2);
/// assert_ne!(TEMPLATES, SELECTIONS);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u32);

/// Where a new range goes relative to existing ranges of the same tag that
/// cover exactly the same nodes.
///
/// When no existing range shares the new range's exact span, the nesting is
/// fully determined by position and this preference is ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Nesting {
    /// Wrap every existing range with the same span.
    #[default]
    Outer,
    /// Sit inside every existing range with the same span.
    Inner,
}

/// One step of a [`LiveRanges::visit`](crate::LiveRanges::visit) walk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VisitEvent<N> {
    /// Entering a nested range of the visited range's tag.
    EnterRange(RangeId),
    /// Leaving a nested range.
    LeaveRange(RangeId),
    /// Entering a host node that does not start a (not yet entered) range.
    EnterNode(N),
    /// Leaving a host node.
    LeaveNode(N),
}

/// Returned from a visit callback to control descent.
///
/// Only meaningful for enter events; the value returned for leave events is
/// ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Flow {
    /// Descend into the entered range or node.
    #[default]
    Continue,
    /// Skip the contents; the matching leave event follows immediately.
    Skip,
}

/// Which endpoint list of a tag slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Edge {
    /// Ranges starting at the node, outermost first.
    Start,
    /// Ranges ending at the node, innermost first.
    End,
}

impl Edge {
    pub(crate) const fn idx(self) -> usize {
        match self {
            Self::Start => 0,
            Self::End => 1,
        }
    }
}
