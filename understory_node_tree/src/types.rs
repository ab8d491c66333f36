// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the node tree: node identifiers and node kinds.

use alloc::string::String;

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a node holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with a name (for example `div`).
    Element(String),
    /// A text run.
    Text(String),
    /// A comment; useful as an invisible placeholder.
    Comment(String),
    /// A detached container whose children move as a unit when it is inserted.
    ///
    /// See [`Tree::insert_before`](crate::Tree::insert_before).
    Fragment,
}

impl NodeKind {
    /// Returns true for [`NodeKind::Fragment`].
    pub const fn is_fragment(&self) -> bool {
        matches!(self, Self::Fragment)
    }

    /// The element name, if this is an element.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Element(name) => Some(name),
            _ => None,
        }
    }
}
