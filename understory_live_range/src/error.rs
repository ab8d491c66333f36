// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for range construction and editing.

use thiserror::Error;

/// Precondition violations reported by [`LiveRanges`](crate::LiveRanges).
///
/// These are programming errors in the caller. They are reported before any
/// bookkeeping or host mutation happens, so the index is intact when one is
/// returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A range endpoint has no parent node.
    #[error("range start and end must have a parent")]
    Detached,
    /// The end node is not the start node or one of its following siblings.
    #[error("range start and end must be siblings in order")]
    NotSiblings,
    /// A container given as the whole span has no children.
    #[error("a range must contain at least one node")]
    EmptyContainer,
    /// Replacement content has no nodes.
    #[error("replacement content must not be empty")]
    EmptyFragment,
    /// Inserted content would end up inside itself.
    #[error("content cannot be inserted into its own subtree")]
    InsertIntoSelf,
    /// The range was destroyed.
    #[error("range has been destroyed")]
    StaleRange,
}
