// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_node_tree --heading-base-level=0

//! Understory Node Tree: an ordered, mutable arena tree with DOM-style navigation.
//!
//! Understory Node Tree is a small building block for document models, retained UIs, and anything
//! else that needs a tree whose children are ordered and edited in place.
//!
//! - Represents elements, text, comments, and detached fragments.
//! - Navigates with the familiar DOM vocabulary: parent, first/last child, previous/next sibling.
//! - Edits with `insert_before`/`remove_child`, including fragment insertion that moves a whole
//!   run of siblings at once.
//!
//! It does no layout, styling, or rendering. Higher layers attach their own bookkeeping to
//! [`NodeId`]s (for example `understory_live_range`, which tracks named sibling spans through edits).
//!
//! ## API overview
//!
//! - [`Tree`]: arena owning all nodes.
//! - [`NodeId`]: generational handle of a node.
//! - [`NodeKind`]: what a node holds.
//!
//! Key operations:
//! - [`Tree::create_element`] / [`Tree::create_text`] / [`Tree::create_comment`] /
//!   [`Tree::create_fragment`] → detached [`NodeId`]
//! - [`Tree::append_child`] / [`Tree::insert_before`] / [`Tree::remove_child`]
//! - [`Tree::remove`] frees a subtree; its identifiers become stale.
//! - [`Tree::parent_of`], [`Tree::first_child`], [`Tree::last_child`], [`Tree::next_sibling`],
//!   [`Tree::prev_sibling`], [`Tree::children_of`].
//! - [`Tree::next_depth_first`] and [`Tree::prev_depth_first`] provide depth-first tree traversal.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{Children, Tree};
pub use types::{NodeId, NodeKind};
