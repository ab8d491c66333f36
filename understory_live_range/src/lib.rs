// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_live_range --heading-base-level=0

//! Understory Live Range: named, properly nested sibling ranges over a mutable tree.
//!
//! ## Overview
//!
//! A live range marks a contiguous run of siblings (and everything below them) in a host tree,
//! for example the nodes produced by one template invocation. Ranges carry a [`Tag`]; ranges with
//! the same tag always nest properly, so they form a forest that can be walked and queried
//! independently of the tree they sit on.
//!
//! Ranges survive edits without being notified of them. Each range is listed at its first and
//! last node only, so inserting, removing or rearranging nodes in the middle of a range (or
//! anywhere else) needs no bookkeeping at all. Edits that replace a range's boundary nodes go
//! through the range itself ([`LiveRanges::replace_contents`], [`LiveRanges::operate`],
//! [`LiveRanges::insert_before`], [`LiveRanges::insert_after`], [`LiveRanges::extract`]), which
//! carries nested and enclosing ranges along.
//!
//! ## Nesting
//!
//! A new range is placed inside every range of its tag that reaches further than it does, and
//! around every range that reaches less far. Only when existing ranges cover exactly the same
//! nodes is there a choice, made by [`Nesting`]: [`Nesting::Outer`] wraps them,
//! [`Nesting::Inner`] sits inside them. Construction order never matters otherwise.
//!
//! ## Hosts
//!
//! Anything implementing [`Host`] can carry ranges: it needs sibling and parent navigation,
//! `insert_before`/`remove_child`, and a way to make a detached fragment. The
//! `node_tree_adapter` feature (on by default) implements it for
//! [`understory_node_tree::Tree`].
//!
//! ```rust
//! use understory_live_range::{Flow, LiveRanges, Nesting, Tag, VisitEvent};
//! use understory_node_tree::Tree;
//!
//! const BLOCKS: Tag = Tag(0);
//!
//! let mut tree = Tree::new();
//! let body = tree.create_element("body");
//! let header = tree.create_element("header");
//! let list = tree.create_element("ul");
//! tree.append_child(body, header);
//! tree.append_child(body, list);
//!
//! let mut ranges = LiveRanges::new();
//! let page = ranges
//!     .create_over_children(&tree, BLOCKS, body, Nesting::Outer)
//!     .unwrap();
//! let items = ranges.create(&tree, BLOCKS, list, list, Nesting::Outer).unwrap();
//!
//! // Re-render the list block: the old `ul` comes back in a fragment.
//! let fresh = tree.create_fragment();
//! let new_list = tree.create_element("ol");
//! tree.append_child(fresh, new_list);
//! let old = ranges.replace_contents(&mut tree, items, fresh).unwrap();
//! assert_eq!(tree.first_child(old), Some(list));
//!
//! // The page block followed its last node.
//! assert_eq!(ranges.last_node(page), Some(new_list));
//!
//! let mut entered = Vec::new();
//! ranges.visit(&tree, page, |event| {
//!     if let VisitEvent::EnterRange(r) = event {
//!         entered.push(r);
//!     }
//!     Flow::Continue
//! });
//! assert_eq!(entered, [items]);
//! ```
//!
//! ## Errors and panics
//!
//! Violated preconditions that can be detected up front (detached or out-of-order endpoints, an
//! empty fragment, a destroyed range) are returned as [`Error`] before anything changes. An
//! [`operate`](LiveRanges::operate) closure that removes every node is only detected halfway
//! through and panics. [`extract`](LiveRanges::extract) refusing to empty an enclosing range
//! returns `None`.
//!
//! ## Logging
//!
//! Range creation and destruction are logged at `trace` level and bulk operations at `debug`
//! level through the [`log`] facade. No logger is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
mod error;
mod host;
mod index;
mod mutate;
mod position;
mod query;
mod ranges;
#[cfg(all(test, feature = "node_tree_adapter"))]
mod testing;
mod types;
mod visit;

pub use error::Error;
pub use host::Host;
pub use ranges::LiveRanges;
pub use types::{Flow, Nesting, RangeId, Tag, VisitEvent};
