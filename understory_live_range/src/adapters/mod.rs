// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the core index stays free of host
//! dependencies.
//!
//! ## Available Adapters
//!
//! - [`node_tree`] (`node_tree_adapter` feature, on by default): [`Host`](crate::Host) for
//!   [`understory_node_tree::Tree`].

#[cfg(feature = "node_tree_adapter")]
pub mod node_tree;
