//! Index structures.
//!
//! - [`btree`] - Ordered in-memory B-tree

pub mod btree;
