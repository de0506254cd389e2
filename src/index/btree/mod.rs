//! In-memory B-tree index.
//!
//! # Components
//! - [`BTree`] - The tree handle: search, insert, delete
//! - [`Node`] - A single node: ordered keys plus owned children
//! - [`SplitResult`] - Middle key and right sibling handed up after a split
//! - [`Iter`] - Ascending in-order traversal
//! - [`TreeStats`] - Operation and rebalancing counters
//!
//! # Occupancy
//! For a tree of order `m`, every node holds at most `m - 1` keys between
//! operations and every non-root node at least `ceil(m / 2) - 1`. Inserts
//! restore the upper bound by splitting on the way back up; deletes protect
//! the lower bound by borrowing or merging on the way down.

mod iter;
mod node;
mod split;
mod stats;
mod tree;

pub use iter::Iter;
pub use node::Node;
pub use split::SplitResult;
pub use stats::{StatsSnapshot, TreeStats};
pub use tree::BTree;
