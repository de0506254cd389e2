//! btree-index - an in-memory ordered B-tree with split, borrow and merge
//! rebalancing.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          btree-index                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                BTree (index/btree/tree)                  │   │
//! │  │     search · insert (split up) · delete (fix down)       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Node (index/btree/node)                   │   │
//! │  │   ordered keys · owned children · split · borrow · merge │   │
//! │  │             SplitResult handed to the parent             │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                   Common (common/)                       │   │
//! │  │        Error + Result · order and occupancy bounds       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (Error, Result, config)
//! - [`index`] - Index structures (B-tree)
//!
//! # Quick Start
//! ```
//! use btree_index::BTree;
//!
//! let mut tree = BTree::new(5).unwrap();
//! for key in [50, 10, 40, 20, 30] {
//!     tree.insert(key).unwrap();
//! }
//!
//! // Duplicate inserts are ignored.
//! assert!(!tree.insert(30).unwrap());
//!
//! tree.delete(&40).unwrap();
//! assert_eq!(tree.keys(), vec![10, 20, 30, 50]);
//! tree.validate().unwrap();
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, MIN_ORDER};
pub use common::{Error, Result};

pub use index::btree::{BTree, Iter, Node, SplitResult, StatsSnapshot, TreeStats};
