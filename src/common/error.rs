//! Error types for the B-tree index.

use thiserror::Error;

use crate::common::config::MIN_ORDER;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the index.
///
/// Searches and deletes of absent keys are not errors; they come back as
/// `false`. The variants below are either caller mistakes (`InvalidOrder`,
/// `EmptyTree`) or contract violations in node-level code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A node was asked to store a key it already holds.
    ///
    /// The tree-level `insert` checks for the key first, so this only
    /// escapes from direct node manipulation.
    #[error("Duplicate key insertion is not allowed")]
    DuplicateKey,

    /// `delete` was called on a tree with no root.
    #[error("Tree is empty, cannot delete")]
    EmptyTree,

    /// A positional accessor was given an index outside its bounds.
    ///
    /// This indicates a bug in the caller.
    #[error("Index {index} out of range (bound {bound})")]
    OutOfRange { index: usize, bound: usize },

    /// The requested branching order is below [`MIN_ORDER`].
    #[error("Invalid order {0}: must be at least {}", MIN_ORDER)]
    InvalidOrder(usize),

    /// A structural check found a broken invariant.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}
