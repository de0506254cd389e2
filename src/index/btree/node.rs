//! A single B-tree node.
//!
//! A [`Node`] owns an ordered run of keys and, when internal, one more
//! child than it has keys. Children are owned exclusively through `Box`,
//! so the node graph is a strict tree with no back references.
//!
//! # Layout
//! ```text
//!            keys:   [ k0 | k1 | k2 ]
//!        children: [ c0 | c1 | c2 | c3 ]
//!
//!   c0 < k0 < c1 < k1 < c2 < k2 < c3
//! ```
//!
//! Key storage is reserved for `order` keys and child storage for
//! `order + 1` children when the node is created. A node holding `order`
//! keys is overflowed and must be split before the enclosing operation
//! returns, so inserts and splits never reallocate.

use std::fmt;

use tracing::trace;

use super::split::SplitResult;
use super::stats::TreeStats;
use crate::common::config::{max_keys, min_keys, MIN_ORDER};
use crate::common::{Error, Result};

/// A B-tree node.
///
/// # Example
/// ```
/// use btree_index::Node;
///
/// let mut node = Node::new_leaf(5).unwrap();
/// for key in [30, 10, 50, 20, 40] {
///     node.insert_not_overflow(key).unwrap();
/// }
/// assert!(node.is_overflow());
///
/// let split = node.split();
/// assert_eq!(node.keys(), &[10, 20]);
/// assert_eq!(*split.middle_key(), 30);
/// assert_eq!(split.right_node().keys(), &[40, 50]);
/// ```
#[derive(Debug, Clone)]
pub struct Node<K = i64> {
    /// Maximum number of children; identical across one tree.
    order: usize,

    /// Sorted, unique keys. `keys.len()` is the node's size.
    keys: Vec<K>,

    /// Owned children; empty for leaves, `keys.len() + 1` entries otherwise.
    children: Vec<Box<Node<K>>>,

    /// Whether this node sits at the bottom level.
    leaf: bool,
}

impl<K> Node<K> {
    /// Create an empty leaf node.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order` is below [`MIN_ORDER`]
    pub fn new_leaf(order: usize) -> Result<Self> {
        Self::check_order(order)?;
        Ok(Self::empty(order, true))
    }

    /// Create an empty internal node.
    ///
    /// Its children are installed with [`Node::insert_child`].
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order` is below [`MIN_ORDER`]
    pub fn new_internal(order: usize) -> Result<Self> {
        Self::check_order(order)?;
        Ok(Self::empty(order, false))
    }

    fn check_order(order: usize) -> Result<()> {
        if order < MIN_ORDER {
            return Err(Error::InvalidOrder(order));
        }
        Ok(())
    }

    /// Allocate a node with storage reserved for an overflowed state.
    pub(crate) fn empty(order: usize, leaf: bool) -> Self {
        Self {
            order,
            keys: Vec::with_capacity(order),
            children: if leaf {
                Vec::new()
            } else {
                Vec::with_capacity(order + 1)
            },
            leaf,
        }
    }

    /// Build the internal node that sits above a split root.
    pub(crate) fn new_root(left: Box<Node<K>>, split: SplitResult<K>) -> Self {
        let (middle_key, right) = split.into_parts();
        let mut root = Self::empty(left.order, false);
        root.keys.push(middle_key);
        root.children.push(left);
        root.children.push(right);
        root
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The branching order this node was created with.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of keys currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// True once the node holds `order` keys and has to be split.
    #[inline]
    pub fn is_overflow(&self) -> bool {
        self.keys.len() >= self.order
    }

    /// Minimum number of keys this node must keep when it is not the root.
    #[inline]
    pub fn min_keys(&self) -> usize {
        min_keys(self.order)
    }

    /// Maximum number of keys this node holds between operations.
    #[inline]
    pub fn max_keys(&self) -> usize {
        max_keys(self.order)
    }

    /// The populated keys, ascending.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The populated children, left to right.
    #[inline]
    pub fn children(&self) -> &[Box<Node<K>>] {
        &self.children
    }

    /// Key at `index`.
    ///
    /// # Errors
    /// - `Error::OutOfRange` if `index >= len()`
    pub fn key(&self, index: usize) -> Result<&K> {
        self.keys.get(index).ok_or(Error::OutOfRange {
            index,
            bound: self.keys.len(),
        })
    }

    /// Child at `index`.
    ///
    /// # Errors
    /// - `Error::OutOfRange` if there is no child at `index` (always the
    ///   case for leaves)
    pub fn child(&self, index: usize) -> Result<&Node<K>> {
        self.children
            .get(index)
            .map(|child| &**child)
            .ok_or(Error::OutOfRange {
                index,
                bound: self.children.len(),
            })
    }

    /// Replace the child at `index`, or append when `index == children().len()`.
    ///
    /// Returns the replaced child, if any.
    ///
    /// # Errors
    /// - `Error::OutOfRange` if the node is a leaf, if `index` would leave a
    ///   gap, or if appending would exceed the `order + 1` child slots
    pub fn set_child(&mut self, index: usize, child: Box<Node<K>>) -> Result<Option<Box<Node<K>>>> {
        if !self.leaf && index < self.children.len() {
            return Ok(Some(std::mem::replace(&mut self.children[index], child)));
        }
        self.insert_child(index, child)?;
        Ok(None)
    }

    /// Insert a child at `index`, shifting the children at and after it
    /// one slot right.
    ///
    /// This is the second half of installing a promoted key in an internal
    /// node: after `insert_not_overflow` returns slot `i`, the new right
    /// sibling goes to `i + 1`.
    ///
    /// # Errors
    /// - `Error::OutOfRange` if the node is a leaf, if `index` is past the
    ///   end, or if all `order + 1` child slots are taken
    pub fn insert_child(&mut self, index: usize, child: Box<Node<K>>) -> Result<()> {
        if self.leaf {
            return Err(Error::OutOfRange { index, bound: 0 });
        }
        if self.children.len() > self.order {
            return Err(Error::OutOfRange {
                index,
                bound: self.order + 1,
            });
        }
        if index > self.children.len() {
            return Err(Error::OutOfRange {
                index,
                bound: self.children.len() + 1,
            });
        }
        self.children.insert(index, child);
        Ok(())
    }

    /// Smallest key in this subtree (leftmost walk).
    pub fn min_key(&self) -> Option<&K> {
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = &**child;
        }
        node.keys.first()
    }

    /// Largest key in this subtree (rightmost walk).
    pub fn max_key(&self) -> Option<&K> {
        let mut node = self;
        while let Some(child) = node.children.last() {
            node = &**child;
        }
        node.keys.last()
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, index: usize) -> &mut Node<K> {
        &mut self.children[index]
    }

    /// Detach the only child of a keyless internal node.
    pub(crate) fn take_only_child(&mut self) -> Option<Box<Node<K>>> {
        if self.keys.is_empty() && self.children.len() == 1 {
            self.children.pop()
        } else {
            None
        }
    }

    /// Install a split coming up from `children[index]`.
    ///
    /// The promoted key lands at `index` and the right sibling directly
    /// after the child that split.
    pub(crate) fn absorb(&mut self, index: usize, split: SplitResult<K>) {
        let (middle_key, right) = split.into_parts();
        self.keys.insert(index, middle_key);
        self.children.insert(index + 1, right);
    }
}

impl<K: Ord> Node<K> {
    // ========================================================================
    // Queries
    // ========================================================================

    /// Slot of `key` in this node, if present.
    #[inline]
    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.keys.binary_search(key).ok()
    }

    /// Whether this node itself (not its subtree) holds `key`.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index_of(key).is_some()
    }

    /// Index of the child whose subtree must hold `key` if it is present:
    /// the smallest `i` with `key < keys[i]`, or `len()` if there is none.
    #[inline]
    pub fn child_index_of(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }

    /// Whether `key` is stored anywhere in this subtree.
    pub fn search(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// The node of this subtree that holds `key`.
    pub fn find(&self, key: &K) -> Option<&Node<K>> {
        let mut node = self;
        loop {
            match node.keys.binary_search(key) {
                Ok(_) => return Some(node),
                Err(_) if node.leaf => return None,
                // A miss lands on the insertion point, which is the child index.
                Err(idx) => node = &*node.children[idx],
            }
        }
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Insert `key` into this node's key run, keeping it sorted.
    ///
    /// The node may reach `order` keys (overflow) but not go past it.
    /// Returns the slot the key was written to. On an internal node the
    /// matching right child is installed separately with
    /// [`Node::insert_child`] at `slot + 1`.
    ///
    /// # Errors
    /// - `Error::DuplicateKey` if the node already holds `key`
    /// - `Error::OutOfRange` if the node is already overflowed
    ///
    /// Neither error mutates the node.
    pub fn insert_not_overflow(&mut self, key: K) -> Result<usize> {
        let slot = match self.keys.binary_search(&key) {
            Ok(_) => return Err(Error::DuplicateKey),
            Err(slot) => slot,
        };
        if self.is_overflow() {
            return Err(Error::OutOfRange {
                index: self.keys.len(),
                bound: self.order,
            });
        }
        self.keys.insert(slot, key);
        Ok(slot)
    }

    /// Split an overflowed node around its middle key.
    ///
    /// With `mid = len() / 2`, this node keeps `keys[..mid]` (and
    /// `children[..=mid]`), `keys[mid]` is promoted, and a new sibling with
    /// the same order and leaf flag receives the rest.
    ///
    /// # Panics
    /// Panics if the node is empty. Callers only split overflowed nodes.
    pub fn split(&mut self) -> SplitResult<K> {
        debug_assert!(self.is_overflow(), "split called on a node that is not overflowed");

        let mid = self.keys.len() / 2;
        let mut right = Node::empty(self.order, self.leaf);

        right.keys.extend(self.keys.drain(mid + 1..));
        if !self.leaf {
            right.children.extend(self.children.drain(mid + 1..));
        }
        let middle_key = self.keys.remove(mid);

        trace!(
            target: "btree_index::node",
            order = self.order,
            left = self.keys.len(),
            right = right.keys.len(),
            leaf = self.leaf,
            "split overflowed node"
        );

        SplitResult::new(middle_key, Box::new(right))
    }
}

impl<K: Ord + Clone> Node<K> {
    // ========================================================================
    // Deletion
    // ========================================================================

    /// Remove `key` from this subtree. Returns whether a key was removed.
    ///
    /// Rebalancing is decided top-down: before descending into a child that
    /// sits at minimum occupancy, the child is topped up by a rotation
    /// through this node or merged with a sibling. This node may therefore
    /// lose a key; the caller is responsible for it in turn.
    ///
    /// Deleting an absent key still walks to a leaf and may rebalance on the
    /// way, but leaves every invariant intact.
    pub fn delete(&mut self, key: &K, stats: &TreeStats) -> bool {
        match self.keys.binary_search(key) {
            Ok(idx) if self.leaf => {
                self.keys.remove(idx);
                true
            }
            Ok(idx) => self.delete_internal(idx, key, stats),
            Err(_) if self.leaf => false,
            Err(idx) => {
                let idx = if self.children[idx].len() <= self.min_keys() {
                    self.fill(idx, stats)
                } else {
                    idx
                };
                self.delete_from_child(idx, key, stats)
            }
        }
    }

    /// `keys[idx] == key` on an internal node.
    fn delete_internal(&mut self, idx: usize, key: &K, stats: &TreeStats) -> bool {
        let min = self.min_keys();

        // Predecessor from the left subtree, else successor from the right.
        let replacement = if self.children[idx].len() > min {
            self.children[idx].max_key().cloned().map(|k| (idx, k))
        } else if self.children[idx + 1].len() > min {
            self.children[idx + 1].min_key().cloned().map(|k| (idx + 1, k))
        } else {
            None
        };

        match replacement {
            Some((child_idx, replacement)) => {
                self.keys[idx] = replacement.clone();
                self.delete_from_child(child_idx, &replacement, stats)
            }
            None => {
                self.merge(idx, stats);
                self.delete_from_child(idx, key, stats)
            }
        }
    }

    /// Recurse into `children[idx]`, then split it again if a merge left it
    /// overflowed and nothing below took a key away.
    fn delete_from_child(&mut self, idx: usize, key: &K, stats: &TreeStats) -> bool {
        let removed = self.children[idx].delete(key, stats);

        if self.children[idx].is_overflow() {
            let split = self.children[idx].split();
            TreeStats::bump(&stats.splits);
            trace!(
                target: "btree_index::node",
                idx,
                size = self.keys.len() + 1,
                "re-split merged child"
            );
            self.absorb(idx, split);
        }

        removed
    }

    /// Bring `children[idx]` above minimum occupancy.
    ///
    /// Returns the index of the child that now covers the keys
    /// `children[idx]` used to cover.
    fn fill(&mut self, idx: usize, stats: &TreeStats) -> usize {
        let min = self.min_keys();
        let last = self.keys.len();

        if idx > 0 && self.children[idx - 1].len() > min {
            self.borrow_from_prev(idx, stats);
            idx
        } else if idx < last && self.children[idx + 1].len() > min {
            self.borrow_from_next(idx, stats);
            idx
        } else if idx == last {
            self.merge(idx - 1, stats);
            idx - 1
        } else {
            self.merge(idx, stats);
            idx
        }
    }

    /// Rotate right: the separator moves down into `children[idx]` and the
    /// previous sibling's last key moves up to replace it.
    fn borrow_from_prev(&mut self, idx: usize, stats: &TreeStats) {
        let (left, right) = self.children.split_at_mut(idx);
        let sibling = &mut left[idx - 1];
        let child = &mut right[0];

        let Some(up) = sibling.keys.pop() else {
            return;
        };
        let down = std::mem::replace(&mut self.keys[idx - 1], up);
        child.keys.insert(0, down);

        if !child.leaf {
            if let Some(moved) = sibling.children.pop() {
                child.children.insert(0, moved);
            }
        }

        TreeStats::bump(&stats.borrows);
        trace!(
            target: "btree_index::node",
            idx,
            child = child.keys.len(),
            sibling = sibling.keys.len(),
            "borrowed from previous sibling"
        );
    }

    /// Rotate left: mirror of [`Node::borrow_from_prev`].
    fn borrow_from_next(&mut self, idx: usize, stats: &TreeStats) {
        let (left, right) = self.children.split_at_mut(idx + 1);
        let child = &mut left[idx];
        let sibling = &mut right[0];

        if sibling.keys.is_empty() {
            return;
        }
        let up = sibling.keys.remove(0);
        let down = std::mem::replace(&mut self.keys[idx], up);
        child.keys.push(down);

        if !sibling.leaf && !sibling.children.is_empty() {
            child.children.push(sibling.children.remove(0));
        }

        TreeStats::bump(&stats.borrows);
        trace!(
            target: "btree_index::node",
            idx,
            child = child.keys.len(),
            sibling = sibling.keys.len(),
            "borrowed from next sibling"
        );
    }

    /// Fold `keys[idx]` and `children[idx + 1]` into `children[idx]`.
    ///
    /// The right sibling is dropped once its contents have moved.
    fn merge(&mut self, idx: usize, stats: &TreeStats) {
        let separator = self.keys.remove(idx);
        let mut right = self.children.remove(idx + 1);
        let left = &mut self.children[idx];

        left.keys.push(separator);
        left.keys.append(&mut right.keys);
        left.children.append(&mut right.children);

        TreeStats::bump(&stats.merges);
        trace!(
            target: "btree_index::node",
            idx,
            merged = left.keys.len(),
            parent = self.keys.len(),
            "merged siblings"
        );
    }
}

impl<K: fmt::Debug> fmt::Display for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.keys)
    }
}
