//! The B-tree handle.
//!
//! [`BTree`] owns the root and, through it, every node. All structural
//! changes to the height happen here: a split coming out of the root grows
//! the tree by one level, and a keyless internal root left behind by a merge
//! is replaced by its only child.

use std::fmt;

use tracing::debug;

use super::iter::Iter;
use super::node::Node;
use super::split::SplitResult;
use super::stats::TreeStats;
use crate::common::config::{DEFAULT_ORDER, MIN_ORDER};
use crate::common::{Error, Result};

/// An in-memory ordered B-tree of unique keys.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │ BTree { order, len, stats }                  │
/// │   root: Option<Box<Node>>                    │
/// │            │                                 │
/// │        ┌───┴───┐        insert: splits move  │
/// │      [ 30 | 60 ]        up, root split adds  │
/// │      /    |    \        a level on top       │
/// │  [10 20] [40] [70 80]                        │
/// │                         delete: borrow/merge │
/// │                         on the way down,     │
/// │                         root collapse drops  │
/// │                         a level              │
/// └──────────────────────────────────────────────┘
/// ```
///
/// # Concurrency
/// Mutation takes `&mut self`, so there is exactly one writer at a time.
/// Sharing a tree across threads is up to the caller (e.g. a lock around
/// every call).
///
/// # Example
/// ```
/// use btree_index::BTree;
///
/// let mut tree = BTree::new(4).unwrap();
/// for key in [40, 10, 30, 20, 50] {
///     tree.insert(key).unwrap();
/// }
/// assert!(tree.search(&30));
///
/// assert!(tree.delete(&30).unwrap());
/// assert!(!tree.search(&30));
/// assert_eq!(tree.keys(), vec![10, 20, 40, 50]);
/// ```
#[derive(Debug)]
pub struct BTree<K = i64> {
    /// Maximum number of children per node (immutable after construction).
    order: usize,

    /// `None` while the tree holds no keys.
    root: Option<Box<Node<K>>>,

    /// Number of keys stored.
    len: usize,

    /// Operation counters.
    stats: TreeStats,
}

impl<K> BTree<K> {
    /// Create an empty tree.
    ///
    /// # Arguments
    /// * `order` - Maximum number of children per node
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order` is below [`MIN_ORDER`]
    pub fn new(order: usize) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(Error::InvalidOrder(order));
        }

        Ok(Self {
            order,
            root: None,
            len: 0,
            stats: TreeStats::new(),
        })
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The root node, if the tree holds any keys.
    #[inline]
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_deref()
    }

    /// Operation counters for this tree.
    #[inline]
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Number of levels; 0 for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_deref();
        while let Some(current) = node {
            height += 1;
            node = current.children().first().map(|child| &**child);
        }
        height
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root.as_deref(), self.len)
    }
}

impl<K: Ord> BTree<K> {
    /// Build a tree of the given order from a sequence of keys.
    ///
    /// Duplicate keys are collapsed.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order` is below [`MIN_ORDER`]
    pub fn from_keys<I>(order: usize, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
    {
        let mut tree = Self::new(order)?;
        for key in keys {
            tree.insert(key)?;
        }
        Ok(tree)
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Whether `key` is stored in the tree.
    pub fn search(&self, key: &K) -> bool {
        TreeStats::bump(&self.stats.searches);
        self.find(key).is_some()
    }

    /// The node holding `key`, for callers that need more than a yes/no.
    pub fn find(&self, key: &K) -> Option<&Node<K>> {
        self.root.as_deref().and_then(|root| root.find(key))
    }

    /// Smallest key.
    pub fn min(&self) -> Option<&K> {
        self.root.as_deref().and_then(Node::min_key)
    }

    /// Largest key.
    pub fn max(&self) -> Option<&K> {
        self.root.as_deref().and_then(Node::max_key)
    }

    // ========================================================================
    // Public API: Insert
    // ========================================================================

    /// Insert `key`.
    ///
    /// Returns `Ok(true)` if the key was added and `Ok(false)` if it was
    /// already present, in which case the tree is left untouched.
    ///
    /// # Errors
    /// Only on a broken node invariant; a correct tree never returns one.
    pub fn insert(&mut self, key: K) -> Result<bool> {
        let Some(root) = self.root.as_mut() else {
            let mut root = Node::empty(self.order, true);
            root.insert_not_overflow(key)?;
            self.root = Some(Box::new(root));
            self.len = 1;
            TreeStats::bump(&self.stats.inserts);
            debug!(target: "btree_index::tree", order = self.order, "created root leaf");
            return Ok(true);
        };

        if root.search(&key) {
            TreeStats::bump(&self.stats.duplicate_inserts);
            return Ok(false);
        }

        let split = Self::insert_recursive(root, key, &self.stats)?;
        self.len += 1;
        TreeStats::bump(&self.stats.inserts);

        if let Some(split) = split {
            if let Some(old_root) = self.root.take() {
                self.root = Some(Box::new(Node::new_root(old_root, split)));
                TreeStats::bump(&self.stats.root_splits);
                debug!(
                    target: "btree_index::tree",
                    height = self.height(),
                    len = self.len,
                    "root split, tree grew one level"
                );
            }
        }

        Ok(true)
    }

    /// Insert into the subtree under `node`, returning the split of `node`
    /// if it overflowed.
    ///
    /// A split from the child is absorbed before this node's own overflow
    /// check, so overflow moves up one level at a time.
    fn insert_recursive(
        node: &mut Node<K>,
        key: K,
        stats: &TreeStats,
    ) -> Result<Option<SplitResult<K>>> {
        if node.is_leaf() {
            node.insert_not_overflow(key)?;
        } else {
            let idx = node.child_index_of(&key);
            if let Some(split) = Self::insert_recursive(node.child_mut(idx), key, stats)? {
                node.absorb(idx, split);
            }
        }

        if node.is_overflow() {
            TreeStats::bump(&stats.splits);
            return Ok(Some(node.split()));
        }
        Ok(None)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Walk the whole tree and check every structural invariant:
    /// key ordering within and across nodes, occupancy bounds, child
    /// counts, leaf flags, equal leaf depth and the stored length.
    ///
    /// # Errors
    /// - `Error::InvariantViolation` describing the first broken invariant
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.root.as_deref() else {
            if self.len != 0 {
                return Err(Error::InvariantViolation(format!(
                    "empty tree reports {} keys",
                    self.len
                )));
            }
            return Ok(());
        };

        let mut leaf_depth = None;
        let count = self.check_node(root, None, None, 0, &mut leaf_depth)?;
        if count != self.len {
            return Err(Error::InvariantViolation(format!(
                "tree reports {} keys but holds {}",
                self.len, count
            )));
        }
        Ok(())
    }

    fn check_node<'a>(
        &self,
        node: &'a Node<K>,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> Result<usize> {
        let violation = |what: &str| {
            Err(Error::InvariantViolation(format!("{} at depth {}", what, depth)))
        };
        let keys = node.keys();

        if node.order() != self.order {
            return violation("node order differs from tree order");
        }
        if !keys.windows(2).all(|pair| pair[0] < pair[1]) {
            return violation("keys not strictly ascending");
        }
        if matches!((lower, keys.first()), (Some(lo), Some(first)) if first <= lo) {
            return violation("key below its subtree bound");
        }
        if matches!((upper, keys.last()), (Some(hi), Some(last)) if last >= hi) {
            return violation("key above its subtree bound");
        }
        if keys.len() > node.max_keys() {
            return violation("node overflowed");
        }
        if depth == 0 && keys.is_empty() {
            return violation("root holds no keys");
        }
        if depth > 0 && keys.len() < node.min_keys() {
            return violation("node below minimum occupancy");
        }

        if node.is_leaf() {
            if !node.children().is_empty() {
                return violation("leaf has children");
            }
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return violation("leaves at different depths");
                }
                Some(_) => {}
            }
            return Ok(keys.len());
        }

        if node.children().len() != keys.len() + 1 {
            return violation("internal node child count is not size + 1");
        }

        let mut count = keys.len();
        for (i, child) in node.children().iter().enumerate() {
            let lo = if i == 0 { lower } else { keys.get(i - 1) };
            let hi = keys.get(i).or(upper);
            count += self.check_node(child, lo, hi, depth + 1, leaf_depth)?;
        }
        Ok(count)
    }
}

impl<K: Ord + Clone> BTree<K> {
    // ========================================================================
    // Public API: Delete
    // ========================================================================

    /// Remove `key`.
    ///
    /// Returns `Ok(true)` if the key was removed and `Ok(false)` if it was
    /// not present, in which case the tree is left untouched.
    ///
    /// # Errors
    /// - `Error::EmptyTree` if the tree holds no keys
    pub fn delete(&mut self, key: &K) -> Result<bool> {
        let Some(root) = self.root.as_mut() else {
            return Err(Error::EmptyTree);
        };

        if !root.search(key) {
            TreeStats::bump(&self.stats.absent_deletes);
            return Ok(false);
        }

        let removed = root.delete(key, &self.stats);
        if removed {
            self.len -= 1;
            TreeStats::bump(&self.stats.deletes);
        }

        if root.is_empty() {
            if root.is_leaf() {
                self.root = None;
                debug!(target: "btree_index::tree", "last key removed, tree is empty");
            } else if let Some(child) = root.take_only_child() {
                self.root = Some(child);
                TreeStats::bump(&self.stats.root_collapses);
                debug!(
                    target: "btree_index::tree",
                    height = self.height(),
                    len = self.len,
                    "root collapsed, tree shrank one level"
                );
            }
        }

        Ok(removed)
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<K> {
        self.iter().cloned().collect()
    }
}

impl<K> Default for BTree<K> {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            root: None,
            len: 0,
            stats: TreeStats::new(),
        }
    }
}

impl<'a, K> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders the node structure one node per line, indented by depth.
///
/// ```text
/// BTree(order=3, len=5, height=2)
/// [20, 40]
///   [10]
///   [30]
///   [50]
/// ```
impl<K: fmt::Debug> fmt::Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BTree(order={}, len={}, height={})",
            self.order,
            self.len,
            self.height()
        )?;
        match self.root.as_deref() {
            Some(root) => fmt_subtree(root, 0, f),
            None => writeln!(f, "(empty)"),
        }
    }
}

fn fmt_subtree<K: fmt::Debug>(node: &Node<K>, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}{}", "  ".repeat(level), node)?;
    for child in node.children() {
        fmt_subtree(child, level + 1, f)?;
    }
    Ok(())
}
