//! Configuration constants for the B-tree index.

/// Smallest legal branching order.
///
/// The split arithmetic needs at least three children per node:
/// - an overflowed node holds `order` keys
/// - splitting promotes one key and leaves at least one key on each side
///
/// Anything below this is rejected at construction time.
pub const MIN_ORDER: usize = 3;

/// Order used by [`BTree::default`](crate::BTree::default).
///
/// Order 3 gives a 2-3 tree: one or two keys per node.
pub const DEFAULT_ORDER: usize = 3;

/// Minimum number of keys a non-root node may hold.
///
/// This is `ceil(order / 2) - 1`, the size of the smaller half left behind
/// when an overflowed node is split.
///
/// # Example
/// ```
/// use btree_index::common::config::min_keys;
///
/// assert_eq!(min_keys(3), 1);
/// assert_eq!(min_keys(4), 1);
/// assert_eq!(min_keys(5), 2);
/// ```
#[inline]
pub const fn min_keys(order: usize) -> usize {
    order.div_ceil(2) - 1
}

/// Maximum number of keys a node holds between operations.
///
/// A node reaching `order` keys is overflowed and gets split.
#[inline]
pub const fn max_keys(order: usize) -> usize {
    order - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_keys_matches_split_halves() {
        // An overflowed node of `order` keys splits into `order / 2` keys on
        // the left and `order - order / 2 - 1` on the right.
        for order in MIN_ORDER..=64 {
            let right_half = order - order / 2 - 1;
            let left_half = order / 2;
            assert_eq!(min_keys(order), right_half.min(left_half), "order {}", order);
        }
    }

    #[test]
    fn test_merge_of_two_minimum_nodes_fits_after_one_removal() {
        for order in MIN_ORDER..=64 {
            // Two minimum nodes plus the separator, minus the deleted key.
            assert!(2 * min_keys(order) <= max_keys(order), "order {}", order);
        }
    }

    #[test]
    fn test_default_order_is_legal() {
        assert!(DEFAULT_ORDER >= MIN_ORDER);
        assert_eq!(max_keys(DEFAULT_ORDER), 2);
    }
}
