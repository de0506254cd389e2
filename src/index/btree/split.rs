//! Result of splitting an overflowed node.

use super::node::Node;

/// The two pieces handed to the parent when a node overflows.
///
/// The node that was split keeps the left half; `right` holds the new
/// sibling and `middle_key` is the key promoted between them. The parent
/// takes ownership of both immediately.
///
/// A split that did not happen is represented by `None` wherever an
/// `Option<SplitResult<K>>` is returned.
#[derive(Debug)]
pub struct SplitResult<K = i64> {
    middle_key: K,
    right: Box<Node<K>>,
}

impl<K> SplitResult<K> {
    pub(crate) fn new(middle_key: K, right: Box<Node<K>>) -> Self {
        Self { middle_key, right }
    }

    /// The key promoted to the parent.
    #[inline]
    pub fn middle_key(&self) -> &K {
        &self.middle_key
    }

    /// The newly created right sibling.
    #[inline]
    pub fn right_node(&self) -> &Node<K> {
        &self.right
    }

    /// Hand both pieces over to the parent.
    #[inline]
    pub fn into_parts(self) -> (K, Box<Node<K>>) {
        (self.middle_key, self.right)
    }
}
