//! In-order traversal over a B-tree.

use std::iter::FusedIterator;

use super::node::Node;

/// Ascending iterator over the keys of a [`BTree`](super::BTree).
///
/// Holds one `(node, next key slot)` frame per level on the current path,
/// so it never allocates more than the tree height.
pub struct Iter<'a, K> {
    stack: Vec<(&'a Node<K>, usize)>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(root: Option<&'a Node<K>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        if let Some(root) = root {
            iter.push_left_spine(root);
        }
        iter
    }

    fn push_left_spine(&mut self, mut node: &'a Node<K>) {
        loop {
            self.stack.push((node, 0));
            match node.children().first() {
                Some(child) => node = &**child,
                None => break,
            }
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        loop {
            let top = self.stack.last_mut()?;
            let node = top.0;
            let slot = top.1;

            if slot < node.len() {
                top.1 += 1;
                // Everything between keys[slot] and keys[slot + 1] comes next.
                if let Some(child) = node.children().get(slot + 1) {
                    self.push_left_spine(child);
                }
                self.remaining = self.remaining.saturating_sub(1);
                return node.keys().get(slot);
            }

            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}
