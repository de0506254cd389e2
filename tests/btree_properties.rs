//! Property tests for the B-tree, checked against `std::collections::BTreeSet`.

use std::collections::BTreeSet;

use btree_index::{BTree, Error};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    Delete(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // A small key space so deletes hit present keys often.
    prop_oneof![
        (0i64..64).prop_map(Op::Insert),
        (0i64..64).prop_map(Op::Delete),
    ]
}

/// Distinct keys plus a shuffled copy to delete them in.
fn keys_and_shuffle() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    prop::collection::hash_set(any::<i64>(), 1..150)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_flat_map(|keys| (Just(keys.clone()), Just(keys).prop_shuffle()))
}

proptest! {
    #[test]
    fn prop_traversal_is_sorted_and_deduplicated(
        order in 3usize..10,
        keys in prop::collection::vec(-1000i64..1000, 0..200),
    ) {
        let mut tree = BTree::new(order).unwrap();
        for &key in &keys {
            tree.insert(key).unwrap();
        }

        let expected: Vec<i64> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(tree.len(), expected.len());
        prop_assert_eq!(tree.keys(), expected);
        prop_assert!(tree.validate().is_ok());
    }

    #[test]
    fn prop_matches_model(
        order in 3usize..8,
        ops in prop::collection::vec(op_strategy(), 1..300),
    ) {
        let mut tree = BTree::new(order).unwrap();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    prop_assert_eq!(tree.insert(key).unwrap(), model.insert(key));
                }
                Op::Delete(key) if model.is_empty() => {
                    prop_assert_eq!(tree.delete(&key), Err(Error::EmptyTree));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(tree.delete(&key).unwrap(), model.remove(&key));
                }
            }
            prop_assert!(tree.validate().is_ok(), "{}", tree);
        }

        prop_assert_eq!(tree.keys(), model.iter().copied().collect::<Vec<_>>());
        for key in 0..64 {
            prop_assert_eq!(tree.search(&key), model.contains(&key));
        }
    }

    #[test]
    fn prop_delete_everything_empties_tree(
        order in 3usize..10,
        (keys, shuffled) in keys_and_shuffle(),
    ) {
        let mut tree = BTree::new(order).unwrap();
        for &key in &keys {
            prop_assert!(tree.insert(key).unwrap());
        }

        for key in &shuffled {
            prop_assert!(tree.delete(key).unwrap());
            prop_assert!(!tree.search(key));
            prop_assert!(tree.validate().is_ok());
        }

        prop_assert!(tree.is_empty());
        prop_assert!(tree.root().is_none());
        prop_assert_eq!(tree.height(), 0);
    }

    #[test]
    fn prop_duplicate_insert_changes_nothing(
        order in 3usize..10,
        keys in prop::collection::vec(any::<i64>(), 1..100),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut tree = BTree::new(order).unwrap();
        for &key in &keys {
            tree.insert(key).unwrap();
        }
        let before = format!("{}", tree);

        let existing = keys[pick.index(keys.len())];
        prop_assert!(!tree.insert(existing).unwrap());
        prop_assert_eq!(format!("{}", tree), before);
    }

    #[test]
    fn prop_absent_delete_changes_nothing(
        order in 3usize..10,
        keys in prop::collection::vec(0i64..500, 1..100),
        probe in 500i64..1000,
    ) {
        let mut tree = BTree::new(order).unwrap();
        for &key in &keys {
            tree.insert(key).unwrap();
        }
        let before = format!("{}", tree);

        prop_assert!(!tree.delete(&probe).unwrap());
        prop_assert_eq!(format!("{}", tree), before);
    }

    #[test]
    fn prop_height_is_logarithmic(
        order in 3usize..10,
        n in 1usize..2000,
    ) {
        let mut tree = BTree::new(order).unwrap();
        for key in 0..n as i64 {
            tree.insert(key).unwrap();
        }

        // Every non-root node has at least ceil(order / 2) children.
        let fanout = order.div_ceil(2) as f64;
        let bound = 1.0 + ((n as f64 + 1.0) / 2.0).log(fanout);
        prop_assert!(tree.height() as f64 <= bound.floor() + 1.0, "height {} bound {}", tree.height(), bound);
    }
}
