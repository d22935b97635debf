use plonky2::field::types::{Field, Sample};
use rand::{thread_rng, Rng};

use crate::db::MemoryDb;
use crate::tree::{Leafable, MerkleTree, TreeError};
use crate::utils::{empty_root, F};
use crate::witness::TreeWitness;

#[derive(Clone, Debug, PartialEq)]
struct TestValue([F; 2]);

impl TestValue {
    fn rand() -> Self {
        TestValue(F::rand_array())
    }
}

impl Leafable for TestValue {
    fn to_fields(&self) -> Vec<F> {
        self.0.to_vec()
    }
}

fn tree(height: usize) -> MerkleTree<MemoryDb, TestValue> {
    MerkleTree::new(height).unwrap()
}

#[test]
fn test_empty_tree_root_matches_defaults() {
    for height in [1, 8, 30, 64] {
        assert_eq!(tree(height).root(), empty_root(height));
    }
}

#[test]
fn test_invalid_heights_rejected() {
    for height in [0, 65, 1000] {
        assert_eq!(
            MerkleTree::<MemoryDb, TestValue>::new(height).unwrap_err(),
            TreeError::InvalidHeight(height)
        );
    }
}

#[test]
fn test_set_get_and_delete() {
    let mut t = tree(30);
    let k = thread_rng().gen_range(0..1 << 30);
    let v = TestValue::rand();

    assert!(!t.has(k));
    t.update(k, Some(v.clone())).unwrap();
    assert!(t.has(k));
    assert_eq!(t.get(k), Some(&v));

    t.update(k, None).unwrap();
    assert!(!t.has(k));
    assert_eq!(t.root(), empty_root(30));
}

#[test]
fn test_update_is_idempotent_on_root() {
    let mut t = tree(30);
    let k = thread_rng().gen_range(0..1 << 30);
    let v1 = TestValue::rand();
    let v2 = TestValue::rand();

    t.update(k, Some(v1.clone())).unwrap();
    let root = t.root();
    t.update(k, Some(v2)).unwrap();
    assert_ne!(t.root(), root);
    t.update(k, Some(v1)).unwrap();
    assert_eq!(t.root(), root);
}

#[test]
fn test_insertion_order_does_not_matter() {
    let mut rng = thread_rng();
    let kvs: Vec<(u64, TestValue)> = (0..64)
        .map(|_| (rng.gen_range(0..1 << 30), TestValue::rand()))
        .collect();

    let mut t1 = tree(30);
    for (k, v) in &kvs {
        t1.update(*k, Some(v.clone())).unwrap();
    }
    let mut t2 = tree(30);
    for (k, v) in kvs.iter().rev() {
        t2.update(*k, Some(v.clone())).unwrap();
    }
    assert_eq!(t1.root(), t2.root());
}

#[test]
fn test_membership_witness() {
    let mut t = tree(30);
    let mut rng = thread_rng();
    for _ in 0..32 {
        t.update(rng.gen_range(0..1 << 30), Some(TestValue::rand()))
            .unwrap();
    }
    let k = rng.gen_range(0..1 << 30);
    let v = TestValue::rand();
    t.update(k, Some(v.clone())).unwrap();

    let w = t.prove(k).unwrap();
    assert!(w.verify_membership(t.root(), k, v.hash()));
    assert!(!w.verify_non_membership(t.root(), k));
}

#[test]
fn test_non_membership_witness() {
    let mut t = tree(30);
    let mut rng = thread_rng();
    for _ in 0..32 {
        t.update(rng.gen_range(0..1 << 15), Some(TestValue::rand()))
            .unwrap();
    }
    let vacant = (1 << 15) + rng.gen_range(0..1 << 14);

    let w = t.prove(vacant).unwrap();
    assert!(w.verify_non_membership(t.root(), vacant));
    assert!(!w.verify_membership(t.root(), vacant, TestValue::rand().hash()));
}

#[test]
fn test_witness_computes_post_write_root() {
    let mut t = tree(30);
    let mut rng = thread_rng();
    for _ in 0..16 {
        t.update(rng.gen_range(0..1 << 30), Some(TestValue::rand()))
            .unwrap();
    }
    let k = rng.gen_range(0..1 << 30);
    let v = TestValue::rand();

    let w = t.prove(k).unwrap();
    let predicted = w.compute_root(k, v.hash());
    t.update(k, Some(v)).unwrap();
    assert_eq!(t.root(), predicted);
}

#[test]
fn test_witness_goes_stale_after_update() {
    let mut t = tree(30);
    let k1 = 42;
    let k2 = 43;
    t.update(k1, Some(TestValue::rand())).unwrap();

    let w = t.prove(k1).unwrap();
    t.update(k2, Some(TestValue::rand())).unwrap();
    // k2 shares everything but the last path bit with k1, so the old
    // witness no longer authenticates the new root.
    assert!(!w.verify_membership(t.root(), k1, t.leaf_hash(k1)));
}

#[test]
fn test_empty_witness_proves_vacancy_of_empty_tree() {
    let t = tree(30);
    let w = TreeWitness::empty(30);
    for k in [0u64, 1, 12345, (1 << 30) - 1] {
        assert!(w.verify_non_membership(t.root(), k));
    }
}

#[test]
fn test_key_out_of_range() {
    let mut t = tree(8);
    assert_eq!(
        t.prove(256).unwrap_err(),
        TreeError::KeyOutOfRange {
            key: 256,
            height: 8
        }
    );
    assert_eq!(
        t.update(1 << 20, Some(TestValue::rand())).unwrap_err(),
        TreeError::KeyOutOfRange {
            key: 1 << 20,
            height: 8
        }
    );
}

#[test]
fn test_full_height_tree() {
    let mut t = tree(64);
    let k = u64::MAX;
    let v = TestValue::rand();
    t.update(k, Some(v.clone())).unwrap();
    let w = t.prove(k).unwrap();
    assert!(w.verify_membership(t.root(), k, v.hash()));
}
