use serde::{Deserialize, Serialize};

use crate::bits::Bits;
use crate::utils::{default_hashes, empty_leaf, hash_pair, HashOut};

/// A Merkle sibling path, deepest sibling first.
///
/// The same path both authorizes a read (membership or non-membership at
/// the root it was fetched against) and recomputes the new root after a
/// write to its key. It says nothing about any other key, and it is stale
/// as soon as the tree it came from is updated.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TreeWitness {
    pub siblings: Vec<HashOut>,
}

impl TreeWitness {
    /// The canonical empty witness for a tree of the given height: the
    /// sibling path of any key in an empty tree. Used to give batch slots a
    /// uniform shape when one of the two trees is irrelevant to an action.
    pub fn empty(height: usize) -> Self {
        let defaults = default_hashes(height);
        TreeWitness {
            siblings: (0..height).map(|i| defaults[height - i]).collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.siblings.len()
    }

    /// The root obtained by placing `leaf_hash` at `key` and folding the
    /// sibling path upward. Serves double duty: compared against an
    /// existing root it verifies membership; fed a new leaf hash it yields
    /// the post-write root.
    pub fn compute_root(&self, key: u64, leaf_hash: HashOut) -> HashOut {
        let mut cur = Bits::from_key(key, self.height());
        let mut h = leaf_hash;
        for &sibling in &self.siblings {
            h = if cur.last_bit() {
                hash_pair(sibling, h)
            } else {
                hash_pair(h, sibling)
            };
            cur = cur.parent();
        }
        h
    }

    /// Whether this witness proves that `key` holds a value hashing to
    /// `value_hash` under `root`.
    pub fn verify_membership(&self, root: HashOut, key: u64, value_hash: HashOut) -> bool {
        self.compute_root(key, value_hash) == root
    }

    /// Whether this witness proves that `key` is vacant under `root`.
    pub fn verify_non_membership(&self, root: HashOut, key: u64) -> bool {
        self.compute_root(key, empty_leaf()) == root
    }
}
