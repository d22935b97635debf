use std::collections::HashMap;

use thiserror::Error;

use crate::bits::Bits;
use crate::db::Db;
use crate::utils::{default_hashes, hash_fields, hash_pair, key_fits, HashOut, F};
use crate::witness::TreeWitness;

/// Stores the result of tree operations. Returns a [`TreeError`] upon
/// failure.
pub type TreeResult<T> = Result<T, TreeError>;

/// An error type for authenticated-tree operations.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum TreeError {
    /// The configured height cannot address any key, or exceeds what a
    /// 64-bit key path can encode.
    #[error("Tree height must be between 1 and 64! (got: {0})")]
    InvalidHeight(usize),

    /// The key does not fit in the configured height. For the records tree
    /// this means the record index outgrew the tree capacity, which is a
    /// configuration error rather than a recoverable one.
    #[error("Key {key} does not fit in a tree of height {height}!")]
    KeyOutOfRange { key: u64, height: usize },
}

/// A value that can live in a tree leaf.
pub trait Leafable: Clone {
    /// Canonical field encoding of the value; the leaf hash is
    /// `Poseidon` of this encoding.
    fn to_fields(&self) -> Vec<F>;

    fn hash(&self) -> HashOut {
        hash_fields(&self.to_fields())
    }
}

/// Fixed-height Merkle tree.
/// Node hashes live in the [`Db`] addressed by root-to-node path; absent
/// nodes take the per-depth default built up from the canonical empty leaf.
/// Values are kept alongside in a plain map so `get` does not have to walk
/// the tree.
#[derive(Debug, Clone)]
pub struct MerkleTree<D: Db, V: Leafable> {
    height: usize,
    db: D,
    kv_store: HashMap<u64, V>,
    root: HashOut,
    defaults: Vec<HashOut>,
}

impl<D: Db, V: Leafable> MerkleTree<D, V> {
    pub fn new(height: usize) -> TreeResult<Self> {
        if height == 0 || height > 64 {
            return Err(TreeError::InvalidHeight(height));
        }
        let defaults = default_hashes(height);
        Ok(Self {
            height,
            db: D::default(),
            kv_store: HashMap::new(),
            root: defaults[0],
            defaults,
        })
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn root(&self) -> HashOut {
        self.root
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        self.kv_store.get(&key)
    }

    pub fn has(&self, key: u64) -> bool {
        self.kv_store.contains_key(&key)
    }

    /// The hash of the leaf currently stored at `key`, empty if vacant.
    pub fn leaf_hash(&self, key: u64) -> HashOut {
        self.kv_store
            .get(&key)
            .map(Leafable::hash)
            .unwrap_or(self.defaults[self.height])
    }

    /// Fetches the sibling path for `key` against the current root. The
    /// witness is valid only until the next update to this tree.
    pub fn prove(&self, key: u64) -> TreeResult<TreeWitness> {
        let mut cur = self.leaf_path(key)?;
        let mut siblings = Vec::with_capacity(self.height);
        while !cur.is_empty() {
            siblings.push(self.node_hash(&cur.sibling()));
            cur = cur.parent();
        }
        Ok(TreeWitness { siblings })
    }

    /// Writes `value` at `key` and recomputes the root. `None` writes the
    /// canonical empty leaf; the key itself is never removed from the tree
    /// shape.
    pub fn update(&mut self, key: u64, value: Option<V>) -> TreeResult<()> {
        let mut cur = self.leaf_path(key)?;
        let mut h = match value {
            Some(v) => {
                let h = v.hash();
                self.kv_store.insert(key, v);
                h
            }
            None => {
                self.kv_store.remove(&key);
                self.defaults[self.height]
            }
        };
        self.db.set_node(cur, h);
        while !cur.is_empty() {
            let sibling = self.node_hash(&cur.sibling());
            h = if cur.last_bit() {
                hash_pair(sibling, h)
            } else {
                hash_pair(h, sibling)
            };
            cur = cur.parent();
            self.db.set_node(cur, h);
        }
        self.root = h;
        Ok(())
    }

    fn leaf_path(&self, key: u64) -> TreeResult<Bits> {
        if !key_fits(key, self.height) {
            return Err(TreeError::KeyOutOfRange {
                key,
                height: self.height,
            });
        }
        Ok(Bits::from_key(key, self.height))
    }

    fn node_hash(&self, path: &Bits) -> HashOut {
        self.db
            .get_node(path)
            .copied()
            .unwrap_or(self.defaults[path.count])
    }
}
