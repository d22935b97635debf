//! Fixed-height authenticated Merkle trees for the name-registry rollup.
//!
//! Two tree shapes are served by the same type: a key-addressed sparse tree
//! (accounts, keyed by a field element) and an index-addressed dense tree
//! (records, keyed by a record index). Both support membership and
//! non-membership witnesses against the root at fetch time; deleting an
//! entry writes the canonical empty leaf rather than removing the key.

pub mod bits;
pub mod db;
pub mod tree;
#[cfg(test)]
mod tree_test;
pub mod utils;
pub mod witness;

pub use bits::Bits;
pub use db::{Db, MemoryDb};
pub use tree::{Leafable, MerkleTree, TreeError, TreeResult};
pub use utils::{empty_leaf, empty_root, hash_fields, hash_pair, key_fits, HashOut, F};
pub use witness::TreeWitness;
