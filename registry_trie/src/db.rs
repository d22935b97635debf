use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bits::Bits;
use crate::utils::HashOut;

/// Node-hash storage backing a [`MerkleTree`](crate::tree::MerkleTree).
/// Nodes are addressed by their root-to-node path; absent nodes hash to the
/// per-depth default.
pub trait Db: Default {
    fn get_node(&self, path: &Bits) -> Option<&HashOut>;
    fn set_node(&mut self, path: Bits, hash: HashOut);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryDb {
    pub db: HashMap<Bits, HashOut>,
}

impl Db for MemoryDb {
    fn get_node(&self, path: &Bits) -> Option<&HashOut> {
        self.db.get(path)
    }

    fn set_node(&mut self, path: Bits, hash: HashOut) {
        self.db.insert(path, hash);
    }
}
