use plonky2::field::types::{Field, PrimeField64};
use registry_trie::{hash_fields, HashOut, Leafable, F};
use serde::{Deserialize, Serialize};

/// A registered name and the hashes of its two controlling secrets.
///
/// The owner secret authorizes account-level changes, the manager secret
/// record-level changes. Only their hashes enter the tree; the secrets
/// themselves (and their encryption to the owner key) live with the
/// clients and the dispatch surface.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct RegistryAccount {
    pub name: F,
    pub owner_secret_hash: HashOut,
    pub manager_secret_hash: HashOut,
}

/// The accounts-tree key for a name field element.
pub fn name_key(name: F) -> u64 {
    name.to_canonical_u64()
}

impl RegistryAccount {
    pub fn new(name: F, owner_secret_hash: HashOut, manager_secret_hash: HashOut) -> Self {
        Self {
            name,
            owner_secret_hash,
            manager_secret_hash,
        }
    }

    /// The all-zero account used as padding inside dummy actions.
    pub fn empty() -> Self {
        Self {
            name: F::ZERO,
            owner_secret_hash: HashOut {
                elements: [F::ZERO; 4],
            },
            manager_secret_hash: HashOut {
                elements: [F::ZERO; 4],
            },
        }
    }

    pub fn key(&self) -> u64 {
        name_key(self.name)
    }

    pub fn hash(&self) -> HashOut {
        hash_fields(&self.to_fields())
    }
}

impl Leafable for RegistryAccount {
    fn to_fields(&self) -> Vec<F> {
        let mut fields = Vec::with_capacity(9);
        fields.push(self.name);
        fields.extend(self.owner_secret_hash.elements);
        fields.extend(self.manager_secret_hash.elements);
        fields
    }
}
