use plonky2::field::types::Field;
use registry_trie::{empty_leaf, empty_root, HashOut, F};
use serde::{Deserialize, Serialize};

use crate::constants::ACCOUNTS_TREE_HEIGHT;

/// The four-field snapshot the rollup advances batch by batch. Immutable:
/// each batch application produces a fresh value, never an in-place edit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RollupState {
    pub accounts_root: HashOut,
    pub current_record_index: u64,
    pub records_root: HashOut,
    /// Running accumulator over all live actions consumed so far. An
    /// order-sensitive fold, not a tree root.
    pub actions_hash: HashOut,
}

impl RollupState {
    /// The state of a freshly deployed registry: both trees empty, no
    /// record index assigned, no action consumed.
    pub fn genesis(records_tree_height: usize) -> Self {
        Self {
            accounts_root: empty_root(ACCOUNTS_TREE_HEIGHT),
            current_record_index: 0,
            records_root: empty_root(records_tree_height),
            actions_hash: empty_leaf(),
        }
    }

    /// Canonical field encoding, used when a state snapshot is bound into
    /// a proof claim.
    pub fn to_fields(&self) -> Vec<F> {
        let mut fields = Vec::with_capacity(13);
        fields.extend(self.accounts_root.elements);
        fields.push(F::from_canonical_u64(self.current_record_index));
        fields.extend(self.records_root.elements);
        fields.extend(self.actions_hash.elements);
        fields
    }
}

/// The public claim of a proof: a `(source, target)` pair of rollup
/// states. Two transitions compose iff the first's target equals the
/// second's source component-wise.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StateTransition {
    pub source: RollupState,
    pub target: RollupState,
}

impl StateTransition {
    pub fn new(source: RollupState, target: RollupState) -> Self {
        Self { source, target }
    }

    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    pub fn to_fields(&self) -> Vec<F> {
        let mut fields = self.source.to_fields();
        fields.extend(self.target.to_fields());
        fields
    }
}
