use registry_rollup::RollupState;
use registry_trie::HashOut;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error type for divergence between the indexer's mirror of the ledger
/// state and the state the contract actually committed.
///
/// Divergence means the local trees were rebuilt from a different action
/// history than the chain's; the only recovery is a resync from genesis.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConsistencyError {
    #[error("Indexer {component} diverged from the committed ledger state!")]
    Divergence { component: &'static str },
}

/// The indexer's durable mirror of the committed ledger state, advanced
/// only after the contract accepts a merged proof.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexerState {
    pub current_accounts_root: HashOut,
    pub current_records_root: HashOut,
    pub last_processed_actions_hash: HashOut,
    pub last_processed_record_index: u64,
}

impl IndexerState {
    pub fn genesis(records_tree_height: usize) -> Self {
        Self::from_rollup_state(&RollupState::genesis(records_tree_height))
    }

    pub fn from_rollup_state(state: &RollupState) -> Self {
        Self {
            current_accounts_root: state.accounts_root,
            current_records_root: state.records_root,
            last_processed_actions_hash: state.actions_hash,
            last_processed_record_index: state.current_record_index,
        }
    }

    pub fn as_rollup_state(&self) -> RollupState {
        RollupState {
            accounts_root: self.current_accounts_root,
            current_record_index: self.last_processed_record_index,
            records_root: self.current_records_root,
            actions_hash: self.last_processed_actions_hash,
        }
    }

    /// Advances the mirror to the target of an accepted transition.
    pub fn absorb_target(&mut self, target: &RollupState) {
        *self = Self::from_rollup_state(target);
    }

    /// Compares the mirror against the committed state component-wise.
    pub fn reconcile(&self, committed: &RollupState) -> Result<(), ConsistencyError> {
        if self.current_accounts_root != committed.accounts_root {
            return Err(ConsistencyError::Divergence {
                component: "accounts root",
            });
        }
        if self.current_records_root != committed.records_root {
            return Err(ConsistencyError::Divergence {
                component: "records root",
            });
        }
        if self.last_processed_record_index != committed.current_record_index {
            return Err(ConsistencyError::Divergence {
                component: "record index",
            });
        }
        if self.last_processed_actions_hash != committed.actions_hash {
            return Err(ConsistencyError::Divergence {
                component: "actions hash",
            });
        }
        Ok(())
    }
}
