use proof_gen::{verify_proof, AggregatableProof};
use registry_rollup::{Action, RegistryAccount, RegistryRecord, RollupState};
use registry_trie::HashOut;
use thiserror::Error;
use tracing::{debug, info};

use crate::queue::MemoryActionQueue;

/// An error type for rejected contract calls.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ContractError {
    #[error("Proof rejected by the verifier: {0}")]
    InvalidProof(String),

    /// The proof's source is not the committed state; the caller raced
    /// another rollup and must rebuild from the new committed state.
    #[error("Proof source does not match the committed ledger state!")]
    SourceMismatch,

    /// A dispatch sanity check failed. These checks only catch malformed
    /// calls; authorization is enforced later, inside the proved batch.
    #[error("Dispatch rejected: {0}")]
    DispatchRejected(&'static str),
}

/// A stand-in for the on-chain ledger contract: it holds the committed
/// rollup state, appends dispatched actions to the queue, and advances the
/// committed state when handed a valid proof rooted at it.
#[derive(Clone, Debug)]
pub struct LedgerContract {
    committed: RollupState,
    queue: MemoryActionQueue,
}

impl LedgerContract {
    /// Deploys the contract at the genesis state for the given records
    /// tree height.
    pub fn deploy(records_tree_height: usize) -> Self {
        let committed = RollupState::genesis(records_tree_height);
        Self {
            queue: MemoryActionQueue::new(committed.actions_hash),
            committed,
        }
    }

    pub fn committed(&self) -> &RollupState {
        &self.committed
    }

    pub fn queue(&self) -> &MemoryActionQueue {
        &self.queue
    }

    pub fn register_account(&mut self, account: RegistryAccount) -> Result<(), ContractError> {
        self.dispatch(Action::register_account(account))
    }

    pub fn update_account(
        &mut self,
        account: RegistryAccount,
        original_hash: HashOut,
    ) -> Result<(), ContractError> {
        self.dispatch(Action::update_account(account, original_hash))
    }

    pub fn add_record(
        &mut self,
        record: RegistryRecord,
        operating_account_hash: HashOut,
    ) -> Result<(), ContractError> {
        // The batch builder assigns the index; a pre-assigned one would
        // silently address a different slot than the dispatcher intended.
        if record.is_assigned_index() {
            return Err(ContractError::DispatchRejected(
                "new records must not carry an assigned index",
            ));
        }
        self.dispatch(Action::add_record(record, operating_account_hash))
    }

    pub fn update_record(
        &mut self,
        record: RegistryRecord,
        original_hash: HashOut,
        operating_account_hash: HashOut,
    ) -> Result<(), ContractError> {
        if !record.is_assigned_index() {
            return Err(ContractError::DispatchRejected(
                "record mutations must address an assigned index",
            ));
        }
        self.dispatch(Action::update_record(
            record,
            original_hash,
            operating_account_hash,
        ))
    }

    pub fn delete_record(
        &mut self,
        record: RegistryRecord,
        original_hash: HashOut,
        operating_account_hash: HashOut,
    ) -> Result<(), ContractError> {
        if !record.is_assigned_index() {
            return Err(ContractError::DispatchRejected(
                "record mutations must address an assigned index",
            ));
        }
        self.dispatch(Action::delete_record(
            record,
            original_hash,
            operating_account_hash,
        ))
    }

    /// Advances the committed state to the proof's target. The proof must
    /// verify and its source must be the committed state exactly.
    pub fn rollup(&mut self, proof: &AggregatableProof) -> Result<(), ContractError> {
        verify_proof(proof).map_err(|err| ContractError::InvalidProof(err.to_string()))?;
        if proof.claim().source != self.committed {
            return Err(ContractError::SourceMismatch);
        }
        self.committed = proof.claim().target;
        info!(
            record_index = self.committed.current_record_index,
            "committed state advanced"
        );
        Ok(())
    }

    fn dispatch(&mut self, action: Action) -> Result<(), ContractError> {
        debug!(kind = ?action.kind, "dispatching action");
        self.queue.push_group(vec![action]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use plonky2::field::types::Field;
    use registry_rollup::constants::RECORDS_TREE_HEIGHT;
    use registry_trie::{empty_leaf, F};

    use super::*;

    #[test]
    fn add_record_rejects_preassigned_index() {
        let mut contract = LedgerContract::deploy(RECORDS_TREE_HEIGHT);
        let mut record = RegistryRecord::empty();
        record.index = 3;
        record.account_name = F::ONE;
        assert_eq!(
            contract.add_record(record, empty_leaf()),
            Err(ContractError::DispatchRejected(
                "new records must not carry an assigned index"
            ))
        );
    }

    #[test]
    fn record_mutations_require_an_assigned_index() {
        let mut contract = LedgerContract::deploy(RECORDS_TREE_HEIGHT);
        let record = RegistryRecord::empty();
        assert!(contract
            .update_record(record, empty_leaf(), empty_leaf())
            .is_err());
        assert!(contract
            .delete_record(record, empty_leaf(), empty_leaf())
            .is_err());
    }
}
