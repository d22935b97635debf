use registry_trie::{empty_leaf, key_fits, HashOut, TreeWitness};
use thiserror::Error;

use crate::account::name_key;
use crate::action::{fold_actions_hash, ActionKind};
use crate::batch::{ActionBatch, ActionSlot};
use crate::state::{RollupState, StateTransition};

/// An error type for transition checking.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TransitionError {
    /// The batch fold disagrees with the claimed target state on the named
    /// component. The batch proof cannot be produced or accepted.
    #[error("Recomputed {component} does not match the claimed target state!")]
    TargetMismatch { component: &'static str },
}

/// Re-executes every slot of `batch` starting from `source`, folding the
/// four state components forward. This is the rule engine a proof attests
/// to; it must stay in exact agreement with the conditional mutations the
/// batch builder applies to the live trees.
pub fn fold_batch(source: &RollupState, batch: &ActionBatch) -> RollupState {
    batch
        .slots
        .iter()
        .fold(*source, |state, slot| fold_slot(&state, slot))
}

/// Checks a claimed transition against the batch it supposedly describes.
pub fn check_transition(
    transition: &StateTransition,
    batch: &ActionBatch,
) -> Result<(), TransitionError> {
    let computed = fold_batch(&transition.source, batch);
    let target = &transition.target;

    if computed.accounts_root != target.accounts_root {
        return Err(TransitionError::TargetMismatch {
            component: "accounts root",
        });
    }
    if computed.records_root != target.records_root {
        return Err(TransitionError::TargetMismatch {
            component: "records root",
        });
    }
    if computed.current_record_index != target.current_record_index {
        return Err(TransitionError::TargetMismatch {
            component: "record index",
        });
    }
    if computed.actions_hash != target.actions_hash {
        return Err(TransitionError::TargetMismatch {
            component: "actions hash",
        });
    }
    Ok(())
}

/// One slot of the fold. Rejected permission checks are a normal outcome:
/// the action still folds into the hash chain but leaves both roots
/// untouched. Dummy slots touch nothing at all, the hash chain included.
fn fold_slot(state: &RollupState, slot: &ActionSlot) -> RollupState {
    let action = &slot.action;
    if action.is_dummy() {
        return *state;
    }

    let mut state = *state;
    state.actions_hash = fold_actions_hash(state.actions_hash, action);

    match action.kind {
        ActionKind::Dummy => unreachable!("dummy slots return early"),
        ActionKind::RegisterAccount => {
            let key = action.account.key();
            if proves_vacancy(&slot.account_witness, state.accounts_root, key) {
                state.accounts_root = slot.account_witness.compute_root(key, action.account.hash());
            }
        }
        ActionKind::UpdateAccount => {
            let key = action.account.key();
            if proves_live_membership(
                &slot.account_witness,
                state.accounts_root,
                key,
                action.original_hash,
            ) {
                state.accounts_root = slot.account_witness.compute_root(key, action.account.hash());
            }
        }
        ActionKind::AddRecord => {
            let permitted = proves_live_membership(
                &slot.account_witness,
                state.accounts_root,
                name_key(action.record.account_name),
                action.operating_account_hash,
            );
            // Index burn: the counter advances whether or not the write
            // lands, matching the committed contract semantics.
            state.current_record_index += 1;
            let index = state.current_record_index;
            let vacant = proves_vacancy(&slot.record_witness, state.records_root, index);
            if permitted && vacant {
                state.records_root = slot.record_witness.compute_root(index, action.record.hash());
            }
        }
        ActionKind::UpdateRecord | ActionKind::DeleteRecord => {
            let index = action.record.index;
            let permitted = proves_live_membership(
                &slot.account_witness,
                state.accounts_root,
                name_key(action.record.account_name),
                action.operating_account_hash,
            );
            let current = proves_live_membership(
                &slot.record_witness,
                state.records_root,
                index,
                action.original_hash,
            );
            if permitted && current {
                let new_leaf = match action.kind {
                    ActionKind::UpdateRecord => action.record.hash(),
                    _ => empty_leaf(),
                };
                state.records_root = slot.record_witness.compute_root(index, new_leaf);
            }
        }
    }
    state
}

/// Whether `witness` proves a live leaf hashing to `value_hash` at `key`.
///
/// The zero hash is the vacancy sentinel ("none" in dispatched actions),
/// never the hash of a stored value, so it must not read as membership of
/// a vacant leaf; a key past the witness height can never be a member at
/// all. Both are ordinary failed permission checks, matching what the
/// batch builder's stored-value comparison concludes for the same slot.
fn proves_live_membership(
    witness: &TreeWitness,
    root: HashOut,
    key: u64,
    value_hash: HashOut,
) -> bool {
    value_hash != empty_leaf()
        && key_fits(key, witness.height())
        && witness.verify_membership(root, key, value_hash)
}

fn proves_vacancy(witness: &TreeWitness, root: HashOut, key: u64) -> bool {
    key_fits(key, witness.height()) && witness.verify_non_membership(root, key)
}
