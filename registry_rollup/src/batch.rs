use log::trace;
use registry_trie::{key_fits, Db, MerkleTree, TreeError, TreeWitness};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::{name_key, RegistryAccount};
use crate::action::{fold_actions_hash, Action, ActionKind};
use crate::record::RegistryRecord;
use crate::state::{RollupState, StateTransition};

/// The live accounts tree: key-addressed by the canonical u64 of the name.
pub type AccountsTree<D> = MerkleTree<D, RegistryAccount>;
/// The live records tree: index-addressed, deletion writes the empty leaf.
pub type RecordsTree<D> = MerkleTree<D, RegistryRecord>;

/// An error type for batch building.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BatchError {
    /// Caller contract violation: the builder must be invoked once per
    /// batch, never with more actions than one batch holds.
    #[error("{actions} actions exceed the fixed batch capacity of {capacity}!")]
    CapacityExceeded { actions: usize, capacity: usize },

    /// A witness fetched from a tree no longer authenticates that tree's
    /// current root. Recoverable by refetching against the current root
    /// and rebuilding the batch.
    #[error("Fetched witness does not authenticate the current {0} root!")]
    StaleWitness(&'static str),

    /// Tree-level failure, including the fatal record-index overflow past
    /// the configured tree height.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// One batch slot: an action plus a witness into each tree, fetched before
/// the action's own mutation. Whichever tree is irrelevant to the action's
/// kind carries the canonical empty witness so every slot has the same
/// shape.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionSlot {
    pub action: Action,
    pub account_witness: TreeWitness,
    pub record_witness: TreeWitness,
}

/// A fixed-capacity, dummy-padded group of witnessed action slots,
/// processed and proved as one unit.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionBatch {
    pub slots: Vec<ActionSlot>,
}

impl ActionBatch {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// Partitioned off per batch by the caller, this drains up to `capacity`
/// actions into a witnessed batch, applying each action's conditional
/// mutation to the live trees as it is witnessed. The conditions mirror
/// the transition checker exactly; a divergence between the two is a
/// correctness bug, not a runtime error.
///
/// Returns the transition whose target is read off the live trees after
/// the last action, together with the padded batch.
pub fn build_action_batch<D: Db>(
    actions: &[Action],
    source: &RollupState,
    accounts_tree: &mut AccountsTree<D>,
    records_tree: &mut RecordsTree<D>,
    capacity: usize,
) -> Result<(StateTransition, ActionBatch), BatchError> {
    if actions.len() > capacity {
        return Err(BatchError::CapacityExceeded {
            actions: actions.len(),
            capacity,
        });
    }

    let mut actions_hash = source.actions_hash;
    let mut current_record_index = source.current_record_index;
    let mut slots = Vec::with_capacity(capacity);

    for action in actions {
        if !action.is_dummy() {
            actions_hash = fold_actions_hash(actions_hash, action);
        }

        let slot = match action.kind {
            ActionKind::Dummy => ActionSlot {
                action: *action,
                account_witness: TreeWitness::empty(accounts_tree.height()),
                record_witness: TreeWitness::empty(records_tree.height()),
            },
            ActionKind::RegisterAccount => {
                let key = action.account.key();
                let witness = fetch_account_witness(accounts_tree, key)?;
                if !accounts_tree.has(key) {
                    accounts_tree.update(key, Some(action.account))?;
                } else {
                    trace!("register rejected: name already taken");
                }
                ActionSlot {
                    action: *action,
                    account_witness: witness,
                    record_witness: TreeWitness::empty(records_tree.height()),
                }
            }
            ActionKind::UpdateAccount => {
                let key = action.account.key();
                let witness = fetch_account_witness(accounts_tree, key)?;
                let permitted = accounts_tree
                    .get(key)
                    .is_some_and(|stored| stored.hash() == action.original_hash);
                if permitted {
                    accounts_tree.update(key, Some(action.account))?;
                } else {
                    trace!("update-account rejected: original hash mismatch");
                }
                ActionSlot {
                    action: *action,
                    account_witness: witness,
                    record_witness: TreeWitness::empty(records_tree.height()),
                }
            }
            ActionKind::AddRecord => {
                // The index advances before the permission check and stays
                // consumed even when the write is rejected; the committed
                // hash chain depends on this exact behavior.
                current_record_index += 1;
                let index = current_record_index;
                let account_key = name_key(action.record.account_name);
                let account_witness = fetch_account_witness(accounts_tree, account_key)?;
                let record_witness = fetch_record_witness(records_tree, index)?;
                let permitted = accounts_tree
                    .get(account_key)
                    .is_some_and(|stored| stored.hash() == action.operating_account_hash);
                if permitted && !records_tree.has(index) {
                    records_tree.update(index, Some(action.record))?;
                } else {
                    trace!(
                        "add-record rejected at index {index}, index burned without a write"
                    );
                }
                ActionSlot {
                    action: *action,
                    account_witness,
                    record_witness,
                }
            }
            ActionKind::UpdateRecord | ActionKind::DeleteRecord => {
                let index = action.record.index;
                let account_key = name_key(action.record.account_name);
                let account_witness = fetch_account_witness(accounts_tree, account_key)?;
                // An index past the tree capacity can never be a member;
                // it gets the same silent rejection as a failed membership
                // check, with the canonical empty witness in its slot.
                let record_witness = if key_fits(index, records_tree.height()) {
                    fetch_record_witness(records_tree, index)?
                } else {
                    TreeWitness::empty(records_tree.height())
                };
                let permitted = accounts_tree
                    .get(account_key)
                    .is_some_and(|stored| stored.hash() == action.operating_account_hash);
                let current = records_tree
                    .get(index)
                    .is_some_and(|stored| stored.hash() == action.original_hash);
                if permitted && current {
                    let value = match action.kind {
                        ActionKind::UpdateRecord => Some(action.record),
                        _ => None,
                    };
                    records_tree.update(index, value)?;
                } else {
                    trace!("record mutation rejected at index {index}");
                }
                ActionSlot {
                    action: *action,
                    account_witness,
                    record_witness,
                }
            }
        };
        slots.push(slot);
    }

    while slots.len() < capacity {
        slots.push(ActionSlot {
            action: Action::dummy(),
            account_witness: TreeWitness::empty(accounts_tree.height()),
            record_witness: TreeWitness::empty(records_tree.height()),
        });
    }

    let target = RollupState {
        accounts_root: accounts_tree.root(),
        current_record_index,
        records_root: records_tree.root(),
        actions_hash,
    };

    Ok((
        StateTransition::new(*source, target),
        ActionBatch { slots },
    ))
}

/// Fetches a witness and checks it against the accounts tree's current
/// root before the action's own mutation. The check cannot fail with the
/// in-process [`MemoryDb`](registry_trie::MemoryDb); it catches durable
/// [`Db`] backends whose node store has drifted from the cached root,
/// e.g. when mutated out-of-band between rollup runs.
fn fetch_account_witness<D: Db>(
    tree: &AccountsTree<D>,
    key: u64,
) -> Result<TreeWitness, BatchError> {
    let witness = tree.prove(key)?;
    if !witness.verify_membership(tree.root(), key, tree.leaf_hash(key)) {
        return Err(BatchError::StaleWitness("accounts"));
    }
    Ok(witness)
}

fn fetch_record_witness<D: Db>(
    tree: &RecordsTree<D>,
    index: u64,
) -> Result<TreeWitness, BatchError> {
    let witness = tree.prove(index)?;
    if !witness.verify_membership(tree.root(), index, tree.leaf_hash(index)) {
        return Err(BatchError::StaleWitness("records"));
    }
    Ok(witness)
}
