//! End-to-end runs of the dispatch / prove / commit loop against the mock
//! ledger contract.

use std::sync::Once;

use plonky2::field::types::Field;
use proof_gen::{generate_batch_proof, AggregatableProof};
use registry_rollup::constants::{ACCOUNTS_TREE_HEIGHT, RECORDS_TREE_HEIGHT};
use registry_rollup::{
    build_action_batch, Action, AccountsTree, RecordsTree, RegistryAccount, RegistryRecord,
    RollupState, StateTransition,
};
use registry_trie::{empty_leaf, hash_fields, MemoryDb, F};
use rollup_indexer::{run_rollup, IndexerConfig, IndexerState, LedgerContract};

static TRACING: Once = Once::new();

struct Harness {
    config: IndexerConfig,
    indexer: IndexerState,
    contract: LedgerContract,
    accounts: AccountsTree<MemoryDb>,
    records: RecordsTree<MemoryDb>,
}

impl Harness {
    fn new(batch_capacity: usize) -> Self {
        TRACING.call_once(rollup_indexer::tracing::init);
        let config = IndexerConfig {
            batch_capacity,
            records_tree_height: RECORDS_TREE_HEIGHT,
        };
        Self {
            config,
            indexer: IndexerState::genesis(RECORDS_TREE_HEIGHT),
            contract: LedgerContract::deploy(RECORDS_TREE_HEIGHT),
            accounts: AccountsTree::new(ACCOUNTS_TREE_HEIGHT).unwrap(),
            records: RecordsTree::new(RECORDS_TREE_HEIGHT).unwrap(),
        }
    }

    fn run(&mut self) -> anyhow::Result<Option<StateTransition>> {
        run_rollup(
            &self.config,
            &mut self.indexer,
            &mut self.contract,
            &mut self.accounts,
            &mut self.records,
        )
    }

    fn committed(&self) -> RollupState {
        *self.contract.committed()
    }
}

fn account(name: u64) -> RegistryAccount {
    RegistryAccount::new(
        F::from_canonical_u64(name),
        hash_fields(&[F::from_canonical_u64(name), F::ONE]),
        hash_fields(&[F::from_canonical_u64(name), F::TWO]),
    )
}

fn record_for(name: u64) -> RegistryRecord {
    RegistryRecord::with_padded_value(
        0,
        F::from_canonical_u64(name),
        F::from_canonical_u64(7),
        F::ONE,
        F::TWO,
        3600,
        &[F::from_canonical_u64(0xdead)],
    )
    .unwrap()
}

#[test]
fn registration_touches_only_the_accounts_side() {
    let mut h = Harness::new(1);
    let genesis = h.committed();

    h.contract.register_account(account(1)).unwrap();
    let transition = h.run().unwrap().unwrap();

    assert_eq!(transition.source, genesis);
    let target = transition.target;
    assert_ne!(target.accounts_root, genesis.accounts_root);
    assert_eq!(target.records_root, genesis.records_root);
    assert_eq!(target.current_record_index, 0);
    assert_ne!(target.actions_hash, genesis.actions_hash);
    assert_eq!(h.committed(), target);
}

#[test]
fn add_record_assigns_the_next_index() {
    let mut h = Harness::new(1);
    h.contract.register_account(account(1)).unwrap();
    h.run().unwrap();
    let before = h.committed();

    h.contract
        .add_record(record_for(1), account(1).hash())
        .unwrap();
    let target = h.run().unwrap().unwrap().target;

    assert_eq!(target.current_record_index, 1);
    assert_ne!(target.records_root, before.records_root);
    assert_eq!(target.accounts_root, before.accounts_root);
}

#[test]
fn rejected_add_record_still_burns_the_index() {
    let mut h = Harness::new(1);
    h.contract.register_account(account(1)).unwrap();
    h.run().unwrap();
    let before = h.committed();

    let wrong_operator = account(2).hash();
    h.contract
        .add_record(record_for(1), wrong_operator)
        .unwrap();
    let target = h.run().unwrap().unwrap().target;

    assert_eq!(target.current_record_index, 1);
    assert_eq!(target.records_root, before.records_root);
    assert_ne!(target.actions_hash, before.actions_hash);
}

#[test]
fn duplicate_registration_leaves_the_accounts_root_unchanged() {
    let mut h = Harness::new(1);
    h.contract.register_account(account(1)).unwrap();
    h.run().unwrap();
    let before = h.committed();

    h.contract.register_account(account(1)).unwrap();
    let target = h.run().unwrap().unwrap().target;

    assert_eq!(target.accounts_root, before.accounts_root);
    assert_ne!(target.actions_hash, before.actions_hash);
}

#[test]
fn empty_queue_is_a_terminal_no_op() {
    let mut h = Harness::new(1);
    assert!(h.run().unwrap().is_none());

    h.contract.register_account(account(1)).unwrap();
    h.run().unwrap();
    let committed = h.committed();

    assert!(h.run().unwrap().is_none());
    assert_eq!(h.committed(), committed);
    h.indexer.reconcile(h.contract.committed()).unwrap();
}

#[test]
fn one_run_commits_many_batches_as_one_proof() {
    let mut h = Harness::new(1);
    let genesis = h.committed();
    for name in 1..=3 {
        h.contract.register_account(account(name)).unwrap();
    }

    let transition = h.run().unwrap().unwrap();

    assert_eq!(transition.source, genesis);
    assert_eq!(h.committed(), transition.target);
    assert_eq!(h.committed().actions_hash, h.contract.queue().tip_hash());
}

#[test]
fn update_then_delete_returns_the_records_tree_to_empty() {
    let mut h = Harness::new(1);
    h.contract.register_account(account(1)).unwrap();
    h.run().unwrap();
    let empty_records_root = h.committed().records_root;

    let dispatched = record_for(1);
    h.contract
        .add_record(dispatched, account(1).hash())
        .unwrap();
    h.run().unwrap();

    // The stored leaf is the dispatched record verbatim.
    let mut updated = dispatched;
    updated.index = 1;
    updated.ttl = 60;
    h.contract
        .update_record(updated, dispatched.hash(), account(1).hash())
        .unwrap();
    let after_update = h.run().unwrap().unwrap().target;
    assert_ne!(after_update.records_root, empty_records_root);

    h.contract
        .delete_record(updated, updated.hash(), account(1).hash())
        .unwrap();
    let after_delete = h.run().unwrap().unwrap().target;

    assert_eq!(after_delete.records_root, empty_records_root);
    // Deletion frees the leaf, never the index.
    assert_eq!(after_delete.current_record_index, 1);
}

#[test]
fn sentinel_operating_hash_does_not_halt_the_pipeline() {
    let mut h = Harness::new(1);
    let genesis = h.committed();

    // No account registered; the zero "self-authorizing" sentinel must be
    // a rejected write, not a proving failure.
    h.contract.add_record(record_for(1), empty_leaf()).unwrap();
    let target = h.run().unwrap().unwrap().target;

    assert_eq!(target.current_record_index, 1);
    assert_eq!(target.records_root, genesis.records_root);
    assert_eq!(h.committed(), target);
}

#[test]
fn oversized_index_dispatch_does_not_halt_the_pipeline() {
    let mut h = Harness::new(1);
    h.contract.register_account(account(1)).unwrap();
    h.run().unwrap();
    let before = h.committed();

    let mut rec = record_for(1);
    rec.index = 1 << 40;
    h.contract
        .update_record(rec, rec.hash(), account(1).hash())
        .unwrap();
    let target = h.run().unwrap().unwrap().target;

    assert_eq!(target.records_root, before.records_root);
    assert_ne!(target.actions_hash, before.actions_hash);
}

#[test]
fn a_diverged_mirror_refuses_to_run() {
    let mut h = Harness::new(1);
    h.contract.register_account(account(1)).unwrap();
    h.run().unwrap();

    h.indexer.last_processed_record_index += 1;
    h.contract.register_account(account(2)).unwrap();
    assert!(h.run().is_err());
}

#[test]
fn proofs_round_trip_through_serde_json() {
    let mut accounts = AccountsTree::<MemoryDb>::new(ACCOUNTS_TREE_HEIGHT).unwrap();
    let mut records = RecordsTree::<MemoryDb>::new(RECORDS_TREE_HEIGHT).unwrap();
    let state = RollupState::genesis(RECORDS_TREE_HEIGHT);

    let (transition, batch) = build_action_batch(
        &[Action::register_account(account(1))],
        &state,
        &mut accounts,
        &mut records,
        1,
    )
    .unwrap();
    let proof: AggregatableProof = generate_batch_proof(&transition, &batch, None)
        .unwrap()
        .into();

    let encoded = serde_json::to_string(&proof).unwrap();
    let decoded: AggregatableProof = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, proof);
}
