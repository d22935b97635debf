use anyhow::Context;
use proof_gen::{generate_batch_proof, merge_proof_sequence, AggregatableProof};
use registry_rollup::{build_action_batch, AccountsTree, RecordsTree, StateTransition};
use registry_trie::Db;
use tracing::{debug, info};

use crate::config::IndexerConfig;
use crate::contract::LedgerContract;
use crate::queue::ActionQueue;
use crate::state::IndexerState;

/// One full rollup run: drain every action dispatched since the committed
/// state, prove them batch by batch against the live trees, merge the
/// batch proofs into one, and submit it to the contract.
///
/// Returns the overall committed transition, or `None` when the queue held
/// nothing to process. The indexer mirror is advanced only after the
/// contract accepts the proof, then reconciled against the new committed
/// state.
pub fn run_rollup<D: Db>(
    config: &IndexerConfig,
    indexer: &mut IndexerState,
    contract: &mut LedgerContract,
    accounts_tree: &mut AccountsTree<D>,
    records_tree: &mut RecordsTree<D>,
) -> anyhow::Result<Option<StateTransition>> {
    config.validate()?;
    indexer
        .reconcile(contract.committed())
        .context("refusing to roll up from a diverged mirror")?;

    let groups = contract
        .queue()
        .pending_actions(contract.committed().actions_hash, None)?;
    let actions: Vec<_> = groups.into_iter().flatten().collect();
    if actions.is_empty() {
        debug!("no pending actions, nothing to roll up");
        return Ok(None);
    }
    info!(actions = actions.len(), "draining pending actions");

    let mut state = indexer.as_rollup_state();
    let mut proofs: Vec<AggregatableProof> = Vec::new();
    for chunk in actions.chunks(config.batch_capacity) {
        let (transition, batch) =
            build_action_batch(chunk, &state, accounts_tree, records_tree, config.batch_capacity)?;
        let proof = generate_batch_proof(&transition, &batch, None)
            .context("batch proof generation failed")?;
        debug!(
            batch = proofs.len(),
            record_index = transition.target.current_record_index,
            "batch proved"
        );
        state = transition.target;
        proofs.push(proof.into());
    }

    let merged = merge_proof_sequence(proofs).context("merging batch proofs failed")?;
    let transition = *merged.claim();
    contract.rollup(&merged)?;

    indexer.absorb_target(&transition.target);
    indexer
        .reconcile(contract.committed())
        .context("mirror diverged immediately after commit")?;

    Ok(Some(transition))
}
