//! This module defines the proof generation methods corresponding to the
//! two types of proofs the rollup internally handles.

use std::sync::{atomic::AtomicBool, atomic::Ordering, Arc};

use log::debug;
use registry_rollup::{check_transition, ActionBatch, StateTransition};

use crate::proof_types::{AggregatableProof, GeneratedAggProof, GeneratedBatchProof, ProofIntern};

/// A type alias for `Result<T, ProofGenError>`.
pub type ProofGenResult<T> = Result<T, ProofGenError>;

/// A custom error type to handle failure cases during proof generation.
// The backend reports errors as strings, and since this is a library, it's
// probably best if we keep it that way at this boundary.
#[derive(Debug)]
pub struct ProofGenError(pub String);

impl std::fmt::Display for ProofGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#?}", self.0)
    }
}

impl std::error::Error for ProofGenError {}

impl From<String> for ProofGenError {
    fn from(v: String) -> Self {
        Self(v)
    }
}

/// Generates a batch proof by re-executing the witnessed batch against the
/// claimed transition. Proof generation may be slow; the optional abort
/// signal abandons the unit of work without committing anything.
pub fn generate_batch_proof(
    transition: &StateTransition,
    batch: &ActionBatch,
    abort_signal: Option<Arc<AtomicBool>>,
) -> ProofGenResult<GeneratedBatchProof> {
    check_abort(&abort_signal)?;

    check_transition(transition, batch).map_err(|err| err.to_string())?;
    debug!("batch transition checked, binding attestation");

    Ok(GeneratedBatchProof {
        p_vals: *transition,
        intern: ProofIntern::bind(transition),
    })
}

/// Generates an aggregation proof from two child proofs.
///
/// Note that the child proofs may be either batch or aggregation proofs.
/// Children whose claims are not adjacent (`lhs.target != rhs.source`) are
/// rejected before any proof work is attempted.
pub fn generate_agg_proof(
    lhs_child: &AggregatableProof,
    rhs_child: &AggregatableProof,
) -> ProofGenResult<GeneratedAggProof> {
    verify_proof(lhs_child)?;
    verify_proof(rhs_child)?;

    if lhs_child.claim().target != rhs_child.claim().source {
        return Err(
            "Attempted to merge non-adjacent proofs! The left child's target state must equal \
             the right child's source state component-wise."
                .to_string()
                .into(),
        );
    }

    let p_vals = StateTransition::new(lhs_child.claim().source, rhs_child.claim().target);
    Ok(GeneratedAggProof {
        intern: ProofIntern::bind(&p_vals),
        p_vals,
    })
}

/// Merges an ordered sequence of proofs over contiguous transitions into a
/// single proof by a strict left-to-right fold.
pub fn merge_proof_sequence<I>(proofs: I) -> ProofGenResult<AggregatableProof>
where
    I: IntoIterator<Item = AggregatableProof>,
{
    let mut proofs = proofs.into_iter();
    let mut merged = proofs
        .next()
        .ok_or_else(|| "Cannot merge an empty proof sequence!".to_string())?;

    for proof in proofs {
        merged = generate_agg_proof(&merged, &proof)?.into();
    }
    verify_proof(&merged)?;
    Ok(merged)
}

/// Checks that a proof's attestation matches its public claim.
pub fn verify_proof(proof: &AggregatableProof) -> ProofGenResult<()> {
    if !proof.intern().attests(proof.claim()) {
        return Err("Proof attestation does not match its public claim!"
            .to_string()
            .into());
    }
    Ok(())
}

fn check_abort(abort_signal: &Option<Arc<AtomicBool>>) -> ProofGenResult<()> {
    if let Some(signal) = abort_signal {
        if signal.load(Ordering::Relaxed) {
            return Err("Proof generation aborted by the caller!".to_string().into());
        }
    }
    Ok(())
}
