//! Proof generation and merging for the name-registry rollup.
//!
//! This library handles the two kinds of proof work the rollup needs:
//!
//! ### Batch proofs
//!
//! A batch proof attests that re-executing one witnessed action batch from
//! a claimed source state lands exactly on the claimed target state. The
//! claim is the [`StateTransition`](registry_rollup::StateTransition); the
//! attestation itself comes from an opaque succinct-proof backend.
//!
//! ```compile_fail
//!  pub fn generate_batch_proof(
//!     transition: &StateTransition,
//!     batch: &ActionBatch,
//!     abort_signal: Option<Arc<AtomicBool>>,
//! ) -> ProofGenResult<GeneratedBatchProof> { ... }
//! ```
//!
//! ### Aggregation proofs
//!
//! Two proofs over adjacent transitions can be merged into one whose claim
//! spans from the first's source to the second's target. The children may
//! be batch proofs or merged proofs themselves; this library abstracts
//! their type behind an `AggregatableProof` enum. Merging is associative,
//! so independent batch proofs may be produced in parallel and reduced in
//! any adjacency-preserving grouping, but the canonical driver is a strict
//! left-to-right fold ([`merge_proof_sequence`]).
//!
//! Non-adjacent children (`lhs.target != rhs.source`) are rejected before
//! any proof work is attempted: merging out of order would otherwise
//! produce a proof for a non-contiguous state range.

pub mod proof_gen;
pub mod proof_types;

pub use proof_gen::{
    generate_agg_proof, generate_batch_proof, merge_proof_sequence, verify_proof, ProofGenError,
    ProofGenResult,
};
pub use proof_types::{AggregatableProof, GeneratedAggProof, GeneratedBatchProof, ProofIntern};
