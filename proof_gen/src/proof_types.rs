//! This module defines the various proof types used throughout the rollup
//! proof generation process.

use registry_rollup::StateTransition;
use registry_trie::{hash_fields, HashOut};
use serde::{Deserialize, Serialize};

/// The backend attestation carried by every proof.
///
/// The succinct-proof backend is an external capability; all this crate
/// relies on is that the attestation is bound to the public claim and can
/// be re-verified against it. A real backend slots its serialized proof in
/// here without touching the merge protocol.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ProofIntern {
    digest: HashOut,
}

impl ProofIntern {
    /// Binds an attestation to `claim`. Only called after the claimed
    /// computation has actually been re-executed.
    pub(crate) fn bind(claim: &StateTransition) -> Self {
        Self {
            digest: hash_fields(&claim.to_fields()),
        }
    }

    /// Whether this attestation was produced for `claim`.
    pub fn attests(&self, claim: &StateTransition) -> bool {
        self.digest == hash_fields(&claim.to_fields())
    }
}

/// A batch proof along with its public claim, for proper connection with
/// contiguous proofs.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GeneratedBatchProof {
    /// Public claim of this batch proof.
    pub p_vals: StateTransition,
    /// Underlying backend attestation.
    pub intern: ProofIntern,
}

/// A merged proof along with its public claim, for proper connection with
/// contiguous proofs.
///
/// Merged proofs can represent any contiguous range of two or more
/// batches, up to an entire rollup run.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GeneratedAggProof {
    /// Public claim of this merged proof.
    pub p_vals: StateTransition,
    /// Underlying backend attestation.
    pub intern: ProofIntern,
}

/// Sometimes we don't care about the underlying proof type and instead only
/// if we can combine it into an agg proof. For these cases, we want to
/// abstract away whether or not the proof was a batch or agg proof.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AggregatableProof {
    /// The underlying proof is a batch proof.
    Batch(GeneratedBatchProof),
    /// The underlying proof is an aggregation proof.
    Agg(GeneratedAggProof),
}

impl AggregatableProof {
    /// The public claim: the contiguous state range this proof covers.
    pub const fn claim(&self) -> &StateTransition {
        match self {
            AggregatableProof::Batch(info) => &info.p_vals,
            AggregatableProof::Agg(info) => &info.p_vals,
        }
    }

    pub const fn intern(&self) -> &ProofIntern {
        match self {
            AggregatableProof::Batch(info) => &info.intern,
            AggregatableProof::Agg(info) => &info.intern,
        }
    }

    pub const fn is_agg(&self) -> bool {
        match self {
            AggregatableProof::Batch(_) => false,
            AggregatableProof::Agg(_) => true,
        }
    }
}

impl From<GeneratedBatchProof> for AggregatableProof {
    fn from(v: GeneratedBatchProof) -> Self {
        Self::Batch(v)
    }
}

impl From<GeneratedAggProof> for AggregatableProof {
    fn from(v: GeneratedAggProof) -> Self {
        Self::Agg(v)
    }
}
