use plonky2::field::types::Field;
use registry_trie::{hash_fields, HashOut, Leafable, F};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_VALUE_SIZE;

/// An error type for record construction.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum RecordError {
    #[error("The length of value is greater than {MAX_VALUE_SIZE}! (got: {0})")]
    ValueTooLong(usize),
}

/// One entry in the records tree, keyed by its assigned index.
///
/// `index == 0` is the "unassigned" sentinel: add-record actions dispatch
/// with it, and update/delete actions against it can never pass the
/// membership check since index 0 is never written.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct RegistryRecord {
    pub index: u64,
    pub account_name: F,
    pub key: F,
    pub kind: F,
    pub label: F,
    pub ttl: u32,
    pub value: [F; MAX_VALUE_SIZE],
}

impl RegistryRecord {
    pub fn new(
        index: u64,
        account_name: F,
        key: F,
        kind: F,
        label: F,
        ttl: u32,
        value: [F; MAX_VALUE_SIZE],
    ) -> Self {
        Self {
            index,
            account_name,
            key,
            kind,
            label,
            ttl,
            value,
        }
    }

    /// Builds a record from a value of at most [`MAX_VALUE_SIZE`] slots,
    /// zero-padding the tail so all records share one encoding.
    pub fn with_padded_value(
        index: u64,
        account_name: F,
        key: F,
        kind: F,
        label: F,
        ttl: u32,
        value: &[F],
    ) -> Result<Self, RecordError> {
        if value.len() > MAX_VALUE_SIZE {
            return Err(RecordError::ValueTooLong(value.len()));
        }
        let mut padded = [F::ZERO; MAX_VALUE_SIZE];
        padded[..value.len()].copy_from_slice(value);
        Ok(Self::new(index, account_name, key, kind, label, ttl, padded))
    }

    /// The all-zero record used as padding inside dummy actions.
    pub fn empty() -> Self {
        Self::new(
            0,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            0,
            [F::ZERO; MAX_VALUE_SIZE],
        )
    }

    /// Whether the record carries a live index rather than the unassigned
    /// sentinel.
    pub fn is_assigned_index(&self) -> bool {
        self.index != 0
    }

    pub fn hash(&self) -> HashOut {
        hash_fields(&self.to_fields())
    }
}

impl Leafable for RegistryRecord {
    fn to_fields(&self) -> Vec<F> {
        let mut fields = Vec::with_capacity(6 + MAX_VALUE_SIZE);
        fields.push(F::from_canonical_u64(self.index));
        fields.push(self.account_name);
        fields.push(self.key);
        fields.push(self.kind);
        fields.push(self.label);
        fields.push(F::from_canonical_u32(self.ttl));
        fields.extend(self.value);
        fields
    }
}
