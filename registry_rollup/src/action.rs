use plonky2::field::types::Field;
use registry_trie::{empty_leaf, hash_fields, hash_pair, HashOut, F};
use serde::{Deserialize, Serialize};

use crate::account::RegistryAccount;
use crate::record::RegistryRecord;

/// The closed set of action kinds the checker dispatches over. There is no
/// open extensibility: every consumer matches exhaustively.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ActionKind {
    /// Padding slot; passes every state component through untouched and is
    /// never folded into the actions hash chain.
    Dummy,
    RegisterAccount,
    UpdateAccount,
    AddRecord,
    UpdateRecord,
    DeleteRecord,
}

impl ActionKind {
    const fn tag(self) -> u64 {
        match self {
            ActionKind::Dummy => 0,
            ActionKind::RegisterAccount => 1,
            ActionKind::UpdateAccount => 2,
            ActionKind::AddRecord => 3,
            ActionKind::UpdateRecord => 4,
            ActionKind::DeleteRecord => 5,
        }
    }
}

/// An immutable, queued intent to mutate the account or record tree.
///
/// Every variant carries the full payload, padded with empty values where a
/// field is irrelevant, so all actions share one fixed-width field
/// encoding. Equality and hashing are content-based.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    pub account: RegistryAccount,
    pub record: RegistryRecord,
    /// Hash of the entity being replaced; zero if none.
    pub original_hash: HashOut,
    /// Hash of the account authorizing the mutation; zero if the action is
    /// self-authorizing.
    pub operating_account_hash: HashOut,
}

impl Action {
    pub fn dummy() -> Self {
        Self {
            kind: ActionKind::Dummy,
            account: RegistryAccount::empty(),
            record: RegistryRecord::empty(),
            original_hash: empty_leaf(),
            operating_account_hash: empty_leaf(),
        }
    }

    pub fn register_account(account: RegistryAccount) -> Self {
        Self {
            kind: ActionKind::RegisterAccount,
            account,
            ..Self::dummy()
        }
    }

    pub fn update_account(account: RegistryAccount, original_hash: HashOut) -> Self {
        Self {
            kind: ActionKind::UpdateAccount,
            account,
            original_hash,
            ..Self::dummy()
        }
    }

    pub fn add_record(record: RegistryRecord, operating_account_hash: HashOut) -> Self {
        Self {
            kind: ActionKind::AddRecord,
            record,
            operating_account_hash,
            ..Self::dummy()
        }
    }

    pub fn update_record(
        record: RegistryRecord,
        original_hash: HashOut,
        operating_account_hash: HashOut,
    ) -> Self {
        Self {
            kind: ActionKind::UpdateRecord,
            record,
            original_hash,
            operating_account_hash,
            ..Self::dummy()
        }
    }

    pub fn delete_record(
        record: RegistryRecord,
        original_hash: HashOut,
        operating_account_hash: HashOut,
    ) -> Self {
        Self {
            kind: ActionKind::DeleteRecord,
            record,
            original_hash,
            operating_account_hash,
            ..Self::dummy()
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.kind == ActionKind::Dummy
    }

    /// The fixed-width field encoding shared by all variants.
    pub fn to_fields(&self) -> Vec<F> {
        let mut fields = Vec::with_capacity(32);
        fields.push(F::from_canonical_u64(self.kind.tag()));
        fields.extend(registry_trie::Leafable::to_fields(&self.account));
        fields.extend(registry_trie::Leafable::to_fields(&self.record));
        fields.extend(self.original_hash.elements);
        fields.extend(self.operating_account_hash.elements);
        fields
    }

    pub fn hash(&self) -> HashOut {
        hash_fields(&self.to_fields())
    }
}

/// One step of the actions hash chain: the order-sensitive accumulator
/// over consumed live actions. Dummy slots are never folded.
pub fn fold_actions_hash(actions_hash: HashOut, action: &Action) -> HashOut {
    hash_pair(actions_hash, action.hash())
}
