//! The provable computation at the core of the name-registry rollup: the
//! action data model, the batch builder that turns pending actions into
//! uniformly-shaped witnessed slots, and the state-transition checker that
//! re-executes a batch against a claimed source/target state pair.
//!
//! Everything here is a pure function of `(source state, batch)` so that
//! batch proving can run in parallel and, if need be, be re-embedded in a
//! proof system without changing semantics.

pub mod account;
pub mod action;
pub mod batch;
pub mod checker;
pub mod constants;
pub mod record;
pub mod state;

pub use account::{name_key, RegistryAccount};
pub use action::{fold_actions_hash, Action, ActionKind};
pub use batch::{
    build_action_batch, AccountsTree, ActionBatch, ActionSlot, BatchError, RecordsTree,
};
pub use checker::{check_transition, fold_batch, TransitionError};
pub use record::{RegistryRecord, RecordError};
pub use state::{RollupState, StateTransition};
