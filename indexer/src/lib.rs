//! The off-chain side of the name-registry rollup: a mock on-chain ledger
//! contract, the persistent indexer state mirroring it, and the pipeline
//! that drains queued actions into proved batches and submits the merged
//! proof back to the contract.

pub mod config;
pub mod contract;
pub mod pipeline;
pub mod queue;
pub mod state;
pub mod tracing;

pub use config::{ConfigError, IndexerConfig};
pub use contract::{ContractError, LedgerContract};
pub use pipeline::run_rollup;
pub use queue::{ActionQueue, DispatchGroup, MemoryActionQueue};
pub use state::{ConsistencyError, IndexerState};
