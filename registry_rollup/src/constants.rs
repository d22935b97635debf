/// Number of action slots in a batch unless configured otherwise. Every
/// batch is padded to exactly this many slots.
pub const ACTION_BATCH_SIZE: usize = 1;

/// Height of the accounts tree: names are single field elements, so the
/// full 64-bit canonical key space is addressable.
pub const ACCOUNTS_TREE_HEIGHT: usize = 64;

/// Default height of the records tree. Must stay large enough for the
/// maximum expected record index; overflowing it is fatal.
pub const RECORDS_TREE_HEIGHT: usize = 30;

/// Number of value slots carried by every record, shorter values are
/// zero-padded.
pub const MAX_VALUE_SIZE: usize = 8;
