use registry_rollup::constants::{ACTION_BATCH_SIZE, RECORDS_TREE_HEIGHT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error type for invalid indexer configurations, caught before any
/// batch work starts.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("Batch capacity must be at least 1!")]
    ZeroBatchCapacity,

    #[error("Records tree height {0} is outside the supported 1..=64 range!")]
    InvalidTreeHeight(usize),
}

/// Runtime configuration of the indexer pipeline. Fixed for the lifetime
/// of a deployment: the committed hash chain and record indices depend on
/// these values, so changing them mid-deployment is a consensus break.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexerConfig {
    /// Number of action slots per proved batch; shorter batches are padded
    /// with dummy slots.
    pub batch_capacity: usize,
    /// Height of the index-addressed records tree, bounding the total
    /// number of assignable record indices.
    pub records_tree_height: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            batch_capacity: ACTION_BATCH_SIZE,
            records_tree_height: RECORDS_TREE_HEIGHT,
        }
    }
}

impl IndexerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_capacity == 0 {
            return Err(ConfigError::ZeroBatchCapacity);
        }
        if self.records_tree_height == 0 || self.records_tree_height > 64 {
            return Err(ConfigError::InvalidTreeHeight(self.records_tree_height));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        IndexerConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = IndexerConfig {
            batch_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBatchCapacity));
    }

    #[test]
    fn out_of_range_height_is_rejected() {
        for height in [0, 65] {
            let config = IndexerConfig {
                records_tree_height: height,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::InvalidTreeHeight(height)));
        }
    }
}
