use anyhow::bail;
use registry_rollup::{fold_actions_hash, Action};
use registry_trie::HashOut;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Read access to the queue of dispatched, not-yet-rolled-up actions.
///
/// Markers are actions-hash values: `from` is exclusive (the hash the
/// caller has already committed), `to` is inclusive when given. Groups are
/// returned oldest first, each group holding the actions of one dispatch.
pub trait ActionQueue {
    fn pending_actions(
        &self,
        from: HashOut,
        to: Option<HashOut>,
    ) -> anyhow::Result<Vec<Vec<Action>>>;
}

/// The actions of one dispatch, together with the value of the actions
/// hash chain after folding them in.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DispatchGroup {
    pub actions: Vec<Action>,
    pub actions_hash_after: HashOut,
}

/// An in-memory action queue, append-only per dispatch. Stands in for the
/// chain's dispatched-actions log; markers address it the same way.
#[derive(Clone, Debug, Default)]
pub struct MemoryActionQueue {
    genesis_hash: HashOut,
    groups: Vec<DispatchGroup>,
}

impl MemoryActionQueue {
    pub fn new(genesis_hash: HashOut) -> Self {
        Self {
            genesis_hash,
            groups: Vec::new(),
        }
    }

    /// Appends one dispatch worth of actions and extends the hash chain.
    pub fn push_group(&mut self, actions: Vec<Action>) {
        let mut hash = self.tip_hash();
        for action in actions.iter().filter(|a| !a.is_dummy()) {
            hash = fold_actions_hash(hash, action);
        }
        trace!(actions = actions.len(), "queued dispatch group");
        self.groups.push(DispatchGroup {
            actions,
            actions_hash_after: hash,
        });
    }

    /// The actions hash after every queued group.
    pub fn tip_hash(&self) -> HashOut {
        self.groups
            .last()
            .map(|group| group.actions_hash_after)
            .unwrap_or(self.genesis_hash)
    }

    /// Index of the first group after the `from` marker, or an error if the
    /// marker matches no point in the chain.
    fn position_after(&self, from: HashOut) -> anyhow::Result<usize> {
        if from == self.genesis_hash {
            return Ok(0);
        }
        match self
            .groups
            .iter()
            .position(|group| group.actions_hash_after == from)
        {
            Some(pos) => Ok(pos + 1),
            None => bail!("actions-hash marker {from:?} matches no queued dispatch"),
        }
    }
}

impl ActionQueue for MemoryActionQueue {
    fn pending_actions(
        &self,
        from: HashOut,
        to: Option<HashOut>,
    ) -> anyhow::Result<Vec<Vec<Action>>> {
        let start = self.position_after(from)?;
        let end = match to {
            Some(to) => {
                let Some(pos) = self.groups[start..]
                    .iter()
                    .position(|group| group.actions_hash_after == to)
                else {
                    bail!("actions-hash marker {to:?} matches no dispatch after the start marker");
                };
                start + pos + 1
            }
            None => self.groups.len(),
        };

        Ok(self.groups[start..end]
            .iter()
            .map(|group| group.actions.clone())
            .collect())
    }
}
