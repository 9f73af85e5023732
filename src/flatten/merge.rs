//! Merge provenance bookkeeping

use crate::error::FlattenError;
use crate::tree::ClusterId;
use std::collections::HashMap;

/// Records, for each surviving cluster id, the ids absorbed into it.
///
/// The relation is a forest: each id is merged into at most one surviving id
/// over the tracker's lifetime, and an absorbed id never also appears as a
/// key (its own absorbed list is spliced into the absorber's on merge). List
/// order is insertion order and carries no meaning beyond auditability.
#[derive(Debug, Default)]
pub struct MergeTracker {
    absorbed: HashMap<ClusterId, Vec<ClusterId>>,
}

impl MergeTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `absorbed` (and everything already merged into it) now
    /// belongs to `survivor`. Merging an id into itself is a no-op; a merge
    /// that would close a cycle is an internal invariant violation and is
    /// rejected rather than silently recorded.
    pub fn merge(&mut self, survivor: ClusterId, absorbed: ClusterId) -> Result<(), FlattenError> {
        if survivor == absorbed {
            return Ok(());
        }
        if self
            .absorbed
            .get(&absorbed)
            .map_or(false, |ids| ids.contains(&survivor))
        {
            return Err(FlattenError::MergeCycle { survivor, absorbed });
        }
        let inherited = self.absorbed.remove(&absorbed).unwrap_or_default();
        let entry = self.absorbed.entry(survivor).or_default();
        entry.push(absorbed);
        entry.extend(inherited);
        Ok(())
    }

    /// Ids merged into `id` so far, in insertion order
    pub fn absorbed_into(&self, id: ClusterId) -> &[ClusterId] {
        self.absorbed.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if no merges were recorded
    pub fn is_empty(&self) -> bool {
        self.absorbed.is_empty()
    }

    /// Invert the forward records into a reverse lookup: every absorbed id,
    /// at any depth, maps to its final surviving id. Ids never merged are
    /// absent; callers treat "absent" as "maps to itself".
    pub fn invert(&self) -> HashMap<ClusterId, ClusterId> {
        let mut mapping = HashMap::new();
        for (&survivor, absorbed) in &self.absorbed {
            for &old in absorbed {
                mapping.insert(old, survivor);
            }
        }
        mapping
    }
}
