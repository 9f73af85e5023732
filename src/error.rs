//! Error types for the flattening pipeline

use crate::tree::ClusterId;
use thiserror::Error;

/// Errors raised by the flattening pipeline.
///
/// All of these indicate data-integrity or configuration problems, not
/// recoverable conditions: the dendrogram is produced by a prior clustering
/// step and is expected to be internally consistent, so the pipeline fails
/// the whole run rather than trying to heal a broken input.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// The input tree violates the data model (duplicate cluster id,
    /// missing id on a non-root node, negative or non-finite lambda).
    #[error("malformed cluster tree: {0}")]
    MalformedTree(String),

    /// Threshold parameters rejected at the boundary before processing.
    #[error("invalid thresholds: {0}")]
    ThresholdMisconfiguration(String),

    /// A merge would violate the forest invariant of the merge tracker.
    #[error("merging cluster {absorbed} into {survivor} would create a cycle")]
    MergeCycle {
        survivor: ClusterId,
        absorbed: ClusterId,
    },
}
