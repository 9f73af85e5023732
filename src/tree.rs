//! Dendrogram data model shared by the flattening passes

use crate::error::FlattenError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Identifier assigned to a cluster by the upstream clustering step
pub type ClusterId = u32;

/// A node in the clustering dendrogram.
///
/// The same shape is used for the input tree and for the flattened output
/// taxonomy; only the synthetic output root carries a null `cluster_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterNode {
    /// Unique identifier among all nodes produced by the clustering step;
    /// null only on the synthetic taxonomy root
    pub cluster_id: Option<ClusterId>,

    /// Persistence of this cluster during the clustering merge sequence;
    /// larger means a more robust, more semantically distinct cluster
    pub lambda_duration: f64,

    /// Child clusters; an empty list marks a leaf
    pub children: Vec<ClusterNode>,
}

impl ClusterNode {
    /// Create an internal node with the given children
    pub fn new(cluster_id: ClusterId, lambda_duration: f64, children: Vec<ClusterNode>) -> Self {
        Self {
            cluster_id: Some(cluster_id),
            lambda_duration,
            children,
        }
    }

    /// Create a leaf node
    pub fn leaf(cluster_id: ClusterId, lambda_duration: f64) -> Self {
        Self::new(cluster_id, lambda_duration, Vec::new())
    }

    /// A node with no children is a leaf by definition
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Check the input tree against the data-model invariants: every non-root
/// node carries a `cluster_id`, ids are unique across the whole tree, and
/// lambda values are finite and non-negative.
pub fn validate(root: &ClusterNode) -> Result<(), FlattenError> {
    let mut seen = HashSet::new();
    if let Some(id) = root.cluster_id {
        seen.insert(id);
    }
    check_lambda(root)?;
    for child in &root.children {
        validate_node(child, &mut seen)?;
    }
    Ok(())
}

fn validate_node(node: &ClusterNode, seen: &mut HashSet<ClusterId>) -> Result<(), FlattenError> {
    let id = node
        .cluster_id
        .ok_or_else(|| FlattenError::MalformedTree("non-root node without a cluster_id".into()))?;
    if !seen.insert(id) {
        return Err(FlattenError::MalformedTree(format!(
            "cluster_id {id} appears more than once"
        )));
    }
    check_lambda(node)?;
    for child in &node.children {
        validate_node(child, seen)?;
    }
    Ok(())
}

fn check_lambda(node: &ClusterNode) -> Result<(), FlattenError> {
    if !node.lambda_duration.is_finite() || node.lambda_duration < 0.0 {
        return Err(FlattenError::MalformedTree(format!(
            "cluster {:?} has invalid lambda_duration {}",
            node.cluster_id, node.lambda_duration
        )));
    }
    Ok(())
}

/// Count of articles directly labeled with each cluster id.
///
/// Built once from the article assignment list and never mutated afterward.
#[derive(Debug, Clone, Default)]
pub struct ArticleCountIndex {
    counts: HashMap<ClusterId, usize>,
    total: usize,
}

impl ArticleCountIndex {
    /// Build the index from the article labels
    pub fn from_labels(labels: impl IntoIterator<Item = ClusterId>) -> Self {
        let counts = labels.into_iter().counts();
        let total = counts.values().sum();
        Self { counts, total }
    }

    /// Articles directly labeled with `id`
    pub fn get(&self, id: ClusterId) -> usize {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Direct count for a node; the synthetic root (null id) owns no articles
    pub fn for_node(&self, id: Option<ClusterId>) -> usize {
        id.map_or(0, |id| self.get(id))
    }

    /// Total number of articles the index was built from
    pub fn total(&self) -> usize {
        self.total
    }
}
