//! Bottom-up tree simplification
//!
//! Optional first pass over the dendrogram: collapses branches that carry
//! too few articles into their parents and unwraps degenerate single-child
//! chains, recording every collapsed id in the [`MergeTracker`]. Disabled in
//! the default configuration; the group extraction runs directly on the raw
//! tree unless a `leaf_node_threshold` is configured.

use crate::error::FlattenError;
use crate::flatten::merge::MergeTracker;
use crate::tree::{ArticleCountIndex, ClusterId, ClusterNode};

/// Simplify the tree rooted at `node`, returning the simplified node and the
/// total number of articles reachable under it (its own direct assignments
/// plus everything merged into it and all descendants).
pub fn simplify(
    node: ClusterNode,
    counts: &ArticleCountIndex,
    leaf_node_threshold: usize,
    merges: &mut MergeTracker,
) -> Result<(ClusterNode, usize), FlattenError> {
    let ClusterNode {
        cluster_id,
        lambda_duration,
        children,
    } = node;

    let mut total = counts.for_node(cluster_id);
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        let (mut simplified, child_count) = simplify(child, counts, leaf_node_threshold, merges)?;
        if child_count == 0 {
            // no articles reachable: pruned outright, not merged
            continue;
        }
        total += child_count;

        let child_id = require_id(&simplified)?;
        let direct = direct_article_count(child_id, counts, merges);

        if child_count < leaf_node_threshold {
            // too small to stand alone: fold into the current node
            let survivor = cluster_id.ok_or_else(|| {
                FlattenError::MalformedTree(
                    "cannot merge a child into a node without a cluster_id".into(),
                )
            })?;
            merges.merge(survivor, child_id)?;
        } else if simplified.is_leaf() {
            kept.push(simplified);
        } else if simplified.children.len() == 1 && direct <= 1 {
            // degenerate chain around a negligible node: the single
            // grandchild replaces the child, keeping the most specific id
            let mut promoted = simplified.children.remove(0);
            let promoted_id = require_id(&promoted)?;
            log::debug!("flattening {child_id} -> {promoted_id}");
            merges.merge(promoted_id, child_id)?;
            promoted.lambda_duration += simplified.lambda_duration;
            kept.push(promoted);
        } else if simplified.children.len() == 1 && direct > 0 {
            // the child already carries weight of its own: keep its id and
            // splice the grandchild's children up one level
            let grandchild = simplified.children.remove(0);
            let grandchild_id = require_id(&grandchild)?;
            log::debug!("flattening {grandchild_id} -> {child_id} ({direct})");
            merges.merge(child_id, grandchild_id)?;
            simplified.children = grandchild.children;
            kept.push(simplified);
        } else {
            kept.push(simplified);
        }
    }

    Ok((
        ClusterNode {
            cluster_id,
            lambda_duration,
            children: kept,
        },
        total,
    ))
}

/// Articles directly assigned to `id` plus those of every id already merged
/// into it.
fn direct_article_count(id: ClusterId, counts: &ArticleCountIndex, merges: &MergeTracker) -> usize {
    counts.get(id)
        + merges
            .absorbed_into(id)
            .iter()
            .map(|&merged| counts.get(merged))
            .sum::<usize>()
}

fn require_id(node: &ClusterNode) -> Result<ClusterId, FlattenError> {
    node.cluster_id.ok_or_else(|| {
        FlattenError::MalformedTree("non-root node without a cluster_id".into())
    })
}
