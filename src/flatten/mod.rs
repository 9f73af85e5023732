//! Hierarchical flattening engine
//!
//! Takes the clustering dendrogram and produces a two-level topic taxonomy
//! plus a provenance mapping from every merged-away cluster id to the id it
//! survives as. Pipeline order: optional bottom-up simplification, top-level
//! group extraction, group nesting, reverse-mapping inversion.

pub mod groups;
pub mod merge;
pub mod nesting;
pub mod simplify;

pub use groups::{Group, GroupMember};
pub use merge::MergeTracker;
pub use nesting::UsedTopic;

use crate::config::Config;
use crate::error::FlattenError;
use crate::tree::{self, ArticleCountIndex, ClusterId, ClusterNode};
use std::collections::HashMap;

/// Everything one flattening run produces.
#[derive(Debug)]
pub struct FlattenOutcome {
    /// Synthetic root whose children are the top-level groups, each holding
    /// a flat list of leaf topics
    pub taxonomy: ClusterNode,

    /// Flat listing of every node in the taxonomy, annotated with its
    /// owning group
    pub used_topics: Vec<UsedTopic>,

    /// Old cluster id -> surviving cluster id, for every id merged away;
    /// ids never merged are absent and map to themselves
    pub topic_mappings: HashMap<ClusterId, ClusterId>,
}

/// Flatten the dendrogram into a two-level taxonomy.
///
/// Consumes the input tree; the article index and thresholds steer which
/// subtrees survive as groups. Fails outright on malformed input or
/// misconfigured thresholds, with no partial output.
pub fn flatten_tree(
    root: ClusterNode,
    counts: &ArticleCountIndex,
    config: &Config,
) -> Result<FlattenOutcome, FlattenError> {
    config.validate()?;
    tree::validate(&root)?;

    let mut merges = MergeTracker::new();

    let root = match config.leaf_node_threshold {
        Some(threshold) => {
            let (simplified, total) = simplify::simplify(root, counts, threshold, &mut merges)?;
            log::info!("simplified tree spans {total} articles");
            simplified
        }
        None => root,
    };

    let mut collected = Vec::new();
    let leftover = groups::extract_groups(root, config, &mut collected);
    if !leftover.is_empty() {
        // known behavior: topics that never reach a threshold at the root
        // are dropped rather than collected into a catch-all group
        log::warn!(
            "{} topics did not reach any group threshold and were dropped",
            leftover.len()
        );
    }
    log::info!("extracted {} top-level groups", collected.len());

    let taxonomy = nesting::build_nesting(collected, &mut merges)?;
    let used_topics = nesting::used_topics(&taxonomy);
    let topic_mappings = merges.invert();

    Ok(FlattenOutcome {
        taxonomy,
        used_topics,
        topic_mappings,
    })
}
