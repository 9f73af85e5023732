//! Top-level group extraction
//!
//! Partitions the (possibly simplified) dendrogram into a flat list of
//! top-level groups. The walk is bottom-up: each call returns the leaf
//! members not yet committed to a group, and a subtree is cut off as its own
//! group once it is either persistent enough (lambda) or large enough
//! (member count). Whatever is left over at the outermost call never reached
//! a threshold and is dropped by the pipeline.

use crate::config::Config;
use crate::tree::{ClusterId, ClusterNode};

/// A member of an extracted group.
///
/// Interior nodes contribute only their identity to the taxonomy (their
/// subtrees have already been distributed to groups by the recursion), while
/// leaves are carried whole.
#[derive(Debug)]
pub enum GroupMember {
    /// An interior node of the original tree, reduced to its identity
    Branch {
        cluster_id: Option<ClusterId>,
        lambda_duration: f64,
    },
    /// A leaf topic, carried as-is
    Leaf(ClusterNode),
}

impl GroupMember {
    /// Cluster id of this member
    pub fn cluster_id(&self) -> Option<ClusterId> {
        match self {
            GroupMember::Branch { cluster_id, .. } => *cluster_id,
            GroupMember::Leaf(node) => node.cluster_id,
        }
    }
}

/// An extracted top-level group; the first member is the representative
/// whose id becomes the group's top-level id.
#[derive(Debug)]
pub struct Group {
    pub members: Vec<GroupMember>,
}

/// Recursively extract top-level groups from the tree rooted at `node`,
/// appending committed groups to `groups`. Returns the members that did not
/// reach any threshold, for the caller to fold into its own decision.
pub fn extract_groups(
    node: ClusterNode,
    config: &Config,
    groups: &mut Vec<Group>,
) -> Vec<GroupMember> {
    let ClusterNode {
        cluster_id,
        lambda_duration,
        children,
    } = node;

    // the node itself comes first: it represents the direct items at this
    // level and becomes the representative if the group commits
    let mut members = vec![GroupMember::Branch {
        cluster_id,
        lambda_duration,
    }];

    for child in children {
        if child.is_leaf() {
            members.push(GroupMember::Leaf(child));
        } else {
            members.extend(extract_groups(child, config, groups));
        }
    }

    let well_defined = lambda_duration >= config.lambda_threshold && members.len() > 2;
    if well_defined || members.len() >= config.children_threshold {
        groups.push(Group { members });
        Vec::new()
    } else {
        members
    }
}
