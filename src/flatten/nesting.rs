//! Group nesting assembly
//!
//! Turns the extracted groups into the final two-level taxonomy: a synthetic
//! root whose children are one node per group, each holding a flat list of
//! leaf topics.

use crate::error::FlattenError;
use crate::flatten::groups::{Group, GroupMember};
use crate::flatten::merge::MergeTracker;
use crate::tree::{ClusterId, ClusterNode};
use serde::Serialize;

/// A topic as it appears in the flat used-topics output: a taxonomy node
/// annotated with the id of its owning group (null for group representatives).
#[derive(Debug, Clone, Serialize)]
pub struct UsedTopic {
    pub cluster_id: Option<ClusterId>,
    pub lambda_duration: f64,
    pub parent_topic_id: Option<ClusterId>,
}

/// Assemble the output taxonomy from the extracted groups.
///
/// Each group's first member becomes the top-level node; leaf members are
/// appended to it with their children cleared, in original order. A non-leaf
/// member still carrying children at this stage was never flattened to a
/// leaf: only its id survives, merged into the representative.
pub fn build_nesting(
    groups: Vec<Group>,
    merges: &mut MergeTracker,
) -> Result<ClusterNode, FlattenError> {
    let mut group_nodes = Vec::with_capacity(groups.len());

    for group in groups {
        let mut members = group.members.into_iter();
        let representative = members.next().ok_or_else(|| {
            FlattenError::MalformedTree("extracted group with no members".into())
        })?;
        let (cluster_id, lambda_duration) = match representative {
            GroupMember::Branch {
                cluster_id,
                lambda_duration,
            } => (cluster_id, lambda_duration),
            GroupMember::Leaf(node) => (node.cluster_id, node.lambda_duration),
        };

        let mut children = Vec::new();
        for member in members {
            match member {
                GroupMember::Branch {
                    cluster_id: Some(absorbed),
                    ..
                } => {
                    let survivor = cluster_id.ok_or_else(|| {
                        FlattenError::MalformedTree(
                            "group representative without a cluster_id cannot absorb members"
                                .into(),
                        )
                    })?;
                    merges.merge(survivor, absorbed)?;
                }
                GroupMember::Branch {
                    cluster_id: None, ..
                } => {
                    return Err(FlattenError::MalformedTree(
                        "non-root node without a cluster_id".into(),
                    ));
                }
                GroupMember::Leaf(mut node) => {
                    node.children.clear();
                    children.push(node);
                }
            }
        }

        log::debug!(
            "G{:?}: {:.3} lambda, {} children",
            cluster_id,
            lambda_duration,
            children.len()
        );
        group_nodes.push(ClusterNode {
            cluster_id,
            lambda_duration,
            children,
        });
    }

    Ok(ClusterNode {
        cluster_id: None,
        lambda_duration: 0.0,
        children: group_nodes,
    })
}

/// Flatten the taxonomy into the used-topics list: every group
/// representative (null parent) followed by its leaves.
pub fn used_topics(taxonomy: &ClusterNode) -> Vec<UsedTopic> {
    let mut topics = Vec::new();
    for group in &taxonomy.children {
        topics.push(UsedTopic {
            cluster_id: group.cluster_id,
            lambda_duration: group.lambda_duration,
            parent_topic_id: None,
        });
        for leaf in &group.children {
            topics.push(UsedTopic {
                cluster_id: leaf.cluster_id,
                lambda_duration: leaf.lambda_duration,
                parent_topic_id: group.cluster_id,
            });
        }
    }
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ClusterNode as Node;

    fn branch(id: ClusterId, lambda: f64) -> GroupMember {
        GroupMember::Branch {
            cluster_id: Some(id),
            lambda_duration: lambda,
        }
    }

    #[test]
    fn builds_two_level_tree() {
        let groups = vec![Group {
            members: vec![
                branch(1, 2.0),
                GroupMember::Leaf(Node::leaf(2, 0.5)),
                GroupMember::Leaf(Node::leaf(3, 0.7)),
            ],
        }];
        let mut merges = MergeTracker::new();

        let taxonomy = build_nesting(groups, &mut merges).unwrap();
        assert_eq!(taxonomy.cluster_id, None);
        assert_eq!(taxonomy.children.len(), 1);

        let group = &taxonomy.children[0];
        assert_eq!(group.cluster_id, Some(1));
        assert!((group.lambda_duration - 2.0).abs() < 1e-9);
        let ids: Vec<_> = group.children.iter().map(|c| c.cluster_id).collect();
        assert_eq!(ids, vec![Some(2), Some(3)]);
        assert!(group.children.iter().all(Node::is_leaf));
        assert!(merges.is_empty());
    }

    #[test]
    fn non_leaf_members_are_merged_not_flattened() {
        let groups = vec![Group {
            members: vec![
                branch(1, 2.0),
                branch(10, 0.1),
                GroupMember::Leaf(Node::leaf(11, 0.5)),
            ],
        }];
        let mut merges = MergeTracker::new();

        let taxonomy = build_nesting(groups, &mut merges).unwrap();
        let group = &taxonomy.children[0];
        let ids: Vec<_> = group.children.iter().map(|c| c.cluster_id).collect();
        assert_eq!(ids, vec![Some(11)]);
        assert_eq!(merges.invert().get(&10), Some(&1));
    }

    #[test]
    fn group_order_is_preserved() {
        let groups = vec![
            Group {
                members: vec![branch(1, 1.0)],
            },
            Group {
                members: vec![branch(5, 1.0)],
            },
        ];
        let mut merges = MergeTracker::new();

        let taxonomy = build_nesting(groups, &mut merges).unwrap();
        let ids: Vec<_> = taxonomy.children.iter().map(|g| g.cluster_id).collect();
        assert_eq!(ids, vec![Some(1), Some(5)]);
    }

    #[test]
    fn used_topics_annotates_parents() {
        let groups = vec![Group {
            members: vec![
                branch(1, 2.0),
                GroupMember::Leaf(Node::leaf(2, 0.5)),
                GroupMember::Leaf(Node::leaf(3, 0.7)),
            ],
        }];
        let mut merges = MergeTracker::new();
        let taxonomy = build_nesting(groups, &mut merges).unwrap();

        let topics = used_topics(&taxonomy);
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0].cluster_id, Some(1));
        assert_eq!(topics[0].parent_topic_id, None);
        assert_eq!(topics[1].cluster_id, Some(2));
        assert_eq!(topics[1].parent_topic_id, Some(1));
        assert_eq!(topics[2].parent_topic_id, Some(1));
    }
}
