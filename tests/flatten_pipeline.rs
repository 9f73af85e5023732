//! End-to-end tests for the flattening pipeline

use std::collections::HashSet;
use topic_taxonomy_builder::config::Config;
use topic_taxonomy_builder::flatten::{flatten_tree, FlattenOutcome};
use topic_taxonomy_builder::tree::{ArticleCountIndex, ClusterId, ClusterNode};

fn node(id: ClusterId, lambda: f64, children: Vec<ClusterNode>) -> ClusterNode {
    ClusterNode::new(id, lambda, children)
}

fn leaf(id: ClusterId) -> ClusterNode {
    ClusterNode::leaf(id, 0.0)
}

fn counts(labels: &[ClusterId]) -> ArticleCountIndex {
    ArticleCountIndex::from_labels(labels.iter().copied())
}

/// A mid-sized tree exercising committed groups, folded-in subtrees, and a
/// dropped root leftover:
///
/// - node 1 commits on lambda (persistent, 3 members)
/// - node 4 commits on size, absorbing the too-small inner node 12
/// - leaf 11 never reaches a threshold and is dropped at the root
fn sample_tree() -> ClusterNode {
    let persistent = node(1, 2000.0, vec![leaf(2), leaf(3)]);
    let inner = node(12, 0.0, vec![leaf(13), leaf(14)]);
    let large = node(
        4,
        0.0,
        vec![leaf(5), leaf(6), leaf(7), leaf(8), inner],
    );
    node(0, 0.0, vec![persistent, large, leaf(11)])
}

fn run(tree: ClusterNode, labels: &[ClusterId], config: &Config) -> FlattenOutcome {
    flatten_tree(tree, &counts(labels), config).expect("pipeline should succeed")
}

#[test]
fn single_leaf_produces_no_groups() {
    let outcome = run(ClusterNode::leaf(1, 0.0), &[1], &Config::default());

    assert!(outcome.taxonomy.children.is_empty());
    assert!(outcome.used_topics.is_empty());
    assert!(outcome.topic_mappings.is_empty());
}

#[test]
fn size_threshold_produces_one_flat_group() {
    let children = (2..=7).map(leaf).collect();
    let tree = node(1, 0.0, children);
    let outcome = run(tree, &[], &Config::default());

    assert_eq!(outcome.taxonomy.cluster_id, None);
    assert_eq!(outcome.taxonomy.children.len(), 1);

    let group = &outcome.taxonomy.children[0];
    assert_eq!(group.cluster_id, Some(1));
    let ids: Vec<_> = group.children.iter().map(|c| c.cluster_id).collect();
    assert_eq!(
        ids,
        vec![Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)]
    );
    assert!(group.children.iter().all(ClusterNode::is_leaf));
    assert!(outcome.topic_mappings.is_empty());
}

#[test]
fn simplifier_promotes_specific_id_and_records_provenance() {
    // 1 -> 2 -> 3 with one article on the leaf: node 2 is negligible, so the
    // more specific id 3 replaces it
    let tree = node(1, 0.0, vec![node(2, 0.5, vec![ClusterNode::leaf(3, 2.0)])]);
    let config = Config::new(1000.0, 6, Some(1));
    let outcome = run(tree, &[3], &config);

    assert_eq!(outcome.topic_mappings.len(), 1);
    assert_eq!(outcome.topic_mappings.get(&2), Some(&3));
}

#[test]
fn absorbed_branch_maps_to_its_group_representative() {
    let outcome = run(sample_tree(), &[], &Config::default());
    assert_eq!(outcome.topic_mappings.get(&12), Some(&4));
}

#[test]
fn every_input_leaf_is_used_mapped_or_dropped() {
    let outcome = run(sample_tree(), &[], &Config::default());

    let used: HashSet<_> = outcome
        .used_topics
        .iter()
        .filter_map(|t| t.cluster_id)
        .collect();
    let mapped: HashSet<_> = outcome.topic_mappings.keys().copied().collect();

    // leaf 11 was dropped at the root; everything else is accounted for
    let input_leaves = [2, 3, 5, 6, 7, 8, 11, 13, 14];
    for id in input_leaves {
        let accounted = used.contains(&id) || mapped.contains(&id) || id == 11;
        assert!(accounted, "leaf {id} lost without trace");
    }

    // never duplicated across both outputs
    assert!(used.is_disjoint(&mapped));
}

#[test]
fn output_ids_all_come_from_the_input() {
    let outcome = run(sample_tree(), &[], &Config::default());

    let mut input_ids = HashSet::new();
    let mut stack = vec![sample_tree()];
    while let Some(n) = stack.pop() {
        input_ids.extend(n.cluster_id);
        stack.extend(n.children);
    }

    for group in &outcome.taxonomy.children {
        let id = group.cluster_id.expect("group nodes carry ids");
        assert!(input_ids.contains(&id));
        for leaf in &group.children {
            assert!(input_ids.contains(&leaf.cluster_id.expect("leaves carry ids")));
        }
    }
    for (old, new) in &outcome.topic_mappings {
        assert!(input_ids.contains(old));
        assert!(input_ids.contains(new));
    }
}

#[test]
fn taxonomy_is_exactly_two_levels() {
    let outcome = run(sample_tree(), &[], &Config::default());

    assert!(!outcome.taxonomy.children.is_empty());
    for group in &outcome.taxonomy.children {
        for leaf in &group.children {
            assert!(leaf.is_leaf());
        }
    }
}

#[test]
fn regrouping_the_taxonomy_is_a_fixed_point() {
    let config = Config::default();
    let first = run(sample_tree(), &[], &config);
    let second = run(first.taxonomy.clone(), &[], &config);

    assert_eq!(second.taxonomy, first.taxonomy);
    assert!(second.topic_mappings.is_empty());
}

#[test]
fn used_topics_parents_point_at_group_representatives() {
    let outcome = run(sample_tree(), &[], &Config::default());

    let reps: HashSet<_> = outcome
        .taxonomy
        .children
        .iter()
        .map(|g| g.cluster_id)
        .collect();

    for topic in &outcome.used_topics {
        match topic.parent_topic_id {
            None => assert!(reps.contains(&topic.cluster_id)),
            Some(parent) => assert!(reps.contains(&Some(parent))),
        }
    }
}

#[test]
fn malformed_tree_fails_the_whole_run() {
    let tree = node(1, 0.0, vec![leaf(2), leaf(2)]);
    assert!(flatten_tree(tree, &counts(&[]), &Config::default()).is_err());
}

#[test]
fn bad_thresholds_are_rejected_before_processing() {
    let config = Config::new(1000.0, 0, None);
    assert!(flatten_tree(leaf(1), &counts(&[]), &config).is_err());
}
