//! JSON input/output glue for the flattening pipeline

use crate::flatten::FlattenOutcome;
use crate::tree::{ArticleCountIndex, ClusterId, ClusterNode};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One record of the article assignment list; everything beyond the cluster
/// label is ignored
#[derive(Debug, Deserialize)]
struct ArticleRecord {
    label: ClusterId,
}

/// Load the clustering dendrogram from a JSON file
pub fn load_cluster_tree(path: &str) -> Result<ClusterNode> {
    let file = File::open(path).with_context(|| format!("opening cluster tree {path}"))?;
    let tree = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing cluster tree {path}"))?;
    Ok(tree)
}

/// Load the article assignments and build the per-cluster count index.
/// `limit` truncates the list to its first N records when set.
pub fn load_article_counts(path: &str, limit: Option<usize>) -> Result<ArticleCountIndex> {
    let file = File::open(path).with_context(|| format!("opening article list {path}"))?;
    let mut articles: Vec<ArticleRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing article list {path}"))?;
    if let Some(limit) = limit {
        articles.truncate(limit);
    }

    log::info!("Loaded {} article assignments from {}", articles.len(), path);
    Ok(ArticleCountIndex::from_labels(
        articles.into_iter().map(|a| a.label),
    ))
}

/// Save the taxonomy, the used-topics list, the provenance mapping, and a
/// run summary to the specified directory
pub fn save_results(outcome: &FlattenOutcome, output_dir: &str) -> Result<()> {
    log::info!(
        "Saving {} groups to {}",
        outcome.taxonomy.children.len(),
        output_dir
    );

    fs::create_dir_all(output_dir)?;

    write_json(output_dir, "nesting.json", &outcome.taxonomy)?;
    write_json(output_dir, "flat_topics.json", &outcome.used_topics)?;
    write_json(output_dir, "updated_topic_ids.json", &outcome.topic_mappings)?;
    save_summary(outcome, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(outcome: &FlattenOutcome, output_dir: &str) -> Result<()> {
    let group_sizes: Vec<usize> = outcome
        .taxonomy
        .children
        .iter()
        .map(|g| g.children.len())
        .collect();

    let summary = serde_json::json!({
        "group_count": outcome.taxonomy.children.len(),
        "topic_count": outcome.used_topics.len(),
        "remapped_topic_count": outcome.topic_mappings.len(),
        "largest_group_size": group_sizes.iter().max().copied().unwrap_or(0),
        "smallest_group_size": group_sizes.iter().min().copied().unwrap_or(0),
        "avg_group_size": group_sizes.iter().sum::<usize>() as f64 /
                          if group_sizes.is_empty() { 1.0 } else { group_sizes.len() as f64 },
    });

    write_json(output_dir, "summary.json", &summary)
}

fn write_json<T: serde::Serialize>(output_dir: &str, name: &str, value: &T) -> Result<()> {
    let path = Path::new(output_dir).join(name);
    let mut file = BufWriter::new(
        File::create(&path).with_context(|| format!("creating {}", path.display()))?,
    );
    file.write_all(serde_json::to_string_pretty(value)?.as_bytes())?;
    Ok(())
}
