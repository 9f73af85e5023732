use anyhow::Result;
use clap::Parser;
use topic_taxonomy_builder::config::Config;
use topic_taxonomy_builder::{flatten, storage};

#[derive(Parser, Debug)]
#[clap(
    name = "topic-taxonomy-builder",
    about = "Flattens a hierarchical clustering dendrogram into a two-level topic taxonomy"
)]
struct Cli {
    /// Path to the clustering dendrogram JSON file
    #[clap(long)]
    tree: String,

    /// Path to the article assignment JSON file
    #[clap(long)]
    articles: String,

    /// Output directory for results
    #[clap(long, default_value = "taxonomy_results")]
    output_dir: String,

    /// Lambda persistence above which a subtree becomes its own group
    #[clap(long, default_value = "1000.0")]
    lambda_threshold: f64,

    /// Member count at which a subtree always becomes a group
    #[clap(long, default_value = "6")]
    children_threshold: usize,

    /// Enable the bottom-up simplification pass: subtrees with fewer
    /// reachable articles than this are merged into their parent
    #[clap(long)]
    leaf_node_threshold: Option<usize>,

    /// Only use the first N article assignments
    #[clap(long)]
    article_limit: Option<usize>,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Starting taxonomy build");
    log::info!("Tree: {}", args.tree);
    log::info!("Articles: {}", args.articles);
    log::info!("Output: {}", args.output_dir);

    let config = Config::new(
        args.lambda_threshold,
        args.children_threshold,
        args.leaf_node_threshold,
    );

    // 1. Load data
    let counts = storage::load_article_counts(&args.articles, args.article_limit)?;
    let tree = storage::load_cluster_tree(&args.tree)?;

    // 2. Flatten into the two-level taxonomy
    let outcome = flatten::flatten_tree(tree, &counts, &config)?;

    if !outcome.used_topics.is_empty() {
        log::info!(
            "Using {} topics for {} articles (average {:.2})",
            outcome.used_topics.len(),
            counts.total(),
            counts.total() as f64 / outcome.used_topics.len() as f64
        );
    }

    // 3. Save results
    storage::save_results(&outcome, &args.output_dir)?;

    log::info!("Taxonomy build complete. Results saved to {}", args.output_dir);

    Ok(())
}
