//! Configuration management for the taxonomy builder

use crate::error::FlattenError;

/// Threshold configuration for the flattening pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// Lambda persistence above which a subtree qualifies as its own
    /// top-level group (together with a minimum size of 3)
    pub lambda_threshold: f64,

    /// Member count at which a subtree always becomes a top-level group
    pub children_threshold: usize,

    /// When set, run the bottom-up simplification pass first: subtrees with
    /// fewer reachable articles than this are merged into their parent
    pub leaf_node_threshold: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lambda_threshold: 1000.0,
            children_threshold: 6,
            leaf_node_threshold: None,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        lambda_threshold: f64,
        children_threshold: usize,
        leaf_node_threshold: Option<usize>,
    ) -> Self {
        Self {
            lambda_threshold,
            children_threshold,
            leaf_node_threshold,
        }
    }

    /// Reject non-sensical threshold values before any processing begins
    pub fn validate(&self) -> Result<(), FlattenError> {
        if !self.lambda_threshold.is_finite() || self.lambda_threshold < 0.0 {
            return Err(FlattenError::ThresholdMisconfiguration(format!(
                "lambda_threshold must be a non-negative finite number, got {}",
                self.lambda_threshold
            )));
        }
        if self.children_threshold == 0 {
            return Err(FlattenError::ThresholdMisconfiguration(
                "children_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
