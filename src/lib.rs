//! Core library for flattening a hierarchical clustering dendrogram into a
//! browsable two-level topic taxonomy with merge provenance.

pub mod config;
pub mod error;
pub mod flatten;
pub mod storage;
pub mod tree;

pub use anyhow::{Result, anyhow};
