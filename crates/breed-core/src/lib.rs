//! Core types for breeding-chain search.
//!
//! Provides the record parser ([`records`]), the case-insensitive entity
//! registry with its egg-group index ([`registry::Registry`]), the immutable
//! adjacency graph ([`graph::BreedGraph`]), configuration and the error taxonomy.

pub mod config;
pub mod error;
pub mod graph;
pub mod records;
pub mod registry;

pub use error::{BreedError, Result};
