//! Path reconstruction and the end-to-end chain query.

use crate::search::{SearchOptions, SearchState, shortest_path_bfs_with};
use breed_core::error::{BreedError, Result};
use breed_core::graph::BreedGraph;
use breed_core::registry::EntityId;
use serde::Serialize;

/// A shortest breeding chain, ordered source to target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreedChain {
    /// Display names in the chain (source to target).
    pub names: Vec<String>,
    #[serde(skip)]
    pub ids: Vec<EntityId>,
    /// `via[i]` lists the egg groups shared by `names[i]` and `names[i + 1]`.
    pub via: Vec<Vec<String>>,
}

impl BreedChain {
    /// Number of hops in the chain.
    pub fn len(&self) -> usize {
        self.via.len()
    }

    /// Returns true if the chain holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn join(&self, separator: &str) -> String {
        self.names.join(separator)
    }

    /// Build the chain ending at `target` from a finished search.
    pub fn from_search(graph: &BreedGraph, state: &SearchState, target: EntityId) -> Result<Self> {
        let mut ids = traverse_shortest_path(graph, state, target)?;
        ids.reverse();

        let names = ids
            .iter()
            .map(|&id| graph.registry().name(id).to_string())
            .collect();
        let via = ids
            .windows(2)
            .map(|pair| {
                graph
                    .shared_groups(pair[0], pair[1])
                    .into_iter()
                    .map(String::from)
                    .collect()
            })
            .collect();

        Ok(Self { names, ids, via })
    }
}

/// Walk `previous` links from `target` back to the search source.
///
/// The result is in traversal order: target first, source last. Fails with
/// [`BreedError::NoPathExists`] when the search never reached `target`, or
/// [`BreedError::ChainExceedsMaxHops`] when a hop limit stopped it first.
pub fn traverse_shortest_path(
    graph: &BreedGraph,
    state: &SearchState,
    target: EntityId,
) -> Result<Vec<EntityId>> {
    if !state.contains(target) || !graph.registry().contains(target) {
        return Err(BreedError::InvalidTarget {
            name: target.to_string(),
        });
    }
    if !state.is_reached(target) {
        let source_name = graph.registry().name(state.source()).to_string();
        let target_name = graph.registry().name(target).to_string();
        return Err(match state.hop_limit() {
            Some(max_hops) => BreedError::ChainExceedsMaxHops {
                source_name,
                target_name,
                max_hops,
            },
            None => BreedError::NoPathExists {
                source_name,
                target_name,
            },
        });
    }

    let mut path = vec![target];
    let mut current = target;
    while let Some(prev) = state.previous(current) {
        path.push(prev);
        current = prev;
    }
    Ok(path)
}

/// Resolve both names, search from the source and reconstruct the chain.
///
/// Names are matched case-insensitively. Unknown names fail with
/// [`BreedError::InvalidSource`] / [`BreedError::InvalidTarget`].
pub fn find_chain(
    graph: &BreedGraph,
    source_name: &str,
    target_name: &str,
    options: &SearchOptions,
) -> Result<BreedChain> {
    let source = graph
        .registry()
        .lookup(source_name)
        .ok_or_else(|| BreedError::InvalidSource {
            name: source_name.to_string(),
        })?;
    let target = graph
        .registry()
        .lookup(target_name)
        .ok_or_else(|| BreedError::InvalidTarget {
            name: target_name.to_string(),
        })?;

    let state = shortest_path_bfs_with(graph, source, options)?;
    let chain = BreedChain::from_search(graph, &state, target)?;
    tracing::debug!(
        "chain {} -> {}: {} hops",
        graph.registry().name(source),
        graph.registry().name(target),
        chain.len()
    );
    Ok(chain)
}
