//! Breadth-first shortest-path search over the breeding graph.
//!
//! All per-query bookkeeping lives in [`SearchState`], owned by the caller, so
//! the graph itself is never mutated and can back concurrent searches.

use breed_core::error::{BreedError, Result};
use breed_core::graph::BreedGraph;
use breed_core::registry::EntityId;
use std::collections::VecDeque;
use std::time::Instant;

/// Advisory per-entity bookkeeping. Correctness depends only on the
/// distance/previous relaxation, not on these transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStatus {
    Undiscovered,
    /// Enqueued with a distance.
    Discovered,
    /// Dequeued, all neighbors relaxed.
    Explored,
}

/// Optional limits for a single search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Do not relax past this many hops from the source.
    pub max_hops: Option<usize>,
    /// Abort with [`BreedError::SearchDeadlineExceeded`] once passed.
    pub deadline: Option<Instant>,
}

/// Distances and predecessors recorded by one search.
#[derive(Debug, Clone)]
pub struct SearchState {
    source: EntityId,
    /// `None` is the "not yet reached" sentinel.
    distance: Vec<Option<usize>>,
    previous: Vec<Option<EntityId>>,
    status: Vec<VisitStatus>,
    /// Set when `max_hops` kept an unreached neighbor from being relaxed.
    hop_limit: Option<usize>,
}

impl SearchState {
    fn new(len: usize, source: EntityId) -> Self {
        let mut state = Self {
            source,
            distance: vec![None; len],
            previous: vec![None; len],
            status: vec![VisitStatus::Undiscovered; len],
            hop_limit: None,
        };
        state.distance[source.index()] = Some(0);
        state.status[source.index()] = VisitStatus::Discovered;
        state
    }

    pub fn source(&self) -> EntityId {
        self.source
    }

    /// Hop count from the source, or `None` if `id` was not reached.
    pub fn distance(&self, id: EntityId) -> Option<usize> {
        self.distance.get(id.index()).copied().flatten()
    }

    /// Predecessor on a shortest path; `None` for the source and unreached entities.
    pub fn previous(&self, id: EntityId) -> Option<EntityId> {
        self.previous.get(id.index()).copied().flatten()
    }

    pub fn status(&self, id: EntityId) -> Option<VisitStatus> {
        self.status.get(id.index()).copied()
    }

    pub fn is_reached(&self, id: EntityId) -> bool {
        self.distance(id).is_some()
    }

    /// Number of entities with a recorded distance, source included.
    pub fn reached_count(&self) -> usize {
        self.distance.iter().filter(|d| d.is_some()).count()
    }

    /// The hop limit, if it cut the search short. Entities left unreached
    /// may then still be connected to the source by a longer chain.
    pub fn hop_limit(&self) -> Option<usize> {
        self.hop_limit
    }

    /// Whether `id` belongs to the graph this state was computed over.
    pub fn contains(&self, id: EntityId) -> bool {
        id.index() < self.distance.len()
    }
}

/// Run an unbounded BFS from `source`.
pub fn shortest_path_bfs(graph: &BreedGraph, source: EntityId) -> Result<SearchState> {
    shortest_path_bfs_with(graph, source, &SearchOptions::default())
}

/// Run a BFS from `source`, honoring `options`.
pub fn shortest_path_bfs_with(
    graph: &BreedGraph,
    source: EntityId,
    options: &SearchOptions,
) -> Result<SearchState> {
    if !graph.registry().contains(source) {
        return Err(BreedError::InvalidSource {
            name: source.to_string(),
        });
    }

    let mut state = SearchState::new(graph.len(), source);
    let mut queue: VecDeque<EntityId> = VecDeque::new();
    queue.push_back(source);
    let mut explored = 0usize;

    while let Some(current) = queue.pop_front() {
        if let Some(deadline) = options.deadline
            && Instant::now() >= deadline
        {
            return Err(BreedError::SearchDeadlineExceeded {
                source_name: graph.registry().name(source).to_string(),
                explored,
            });
        }

        let Some(current_distance) = state.distance(current) else {
            continue;
        };
        state.status[current.index()] = VisitStatus::Explored;
        explored += 1;

        let next_distance = current_distance + 1;
        if let Some(limit) = options.max_hops
            && next_distance > limit
        {
            if graph.neighbors(current).any(|n| !state.is_reached(n)) {
                state.hop_limit = Some(limit);
            }
            continue;
        }

        for neighbor in graph.neighbors(current) {
            let slot = &mut state.distance[neighbor.index()];
            // Strict improvement only; in an unweighted BFS the first stamp is already minimal.
            if slot.is_none_or(|d| next_distance < d) {
                *slot = Some(next_distance);
                state.previous[neighbor.index()] = Some(current);
                state.status[neighbor.index()] = VisitStatus::Discovered;
                queue.push_back(neighbor);
            }
        }
    }

    tracing::debug!(
        "bfs from {}: reached {} of {} pokemon",
        graph.registry().name(source),
        state.reached_count(),
        graph.len()
    );
    Ok(state)
}
