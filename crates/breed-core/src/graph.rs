//! Breeding graph: two pokemon are adjacent when they share an egg group.

use crate::error::{BreedError, Result};
use crate::records::Record;
use crate::registry::{DuplicatePolicy, EntityId, Registry};
use serde::Serialize;
use std::collections::BTreeSet;

/// Immutable adjacency built from a [`Registry`].
///
/// Neighbor sets are symmetric and never contain the entity itself. The graph
/// holds no search state, so any number of searches may borrow it at once.
#[derive(Debug, Clone)]
pub struct BreedGraph {
    registry: Registry,
    neighbors: Vec<BTreeSet<EntityId>>,
}

/// Aggregate statistics for a built graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub total_entities: usize,
    pub total_groups: usize,
    /// Undirected edge count.
    pub total_edges: usize,
    /// Entities that share no group with anyone else.
    pub isolated_entities: usize,
    /// The group with the most members, if any.
    pub largest_group: Option<(String, usize)>,
}

impl BreedGraph {
    /// Link every entity to every other entity carrying one of its groups.
    pub fn build(registry: Registry) -> Result<Self> {
        let mut neighbors = vec![BTreeSet::new(); registry.len()];

        for (id, entity) in registry.entities() {
            for group in &entity.groups {
                let members = registry.group_index().get(group).ok_or_else(|| {
                    BreedError::OrphanGroupReference {
                        entity: entity.name.clone(),
                        group: group.clone(),
                    }
                })?;
                neighbors[id.index()].extend(members.iter().copied().filter(|&m| m != id));
            }
        }

        let graph = Self {
            registry,
            neighbors,
        };
        tracing::debug!(
            "breeding graph built: {} pokemon, {} edges",
            graph.len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Registry construction plus [`BreedGraph::build`] in one step.
    pub fn from_records(
        records: impl IntoIterator<Item = Record>,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        Self::build(Registry::from_records(records, policy)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Neighbors of `id`; empty for unknown ids.
    pub fn neighbors(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.neighbors
            .get(id.index())
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn degree(&self, id: EntityId) -> usize {
        self.neighbors.get(id.index()).map_or(0, BTreeSet::len)
    }

    pub fn are_adjacent(&self, a: EntityId, b: EntityId) -> bool {
        self.neighbors
            .get(a.index())
            .is_some_and(|set| set.contains(&b))
    }

    /// Egg groups that `a` and `b` have in common, in `a`'s group order.
    pub fn shared_groups(&self, a: EntityId, b: EntityId) -> Vec<&str> {
        let (Some(ea), Some(eb)) = (self.registry.entity(a), self.registry.entity(b)) else {
            return Vec::new();
        };
        ea.groups
            .iter()
            .filter(|g| eb.groups.contains(g))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn stats(&self) -> GraphStats {
        let largest_group = self
            .registry
            .group_index()
            .iter()
            .max_by(|a, b| a.1.len().cmp(&b.1.len()).then_with(|| b.0.cmp(a.0)))
            .map(|(name, members)| (name.clone(), members.len()));
        GraphStats {
            total_entities: self.len(),
            total_groups: self.registry.group_index().len(),
            total_edges: self.edge_count(),
            isolated_entities: self.neighbors.iter().filter(|n| n.is_empty()).count(),
            largest_group,
        }
    }
}
