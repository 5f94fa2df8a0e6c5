use breed_core::graph::BreedGraph;
use breed_core::records::{NameField, parse_records};
use breed_core::registry::{DuplicatePolicy, EntityId, Registry};
use std::collections::BTreeSet;

fn build(pairs: Vec<(&str, Vec<&str>)>) -> BreedGraph {
    BreedGraph::build(Registry::from_pairs(pairs, DuplicatePolicy::Reject).unwrap()).unwrap()
}

/// Deterministic pseudo-random graph: `n` pokemon drawn from `groups` egg groups.
fn synthetic(n: usize, groups: usize, seed: u64) -> BreedGraph {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as usize
    };
    let pairs: Vec<(String, Vec<String>)> = (0..n)
        .map(|i| {
            let count = 1 + next() % 2;
            let tags = (0..count).map(|_| format!("g{}", next() % groups)).collect();
            (format!("Mon{i}"), tags)
        })
        .collect();
    BreedGraph::build(Registry::from_pairs(pairs, DuplicatePolicy::Reject).unwrap()).unwrap()
}

#[test]
fn test_adjacency_is_symmetric() {
    for seed in 1..6 {
        let graph = synthetic(40, 7, seed);
        for (a, _) in graph.registry().entities() {
            for b in graph.neighbors(a) {
                assert!(graph.are_adjacent(b, a), "seed {seed}: {a} -> {b} not mirrored");
            }
        }
    }
}

#[test]
fn test_no_self_loops() {
    for seed in 1..6 {
        let graph = synthetic(40, 5, seed);
        for (a, _) in graph.registry().entities() {
            assert!(!graph.are_adjacent(a, a));
            assert!(graph.neighbors(a).all(|b| b != a));
        }
    }
}

#[test]
fn test_adjacency_matches_shared_groups() {
    let graph = synthetic(30, 6, 42);
    let ids: Vec<EntityId> = graph.registry().entities().map(|(id, _)| id).collect();
    for &a in &ids {
        for &b in &ids {
            let shares = a != b && !graph.shared_groups(a, b).is_empty();
            assert_eq!(graph.are_adjacent(a, b), shares);
        }
    }
}

#[test]
fn test_pair_sharing_two_groups_linked_once() {
    let graph = build(vec![
        ("Rhyhorn", vec!["Monster", "Field"]),
        ("Nidoking", vec!["Monster", "Field"]),
    ]);
    let rhyhorn = graph.registry().lookup("rhyhorn").unwrap();
    let nidoking = graph.registry().lookup("nidoking").unwrap();
    let neighbors: Vec<EntityId> = graph.neighbors(rhyhorn).collect();
    assert_eq!(neighbors, vec![nidoking]);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.shared_groups(rhyhorn, nidoking), vec!["Monster", "Field"]);
}

#[test]
fn test_neighbor_sets_independent_of_record_order() {
    let forward = build(vec![
        ("Eevee", vec!["Field"]),
        ("Rhyhorn", vec!["Monster", "Field"]),
        ("Charmander", vec!["Monster", "Dragon"]),
        ("Dratini", vec!["Water 1", "Dragon"]),
    ]);
    let reversed = build(vec![
        ("Dratini", vec!["Dragon", "Water 1"]),
        ("Charmander", vec!["Dragon", "Monster"]),
        ("Rhyhorn", vec!["Field", "Monster"]),
        ("Eevee", vec!["Field"]),
    ]);

    let names = |graph: &BreedGraph, name: &str| -> BTreeSet<String> {
        let id = graph.registry().lookup(name).unwrap();
        graph
            .neighbors(id)
            .map(|n| graph.registry().name(n).to_string())
            .collect()
    };
    for name in ["Eevee", "Rhyhorn", "Charmander", "Dratini"] {
        assert_eq!(names(&forward, name), names(&reversed, name), "{name}");
    }
}

#[test]
fn test_graph_from_parsed_records() {
    let text = "EeveeEevee\tField\nRhyhornRhyhorn\tMonster/Field\nCharmanderCharmander\tMonster/Dragon\n";
    let records = parse_records(text, NameField::Doubled).unwrap();
    let graph = BreedGraph::from_records(records, DuplicatePolicy::Reject).unwrap();

    assert_eq!(graph.len(), 3);
    let eevee = graph.registry().lookup("EEVEE").unwrap();
    let rhyhorn = graph.registry().lookup("Rhyhorn").unwrap();
    let charmander = graph.registry().lookup("charmander").unwrap();
    assert!(graph.are_adjacent(eevee, rhyhorn));
    assert!(graph.are_adjacent(rhyhorn, charmander));
    assert!(!graph.are_adjacent(eevee, charmander));
}

#[test]
fn test_empty_graph() {
    let graph = BreedGraph::build(Registry::default()).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.stats().largest_group, None);
}
