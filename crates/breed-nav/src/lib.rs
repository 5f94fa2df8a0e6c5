//! Navigation over the breeding graph.
//!
//! Provides the breadth-first shortest-path search ([`search`]) and predecessor
//! walking plus the end-to-end chain query ([`path`]).

pub mod path;
pub mod search;

pub use path::{BreedChain, find_chain, traverse_shortest_path};
pub use search::{
    SearchOptions, SearchState, VisitStatus, shortest_path_bfs, shortest_path_bfs_with,
};
