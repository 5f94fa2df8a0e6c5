//! Error taxonomy shared by graph construction and chain queries.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, BreedError>;

/// Errors raised while building the breeding graph or answering a query.
///
/// Construction failures (`DuplicateEntity`, `OrphanGroupReference`,
/// `MalformedRecord`, `Io`) abort before any graph is used. Query failures
/// (`InvalidSource`, `InvalidTarget`, `NoPathExists`, `ChainExceedsMaxHops`,
/// `SearchDeadlineExceeded`) are reported back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum BreedError {
    #[error("invalid source pokemon: {name}")]
    InvalidSource { name: String },

    #[error("invalid target pokemon: {name}")]
    InvalidTarget { name: String },

    #[error("no breeding chain connects {source_name} to {target_name}")]
    NoPathExists {
        source_name: String,
        target_name: String,
    },

    /// The search stopped at its hop limit before reaching the target; a
    /// longer chain may still exist.
    #[error(
        "no breeding chain connects {source_name} to {target_name} within the {max_hops}-hop limit"
    )]
    ChainExceedsMaxHops {
        source_name: String,
        target_name: String,
        max_hops: usize,
    },

    #[error(
        "duplicate pokemon {name} on line {line}: egg groups {conflicting:?} conflict with {existing:?}"
    )]
    DuplicateEntity {
        name: String,
        line: usize,
        existing: Vec<String>,
        conflicting: Vec<String>,
    },

    #[error("pokemon {entity} references egg group {group} missing from the group index")]
    OrphanGroupReference { entity: String, group: String },

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("search from {source_name} exceeded its deadline after {explored} pokemon")]
    SearchDeadlineExceeded { source_name: String, explored: usize },

    #[error("failed to read records from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BreedError {
    /// True for failures caused by an unknown source or target name.
    pub fn is_unknown_entity(&self) -> bool {
        matches!(
            self,
            BreedError::InvalidSource { .. } | BreedError::InvalidTarget { .. }
        )
    }
}
