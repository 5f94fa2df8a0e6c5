//! Tab-separated egg-group records.
//!
//! Each non-blank line is `name<TAB>Group1/Group2`. The stock data file writes
//! the name twice (`EeveeEevee`), an artifact of how it was scraped;
//! [`NameField::Doubled`] undoes that, [`NameField::Plain`] takes the field as is.

use crate::error::{BreedError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the name column of a record is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameField {
    /// Name repeated twice; the first half is kept.
    #[default]
    Doubled,
    /// Name written once.
    Plain,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number in the source text.
    pub line: usize,
    pub name: String,
    pub groups: Vec<String>,
}

/// Parse every non-blank line of `text` into a [`Record`].
pub fn parse_records(text: &str, name_field: NameField) -> Result<Vec<Record>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(idx + 1, line, name_field))
        .collect()
}

/// Read and parse a record file from disk.
pub fn load_records(path: &Path, name_field: NameField) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).map_err(|source| BreedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&text, name_field)?;
    tracing::debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_line(line: usize, raw: &str, name_field: NameField) -> Result<Record> {
    let malformed = |reason: &str| BreedError::MalformedRecord {
        line,
        reason: reason.to_string(),
    };

    let raw = raw.trim_end_matches('\r');
    let (name_raw, groups_raw) = raw
        .split_once('\t')
        .ok_or_else(|| malformed("expected a tab between name and egg groups"))?;

    let name_raw = name_raw.trim();
    let name = match name_field {
        NameField::Plain => name_raw,
        NameField::Doubled => undouble(name_raw)
            .ok_or_else(|| malformed(&format!("name field {name_raw:?} is not doubled")))?,
    };
    if name.is_empty() {
        return Err(malformed("empty name"));
    }

    let groups: Vec<String> = groups_raw
        .split('/')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect();
    if groups.is_empty() {
        return Err(malformed(&format!("{name} has no egg groups")));
    }

    Ok(Record {
        line,
        name: name.to_string(),
        groups,
    })
}

/// `"EeveeEevee"` -> `"Eevee"`. Returns `None` when the halves differ.
fn undouble(field: &str) -> Option<&str> {
    let chars = field.chars().count();
    if chars % 2 != 0 {
        return None;
    }
    let (mid, _) = field.char_indices().nth(chars / 2).unwrap_or((field.len(), ' '));
    let (first, second) = field.split_at(mid);
    (first == second).then_some(first)
}
